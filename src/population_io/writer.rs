use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::PlansError;
use crate::people::{Person, Population};
use crate::plan::PlanElement;
use crate::population_io::{format_time, Output, CRS_ATTRIBUTE, POPULATION_DTD, STRING_CLASS};

/// Writes `population` to `path`. Every plan is validated before the file is created, so a
/// malformed plan leaves nothing on disk.
///
/// # Errors
///
/// Returns `PlansError::InvalidPlan` for the first malformed plan, or an I/O or XML error if the
/// file cannot be written.
pub fn write_population(population: &Population, path: &Path) -> Result<(), PlansError> {
    for person in population.iter() {
        person
            .plan
            .validate()
            .map_err(|reason| PlansError::InvalidPlan {
                person_id: person.id,
                reason,
            })?;
    }

    let mut output = Output::create(path)?;
    write_xml(population, &mut output)?;
    output.finish()?;
    Ok(())
}

fn write_xml<W: Write>(population: &Population, out: W) -> Result<(), PlansError> {
    let mut writer = Writer::new_with_indent(out, b'\t', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(format!(
        "population SYSTEM \"{POPULATION_DTD}\""
    ))))?;

    writer.write_event(Event::Start(BytesStart::new("population")))?;
    if let Some(crs) = &population.crs {
        write_attributes(&mut writer, &[(CRS_ATTRIBUTE, crs.as_str())])?;
    }
    for person in population.iter() {
        write_person(&mut writer, person)?;
    }
    writer.write_event(Event::End(BytesEnd::new("population")))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_attributes<W: Write>(
    writer: &mut Writer<W>,
    attributes: &[(&str, &str)],
) -> Result<(), PlansError> {
    writer.write_event(Event::Start(BytesStart::new("attributes")))?;
    for (name, value) in attributes {
        writer.write_event(Event::Start(
            BytesStart::new("attribute").with_attributes([("name", *name), ("class", STRING_CLASS)]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new("attribute")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;
    Ok(())
}

fn write_person<W: Write>(writer: &mut Writer<W>, person: &Person) -> Result<(), PlansError> {
    let id = person.id.to_string();
    writer.write_event(Event::Start(
        BytesStart::new("person").with_attributes([("id", id.as_str())]),
    ))?;

    let employed = person.employed.to_string();
    let dap = person.dap.to_string();
    write_attributes(writer, &[("employed", employed.as_str()), ("DAP", dap.as_str())])?;

    writer.write_event(Event::Start(
        BytesStart::new("plan").with_attributes([("selected", "yes")]),
    ))?;
    for element in person.plan.elements() {
        let element = match element {
            PlanElement::Activity(activity) => {
                let mut start = BytesStart::new("activity");
                start.push_attribute(("type", activity.activity_type.to_string().as_str()));
                start.push_attribute(("x", activity.coord.x.to_string().as_str()));
                start.push_attribute(("y", activity.coord.y.to_string().as_str()));
                if let Some(end_time) = activity.end_time {
                    start.push_attribute(("end_time", format_time(end_time).as_str()));
                }
                start
            }
            PlanElement::Trip(trip) => BytesStart::new("leg")
                .with_attributes([("mode", trip.mode.to_string().as_str())]),
        };
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("plan")))?;

    writer.write_event(Event::End(BytesEnd::new("person")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coord;
    use crate::people::{DailyActivityPattern, Employment, PersonId};
    use crate::plan::{Activity, ActivityType, Mode, Plan};

    fn worker() -> Person {
        let home = Coord::new(480_896.25, 2_188_984.5);
        let mut plan = Plan::new();
        plan.add_activity(Activity::new(ActivityType::Home, home).with_end_time(26_755.8));
        plan.add_trip(Mode::Car);
        plan.add_activity(
            Activity::new(ActivityType::Work, Coord::new(1.0, 2.0)).with_end_time(63_353.4),
        );
        plan.add_trip(Mode::Car);
        plan.add_activity(Activity::new(ActivityType::Home, home));
        Person {
            id: PersonId(0),
            employed: Employment::NonWorker,
            dap: DailyActivityPattern::W,
            plan,
        }
    }

    fn render(population: &Population) -> String {
        let mut buffer = Vec::new();
        write_xml(population, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_population() {
        let xml = render(&Population::new(None));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<!DOCTYPE population SYSTEM \"http://www.matsim.org/files/dtd/population_v6.dtd\">"));
        assert!(xml.contains("<population>"));
        assert!(xml.trim_end().ends_with("</population>"));
        assert!(!xml.contains("<person"));
    }

    #[test]
    fn person_elements() {
        let mut population = Population::new(Some("EPSG:2849".to_string()));
        population.add_person(worker());
        let xml = render(&population);

        assert!(xml.contains(
            "<attribute name=\"coordinateReferenceSystem\" class=\"java.lang.String\">EPSG:2849</attribute>"
        ));
        assert!(xml.contains("<person id=\"0\">"));
        assert!(xml.contains(
            "<attribute name=\"employed\" class=\"java.lang.String\">non-worker</attribute>"
        ));
        assert!(xml.contains("<attribute name=\"DAP\" class=\"java.lang.String\">W</attribute>"));
        assert!(xml.contains("<plan selected=\"yes\">"));
        assert!(xml.contains(
            "<activity type=\"home\" x=\"480896.25\" y=\"2188984.5\" end_time=\"07:25:55\"/>"
        ));
        assert!(xml.contains("<activity type=\"work\" x=\"1\" y=\"2\" end_time=\"17:35:53\"/>"));
        assert!(xml.contains("<activity type=\"home\" x=\"480896.25\" y=\"2188984.5\"/>"));
        assert_eq!(xml.matches("<leg mode=\"car\"/>").count(), 2);
    }

    #[test]
    fn invalid_plan_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plans.xml");

        let mut person = worker();
        person.plan.add_trip(Mode::Car);
        let mut population = Population::new(None);
        population.add_person(person);

        match write_population(&population, &path) {
            Err(PlansError::InvalidPlan { person_id, reason }) => {
                assert_eq!(person_id, PersonId(0));
                assert_eq!(reason, "plan ends with a trip");
            }
            other => panic!("expected an invalid plan error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
