use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::PlansError;
use crate::geo::Coord;
use crate::people::{DailyActivityPattern, Employment, Person, PersonId, Population};
use crate::plan::{Activity, ActivityType, Mode, Plan};
use crate::population_io::{open_input, parse_time, CRS_ATTRIBUTE};

/// Reads a population written by [`write_population`](super::write_population).
///
/// Only the selected plan of each person is kept. Elements and attributes this crate doesn't
/// produce are skipped.
///
/// # Errors
///
/// Returns `PlansError::PopulationFormat` if a person lacks its `employed` or `DAP` attribute or
/// an activity is missing a required field, or an I/O or XML error if the file can't be read.
pub fn read_population(path: &Path) -> Result<Population, PlansError> {
    read_xml(open_input(path)?)
}

/// A person whose closing tag hasn't been seen yet.
struct PartialPerson {
    id: PersonId,
    employed: Option<Employment>,
    dap: Option<DailyActivityPattern>,
    plan: Option<Plan>,
}

impl PartialPerson {
    fn finish(self) -> Result<Person, PlansError> {
        let missing = |what: &str| {
            PlansError::PopulationFormat(format!("person {} has no {what}", self.id))
        };
        Ok(Person {
            id: self.id,
            employed: self.employed.ok_or_else(|| missing("employed attribute"))?,
            dap: self.dap.ok_or_else(|| missing("DAP attribute"))?,
            plan: self.plan.ok_or_else(|| missing("selected plan"))?,
        })
    }
}

#[derive(Default)]
struct ReaderState {
    person: Option<PartialPerson>,
    /// The plan being read, if it is the one to keep.
    plan: Option<Plan>,
    /// Name of the `<attribute>` whose text is being read.
    attribute: Option<String>,
}

fn read_xml<R: BufRead>(input: R) -> Result<Population, PlansError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut population = Population::new(None);
    let mut state = ReaderState::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => start_element(&element, &mut state)?,
            Event::Empty(element) => {
                start_element(&element, &mut state)?;
                end_element(element.name().as_ref(), &mut state, &mut population)?;
            }
            Event::End(element) => {
                end_element(element.name().as_ref(), &mut state, &mut population)?;
            }
            Event::Text(text) => {
                if let Some(name) = state.attribute.take() {
                    set_attribute(&name, &text.unescape()?, &mut state, &mut population)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(population)
}

fn start_element(element: &BytesStart, state: &mut ReaderState) -> Result<(), PlansError> {
    match element.name().as_ref() {
        b"person" => {
            let id = required(element, "id")?;
            let id = id
                .parse::<usize>()
                .map_err(|_| PlansError::PopulationFormat(format!("invalid person id '{id}'")))?;
            state.person = Some(PartialPerson {
                id: PersonId(id),
                employed: None,
                dap: None,
                plan: None,
            });
        }
        b"attribute" => {
            state.attribute = Some(required(element, "name")?);
        }
        b"plan" => {
            let already_has_plan = state
                .person
                .as_ref()
                .is_some_and(|person| person.plan.is_some());
            let selected = optional(element, "selected")?.map_or(true, |value| value != "no");
            if selected && !already_has_plan {
                state.plan = Some(Plan::new());
            }
        }
        b"activity" | b"act" => {
            if let Some(plan) = state.plan.as_mut() {
                plan.add_activity(read_activity(element)?);
            }
        }
        b"leg" => {
            if let Some(plan) = state.plan.as_mut() {
                let mode = required(element, "mode")?;
                let mode = Mode::from_str(&mode)
                    .map_err(|_| PlansError::PopulationFormat(format!("unknown mode '{mode}'")))?;
                plan.add_trip(mode);
            }
        }
        _ => {}
    }
    Ok(())
}

fn end_element(
    name: &[u8],
    state: &mut ReaderState,
    population: &mut Population,
) -> Result<(), PlansError> {
    match name {
        b"person" => {
            if let Some(person) = state.person.take() {
                population.add_person(person.finish()?);
            }
        }
        b"plan" => {
            if let (Some(plan), Some(person)) = (state.plan.take(), state.person.as_mut()) {
                person.plan = Some(plan);
            }
        }
        b"attribute" => {
            // An attribute with an empty value has no text event
            if let Some(name) = state.attribute.take() {
                set_attribute(&name, "", state, population)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn set_attribute(
    name: &str,
    value: &str,
    state: &mut ReaderState,
    population: &mut Population,
) -> Result<(), PlansError> {
    let invalid =
        || PlansError::PopulationFormat(format!("invalid value '{value}' for attribute {name}"));
    match (state.person.as_mut(), name) {
        (Some(person), "employed") => {
            person.employed = Some(Employment::from_str(value).map_err(|_| invalid())?);
        }
        (Some(person), "DAP") => {
            person.dap = Some(DailyActivityPattern::from_str(value).map_err(|_| invalid())?);
        }
        (None, CRS_ATTRIBUTE) => population.crs = Some(value.to_string()),
        _ => {}
    }
    Ok(())
}

fn read_activity(element: &BytesStart) -> Result<Activity, PlansError> {
    let activity_type = required(element, "type")?;
    let activity_type = ActivityType::from_str(&activity_type).map_err(|_| {
        PlansError::PopulationFormat(format!("unknown activity type '{activity_type}'"))
    })?;
    let coord = Coord::new(
        parse_coordinate(&required(element, "x")?)?,
        parse_coordinate(&required(element, "y")?)?,
    );
    let mut activity = Activity::new(activity_type, coord);
    if let Some(end_time) = optional(element, "end_time")? {
        activity = activity.with_end_time(parse_time(&end_time)?);
    }
    Ok(activity)
}

fn parse_coordinate(value: &str) -> Result<f64, PlansError> {
    value
        .parse()
        .map_err(|_| PlansError::PopulationFormat(format!("invalid coordinate '{value}'")))
}

fn optional(element: &BytesStart, name: &str) -> Result<Option<String>, PlansError> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required(element: &BytesStart, name: &str) -> Result<String, PlansError> {
    optional(element, name)?.ok_or_else(|| {
        PlansError::PopulationFormat(format!(
            "<{}> has no {name} attribute",
            String::from_utf8_lossy(element.name().as_ref())
        ))
    })
}
