use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use csv::Writer;
use log::info;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::PlansError;
use crate::people::{ContextPeopleExt, DailyActivityPattern, Employment, Person, PersonId};

/// One row of the person report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonReportRecord {
    pub person_id: PersonId,
    pub employed: Employment,
    pub dap: DailyActivityPattern,
    pub activities: usize,
    pub trips: usize,
    pub home_x: f64,
    pub home_y: f64,
    /// End of the first home activity. Empty for people who stay home.
    pub departure_time: Option<f64>,
}

impl From<&Person> for PersonReportRecord {
    fn from(person: &Person) -> Self {
        let home = person.plan.first_activity();
        PersonReportRecord {
            person_id: person.id,
            employed: person.employed,
            dap: person.dap,
            activities: person.plan.activities().count(),
            trips: person.plan.trip_count(),
            home_x: home.map_or(f64::NAN, |activity| activity.coord.x),
            home_y: home.map_or(f64::NAN, |activity| activity.coord.y),
            departure_time: home.and_then(|activity| activity.end_time),
        }
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist.
fn generate_validate_filepath(path: &Path) -> Result<File, PlansError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(PlansError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

pub trait ContextReportExt {
    /// Writes one row per person of the current population to `path`, in creation order. An
    /// empty population produces a file with only the header.
    ///
    /// # Errors
    ///
    /// Returns `PlansError::ReportError` if `path` is not a `.csv` file, or an error if the file
    /// can't be written.
    fn write_person_report(&self, path: &Path) -> Result<(), PlansError>;
}

impl ContextReportExt for Context {
    fn write_person_report(&self, path: &Path) -> Result<(), PlansError> {
        let file = generate_validate_filepath(path)?;
        // With no rows, serialize() never runs and never writes the header
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        write_header(&mut writer)?;

        let mut rows = 0;
        if let Some(population) = self.get_population() {
            for person in population.iter() {
                writer.serialize(PersonReportRecord::from(person))?;
                rows += 1;
            }
        }
        writer.flush()?;
        info!("wrote {rows} rows to person report {}", path.display());
        Ok(())
    }
}

fn write_header(writer: &mut Writer<File>) -> Result<(), PlansError> {
    writer.write_record([
        "person_id",
        "employed",
        "dap",
        "activities",
        "trips",
        "home_x",
        "home_y",
        "departure_time",
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ContextTransformationExt;
    use crate::population::ContextPopulationExt;
    use crate::random::ContextRandomExt;
    use tempfile::tempdir;

    fn read_records(path: &Path) -> Vec<PersonReportRecord> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().map(Result::unwrap).collect()
    }

    #[test]
    fn one_row_per_person() {
        let mut context = Context::new();
        context.init_random(15);
        context.init_coordinate_transformation("EPSG:2849").unwrap();
        context.make_plans(20).unwrap();

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("reports").join("people.csv");
        context.write_person_report(&path).unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.person_id, PersonId(i));
            let person = context.get_population().unwrap().get_person(record.person_id).unwrap();
            assert_eq!(*record, PersonReportRecord::from(person));
            assert_eq!(record.activities, record.trips + 1);
            assert_eq!(
                record.departure_time.is_none(),
                record.dap == DailyActivityPattern::H
            );
        }

        // Person 0 of the reference stream is a non-worker with a work tour
        assert_eq!(records[0].employed, Employment::NonWorker);
        assert_eq!(records[0].dap, DailyActivityPattern::W);
        assert_eq!(records[0].activities, 4);
    }

    #[test]
    fn empty_population_writes_header() {
        let context = Context::new();
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("people.csv");
        context.write_person_report(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "person_id,employed,dap,activities,trips,home_x,home_y,departure_time\n"
        );
    }

    #[test]
    fn only_csvs_allowed() {
        let context = Context::new();
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("people.tsv");
        match context.write_person_report(&path) {
            Err(PlansError::ReportError(message)) => {
                assert_eq!(message, "Report output files must be CSVs at this time");
            }
            other => panic!("expected a report error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
