use std::fmt::{self, Display};
use std::io;

use crate::people::PersonId;

/// Provides `PlansError` and maps other errors to
/// convert to a `PlansError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum PlansError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    XmlError(quick_xml::Error),
    /// A population size below zero was requested.
    InvalidPopulationSize(i64),
    /// No coordinate transformation is known for the reference system identifier.
    UnsupportedCrs(String),
    /// A plan broke the home/trip alternation invariant and cannot be exported.
    InvalidPlan {
        person_id: PersonId,
        reason: String,
    },
    /// A population file could not be interpreted.
    PopulationFormat(String),
    ReportError(String),
}

impl From<io::Error> for PlansError {
    fn from(error: io::Error) -> Self {
        PlansError::IoError(error)
    }
}

impl From<serde_json::Error> for PlansError {
    fn from(error: serde_json::Error) -> Self {
        PlansError::JsonError(error)
    }
}

impl From<csv::Error> for PlansError {
    fn from(error: csv::Error) -> Self {
        PlansError::CsvError(error)
    }
}

impl From<quick_xml::Error> for PlansError {
    fn from(error: quick_xml::Error) -> Self {
        PlansError::XmlError(error)
    }
}

impl From<quick_xml::events::attributes::AttrError> for PlansError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        PlansError::XmlError(error.into())
    }
}

impl std::error::Error for PlansError {}

impl Display for PlansError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlansError::InvalidPopulationSize(n) => {
                write!(f, "Error: population size must not be negative, got {n}")
            }
            PlansError::UnsupportedCrs(crs) => {
                write!(f, "Error: unsupported coordinate reference system {crs}")
            }
            PlansError::InvalidPlan { person_id, reason } => {
                write!(f, "Error: invalid plan for person {person_id}: {reason}")
            }
            _ => write!(f, "Error: {self:?}"),
        }
    }
}
