//! Run parameters. Every field defaults to the reference scenario, so an empty JSON object (or no
//! config file at all) reproduces it.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::define_data_plugin;
use crate::error::PlansError;
use crate::random::DEFAULT_SEED;

pub const DEFAULT_POPULATION_SIZE: i64 = 47_446;
pub const DEFAULT_CRS: &str = "EPSG:2849";
pub const DEFAULT_OUTPUT_FILE: &str = "scenarios/equil/2050_plans.xml.gz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub seed: u64,
    /// Signed so that a negative size reaches generation and is rejected there.
    pub population_size: i64,
    /// Reference system of the exported coordinates.
    pub crs: String,
    pub output_file: PathBuf,
    /// Optional per-person CSV summary.
    pub report_file: Option<PathBuf>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            seed: DEFAULT_SEED,
            population_size: DEFAULT_POPULATION_SIZE,
            crs: DEFAULT_CRS.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            report_file: None,
        }
    }
}

define_data_plugin!(ParametersPlugin, Parameters, Parameters::default());

pub trait ContextParametersExt {
    /// Reads parameters from a JSON file and stores them in the context, replacing any set before.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be opened or is not a valid parameters object.
    fn load_parameters(&mut self, path: &Path) -> Result<(), PlansError>;

    fn set_parameters(&mut self, parameters: Parameters);

    /// The stored parameters, or the reference scenario if none were set.
    fn get_parameters(&mut self) -> &Parameters;
}

impl ContextParametersExt for Context {
    fn load_parameters(&mut self, path: &Path) -> Result<(), PlansError> {
        info!("loading parameters from {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        let parameters: Parameters = serde_json::from_reader(reader)?;
        self.set_parameters(parameters);
        Ok(())
    }

    fn set_parameters(&mut self, parameters: Parameters) {
        *self.get_data_mut(ParametersPlugin) = parameters;
    }

    fn get_parameters(&mut self) -> &Parameters {
        self.get_data_mut(ParametersPlugin)
    }
}
