use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, LevelFilter};

use crate::context::Context;
use crate::geo::ContextTransformationExt;
use crate::log::set_log_level;
use crate::parameters::{ContextParametersExt, Parameters};
use crate::population::ContextPopulationExt;
use crate::random::ContextRandomExt;
use crate::report::ContextReportExt;

/// Command line arguments. Every argument overrides the matching field of the parameters, which
/// default to the reference scenario.
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path of the population file; a `.gz` suffix compresses it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of people to generate
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub population_size: Option<i64>,

    /// Coordinate reference system of the exported coordinates, e.g. EPSG:2849
    #[arg(long)]
    pub crs: Option<String>,

    /// Optional path for a per-person CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging at the given level (error, warn, info, debug, trace)
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

impl BaseArgs {
    /// Overrides the fields of `parameters` given on the command line.
    fn apply(&self, parameters: &mut Parameters) {
        if let Some(seed) = self.random_seed {
            parameters.seed = seed;
        }
        if let Some(output) = &self.output {
            parameters.output_file.clone_from(output);
        }
        if let Some(population_size) = self.population_size {
            parameters.population_size = population_size;
        }
        if let Some(crs) = &self.crs {
            parameters.crs.clone_from(crs);
        }
        if let Some(report) = &self.report {
            parameters.report_file = Some(report.clone());
        }
    }
}

fn create_cli() -> Command {
    let cli = Command::new("synthplans")
        .about("Synthesizes travelers with one-day activity plans for MATSim");
    BaseArgs::augment_args(cli)
}

/// Parses the command line and runs generation.
///
/// # Errors
/// Returns an error if argument parsing, configuration or generation fails
pub fn run_with_args() -> Result<Context, Box<dyn std::error::Error>> {
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(args)
}

/// Runs generation with already parsed arguments: builds the parameters, generates the population
/// and writes the population file and, if requested, the person report.
///
/// # Errors
/// Returns the first error from loading the config, generation or writing output
pub fn run_with_args_internal(args: BaseArgs) -> Result<Context, Box<dyn std::error::Error>> {
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    let mut context = Context::new();
    if let Some(config_path) = &args.config {
        context.load_parameters(config_path)?;
    }
    let mut parameters = context.get_parameters().clone();
    args.apply(&mut parameters);
    context.set_parameters(parameters.clone());
    info!("running with {parameters:?}");

    context.init_random(parameters.seed);
    context.init_coordinate_transformation(&parameters.crs)?;
    context.make_plans(parameters.population_size)?;
    context.write_plans(&parameters.output_file)?;
    if let Some(report_file) = &parameters.report_file {
        context.write_person_report(report_file)?;
    }
    Ok(context)
}
