//! Synthesizes a population of travelers with one-day activity plans and exports it as MATSim
//! `population_v6` XML.
//!
//! The central object of a generation run is the `Context`, which holds the run's state in data
//! plugins: the random stream, the coordinate transformation, the parameters and the population
//! built so far. Each module adds its functionality through an extension trait on `Context`:
//! * [`ContextRandomExt`] owns the single seeded random stream every sampler draws from.
//! * [`ContextSpatialExt`] and [`ContextTimeExt`] sample home locations, corridor anchors and
//!   activity end times.
//! * [`ContextAttributesExt`] draws employment and the daily activity pattern of a person.
//! * [`ContextActivityModelExt`] assembles the plan that follows from a pattern.
//! * [`ContextPopulationExt`] runs generation person by person and writes the result.
//!
//! People are built strictly one after another, and for each person the draws happen in a fixed
//! order, so a seed fully determines the output file:
//!
//! ```no_run
//! use std::path::Path;
//! use synthplans::{Context, ContextPopulationExt, ContextRandomExt, ContextTransformationExt};
//!
//! let mut context = Context::new();
//! context.init_random(15);
//! context.init_coordinate_transformation("EPSG:2849").unwrap();
//! context.make_plans(100).unwrap();
//! context.write_plans(Path::new("plans.xml.gz")).unwrap();
//! ```
pub mod activity_model;
pub mod context;
pub mod error;
pub mod geo;
pub mod log;
pub mod parameters;
pub mod people;
pub mod plan;
pub mod population;
pub mod population_io;
pub mod random;
pub mod report;
pub mod runner;
pub mod spatial;
pub mod time;

pub use activity_model::ContextActivityModelExt;
pub use context::Context;
pub use error::PlansError;
pub use geo::{ContextTransformationExt, Coord};
pub use parameters::{ContextParametersExt, Parameters};
pub use people::{
    ContextAttributesExt, ContextPeopleExt, DailyActivityPattern, Employment, Person, PersonId,
    Population,
};
pub use plan::{Activity, ActivityType, Mode, Plan, PlanElement};
pub use population::ContextPopulationExt;
pub use population_io::{read_population, write_population};
pub use random::ContextRandomExt;
pub use report::ContextReportExt;
pub use spatial::ContextSpatialExt;
pub use time::ContextTimeExt;
