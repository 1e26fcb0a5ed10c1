//! Builds the population person by person and hands it to the writer.
use std::path::Path;

use log::{debug, info};
use strum::IntoEnumIterator;

use crate::activity_model::ContextActivityModelExt;
use crate::context::Context;
use crate::error::PlansError;
use crate::geo::ContextTransformationExt;
use crate::people::{
    ContextAttributesExt, ContextPeopleExt, DailyActivityPattern, Employment, Person, Population,
};
use crate::population_io::write_population;
use crate::random::ContextRandomExt;

pub trait ContextPopulationExt {
    /// Creates `number_of_people` people with ids continuing from the current population, each
    /// with attributes and a plan, strictly one after another.
    ///
    /// # Errors
    ///
    /// Returns `PlansError::InvalidPopulationSize` if `number_of_people` is negative. Nothing
    /// is drawn or added in that case.
    fn make_plans(&mut self, number_of_people: i64) -> Result<(), PlansError>;

    /// Writes the population to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if a plan is malformed or the file cannot be written. The population
    /// itself is left untouched and can be written again.
    fn write_plans(&self, path: &Path) -> Result<(), PlansError>;
}

impl ContextPopulationExt for Context {
    fn make_plans(&mut self, number_of_people: i64) -> Result<(), PlansError> {
        let count = usize::try_from(number_of_people)
            .map_err(|_| PlansError::InvalidPopulationSize(number_of_people))?;
        match self.get_base_seed() {
            Some(seed) => info!("making plans for {count} people from seed {seed}"),
            None => info!("making plans for {count} people"),
        }

        let crs = self.get_crs().map(str::to_string);
        self.set_population_crs(crs);

        for _ in 0..count {
            let id = self.next_person_id();
            let employed = self.sample_employment();
            let dap = self.sample_daily_activity_pattern(employed);
            let plan = self.assemble_plan(dap);
            debug!("person {id}: {employed}, pattern {dap}, {} plan elements", plan.len());
            self.add_person(Person {
                id,
                employed,
                dap,
                plan,
            });
        }

        if let Some(population) = self.get_population() {
            for employed in Employment::iter() {
                for dap in DailyActivityPattern::iter() {
                    info!("{employed} {dap}: {}", population.count(employed, dap));
                }
            }
        }
        Ok(())
    }

    fn write_plans(&self, path: &Path) -> Result<(), PlansError> {
        let empty = Population::new(self.get_crs().map(str::to_string));
        let population = self.get_population().unwrap_or(&empty);
        info!("writing {} people to {}", population.len(), path.display());
        write_population(population, path)
    }
}
