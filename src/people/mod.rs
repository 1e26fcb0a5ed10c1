//! People and the population they belong to.
//!
//! A person is created once per generation step with a fresh [`PersonId`], gets its attributes
//! from the [attribute sampler](attributes), and owns exactly one [`Plan`]. The finished people
//! are collected into the [`Population`] held by the `Context`.
pub mod attributes;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::context::Context;
use crate::define_data_plugin;
use crate::plan::Plan;

pub use attributes::ContextAttributesExt;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Employment {
    #[strum(serialize = "worker")]
    #[serde(rename = "worker")]
    Worker,
    #[strum(serialize = "non-worker")]
    #[serde(rename = "non-worker")]
    NonWorker,
}

/// Daily activity pattern: how a person spends the day.
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum DailyActivityPattern {
    /// A tour to work, possibly with another stop on the way home.
    W,
    /// A tour to a single non-work stop.
    N,
    /// Stays home all day.
    H,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub employed: Employment,
    pub dap: DailyActivityPattern,
    pub plan: Plan,
}

/// All people of a generation run, in creation order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    /// Reference system of every coordinate in the population.
    pub crs: Option<String>,
    people: IndexMap<PersonId, Person>,
}

impl Population {
    #[must_use]
    pub fn new(crs: Option<String>) -> Self {
        Population {
            crs,
            people: IndexMap::new(),
        }
    }

    /// Adds `person`. A person with the same id is replaced in place.
    pub fn add_person(&mut self, person: Person) {
        self.people.insert(person.id, person);
    }

    #[must_use]
    pub fn get_person(&self, person_id: PersonId) -> Option<&Person> {
        self.people.get(&person_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Number of people with the given attribute values.
    #[must_use]
    pub fn count(&self, employed: Employment, dap: DailyActivityPattern) -> usize {
        self.iter()
            .filter(|person| person.employed == employed && person.dap == dap)
            .count()
    }
}

define_data_plugin!(PopulationPlugin, Population, Population::default());

pub trait ContextPeopleExt {
    /// The id the next added person will get.
    fn next_person_id(&self) -> PersonId;

    fn add_person(&mut self, person: Person);

    /// Records the reference system the population's coordinates are expressed in.
    fn set_population_crs(&mut self, crs: Option<String>);

    fn get_population(&self) -> Option<&Population>;

    fn get_current_population(&self) -> usize {
        self.get_population().map_or(0, Population::len)
    }
}

impl ContextPeopleExt for Context {
    fn next_person_id(&self) -> PersonId {
        PersonId(self.get_current_population())
    }

    fn add_person(&mut self, person: Person) {
        self.get_data_mut(PopulationPlugin).add_person(person);
    }

    fn set_population_crs(&mut self, crs: Option<String>) {
        self.get_data_mut(PopulationPlugin).crs = crs;
    }

    fn get_population(&self) -> Option<&Population> {
        self.get_data(PopulationPlugin)
    }
}
