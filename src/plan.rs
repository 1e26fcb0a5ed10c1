//! A person's one-day plan: an alternating chain of activities and the trips between them.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::geo::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Home,
    Work,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Car,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub activity_type: ActivityType,
    pub coord: Coord,
    /// Seconds since midnight. Absent only on the last activity of a plan.
    pub end_time: Option<f64>,
}

impl Activity {
    #[must_use]
    pub fn new(activity_type: ActivityType, coord: Coord) -> Self {
        Activity {
            activity_type,
            coord,
            end_time: None,
        }
    }

    #[must_use]
    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanElement {
    Activity(Activity),
    Trip(Trip),
}

impl PlanElement {
    #[must_use]
    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            PlanElement::Activity(activity) => Some(activity),
            PlanElement::Trip(_) => None,
        }
    }

    #[must_use]
    pub fn is_trip(&self) -> bool {
        matches!(self, PlanElement::Trip(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    elements: Vec<PlanElement>,
}

impl Plan {
    #[must_use]
    pub fn new() -> Self {
        Plan::default()
    }

    pub fn add_activity(&mut self, activity: Activity) {
        self.elements.push(PlanElement::Activity(activity));
    }

    pub fn add_trip(&mut self, mode: Mode) {
        self.elements.push(PlanElement::Trip(Trip { mode }));
    }

    #[must_use]
    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.elements.iter().filter_map(PlanElement::as_activity)
    }

    #[must_use]
    pub fn trip_count(&self) -> usize {
        self.elements.iter().filter(|element| element.is_trip()).count()
    }

    /// The first activity of the plan, which is always at home for a valid plan.
    #[must_use]
    pub fn first_activity(&self) -> Option<&Activity> {
        self.elements.first().and_then(PlanElement::as_activity)
    }

    /// Checks the structural invariant every exported plan has to satisfy: activities and trips
    /// strictly alternate, the plan starts and ends with a home activity, and every activity but
    /// the last has an end time.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let last = self.elements.len().checked_sub(1).ok_or("plan is empty")?;
        if self.elements[last].is_trip() {
            return Err("plan ends with a trip".to_string());
        }
        for (index, element) in self.elements.iter().enumerate() {
            match element {
                PlanElement::Trip(_) if index % 2 == 0 => {
                    return Err(format!("element {index} is a trip, expected an activity"));
                }
                PlanElement::Activity(_) if index % 2 == 1 => {
                    return Err(format!("element {index} is an activity, expected a trip"));
                }
                PlanElement::Activity(activity) => {
                    if (index == 0 || index == last) && activity.activity_type != ActivityType::Home
                    {
                        return Err(format!(
                            "element {index} is a {} activity, expected home",
                            activity.activity_type
                        ));
                    }
                    match (index == last, activity.end_time) {
                        (true, Some(_)) => {
                            return Err("the last activity has an end time".to_string());
                        }
                        (false, None) => {
                            return Err(format!("activity {index} has no end time"));
                        }
                        _ => {}
                    }
                }
                PlanElement::Trip(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn home() -> Activity {
        Activity::new(ActivityType::Home, Coord::new(1.0, 2.0))
    }

    fn work_tour() -> Plan {
        let mut plan = Plan::new();
        plan.add_activity(home().with_end_time(25_200.0));
        plan.add_trip(Mode::Car);
        plan.add_activity(
            Activity::new(ActivityType::Work, Coord::new(3.0, 4.0)).with_end_time(61_200.0),
        );
        plan.add_trip(Mode::Car);
        plan.add_activity(home());
        plan
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(ActivityType::Other.to_string(), "other");
        assert_eq!(ActivityType::from_str("work").unwrap(), ActivityType::Work);
        assert_eq!(Mode::Car.to_string(), "car");
        assert_eq!(Mode::from_str("car").unwrap(), Mode::Car);
        assert!(ActivityType::from_str("shop").is_err());
    }

    #[test]
    fn valid_plans() {
        let mut home_only = Plan::new();
        home_only.add_activity(home());
        assert_eq!(home_only.validate(), Ok(()));

        let plan = work_tour();
        assert_eq!(plan.validate(), Ok(()));
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.trip_count(), 2);
        assert_eq!(plan.activities().count(), 3);
        assert_eq!(plan.first_activity().unwrap().end_time, Some(25_200.0));
    }

    #[test]
    fn empty_plan_is_invalid() {
        assert_eq!(Plan::new().validate(), Err("plan is empty".to_string()));
    }

    #[test]
    fn trailing_trip_is_invalid() {
        let mut plan = Plan::new();
        plan.add_activity(home().with_end_time(0.0));
        plan.add_trip(Mode::Car);
        assert_eq!(plan.validate(), Err("plan ends with a trip".to_string()));
    }

    #[test]
    fn leading_trip_is_invalid() {
        let mut plan = Plan::new();
        plan.add_trip(Mode::Car);
        plan.add_activity(home());
        assert_eq!(
            plan.validate(),
            Err("element 0 is a trip, expected an activity".to_string())
        );
    }

    #[test]
    fn consecutive_activities_are_invalid() {
        let mut plan = Plan::new();
        plan.add_activity(home().with_end_time(0.0));
        plan.add_activity(home());
        assert_eq!(
            plan.validate(),
            Err("element 1 is an activity, expected a trip".to_string())
        );
    }

    #[test]
    fn plan_must_end_at_home() {
        let mut plan = Plan::new();
        plan.add_activity(home().with_end_time(0.0));
        plan.add_trip(Mode::Car);
        plan.add_activity(Activity::new(ActivityType::Work, Coord::new(0.0, 0.0)));
        assert_eq!(
            plan.validate(),
            Err("element 2 is a work activity, expected home".to_string())
        );
    }

    #[test]
    fn end_times_required_except_last() {
        let mut plan = work_tour();
        plan.elements[2] = PlanElement::Activity(Activity::new(
            ActivityType::Work,
            Coord::new(3.0, 4.0),
        ));
        assert_eq!(
            plan.validate(),
            Err("activity 2 has no end time".to_string())
        );

        let mut plan = work_tour();
        plan.elements[4] = PlanElement::Activity(home().with_end_time(80_000.0));
        assert_eq!(
            plan.validate(),
            Err("the last activity has an end time".to_string())
        );
    }
}
