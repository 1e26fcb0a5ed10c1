//! Builds a person's plan from their daily activity pattern.
//!
//! Every branch is a total function of the draws it takes from the random stream. The order of
//! those draws is fixed: a location is always drawn before the end time of the activity at that
//! location.
use crate::context::Context;
use crate::geo::Coord;
use crate::people::DailyActivityPattern;
use crate::plan::{Activity, ActivityType, Mode, Plan};
use crate::random::ContextRandomExt;
use crate::spatial::{ContextSpatialExt, CorridorDirection};
use crate::time::{hours, minutes, ContextTimeExt};

/// Everyone drives.
const MODE: Mode = Mode::Car;

// Work location choice: corridor northbound, corridor southbound, otherwise in the home region
const WORK_NORTHBOUND: f64 = 0.5;
const WORK_SOUTHBOUND: f64 = 0.5 + 0.3;
const OTHER_AFTER_WORK: f64 = 0.5;

// Discretionary stop choice: home region, corridor northbound, otherwise corridor southbound
const STOP_HOME_REGION: f64 = 0.6;
const STOP_NORTHBOUND: f64 = 0.6 + 0.25;

pub trait ContextActivityModelExt {
    /// Assembles the plan for a person with pattern `dap`, drawing their home location first.
    fn assemble_plan(&self, dap: DailyActivityPattern) -> Plan;
}

impl ContextActivityModelExt for Context {
    fn assemble_plan(&self, dap: DailyActivityPattern) -> Plan {
        let home = self.jittered_home_coordinate();
        match dap {
            DailyActivityPattern::H => home_only(home),
            DailyActivityPattern::W => work_tour(self, home),
            DailyActivityPattern::N => discretionary_tour(self, home),
        }
    }
}

fn home_only(home: Coord) -> Plan {
    let mut plan = Plan::new();
    plan.add_activity(Activity::new(ActivityType::Home, home));
    plan
}

fn work_tour(context: &Context, home: Coord) -> Plan {
    let mut plan = Plan::new();
    plan.add_activity(
        Activity::new(ActivityType::Home, home)
            .with_end_time(context.anchored_time(hours(7.0), minutes(30.0))),
    );
    plan.add_trip(MODE);

    let draw = context.sample_uniform();
    let work = if draw < WORK_NORTHBOUND {
        context.anchor_coordinate(CorridorDirection::Northbound)
    } else if draw < WORK_SOUTHBOUND {
        context.anchor_coordinate(CorridorDirection::Southbound)
    } else {
        context.jittered_home_coordinate()
    };
    plan.add_activity(
        Activity::new(ActivityType::Work, work)
            .with_end_time(context.anchored_time(hours(17.0), minutes(30.0))),
    );
    plan.add_trip(MODE);

    if context.sample_uniform() < OTHER_AFTER_WORK {
        let other = context.jittered_home_coordinate();
        plan.add_activity(
            Activity::new(ActivityType::Other, other)
                .with_end_time(context.anchored_time(hours(18.0), minutes(4.0))),
        );
        plan.add_trip(MODE);
    }

    plan.add_activity(Activity::new(ActivityType::Home, home));
    plan
}

fn discretionary_tour(context: &Context, home: Coord) -> Plan {
    let mut plan = Plan::new();
    plan.add_activity(
        Activity::new(ActivityType::Home, home)
            .with_end_time(context.anchored_time(hours(8.0), hours(2.0))),
    );
    plan.add_trip(MODE);

    // Always a single stop; the draw is consumed to keep the stream aligned
    let _stop_count = context.sample_uniform();
    plan.add_activity(discretionary_stop(context));
    plan.add_trip(MODE);

    plan.add_activity(Activity::new(ActivityType::Home, home));
    plan
}

fn discretionary_stop(context: &Context) -> Activity {
    let draw = context.sample_uniform();
    if draw < STOP_HOME_REGION {
        let coord = context.jittered_home_coordinate();
        Activity::new(ActivityType::Other, coord)
            .with_end_time(context.anchored_time(hours(12.0), hours(1.0)))
    } else if draw < STOP_NORTHBOUND {
        Activity::new(
            ActivityType::Other,
            context.anchor_coordinate(CorridorDirection::Northbound),
        )
        .with_end_time(context.anchored_time(hours(17.0), hours(3.0)))
    } else {
        Activity::new(
            ActivityType::Other,
            context.anchor_coordinate(CorridorDirection::Southbound),
        )
        .with_end_time(context.anchored_time(hours(21.0), hours(1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ContextTransformationExt;
    use crate::plan::PlanElement;
    use crate::spatial::ANCHORS;

    fn context(seed: u64) -> Context {
        let mut context = Context::new();
        context.init_random(seed);
        context.init_coordinate_transformation("EPSG:2849").unwrap();
        context
    }

    fn activity(plan: &Plan, index: usize) -> &Activity {
        plan.elements()[index].as_activity().unwrap()
    }

    #[test]
    fn home_only_plan() {
        let context = context(1);
        let plan = context.assemble_plan(DailyActivityPattern::H);
        assert_eq!(plan.len(), 1);
        assert_eq!(activity(&plan, 0).activity_type, ActivityType::Home);
        assert_eq!(activity(&plan, 0).end_time, None);
        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn home_only_still_draws_home() {
        let context = context(1);
        context.assemble_plan(DailyActivityPattern::H);

        let reference = self::context(1);
        reference.sample_uniform(); // longitude
        reference.sample_uniform(); // latitude
        assert_eq!(context.sample_uniform(), reference.sample_uniform());
    }

    #[test]
    fn work_tours_are_well_formed() {
        let context = context(7);
        for _ in 0..500 {
            let plan = context.assemble_plan(DailyActivityPattern::W);
            assert!(plan.len() == 5 || plan.len() == 7);
            assert_eq!(plan.validate(), Ok(()));
            assert_eq!(activity(&plan, 2).activity_type, ActivityType::Work);
            if plan.len() == 7 {
                assert_eq!(activity(&plan, 4).activity_type, ActivityType::Other);
            }
            assert_eq!(activity(&plan, 0).coord, activity(&plan, plan.len() - 1).coord);
            assert!(plan.elements().iter().all(|element| match element {
                PlanElement::Trip(trip) => trip.mode == Mode::Car,
                PlanElement::Activity(_) => true,
            }));
        }
    }

    #[test]
    fn work_tour_uses_every_work_location() {
        let context = context(8);
        let mut northbound = 0;
        let mut southbound = 0;
        let mut region = 0;
        for _ in 0..1000 {
            let plan = context.assemble_plan(DailyActivityPattern::W);
            let work = activity(&plan, 2).coord;
            if work == ANCHORS.northbound {
                northbound += 1;
            } else if work == ANCHORS.southbound {
                southbound += 1;
            } else {
                region += 1;
            }
        }
        assert!((400..600).contains(&northbound));
        assert!((220..380).contains(&southbound));
        assert!((120..280).contains(&region));
    }

    #[test]
    fn discretionary_tours_have_a_single_stop() {
        let context = context(9);
        for _ in 0..500 {
            let plan = context.assemble_plan(DailyActivityPattern::N);
            assert_eq!(plan.len(), 5);
            assert_eq!(plan.validate(), Ok(()));
            assert_eq!(activity(&plan, 2).activity_type, ActivityType::Other);
        }
    }

    #[test]
    fn discretionary_tour_draw_order() {
        // Replay the stream by hand and compare with the assembled plan.
        let context = context(12);
        let plan = context.assemble_plan(DailyActivityPattern::N);

        let reference = self::context(12);
        let home = reference.jittered_home_coordinate();
        let home_end = reference.anchored_time(hours(8.0), hours(2.0));
        reference.sample_uniform(); // stop count
        let stop = discretionary_stop(&reference);

        assert_eq!(activity(&plan, 0).coord, home);
        assert_eq!(activity(&plan, 0).end_time, Some(home_end));
        assert_eq!(*activity(&plan, 2), stop);
        assert_eq!(context.sample_uniform(), reference.sample_uniform());
    }
}
