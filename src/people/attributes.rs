//! Draws a person's employment status and daily activity pattern.
use crate::context::Context;
use crate::people::{DailyActivityPattern, Employment};
use crate::random::ContextRandomExt;

/// Share of the population that is employed.
pub const WORKER_SHARE: f64 = 0.42;

/// Cumulative thresholds `(W, W + N)` of the activity pattern distribution, by employment.
#[must_use]
pub fn dap_thresholds(employed: Employment) -> (f64, f64) {
    match employed {
        Employment::Worker => (0.63, 0.63 + 0.285),
        Employment::NonWorker => (0.165, 0.165 + 0.605),
    }
}

#[must_use]
pub fn employment_from_draw(draw: f64) -> Employment {
    if draw < WORKER_SHARE {
        Employment::Worker
    } else {
        Employment::NonWorker
    }
}

#[must_use]
pub fn dap_from_draw(employed: Employment, draw: f64) -> DailyActivityPattern {
    let (work, non_work) = dap_thresholds(employed);
    if draw < work {
        DailyActivityPattern::W
    } else if draw < non_work {
        DailyActivityPattern::N
    } else {
        DailyActivityPattern::H
    }
}

pub trait ContextAttributesExt {
    /// One uniform draw.
    fn sample_employment(&self) -> Employment;

    /// One uniform draw, conditioned on `employed`.
    fn sample_daily_activity_pattern(&self, employed: Employment) -> DailyActivityPattern;
}

impl ContextAttributesExt for Context {
    fn sample_employment(&self) -> Employment {
        employment_from_draw(self.sample_uniform())
    }

    fn sample_daily_activity_pattern(&self, employed: Employment) -> DailyActivityPattern {
        dap_from_draw(employed, self.sample_uniform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_threshold() {
        assert_eq!(employment_from_draw(0.0), Employment::Worker);
        assert_eq!(employment_from_draw(0.419_999), Employment::Worker);
        assert_eq!(employment_from_draw(0.42), Employment::NonWorker);
        assert_eq!(employment_from_draw(0.999), Employment::NonWorker);
    }

    #[test]
    fn worker_pattern_thresholds() {
        let worker = Employment::Worker;
        assert_eq!(dap_from_draw(worker, 0.629), DailyActivityPattern::W);
        assert_eq!(dap_from_draw(worker, 0.63), DailyActivityPattern::N);
        assert_eq!(dap_from_draw(worker, 0.914), DailyActivityPattern::N);
        assert_eq!(dap_from_draw(worker, 0.916), DailyActivityPattern::H);
    }

    #[test]
    fn non_worker_pattern_thresholds() {
        let non_worker = Employment::NonWorker;
        assert_eq!(dap_from_draw(non_worker, 0.164), DailyActivityPattern::W);
        assert_eq!(dap_from_draw(non_worker, 0.165), DailyActivityPattern::N);
        assert_eq!(dap_from_draw(non_worker, 0.769), DailyActivityPattern::N);
        assert_eq!(dap_from_draw(non_worker, 0.771), DailyActivityPattern::H);
    }

    #[test]
    fn first_person_of_reference_seed() {
        let mut context = Context::new();
        context.init_random(15);
        let employed = context.sample_employment();
        assert_eq!(employed, Employment::NonWorker);
        assert_eq!(
            context.sample_daily_activity_pattern(employed),
            DailyActivityPattern::W
        );
    }

    #[test]
    fn worker_share_over_large_sample() {
        let mut context = Context::new();
        context.init_random(2024);
        let n = 50_000;
        let workers = (0..n)
            .filter(|_| context.sample_employment() == Employment::Worker)
            .count();
        #[allow(clippy::cast_precision_loss)]
        let share = workers as f64 / f64::from(n);
        assert!((share - WORKER_SHARE).abs() < 0.01);
    }
}
