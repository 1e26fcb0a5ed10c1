use std::cell::RefMut;

use log::trace;
use rand::SeedableRng;

use crate::context::Context;
use crate::random::{JavaRandom, RngPlugin};

/// Gets a mutable reference to the random stream, creating it from the base seed on first use.
/// Note that this will panic if `init_random` was not called yet.
fn get_rng(context: &Context) -> RefMut<JavaRandom> {
    let data_container = context
        .get_data(RngPlugin)
        .expect("You must initialize the random number generator with a base seed");

    let rng = data_container.rng.try_borrow_mut().unwrap();
    RefMut::map(rng, |rng| {
        rng.get_or_insert_with(|| {
            trace!("creating random stream (seed={})", data_container.base_seed);
            JavaRandom::seed_from_u64(data_container.base_seed)
        })
    })
}

// This is a trait extension on Context for
// random number generation functionality.
pub trait ContextRandomExt {
    /// Initializes the `RngPlugin` data container with a base seed. Any existing stream is
    /// dropped so that the next draw starts from the beginning of the new seed's sequence.
    fn init_random(&mut self, base_seed: u64);

    /// Returns the seed the stream was initialized with, if any.
    fn get_base_seed(&self) -> Option<u64>;

    /// Runs `sampler` against the random stream.
    fn sample<T>(&self, sampler: impl FnOnce(&mut JavaRandom) -> T) -> T;

    /// One uniform draw from `[0, 1)`.
    fn sample_uniform(&self) -> f64 {
        self.sample(JavaRandom::next_f64)
    }

    /// One standard normal draw.
    fn sample_gaussian(&self) -> f64 {
        self.sample(JavaRandom::next_gaussian)
    }
}

impl ContextRandomExt for Context {
    fn init_random(&mut self, base_seed: u64) {
        trace!("initializing random module");
        let data_container = self.get_data_mut(RngPlugin);
        data_container.base_seed = base_seed;

        // Clear any existing stream to ensure it gets re-seeded on the next draw
        data_container.rng.try_borrow_mut().unwrap().take();
    }

    fn get_base_seed(&self) -> Option<u64> {
        self.get_data(RngPlugin)
            .map(|data_container| data_container.base_seed)
    }

    fn sample<T>(&self, sampler: impl FnOnce(&mut JavaRandom) -> T) -> T {
        let mut rng = get_rng(self);
        sampler(&mut *rng)
    }
}
