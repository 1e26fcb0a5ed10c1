//! The single random stream shared by every sampling step of a generation run.
//!
//! Draw order is part of the output contract: for a fixed seed, the population only comes out the
//! same if every sampler consumes the stream in the same sequence. The stream is therefore stored
//! once in the `Context` and handed out one borrow at a time.
mod context_ext;
mod java_random;

use std::cell::RefCell;

pub use context_ext::ContextRandomExt;
pub use java_random::JavaRandom;

use crate::define_data_plugin;

/// Seed of the reference scenario.
pub const DEFAULT_SEED: u64 = 15;

struct RngData {
    base_seed: u64,
    rng: RefCell<Option<JavaRandom>>,
}

// Registers a data container which stores:
// * base_seed: The seed the stream was (or will be) created with
// * rng: The stream itself, created lazily on first use. Note that this is stored in a RefCell
//   to allow for mutable borrow without requiring a mutable borrow of the Context itself.
define_data_plugin!(
    RngPlugin,
    RngData,
    RngData {
        base_seed: 0,
        rng: RefCell::new(None),
    }
);
