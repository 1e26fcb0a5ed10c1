use rand::rand_core::impls::fill_bytes_via_next;
use rand::{RngCore, SeedableRng};

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// The 48-bit linear congruential generator of `java.util.Random`.
///
/// Populations are published alongside the seed that produced them, so the generator reproduces
/// the reference stream exactly: the same seed yields the same uniform draws bit for bit, and the
/// same Gaussian draws up to the last ulp of the platform's `ln`.
#[derive(Clone, Debug)]
pub struct JavaRandom {
    state: u64,
    next_next_gaussian: Option<f64>,
}

impl JavaRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        JavaRandom {
            state: (seed ^ MULTIPLIER) & MASK,
            next_next_gaussian: None,
        }
    }

    /// Advances the state and returns its top `bits` bits as a signed 32-bit value.
    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self, bits: u32) -> i32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(ADDEND)
            & MASK;
        (self.state >> (48 - bits)) as i32
    }

    /// A uniform draw from `[0, 1)` with 53 bits of precision.
    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        let high = self.next(26) as u64;
        let low = self.next(27) as u64;
        ((high << 27) + low) as f64 * DOUBLE_UNIT
    }

    /// A standard normal draw using the polar method. Each accepted pair yields two values; the
    /// second is returned by the following call.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(gaussian) = self.next_next_gaussian.take() {
            return gaussian;
        }
        loop {
            let v1 = 2.0 * self.next_f64() - 1.0;
            let v2 = 2.0 * self.next_f64() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                let multiplier = (-2.0 * s.ln() / s).sqrt();
                self.next_next_gaussian = Some(v2 * multiplier);
                return v1 * multiplier;
            }
        }
    }
}

impl RngCore for JavaRandom {
    #[allow(clippy::cast_sign_loss)]
    fn next_u32(&mut self) -> u32 {
        self.next(32) as u32
    }

    #[allow(clippy::cast_sign_loss)]
    fn next_u64(&mut self) -> u64 {
        let high = i64::from(self.next(32)) << 32;
        high.wrapping_add(i64::from(self.next(32))) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_via_next(self, dst);
    }
}

impl SeedableRng for JavaRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        JavaRandom::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        JavaRandom::new(state)
    }
}
