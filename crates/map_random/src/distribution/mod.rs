//! Distribution resolution and sampling.
//!
//! A distribution is addressed by a family name plus textual parameters, e.g.
//! `["gaussian", "10", "2"]`. [`DistributionCatalog`] turns such token lists into shared
//! [`Sampler`]s, memoized by signature, and [`Family`] enumerates what can be resolved.
use rand::RngCore;

pub mod catalog;
pub mod family;
pub mod model;

pub use catalog::{DistributionCatalog, Sampler, Signature};
pub use family::{Family, Overload};
pub use model::{Distribution, Draw, Pascal};

const F64_SCALE: f64 = 1.0 / (1u64 << 53) as f64;
const F64_OPEN_SCALE: f64 = 1.0 / (1u64 << 52) as f64;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * F64_SCALE
}

/// Generate a random float in the open range (0, 1).
#[inline]
pub(crate) fn rand_open01<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    ((rng.next_u64() >> 12) as f64 + 0.5) * F64_OPEN_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRng {
        value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one_for_max_input() {
        let mut rng = FixedRng { value: u64::MAX };
        let v = rand01(&mut rng);
        assert!(v < 1.0);
        assert!(v > 0.999_999);
    }

    #[test]
    fn rand_open01_excludes_both_ends() {
        let mut lo = FixedRng { value: 0 };
        let mut hi = FixedRng { value: u64::MAX };
        assert!(rand_open01(&mut lo) > 0.0);
        assert!(rand_open01(&mut hi) < 1.0);
    }

    #[test]
    fn rand01_midpoint_is_one_half() {
        let mut rng = FixedRng {
            value: u64::MAX / 2 + 1,
        };
        assert!((rand01(&mut rng) - 0.5).abs() < 1e-12);
    }
}
