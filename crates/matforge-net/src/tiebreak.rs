//! Seeded targets for the tie-break objective.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Draws one uniform target in `[0, q)` per unknown.
///
/// The stream depends only on the seed and the number of draws so far, so a
/// construction replays exactly under the same seed.
#[derive(Debug, Clone)]
pub struct TieBreakSampler {
    rng: StdRng,
    draws: u64,
}

impl TieBreakSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Uniform value in `[0, order)`.
    pub fn sample(&mut self, order: u32) -> i64 {
        self.draws += 1;
        i64::from(self.rng.gen_range(0..order.max(1)))
    }

    /// Discard `count` raw engine draws (one `u32` each).
    ///
    /// These are not samples: one `sample` may consume more than one draw.
    pub fn burn_in(&mut self, count: u64) {
        for _ in 0..count {
            self.rng.next_u32();
        }
        self.draws += count;
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = TieBreakSampler::new(133_742);
        let mut b = TieBreakSampler::new(133_742);
        let left: Vec<_> = (0..32).map(|_| a.sample(7)).collect();
        let right: Vec<_> = (0..32).map(|_| b.sample(7)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|value| (0..7).contains(value)));
        assert_eq!(a.draws(), 32);
    }

    #[test]
    fn burn_in_shifts_the_stream() {
        let mut plain = TieBreakSampler::new(1);
        let mut burned = TieBreakSampler::new(1);
        burned.burn_in(5);
        let plain: Vec<_> = (0..16).map(|_| plain.sample(1 << 20)).collect();
        let burned: Vec<_> = (0..16).map(|_| burned.sample(1 << 20)).collect();
        assert_ne!(plain, burned);
    }

    #[test]
    fn burn_in_discards_raw_engine_draws() {
        let mut sampler = TieBreakSampler::new(5);
        sampler.burn_in(3);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..3 {
            rng.next_u32();
        }
        let expected: Vec<i64> = (0..8).map(|_| i64::from(rng.gen_range(0..7u32))).collect();
        let actual: Vec<i64> = (0..8).map(|_| sampler.sample(7)).collect();
        assert_eq!(actual, expected);
        assert_eq!(sampler.draws(), 11);
    }
}
