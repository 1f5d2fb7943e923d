//! Injectable randomness for variant picks, quote picks and volume jitter.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Source of random choices used by target generation, quote lookup and the
/// effects player.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is always at least 1.
    fn next_index(&mut self, len: usize) -> usize;

    /// Uniform value in `0.0..1.0`.
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for StdRng {
    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len.max(1))
    }

    fn next_unit(&mut self) -> f32 {
        self.gen_range(0.0..1.0)
    }
}

/// Entropy-seeded generator (browser `crypto.getRandomValues` on wasm32).
pub fn entropy() -> Box<dyn RandomSource> {
    Box::new(StdRng::from_entropy())
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Index draws are reduced modulo the requested length so a script can be
/// reused across tables of different sizes. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: Vec<usize>,
    units: Vec<f32>,
    next_idx: usize,
    next_unit: usize,
}

impl ScriptedRandom {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self {
            indices: indices.into(),
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: impl Into<Vec<f32>>) -> Self {
        self.units = units.into();
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() || len == 0 {
            return 0;
        }
        let v = self.indices[self.next_idx % self.indices.len()];
        self.next_idx += 1;
        v % len
    }

    fn next_unit(&mut self) -> f32 {
        if self.units.is_empty() {
            return 0.0;
        }
        let v = self.units[self.next_unit % self.units.len()];
        self.next_unit += 1;
        v.clamp(0.0, 0.999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_cycles_and_wraps_to_len() {
        let mut r = ScriptedRandom::new(vec![0, 4, 7]);
        assert_eq!(r.next_index(6), 0);
        assert_eq!(r.next_index(6), 4);
        assert_eq!(r.next_index(6), 1);
        assert_eq!(r.next_index(6), 0);
    }

    #[test]
    fn scripted_empty_is_zero() {
        let mut r = ScriptedRandom::default();
        assert_eq!(r.next_index(10), 0);
        assert_eq!(r.next_unit(), 0.0);
    }

    #[test]
    fn seeded_stays_in_range() {
        let mut r = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(r.next_index(6) < 6);
            let u = r.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
