//! Uniform random draws for round resolution
//!
//! Engines never touch an RNG directly. They pull `[0, 1)` values from a
//! [`DrawSource`], so a round can be replayed from a seed or scripted in tests.

use crate::errors::ConfigurationError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

/// Source of independent uniform draws in `[0, 1)`.
pub trait DrawSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, n)`. Returns 0 when `n == 0`.
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let index = (self.next_unit() * n as f64).floor() as usize;
        index.min(n - 1)
    }
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<D: DrawSource + ?Sized> DrawSource for Box<D> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Draws from a `rand` generator, OS-seeded by default.
pub struct RngDraws {
    rng: StdRng,
}

impl RngDraws {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DrawSource for RngDraws {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// SHA-256 hash chain keyed by a seed. The same seed always yields the same
/// sequence, which lets a session be replayed from the hex seed it prints.
#[derive(Clone)]
pub struct HashChainDraws {
    seed: [u8; 32],
    state: [u8; 32],
    offset: usize,
}

impl HashChainDraws {
    pub fn new(seed: [u8; 32]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        Self {
            seed,
            state: hasher.finalize().into(),
            offset: 0,
        }
    }

    /// Fresh random seed.
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill(&mut seed);
        Self::new(seed)
    }

    /// Parse a 64-character hex seed.
    pub fn from_hex(seed_hex: &str) -> Result<Self, ConfigurationError> {
        let bytes = hex::decode(seed_hex.trim())?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| ConfigurationError::SeedLength(bytes.len()))?;
        Ok(Self::new(seed))
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    fn next_u64(&mut self) -> u64 {
        if self.offset + 8 > self.state.len() {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(self.state);
            self.state = hasher.finalize().into();
            self.offset = 0;
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.state[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(word)
    }
}

impl DrawSource for HashChainDraws {
    fn next_unit(&mut self) -> f64 {
        // 53 high bits fill an f64 mantissa exactly
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws, then falls back to 0.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    queue: VecDeque<f64>,
}

impl ScriptedDraws {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: f64) {
        self.queue.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DrawSource for ScriptedDraws {
    fn next_unit(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(0.0).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_chain_deterministic() {
        let mut a = HashChainDraws::new([7u8; 32]);
        let mut b = HashChainDraws::new([7u8; 32]);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_hash_chain_different_seeds() {
        let mut a = HashChainDraws::new([1u8; 32]);
        let mut b = HashChainDraws::new([2u8; 32]);

        let seq_a: Vec<f64> = (0..10).map(|_| a.next_unit()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.next_unit()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_hash_chain_hex_round_trip() {
        let draws = HashChainDraws::new([0xab; 32]);
        let replay = HashChainDraws::from_hex(&draws.seed_hex()).expect("valid seed");
        assert_eq!(replay.seed_hex(), draws.seed_hex());

        assert!(matches!(
            HashChainDraws::from_hex("zz"),
            Err(ConfigurationError::SeedNotHex(_))
        ));
        assert!(matches!(
            HashChainDraws::from_hex("abcd"),
            Err(ConfigurationError::SeedLength(2))
        ));
    }

    #[test]
    fn test_units_in_range() {
        let mut hash = HashChainDraws::random();
        let mut rng = RngDraws::seeded(42);
        for _ in 0..1000 {
            let h = hash.next_unit();
            let r = rng.next_unit();
            assert!((0.0..1.0).contains(&h));
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_next_index_bounded() {
        let mut rng = RngDraws::seeded(9);
        for _ in 0..1000 {
            assert!(rng.next_index(37) < 37);
        }
        assert_eq!(rng.next_index(0), 0);
    }

    #[test]
    fn test_scripted_draws() {
        let mut draws = ScriptedDraws::new([0.25, 0.999_999]);
        assert_eq!(draws.next_index(4), 1);
        assert_eq!(draws.next_index(4), 3);
        assert_eq!(draws.remaining(), 0);
        assert_eq!(draws.next_unit(), 0.0);

        let mut edge = ScriptedDraws::new([1.0]);
        assert_eq!(edge.next_index(37), 36);

        edge.push(0.5);
        assert_eq!(edge.remaining(), 1);
        assert_eq!(edge.next_unit(), 0.5);
    }
}
