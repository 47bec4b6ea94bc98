//! Deterministic random source.
//!
//! Every decision made while mutating or serializing a tree is drawn from a
//! [`MinStdRand`], the "minimal standard" Lehmer generator
//! (`x' = 48271 * x mod (2^31 - 1)`). Reseeding with the same fuzzer-supplied
//! integer replays the exact same stream, which is what makes a fuzzing
//! iteration reproducible and bisectable.

use rand::{RngCore, SeedableRng};

/// Modulus of the generator, the Mersenne prime `2^31 - 1`.
pub const MODULUS: u64 = 2_147_483_647;

/// Multiplier of the generator.
pub const MULTIPLIER: u64 = 48_271;

/// Seeded linear-congruential engine producing an unsigned integer stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinStdRand {
    state: u64,
}

impl MinStdRand {
    /// Creates a generator from a fuzzer-supplied seed.
    ///
    /// A seed congruent to zero would lock the generator at zero, so it is
    /// replaced by one.
    pub fn new(seed: u32) -> Self {
        let state = u64::from(seed) % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Returns the next value of the stream, always in `1..2^31 - 1`.
    pub fn draw(&mut self) -> u32 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        // state < 2^31, so the narrowing is lossless.
        self.state as u32
    }

    /// Fills `buffer` with bytes drawn from the stream.
    ///
    /// Used to expand a single seed into an `arbitrary::Unstructured` input.
    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; len];
        self.fill_bytes(&mut buffer);
        buffer
    }
}

impl RngCore for MinStdRand {
    fn next_u32(&mut self) -> u32 {
        self.draw()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.draw());
        let low = u64::from(self.draw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.draw().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinStdRand {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_outputs_match_minstd() {
        // Reference values of std::minstd_rand seeded with 1.
        let mut rng = MinStdRand::new(1);
        assert_eq!(rng.draw(), 48_271);
        assert_eq!(rng.draw(), 182_605_794);
        assert_eq!(rng.draw(), 1_291_394_886);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut zero = MinStdRand::new(0);
        let mut one = MinStdRand::new(1);
        assert_eq!(zero.draw(), one.draw());
    }

    #[test]
    fn test_seed_congruent_to_modulus() {
        let mut rng = MinStdRand::new(MODULUS as u32);
        assert_ne!(rng.draw(), 0);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = MinStdRand::new(0xdead_beef);
        let mut b = MinStdRand::new(0xdead_beef);
        for _ in 0..1000 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunks() {
        let mut rng = MinStdRand::new(7);
        let bytes = rng.bytes(7);
        assert_eq!(bytes.len(), 7);

        let mut replay = MinStdRand::new(7);
        let first = replay.draw().to_le_bytes();
        assert_eq!(&bytes[..4], &first);
    }

    #[test]
    fn test_seedable_from_le_bytes() {
        let mut a = MinStdRand::from_seed(42u32.to_le_bytes());
        let mut b = MinStdRand::new(42);
        assert_eq!(a.next_u32(), b.next_u32());
    }
}
