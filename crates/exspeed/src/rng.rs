//! The pseudo-random stream shared by the generated programs and the model.
//!
//! Both emitted programs include the same SplitMix64 implementation through
//! the shared interface header, so the sequence of branch and failure
//! decisions does not depend on the platform's `random()`. [`SplitMix64`] is
//! the Rust twin of that header code and must stay in lockstep with
//! [`c_prelude`].

use rand::{RngCore, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const MIX_1: u64 = 0xBF58_476D_1CE4_E5B9;
const MIX_2: u64 = 0x94D0_49BB_1331_11EB;

/// Name of the generator state variable in the emitted code.
pub const STATE_SYMBOL: &str = "exspeed_rng_state";
/// Name of the draw function in the emitted code.
pub const NEXT_SYMBOL: &str = "exspeed_next";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform draw in `0..bound` using the same `% bound` reduction as the
    /// generated code.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(MIX_1);
        z = (z ^ (z >> 27)).wrapping_mul(MIX_2);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Header fragment declaring the generator state and defining the draw
/// function. Valid as both C99 and C++11.
pub fn c_prelude() -> String {
    format!(
        "#include <stdint.h>\n\
         \n\
         extern uint64_t {state};\n\
         \n\
         static inline uint64_t {next}(void) {{\n\
         \x20   uint64_t z = ({state} += UINT64_C(0x{gamma:016X}));\n\
         \x20   z = (z ^ (z >> 30)) * UINT64_C(0x{mix1:016X});\n\
         \x20   z = (z ^ (z >> 27)) * UINT64_C(0x{mix2:016X});\n\
         \x20   return z ^ (z >> 31);\n\
         }}\n",
        state = STATE_SYMBOL,
        next = NEXT_SYMBOL,
        gamma = GOLDEN_GAMMA,
        mix1 = MIX_1,
        mix2 = MIX_2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        let mut rng = SplitMix64::new(0);
        assert_eq!(rng.next_u64(), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn test_seed_from_u64_is_raw_state() {
        let mut a = SplitMix64::seed_from_u64(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = SplitMix64::new(42);
        for _ in 0..1000 {
            assert!(rng.below(5) < 5);
            assert!(rng.below(100) < 100);
        }
    }

    #[test]
    fn test_prelude_carries_constants() {
        let text = c_prelude();
        assert!(text.contains("extern uint64_t exspeed_rng_state;"));
        assert!(text.contains("UINT64_C(0x9E3779B97F4A7C15)"));
        assert!(text.contains("UINT64_C(0xBF58476D1CE4E5B9)"));
        assert!(text.contains("UINT64_C(0x94D049BB133111EB)"));
        assert!(text.contains("static inline uint64_t exspeed_next(void)"));
    }
}
