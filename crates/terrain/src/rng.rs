/// Seed-and-coordinate derived pseudorandom source.
///
/// [`SeedRng::derive`] is a pure function: every call builds a fresh generator
/// from the mixed seed, so results do not depend on call order.
#[derive(Debug, Clone)]
pub struct SeedRng {
    state: u64,
}

const MIX_I: u64 = 0x9e37_79b9_7f4a_7c15;
const MIX_J: u64 = 0xc2b2_ae3d_27d4_eb4f;
const MIX_SEED: u64 = 0x1656_67b1_9e37_79f9;

impl SeedRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Combine a seed with grid coordinates using large odd multipliers.
    pub fn mix(seed: u64, i: i64, j: i64) -> u64 {
        let a = seed.wrapping_mul(MIX_SEED);
        let b = (i as u64).wrapping_mul(MIX_I);
        let c = (j as u64).wrapping_mul(MIX_J);
        a ^ b.rotate_left(17) ^ c.rotate_left(31)
    }

    /// Uniform deviate in `[0, 1)` for cell `(i, j)` of world `seed`.
    pub fn derive(seed: u64, i: i64, j: i64) -> f64 {
        SeedRng::new(Self::mix(seed, i, j)).next_f64()
    }

    /// Advance the state and return the next 64 random bits.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Next uniform deviate in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}
