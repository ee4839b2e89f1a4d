/// Per-frame press source for the random search. xorshift32 underneath, so a
/// seed produces the same press pattern on every platform.
#[derive(Clone, Copy, Debug)]
pub struct PressRng {
    state: u32,
}

/// Replaces a zero seed, which would lock xorshift at zero forever.
pub const ZERO_SEED_FALLBACK: u32 = 0xDEAD_BEEF;

impl PressRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { ZERO_SEED_FALLBACK } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Draws one frame's press decision: true with probability
    /// `permille / 1000`. Values above 1000 always press.
    pub fn press(&mut self, permille: u32) -> bool {
        let roll = (u64::from(self.next_u32()) * 1000) >> 32;
        roll < u64::from(permille)
    }
}
