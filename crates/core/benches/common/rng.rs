/// Deterministic jitter source for synthetic grids.
#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform integer in `[-spread, spread]`.
    pub fn jitter(&mut self, spread: i64) -> i64 {
        if spread <= 0 {
            return 0;
        }
        let width = (2 * spread + 1) as u64;
        (self.next_u64() % width) as i64 - spread
    }
}
