/// ANSI C linear congruential generator.
///
/// The same recurrence classic C libraries use for `rand`:
/// `state = state * 1103515245 + 12345 (mod 2^32)`, output
/// `(state / 65536) % 32768`. The draw order is fully determined by the
/// seed, which is what makes recorded games replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Counterpart of `srand`: restarts the sequence from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Counterpart of `rand`: advances the state and returns the next
    /// value in `0..32768`.
    pub fn next_value(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345);
        (self.state / 65_536) % 32_768
    }

    /// The classic `rand() % n` draw.
    pub fn next_below(&mut self, n: u32) -> u32 {
        self.next_value() % n
    }
}
