//! Per-agent random streams for stochastic leaves.
//!
//! Not cryptographic. A stream is keyed by `(seed, agent, tick)`, so a tick
//! stays a pure function of its inputs and batch members never share state.

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `0..bound` by multiply-shift on the high word.
    ///
    /// `bound` must be non-zero.
    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        let high = self.next_u64() >> 32;
        ((high * u64::from(bound)) >> 32) as u32
    }

    /// Uniformly chosen element, `None` for an empty slice.
    fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        let len = u32::try_from(items.len()).ok().filter(|&n| n > 0)?;
        items.get(self.next_below(len) as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Stream of one agent at one tick of a seeded run.
    pub fn for_agent(seed: u64, agent_id: u64, tick: u64) -> Self {
        let agent = finalize(agent_id.wrapping_add(GOLDEN_GAMMA));
        Self::new(finalize(seed ^ agent ^ finalize(tick)))
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        finalize(self.state)
    }
}

fn finalize(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
