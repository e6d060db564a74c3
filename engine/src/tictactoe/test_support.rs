use std::collections::VecDeque;

use crate::session_rng::RandomSource;

/// Replays queued draws; once a queue runs dry it falls back to the
/// "no heuristic" outcome (roll 10, tails, index 0).
#[derive(Debug, Default)]
pub struct ScriptedRng {
    rolls: VecDeque<u32>,
    coins: VecDeque<bool>,
    indices: VecDeque<usize>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: &[u32]) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_coins(mut self, coins: &[bool]) -> Self {
        self.coins.extend(coins);
        self
    }

    pub fn with_indices(mut self, indices: &[usize]) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn is_drained(&self) -> bool {
        self.rolls.is_empty() && self.coins.is_empty() && self.indices.is_empty()
    }
}

impl RandomSource for ScriptedRng {
    fn roll_d10(&mut self) -> u32 {
        self.rolls.pop_front().unwrap_or(10)
    }

    fn coin(&mut self) -> bool {
        self.coins.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(len - 1)
    }
}
