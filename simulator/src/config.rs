use serde::{Deserialize, Serialize};
use tictactoe_engine::config::Validate;
use tictactoe_engine::tictactoe::{Difficulty, MAX_BOT_THINKING_DELAY_MS};

pub const MAX_MATCHES: u32 = 100_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SimulatorConfig {
    pub matches: u32,
    /// Fixed seed for reproducible runs; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub first_difficulty: Difficulty,
    pub second_difficulty: Difficulty,
    pub bot_thinking_delay_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            matches: 100,
            seed: None,
            first_difficulty: Difficulty::Medium,
            second_difficulty: Difficulty::Hard,
            bot_thinking_delay_ms: 0,
        }
    }
}

impl Validate for SimulatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.matches == 0 || self.matches > MAX_MATCHES {
            return Err(format!(
                "matches must be between 1 and {}, got {}",
                MAX_MATCHES, self.matches
            ));
        }
        if self.bot_thinking_delay_ms > MAX_BOT_THINKING_DELAY_MS {
            return Err(format!(
                "bot_thinking_delay_ms must not exceed {}, got {}",
                MAX_BOT_THINKING_DELAY_MS, self.bot_thinking_delay_ms
            ));
        }
        Ok(())
    }
}
