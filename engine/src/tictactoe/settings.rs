use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Validate, validate_display_name};
use super::session::{BotSeat, SessionConfig};
use super::types::{Difficulty, GameMode, Mark, PlayerIdentity, Scores};

pub const MAX_BOT_THINKING_DELAY_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MatchSettings {
    pub mode: GameMode,
    pub first_player_name: String,
    pub second_player_name: String,
    pub bot_difficulty: Difficulty,
    pub bot_mark: Mark,
    pub bot_thinking_delay_ms: u64,
    pub scores: Scores,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::LocalTwoPlayer,
            first_player_name: "Cross".to_string(),
            second_player_name: "Circle".to_string(),
            bot_difficulty: Difficulty::Medium,
            bot_mark: Mark::Second,
            bot_thinking_delay_ms: 500,
            scores: Scores::default(),
        }
    }
}

impl Validate for MatchSettings {
    fn validate(&self) -> Result<(), String> {
        validate_display_name("first_player_name", &self.first_player_name)?;
        validate_display_name("second_player_name", &self.second_player_name)?;
        if self.bot_mark == Mark::Empty {
            return Err("bot_mark must be first or second".to_string());
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

impl MatchSettings {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.bot_thinking_delay_ms)
    }

    /// Difficulty and bot mark only matter in `GameMode::Bot`.
    pub fn to_session_config(&self, session_id: impl Into<String>) -> SessionConfig {
        let bot = (self.mode == GameMode::Bot).then_some(BotSeat {
            mark: self.bot_mark,
            difficulty: self.bot_difficulty,
        });

        SessionConfig {
            session_id: session_id.into(),
            mode: self.mode,
            players: [
                PlayerIdentity::new(self.first_player_name.trim(), Mark::First),
                PlayerIdentity::new(self.second_player_name.trim(), Mark::Second),
            ],
            bot,
            scores: self.scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigManager, MemoryContentConfigProvider, YamlConfigSerializer};
    use crate::tictactoe::session::GameSession;
    use crate::tictactoe::test_support::ScriptedRng;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(MatchSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_long_delay() {
        let settings = MatchSettings {
            bot_thinking_delay_ms: MAX_BOT_THINKING_DELAY_MS + 1,
            ..MatchSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_bot_mark() {
        let settings = MatchSettings {
            bot_mark: Mark::Empty,
            ..MatchSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_player_name() {
        let settings = MatchSettings {
            second_player_name: "   ".to_string(),
            ..MatchSettings::default()
        };

        let error = settings.validate().unwrap_err();
        assert!(error.contains("second_player_name"));
    }

    #[test]
    fn test_bot_mode_builds_bot_seat() {
        let settings = MatchSettings {
            mode: GameMode::Bot,
            bot_difficulty: Difficulty::Hard,
            bot_mark: Mark::First,
            ..MatchSettings::default()
        };

        let config = settings.to_session_config("s1");

        assert_eq!(
            config.bot,
            Some(BotSeat {
                mark: Mark::First,
                difficulty: Difficulty::Hard
            })
        );
        let session = GameSession::start(config, ScriptedRng::new()).unwrap();
        assert!(session.is_bot_turn());
    }

    #[test]
    fn test_local_mode_has_no_bot() {
        let config = MatchSettings::default().to_session_config("s1");

        assert_eq!(config.bot, None);
        assert_eq!(config.players[0].display_name, "Cross");
        assert!(GameSession::start(config, ScriptedRng::new()).is_ok());
    }

    #[test]
    fn test_loads_partial_yaml_with_defaults() {
        let yaml = "mode: bot\nbot_difficulty: hard\nscores:\n  first: 3\n  second: 1\n";
        let manager: ConfigManager<_, MatchSettings, _> = ConfigManager::new(
            MemoryContentConfigProvider::new(Some(yaml.to_string())),
            YamlConfigSerializer,
        );

        let settings = manager.get_config().unwrap();

        assert_eq!(settings.mode, GameMode::Bot);
        assert_eq!(settings.bot_difficulty, Difficulty::Hard);
        assert_eq!(settings.second_player_name, "Circle");
        assert_eq!(settings.scores, Scores { first: 3, second: 1 });
        assert_eq!(settings.thinking_delay(), Duration::from_millis(500));
    }
}
