mod config;
mod runner;

use clap::Parser;
use tictactoe_engine::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use tictactoe_engine::tictactoe::Difficulty;
use tictactoe_engine::{log, logger};

use config::SimulatorConfig;

const DEFAULT_CONFIG_FILE: &str = "tictactoe_simulator.yaml";

#[derive(Parser)]
#[command(name = "tictactoe_simulator")]
struct Args {
    /// YAML config; defaults apply when the file does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[arg(long)]
    matches: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Difficulty of the externally driven First seat.
    #[arg(long)]
    first: Option<Difficulty>,

    /// Difficulty of the session bot playing Second.
    #[arg(long)]
    second: Option<Difficulty>,

    #[arg(long)]
    delay_ms: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut SimulatorConfig) {
        if let Some(matches) = self.matches {
            config.matches = matches;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(first) = self.first {
            config.first_difficulty = first;
        }
        if let Some(second) = self.second {
            config.second_difficulty = second;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.bot_thinking_delay_ms = delay_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Simulator".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, SimulatorConfig, YamlConfigSerializer> =
        ConfigManager::from_yaml_file(&args.config);
    let mut config = config_manager.get_config()?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    log!(
        "Simulating {} games: {} (First) vs {} (Second), seed {}",
        config.matches, config.first_difficulty, config.second_difficulty, seed
    );

    let report = runner::run_simulation(&config, seed).await?;

    log!(
        "Finished {} games: First {} wins, Second {} wins, {} draws",
        report.games, report.scores.first, report.scores.second, report.draws
    );
    if report.discarded_bot_moves > 0 {
        log!("{} bot moves were discarded as stale", report.discarded_bot_moves);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "tictactoe_simulator",
            "--matches",
            "7",
            "--seed",
            "3",
            "--first",
            "easy",
            "--second",
            "HARD",
            "--delay-ms",
            "25",
        ]);
        let mut config = SimulatorConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.matches, 7);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.first_difficulty, Difficulty::Easy);
        assert_eq!(config.second_difficulty, Difficulty::Hard);
        assert_eq!(config.bot_thinking_delay_ms, 25);
        assert_eq!(args.config, DEFAULT_CONFIG_FILE);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["tictactoe_simulator"]);
        let mut config = SimulatorConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config, SimulatorConfig::default());
        assert!(!args.use_log_prefix);
    }
}
