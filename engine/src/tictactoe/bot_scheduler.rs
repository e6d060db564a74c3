use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::log;
use crate::session_rng::RandomSource;
use super::session::{BotTurnOutcome, GameSession};

pub type SharedSession<R> = Arc<Mutex<GameSession<R>>>;

pub fn share_session<R: RandomSource>(session: GameSession<R>) -> SharedSession<R> {
    Arc::new(Mutex::new(session))
}

/// Plays bot turns after a "thinking" pause without holding the session
/// lock across the pause, so resets and human input stay responsive.
#[derive(Debug, Clone, Copy)]
pub struct BotScheduler {
    thinking_delay: Duration,
}

impl BotScheduler {
    pub fn new(thinking_delay: Duration) -> Self {
        Self { thinking_delay }
    }

    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// `None` when no bot turn was started (not the bot's turn, or one is
    /// already in flight).
    pub async fn play_bot_turn<R: RandomSource>(&self, session: &SharedSession<R>) -> Option<BotTurnOutcome> {
        let ticket = session.lock().await.begin_bot_turn()?;

        if !self.thinking_delay.is_zero() {
            tokio::time::sleep(self.thinking_delay).await;
        }

        let mut guard = session.lock().await;
        let outcome = guard.complete_bot_turn(ticket);
        if outcome == BotTurnOutcome::Stale {
            log!("[session:{}] Bot turn superseded while thinking", guard.session_id());
        }
        Some(outcome)
    }

    pub fn spawn_bot_turn<R>(&self, session: SharedSession<R>) -> JoinHandle<Option<BotTurnOutcome>>
    where
        R: RandomSource + Send + 'static,
    {
        let scheduler = *self;
        tokio::spawn(async move { scheduler.play_bot_turn(&session).await })
    }
}

impl Default for BotScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
