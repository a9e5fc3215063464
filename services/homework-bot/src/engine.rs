//! Engine: polls the homework source and relays status changes

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::notifier::Notifier;
use crate::practicum::HomeworkSource;
use crate::response::{check_response, current_date, latest_status_message};
use crate::state::{PollState, FAILURE_WARN_THRESHOLD};
use crate::HomeworkBotError;

/// Prefix of the notice sent when a poll fails
pub const MALFUNCTION_PREFIX: &str = "Program malfunction: ";

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new status text was delivered
    Notified(String),
    /// The status text equals the last delivered one; nothing was sent
    Unchanged(String),
    /// The tick failed. `reported` is true when a malfunction notice went out
    Failed { error: String, reported: bool },
}

/// Owns the poll state and drives fetch, validate, notify
pub struct Engine {
    source: Arc<dyn HomeworkSource>,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    state: PollState,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("source", &self.source)
            .field("notifier", &self.notifier)
            .field("retry_period", &self.retry_period)
            .field("state", &self.state)
            .finish()
    }
}

impl Engine {
    pub fn new(
        source: Arc<dyn HomeworkSource>,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        start_epoch_secs: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            state: PollState::new(start_epoch_secs, retry_period.as_secs()),
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn retry_period(&self) -> Duration {
        self.retry_period
    }

    /// Run one poll iteration without sleeping
    pub async fn tick(&mut self) -> TickOutcome {
        match self.poll_once().await {
            Ok((message, sent)) => {
                let streak = self.state.record_success();
                if streak > 0 {
                    tracing::info!("Polling recovered after {} failed attempts", streak);
                }
                if sent {
                    TickOutcome::Notified(message)
                } else {
                    TickOutcome::Unchanged(message)
                }
            }
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn poll_once(&mut self) -> crate::Result<(String, bool)> {
        let response = self.source.fetch(self.state.cursor).await?;
        let homeworks = check_response(&response)?;
        let message = latest_status_message(homeworks)?;
        let next_cursor = current_date(&response)?;

        let sent = if self.state.is_new_message(&message) {
            self.notifier.notify(&message).await?;
            self.state.record_message(message.clone());
            true
        } else {
            tracing::debug!("Status text unchanged, nothing sent");
            false
        };

        let previous = self.state.advance_cursor(next_cursor);
        tracing::debug!("Cursor {} -> {}", previous, next_cursor);
        Ok((message, sent))
    }

    async fn handle_failure(&mut self, error: HomeworkBotError) -> TickOutcome {
        let identity = error.to_string();
        tracing::error!("Poll failed ({}): {}", error.kind(), identity);

        let streak = self.state.record_failure();
        if streak == FAILURE_WARN_THRESHOLD {
            tracing::warn!("Polling has failed {} times in a row", streak);
        }

        if !self.state.is_new_error(&identity) {
            tracing::debug!("Malfunction already reported, not sending again");
            return TickOutcome::Failed {
                error: identity,
                reported: false,
            };
        }

        let notice = format!("{}{}", MALFUNCTION_PREFIX, identity);
        let reported = match self.notifier.notify(&notice).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    "Could not report malfunction via '{}': {}",
                    self.notifier.type_name(),
                    e
                );
                false
            }
        };
        self.state.record_error(identity.clone());

        TickOutcome::Failed {
            error: identity,
            reported,
        }
    }

    /// Tick, then sleep the retry period, until `cancel` fires
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!(
            "Polling every {:?}, starting from {}",
            self.retry_period,
            self.state.cursor
        );

        loop {
            tokio::select! {
                outcome = self.tick() => {
                    tracing::debug!("Tick finished: {:?}", outcome);
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled during tick");
                    break;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }
}
