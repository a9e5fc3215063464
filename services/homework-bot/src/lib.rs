//! Homework bot - homework review status notifier
//!
//! Polls the homework review API, detects status changes, and relays them to a
//! Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod state;
pub mod telegram;
pub mod verdict;

pub use config::{load_config, Config};
pub use error::{HomeworkBotError, Result};

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::practicum::PracticumClient;
use crate::telegram::TelegramNotifier;

/// Validates configuration and wires the engine together
pub struct HomeworkBotBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    start_epoch_secs: Option<i64>,
}

impl HomeworkBotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            start_epoch_secs: None,
        }
    }

    /// Use a custom HTTP client instead of reqwest
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Pretend the process started at `epoch_secs`
    pub fn with_start_time(mut self, epoch_secs: i64) -> Self {
        self.start_epoch_secs = Some(epoch_secs);
        self
    }

    /// Fails with [`HomeworkBotError::Config`] when a credential is missing
    pub fn build(self) -> Result<HomeworkBot> {
        self.config.check_tokens()?;

        let http = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(
                self.config.polling.request_timeout_seconds,
            ))?),
        };

        let source = Arc::new(PracticumClient::new(
            &self.config.practicum,
            Arc::clone(&http),
        ));
        let notifier = Arc::new(TelegramNotifier::new(&self.config.telegram, http));
        let start = self.start_epoch_secs.unwrap_or_else(current_epoch_secs);

        let engine = Engine::new(
            source,
            notifier,
            Duration::from_secs(self.config.polling.retry_period_seconds),
            start,
        );

        Ok(HomeworkBot { engine })
    }
}

/// A configured bot, ready to poll
#[derive(Debug)]
pub struct HomeworkBot {
    engine: Engine,
}

impl HomeworkBot {
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Poll until ctrl-c
    pub async fn start(self) -> Result<()> {
        let cancel = CancellationToken::new();

        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
        });

        self.run_until(cancel).await;
        Ok(())
    }

    /// Poll until `cancel` fires
    pub async fn run_until(mut self, cancel: CancellationToken) {
        tracing::info!("Homework bot started");
        self.engine.run(cancel).await;
        tracing::info!("Homework bot stopped");
    }
}

fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
