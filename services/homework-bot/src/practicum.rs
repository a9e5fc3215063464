//! Client for the homework review status API

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;
use crate::HomeworkBotError;

/// Source of raw homework status records
#[async_trait]
pub trait HomeworkSource: Send + Sync + std::fmt::Debug {
    /// Fetch every status change since `from_date` (Unix seconds)
    async fn fetch(&self, from_date: i64) -> crate::Result<Value>;
}

/// Fetches statuses from the review API with an OAuth token
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", config.token),
            http,
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> crate::Result<Value> {
        let from_date_str = from_date.to_string();
        tracing::debug!("Requesting statuses since {}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date_str.as_str())],
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Request to {} with from_date={} failed: {}",
                    self.endpoint,
                    from_date,
                    e
                );
            })?;

        if response.status != 200 {
            tracing::error!(
                "API unavailable: {} returned status {}, reason '{}', body '{}'",
                self.endpoint,
                response.status,
                response.reason,
                response.body
            );
            return Err(HomeworkBotError::UpstreamStatus {
                status: response.status,
                reason: response.reason,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!(
                "Response from {} is not valid JSON: {} (body '{}')",
                self.endpoint,
                e,
                response.body
            );
            HomeworkBotError::Decode(e.to_string())
        })
    }
}
