//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase for the status, empty when unknown
    pub reason: String,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with extra headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with form-encoded body
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::HomeworkBotError::Config(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

async fn into_response(response: reqwest::Response) -> crate::Result<HttpResponse> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| crate::HomeworkBotError::Transport(format!("Reading response body: {}", e)))?;

    Ok(HttpResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {} {:?}", url, query);
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| crate::HomeworkBotError::Transport(format!("GET {} failed: {}", url, e)))?;

        let response = into_response(response).await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, response.status, response.body.len());
        Ok(response)
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        // The Telegram URL embeds the bot token, so it is never logged
        tracing::debug!("POST form with {} fields", params.len());
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                crate::HomeworkBotError::Transport(format!(
                    "POST failed: {}",
                    e.without_url()
                ))
            })?;

        let response = into_response(response).await?;
        tracing::debug!("POST -> {} ({} bytes)", response.status, response.body.len());
        Ok(response)
    }
}
