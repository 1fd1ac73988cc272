//! AI report requestor
//!
//! Sends the profile summary plus the versioned system instructions to the
//! messages endpoint and returns a validated [`Report`]. The endpoint is an
//! external dependency: timeouts, transport errors and malformed bodies all
//! come back as a classified [`ReportError`].

use crate::config::AiConfig;
use crate::error::{ReportError, ReportResult};
use async_trait::async_trait;
use irontrack_shared::prompt::{summarize_profile, SYSTEM_PROMPT, SYSTEM_PROMPT_VERSION};
use irontrack_shared::{parse_report, DerivedMetrics, Profile, Report, ReportFormatError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Longest slice of an error body kept in a [`ReportError::Network`]
const ERROR_BODY_EXCERPT_CHARS: usize = 200;

/// Anything that can turn a profile into a validated report
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn generate(&self, profile: &Profile) -> ReportResult<Report>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenate every text fragment in order
    fn text(self) -> String {
        self.content.into_iter().filter_map(|block| block.text).collect()
    }
}

/// HTTP client for the AI messages endpoint
pub struct ReportClient {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    api_version: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl ReportClient {
    /// Build a client from configuration; fails without an API key
    pub fn new(config: &AiConfig) -> ReportResult<Self> {
        let api_key = config.api_key.clone().ok_or(ReportError::NotConfigured)?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ReportError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        })
    }

    /// Point the client at a different endpoint (mock servers, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn classify(&self, err: reqwest::Error) -> ReportError {
        if err.is_timeout() {
            ReportError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            ReportError::Network(format!("Connection failed: {}", err))
        } else {
            ReportError::Network(err.to_string())
        }
    }

    /// Post the request and return the concatenated response text
    async fn request_text(&self, profile: &Profile) -> ReportResult<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![RequestMessage {
                role: "user",
                content: summarize_profile(profile),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(ERROR_BODY_EXCERPT_CHARS).collect();
            error!(status = %status, body = %excerpt, "Report service returned an error");
            return Err(ReportError::Network(format!("status {}: {}", status, excerpt)));
        }

        let envelope: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| ReportFormatError::Json(format!("response envelope: {}", e)))?;
        Ok(envelope.text())
    }
}

#[async_trait]
impl ReportService for ReportClient {
    async fn generate(&self, profile: &Profile) -> ReportResult<Report> {
        info!(
            model = %self.model,
            prompt_version = SYSTEM_PROMPT_VERSION,
            "Requesting AI report"
        );

        let raw = self.request_text(profile).await?;
        debug!(chars = raw.len(), "Report text received");

        let report = parse_report(&raw, profile).map_err(|e| {
            warn!(error = %e, "Report failed validation");
            ReportError::Format(e)
        })?;

        for divergence in report.divergences(&DerivedMetrics::from_profile(profile)) {
            warn!(
                field = divergence.field,
                reported = divergence.reported,
                local = divergence.local,
                "Report figure disagrees with local formula"
            );
        }

        info!(score = report.score, "AI report ready");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_are_concatenated() {
        let envelope: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"{\"a\":"},{"type":"tool_use"},{"type":"text","text":"1}"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.text(), r#"{"a":1}"#);
    }

    #[test]
    fn test_missing_content_is_empty_text() {
        let envelope: MessagesResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.text(), "");
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = ReportClient::new(&AiConfig::default());
        assert!(matches!(result, Err(ReportError::NotConfigured)));
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 2000,
            system: "sys",
            messages: vec![RequestMessage {
                role: "user",
                content: "Age: 28".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "sys");
    }
}
