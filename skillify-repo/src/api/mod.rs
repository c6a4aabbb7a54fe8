//! API clients for accessing the hosting service
//!
//! This module defines the seam between the aggregation pipeline and the
//! remote API, so that the pipeline can be driven by a mock in tests.

use async_trait::async_trait;
use skillify_core::{
    GitHubConfig, LanguageBreakdown, RepositorySummary, RetryConfig, SkillifyError,
    SkillifyResult,
};
use std::collections::HashMap;

pub mod github;


pub use github::GitHubApiClient;

/// Configuration for API clients
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Access token for authentication
    pub access_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
    /// Retry policy applied to every request
    pub retry: RetryConfig,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_token: None,
            timeout_seconds: 10,
            user_agent: format!("skillify/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            retry: RetryConfig::single_attempt(),
        }
    }
}

impl ApiClientConfig {
    /// Create a new configuration for GitHub
    pub fn github(access_token: Option<String>) -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            access_token,
            ..Default::default()
        }
    }

    /// Build the client configuration from the `[github]` config section
    pub fn from_github_config(config: &GitHubConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            retry: config.retry.clone(),
        }
    }

    /// Point the client at another API root (GitHub Enterprise, mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// One page of the repository listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryPage {
    Repositories(Vec<RepositorySummary>),
    /// The API answered with an error object instead of a list
    ErrorIndicator(String),
}

/// Trait for repository API clients
#[async_trait]
pub trait RepositoryApiClient: Send + Sync {
    /// Fetch one page (1-based) of the repositories owned by `account`
    async fn list_repositories_page(
        &self,
        account: &str,
        page: u32,
        per_page: u32,
    ) -> SkillifyResult<RepositoryPage>;

    /// Fetch the language → bytes breakdown behind a repository's languages URL
    async fn get_languages(&self, languages_url: &str) -> SkillifyResult<LanguageBreakdown>;
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> SkillifyResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            SkillifyError::Config {
                message: "Invalid user agent".to_string(),
                source: Some(Box::new(e)),
                context: skillify_core::ErrorContext::new("http_client")
                    .with_operation("create_client"),
            }
        })?,
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            SkillifyError::Config {
                message: format!("Invalid header name '{}'", key),
                source: Some(Box::new(e)),
                context: skillify_core::ErrorContext::new("http_client")
                    .with_operation("create_client"),
            }
        })?;

        let header_value =
            reqwest::header::HeaderValue::from_str(value).map_err(|e| SkillifyError::Config {
                message: format!("Invalid header value for '{}'", key),
                source: Some(Box::new(e)),
                context: skillify_core::ErrorContext::new("http_client")
                    .with_operation("create_client"),
            })?;

        headers.insert(header_name, header_value);
    }

    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| SkillifyError::Config {
            message: "Failed to create HTTP client".to_string(),
            source: Some(Box::new(e)),
            context: skillify_core::ErrorContext::new("http_client")
                .with_operation("create_client"),
        })
}

/// Pull the `message` field out of a GitHub error body, if there is one
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Helper function to turn a non-success HTTP response into a transport error
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    context: &str,
) -> SkillifyError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();
    let detail = extract_error_message(&error_body).unwrap_or_else(|| {
        if error_body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            error_body.clone()
        }
    });

    SkillifyError::Transport {
        message: format!("HTTP {} error for {}: {}", status.as_u16(), url, detail),
        status: Some(status.as_u16()),
        source: None,
        context: skillify_core::ErrorContext::new("api_client")
            .with_operation(context)
            .with_metadata("url", url.as_str())
            .with_suggestion(match status.as_u16() {
                401 => "Check your access token",
                403 | 429 => "Check rate limits or provide a token via GITHUB_TOKEN",
                404 => "Account not found or not accessible",
                _ => "Check network connectivity and API status",
            }),
    }
}
