//! GitHub API client implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skillify_core::{
    retry_async, LanguageBreakdown, RepositorySummary, SkillifyError, SkillifyResult,
};
use tracing::{debug, info};

use super::{
    create_http_client, handle_response_error, ApiClientConfig, RepositoryApiClient,
    RepositoryPage,
};

/// GitHub API client
pub struct GitHubApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

/// GitHub repository response
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    description: Option<String>,
    languages_url: String,
    updated_at: Option<DateTime<Utc>>,
}

/// GitHub error object, e.g. `{"message": "API rate limit exceeded"}`
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// A listing page is either an array of repositories or an error object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GitHubPageResponse {
    Repositories(Vec<GitHubRepository>),
    Error(GitHubErrorBody),
}

impl From<GitHubRepository> for RepositorySummary {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            languages_url: repo.languages_url,
            updated_at: repo.updated_at,
        }
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(config: ApiClientConfig) -> SkillifyResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created GitHub API client for {}", config.base_url);

        Ok(Self { client, config })
    }

    /// Create authorization headers
    fn create_auth_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(ref token) = self.config.access_token {
            if let Ok(auth_value) =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            {
                headers.insert(reqwest::header::AUTHORIZATION, auth_value);
            }
        }

        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        headers
    }

    /// `{base}/users/{account}/repos?page=N&per_page=P`
    fn repositories_url(
        &self,
        account: &str,
        page: u32,
        per_page: u32,
    ) -> SkillifyResult<url::Url> {
        let raw = format!(
            "{}/users/{}/repos",
            self.config.base_url.trim_end_matches('/'),
            account
        );
        let mut url = url::Url::parse(&raw).map_err(|e| SkillifyError::Config {
            message: format!("Invalid repository listing URL '{}'", raw),
            source: Some(Box::new(e)),
            context: skillify_core::ErrorContext::new("github_api_client")
                .with_operation("repositories_url")
                .with_suggestion("Check github.base_url"),
        })?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    async fn send_once(&self, url: &str) -> SkillifyResult<reqwest::Response> {
        debug!("Making GitHub API request to: {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.create_auth_headers())
            .send()
            .await
            .map_err(|e| SkillifyError::Transport {
                message: "Failed to make request to GitHub API".to_string(),
                status: None,
                source: Some(Box::new(e)),
                context: skillify_core::ErrorContext::new("github_api_client")
                    .with_operation("get_request")
                    .with_metadata("url", url),
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "github_api_request").await);
        }

        Ok(response)
    }

    /// Make a GET request to GitHub API, retrying per the configured policy
    async fn get_request(&self, url: &str) -> SkillifyResult<reqwest::Response> {
        retry_async(|| self.send_once(url), &self.config.retry, "github_api_request").await
    }

    async fn read_body(response: reqwest::Response, operation: &str) -> SkillifyResult<String> {
        response.text().await.map_err(|e| SkillifyError::Transport {
            message: "Failed to read response body".to_string(),
            status: None,
            source: Some(Box::new(e)),
            context: skillify_core::ErrorContext::new("github_api_client")
                .with_operation(operation),
        })
    }
}

#[async_trait]
impl RepositoryApiClient for GitHubApiClient {
    async fn list_repositories_page(
        &self,
        account: &str,
        page: u32,
        per_page: u32,
    ) -> SkillifyResult<RepositoryPage> {
        let url = self.repositories_url(account, page, per_page)?;
        debug!(account = account, page = page, "Fetching repository page");

        let response = self.get_request(url.as_str()).await?;
        let body = Self::read_body(response, "list_repositories_page").await?;

        Ok(match serde_json::from_str::<GitHubPageResponse>(&body)? {
            GitHubPageResponse::Repositories(repos) => {
                RepositoryPage::Repositories(repos.into_iter().map(Into::into).collect())
            }
            GitHubPageResponse::Error(err) => RepositoryPage::ErrorIndicator(err.message),
        })
    }

    async fn get_languages(&self, languages_url: &str) -> SkillifyResult<LanguageBreakdown> {
        let response = self.get_request(languages_url).await?;
        let body = Self::read_body(response, "get_languages").await?;
        Ok(serde_json::from_str(&body)?)
    }
}
