//! End-to-end profile update: fetch, aggregate, render, patch, commit

use crate::document::ProfileDocument;
use crate::markup::BadgeRenderer;
use crate::patcher::patch;
use chrono::{DateTime, Utc};
use serde::Serialize;
use skillify_core::performance::measure_async;
use skillify_core::{
    log_operation_error, log_operation_start, log_operation_success, EmptyResultPolicy,
    ErrorContext, SkillifyConfig, SkillifyError, SkillifyResult, SkippedRepository,
};
use skillify_repo::{
    recent_usages, ApiClientConfig, GitHubApiClient, RepositoryApiClient, RepositoryFetcher,
    UsageAggregator,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub account: String,
    pub document_path: PathBuf,
    pub repositories: usize,
    pub recent_repositories: usize,
    pub top_languages: Vec<(String, u64)>,
    pub frameworks: Vec<String>,
    pub skipped: Vec<SkippedRepository>,
    /// The document did not exist before this run
    pub created_document: bool,
    /// The patched document differs from what was on disk
    pub changed: bool,
    pub written: bool,
    /// Patched document text
    pub document: String,
}

pub struct SkillsPipeline<'a> {
    config: &'a SkillifyConfig,
    client: &'a dyn RepositoryApiClient,
    now: Option<DateTime<Utc>>,
    dry_run: bool,
}

impl<'a> SkillsPipeline<'a> {
    pub fn new(config: &'a SkillifyConfig, client: &'a dyn RepositoryApiClient) -> Self {
        Self {
            config,
            client,
            now: None,
            dry_run: false,
        }
    }

    /// Evaluate the recency window against a fixed instant instead of the clock
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Compute the new document without writing it
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> SkillifyResult<PipelineReport> {
        let account = self.config.github.account.trim();
        log_operation_start!("update_profile", account = account, dry_run = self.dry_run);

        let result = self.execute(account).await;
        match &result {
            Ok(report) => log_operation_success!(
                "update_profile",
                repositories = report.repositories,
                skipped = report.skipped.len(),
                written = report.written
            ),
            Err(err) => log_operation_error!("update_profile", err.chain_message()),
        }
        result
    }

    async fn execute(&self, account: &str) -> SkillifyResult<PipelineReport> {
        self.config.validate()?;

        let github = &self.config.github;
        let ranking = &self.config.ranking;
        let profile = &self.config.profile;

        // read first so a missing document fails before any network traffic
        let mut document = ProfileDocument::load(
            &profile.readme_path,
            profile.missing_document,
            &profile.default_document,
        )
        .await?;

        let fetcher = RepositoryFetcher::new(self.client, github.per_page, github.max_pages);
        let repositories = measure_async(
            "fetch_repositories",
            fetcher.fetch_all_repositories(account),
        )
        .await?;

        if repositories.is_empty() {
            match ranking.empty_result_policy {
                EmptyResultPolicy::Fail => {
                    return Err(SkillifyError::EmptyResult {
                        account: account.to_string(),
                        context: ErrorContext::new("skills_pipeline")
                            .with_operation("fetch_repositories")
                            .with_suggestion("Check the account name")
                            .with_suggestion(
                                "Set ranking.empty_result_policy = \"render_empty\" to write empty sections",
                            ),
                    });
                }
                EmptyResultPolicy::RenderEmpty => {
                    warn!(account = account, "No repositories found, rendering empty sections");
                }
            }
        }

        let aggregator =
            UsageAggregator::new(self.client, &self.config.icons.frameworks, ranking.top_k)
                .with_max_concurrent(github.max_concurrent);
        let usages = measure_async("collect_languages", aggregator.collect(repositories)).await;

        let now = self.now.unwrap_or_else(Utc::now);
        let recent = recent_usages(&usages, now, ranking.recency_days);
        debug!(
            recent = recent.len(),
            total = usages.len(),
            recency_days = ranking.recency_days,
            "Selected recently updated repositories"
        );

        let recent_result = aggregator.aggregate(&recent);
        let all_result = aggregator.aggregate(&usages);

        let renderer = BadgeRenderer::new(&self.config.icons, profile);
        let markup = renderer.render(&recent_result, &all_result);
        let patched = patch(document.content(), &markup, renderer.markers());

        let created_document = document.is_new();
        let changed = created_document || patched != document.content();
        let written = if self.dry_run {
            info!("Dry run, document not written");
            false
        } else if changed {
            document.commit(patched.clone()).await?;
            true
        } else {
            info!(path = %document.path().display(), "Profile document already up to date");
            false
        };

        Ok(PipelineReport {
            account: account.to_string(),
            document_path: document.path().to_path_buf(),
            repositories: all_result.repositories_considered,
            recent_repositories: recent_result.repositories_considered,
            top_languages: recent_result.top_languages,
            frameworks: all_result.frameworks.into_iter().collect(),
            skipped: all_result.skipped,
            created_document,
            changed,
            written,
            document: patched,
        })
    }
}

/// Run the pipeline against the GitHub API described by `config`
pub async fn update_profile(
    config: &SkillifyConfig,
    dry_run: bool,
) -> SkillifyResult<PipelineReport> {
    let client = GitHubApiClient::new(ApiClientConfig::from_github_config(&config.github))?;
    SkillsPipeline::new(config, &client)
        .with_dry_run(dry_run)
        .run()
        .await
}
