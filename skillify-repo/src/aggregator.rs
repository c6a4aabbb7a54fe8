//! Language and framework usage aggregation
//!
//! Language usage is weighted by bytes of code, summed across repositories,
//! so it reflects volume written rather than how many repositories use a
//! language. Frameworks are detected by a keyword scan over each
//! repository's description and name.

use crate::api::RepositoryApiClient;
use crate::ranking::{all_languages, select_top};
use skillify_core::{
    process_ordered, AggregationResult, ErrorContext, FrameworkSet, LanguageTally,
    RepositorySummary, RepositoryUsage, SkillifyError, SkippedRepository,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Case-insensitive substring matcher over a keyword → icon table.
///
/// Matching is deliberately loose: "react" also matches "reactive-app" and
/// "node" matches "denodes". Callers that want whole-word matching should
/// not use this type.
#[derive(Debug, Clone)]
pub struct FrameworkDetector {
    keywords: Vec<(String, String)>,
}

impl FrameworkDetector {
    pub fn new(table: &BTreeMap<String, String>) -> Self {
        Self {
            keywords: table
                .iter()
                .map(|(keyword, icon)| (keyword.to_lowercase(), icon.clone()))
                .collect(),
        }
    }

    /// Icons of every keyword found in `description + name`
    pub fn detect(&self, repository: &RepositorySummary) -> Vec<String> {
        let haystack = repository.keyword_haystack().to_lowercase();
        self.keywords
            .iter()
            .filter(|(keyword, _)| !keyword.is_empty() && haystack.contains(keyword.as_str()))
            .map(|(_, icon)| icon.clone())
            .collect()
    }
}

/// Fetches per-repository language breakdowns and reduces them to an
/// [`AggregationResult`]
pub struct UsageAggregator<'a> {
    client: &'a dyn RepositoryApiClient,
    detector: FrameworkDetector,
    top_k: usize,
    max_concurrent: usize,
}

impl<'a> UsageAggregator<'a> {
    pub fn new(
        client: &'a dyn RepositoryApiClient,
        framework_keywords: &BTreeMap<String, String>,
        top_k: usize,
    ) -> Self {
        Self {
            client,
            detector: FrameworkDetector::new(framework_keywords),
            top_k,
            max_concurrent: 1,
        }
    }

    /// Allow up to `max_concurrent` language lookups in flight
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Look up the language breakdown of every repository.
    ///
    /// A failed lookup is logged once here and carried in the returned usage;
    /// it never aborts the batch. Output order matches input order.
    pub async fn collect(&self, repositories: Vec<RepositorySummary>) -> Vec<RepositoryUsage> {
        let client = self.client;
        let total = repositories.len();

        let usages = process_ordered(
            repositories,
            self.max_concurrent,
            move |repository| async move {
                match client.get_languages(&repository.languages_url).await {
                    Ok(languages) => {
                        debug!(
                            repository = %repository.name,
                            languages = languages.len(),
                            "Fetched language breakdown"
                        );
                        RepositoryUsage {
                            repository,
                            languages: Ok(languages),
                        }
                    }
                    Err(source) => {
                        let err = SkillifyError::Aggregation {
                            repository: repository.name.clone(),
                            message: "language lookup failed".to_string(),
                            source: Some(Box::new(source)),
                            context: ErrorContext::new("usage_aggregator")
                                .with_operation("get_languages")
                                .with_metadata("languages_url", &repository.languages_url),
                        };
                        err.log();
                        RepositoryUsage {
                            repository,
                            languages: Err(err.chain_message()),
                        }
                    }
                }
            },
        )
        .await;

        info!(
            repositories = total,
            failed = usages.iter().filter(|u| u.languages.is_err()).count(),
            "Collected language breakdowns"
        );
        usages
    }

    /// Reduce collected usages. Pure: no I/O and no logging of failures,
    /// so the same usages can be aggregated more than once.
    pub fn aggregate(&self, usages: &[RepositoryUsage]) -> AggregationResult {
        let mut tally = LanguageTally::new();
        let mut frameworks = FrameworkSet::new();
        let mut skipped = Vec::new();

        for usage in usages {
            frameworks.extend(self.detector.detect(&usage.repository));

            match &usage.languages {
                Ok(breakdown) => tally.add_breakdown(breakdown),
                Err(reason) => skipped.push(SkippedRepository {
                    name: usage.repository.name.clone(),
                    reason: reason.clone(),
                }),
            }
        }

        AggregationResult {
            top_languages: select_top(&tally, self.top_k),
            all_languages: all_languages(&tally),
            frameworks,
            tally,
            repositories_considered: usages.len(),
            skipped,
        }
    }

    /// `collect` followed by `aggregate`
    pub async fn aggregate_repositories(
        &self,
        repositories: Vec<RepositorySummary>,
    ) -> AggregationResult {
        let usages = self.collect(repositories).await;
        self.aggregate(&usages)
    }
}
