//! Core data type definitions

use crate::async_utils::RetryConfig;
use crate::logging::LoggingConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One repository owned by the account, as listed by the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    /// Endpoint returning the language → bytes breakdown of this repository
    pub languages_url: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepositorySummary {
    /// Text scanned for framework keywords: description first, then name.
    pub fn keyword_haystack(&self) -> String {
        let mut text = self.description.clone().unwrap_or_default();
        text.push_str(&self.name);
        text
    }
}

/// Language → byte count for a single repository
pub type LanguageBreakdown = BTreeMap<String, u64>;

/// A repository paired with its language breakdown, or the reason it has none
#[derive(Debug, Clone)]
pub struct RepositoryUsage {
    pub repository: RepositorySummary,
    pub languages: Result<LanguageBreakdown, String>,
}

/// Accumulated bytes per language across repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTally(BTreeMap<String, u64>);

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to `language`; saturates instead of wrapping.
    pub fn add(&mut self, language: &str, bytes: u64) {
        let entry = self.0.entry(language.to_string()).or_insert(0);
        *entry = entry.saturating_add(bytes);
    }

    pub fn add_breakdown(&mut self, breakdown: &LanguageBreakdown) {
        for (language, bytes) in breakdown {
            self.add(language, *bytes);
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.0.get(language).copied()
    }

    pub fn total_bytes(&self) -> u64 {
        self.0.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in language-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LanguageTally {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut tally = LanguageTally::new();
        for (language, bytes) in iter {
            tally.add(&language.into(), bytes);
        }
        tally
    }
}

/// Detected framework icon identifiers, kept sorted
pub type FrameworkSet = BTreeSet<String>;

/// A repository whose language breakdown could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRepository {
    pub name: String,
    pub reason: String,
}

/// Outcome of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// At most K entries, bytes descending
    pub top_languages: Vec<(String, u64)>,
    /// Every language seen, sorted by name
    pub all_languages: Vec<String>,
    pub frameworks: FrameworkSet,
    pub tally: LanguageTally,
    pub repositories_considered: usize,
    pub skipped: Vec<SkippedRepository>,
}

/// What to do when the profile document does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDocumentPolicy {
    Fail,
    CreateDefault,
}

/// What to do when the account has no repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    Fail,
    RenderEmpty,
}

/// Configuration root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillifyConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub icons: IconConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Account whose repositories are scanned
    pub account: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub per_page: u32,
    /// Upper bound on listing requests
    pub max_pages: u32,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Language lookups in flight at once
    pub max_concurrent: usize,
    pub retry: RetryConfig,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_k: usize,
    /// Window for the "recent" view, in days
    pub recency_days: u32,
    pub empty_result_policy: EmptyResultPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Must contain `{icon}`
    pub icon_url_template: String,
    pub badge_size: u32,
    /// Language name (as reported by the API) → icon identifier
    pub languages: BTreeMap<String, String>,
    /// Lowercase keyword → icon identifier
    pub frameworks: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub readme_path: PathBuf,
    pub start_marker: String,
    pub end_marker: String,
    pub top_heading: String,
    pub all_heading: String,
    pub missing_document: MissingDocumentPolicy,
    pub default_document: String,
}
