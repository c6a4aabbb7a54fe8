//! Configuration management

use crate::async_utils::RetryConfig;
use crate::error::{SkillifyError, SkillifyResult};
use crate::logging::LoggingConfig;
use crate::types::{
    EmptyResultPolicy, GitHubConfig, IconConfig, MissingDocumentPolicy, ProfileConfig,
    RankingConfig, SkillifyConfig,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_START_MARKER: &str = "<!-- SKILLS-SECTION-START -->";
pub const DEFAULT_END_MARKER: &str = "<!-- SKILLS-SECTION-END -->";

impl Default for SkillifyConfig {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            ranking: RankingConfig::default(),
            icons: IconConfig::default(),
            profile: ProfileConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            base_url: "https://api.github.com".to_string(),
            access_token: None,
            per_page: 100,
            max_pages: 100,
            timeout_seconds: 10,
            user_agent: format!("skillify/{}", env!("CARGO_PKG_VERSION")),
            max_concurrent: 1,
            retry: RetryConfig::single_attempt(),
            headers: table(&[("X-GitHub-Api-Version", "2022-11-28")]),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            recency_days: 7,
            empty_result_policy: EmptyResultPolicy::Fail,
        }
    }
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            icon_url_template:
                "https://cdn.jsdelivr.net/gh/devicons/devicon/icons/{icon}/{icon}-original.svg"
                    .to_string(),
            badge_size: 40,
            languages: table(&[
                ("JavaScript", "javascript"),
                ("Python", "python"),
                ("HTML", "html5"),
                ("CSS", "css3"),
                ("C++", "cplusplus"),
                ("C", "c"),
                ("TypeScript", "typescript"),
                ("Java", "java"),
                ("Shell", "bash"),
                ("Go", "go"),
                ("PHP", "php"),
                ("Ruby", "ruby"),
                ("Kotlin", "kotlin"),
                ("Swift", "swift"),
                ("Rust", "rust"),
                ("Dart", "dart"),
            ]),
            frameworks: table(&[
                ("react", "react"),
                ("node", "nodejs"),
                ("express", "express"),
                ("flask", "flask"),
                ("django", "django"),
                ("next", "nextjs"),
                ("firebase", "firebase"),
                ("tailwind", "tailwindcss"),
            ]),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            readme_path: PathBuf::from("README.md"),
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            top_heading: "🔥 Top Skills This Week".to_string(),
            all_heading: "🧰 All Technologies".to_string(),
            missing_document: MissingDocumentPolicy::CreateDefault,
            default_document: "# Hi there 👋\n".to_string(),
        }
    }
}

impl SkillifyConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SkillifyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SkillifyError::Config {
            message: "Failed to read config file".to_string(),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SkillifyResult<Self> {
        toml::from_str(content).map_err(|e| SkillifyError::Config {
            message: "Failed to parse config".to_string(),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SkillifyResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SkillifyError::Config {
            message: "Failed to serialize config".to_string(),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| SkillifyError::Config {
            message: "Failed to write config file".to_string(),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SkillifyResult<()> {
        if self.github.account.trim().is_empty() {
            return Err(invalid(
                "GitHub account must not be empty",
                "github.account",
                "Set github.account or pass --account",
            ));
        }

        if let Err(e) = url::Url::parse(&self.github.base_url) {
            return Err(invalid(
                &format!("Invalid base URL '{}': {}", self.github.base_url, e),
                "github.base_url",
                "Use an absolute URL such as https://api.github.com",
            ));
        }

        if self.github.per_page == 0 || self.github.per_page > 100 {
            return Err(invalid(
                "per_page must be between 1 and 100",
                "github.per_page",
                "Set github.per_page to 100",
            ));
        }

        if self.github.max_pages == 0 {
            return Err(invalid(
                "max_pages must be greater than 0",
                "github.max_pages",
                "Set github.max_pages to a positive value",
            ));
        }

        if self.github.timeout_seconds == 0 {
            return Err(invalid(
                "timeout_seconds must be greater than 0",
                "github.timeout_seconds",
                "Set github.timeout_seconds to a positive value",
            ));
        }

        if self.github.max_concurrent == 0 {
            return Err(invalid(
                "max_concurrent must be greater than 0",
                "github.max_concurrent",
                "Use 1 for sequential lookups",
            ));
        }

        if self.github.retry.max_attempts == 0 {
            return Err(invalid(
                "retry.max_attempts must be greater than 0",
                "github.retry.max_attempts",
                "Use 1 to disable retries",
            ));
        }

        if self.ranking.top_k == 0 {
            return Err(invalid(
                "top_k must be greater than 0",
                "ranking.top_k",
                "Set ranking.top_k to a positive value",
            ));
        }

        if !self.icons.icon_url_template.contains("{icon}") {
            return Err(invalid(
                "icon_url_template must contain an {icon} placeholder",
                "icons.icon_url_template",
                "Example: https://cdn.example.com/{icon}.svg",
            ));
        }

        let start = self.profile.start_marker.trim();
        let end = self.profile.end_marker.trim();
        if start.is_empty() || end.is_empty() {
            return Err(invalid(
                "Section markers must not be empty",
                "profile.start_marker",
                "Use HTML comments such as <!-- SKILLS-SECTION-START -->",
            ));
        }
        if start == end || start.contains(end) || end.contains(start) {
            return Err(invalid(
                "Start and end markers must be distinct and not contain each other",
                "profile.end_marker",
                "Use two different HTML comments",
            ));
        }

        Ok(())
    }
}

fn invalid(message: &str, field: &str, suggestion: &str) -> SkillifyError {
    SkillifyError::Validation {
        message: message.to_string(),
        field: Some(field.to_string()),
        context: crate::ErrorContext::new("config")
            .with_operation("validate")
            .with_suggestion(suggestion),
    }
}
