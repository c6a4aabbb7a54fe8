//! Recency filtering for the "recent activity" view

use chrono::{DateTime, Duration, Utc};
use skillify_core::{RepositorySummary, RepositoryUsage};

/// Start of a window of `days` days ending at `now`
pub fn recency_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// Whether the repository was updated at or after `cutoff`.
/// Repositories without an update timestamp never count as recent.
pub fn is_updated_since(repository: &RepositorySummary, cutoff: DateTime<Utc>) -> bool {
    repository
        .updated_at
        .map(|updated| updated >= cutoff)
        .unwrap_or(false)
}

/// Usages of repositories updated within the last `days` days, order kept
pub fn recent_usages(
    usages: &[RepositoryUsage],
    now: DateTime<Utc>,
    days: u32,
) -> Vec<RepositoryUsage> {
    let cutoff = recency_cutoff(now, days);
    usages
        .iter()
        .filter(|usage| is_updated_since(&usage.repository, cutoff))
        .cloned()
        .collect()
}
