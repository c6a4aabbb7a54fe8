//! Paginated repository listing

use crate::api::{RepositoryApiClient, RepositoryPage};
use skillify_core::{ErrorContext, RepositorySummary, SkillifyError, SkillifyResult};
use tracing::{debug, info, warn};

/// Walks the listing endpoint page by page until the API signals the end
pub struct RepositoryFetcher<'a> {
    client: &'a dyn RepositoryApiClient,
    per_page: u32,
    max_pages: u32,
}

impl<'a> RepositoryFetcher<'a> {
    pub fn new(client: &'a dyn RepositoryApiClient, per_page: u32, max_pages: u32) -> Self {
        Self {
            client,
            per_page: per_page.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// Fetch every repository owned by `account`.
    ///
    /// Pagination stops at an empty page, a short page, or an error page. An
    /// error on the first page is fatal; on later pages it only ends the walk.
    /// Connection failures are fatal on any page.
    pub async fn fetch_all_repositories(
        &self,
        account: &str,
    ) -> SkillifyResult<Vec<RepositorySummary>> {
        let mut repositories = Vec::new();

        for page in 1..=self.max_pages {
            let batch = match self
                .client
                .list_repositories_page(account, page, self.per_page)
                .await
            {
                Ok(RepositoryPage::Repositories(batch)) => batch,
                Ok(RepositoryPage::ErrorIndicator(message)) if page == 1 => {
                    return Err(SkillifyError::Transport {
                        message: format!(
                            "Repository listing for '{}' failed: {}",
                            account, message
                        ),
                        status: None,
                        source: None,
                        context: ErrorContext::new("repository_fetcher")
                            .with_operation("fetch_all_repositories")
                            .with_metadata("page", "1")
                            .with_suggestion("Check the account name and API rate limits"),
                    });
                }
                Ok(RepositoryPage::ErrorIndicator(message)) => {
                    warn!(page = page, message = %message, "Error page ends pagination");
                    break;
                }
                Err(err) if page == 1 => return Err(err),
                Err(err) if ends_pagination(&err) => {
                    warn!(
                        page = page,
                        error = %err.chain_message(),
                        "Failed page ends pagination"
                    );
                    break;
                }
                Err(err) => return Err(err),
            };

            if batch.is_empty() {
                debug!(page = page, "Empty page, pagination complete");
                break;
            }

            let short_page = batch.len() < self.per_page as usize;
            debug!(page = page, count = batch.len(), "Fetched repository page");
            repositories.extend(batch);

            if short_page {
                break;
            }

            if page == self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    "Reached page limit, repository list may be incomplete"
                );
            }
        }

        info!(
            account = account,
            count = repositories.len(),
            "Fetched repository list"
        );
        Ok(repositories)
    }
}

/// Errors that the remote side reported (a status or an unreadable body),
/// as opposed to the connection failing.
fn ends_pagination(err: &SkillifyError) -> bool {
    matches!(
        err,
        SkillifyError::Transport {
            status: Some(_),
            ..
        } | SkillifyError::Serialization(_)
    )
}
