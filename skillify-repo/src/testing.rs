//! In-memory API client for unit tests

use crate::api::{RepositoryApiClient, RepositoryPage};
use async_trait::async_trait;
use skillify_core::{
    ErrorContext, LanguageBreakdown, RepositorySummary, SkillifyError, SkillifyResult,
};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Serves scripted listing pages and per-URL language breakdowns
#[derive(Default)]
pub struct MockApiClient {
    pages: Mutex<VecDeque<SkillifyResult<RepositoryPage>>>,
    languages: HashMap<String, Result<LanguageBreakdown, u16>>,
    pages_requested: AtomicUsize,
    language_calls: AtomicUsize,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: SkillifyResult<RepositoryPage>) -> Self {
        self.pages
            .lock()
            .expect("mock page queue poisoned")
            .push_back(page);
        self
    }

    pub fn with_languages(mut self, url: &str, languages: &[(&str, u64)]) -> Self {
        let breakdown = languages
            .iter()
            .map(|(name, bytes)| (name.to_string(), *bytes))
            .collect();
        self.languages.insert(url.to_string(), Ok(breakdown));
        self
    }

    /// Make the languages lookup for `url` fail with an HTTP status
    pub fn with_failing_languages(mut self, url: &str, status: u16) -> Self {
        self.languages.insert(url.to_string(), Err(status));
        self
    }

    pub fn pages_requested(&self) -> usize {
        self.pages_requested.load(Ordering::SeqCst)
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryApiClient for MockApiClient {
    async fn list_repositories_page(
        &self,
        _account: &str,
        _page: u32,
        _per_page: u32,
    ) -> SkillifyResult<RepositoryPage> {
        self.pages_requested.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .expect("mock page queue poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(RepositoryPage::Repositories(Vec::new())))
    }

    async fn get_languages(&self, languages_url: &str) -> SkillifyResult<LanguageBreakdown> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        match self.languages.get(languages_url) {
            Some(Ok(breakdown)) => Ok(breakdown.clone()),
            Some(Err(status)) => Err(SkillifyError::Transport {
                message: format!("HTTP {} error for {}", status, languages_url),
                status: Some(*status),
                source: None,
                context: ErrorContext::new("mock_api_client"),
            }),
            None => Ok(LanguageBreakdown::new()),
        }
    }
}

/// Repository fixture whose languages URL is `mock://{name}`
pub fn repository(name: &str, description: Option<&str>) -> RepositorySummary {
    RepositorySummary {
        name: name.to_string(),
        description: description.map(str::to_string),
        languages_url: format!("mock://{}", name),
        updated_at: None,
    }
}

/// Collects formatted log lines emitted on the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route events at `level` and above into this buffer until the guard drops
    pub fn install(&self, level: tracing::Level) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
