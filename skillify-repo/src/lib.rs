//! Skillify Repository - Repository listing and usage aggregation
//!
//! Responsible for talking to the hosting API and turning an account's
//! repositories into language and framework usage statistics

pub mod aggregator;
pub mod api;
pub mod fetcher;
pub mod filter;
pub mod ranking;

#[cfg(test)]
mod testing;

pub use aggregator::*;
pub use api::{ApiClientConfig, GitHubApiClient, RepositoryApiClient, RepositoryPage};
pub use fetcher::*;
pub use filter::*;
pub use ranking::*;
