//! Server-side leaderboard: profile records, storage contract, and the merge
//! service that folds run submissions into the ranked set.

pub mod profile;
pub mod service;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("invalid address")]
    InvalidAddress,
    #[error("invalid score")]
    InvalidScore,
    #[error("store error: {0}")]
    Store(#[from] store::StoreError),
}
