//! The merge engine: folds run submissions into the stored profile set and
//! serves the ranked view.
//!
//! Reads are fail-open: a missing or malformed payload yields an empty board
//! rather than an error, and individually broken records are repaired or
//! skipped. Writes persist the whole set; concurrent writers race with
//! last-writer-wins, which is acceptable for a casual leaderboard.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::warn;

use crate::leaderboard::profile::{
    normalize_address, repair_record, sanitize_score, Profile, ProfileView,
};
use crate::leaderboard::store::{ProfileStore, STORE_KEY};
use crate::leaderboard::LeaderboardError;

/// Ranked list length served to clients
pub const TOP_N: usize = 100;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Result of a submission: the caller's updated profile plus the new ranking
pub struct SubmitOutcome {
    pub profile: ProfileView,
    pub leaderboard: Vec<ProfileView>,
}

/// Result of a read: the ranking plus the caller's profile when known
pub struct QueryOutcome {
    pub leaderboard: Vec<ProfileView>,
    pub profile: Option<ProfileView>,
}

pub struct LeaderboardService {
    store: Arc<dyn ProfileStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Load every stored profile. Malformed payloads and records degrade to
    /// an empty or partial set instead of failing the request.
    pub fn read_profiles(&self) -> Result<Vec<Profile>, LeaderboardError> {
        let Some(raw) = self.store.get(STORE_KEY)? else {
            return Ok(Vec::new());
        };
        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "leaderboard payload unparseable, serving empty set");
                return Ok(Vec::new());
            }
        };
        let Value::Array(records) = parsed else {
            warn!("leaderboard payload is not an array, serving empty set");
            return Ok(Vec::new());
        };
        Ok(records.iter().filter_map(repair_record).collect())
    }

    fn persist(&self, profiles: &[Profile]) -> Result<(), LeaderboardError> {
        let payload = serde_json::to_string(profiles)
            .map_err(|err| crate::leaderboard::store::StoreError::Write(err.to_string()))?;
        self.store.set(STORE_KEY, payload)?;
        Ok(())
    }

    /// Rank profiles: verified best first, raw best second, recency last.
    fn ranked(mut profiles: Vec<Profile>) -> Vec<ProfileView> {
        profiles.sort_by(|a, b| {
            b.verified_best_score
                .cmp(&a.verified_best_score)
                .then(b.best_score.cmp(&a.best_score))
                .then(b.updated_at.cmp(&a.updated_at))
        });
        profiles.truncate(TOP_N);
        profiles.into_iter().map(ProfileView::from).collect()
    }

    /// Merge one finished run into the board.
    ///
    /// Only verified submissions may raise `verifiedBestScore`; everything
    /// else (raw best, last score, run counter, XP) updates either way.
    pub fn submit_run(
        &self,
        address: &str,
        raw_score: f64,
        verified: bool,
        xp_gained: u64,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let address = normalize_address(address)?;
        let score = sanitize_score(raw_score)?;
        let now = now_ms();

        let mut profiles = self.read_profiles()?;
        let idx = match profiles.iter().position(|p| p.address == address) {
            Some(i) => i,
            None => {
                profiles.push(Profile::new(address.clone(), now));
                profiles.len() - 1
            }
        };
        let profile = &mut profiles[idx];

        profile.best_score = profile.best_score.max(score);
        if verified {
            profile.verified_best_score = profile.verified_best_score.max(score);
        }
        profile.last_score = score;
        profile.total_runs += 1;
        let mut progress = profile.progress();
        progress.apply_xp(xp_gained);
        profile.level = progress.level;
        profile.xp = progress.xp;
        profile.updated_at = now;
        let updated = profile.clone();

        self.persist(&profiles)?;

        Ok(SubmitOutcome {
            profile: ProfileView::from(updated),
            leaderboard: Self::ranked(profiles),
        })
    }

    /// Read-only ranked view, optionally enriched with one caller's profile
    pub fn query_leaderboard(
        &self,
        address: Option<&str>,
    ) -> Result<QueryOutcome, LeaderboardError> {
        let profiles = self.read_profiles()?;
        let profile = match address {
            Some(raw) => {
                let addr = normalize_address(raw)?;
                profiles
                    .iter()
                    .find(|p| p.address == addr)
                    .cloned()
                    .map(ProfileView::from)
            }
            None => None,
        };
        Ok(QueryOutcome {
            leaderboard: Self::ranked(profiles),
            profile,
        })
    }
}
