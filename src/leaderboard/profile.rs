//! Profile records and the input sanitizers guarding them.
//!
//! Profiles are stored and served in camelCase JSON. Stored records are not
//! trusted: every field is repaired on read so one corrupt entry cannot take
//! the whole board down.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::progression;
use crate::leaderboard::LeaderboardError;

/// One player's persistent leaderboard record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub address: String,
    pub best_score: u64,
    /// Best score among verified submissions only; unverified runs never
    /// raise this, so it is the primary ranking key
    pub verified_best_score: u64,
    pub last_score: u64,
    pub total_runs: u64,
    pub level: u32,
    pub xp: u64,
    /// Milliseconds since the Unix epoch
    pub updated_at: u64,
}

impl Profile {
    /// Fresh record for a first-time address
    pub fn new(address: String, now_ms: u64) -> Self {
        Self {
            address,
            best_score: 0,
            verified_best_score: 0,
            last_score: 0,
            total_runs: 0,
            level: 1,
            xp: 0,
            updated_at: now_ms,
        }
    }

    pub fn progress(&self) -> progression::Progress {
        progression::Progress::new(self.level, self.xp)
    }
}

/// Profile enriched with the derived progression stats the client renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub next_level_xp: u64,
    pub damage: f32,
    pub max_hp: u32,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let level = profile.level;
        Self {
            next_level_xp: progression::xp_for_next_level(level),
            damage: progression::damage_for_level(level),
            max_hp: progression::max_hp_for_level(level),
            profile,
        }
    }
}

/// Canonicalize an address: trim, lowercase, `0x` + 40 hex digits.
pub fn normalize_address(raw: &str) -> Result<String, LeaderboardError> {
    let addr = raw.trim().to_ascii_lowercase();
    let hex = addr
        .strip_prefix("0x")
        .ok_or(LeaderboardError::InvalidAddress)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LeaderboardError::InvalidAddress);
    }
    Ok(addr)
}

/// Sanitize a submitted score: reject non-finite, floor fractions, clamp
/// negatives to zero.
pub fn sanitize_score(raw: f64) -> Result<u64, LeaderboardError> {
    if !raw.is_finite() {
        return Err(LeaderboardError::InvalidScore);
    }
    Ok(raw.floor().max(0.0) as u64)
}

fn field_u64(record: &Value, key: &str) -> u64 {
    match record.get(key) {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                // negative or fractional, clamp through f64
                n.as_f64().map_or(0, |f| f.max(0.0).floor() as u64)
            }
        }
        _ => 0,
    }
}

/// Rebuild one stored record, repairing bad fields instead of dropping the
/// record. Returns None only when the address itself is unusable.
pub fn repair_record(record: &Value) -> Option<Profile> {
    let address = record.get("address")?.as_str()?;
    let address = normalize_address(address).ok()?;
    Some(Profile {
        address,
        best_score: field_u64(record, "bestScore"),
        verified_best_score: field_u64(record, "verifiedBestScore"),
        last_score: field_u64(record, "lastScore"),
        total_runs: field_u64(record, "totalRuns"),
        level: (field_u64(record, "level") as u32).max(1),
        xp: field_u64(record, "xp"),
        updated_at: field_u64(record, "updatedAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0x00112233445566778899aabbccddeeff00112233";

    #[test]
    fn test_normalize_accepts_canonical() {
        assert_eq!(normalize_address(ADDR).unwrap(), ADDR);
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let mixed = "  0x00112233445566778899AABBCCDDEEFF00112233 ";
        assert_eq!(normalize_address(mixed).unwrap(), ADDR);
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("0x1234").is_err());
        assert!(normalize_address("00112233445566778899aabbccddeeff00112233").is_err());
        assert!(normalize_address("0xzz112233445566778899aabbccddeeff00112233").is_err());
    }

    #[test]
    fn test_sanitize_score() {
        assert_eq!(sanitize_score(0.0).unwrap(), 0);
        assert_eq!(sanitize_score(41.9).unwrap(), 41);
        assert_eq!(sanitize_score(-5.0).unwrap(), 0);
        assert!(sanitize_score(f64::NAN).is_err());
        assert!(sanitize_score(f64::INFINITY).is_err());
    }

    #[test]
    fn test_view_derives_stats() {
        let mut p = Profile::new(ADDR.to_string(), 0);
        p.level = 3;
        let view = ProfileView::from(p);
        assert_eq!(view.next_level_xp, progression::xp_for_next_level(3));
        assert_eq!(view.damage, 1.30);
        assert_eq!(view.max_hp, 4);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let view = ProfileView::from(Profile::new(ADDR.to_string(), 7));
        let v = serde_json::to_value(&view).unwrap();
        assert!(v.get("bestScore").is_some());
        assert!(v.get("verifiedBestScore").is_some());
        assert!(v.get("nextLevelXp").is_some());
        assert!(v.get("maxHp").is_some());
        assert!(v.get("best_score").is_none());
    }

    #[test]
    fn test_repair_defaults_missing_fields() {
        let p = repair_record(&json!({ "address": ADDR })).unwrap();
        assert_eq!(p.best_score, 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.total_runs, 0);
    }

    #[test]
    fn test_repair_clamps_negatives_and_floors_level() {
        let p = repair_record(&json!({
            "address": ADDR,
            "bestScore": -40,
            "level": 0,
            "xp": 12.7,
        }))
        .unwrap();
        assert_eq!(p.best_score, 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 12);
    }

    #[test]
    fn test_repair_skips_unusable_address() {
        assert!(repair_record(&json!({ "address": "nope" })).is_none());
        assert!(repair_record(&json!({ "bestScore": 10 })).is_none());
    }
}
