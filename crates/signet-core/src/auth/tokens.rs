use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use anyhow::Result;

/// Token file name in the data directory
const TOKENS_FILE: &str = "tokens.json";

/// Access tokens are minted with a one-day lifetime.
const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Refresh tokens last seven days; when one lapses the user signs in again.
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Utc::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// On-disk shape. Both tokens are written in one operation so a reader
/// never sees an access token whose refresh token was never issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenPair {
    access: StoredToken,
    refresh: StoredToken,
}

/// Durable storage for the bearer token pair.
///
/// Every read goes back to the file rather than a cached copy, so the
/// latest writer wins when several processes share one data directory.
/// Expired entries read as absent, the way an expired cookie would.
#[derive(Debug, Clone)]
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Current access token, if one is stored and still within its TTL.
    pub fn access_token(&self) -> Option<String> {
        let pair = self.load()?;
        if pair.access.is_expired() {
            return None;
        }
        Some(pair.access.value)
    }

    /// Current refresh token, if one is stored and still within its TTL.
    pub fn refresh_token(&self) -> Option<String> {
        let pair = self.load()?;
        if pair.refresh.is_expired() {
            return None;
        }
        Some(pair.refresh.value)
    }

    /// Persist a freshly issued pair, stamping both expiries.
    pub fn store(&self, access: &str, refresh: &str) -> Result<()> {
        self.save(&TokenPair {
            access: StoredToken::new(access, Duration::hours(ACCESS_TOKEN_TTL_HOURS)),
            refresh: StoredToken::new(refresh, Duration::days(REFRESH_TOKEN_TTL_DAYS)),
        })
    }

    /// Rotate the access token after a silent refresh. The refresh token
    /// and its expiry are left untouched. If the pair was cleared while
    /// the refresh was in flight, it stays cleared.
    pub fn set_access(&self, access: &str) -> Result<()> {
        match self.load() {
            Some(mut pair) => {
                pair.access = StoredToken::new(access, Duration::hours(ACCESS_TOKEN_TTL_HOURS));
                self.save(&pair)
            }
            None => {
                debug!("No stored token pair; dropping rotated access token");
                Ok(())
            }
        }
    }

    /// Remove both tokens.
    pub fn clear(&self) -> Result<()> {
        let path = self.tokens_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn load(&self) -> Option<TokenPair> {
        let path = self.tokens_path();
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(pair) => Some(pair),
            Err(e) => {
                debug!(error = %e, "Failed to parse token file");
                None
            }
        }
    }

    fn save(&self, pair: &TokenPair) -> Result<()> {
        let path = self.tokens_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(pair)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn tokens_path(&self) -> PathBuf {
        self.data_dir.join(TOKENS_FILE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TokenStore {
        TokenStore::new(dir.path().to_path_buf())
    }

    #[test]
    fn test_store_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.store("acc-1", "ref-1").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("acc-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn test_empty_store_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_clear_removes_both() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.store("acc-1", "ref-1").unwrap();
        store.clear().unwrap();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert!(!dir.path().join(TOKENS_FILE).exists());
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).clear().unwrap();
    }

    #[test]
    fn test_set_access_keeps_refresh() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.store("acc-1", "ref-1").unwrap();
        store.set_access("acc-2").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("acc-2"));
        assert_eq!(store.refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn test_set_access_without_pair_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set_access("acc-2").unwrap();
        assert_eq!(store.access_token(), None);
        assert!(!dir.path().join(TOKENS_FILE).exists());
    }

    #[test]
    fn test_expired_access_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let pair = TokenPair {
            access: StoredToken {
                value: "acc-1".to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
            },
            refresh: StoredToken::new("ref-1", Duration::days(REFRESH_TOKEN_TTL_DAYS)),
        };
        store.save(&pair).unwrap();

        assert_eq!(store.access_token(), None);
        // The longer-lived refresh token is still usable
        assert_eq!(store.refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn test_expired_refresh_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let pair = TokenPair {
            access: StoredToken::new("acc-1", Duration::hours(ACCESS_TOKEN_TTL_HOURS)),
            refresh: StoredToken {
                value: "ref-1".to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
            },
        };
        store.save(&pair).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("acc-1"));
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_corrupt_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        std::fs::write(dir.path().join(TOKENS_FILE), "not json").unwrap();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_last_writer_wins_across_handles() {
        let dir = TempDir::new().unwrap();
        let first = store_in(&dir);
        let second = store_in(&dir);

        first.store("acc-1", "ref-1").unwrap();
        second.store("acc-2", "ref-2").unwrap();
        assert_eq!(first.access_token().as_deref(), Some("acc-2"));
    }
}
