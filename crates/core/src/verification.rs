//! In-process registry of pending SMS verification codes.
//!
//! Entries are keyed by user id and live only in memory: a restart drops all
//! pending registrations and affected users must register again. Each entry
//! carries an expiry so stale codes cannot accumulate or be replayed.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A pending verification: the code sent via SMS and the phone it went to.
#[derive(Debug, Clone)]
struct PendingVerification {
    code: String,
    phone: String,
    expires_at: Timestamp,
}

/// Mutex-guarded map of pending verifications, keyed by user id.
///
/// One entry per user; re-registering overwrites the previous code.
pub struct VerificationStore {
    entries: Mutex<HashMap<DbId, PendingVerification>>,
    ttl_mins: i64,
}

impl VerificationStore {
    /// Create a store whose entries expire after `ttl_mins` minutes.
    pub fn new(ttl_mins: i64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_mins,
        }
    }

    /// Generate and register a fresh six-digit code for a user, returning
    /// the code so the caller can send it via SMS.
    pub fn issue(&self, user_id: DbId, phone: &str) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000));
        let entry = PendingVerification {
            code: code.clone(),
            phone: phone.to_string(),
            expires_at: Utc::now() + Duration::minutes(self.ttl_mins),
        };
        self.lock().insert(user_id, entry);
        code
    }

    /// Consume the pending entry for a user if `phone` and `code` match
    /// exactly and the entry has not expired.
    ///
    /// Successful consumption removes the entry, so validation is one-shot.
    /// Expired entries are removed on the way out as well.
    pub fn consume(&self, user_id: DbId, phone: &str, code: &str) -> Result<(), CoreError> {
        let mut entries = self.lock();

        let entry = entries
            .get(&user_id)
            .ok_or_else(|| CoreError::Unauthorized("No pending verification".into()))?;

        if entry.expires_at <= Utc::now() {
            entries.remove(&user_id);
            return Err(CoreError::Unauthorized("Verification code expired".into()));
        }

        if entry.phone != phone || entry.code != code {
            return Err(CoreError::Unauthorized(
                "Verification code or phone does not match".into(),
            ));
        }

        entries.remove(&user_id);
        Ok(())
    }

    /// Drop all expired entries. Called opportunistically; correctness does
    /// not depend on it since `consume` checks expiry itself.
    pub fn sweep(&self) {
        let now = Utc::now();
        self.lock().retain(|_, e| e.expires_at > now);
    }

    /// Number of pending entries (expired ones included until swept).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DbId, PendingVerification>> {
        // A poisoned mutex means a panic while holding the lock; the map
        // holds only plain data, so continuing with it is safe.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
