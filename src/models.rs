use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RateLimitQuota;

/// Stored account record, one entry in the `users` table.
///
/// The password is kept as the exact string the account was created with;
/// login compares it verbatim. See DESIGN.md for the security caveat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl Account {
    /// Projection handed to the session layer. Never carries the password.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            username: self.username.clone(),
            email: self.email.clone(),
            favorites: self.favorites.clone(),
        }
    }
}

/// The currently authenticated account's projection, persisted under its own
/// key so a restart restores the session without scanning the account table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub favorites: Vec<String>,
}

/// GitHub core quota snapshot, reported by the health checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
}

impl From<RateLimitQuota> for RateLimitState {
    fn from(quota: RateLimitQuota) -> Self {
        Self {
            remaining: quota.remaining,
            limit: quota.limit,
            reset_time: DateTime::from_timestamp(quota.reset, 0).unwrap_or_else(Utc::now),
            is_limited: quota.remaining == 0,
        }
    }
}
