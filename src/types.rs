use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// GitHub API response structures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub items: Vec<UserSummary>,
    pub total_count: u32,
}

/// Full profile from `/users/:username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Envelope returned by `GET /rate_limit`.
#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    pub rate: RateLimitQuota,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitQuota {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}
