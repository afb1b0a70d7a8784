use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::{FinderError, Result};
use crate::models::RateLimitState;
use crate::types::{Profile, RateLimitResponse, Repository, SearchResults, UserSummary};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const REPOS_PER_FETCH: u32 = 100;

/// Message for 403 responses outside of search.
const RATE_LIMIT_MESSAGE: &str = "API rate limit exceeded. Please try again later.";

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// No request timeout is configured; completion is governed by the
    /// transport default.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .user_agent("GitHub Profile Finder/0.1.0")
            .build()?;

        Ok(GitHubClient {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(FinderError::from)
    }

    async fn send(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, ACCEPT_HEADER);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;

        if let Some(remaining) = rate_limit_remaining(&response) {
            if remaining < 10 {
                warn!("GitHub rate limit low: {} requests remaining", remaining);
            }
        }
        debug!(%url, status = %response.status(), "GitHub request completed");
        Ok(response)
    }

    /// Search users. `query` carries any search qualifiers already joined in;
    /// it is sent URL-encoded as a single `q` parameter.
    pub async fn search_users(&self, query: &str, page: u32, per_page: u32) -> Result<SearchResults> {
        let mut url = self.endpoint("search/users")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(
                "API rate limit exceeded. Please try again later or add a GitHub token."
                    .to_string(),
            )),
            StatusCode::UNPROCESSABLE_ENTITY => Err(FinderError::InvalidQuery(
                "Invalid search query. Please try a different search term.".to_string(),
            )),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch search results. Please try again later.".to_string(),
            )),
        }
    }

    pub async fn get_user(&self, username: &str) -> Result<Profile> {
        let url = self.endpoint(&format!("users/{}", username))?;
        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(FinderError::NotFound(format!(
                "User {} not found",
                username
            ))),
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(RATE_LIMIT_MESSAGE.to_string())),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch profile. Please try again later.".to_string(),
            )),
        }
    }

    /// The first page of up to 100 repositories, most recently updated first.
    /// Display pagination slices this list client-side.
    pub async fn get_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&format!("users/{}/repos", username))?;
        url.query_pairs_mut()
            .append_pair("per_page", &REPOS_PER_FETCH.to_string())
            .append_pair("sort", "updated");

        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(RATE_LIMIT_MESSAGE.to_string())),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch repositories. Please try again later.".to_string(),
            )),
        }
    }

    pub async fn get_followers(&self, username: &str) -> Result<Vec<UserSummary>> {
        let url = self.endpoint(&format!("users/{}/followers", username))?;
        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(RATE_LIMIT_MESSAGE.to_string())),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch followers. Please try again later.".to_string(),
            )),
        }
    }

    pub async fn get_following(&self, username: &str) -> Result<Vec<UserSummary>> {
        let url = self.endpoint(&format!("users/{}/following", username))?;
        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(RATE_LIMIT_MESSAGE.to_string())),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch following list. Please try again later.".to_string(),
            )),
        }
    }

    /// Current core quota, used by the health checks. Never consumes quota.
    pub async fn rate_limit(&self) -> Result<RateLimitState> {
        let url = self.endpoint("rate_limit")?;
        let response = self.send(url).await?;
        match response.status() {
            status if status.is_success() => {
                let body: RateLimitResponse = response.json().await?;
                Ok(body.rate.into())
            }
            StatusCode::FORBIDDEN => Err(FinderError::RateLimited(RATE_LIMIT_MESSAGE.to_string())),
            _ => Err(FinderError::FetchFailed(
                "Failed to fetch rate limit. Please try again later.".to_string(),
            )),
        }
    }
}

fn rate_limit_remaining(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("X-RateLimit-Remaining")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
