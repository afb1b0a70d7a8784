use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::github::GitHubClient;
use crate::types::{Profile, Repository, UserSummary};

/// Window size for client-side repository pagination.
pub const REPOS_PER_PAGE: usize = 10;

/// Aggregate view state for one profile: the user, their repositories (the
/// first fetch of up to 100, most recently updated first), followers and
/// following. Never persisted; fetched fresh per view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileBundle {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
}

/// Load the four-request bundle. The first failing request aborts the whole
/// load and surfaces its error; there is no partial bundle.
pub async fn load_profile(client: &GitHubClient, username: &str) -> Result<ProfileBundle> {
    let profile = client.get_user(username).await?;
    let repositories = client.get_repositories(username).await?;
    let followers = client.get_followers(username).await?;
    let following = client.get_following(username).await?;

    debug!(
        "Loaded profile bundle for {} ({} repos, {} followers, {} following)",
        username,
        repositories.len(),
        followers.len(),
        following.len()
    );

    Ok(ProfileBundle {
        profile,
        repositories,
        followers,
        following,
    })
}

/// Hydrate each favorite into a full profile. Individual failures are dropped
/// rather than aborting the whole set.
pub async fn load_favorite_profiles(client: &GitHubClient, favorites: &[String]) -> Vec<Profile> {
    let fetches = favorites.iter().map(|username| client.get_user(username));
    futures::future::join_all(fetches)
        .await
        .into_iter()
        .filter_map(|result| match result {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping favorite profile: {}", e);
                None
            }
        })
        .collect()
}

impl ProfileBundle {
    /// Window of the already-fetched repository list. Pages are 1-based;
    /// display pagination never issues another request.
    pub fn repo_page(&self, page: usize) -> &[Repository] {
        let page = page.max(1);
        let start = (page - 1) * REPOS_PER_PAGE;
        if start >= self.repositories.len() {
            return &[];
        }
        let end = (start + REPOS_PER_PAGE).min(self.repositories.len());
        &self.repositories[start..end]
    }

    pub fn total_repo_pages(&self) -> usize {
        self.repositories.len().div_ceil(REPOS_PER_PAGE)
    }

    pub fn filter_followers(&self, filter: &str) -> Vec<&UserSummary> {
        filter_users(&self.followers, filter)
    }

    pub fn filter_following(&self, filter: &str) -> Vec<&UserSummary> {
        filter_users(&self.following, filter)
    }
}

/// Case-insensitive login substring match.
fn filter_users<'a>(users: &'a [UserSummary], filter: &str) -> Vec<&'a UserSummary> {
    let needle = filter.to_lowercase();
    users
        .iter()
        .filter(|u| u.login.to_lowercase().contains(&needle))
        .collect()
}
