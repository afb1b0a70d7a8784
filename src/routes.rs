use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;

use crate::auth::SessionManager;
use crate::error::FinderError;
use crate::github::GitHubClient;
use crate::models::SessionUser;
use crate::profile;
use crate::search::{AccountType, SearchFilters, SearchPager, SearchSort};
use crate::types::{Profile, Repository, UserSummary};

const MIN_PASSWORD_LEN: usize = 6;

/// API state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub session: Arc<RwLock<SessionManager>>,
    pub pager: Arc<Mutex<SearchPager>>,
    pub github: Arc<GitHubClient>,
}

/// Response for errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for FinderError {
    fn into_response(self) -> Response {
        let status = match &self {
            FinderError::Validation(_) => StatusCode::BAD_REQUEST,
            FinderError::InvalidCredentials | FinderError::NotAuthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            FinderError::DuplicateAccount => StatusCode::CONFLICT,
            FinderError::NotFound(_) => StatusCode::NOT_FOUND,
            FinderError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FinderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            FinderError::FetchFailed(_) | FinderError::NetworkError(_) => StatusCode::BAD_GATEWAY,
            FinderError::JsonError(_)
            | FinderError::IoError(_)
            | FinderError::StorageError(_)
            | FinderError::UrlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, FinderError>;

/// Create the API router
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        // Account and session
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        // Favorites
        .route("/favorites", get(list_favorites))
        .route("/favorites/profiles", get(favorite_profiles))
        .route("/favorites/:username", put(add_favorite).delete(remove_favorite))
        // GitHub search and profiles
        .route("/search", get(search))
        .route("/users/:username", get(user_profile))
        // The session user's own view
        .route("/profile/me", get(my_profile))
        .route("/profile/me/avatar", put(set_avatar))
        .route("/settings/theme", get(get_theme).put(set_theme))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

async fn signup(
    State(state): State<ApiState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<SessionResponse> {
    // Form-level checks live here, not in the session manager.
    if req.username.trim().is_empty() {
        return Err(FinderError::Validation("Username is required".to_string()));
    }
    if req.email.trim().is_empty() {
        return Err(FinderError::Validation("Email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(FinderError::Validation("Password is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(FinderError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let mut session = state.session.write().await;
    let user = session.signup(&req.username, &req.email, &req.password)?;
    Ok(Json(SessionResponse {
        is_authenticated: true,
        user: Some(user),
    }))
}

async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    if req.password.is_empty() {
        return Err(FinderError::Validation("Password is required".to_string()));
    }

    let mut session = state.session.write().await;
    let user = session.login(&req.identifier, &req.password)?;
    Ok(Json(SessionResponse {
        is_authenticated: true,
        user: Some(user),
    }))
}

async fn logout(State(state): State<ApiState>) -> ApiResult<SessionResponse> {
    let mut session = state.session.write().await;
    session.logout()?;
    Ok(Json(SessionResponse {
        is_authenticated: false,
        user: None,
    }))
}

async fn current_session(State(state): State<ApiState>) -> ApiResult<SessionResponse> {
    let session = state.session.read().await;
    Ok(Json(SessionResponse {
        is_authenticated: session.is_authenticated(),
        user: session.current_user().cloned(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
}

async fn list_favorites(State(state): State<ApiState>) -> ApiResult<FavoritesResponse> {
    let session = state.session.read().await;
    if !session.is_authenticated() {
        return Err(FinderError::NotAuthenticated(
            "Login to add favorites".to_string(),
        ));
    }
    Ok(Json(FavoritesResponse {
        favorites: session.favorites().to_vec(),
    }))
}

async fn add_favorite(
    State(state): State<ApiState>,
    Path(username): Path<String>,
) -> ApiResult<FavoritesResponse> {
    let mut session = state.session.write().await;
    if !session.is_authenticated() {
        return Err(FinderError::NotAuthenticated(
            "Login to add favorites".to_string(),
        ));
    }
    session.add_to_favorites(&username)?;
    Ok(Json(FavoritesResponse {
        favorites: session.favorites().to_vec(),
    }))
}

async fn remove_favorite(
    State(state): State<ApiState>,
    Path(username): Path<String>,
) -> ApiResult<FavoritesResponse> {
    let mut session = state.session.write().await;
    if !session.is_authenticated() {
        return Err(FinderError::NotAuthenticated(
            "Login to add favorites".to_string(),
        ));
    }
    session.remove_from_favorites(&username)?;
    Ok(Json(FavoritesResponse {
        favorites: session.favorites().to_vec(),
    }))
}

async fn favorite_profiles(State(state): State<ApiState>) -> ApiResult<Vec<Profile>> {
    let favorites = {
        let session = state.session.read().await;
        if !session.is_authenticated() {
            return Err(FinderError::NotAuthenticated(
                "Login to add favorites".to_string(),
            ));
        }
        session.favorites().to_vec()
    };

    let profiles = profile::load_favorite_profiles(&state.github, &favorites).await;
    Ok(Json(profiles))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub location: Option<String>,
    pub min_repos: Option<u32>,
    pub min_followers: Option<u32>,
    pub account_type: Option<AccountType>,
    pub sort: Option<SearchSort>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<UserSummary>,
    pub total_count: u32,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

async fn search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResponse> {
    let term = params.q.as_deref().unwrap_or("").trim().to_string();
    if term.is_empty() {
        return Err(FinderError::Validation("Please enter a username".to_string()));
    }

    let filters = SearchFilters {
        location: params.location,
        min_repos: params.min_repos,
        min_followers: params.min_followers,
        account_type: params.account_type,
        sort: params.sort,
    };
    let query = filters.build_query(&term);
    let page = params.page.unwrap_or(1);

    // Snapshot a page request instead of holding the pager across the fetch,
    // so a newer query can supersede this one while it is in flight.
    let request = {
        let mut pager = state.pager.lock().await;
        if page <= 1 || pager.query() != query {
            Some(pager.begin(&query))
        } else {
            pager.next_page()
        }
    };

    let Some(request) = request else {
        // Nothing left to fetch; answer from the accumulated state.
        let pager = state.pager.lock().await;
        return Ok(Json(snapshot_response(&pager)));
    };

    let fetched = state
        .github
        .search_users(&request.query, request.page, request.per_page)
        .await;

    let mut pager = state.pager.lock().await;
    match fetched {
        Ok(results) => {
            pager.apply(&request, results);
            Ok(Json(snapshot_response(&pager)))
        }
        Err(e) => {
            // A failed search replaces any previously accumulated results.
            pager.clear();
            Err(e)
        }
    }
}

fn snapshot_response(pager: &SearchPager) -> SearchResponse {
    let notice = if pager.total_count() == 0 {
        Some("No users found matching your search criteria.".to_string())
    } else {
        None
    };
    SearchResponse {
        items: pager.items().to_vec(),
        total_count: pager.total_count(),
        has_more: pager.has_more(),
        notice,
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub repo_page: Option<usize>,
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
    pub repo_page: usize,
    pub total_repo_pages: usize,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    pub is_favorite: bool,
}

async fn user_profile(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(params): Query<ProfileParams>,
) -> ApiResult<ProfileResponse> {
    let bundle = profile::load_profile(&state.github, &username).await?;
    let repo_page = params.repo_page.unwrap_or(1).max(1);
    let filter = params.filter.unwrap_or_default();
    let is_favorite = state.session.read().await.is_favorite(&username);

    Ok(Json(ProfileResponse {
        repositories: bundle.repo_page(repo_page).to_vec(),
        total_repo_pages: bundle.total_repo_pages(),
        repo_page,
        followers: bundle.filter_followers(&filter).into_iter().cloned().collect(),
        following: bundle.filter_following(&filter).into_iter().cloned().collect(),
        profile: bundle.profile,
        is_favorite,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyProfileResponse {
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub dark_mode: bool,
}

async fn my_profile(State(state): State<ApiState>) -> ApiResult<MyProfileResponse> {
    let session = state.session.read().await;
    let user = session
        .current_user()
        .cloned()
        .ok_or_else(|| FinderError::NotAuthenticated("Not logged in".to_string()))?;
    let avatar = session.store().avatar(&user.email);
    let dark_mode = session.store().dark_mode();
    Ok(Json(MyProfileResponse {
        user,
        avatar,
        dark_mode,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarRequest {
    pub data_uri: String,
}

async fn set_avatar(
    State(state): State<ApiState>,
    Json(req): Json<AvatarRequest>,
) -> std::result::Result<StatusCode, FinderError> {
    let session = state.session.read().await;
    let user = session
        .current_user()
        .ok_or_else(|| FinderError::NotAuthenticated("Not logged in".to_string()))?;
    session.store().set_avatar(&user.email, &req.data_uri)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub dark_mode: bool,
}

async fn get_theme(State(state): State<ApiState>) -> Json<ThemeSettings> {
    let session = state.session.read().await;
    Json(ThemeSettings {
        dark_mode: session.store().dark_mode(),
    })
}

async fn set_theme(
    State(state): State<ApiState>,
    Json(req): Json<ThemeSettings>,
) -> ApiResult<ThemeSettings> {
    let session = state.session.read().await;
    session.store().set_dark_mode(req.dark_mode)?;
    Ok(Json(ThemeSettings {
        dark_mode: req.dark_mode,
    }))
}
