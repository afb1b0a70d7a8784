#![allow(dead_code)]

use axum::Router;
use serde_json::{json, Value};

/// Serve a router on an ephemeral local port and return its base URL. Stands
/// in for the GitHub API so tests never leave the machine.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().expect("Failed to read mock address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock GitHub API stopped");
    });
    format!("http://{}", addr)
}

pub fn user_summary(login: &str) -> Value {
    json!({
        "login": login,
        "avatar_url": format!("https://avatars.githubusercontent.com/{}", login),
        "html_url": format!("https://github.com/{}", login),
    })
}

pub fn profile(login: &str) -> Value {
    json!({
        "login": login,
        "avatar_url": format!("https://avatars.githubusercontent.com/{}", login),
        "html_url": format!("https://github.com/{}", login),
        "name": "Linus Torvalds",
        "bio": null,
        "followers": 8000,
        "following": 9,
        "public_repos": 8,
        "location": "Portland, OR",
        "company": null,
        "blog": null,
        "twitter_username": null,
    })
}

pub fn repository(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Just a kernel",
        "html_url": format!("https://github.com/torvalds/{}", name),
        "stargazers_count": 150000,
        "language": "C",
        "updated_at": "2024-01-15T10:30:00Z",
    })
}
