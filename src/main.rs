use clap::Parser;
use colored::*;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::EnvFilter;

use github_profile_finder::auth::SessionManager;
use github_profile_finder::cli::Cli;
use github_profile_finder::error::Result;
use github_profile_finder::github::GitHubClient;
use github_profile_finder::health::{create_health_router, HealthState};
use github_profile_finder::routes::{create_api_router, ApiState};
use github_profile_finder::search::SearchPager;
use github_profile_finder::store::AccountStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing with DEBUG level by default
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Profile Finder Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let store = AccountStore::open(&cli.data_dir)?;
    println!("✅ Opened account store at {}", cli.data_dir.display());

    let session = SessionManager::new(store.clone());
    if let Some(user) = session.current_user() {
        println!("🔑 Restored session for {}", user.username);
    }

    if cli.github_token.is_none() {
        println!(
            "{}",
            "⚠️ No GitHub token configured; unauthenticated rate limits apply".yellow()
        );
    }

    let github = Arc::new(GitHubClient::new(
        &cli.github_api_url,
        cli.github_token.clone(),
    )?);

    let api_state = ApiState {
        session: Arc::new(RwLock::new(session)),
        pager: Arc::new(Mutex::new(SearchPager::new(cli.search_per_page))),
        github: github.clone(),
    };
    let health_state = HealthState {
        store,
        github,
        start_time: std::time::Instant::now(),
    };

    let app = create_api_router(api_state).merge(create_health_router(health_state));

    let listener = tokio::net::TcpListener::bind(&cli.listen_addr).await?;
    println!("✅ API server listening on http://{}", cli.listen_addr);
    println!("\nPress Ctrl+C to stop the server\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("✅ Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    println!("\n🛑 Shutting down server...");
}
