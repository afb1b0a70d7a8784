use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "github-profile-finder")]
#[command(about = "GitHub Profile Finder Server - Searches GitHub users and tracks favorite profiles")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Address the API server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen_addr: String,

    /// Directory backing the local account store
    #[arg(long, env = "DATA_DIR", default_value = ".profile-finder")]
    pub data_dir: PathBuf,

    /// GitHub API token, sent as `Authorization: token <token>` when present
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = crate::github::DEFAULT_API_BASE_URL)]
    pub github_api_url: String,

    /// Search results fetched per page
    #[arg(long, env = "SEARCH_PER_PAGE", default_value_t = crate::search::DEFAULT_PER_PAGE)]
    pub search_per_page: u32,
}
