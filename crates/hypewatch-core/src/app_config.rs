use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// YAML roster of the own brand and tracked competitors.
    pub brands_path: PathBuf,
    /// Directory of scraped `.json` / `.jsonl` exports.
    pub data_dir: PathBuf,
    /// Directory holding the JSON-file record collections.
    pub store_dir: PathBuf,
    pub top_hashtags: usize,
    /// Six-field cron expression for the background report refresh.
    pub refresh_cron: String,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}
