use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://testapi.uzllf.uz/api/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub stale_time: Duration,
    pub fetch_parallelism: usize,
    pub prefs_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            stale_time: Duration::ZERO,
            fetch_parallelism: 4,
            prefs_file: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads `.env.local` / `.env` (if present) and then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let api_base = env::var("UZLLF_API_BASE")
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let stale_secs = env::var("UZLLF_STALE_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(0)
            .min(3600);
        let fetch_parallelism = env::var("FETCH_PARALLELISM")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(1, 32);

        Self {
            api_base,
            stale_time: Duration::from_secs(stale_secs),
            fetch_parallelism,
            prefs_file: non_empty_path("UZLLF_PREFS_FILE"),
            log_file: non_empty_path("UZLLF_LOG_FILE"),
        }
    }
}

fn non_empty_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
