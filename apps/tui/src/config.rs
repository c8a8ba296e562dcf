use dotenv::dotenv;
use std::env;

/// Flask dev server default, where the scorecard backend runs locally.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Runtime configuration, resolved from the environment (after a `.env`
/// file, if present). CLI flags override via `apply_env_overrides`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    /// Local JSON snapshot to load instead of hitting the backend.
    pub data_path: Option<String>,
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_url =
            env::var("SCORECARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_path = env::var("SCORECARD_DATA")
            .ok()
            .filter(|path| !path.is_empty());
        let debug = env::var("DEBUG").is_ok_and(|value| !value.is_empty() && value != "0");

        Self {
            api_url,
            data_path,
            debug,
        }
    }
}
