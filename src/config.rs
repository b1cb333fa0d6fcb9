use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/sel";
pub const DEFAULT_DECIMAL_COLUMNS: &[&str] = &["Average", "Home Avg.", "Away Avg."];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceKind,
    pub api_url: String,
    /// Page location whose query seeds `season`/`search`. `None` falls back
    /// to the last saved location.
    pub location: Option<String>,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub decimal_columns: Vec<String>,
    pub export_dir: PathBuf,
}

impl Config {
    /// Reads `SEL_*` variables. Call after `.env` files are loaded.
    pub fn from_env() -> Self {
        let source = match env::var("SEL_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" => SourceKind::Demo,
            _ => SourceKind::Http,
        };
        let api_url = non_empty_env("SEL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let search_debounce = Duration::from_millis(
            env::var("SEL_SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(500)
                .max(50),
        );
        let http_timeout = Duration::from_secs(
            env::var("SEL_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(10)
                .max(1),
        );
        let decimal_columns = match env::var("SEL_DECIMAL_COLUMNS") {
            Ok(raw) => parse_list(&raw),
            Err(_) => DEFAULT_DECIMAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
        };
        let export_dir = non_empty_env("SEL_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            source,
            api_url,
            location: non_empty_env("SEL_LOCATION"),
            search_debounce,
            http_timeout,
            decimal_columns,
            export_dir,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Comma or semicolon separated; blanks dropped. Spaces inside names are kept.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
