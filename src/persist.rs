use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const CACHE_DIR: &str = "sel_terminal";
const CACHE_FILE: &str = "location.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationFile {
    version: u32,
    location: String,
    #[serde(default)]
    saved_at: Option<i64>,
}

/// Last saved location, if any. Missing or unreadable files are ignored.
pub fn load_location() -> Option<String> {
    load_location_from(&cache_path()?)
}

pub fn save_location(location: &str) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    save_location_to(&path, location)
}

pub fn load_location_from(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let file = serde_json::from_str::<LocationFile>(&raw).ok()?;
    if file.version != CACHE_VERSION || file.location.trim().is_empty() {
        return None;
    }
    Some(file.location)
}

pub fn save_location_to(path: &Path, location: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create cache dir")?;
    }
    let file = LocationFile {
        version: CACHE_VERSION,
        location: location.to_string(),
        saved_at: Some(Utc::now().timestamp()),
    };
    let json = serde_json::to_string(&file).context("serialize location")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write location")?;
    fs::rename(&tmp, path).context("swap location")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}
