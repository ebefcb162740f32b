use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable that overrides the database location.
pub(crate) const DB_PATH_ENV: &str = "FINTRACK_DB";

pub(crate) fn db_path() -> Result<PathBuf> {
    resolve_db_path(std::env::var_os(DB_PATH_ENV))
}

fn resolve_db_path(env_override: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        return Ok(path);
    }

    let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "FinTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fintrack.db"))
}
