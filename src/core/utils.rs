use dirs::home_dir;
use std::{env, ffi::OsString, fs, path::Path, path::PathBuf};

use crate::errors::{BudgetError, Result};

pub const HOME_ENV: &str = "BUDGET_TRACKER_HOME";

const DEFAULT_DIR_NAME: &str = ".budget_tracker";
const STORE_DIR: &str = "store";
const EXPORT_DIR: &str = "exports";

/// Returns the application-specific data directory, defaulting to `~/.budget_tracker`.
pub fn app_data_dir() -> Result<PathBuf> {
    resolve_data_dir(env::var_os(HOME_ENV), home_dir())
}

fn resolve_data_dir(custom: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    match (custom, home) {
        (Some(custom), _) if custom.is_empty() => Err(BudgetError::ConfigError(format!(
            "{HOME_ENV} is set but empty"
        ))),
        (Some(custom), _) => Ok(PathBuf::from(custom)),
        (None, Some(home)) => Ok(home.join(DEFAULT_DIR_NAME)),
        (None, None) => Err(BudgetError::ConfigError(format!(
            "no home directory found; set {HOME_ENV} to choose a data directory"
        ))),
    }
}

/// Directory holding one JSON document per persisted key.
pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

/// Default destination for exported snapshots.
pub fn export_dir_in(base: &Path) -> PathBuf {
    base.join(EXPORT_DIR)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
