//! Simulation version discovery and per-ratio directory layout.

use crate::constants::{
    DATA_SUBDIR, IMAGES_SUBDIR, MIXED_SUFFIX, POPULATION_FILE, SATISFACTION_FILE,
    SOCIAL_CAPITAL_MARKER, SOCIAL_CAPITAL_TERMINATOR,
};
use crate::error::{HeatmapError, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// One simulation version directory that passed the mixed-population filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDir {
    pub path: PathBuf,
    pub social_capital: bool,
}

impl ConfigurationDir {
    /// Returns `None` when the path does not name a mixed-population version.
    pub fn from_path(path: PathBuf) -> Result<Option<Self>> {
        if !is_mixed(&path) {
            return Ok(None);
        }
        let social_capital = social_capital_flag(&path)?;
        Ok(Some(Self {
            path,
            social_capital,
        }))
    }

    /// `<version>/comparative/data/heat_maps/<ratio>/`
    pub fn data_dir(&self, ratio: &str) -> PathBuf {
        join_all(&self.path, &DATA_SUBDIR).join(ratio)
    }

    /// `<version>/comparative/images/heat_maps/<ratio>/`
    pub fn result_dir(&self, ratio: &str) -> PathBuf {
        join_all(&self.path, &IMAGES_SUBDIR).join(ratio)
    }

    pub fn satisfaction_csv(&self, ratio: &str) -> PathBuf {
        self.data_dir(ratio).join(SATISFACTION_FILE)
    }

    pub fn population_csv(&self, ratio: &str) -> PathBuf {
        self.data_dir(ratio).join(POPULATION_FILE)
    }
}

fn join_all(base: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(base.to_path_buf(), |p, s| p.join(s))
}

/// Immediate subdirectories of `base`, in enumeration order.
pub fn list_simulation_versions(base: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(base).map_err(|source| HeatmapError::BaseDirectory {
        path: base.to_path_buf(),
        source,
    })?;

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            versions.push(entry.path());
        }
    }
    Ok(versions)
}

/// Versions ending in `mixed`, each tagged with its social capital flag.
pub fn mixed_configurations(versions: Vec<PathBuf>) -> Result<Vec<ConfigurationDir>> {
    let mut configs = Vec::new();
    for path in versions {
        match ConfigurationDir::from_path(path.clone())? {
            Some(config) => configs.push(config),
            None => debug!("Skipping non-mixed version {}", path.display()),
        }
    }
    Ok(configs)
}

pub fn is_mixed(path: &Path) -> bool {
    path.to_string_lossy().ends_with(MIXED_SUFFIX)
}

/// Reads the token between `useSC_` and the following `_`.
pub fn social_capital_flag(path: &Path) -> Result<bool> {
    let text = path.to_string_lossy();
    let after_marker = text
        .split(SOCIAL_CAPITAL_MARKER)
        .nth(1)
        .ok_or_else(|| HeatmapError::MissingMarker {
            path: path.to_path_buf(),
        })?;
    let token = after_marker
        .split(SOCIAL_CAPITAL_TERMINATOR)
        .next()
        .unwrap_or_default();
    parse_bool(token)
}

/// Accepted tokens (case-insensitive):
/// true for `y`, `yes`, `t`, `true`, `on`, `1`; false for `n`, `no`, `f`, `false`, `off`, `0`.
pub fn parse_bool(token: &str) -> Result<bool> {
    match token.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(HeatmapError::InvalidBool {
            token: token.to_string(),
        }),
    }
}

/// Creates the result directory and any missing parents. Existing directories are left as is.
pub fn prepare_result_dir(config: &ConfigurationDir, ratio: &str) -> Result<PathBuf> {
    let dir = config.result_dir(ratio);
    std::fs::create_dir_all(&dir).map_err(|source| HeatmapError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
