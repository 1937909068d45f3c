//! Positional run arguments gathered into one immutable [`Settings`].
//!
//! Integer lists are JSON arrays of decimal integers. A trailing comma before
//! the closing bracket is accepted; unary plus, tuples and hex/octal/binary
//! literals are not.

use crate::error::{HeatmapError, Result};
use std::path::{Path, PathBuf};

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub folder_name: String,
    pub learning_percentages: Vec<i64>,
    /// Accepted for compatibility with the simulation driver; not used to filter.
    pub exchanges: Vec<i64>,
    pub starting_ratios: Vec<String>,
    /// Accepted for compatibility with the simulation driver; not used to filter.
    pub days_of_interest: Vec<i64>,
    pub base_output_directory: PathBuf,
}

impl Settings {
    /// Parses the raw argument texts and joins `folder_name` to `project_root`.
    pub fn from_args(
        folder_name: &str,
        learning_percentages: &str,
        exchanges: &str,
        starting_ratios: &str,
        days_of_interest: &str,
        project_root: &Path,
    ) -> Result<Self> {
        let learning_percentages = parse_int_list("learning percentages", learning_percentages)?;
        if learning_percentages.is_empty() {
            return Err(HeatmapError::EmptyList {
                name: "learning percentages",
            });
        }

        Ok(Self {
            folder_name: folder_name.to_string(),
            learning_percentages,
            exchanges: parse_int_list("exchanges", exchanges)?,
            starting_ratios: parse_ratio_labels(starting_ratios),
            days_of_interest: parse_int_list("days of interest", days_of_interest)?,
            base_output_directory: project_root.join(folder_name),
        })
    }
}

/// Parses a bracketed integer list such as `[10, 20, 30]` or `[10, 20,]`.
pub fn parse_int_list(name: &'static str, text: &str) -> Result<Vec<i64>> {
    let normalized = strip_trailing_comma(text.trim());
    serde_json::from_str(&normalized).map_err(|source| HeatmapError::Argument {
        name,
        value: text.to_string(),
        source,
    })
}

/// `[1, 2,]` -> `[1, 2]`. Anything else, `[,]` included, is returned unchanged.
fn strip_trailing_comma(text: &str) -> String {
    let stripped = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|inner| inner.trim_end().strip_suffix(','))
        .filter(|inner| !inner.trim().is_empty() && !inner.trim_end().ends_with(','));
    match stripped {
        Some(inner) => format!("[{inner}]"),
        None => text.to_string(),
    }
}

/// Strips brackets and spaces, then splits on commas. Tokens are kept verbatim.
pub fn parse_ratio_labels(text: &str) -> Vec<String> {
    let stripped: String = text
        .chars()
        .filter(|&c| !matches!(c, '[' | ']' | ' '))
        .collect();
    stripped.split(',').map(str::to_string).collect()
}

/// Workspace root of this crate, where simulation sets are written.
pub fn default_project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}
