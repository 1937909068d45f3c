use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeatmapError>;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("Invalid argument {name}: {value}")]
    Argument {
        name: &'static str,
        value: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Argument {name} must list at least one value")]
    EmptyList { name: &'static str },

    #[error("Cannot scan base output directory {path}")]
    BaseDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognised boolean token: {token:?}")]
    InvalidBool { token: String },

    #[error("No social capital marker in configuration path {path}")]
    MissingMarker { path: PathBuf },

    #[error("Summary file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("Missing column {column:?} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid number at row {row}, column {column:?} in {path}: {value}")]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Duplicate cell for Day={day}, Exchanges={exchanges}, %_Learning={learning}")]
    DuplicateCell {
        day: f64,
        exchanges: f64,
        learning: i64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl From<toml::de::Error> for HeatmapError {
    fn from(err: toml::de::Error) -> Self {
        HeatmapError::Config(format!("TOML parse error: {}", err))
    }
}
