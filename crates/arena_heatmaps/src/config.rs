use crate::{
    constants::{FIGURE_STEM, POINTS_PER_INCH},
    error::{HeatmapError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Render configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub figure: FigureConfig,
    pub spacing: SpacingConfig,
    pub fonts: FontConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    pub format: String, // "png" | "jpeg"
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 200.0,
            format: "png".to_string(),
        }
    }
}

/// Subplot margins as fractions of the figure, spacing as fractions of a panel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpacingConfig {
    pub hspace: f64,
    pub wspace: f64,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            hspace: 0.2,
            wspace: 0.2,
            top: 0.8,
            bottom: 0.2,
            left: 0.12,
            right: 0.95,
        }
    }
}

/// Font sizes in points
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
    pub suptitle: f64,
    pub axis_label: f64,
    pub panel_title: f64,
    pub annotation: f64,
    pub tick: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            suptitle: 14.0,
            axis_label: 14.0,
            panel_title: 6.0,
            annotation: 8.0,
            tick: 6.0,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeatmapError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            HeatmapError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fig = &self.figure;
        if !(fig.width_in > 0.0 && fig.height_in > 0.0 && fig.dpi > 0.0) {
            return Err(HeatmapError::Config(format!(
                "figure size and dpi must be positive, got {}x{} in at {} dpi",
                fig.width_in, fig.height_in, fig.dpi
            )));
        }

        match fig.format.as_str() {
            "png" | "jpeg" => {}
            other => {
                return Err(HeatmapError::Config(format!(
                    "Invalid image format: {}. Must be 'png' or 'jpeg'",
                    other
                )));
            }
        }

        let sp = &self.spacing;
        let margins = [sp.top, sp.bottom, sp.left, sp.right];
        if margins.iter().any(|m| !(0.0..=1.0).contains(m)) {
            return Err(HeatmapError::Config(
                "subplot margins must lie within [0, 1]".to_string(),
            ));
        }
        if sp.left >= sp.right || sp.bottom >= sp.top {
            return Err(HeatmapError::Config(format!(
                "left < right and bottom < top required, got left={} right={} bottom={} top={}",
                sp.left, sp.right, sp.bottom, sp.top
            )));
        }
        if !(sp.hspace >= 0.0 && sp.wspace >= 0.0) {
            return Err(HeatmapError::Config(
                "hspace and wspace must be non-negative".to_string(),
            ));
        }

        let f = &self.fonts;
        if [f.suptitle, f.axis_label, f.panel_title, f.annotation, f.tick]
            .iter()
            .any(|&pt| !(pt > 0.0))
        {
            return Err(HeatmapError::Config(
                "font sizes must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Canvas size in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        let w = (self.figure.width_in * self.figure.dpi).round() as u32;
        let h = (self.figure.height_in * self.figure.dpi).round() as u32;
        (w, h)
    }

    /// Converts a point size to pixels at the configured dpi
    pub fn px(&self, points: f64) -> f64 {
        points * self.figure.dpi / POINTS_PER_INCH
    }

    /// `<dir>/mergedSummary.<ext>`
    pub fn figure_path(&self, dir: &Path) -> PathBuf {
        let ext = match self.figure.format.as_str() {
            "jpeg" => "jpg",
            _ => "png",
        };
        dir.join(format!("{}.{}", FIGURE_STEM, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spacing.hspace, 0.2);
        assert_eq!(config.spacing.wspace, 0.2);
        assert_eq!(config.spacing.top, 0.8);
        assert_eq!(config.spacing.bottom, 0.2);
        assert_eq!(config.spacing.left, 0.12);
        assert_eq!(config.spacing.right, 0.95);
        assert_eq!(config.canvas_size(), (1280, 960));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("render.toml");
        std::fs::write(&path, "[figure]\ndpi = 100.0\n\n[fonts]\nannotation = 6.0\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.figure.dpi, 100.0);
        assert_eq!(config.figure.width_in, 6.4);
        assert_eq!(config.fonts.annotation, 6.0);
        assert_eq!(config.fonts.suptitle, 14.0);
        assert_eq!(config.canvas_size(), (640, 480));
    }

    #[test]
    fn test_invalid_margins_rejected() {
        let mut config = Config::default();
        config.spacing.left = 0.96;
        assert!(matches!(config.validate(), Err(HeatmapError::Config(_))));

        let mut config = Config::default();
        config.spacing.top = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut config = Config::default();
        config.figure.format = "svg".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load_from_file(Path::new("no_such_render.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_figure_path_extension() {
        let mut config = Config::default();
        let dir = Path::new("out");
        assert_eq!(config.figure_path(dir), PathBuf::from("out/mergedSummary.png"));
        config.figure.format = "jpeg".to_string();
        assert_eq!(config.figure_path(dir), PathBuf::from("out/mergedSummary.jpg"));
    }

    #[test]
    fn test_px_conversion() {
        let config = Config::default();
        assert!((config.px(72.0) - 200.0).abs() < 1e-9);
    }
}
