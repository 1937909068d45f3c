/// Configuration directory selection
pub const MIXED_SUFFIX: &str = "mixed"; // only mixed populations are compared
pub const SOCIAL_CAPITAL_MARKER: &str = "useSC_";
pub const SOCIAL_CAPITAL_TERMINATOR: char = '_';

/// Relative layout inside a configuration directory
pub const DATA_SUBDIR: [&str; 3] = ["comparative", "data", "heat_maps"];
pub const IMAGES_SUBDIR: [&str; 3] = ["comparative", "images", "heat_maps"];
pub const SATISFACTION_FILE: &str = "mergedSummary.csv";
pub const POPULATION_FILE: &str = "mergedPopulationSummary.csv";
pub const FIGURE_STEM: &str = "mergedSummary";

/// Expected headers in summary CSV files
pub const DAY_HEADER: &str = "Day";
pub const EXCHANGES_HEADER: &str = "Exchanges";
pub const LEARNING_HEADER: &str = "%_Learning";
pub const SELFISH_HEADER: &str = "Selfish";
pub const SOCIAL_HEADER: &str = "Social";
pub const SOCIAL_POPULATION_HEADER: &str = "%_Social";

/// Rounding applied to every numeric cell on load
pub const ROUND_DECIMALS: i32 = 2;

/// Colour scales
pub const PALETTE_STEPS: usize = 256;
pub const SATISFACTION_RANGE: (f64, f64, f64) = (0.0, 1.0, 0.5); // (vmin, vmax, center)
pub const POPULATION_RANGE: (f64, f64, f64) = (0.0, 100.0, 50.0);
pub const LUMINANCE_THRESHOLD: f64 = 0.408; // dark text above, white text below

/// Colour bar geometry (fractions of the panel width)
pub const HEATMAP_FRACTION: f64 = 0.80;
pub const COLORBAR_OFFSET: f64 = 0.85;
pub const COLORBAR_FRACTION: f64 = 0.15;
pub const COLORBAR_ASPECT: f64 = 20.0;
pub const COLORBAR_TICKS: usize = 6;

/// Figure text positions (figure fractions, origin bottom left)
pub const SUPTITLE_Y: f64 = 0.98;
pub const XLABEL_POS: (f64, f64) = (0.5, 0.02);
pub const YLABEL_POS: (f64, f64) = (0.04, 0.5);
pub const POINTS_PER_INCH: f64 = 72.0;
