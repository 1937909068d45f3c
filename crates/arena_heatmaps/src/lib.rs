pub mod config;
pub mod constants;
pub mod csv_reader;
pub mod discovery;
pub mod error;
pub mod figure;
pub mod palette;
pub mod pipeline;
pub mod pivot;
pub mod settings;

pub use config::Config;
pub use csv_reader::{SummaryTable, read_summary_csv, round_dp};
pub use discovery::{ConfigurationDir, list_simulation_versions, mixed_configurations};
pub use error::HeatmapError;
pub use figure::render_figure;
pub use palette::{ColorRamp, ColorScale, build_diverging_palette};
pub use pipeline::run;
pub use pivot::{Metric, MetricRow, PivotGrid, build_metric_rows, pivot};
pub use settings::Settings;
