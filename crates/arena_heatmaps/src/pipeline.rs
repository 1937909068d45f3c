//! Discovery → load → pivot → render, one figure per (version, starting ratio).

use crate::{
    config::Config,
    csv_reader::read_summary_csv,
    discovery::{ConfigurationDir, list_simulation_versions, mixed_configurations, prepare_result_dir},
    error::Result,
    figure::render_figure,
    pivot::{MetricRow, build_metric_rows},
    settings::Settings,
};
use log::{debug, info};
use std::path::PathBuf;

/// Renders every mixed version for every starting ratio. Stops at the first error.
///
/// # Returns
/// Paths of the written figures, in processing order
pub fn run(settings: &Settings, config: &Config) -> Result<Vec<PathBuf>> {
    info!(
        "Scanning simulation versions in {}",
        settings.base_output_directory.display()
    );
    debug!(
        "Exchanges {:?} and days of interest {:?} are not used for filtering",
        settings.exchanges, settings.days_of_interest
    );

    let versions = list_simulation_versions(&settings.base_output_directory)?;
    let configurations = mixed_configurations(versions)?;
    info!("{} mixed configuration(s) found", configurations.len());

    let mut written = Vec::new();
    for configuration in &configurations {
        for ratio in &settings.starting_ratios {
            let path = process_ratio(configuration, ratio, &settings.learning_percentages, config)?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
    }
    Ok(written)
}

/// Creates the result directory, then loads, pivots and renders one figure
pub fn process_ratio(
    configuration: &ConfigurationDir,
    ratio: &str,
    learning_percentages: &[i64],
    config: &Config,
) -> Result<PathBuf> {
    info!(
        "Processing {} (ratio {}, social capital {})",
        configuration.path.display(),
        ratio,
        configuration.social_capital
    );
    let result_dir = prepare_result_dir(configuration, ratio)?;
    let rows = load_metric_rows(configuration, ratio, learning_percentages)?;

    let output = config.figure_path(&result_dir);
    render_figure(&rows, configuration.social_capital, config, &output)?;
    Ok(output)
}

/// Reads both summaries of one ratio and pivots them
pub fn load_metric_rows(
    configuration: &ConfigurationDir,
    ratio: &str,
    learning_percentages: &[i64],
) -> Result<Vec<MetricRow>> {
    let satisfaction = read_summary_csv(configuration.satisfaction_csv(ratio))?;
    let population = read_summary_csv(configuration.population_csv(ratio))?;
    debug!(
        "Loaded {} satisfaction and {} population rows",
        satisfaction.len(),
        population.len()
    );
    build_metric_rows(&satisfaction, &population, learning_percentages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeatmapError;
    use crate::figure::{FigureLayout, load_system_font};
    use crate::palette::ColorScale;
    use crate::pivot::Metric;
    use image::Rgb;
    use std::path::Path;
    use tempfile::TempDir;

    const SATISFACTION: &str = "\
Day,Exchanges,%_Learning,Selfish,Social
1,2,50,0.333,0.667
1,4,50,0.25,0.75
";

    const POPULATION: &str = "\
Day,Exchanges,%_Learning,%_Social
1,2,50,50
1,4,50,62.5
";

    fn configuration(root: &Path, name: &str) -> ConfigurationDir {
        ConfigurationDir {
            path: root.join(name),
            social_capital: true,
        }
    }

    fn write_summaries(config: &ConfigurationDir, ratio: &str, satisfaction: Option<&str>) {
        let dir = config.data_dir(ratio);
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(content) = satisfaction {
            std::fs::write(dir.join("mergedSummary.csv"), content).unwrap();
        }
        std::fs::write(dir.join("mergedPopulationSummary.csv"), POPULATION).unwrap();
    }

    fn settings(base: PathBuf) -> Settings {
        Settings {
            folder_name: "Set".to_string(),
            learning_percentages: vec![50],
            exchanges: vec![2, 4],
            starting_ratios: vec!["1:1".to_string()],
            days_of_interest: vec![1],
            base_output_directory: base,
        }
    }

    #[test]
    fn test_load_metric_rows() {
        let temp_dir = TempDir::new().unwrap();
        let config = configuration(temp_dir.path(), "useSC_True_a_mixed");
        write_summaries(&config, "1:1", Some(SATISFACTION));

        let rows = load_metric_rows(&config, "1:1", &[50]).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].metric, Metric::SelfishSatisfaction);
        assert_eq!(rows[0].grids[0].value_at(1.0, 2.0), Some(0.33));
        assert_eq!(rows[1].grids[0].value_at(1.0, 2.0), Some(0.67));
        assert_eq!(rows[2].grids[0].value_at(1.0, 4.0), Some(62.5));
    }

    const SATISFACTION_TWO_DAYS: &str = "\
Day,Exchanges,%_Learning,Selfish,Social
1,2,50,0.25,0.75
1,4,50,0.5,0.5
2,2,50,0.75,0.25
2,4,50,1,0
";

    const POPULATION_TWO_DAYS: &str = "\
Day,Exchanges,%_Learning,%_Social
1,2,50,50
1,4,50,25
2,2,50,100
2,4,50,75
";

    #[test]
    fn test_process_ratio_renders_figure() {
        if let Err(HeatmapError::Font(_)) = load_system_font() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let configuration = configuration(temp_dir.path(), "useSC_True_a_mixed");
        let data_dir = configuration.data_dir("1:1");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("mergedSummary.csv"), SATISFACTION_TWO_DAYS).unwrap();
        std::fs::write(data_dir.join("mergedPopulationSummary.csv"), POPULATION_TWO_DAYS).unwrap();

        let config = Config::default();
        let path = process_ratio(&configuration, "1:1", &[50], &config).unwrap();
        assert_eq!(path, configuration.result_dir("1:1").join("mergedSummary.png"));

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (1280, 960));

        // sample near the top left corner of a cell, clear of the annotation
        let layout = FigureLayout::new(1280.0, 960.0, 3, 1, &config.spacing);
        let population = &layout.panels[2][0];
        let pixel_in = |day_idx: usize, exchange_idx: usize| {
            let cell = population.cell((2, 2), day_idx, exchange_idx);
            let x = (cell.x + cell.w * 0.2) as u32;
            let y = (cell.y + cell.h * 0.2) as u32;
            (*image.get_pixel(x, y), cell)
        };

        let scale = ColorScale::population();
        let (first_day, first_cell) = pixel_in(0, 0);
        let (second_day, second_cell) = pixel_in(1, 0);
        assert_eq!(first_day, scale.color_for(50.0));
        assert_eq!(first_day, Rgb([0xf7, 0xfc, 0xf5]));
        assert_eq!(second_day, scale.color_for(100.0));

        // day 1 is drawn below day 2
        assert!(first_cell.y > second_cell.y);

        let (quarter, _) = pixel_in(0, 1);
        assert_eq!(quarter, scale.color_for(25.0));

        let satisfaction = &layout.panels[0][0].cell((2, 2), 1, 1);
        let x = (satisfaction.x + satisfaction.w * 0.2) as u32;
        let y = (satisfaction.y + satisfaction.h * 0.2) as u32;
        assert_eq!(*image.get_pixel(x, y), ColorScale::satisfaction().color_for(1.0));
    }

    #[test]
    fn test_missing_satisfaction_aborts_before_image() {
        let temp_dir = TempDir::new().unwrap();
        let config = configuration(temp_dir.path(), "useSC_True_a_mixed");
        write_summaries(&config, "1:1", None);

        let err = process_ratio(&config, "1:1", &[50], &Config::default()).unwrap_err();
        assert!(matches!(err, HeatmapError::MissingFile { .. }));

        // directory is prepared first, but nothing is written into it
        let result_dir = config.result_dir("1:1");
        assert!(result_dir.is_dir());
        assert_eq!(std::fs::read_dir(&result_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_run_aborts_on_missing_summary() {
        let temp_dir = TempDir::new().unwrap();
        let config = configuration(temp_dir.path(), "useSC_False_a_mixed");
        write_summaries(&config, "1:1", None);

        let err = run(&settings(temp_dir.path().to_path_buf()), &Config::default()).unwrap_err();
        assert!(matches!(err, HeatmapError::MissingFile { .. }));
    }

    #[test]
    fn test_run_without_mixed_versions_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("useSC_True_a_selfish")).unwrap();
        std::fs::create_dir(temp_dir.path().join("useSC_True_a_social")).unwrap();

        let written = run(&settings(temp_dir.path().to_path_buf()), &Config::default()).unwrap();
        assert!(written.is_empty());
        assert!(
            !temp_dir
                .path()
                .join("useSC_True_a_selfish")
                .join("comparative")
                .exists()
        );
    }

    #[test]
    fn test_run_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = run(&settings(temp_dir.path().join("absent")), &Config::default()).unwrap_err();
        assert!(matches!(err, HeatmapError::BaseDirectory { .. }));
    }

    #[test]
    fn test_bad_flag_in_mixed_version_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("useSC_perhaps_a_mixed")).unwrap();

        let err = run(&settings(temp_dir.path().to_path_buf()), &Config::default()).unwrap_err();
        assert!(matches!(err, HeatmapError::InvalidBool { token } if token == "perhaps"));
    }
}
