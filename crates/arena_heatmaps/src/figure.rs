//! Multi-panel heat map figure: one row per metric, one column per learning percentage.

pub mod layout;
pub mod renderer;

pub use layout::{FigureLayout, PanelLayout, Rect};
pub use renderer::{Colors, Renderer, load_system_font};

use crate::{
    config::Config,
    constants::{COLORBAR_TICKS, SUPTITLE_Y, XLABEL_POS, YLABEL_POS},
    error::{HeatmapError, Result},
    palette::{ColorScale, annotation_color},
    pivot::{MetricRow, PivotGrid},
};
use log::{debug, warn};
use std::path::Path;

/// Gap between a panel and its title or tick labels, in points
const LABEL_PAD_PT: f64 = 3.0;

pub fn suptitle(social_capital: bool) -> &'static str {
    if social_capital {
        "With Social Capital Populations"
    } else {
        "Without Social Capital Populations"
    }
}

pub fn panel_title(learning: i64) -> String {
    format!("Learning {}%", learning)
}

/// Rounded value without trailing zeros: 0.50 -> "0.5", 67.00 -> "67"
pub fn format_value(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Draws every metric row and writes the image to `output`
pub fn render_figure(
    rows: &[MetricRow],
    social_capital: bool,
    config: &Config,
    output: &Path,
) -> Result<()> {
    let ncols = rows.iter().map(|r| r.grids.len()).max().unwrap_or(0);
    if rows.is_empty() || ncols == 0 {
        return Err(HeatmapError::Config(
            "figure needs at least one metric row and one learning percentage".to_string(),
        ));
    }

    let (width, height) = config.canvas_size();
    let mut renderer = Renderer::new(width, height)?;
    draw_figure(&mut renderer, rows, social_capital, config);
    renderer.save(output)?;
    Ok(())
}

/// Draws onto an existing canvas
pub fn draw_figure(renderer: &mut Renderer, rows: &[MetricRow], social_capital: bool, config: &Config) {
    let ncols = rows.iter().map(|r| r.grids.len()).max().unwrap_or(0);
    let layout = FigureLayout::new(
        renderer.width as f64,
        renderer.height as f64,
        rows.len(),
        ncols,
        &config.spacing,
    );

    for (ri, row) in rows.iter().enumerate() {
        let scale = ColorScale::for_metric(row.metric);
        for (ci, grid) in row.grids.iter().enumerate() {
            if grid.is_empty() {
                warn!(
                    "No {} rows for learning {}%, panel left blank",
                    row.metric, grid.learning
                );
            } else {
                debug!(
                    "{} learning {}%: {} days x {} exchanges",
                    row.metric,
                    grid.learning,
                    grid.days.len(),
                    grid.exchanges.len()
                );
            }
            let panel = &layout.panels[ri][ci];
            let show_x = shows_exchange_ticks(rows, ri, ci);
            let show_y = shows_day_ticks(row, ci);
            draw_panel(renderer, panel, grid, &scale, config, show_x, show_y);
        }
    }

    draw_figure_labels(renderer, &layout, social_capital, config);
}

fn draw_panel(
    renderer: &mut Renderer,
    panel: &PanelLayout,
    grid: &PivotGrid,
    scale: &ColorScale,
    config: &Config,
    show_x_ticks: bool,
    show_y_ticks: bool,
) {
    let annot_px = config.px(config.fonts.annotation);
    let tick_px = config.px(config.fonts.tick);
    let pad = config.px(LABEL_PAD_PT);
    let shape = grid.shape();

    for d in 0..shape.0 {
        for e in 0..shape.1 {
            let Some(value) = grid.get(d, e) else {
                continue;
            };
            let cell = panel.cell(shape, d, e);
            let fill = scale.color_for(value);
            renderer.draw_rect(cell.x, cell.y, cell.w, cell.h, fill);
            renderer.draw_rect_outline(cell.x, cell.y, cell.w, cell.h, Colors::WHITE);
            let (cx, cy) = cell.center();
            renderer.draw_text_centered(cx, cy, &format_value(value), annot_px, annotation_color(fill));
        }
    }

    let title_px = config.px(config.fonts.panel_title);
    let title = panel_title(grid.learning);
    let (_, title_h) = renderer.text_size(&title, title_px);
    let (hx, _) = panel.heatmap.center();
    renderer.draw_text_centered(
        hx,
        panel.heatmap.y - pad - title_h / 2.0,
        &title,
        title_px,
        Colors::TEXT,
    );

    if show_x_ticks && shape.1 > 0 {
        let labels: Vec<String> = grid.exchanges.iter().map(|&v| format_value(v)).collect();
        let widest = labels
            .iter()
            .map(|l| renderer.text_size(l, tick_px).0)
            .fold(0.0, f64::max);
        let cell_w = panel.heatmap.w / shape.1 as f64;
        let step = thinning_step(widest + pad, cell_w);
        for (e, label) in labels.iter().enumerate().step_by(step) {
            let (cx, _) = panel.cell(shape, 0, e).center();
            let (_, h) = renderer.text_size(label, tick_px);
            renderer.draw_text_centered(cx, panel.heatmap.bottom() + pad + h / 2.0, label, tick_px, Colors::TEXT);
        }
    }

    if show_y_ticks && shape.0 > 0 {
        let cell_h = panel.heatmap.h / shape.0 as f64;
        let (_, line_h) = renderer.text_size("0", tick_px);
        let step = thinning_step(line_h, cell_h);
        for (d, &day) in grid.days.iter().enumerate().step_by(step) {
            let (_, cy) = panel.cell(shape, d, 0).center();
            renderer.draw_text_right(panel.heatmap.x - pad, cy, &format_value(day), tick_px, Colors::TEXT);
        }
    }

    draw_colorbar(renderer, &panel.colorbar, scale, tick_px, pad);
}

/// Exchange labels go under the bottom row, and under any panel whose
/// exchange axis differs from the bottom panel of its column.
fn shows_exchange_ticks(rows: &[MetricRow], ri: usize, ci: usize) -> bool {
    let Some(bottom) = rows.last().and_then(|row| row.grids.get(ci)) else {
        return true;
    };
    ri + 1 == rows.len() || rows[ri].grids[ci].exchanges != bottom.exchanges
}

/// Day labels go on the first column, and on any panel whose day axis
/// differs from the first panel of its row.
fn shows_day_ticks(row: &MetricRow, ci: usize) -> bool {
    ci == 0 || row.grids[ci].days != row.grids[0].days
}

/// Every `step`-th label so that labels of `extent` fit in slots of `slot`
fn thinning_step(extent: f64, slot: f64) -> usize {
    if slot <= 0.0 {
        return 1;
    }
    ((extent / slot).ceil() as usize).max(1)
}

fn draw_colorbar(renderer: &mut Renderer, bar: &Rect, scale: &ColorScale, tick_px: f64, pad: f64) {
    let rows = bar.h.round().max(1.0) as usize;
    let n = scale.palette.len();
    if n == 0 {
        return;
    }
    for i in 0..rows {
        // i = 0 is the bottom of the bar
        let t = (i as f64 + 0.5) / rows as f64;
        let idx = ((t * n as f64).floor() as usize).min(n - 1);
        let y = bar.bottom() - (i + 1) as f64;
        renderer.draw_rect(bar.x, y, bar.w, 1.0, scale.palette[idx]);
    }
    renderer.draw_rect_outline(bar.x, bar.y, bar.w, bar.h, Colors::FRAME);

    let tick_len = (bar.w / 4.0).max(2.0);
    for value in scale.ticks(COLORBAR_TICKS) {
        let y = bar.bottom() - scale.normalize(value) * bar.h;
        renderer.draw_rect(bar.right(), y, tick_len, 1.0, Colors::FRAME);
        let (_, h) = renderer.text_size(&format_value(value), tick_px);
        renderer.draw_text(bar.right() + tick_len + pad, y - h / 2.0, &format_value(value), tick_px, Colors::TEXT);
    }
}

fn draw_figure_labels(renderer: &mut Renderer, layout: &FigureLayout, social_capital: bool, config: &Config) {
    let title_px = config.px(config.fonts.suptitle);
    let label_px = config.px(config.fonts.axis_label);

    // suptitle hangs from y = 0.98
    let (sx, sy) = layout.figure_point(0.5, SUPTITLE_Y);
    let title = suptitle(social_capital);
    let (_, th) = renderer.text_size(title, title_px);
    renderer.draw_text_centered(sx, sy + th / 2.0, title, title_px, Colors::TEXT);

    // x label sits on y = 0.02
    let (xx, xy) = layout.figure_point(XLABEL_POS.0, XLABEL_POS.1);
    let (_, xh) = renderer.text_size("Exchanges", label_px);
    renderer.draw_text_centered(xx, xy - xh / 2.0, "Exchanges", label_px, Colors::TEXT);

    let (yx, yy) = layout.figure_point(YLABEL_POS.0, YLABEL_POS.1);
    renderer.draw_text_vertical(yx, yy, "Day", label_px, Colors::TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_summary_from_reader;
    use crate::pivot::{Metric, pivot};

    #[test]
    fn test_suptitle_reflects_flag() {
        assert_eq!(suptitle(true), "With Social Capital Populations");
        assert_eq!(suptitle(false), "Without Social Capital Populations");
    }

    #[test]
    fn test_panel_title() {
        assert_eq!(panel_title(50), "Learning 50%");
        assert_eq!(panel_title(0), "Learning 0%");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.33), "0.33");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(67.0), "67");
        assert_eq!(format_value(66.67), "66.67");
        assert_eq!(format_value(100.0), "100");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-0.001), "0");
        assert_eq!(format_value(20.0), "20");
    }

    #[test]
    fn test_thinning_step() {
        assert_eq!(thinning_step(10.0, 30.0), 1);
        assert_eq!(thinning_step(30.0, 30.0), 1);
        assert_eq!(thinning_step(31.0, 30.0), 2);
        assert_eq!(thinning_step(95.0, 30.0), 4);
        assert_eq!(thinning_step(5.0, 0.0), 1);
    }

    fn grids(csv: &str, learnings: &[i64], metric: Metric) -> Vec<PivotGrid> {
        let table = read_summary_from_reader(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        learnings
            .iter()
            .map(|&l| pivot(&table, l, metric))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    // learning 0 has no population rows and a shorter day axis for satisfaction
    const SATISFACTION: &str = "\
Day,Exchanges,%_Learning,Selfish,Social
1,2,0,0.5,0.5
1,2,50,0.5,0.5
2,2,50,0.5,0.5
";

    const POPULATION: &str = "\
Day,Exchanges,%_Learning,%_Social
1,2,50,50
2,2,50,60
";

    fn uneven_rows() -> Vec<MetricRow> {
        vec![
            MetricRow {
                metric: Metric::SelfishSatisfaction,
                grids: grids(SATISFACTION, &[0, 50], Metric::SelfishSatisfaction),
            },
            MetricRow {
                metric: Metric::SocialPopulation,
                grids: grids(POPULATION, &[0, 50], Metric::SocialPopulation),
            },
        ]
    }

    #[test]
    fn test_tick_labels_follow_shared_axes() {
        let rows = uneven_rows();

        // bottom row always labelled
        assert!(shows_exchange_ticks(&rows, 1, 0));
        assert!(shows_exchange_ticks(&rows, 1, 1));
        // bottom-left grid is empty, so the panel above keeps its own labels
        assert!(shows_exchange_ticks(&rows, 0, 0));
        // same exchange axis as the bottom panel
        assert!(!shows_exchange_ticks(&rows, 0, 1));

        assert!(shows_day_ticks(&rows[0], 0));
        // learning 50 has days 1 and 2, learning 0 only day 1
        assert!(shows_day_ticks(&rows[0], 1));
        assert!(shows_day_ticks(&rows[1], 1));
    }

    #[test]
    fn test_tick_labels_shared_when_axes_match() {
        let rows = vec![MetricRow {
            metric: Metric::SocialPopulation,
            grids: grids(POPULATION, &[50, 50], Metric::SocialPopulation),
        }];
        assert!(shows_day_ticks(&rows[0], 0));
        assert!(!shows_day_ticks(&rows[0], 1));
    }

    #[test]
    fn test_render_figure_rejects_empty_layout() {
        let err = render_figure(&[], true, &Config::default(), Path::new("unused.png")).unwrap_err();
        assert!(matches!(err, HeatmapError::Config(_)));
    }
}
