//! Day × exchange-count grids pivoted out of the flat summary tables.

use crate::constants::{
    DAY_HEADER, EXCHANGES_HEADER, LEARNING_HEADER, SELFISH_HEADER, SOCIAL_HEADER,
    SOCIAL_POPULATION_HEADER,
};
use crate::csv_reader::SummaryTable;
use crate::error::{HeatmapError, Result};

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One figure row per metric, top to bottom in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Metric {
    #[strum(to_string = "selfish satisfaction")]
    SelfishSatisfaction,
    #[strum(to_string = "social satisfaction")]
    SocialSatisfaction,
    #[strum(to_string = "social population")]
    SocialPopulation,
}

/// Which of the two summary files a metric is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Satisfaction,
    Population,
}

impl Metric {
    /// Value column header
    pub fn column(self) -> &'static str {
        match self {
            Metric::SelfishSatisfaction => SELFISH_HEADER,
            Metric::SocialSatisfaction => SOCIAL_HEADER,
            Metric::SocialPopulation => SOCIAL_POPULATION_HEADER,
        }
    }

    pub fn summary(self) -> SummaryKind {
        match self {
            Metric::SelfishSatisfaction | Metric::SocialSatisfaction => SummaryKind::Satisfaction,
            Metric::SocialPopulation => SummaryKind::Population,
        }
    }
}

/// Values of one metric for one learning percentage.
/// Rows are days and columns exchange counts, both ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotGrid {
    pub metric: Metric,
    pub learning: i64,
    pub days: Vec<f64>,
    pub exchanges: Vec<f64>,
    /// row-major, `None` where the source has no row or an empty value
    cells: Vec<Option<f64>>,
}

impl PivotGrid {
    pub fn shape(&self) -> (usize, usize) {
        (self.days.len(), self.exchanges.len())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell by axis position
    pub fn get(&self, day_idx: usize, exchange_idx: usize) -> Option<f64> {
        if day_idx >= self.days.len() || exchange_idx >= self.exchanges.len() {
            return None;
        }
        self.cells[day_idx * self.exchanges.len() + exchange_idx]
    }

    /// Cell by axis value
    pub fn value_at(&self, day: f64, exchanges: f64) -> Option<f64> {
        let d = self.days.iter().position(|&v| v == day)?;
        let e = self.exchanges.iter().position(|&v| v == exchanges)?;
        self.get(d, e)
    }
}

/// Filters rows with `%_Learning == learning` and pivots `metric` into a grid.
///
/// # Errors
/// `MissingColumn`/`InvalidNumber` for unusable columns, `DuplicateCell` when two
/// rows share the same (Day, Exchanges) after filtering
pub fn pivot(table: &SummaryTable, learning: i64, metric: Metric) -> Result<PivotGrid> {
    let days = table.numeric_column(DAY_HEADER)?;
    let exchanges = table.numeric_column(EXCHANGES_HEADER)?;
    let learnings = table.numeric_column(LEARNING_HEADER)?;
    let values = table.numeric_column(metric.column())?;

    let target = learning as f64;
    let rows: Vec<(f64, f64, Option<f64>)> = (0..table.len())
        .filter(|&i| learnings[i] == Some(target))
        .filter_map(|i| Some((days[i]?, exchanges[i]?, values[i])))
        .collect();

    let day_axis = sorted_axis(rows.iter().map(|r| r.0));
    let exchange_axis = sorted_axis(rows.iter().map(|r| r.1));

    let width = exchange_axis.len();
    let mut cells: Vec<Option<f64>> = vec![None; day_axis.len() * width];
    let mut filled = vec![false; cells.len()];

    for (day, ex, value) in rows {
        let d = axis_index(&day_axis, day);
        let e = axis_index(&exchange_axis, ex);
        let idx = d * width + e;
        if filled[idx] {
            return Err(HeatmapError::DuplicateCell {
                day,
                exchanges: ex,
                learning,
            });
        }
        filled[idx] = true;
        cells[idx] = value;
    }

    Ok(PivotGrid {
        metric,
        learning,
        days: day_axis,
        exchanges: exchange_axis,
        cells,
    })
}

fn sorted_axis(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values.sorted_by(f64::total_cmp).dedup().collect()
}

fn axis_index(axis: &[f64], value: f64) -> usize {
    // axis is built from the same values, so the search always hits
    axis.binary_search_by(|probe| probe.total_cmp(&value))
        .unwrap_or_else(|i| i)
}

/// Grids of one metric, one per learning percentage in argument order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub metric: Metric,
    pub grids: Vec<PivotGrid>,
}

/// Pivots every metric for every learning percentage.
pub fn build_metric_rows(
    satisfaction: &SummaryTable,
    population: &SummaryTable,
    learning_percentages: &[i64],
) -> Result<Vec<MetricRow>> {
    Metric::iter()
        .map(|metric| {
            let table = match metric.summary() {
                SummaryKind::Satisfaction => satisfaction,
                SummaryKind::Population => population,
            };
            let grids = learning_percentages
                .iter()
                .map(|&learning| pivot(table, learning, metric))
                .collect::<Result<Vec<_>>>()?;
            Ok(MetricRow { metric, grids })
        })
        .collect()
}
