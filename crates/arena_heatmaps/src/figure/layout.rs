use crate::config::SpacingConfig;
use crate::constants::{COLORBAR_ASPECT, COLORBAR_FRACTION, COLORBAR_OFFSET, HEATMAP_FRACTION};

/// Pixel rectangle, origin at the top left of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// One subplot: the heat map area plus the colour bar stolen from its right side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub heatmap: Rect,
    pub colorbar: Rect,
}

impl PanelLayout {
    fn from_panel(panel: Rect) -> Self {
        let heatmap = Rect::new(panel.x, panel.y, panel.w * HEATMAP_FRACTION, panel.h);
        let bar_w = (panel.w * COLORBAR_FRACTION).min(panel.h / COLORBAR_ASPECT);
        let colorbar = Rect::new(panel.x + panel.w * COLORBAR_OFFSET, panel.y, bar_w, panel.h);
        Self {
            panel,
            heatmap,
            colorbar,
        }
    }

    /// Cell rectangle with the first day at the bottom (inverted y axis)
    pub fn cell(&self, shape: (usize, usize), day_idx: usize, exchange_idx: usize) -> Rect {
        let (rows, cols) = shape;
        let cw = self.heatmap.w / cols.max(1) as f64;
        let ch = self.heatmap.h / rows.max(1) as f64;
        Rect::new(
            self.heatmap.x + exchange_idx as f64 * cw,
            self.heatmap.bottom() - (day_idx + 1) as f64 * ch,
            cw,
            ch,
        )
    }
}

/// Grid of subplots following gridspec spacing rules
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub width: f64,
    pub height: f64,
    /// `[row][column]`, row 0 at the top
    pub panels: Vec<Vec<PanelLayout>>,
}

impl FigureLayout {
    pub fn new(width: f64, height: f64, nrows: usize, ncols: usize, sp: &SpacingConfig) -> Self {
        let tot_w = (sp.right - sp.left) * width;
        let tot_h = (sp.top - sp.bottom) * height;
        let cell_w = tot_w / (ncols as f64 + sp.wspace * ncols.saturating_sub(1) as f64);
        let cell_h = tot_h / (nrows as f64 + sp.hspace * nrows.saturating_sub(1) as f64);
        let sep_w = sp.wspace * cell_w;
        let sep_h = sp.hspace * cell_h;

        let panels = (0..nrows)
            .map(|r| {
                (0..ncols)
                    .map(|c| {
                        let x = sp.left * width + c as f64 * (cell_w + sep_w);
                        let y = (1.0 - sp.top) * height + r as f64 * (cell_h + sep_h);
                        PanelLayout::from_panel(Rect::new(x, y, cell_w, cell_h))
                    })
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            panels,
        }
    }

    /// Figure fraction (origin bottom left) to pixels
    pub fn figure_point(&self, fx: f64, fy: f64) -> (f64, f64) {
        (fx * self.width, (1.0 - fy) * self.height)
    }
}
