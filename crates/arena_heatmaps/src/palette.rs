//! Colour ramps and value → colour scales for the heat map rows.

use crate::constants::{LUMINANCE_THRESHOLD, PALETTE_STEPS, POPULATION_RANGE, SATISFACTION_RANGE};
use crate::pivot::Metric;
use image::Rgb;

/// Piecewise linear ramp through evenly spaced anchor colours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    anchors: Vec<Rgb<u8>>,
}

const fn hex(rgb: u32) -> Rgb<u8> {
    Rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

// ColorBrewer 9-class sequential schemes
const REDS_ANCHORS: [Rgb<u8>; 9] = [
    hex(0xfff5f0),
    hex(0xfee0d2),
    hex(0xfcbba1),
    hex(0xfc9272),
    hex(0xfb6a4a),
    hex(0xef3b2c),
    hex(0xcb181d),
    hex(0xa50f15),
    hex(0x67000d),
];
const PURPLES_ANCHORS: [Rgb<u8>; 9] = [
    hex(0xfcfbfd),
    hex(0xefedf5),
    hex(0xdadaeb),
    hex(0xbcbddc),
    hex(0x9e9ac8),
    hex(0x807dba),
    hex(0x6a51a3),
    hex(0x54278f),
    hex(0x3f007d),
];
const GREENS_ANCHORS: [Rgb<u8>; 9] = [
    hex(0xf7fcf5),
    hex(0xe5f5e0),
    hex(0xc7e9c0),
    hex(0xa1d99b),
    hex(0x74c476),
    hex(0x41ab5d),
    hex(0x238b45),
    hex(0x006d2c),
    hex(0x00441b),
];

impl ColorRamp {
    pub fn new(anchors: Vec<Rgb<u8>>) -> Self {
        Self { anchors }
    }

    pub fn reds() -> Self {
        Self::new(REDS_ANCHORS.to_vec())
    }

    pub fn purples() -> Self {
        Self::new(PURPLES_ANCHORS.to_vec())
    }

    pub fn greens() -> Self {
        Self::new(GREENS_ANCHORS.to_vec())
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.anchors.iter().rev().copied().collect())
    }

    /// Colour at `t` in [0, 1], clamped
    pub fn at(&self, t: f64) -> Rgb<u8> {
        match self.anchors.len() {
            0 => Rgb([255, 255, 255]),
            1 => self.anchors[0],
            n => {
                let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
                let lo = (pos.floor() as usize).min(n - 2);
                let frac = pos - lo as f64;
                lerp(self.anchors[lo], self.anchors[lo + 1], frac)
            }
        }
    }

    /// `steps` evenly spaced colours from start to end
    pub fn sample(&self, steps: usize) -> Vec<Rgb<u8>> {
        match steps {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..steps)
                .map(|i| self.at(i as f64 / (steps - 1) as f64))
                .collect(),
        }
    }
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, t: f64) -> Rgb<u8> {
    let ch = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8;
    Rgb([ch(0), ch(1), ch(2)])
}

/// Lower half sampled from `low`, upper half from `high`, stacked into one palette.
pub fn build_diverging_palette(low: &ColorRamp, high: &ColorRamp, steps: usize) -> Vec<Rgb<u8>> {
    let lower = steps / 2;
    let mut palette = low.sample(lower);
    palette.extend(high.sample(steps - lower));
    palette
}

/// Fixed-range scale centred on `center`
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
    pub center: f64,
    pub palette: Vec<Rgb<u8>>,
}

impl ColorScale {
    pub fn new(range: (f64, f64, f64), palette: Vec<Rgb<u8>>) -> Self {
        let (vmin, vmax, center) = range;
        Self {
            vmin,
            vmax,
            center,
            palette,
        }
    }

    /// Sequential red scale on [0, 1]
    pub fn satisfaction() -> Self {
        Self::new(SATISFACTION_RANGE, ColorRamp::reds().sample(PALETTE_STEPS))
    }

    /// Purple below 50, green above, on [0, 100]
    pub fn population() -> Self {
        let palette = build_diverging_palette(
            &ColorRamp::purples().reversed(),
            &ColorRamp::greens(),
            PALETTE_STEPS,
        );
        Self::new(POPULATION_RANGE, palette)
    }

    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::SelfishSatisfaction | Metric::SocialSatisfaction => Self::satisfaction(),
            Metric::SocialPopulation => Self::population(),
        }
    }

    /// Position in [0, 1] after symmetric normalisation around the centre
    pub fn normalize(&self, value: f64) -> f64 {
        let half = (self.vmax - self.center).max(self.center - self.vmin);
        if half <= 0.0 {
            return 0.5;
        }
        let lo = self.center - half;
        ((value - lo) / (2.0 * half)).clamp(0.0, 1.0)
    }

    pub fn index_for(&self, value: f64) -> usize {
        let n = self.palette.len();
        let idx = (self.normalize(value) * n as f64).floor() as usize;
        idx.min(n.saturating_sub(1))
    }

    pub fn color_for(&self, value: f64) -> Rgb<u8> {
        self.palette
            .get(self.index_for(value))
            .copied()
            .unwrap_or(Rgb([255, 255, 255]))
    }

    /// Evenly spaced tick values from vmin to vmax
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.vmin];
        }
        let step = (self.vmax - self.vmin) / (count - 1) as f64;
        (0..count).map(|i| self.vmin + step * i as f64).collect()
    }
}

/// WCAG relative luminance in [0, 1]
pub fn relative_luminance(color: Rgb<u8>) -> f64 {
    let lin = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * lin(color[0]) + 0.7152 * lin(color[1]) + 0.0722 * lin(color[2])
}

/// Annotation colour readable on `background`
pub fn annotation_color(background: Rgb<u8>) -> Rgb<u8> {
    if relative_luminance(background) > LUMINANCE_THRESHOLD {
        Rgb([38, 38, 38])
    } else {
        Rgb([255, 255, 255])
    }
}
