use crate::error::{HeatmapError, Result};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{ImageBuffer, Rgb, RgbImage, imageops};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};
use std::path::Path;

/// Drawing context for one figure
pub struct Renderer {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
    pub font: FontVec,
}

impl Renderer {
    /// White canvas with the first usable system font
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let font = load_system_font()?;
        Ok(Self::with_font(width, height, font))
    }

    pub fn with_font(width: u32, height: u32, font: FontVec) -> Self {
        let image = ImageBuffer::from_pixel(width, height, Colors::WHITE);
        Self {
            image,
            width,
            height,
            font,
        }
    }

    /// Filled rectangle. Degenerate sizes are widened to one pixel.
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        draw_filled_rect_mut(&mut self.image, pixel_rect(x, y, width, height), color);
    }

    pub fn draw_rect_outline(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        draw_hollow_rect_mut(&mut self.image, pixel_rect(x, y, width, height), color);
    }

    /// Text with its top left corner at (x, y)
    pub fn draw_text(&mut self, x: f64, y: f64, text: &str, font_px: f64, color: Rgb<u8>) {
        let scale = PxScale::from(font_px as f32);
        draw_text_mut(
            &mut self.image,
            color,
            x.round() as i32,
            y.round() as i32,
            scale,
            &self.font,
            text,
        );
    }

    /// Advance width of `text` and the full line height (ascent to descent)
    pub fn text_size(&self, text: &str, font_px: f64) -> (f64, f64) {
        let (w, _) = text_size(PxScale::from(font_px as f32), &self.font, text);
        (w as f64, self.line_height(font_px))
    }

    pub fn line_height(&self, font_px: f64) -> f64 {
        let scaled = self.font.as_scaled(PxScale::from(font_px as f32));
        (scaled.height() as f64).ceil()
    }

    pub fn draw_text_centered(&mut self, cx: f64, cy: f64, text: &str, font_px: f64, color: Rgb<u8>) {
        let (w, h) = self.text_size(text, font_px);
        self.draw_text(cx - w / 2.0, cy - h / 2.0, text, font_px, color);
    }

    /// Text right-aligned to `right`, vertically centred on `cy`
    pub fn draw_text_right(&mut self, right: f64, cy: f64, text: &str, font_px: f64, color: Rgb<u8>) {
        let (w, h) = self.text_size(text, font_px);
        self.draw_text(right - w, cy - h / 2.0, text, font_px, color);
    }

    /// Text rotated a quarter turn counter-clockwise, left edge at `x`, centred on `cy`
    pub fn draw_text_vertical(&mut self, x: f64, cy: f64, text: &str, font_px: f64, color: Rgb<u8>) {
        let (w, h) = self.text_size(text, font_px);
        if w < 1.0 || h < 1.0 {
            return;
        }
        let mut label: RgbImage =
            ImageBuffer::from_pixel(w.ceil() as u32, h.ceil() as u32, Colors::WHITE);
        draw_text_mut(
            &mut label,
            color,
            0,
            0,
            PxScale::from(font_px as f32),
            &self.font,
            text,
        );
        let rotated = imageops::rotate270(&label);
        let top = cy - w / 2.0;
        imageops::overlay(&mut self.image, &rotated, x.round() as i64, top.round() as i64);
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

fn pixel_rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    let w = (width.round() as u32).max(1);
    let h = (height.round() as u32).max(1);
    Rect::at(x.round() as i32, y.round() as i32).of_size(w, h)
}

/// Loads the first available font from a list of common sans families
pub fn load_system_font() -> Result<FontVec> {
    let source = SystemSource::new();

    let font_families = vec![
        FamilyName::Title("DejaVu Sans".to_string()),
        FamilyName::Title("Arial".to_string()),
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::Title("Liberation Sans".to_string()),
        FamilyName::SansSerif,
    ];

    for family in font_families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            return Ok(font);
        }
    }

    Err(HeatmapError::Font(
        "no usable system font found (tried DejaVu Sans, Arial, Helvetica, Liberation Sans, sans-serif)"
            .to_string(),
    ))
}

/// Fixed colours
pub struct Colors;

impl Colors {
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const TEXT: Rgb<u8> = Rgb([0, 0, 0]);
    pub const FRAME: Rgb<u8> = Rgb([64, 64, 64]);
}
