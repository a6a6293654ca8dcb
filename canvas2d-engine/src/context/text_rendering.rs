//! Text rendering operations for Canvas2dContext.
//!
//! Glyphs become a path: the shaper lays the text out in text space,
//! [`anchor_transform`] places it at the anchor point, and the current
//! transform maps it to the device. The result goes through the ordinary
//! fill and stroke paths, shadows and filters included.

use super::Canvas2dContext;
use crate::painter::Painter;
use crate::path::{Path, WindingRule};
use crate::text::{anchor_transform, prepare_text, TextMetrics};

impl<P: Painter> Canvas2dContext<P> {
    /// Measure text with the current font.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        let font = self.state.font_or_default();
        let prepared = prepare_text(&mut *self.shaper, text, &font, None);
        let metrics = self.shaper.font_metrics(&font);
        TextMetrics::from_prepared(&prepared, &metrics)
    }

    /// Fill text at the specified position.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText {:?} {} {}", text, x, y);
        self.render_text(text, x, y, None, true);
    }

    /// Fill text at the specified position with a maximum width.
    ///
    /// Text wider than `max_width` is condensed horizontally to fit. A
    /// `max_width` that is zero, negative or NaN draws nothing.
    pub fn fill_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        log::debug!(target: "canvas", "fillText {:?} {} {} max {}", text, x, y, max_width);
        self.render_text(text, x, y, Some(max_width), true);
    }

    /// Stroke text at the specified position.
    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "strokeText {:?} {} {}", text, x, y);
        self.render_text(text, x, y, None, false);
    }

    /// Stroke text at the specified position with a maximum width.
    pub fn stroke_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        log::debug!(target: "canvas", "strokeText {:?} {} {} max {}", text, x, y, max_width);
        self.render_text(text, x, y, Some(max_width), false);
    }

    fn render_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>, fill: bool) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let Some(path) = self.text_path(text, x, y, max_width) else {
            return;
        };
        if fill {
            self.fill_internal(&path, WindingRule::NonZero);
        } else {
            self.stroke_internal(&path);
        }
    }

    /// Device-space glyph outlines of `text` anchored at (x, y).
    fn text_path(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>) -> Option<Path> {
        let font = self.state.font_or_default();
        let prepared = prepare_text(&mut *self.shaper, text, &font, max_width);
        if prepared.path.is_empty() {
            return None;
        }
        let anchor = anchor_transform(
            x,
            y,
            &prepared,
            self.state.text_align,
            self.state.text_baseline,
        );
        let to_device = self.state.transform.pre_concat(anchor);
        Some(prepared.path.transformed(&to_device))
    }
}
