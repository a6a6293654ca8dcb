//! Text preparation, anchor placement and metrics.
//!
//! Text is laid out in "text space": the origin sits on the alphabetic
//! baseline at the left edge of the first glyph, y grows downwards. A
//! [`TextShaper`] turns a string into glyph runs in that space;
//! [`prepare_text`] concatenates them, applies the maxWidth condensation and
//! records the bounding box every other text operation is derived from.

use crate::font_parser::ParsedFont;
use crate::geometry::{FloatPoint, FloatRect};
use crate::path::Path;
use crate::style::{TextAlign, TextBaseline};
use tiny_skia::Transform;

/// A run of glyphs sharing one font.
#[derive(Debug, Clone, Default)]
pub struct GlyphRun {
    /// Glyph outlines in text space.
    pub path: Path,
    /// Advance width of the run in pixels.
    pub advance: f32,
    /// Pixel size of the font used for the run.
    pub size_px: f32,
}

/// Vertical metrics of a font at a given size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub size_px: f32,
    /// Distance from the top of the em box to the alphabetic baseline.
    pub ascent: f32,
    /// Distance from the alphabetic baseline to the bottom of the em box.
    pub descent: f32,
}

/// Shapes text into positioned glyph runs.
pub trait TextShaper {
    /// Shape `text` with the font cascade in `font`. Runs follow each other
    /// horizontally starting at `origin`.
    fn shape(&mut self, origin: FloatPoint, text: &str, font: &ParsedFont) -> Vec<GlyphRun>;

    fn font_metrics(&mut self, font: &ParsedFont) -> FontMetrics;
}

/// Shaped text ready for placement.
#[derive(Debug, Clone, Default)]
pub struct PreparedText {
    /// Glyph geometry in text space, already condensed to maxWidth.
    pub path: Path,
    /// `{0, 0, width, height}`; height is the largest run pixel size.
    pub bounding_box: FloatRect,
    pub font_size: f32,
}

impl PreparedText {
    pub fn width(&self) -> f32 {
        self.bounding_box.width
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.bounding_box.width == 0.0
    }
}

/// Replace the ASCII whitespace class (tab, LF, FF, CR) with plain spaces.
fn normalize_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\x0C' | '\r' => ' ',
            c => c,
        })
        .collect()
}

/// Shape and measure `text`.
///
/// A `max_width` that is zero, negative or NaN rejects the text and yields
/// an empty result. When the shaped width exceeds `max_width`, the geometry
/// is scaled horizontally to fit.
pub fn prepare_text(
    shaper: &mut dyn TextShaper,
    text: &str,
    font: &ParsedFont,
    max_width: Option<f32>,
) -> PreparedText {
    if let Some(max_width) = max_width {
        if !(max_width > 0.0) {
            log::debug!(target: "canvas", "text rejected, maxWidth {}", max_width);
            return PreparedText::default();
        }
    }

    let normalized = normalize_whitespace(text);
    let runs = shaper.shape(FloatPoint::new(0.0, 0.0), &normalized, font);

    let mut path = Path::new();
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for run in &runs {
        path.append(&run.path);
        width += run.advance;
        height = height.max(run.size_px);
    }

    if let Some(max_width) = max_width {
        if width > max_width {
            let condense = max_width / width;
            path = path.transformed(&Transform::from_scale(condense, 1.0));
            width = max_width;
        }
    }

    PreparedText {
        path,
        bounding_box: FloatRect::new(0.0, 0.0, width, height),
        font_size: font.size_px,
    }
}

/// Map text space onto user space for text anchored at `(x, y)`.
///
/// The alignment shift uses the (possibly condensed) prepared width.
pub fn anchor_transform(
    x: f32,
    y: f32,
    prepared: &PreparedText,
    align: TextAlign,
    baseline: TextBaseline,
) -> Transform {
    let width = prepared.width();
    let shift_x = match align {
        TextAlign::Center => -width / 2.0,
        TextAlign::End | TextAlign::Right => -width,
        TextAlign::Start | TextAlign::Left => 0.0,
    };
    let shift_y = match baseline {
        TextBaseline::Middle => prepared.font_size / 2.0,
        TextBaseline::Top | TextBaseline::Hanging => prepared.font_size,
        TextBaseline::Alphabetic | TextBaseline::Ideographic | TextBaseline::Bottom => 0.0,
    };
    Transform::from_translate(x, y)
        .pre_translate(0.0, shift_y)
        .pre_translate(shift_x, 0.0)
}

/// Text metrics returned by measureText().
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width of the text in pixels.
    pub width: f32,
    pub actual_bounding_box_left: f32,
    pub actual_bounding_box_right: f32,
    pub actual_bounding_box_ascent: f32,
    pub actual_bounding_box_descent: f32,
    pub font_bounding_box_ascent: f32,
    pub font_bounding_box_descent: f32,
    pub em_height_ascent: f32,
    pub em_height_descent: f32,
    pub hanging_baseline: f32,
    pub alphabetic_baseline: f32,
    pub ideographic_baseline: f32,
}

impl TextMetrics {
    /// Derive every metric from the prepared bounding box and the font
    /// baseline. Empty text falls back to the font size as its height.
    pub fn from_prepared(prepared: &PreparedText, font: &FontMetrics) -> Self {
        let bbox = prepared.bounding_box;
        let height = if bbox.height > 0.0 {
            bbox.height
        } else {
            font.size_px
        };
        let baseline = font.ascent;
        let below = height - baseline;

        Self {
            width: bbox.width,
            actual_bounding_box_left: -bbox.x,
            actual_bounding_box_right: bbox.right(),
            actual_bounding_box_ascent: baseline,
            actual_bounding_box_descent: below,
            font_bounding_box_ascent: baseline,
            font_bounding_box_descent: below,
            em_height_ascent: baseline,
            em_height_descent: below,
            hanging_baseline: baseline,
            alphabetic_baseline: 0.0,
            ideographic_baseline: -below,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_shaper {
    use super::*;

    /// Every character is a box `size/2` wide and `0.8 * size` tall above
    /// the baseline; spaces advance without geometry.
    #[derive(Debug, Default)]
    pub(crate) struct FixedAdvanceShaper {
        pub(crate) shaped: Vec<String>,
    }

    impl TextShaper for FixedAdvanceShaper {
        fn shape(&mut self, origin: FloatPoint, text: &str, font: &ParsedFont) -> Vec<GlyphRun> {
            self.shaped.push(text.to_string());
            if text.is_empty() {
                return Vec::new();
            }
            let advance = font.size_px / 2.0;
            let top = origin.y - font.size_px * 0.8;
            let mut path = Path::new();
            let mut x = origin.x;
            for c in text.chars() {
                if c != ' ' {
                    path.move_to(FloatPoint::new(x, top));
                    path.line_to(FloatPoint::new(x + advance, top));
                    path.line_to(FloatPoint::new(x + advance, origin.y));
                    path.line_to(FloatPoint::new(x, origin.y));
                    path.close();
                }
                x += advance;
            }
            vec![GlyphRun {
                path,
                advance: x - origin.x,
                size_px: font.size_px,
            }]
        }

        fn font_metrics(&mut self, font: &ParsedFont) -> FontMetrics {
            FontMetrics {
                size_px: font.size_px,
                ascent: font.size_px * 0.8,
                descent: font.size_px * 0.2,
            }
        }
    }
}
