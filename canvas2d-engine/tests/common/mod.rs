//! Shared helpers for the integration tests.

use canvas2d_engine::{
    Canvas2dContext, Canvas2dContextBuilder, FloatPoint, FontMetrics, GlyphRun, ParsedFont, Path,
    RecordingPainter, TextShaper,
};

/// Lays every character out as a `size/2` x `0.8 * size` box sitting on the
/// baseline, so text tests need no fonts.
#[derive(Debug, Default)]
pub struct BoxShaper;

impl TextShaper for BoxShaper {
    fn shape(&mut self, origin: FloatPoint, text: &str, font: &ParsedFont) -> Vec<GlyphRun> {
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

pub fn raster(width: u32, height: u32) -> Canvas2dContext {
    Canvas2dContextBuilder::new(width, height)
        .with_shaper(BoxShaper)
        .build()
        .unwrap()
}

pub fn recording(width: u32, height: u32) -> Canvas2dContext<RecordingPainter> {
    Canvas2dContextBuilder::new(width, height)
        .with_shaper(BoxShaper)
        .with_painter(RecordingPainter::new())
        .build()
        .unwrap()
}

/// RGBA of one pixel, read back through getImageData.
pub fn pixel<P: canvas2d_engine::Painter>(ctx: &Canvas2dContext<P>, x: i32, y: i32) -> [u8; 4] {
    let data = ctx.get_image_data(x, y, 1, 1).unwrap();
    let d = data.data();
    [d[0], d[1], d[2], d[3]]
}
