//! Immutable premultiplied bitmaps and alpha conversion helpers.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::IntRect;
use std::sync::Arc;
use tiny_skia::{Pixmap, PixmapRef, PremultipliedColorU8};

/// Premultiply one channel with rounding.
#[inline]
pub(crate) fn premultiply_channel(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

/// Undo premultiplication of one channel with rounding, saturating at 255.
#[inline]
pub(crate) fn unpremultiply_channel(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
}

/// Convert one straight-alpha RGBA pixel to premultiplied storage.
pub(crate) fn premultiply_pixel(r: u8, g: u8, b: u8, a: u8) -> PremultipliedColorU8 {
    let (r, g, b) = match a {
        255 => (r, g, b),
        0 => (0, 0, 0),
        _ => (
            premultiply_channel(r, a),
            premultiply_channel(g, a),
            premultiply_channel(b, a),
        ),
    };
    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

/// Convert one premultiplied pixel to straight-alpha RGBA bytes.
pub(crate) fn unpremultiply_pixel(p: PremultipliedColorU8) -> [u8; 4] {
    let a = p.alpha();
    match a {
        255 => [p.red(), p.green(), p.blue(), 255],
        0 => [0, 0, 0, 0],
        _ => [
            unpremultiply_channel(p.red(), a),
            unpremultiply_channel(p.green(), a),
            unpremultiply_channel(p.blue(), a),
            a,
        ],
    }
}

/// An immutable, cheaply clonable premultiplied RGBA bitmap.
///
/// Snapshots of a surface and decoded images are handed around as `Bitmap`s;
/// the pixels are shared, never mutated.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixmap: Arc<Pixmap>,
}

impl Bitmap {
    /// Wrap an existing premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
        }
    }

    /// Create a bitmap from straight-alpha RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Canvas2dResult<Self> {
        let expected_len = width as usize * height as usize * 4;
        if data.len() != expected_len {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Data length {} does not match expected {} for {}x{} RGBA image",
                data.len(),
                expected_len,
                width,
                height
            )));
        }
        let mut pixmap = Pixmap::new(width, height)
            .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        for (pixel, rgba) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
            *pixel = premultiply_pixel(rgba[0], rgba[1], rgba[2], rgba[3]);
        }
        Ok(Self::from_pixmap(pixmap))
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Bounds of the bitmap at the origin.
    pub fn rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    pub fn as_pixmap_ref(&self) -> PixmapRef<'_> {
        Pixmap::as_ref(&self.pixmap)
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA value of one pixel.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(unpremultiply_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(255, 255, 255)]
    #[case(255, 0, 0)]
    #[case(200, 128, 100)]
    #[case(10, 1, 4)]
    fn test_premultiply_channel(#[case] c: u8, #[case] a: u8, #[case] expected: u8) {
        assert_eq!(premultiply_channel(c, a), expected);
    }

    #[test]
    fn test_unpremultiply_saturates() {
        // Invalid premultiplied input (channel above alpha) clamps to 255
        assert_eq!(unpremultiply_channel(200, 100), 255);
        assert_eq!(unpremultiply_channel(50, 100), 128);
        assert_eq!(unpremultiply_channel(0, 0), 0);
    }

    #[test]
    fn test_opaque_pixels_round_trip_exactly() {
        let data = [12, 34, 56, 255, 200, 100, 0, 255];
        let bitmap = Bitmap::from_rgba8(2, 1, &data).unwrap();
        assert_eq!(bitmap.pixel_rgba(0, 0), Some([12, 34, 56, 255]));
        assert_eq!(bitmap.pixel_rgba(1, 0), Some([200, 100, 0, 255]));
    }

    #[test]
    fn test_transparent_pixels_lose_color() {
        let bitmap = Bitmap::from_rgba8(1, 1, &[255, 0, 0, 0]).unwrap();
        assert_eq!(bitmap.pixel_rgba(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(Bitmap::from_rgba8(2, 2, &[0; 8]).is_err());
    }
}
