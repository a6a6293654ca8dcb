//! The pixel surface a context paints into.

use crate::bitmap::{unpremultiply_pixel, Bitmap};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::IntRect;
use tiny_skia::Pixmap;

/// Maximum surface dimension (same as Chrome).
pub const MAX_DIMENSION: u32 = 32767;

/// Storage format of a surface, fixed when the surface is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceFormat {
    /// Premultiplied RGBA with a meaningful alpha channel.
    #[default]
    Rgba,
    /// Opaque RGB; alpha is always reported as 255.
    Rgbx,
}

/// A premultiplied pixel buffer plus its format.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
    format: SurfaceFormat,
}

impl Surface {
    /// Allocate a surface cleared to the format's clear color.
    pub fn new(width: u32, height: u32, format: SurfaceFormat) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        let mut surface = Self { pixmap, format };
        surface.clear();
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn format(&self) -> SurfaceFormat {
        self.format
    }

    pub fn rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Transparent black for RGBA surfaces, opaque black for opaque ones.
    pub fn clear_color(&self) -> tiny_skia::Color {
        match self.format {
            SurfaceFormat::Rgba => tiny_skia::Color::TRANSPARENT,
            SurfaceFormat::Rgbx => tiny_skia::Color::BLACK,
        }
    }

    /// Fill the whole surface with the clear color.
    pub fn clear(&mut self) {
        let color = self.clear_color();
        self.pixmap.fill(color);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// An immutable copy of the current pixels.
    pub fn snapshot(&self) -> Bitmap {
        let mut pixmap = self.pixmap.clone();
        if self.format == SurfaceFormat::Rgbx {
            for pixel in pixmap.data_mut().chunks_exact_mut(4) {
                pixel[3] = 255;
            }
        }
        Bitmap::from_pixmap(pixmap)
    }

    /// Read `rect` as straight-alpha RGBA bytes. Pixels of `rect` outside the
    /// surface read as transparent black.
    pub fn read_pixels(&self, rect: IntRect) -> Vec<u8> {
        let width = rect.width.max(0) as usize;
        let height = rect.height.max(0) as usize;
        let mut data = vec![0u8; width * height * 4];

        let visible = rect.intersected(&self.rect());
        if visible.is_empty() {
            return data;
        }

        let surface_width = self.width() as usize;
        let pixels = self.pixmap.pixels();
        for y in visible.y..visible.bottom() {
            let dst_row = (y - rect.y) as usize;
            for x in visible.x..visible.right() {
                let dst_col = (x - rect.x) as usize;
                let src = pixels[y as usize * surface_width + x as usize];
                let rgba = match self.format {
                    SurfaceFormat::Rgba => unpremultiply_pixel(src),
                    // Opaque storage is the color composited over black
                    SurfaceFormat::Rgbx => [src.red(), src.green(), src.blue(), 255],
                };
                let idx = (dst_row * width + dst_col) * 4;
                data[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
        data
    }

    /// Encode the surface as PNG.
    ///
    /// # Arguments
    /// * `ppi` - Optional pixels per inch for PNG metadata. Defaults to 72 if not specified.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixel density is stored in pixels per meter
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            let data = self.read_pixels(self.rect());
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }
}
