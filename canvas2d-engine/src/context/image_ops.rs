//! Image drawing, pixel data, and PNG output operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::bitmap::Bitmap;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{DirtyRect, FloatRect, ImageCropParams, IntRect};
use crate::image_data::{ImageData, ImageDataSettings};
use crate::image_source::{CanvasElementSource, CanvasImageSource, Usability};
use crate::painter::{BitmapParams, Painter};
use crate::pattern::{CanvasPattern, Repetition};
use crate::settings::convert_rgba8;
use crate::style::{CompositeOperator, ScalingMode};
use crate::surface::Surface;
use std::borrow::Cow;
use tiny_skia::Transform;

impl<P: Painter> Canvas2dContext<P> {
    // --- drawImage ---

    /// Draw the whole image with its top-left corner at (dx, dy).
    pub fn draw_image<'a>(
        &mut self,
        source: impl Into<CanvasImageSource<'a>>,
        dx: f32,
        dy: f32,
    ) -> Canvas2dResult<()> {
        let source = source.into();
        let (width, height) = source.intrinsic_size();
        let (width, height) = (width as f32, height as f32);
        self.draw_image_internal(
            source,
            &ImageCropParams {
                sx: 0.0,
                sy: 0.0,
                sw: width,
                sh: height,
                dx,
                dy,
                dw: width,
                dh: height,
            },
        )
    }

    /// Draw the whole image scaled into (dx, dy, dw, dh).
    pub fn draw_image_with_size<'a>(
        &mut self,
        source: impl Into<CanvasImageSource<'a>>,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        let source = source.into();
        let (width, height) = source.intrinsic_size();
        self.draw_image_internal(
            source,
            &ImageCropParams {
                sx: 0.0,
                sy: 0.0,
                sw: width as f32,
                sh: height as f32,
                dx,
                dy,
                dw,
                dh,
            },
        )
    }

    /// Draw the source rectangle of the image into the destination rectangle.
    pub fn draw_image_cropped<'a>(
        &mut self,
        source: impl Into<CanvasImageSource<'a>>,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        self.draw_image_internal(source.into(), params)
    }

    /// The drawImage algorithm.
    ///
    /// Non-finite arguments, unusable sources and a zero source width or
    /// height draw nothing. A source rectangle reaching past the bitmap is
    /// clipped to it and the destination shrinks in the same proportion.
    fn draw_image_internal(
        &mut self,
        source: CanvasImageSource<'_>,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        let ImageCropParams {
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } = *params;
        if [sx, sy, sw, sh, dx, dy, dw, dh].iter().any(|v| !v.is_finite()) {
            return Ok(());
        }

        if source.check_usability()? == Usability::Bad {
            log::debug!(target: "canvas", "drawImage: source not usable");
            return Ok(());
        }
        let Some(bitmap) = source.bitmap() else {
            return Ok(());
        };

        let source_rect = FloatRect::new(sx, sy, sw, sh).normalized();
        let mut destination = FloatRect::new(dx, dy, dw, dh).normalized();
        let clipped_source = source_rect.intersected(&bitmap.rect().to_float());
        if clipped_source != source_rect {
            destination.width *= clipped_source.width / source_rect.width;
            destination.height *= clipped_source.height / source_rect.height;
        }

        // Checked on the unclipped arguments, after clipping
        if sw == 0.0 || sh == 0.0 {
            return Ok(());
        }

        log::debug!(
            target: "canvas",
            "drawImage {:?} -> {:?}",
            clipped_source,
            destination
        );
        if self.ensure_surface_mut().is_some() {
            let transform = self.state.transform;
            let scaling = self.state.scaling_mode();
            self.paint_bitmap(
                &bitmap,
                clipped_source.to_rounded(),
                destination,
                scaling,
                transform,
            );
            let spread = self.state.filter.as_ref().map(|f| f.outset()).unwrap_or(0.0);
            self.did_draw(destination.transformed_bounds(&transform).inflated(spread));
        }

        if !source.is_origin_clean() && self.origin_clean {
            log::debug!(target: "canvas", "canvas tainted by cross-origin image");
            self.origin_clean = false;
        }
        Ok(())
    }

    /// Blit with the state's filter, alpha and operator. Images cast no
    /// shadow.
    fn paint_bitmap(
        &mut self,
        bitmap: &Bitmap,
        source: IntRect,
        destination: FloatRect,
        scaling: ScalingMode,
        transform: Transform,
    ) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.painter.draw_bitmap(
            surface,
            &BitmapParams {
                bitmap,
                source,
                destination,
                scaling,
                filter: self.state.filter.as_ref(),
                global_alpha: self.state.global_alpha,
                operator: self.state.composite_operator,
                blur: 0.0,
                transform,
            },
        );
    }

    // --- Patterns ---

    /// Create a pattern from an image source.
    ///
    /// Returns `Ok(None)` when the source has nothing to draw. Unknown
    /// repetition keywords are an `InvalidArgument` error.
    pub fn create_pattern<'a>(
        &self,
        source: impl Into<CanvasImageSource<'a>>,
        repetition: &str,
    ) -> Canvas2dResult<Option<CanvasPattern>> {
        let source = source.into();
        if source.check_usability()? == Usability::Bad {
            return Ok(None);
        }
        let repetition = repetition.parse::<Repetition>()?;
        let Some(bitmap) = source.bitmap() else {
            return Ok(None);
        };
        Ok(Some(
            CanvasPattern::new(bitmap, repetition).with_origin_clean(source.is_origin_clean()),
        ))
    }

    // --- Image data ---

    /// Create transparent black image data of `|width|` x `|height|` pixels
    /// in the context's color space.
    pub fn create_image_data(&self, width: i32, height: i32) -> Canvas2dResult<ImageData> {
        self.create_image_data_with_settings(width, height, None)
    }

    pub fn create_image_data_with_settings(
        &self,
        width: i32,
        height: i32,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<ImageData> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::IndexSize(
                "Width and height must not be zero".to_string(),
            ));
        }
        ImageData::with_default_color_space(
            width.unsigned_abs(),
            height.unsigned_abs(),
            settings,
            self.settings().color_space,
        )
    }

    /// Create transparent black image data with the size and color space of
    /// `other`.
    pub fn create_image_data_from(&self, other: &ImageData) -> Canvas2dResult<ImageData> {
        ImageData::with_default_color_space(
            other.width(),
            other.height(),
            None,
            other.color_space(),
        )
    }

    /// Read a rectangle of the surface as straight-alpha RGBA.
    ///
    /// A negative width or height grows the rectangle left or up. Pixels
    /// outside the surface read as transparent black. A width or height
    /// beyond [`MAX_DIMENSION`](crate::MAX_DIMENSION) is an invalid
    /// dimensions error.
    pub fn get_image_data(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Canvas2dResult<ImageData> {
        self.get_image_data_with_settings(x, y, width, height, None)
    }

    /// Like [`Self::get_image_data`]; pixels are converted into the color
    /// space requested by `settings`.
    pub fn get_image_data_with_settings(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<ImageData> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::IndexSize(
                "Width and height must not be zero".to_string(),
            ));
        }
        if !self.origin_clean {
            return Err(Canvas2dError::Security(
                "The canvas has been tainted by cross-origin data".to_string(),
            ));
        }

        let (abs_width, abs_height) = (width.unsigned_abs(), height.unsigned_abs());
        let mut image_data = ImageData::with_default_color_space(
            abs_width,
            abs_height,
            settings,
            self.settings().color_space,
        )?;

        // Nothing painted yet: everything is transparent black
        let Some(surface) = self.surface.as_ref() else {
            return Ok(image_data);
        };

        let (Ok(rect_width), Ok(rect_height)) = (
            i32::try_from(image_data.width()),
            i32::try_from(image_data.height()),
        ) else {
            return Err(Canvas2dError::InvalidDimensions {
                width: abs_width,
                height: abs_height,
            });
        };
        let source_rect = IntRect::new(x, y, rect_width, rect_height)
            .translated(width.min(0), height.min(0));
        let pixels = surface.read_pixels(source_rect);
        image_data.data_mut().copy_from_slice(&pixels);
        let target_color_space = image_data.color_space();
        convert_rgba8(
            image_data.data_mut(),
            self.settings().color_space,
            target_color_space,
        );
        Ok(image_data)
    }

    /// Paint `image_data` with its top-left corner at (dx, dy).
    ///
    /// The pixels go through the clip, but the transform, global alpha,
    /// compositing operator, filter and shadow do not apply. Image data in
    /// another color space is converted to the context's.
    pub fn put_image_data(&mut self, image_data: &ImageData, dx: f32, dy: f32) {
        self.put_image_data_dirty(
            image_data,
            dx,
            dy,
            &DirtyRect {
                x: 0,
                y: 0,
                width: i32::try_from(image_data.width()).unwrap_or(i32::MAX),
                height: i32::try_from(image_data.height()).unwrap_or(i32::MAX),
            },
        );
    }

    /// Paint the `dirty` part of `image_data`, offset by (dx, dy).
    ///
    /// Negative dirty sizes extend left or up; the rect is clipped to the
    /// image data.
    pub fn put_image_data_dirty(
        &mut self,
        image_data: &ImageData,
        dx: f32,
        dy: f32,
        dirty: &DirtyRect,
    ) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let mut region = IntRect::new(dirty.x, dirty.y, dirty.width, dirty.height);
        if region.width < 0 {
            region.x = region.x.saturating_add(region.width);
            region.width = region.width.saturating_neg();
        }
        if region.height < 0 {
            region.y = region.y.saturating_add(region.height);
            region.height = region.height.saturating_neg();
        }
        let bounds = IntRect::new(
            0,
            0,
            i32::try_from(image_data.width()).unwrap_or(i32::MAX),
            i32::try_from(image_data.height()).unwrap_or(i32::MAX),
        );
        let region = region.intersected(&bounds);
        if region.is_empty() {
            return;
        }

        let mut pixels = Cow::Borrowed(image_data.data());
        if image_data.color_space() != self.settings().color_space {
            convert_rgba8(
                pixels.to_mut(),
                image_data.color_space(),
                self.settings().color_space,
            );
        }
        let bitmap = match Bitmap::from_rgba8(image_data.width(), image_data.height(), &pixels) {
            Ok(bitmap) => bitmap,
            Err(err) => {
                log::debug!(target: "canvas", "putImageData: {}", err);
                return;
            }
        };

        let destination = FloatRect::new(
            dx + region.x as f32,
            dy + region.y as f32,
            region.width as f32,
            region.height as f32,
        );
        if self.ensure_surface_mut().is_none() {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        log::debug!(target: "canvas", "putImageData {:?} -> {:?}", region, destination);
        self.painter.draw_bitmap(
            surface,
            &BitmapParams {
                bitmap: &bitmap,
                source: region,
                destination,
                scaling: ScalingMode::NearestNeighbor,
                filter: None,
                global_alpha: 1.0,
                operator: CompositeOperator::SourceOver,
                blur: 0.0,
                transform: Transform::identity(),
            },
        );
        self.did_draw(destination);
    }

    // --- Export ---

    /// Encode the canvas as PNG.
    ///
    /// # Arguments
    /// * `ppi` - Optional pixels per inch for PNG metadata. Defaults to 72 if not specified.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        match self.surface.as_ref() {
            Some(surface) => surface.to_png(ppi),
            // Never painted: encode a freshly cleared surface
            None => Surface::new(self.width(), self.height(), self.settings().surface_format())?
                .to_png(ppi),
        }
    }

    /// Snapshot the canvas so it can be drawn into another context.
    pub fn to_image_source(&self) -> CanvasElementSource {
        CanvasElementSource {
            width: self.width(),
            height: self.height(),
            snapshot: self.surface.as_ref().map(Surface::snapshot),
            origin_clean: self.origin_clean,
        }
    }
}
