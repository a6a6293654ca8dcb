//! Sources accepted by drawImage and createPattern.
//!
//! Each kind carries its own usability rule and its own way of producing an
//! immutable [`Bitmap`]; [`CanvasImageSource`] dispatches both with a single
//! match.

use crate::bitmap::Bitmap;
use crate::error::{Canvas2dError, Canvas2dResult};

/// Result of checking whether an image source can be drawn right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usability {
    Good,
    /// Nothing is drawn, but this is not an error.
    Bad,
}

/// A decoded raster or vector image element.
#[derive(Debug, Clone, Default)]
pub struct DecodedImage {
    bitmap: Option<Bitmap>,
    origin_clean: bool,
}

impl DecodedImage {
    /// A fully decoded same-origin image.
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap: Some(bitmap),
            origin_clean: true,
        }
    }

    /// An image whose data has not been decoded (yet).
    pub fn pending() -> Self {
        Self {
            bitmap: None,
            origin_clean: true,
        }
    }

    /// A decoded image whose data came from another origin.
    pub fn cross_origin(bitmap: Bitmap) -> Self {
        Self {
            bitmap: Some(bitmap),
            origin_clean: false,
        }
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }
}

/// A snapshot of another canvas, see `Canvas2dContext::to_image_source`.
#[derive(Debug, Clone)]
pub struct CanvasElementSource {
    pub width: u32,
    pub height: u32,
    /// None when the canvas has never been painted.
    pub snapshot: Option<Bitmap>,
    pub origin_clean: bool,
}

/// Media ready states, in increasing order of available data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// The current frame of a video element.
#[derive(Debug, Clone, Default)]
pub struct VideoFrame {
    pub ready_state: ReadyState,
    pub frame: Option<Bitmap>,
    pub origin_clean: bool,
}

impl VideoFrame {
    pub fn new(ready_state: ReadyState, frame: Option<Bitmap>) -> Self {
        Self {
            ready_state,
            frame,
            origin_clean: true,
        }
    }
}

/// A detachable bitmap resource.
#[derive(Debug, Clone)]
pub struct ImageBitmap {
    bitmap: Option<Bitmap>,
    width: u32,
    height: u32,
    origin_clean: bool,
}

impl ImageBitmap {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            bitmap: Some(bitmap),
            origin_clean: true,
        }
    }

    pub fn with_origin_clean(mut self, origin_clean: bool) -> Self {
        self.origin_clean = origin_clean;
        self
    }

    /// Release the pixels. The bitmap is detached afterwards and reports a
    /// zero size.
    pub fn close(&mut self) {
        self.bitmap = None;
        self.width = 0;
        self.height = 0;
    }

    pub fn is_detached(&self) -> bool {
        self.bitmap.is_none()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Any object that can be passed as the image argument of drawImage.
#[derive(Debug, Clone, Copy)]
pub enum CanvasImageSource<'a> {
    Image(&'a DecodedImage),
    SvgImage(&'a DecodedImage),
    Canvas(&'a CanvasElementSource),
    Video(&'a VideoFrame),
    ImageBitmap(&'a ImageBitmap),
}

impl<'a> CanvasImageSource<'a> {
    /// Check whether the source can be drawn.
    ///
    /// Zero-sized canvases and detached bitmaps are errors rather than `Bad`.
    pub fn check_usability(&self) -> Canvas2dResult<Usability> {
        match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                match &image.bitmap {
                    Some(bitmap) if bitmap.width() > 0 && bitmap.height() > 0 => {
                        Ok(Usability::Good)
                    }
                    _ => Ok(Usability::Bad),
                }
            }
            CanvasImageSource::Video(video) => {
                if video.ready_state <= ReadyState::HaveMetadata {
                    Ok(Usability::Bad)
                } else {
                    Ok(Usability::Good)
                }
            }
            CanvasImageSource::Canvas(canvas) => {
                if canvas.width == 0 || canvas.height == 0 {
                    return Err(Canvas2dError::InvalidState(
                        "Canvas width or height is zero".to_string(),
                    ));
                }
                Ok(Usability::Good)
            }
            CanvasImageSource::ImageBitmap(bitmap) => {
                if bitmap.is_detached() {
                    return Err(Canvas2dError::InvalidState(
                        "Image bitmap is detached".to_string(),
                    ));
                }
                Ok(Usability::Good)
            }
        }
    }

    /// The pixels to draw, if the source has any.
    pub fn bitmap(&self) -> Option<Bitmap> {
        match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                image.bitmap.clone()
            }
            CanvasImageSource::Canvas(canvas) => canvas.snapshot.clone(),
            CanvasImageSource::Video(video) => video.frame.clone(),
            CanvasImageSource::ImageBitmap(bitmap) => bitmap.bitmap.clone(),
        }
    }

    /// Width and height used when drawImage is called without a source rect.
    pub fn intrinsic_size(&self) -> (u32, u32) {
        match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => image
                .bitmap
                .as_ref()
                .map(|b| (b.width(), b.height()))
                .unwrap_or((0, 0)),
            CanvasImageSource::Canvas(canvas) => (canvas.width, canvas.height),
            CanvasImageSource::Video(video) => video
                .frame
                .as_ref()
                .map(|b| (b.width(), b.height()))
                .unwrap_or((0, 0)),
            CanvasImageSource::ImageBitmap(bitmap) => (bitmap.width, bitmap.height),
        }
    }

    pub fn is_origin_clean(&self) -> bool {
        match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                image.origin_clean
            }
            CanvasImageSource::Canvas(canvas) => canvas.origin_clean,
            CanvasImageSource::Video(video) => video.origin_clean,
            CanvasImageSource::ImageBitmap(bitmap) => bitmap.origin_clean,
        }
    }
}

impl<'a> From<&'a DecodedImage> for CanvasImageSource<'a> {
    fn from(image: &'a DecodedImage) -> Self {
        CanvasImageSource::Image(image)
    }
}

impl<'a> From<&'a CanvasElementSource> for CanvasImageSource<'a> {
    fn from(canvas: &'a CanvasElementSource) -> Self {
        CanvasImageSource::Canvas(canvas)
    }
}

impl<'a> From<&'a VideoFrame> for CanvasImageSource<'a> {
    fn from(video: &'a VideoFrame) -> Self {
        CanvasImageSource::Video(video)
    }
}

impl<'a> From<&'a ImageBitmap> for CanvasImageSource<'a> {
    fn from(bitmap: &'a ImageBitmap) -> Self {
        CanvasImageSource::ImageBitmap(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::from_rgba8(width, height, &vec![255; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn test_pending_image_is_bad() {
        let image = DecodedImage::pending();
        assert_eq!(
            CanvasImageSource::Image(&image).check_usability().unwrap(),
            Usability::Bad
        );
        let svg = DecodedImage::pending();
        assert_eq!(
            CanvasImageSource::SvgImage(&svg).check_usability().unwrap(),
            Usability::Bad
        );
    }

    #[rstest]
    #[case(ReadyState::HaveNothing, Usability::Bad)]
    #[case(ReadyState::HaveMetadata, Usability::Bad)]
    #[case(ReadyState::HaveCurrentData, Usability::Good)]
    #[case(ReadyState::HaveEnoughData, Usability::Good)]
    fn test_video_ready_state(#[case] ready_state: ReadyState, #[case] expected: Usability) {
        let video = VideoFrame::new(ready_state, Some(bitmap(2, 2)));
        assert_eq!(
            CanvasImageSource::Video(&video).check_usability().unwrap(),
            expected
        );
    }

    #[test]
    fn test_zero_sized_canvas_is_invalid_state() {
        let canvas = CanvasElementSource {
            width: 0,
            height: 10,
            snapshot: None,
            origin_clean: true,
        };
        assert!(CanvasImageSource::Canvas(&canvas)
            .check_usability()
            .unwrap_err()
            .is_invalid_state());
    }

    #[test]
    fn test_closed_bitmap_is_invalid_state() {
        let mut image_bitmap = ImageBitmap::new(bitmap(2, 2));
        assert_eq!(
            CanvasImageSource::ImageBitmap(&image_bitmap)
                .check_usability()
                .unwrap(),
            Usability::Good
        );
        image_bitmap.close();
        assert_eq!(image_bitmap.width(), 0);
        assert!(CanvasImageSource::ImageBitmap(&image_bitmap)
            .check_usability()
            .unwrap_err()
            .is_invalid_state());
    }

    #[test]
    fn test_origin_clean_flags() {
        let clean = DecodedImage::new(bitmap(1, 1));
        let tainted = DecodedImage::cross_origin(bitmap(1, 1));
        assert!(CanvasImageSource::Image(&clean).is_origin_clean());
        assert!(!CanvasImageSource::Image(&tainted).is_origin_clean());
    }
}
