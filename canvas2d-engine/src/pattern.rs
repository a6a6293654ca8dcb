//! Pattern types for Canvas 2D operations.

use crate::bitmap::Bitmap;
use crate::dom_matrix::DOMMatrix;
use crate::error::Canvas2dError;
use std::borrow::Cow;
use tiny_skia::{FilterQuality, Pixmap, Shader, SpreadMode, Transform};

/// Largest tiled backing pixmap built for repeat-x / repeat-y patterns.
const MAX_TILED_SIZE: u32 = 8192;

/// Pattern repetition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Repetition {
    /// Repeat in both directions (default).
    #[default]
    Repeat,
    /// Repeat only horizontally.
    RepeatX,
    /// Repeat only vertically.
    RepeatY,
    /// No repetition (single instance).
    NoRepeat,
}

impl Repetition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Repetition::Repeat => "repeat",
            Repetition::RepeatX => "repeat-x",
            Repetition::RepeatY => "repeat-y",
            Repetition::NoRepeat => "no-repeat",
        }
    }
}

impl std::str::FromStr for Repetition {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" | "" => Ok(Repetition::Repeat),
            "repeat-x" => Ok(Repetition::RepeatX),
            "repeat-y" => Ok(Repetition::RepeatY),
            "no-repeat" => Ok(Repetition::NoRepeat),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid repetition mode: '{}'",
                s
            ))),
        }
    }
}

/// Canvas pattern for fill/stroke operations.
#[derive(Debug, Clone)]
pub struct CanvasPattern {
    bitmap: Bitmap,
    repetition: Repetition,
    /// Pattern space to user space.
    transform: Transform,
    origin_clean: bool,
}

/// The pixmap a pattern shader samples plus how to sample it.
///
/// tiny-skia only spreads in both axes at once, so single-axis and
/// non-repeating patterns sample a padded copy with transparent edges.
pub(crate) struct PatternTile<'a> {
    pixmap: Cow<'a, Pixmap>,
    spread_mode: SpreadMode,
    /// Maps pattern space onto the padded copy.
    offset: Transform,
}

impl PatternTile<'_> {
    /// Build the shader. `transform` maps user space to device space.
    pub(crate) fn shader(
        &self,
        pattern: &CanvasPattern,
        transform: Transform,
        quality: FilterQuality,
        opacity: f32,
    ) -> Shader<'_> {
        let combined = transform
            .pre_concat(pattern.transform)
            .pre_concat(self.offset);
        tiny_skia::Pattern::new(
            Pixmap::as_ref(&self.pixmap),
            self.spread_mode,
            quality,
            opacity,
            combined,
        )
    }
}

impl CanvasPattern {
    pub fn new(bitmap: Bitmap, repetition: Repetition) -> Self {
        Self {
            bitmap,
            repetition,
            transform: Transform::identity(),
            origin_clean: true,
        }
    }

    pub(crate) fn with_origin_clean(mut self, origin_clean: bool) -> Self {
        self.origin_clean = origin_clean;
        self
    }

    /// Set the pattern transform matrix.
    pub fn set_transform(&mut self, transform: DOMMatrix) {
        self.transform = transform.into();
    }

    /// Get the pattern transform matrix.
    pub fn transform(&self) -> DOMMatrix {
        self.transform.into()
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// False when the pattern was made from a cross-origin image. Painting
    /// with such a pattern taints the canvas.
    pub fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Backing pixmap for a paint covering an area of `extent_width` x
    /// `extent_height` device pixels.
    pub(crate) fn tile(&self, extent_width: u32, extent_height: u32) -> Option<PatternTile<'_>> {
        let base = self.bitmap.pixmap();
        let (width, height) = (base.width(), base.height());
        match self.repetition {
            Repetition::Repeat => Some(PatternTile {
                pixmap: Cow::Borrowed(base),
                spread_mode: SpreadMode::Repeat,
                offset: Transform::identity(),
            }),
            Repetition::NoRepeat => {
                let mut padded = Pixmap::new(width + 2, height + 2)?;
                copy_tile(base, &mut padded, 1, 1);
                Some(PatternTile {
                    pixmap: Cow::Owned(padded),
                    spread_mode: SpreadMode::Pad,
                    offset: Transform::from_translate(-1.0, -1.0),
                })
            }
            Repetition::RepeatX => {
                let tiles = tiles_per_side(extent_width, width);
                let mut tiled = Pixmap::new(width * tiles * 2, height + 2)?;
                for tile in 0..tiles * 2 {
                    copy_tile(base, &mut tiled, tile * width, 1);
                }
                Some(PatternTile {
                    pixmap: Cow::Owned(tiled),
                    spread_mode: SpreadMode::Pad,
                    offset: Transform::from_translate(-((tiles * width) as f32), -1.0),
                })
            }
            Repetition::RepeatY => {
                let tiles = tiles_per_side(extent_height, height);
                let mut tiled = Pixmap::new(width + 2, height * tiles * 2)?;
                for tile in 0..tiles * 2 {
                    copy_tile(base, &mut tiled, 1, tile * height);
                }
                Some(PatternTile {
                    pixmap: Cow::Owned(tiled),
                    spread_mode: SpreadMode::Pad,
                    offset: Transform::from_translate(-1.0, -((tiles * height) as f32)),
                })
            }
        }
    }
}

/// Number of tiles needed on each side of the pattern origin to cover
/// `extent` pixels, capped so that the tiled pixmap stays bounded.
fn tiles_per_side(extent: u32, tile_size: u32) -> u32 {
    let wanted = extent / tile_size.max(1) + 1;
    let cap = (MAX_TILED_SIZE / 2 / tile_size.max(1)).max(1);
    wanted.min(cap)
}

fn copy_tile(src: &Pixmap, dst: &mut Pixmap, x: u32, y: u32) {
    let dst_width = dst.width();
    let src_width = src.width() as usize;
    let src_pixels = src.pixels();
    let dst_pixels = dst.pixels_mut();
    for row in 0..src.height() {
        let src_start = row as usize * src_width;
        let dst_start = ((y + row) * dst_width + x) as usize;
        dst_pixels[dst_start..dst_start + src_width]
            .copy_from_slice(&src_pixels[src_start..src_start + src_width]);
    }
}
