//! The rasterizer seam.
//!
//! A context decides *what* to paint (geometry, style, shadow pass, filter,
//! clip); a [`Painter`] decides *how*. Paths handed to a painter are already
//! in device space. The painter's own transform is the identity except while
//! a shadow pass is being painted, when it holds the shadow offset.

mod effects;
mod recording;
mod skia;

pub use recording::{PaintOp, RecordingPainter};
pub use skia::SkiaPainter;

use crate::bitmap::Bitmap;
use crate::filter::Filter;
use crate::geometry::{FloatRect, IntRect};
use crate::path::{Path, WindingRule};
use crate::style::{CompositeOperator, LineCap, LineJoin, PaintStyle, ScalingMode};
use crate::surface::Surface;
use tiny_skia::{Color, Transform};

/// Parameters of a path fill.
#[derive(Debug, Clone, Copy)]
pub struct FillParams<'a> {
    pub style: &'a PaintStyle,
    pub filter: Option<&'a Filter>,
    pub global_alpha: f32,
    pub operator: CompositeOperator,
    /// Shadow blur in canvas units; sigma is half of it. Zero for normal paints.
    pub blur: f32,
    pub winding_rule: WindingRule,
}

/// Line geometry for strokes, in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash: Vec<f32>,
    pub dash_offset: f32,
}

impl StrokeStyle {
    pub(crate) fn to_skia(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            miter_limit: self.miter_limit,
            line_cap: self.cap.into(),
            line_join: self.join.into(),
            dash: if self.dash.is_empty() {
                None
            } else {
                tiny_skia::StrokeDash::new(self.dash.clone(), self.dash_offset)
            },
        }
    }
}

/// Parameters of a path stroke.
#[derive(Debug, Clone, Copy)]
pub struct StrokeParams<'a> {
    pub style: &'a PaintStyle,
    pub stroke: &'a StrokeStyle,
    pub filter: Option<&'a Filter>,
    pub global_alpha: f32,
    pub operator: CompositeOperator,
    pub blur: f32,
    /// User space to device space; line widths and dashes are measured in
    /// user space.
    pub transform: Transform,
}

/// Parameters of a bitmap blit.
#[derive(Debug, Clone, Copy)]
pub struct BitmapParams<'a> {
    pub bitmap: &'a Bitmap,
    /// Pixels of `bitmap` to sample.
    pub source: IntRect,
    /// Destination rectangle in user space.
    pub destination: FloatRect,
    pub scaling: ScalingMode,
    pub filter: Option<&'a Filter>,
    pub global_alpha: f32,
    pub operator: CompositeOperator,
    pub blur: f32,
    /// User space to device space.
    pub transform: Transform,
}

/// A rasterizer for canvas drawing commands.
pub trait Painter {
    fn fill_path(&mut self, surface: &mut Surface, path: &Path, params: &FillParams<'_>);

    fn stroke_path(&mut self, surface: &mut Surface, path: &Path, params: &StrokeParams<'_>);

    fn draw_bitmap(&mut self, surface: &mut Surface, params: &BitmapParams<'_>);

    /// Intersect the clip region with a closed device-space path.
    fn clip(&mut self, surface: &Surface, path: &Path, winding_rule: WindingRule);

    /// Replace the pixels of `rect` (user space, mapped by `transform`) with
    /// `color`, inside the clip region.
    fn clear_rect(
        &mut self,
        surface: &mut Surface,
        rect: FloatRect,
        transform: Transform,
        color: Color,
    );

    /// Push the painter transform and clip region.
    fn save(&mut self);

    fn restore(&mut self);

    fn set_transform(&mut self, transform: Transform);

    /// Drop the save stack, the clip region and the transform.
    fn reset(&mut self);
}
