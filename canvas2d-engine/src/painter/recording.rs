//! A display-list painter.

use super::{BitmapParams, FillParams, Painter, StrokeParams, StrokeStyle};
use crate::bitmap::Bitmap;
use crate::filter::Filter;
use crate::geometry::{FloatRect, IntRect};
use crate::path::{Path, WindingRule};
use crate::style::{CompositeOperator, PaintStyle, ScalingMode};
use crate::surface::Surface;
use tiny_skia::{Color, Transform};

/// One recorded painter call. Paint operations carry the painter transform
/// that was current when they were issued.
#[derive(Debug, Clone)]
pub enum PaintOp {
    FillPath {
        path: Path,
        style: PaintStyle,
        filter: Option<Filter>,
        global_alpha: f32,
        operator: CompositeOperator,
        blur: f32,
        winding_rule: WindingRule,
        painter_transform: Transform,
    },
    StrokePath {
        path: Path,
        style: PaintStyle,
        stroke: StrokeStyle,
        filter: Option<Filter>,
        global_alpha: f32,
        operator: CompositeOperator,
        blur: f32,
        transform: Transform,
        painter_transform: Transform,
    },
    DrawBitmap {
        bitmap: Bitmap,
        source: IntRect,
        destination: FloatRect,
        scaling: ScalingMode,
        filter: Option<Filter>,
        global_alpha: f32,
        operator: CompositeOperator,
        blur: f32,
        transform: Transform,
        painter_transform: Transform,
    },
    Clip {
        path: Path,
        winding_rule: WindingRule,
    },
    ClearRect {
        rect: FloatRect,
        transform: Transform,
        color: Color,
    },
    Save,
    Restore,
    SetTransform(Transform),
    Reset,
}

impl PaintOp {
    /// Whether the op puts pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            PaintOp::FillPath { .. }
                | PaintOp::StrokePath { .. }
                | PaintOp::DrawBitmap { .. }
                | PaintOp::ClearRect { .. }
        )
    }
}

/// Records every call instead of rasterizing it.
///
/// The list can be inspected, or replayed onto another painter later.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<PaintOp>,
    transform: Transform,
    stack: Vec<Transform>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Only the ops that put pixels on the surface.
    pub fn paint_ops(&self) -> impl Iterator<Item = &PaintOp> {
        self.ops.iter().filter(|op| op.is_paint())
    }

    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Issue every recorded op, in order, on `painter`.
    pub fn replay<P: Painter>(&self, painter: &mut P, surface: &mut Surface) {
        for op in &self.ops {
            match op {
                PaintOp::FillPath {
                    path,
                    style,
                    filter,
                    global_alpha,
                    operator,
                    blur,
                    winding_rule,
                    ..
                } => painter.fill_path(
                    surface,
                    path,
                    &FillParams {
                        style,
                        filter: filter.as_ref(),
                        global_alpha: *global_alpha,
                        operator: *operator,
                        blur: *blur,
                        winding_rule: *winding_rule,
                    },
                ),
                PaintOp::StrokePath {
                    path,
                    style,
                    stroke,
                    filter,
                    global_alpha,
                    operator,
                    blur,
                    transform,
                    ..
                } => painter.stroke_path(
                    surface,
                    path,
                    &StrokeParams {
                        style,
                        stroke,
                        filter: filter.as_ref(),
                        global_alpha: *global_alpha,
                        operator: *operator,
                        blur: *blur,
                        transform: *transform,
                    },
                ),
                PaintOp::DrawBitmap {
                    bitmap,
                    source,
                    destination,
                    scaling,
                    filter,
                    global_alpha,
                    operator,
                    blur,
                    transform,
                    ..
                } => painter.draw_bitmap(
                    surface,
                    &BitmapParams {
                        bitmap,
                        source: *source,
                        destination: *destination,
                        scaling: *scaling,
                        filter: filter.as_ref(),
                        global_alpha: *global_alpha,
                        operator: *operator,
                        blur: *blur,
                        transform: *transform,
                    },
                ),
                PaintOp::Clip { path, winding_rule } => painter.clip(surface, path, *winding_rule),
                PaintOp::ClearRect {
                    rect,
                    transform,
                    color,
                } => painter.clear_rect(surface, *rect, *transform, *color),
                PaintOp::Save => painter.save(),
                PaintOp::Restore => painter.restore(),
                PaintOp::SetTransform(transform) => painter.set_transform(*transform),
                PaintOp::Reset => painter.reset(),
            }
        }
    }
}

impl Painter for RecordingPainter {
    fn fill_path(&mut self, _surface: &mut Surface, path: &Path, params: &FillParams<'_>) {
        self.ops.push(PaintOp::FillPath {
            path: path.clone(),
            style: params.style.clone(),
            filter: params.filter.cloned(),
            global_alpha: params.global_alpha,
            operator: params.operator,
            blur: params.blur,
            winding_rule: params.winding_rule,
            painter_transform: self.transform,
        });
    }

    fn stroke_path(&mut self, _surface: &mut Surface, path: &Path, params: &StrokeParams<'_>) {
        self.ops.push(PaintOp::StrokePath {
            path: path.clone(),
            style: params.style.clone(),
            stroke: params.stroke.clone(),
            filter: params.filter.cloned(),
            global_alpha: params.global_alpha,
            operator: params.operator,
            blur: params.blur,
            transform: params.transform,
            painter_transform: self.transform,
        });
    }

    fn draw_bitmap(&mut self, _surface: &mut Surface, params: &BitmapParams<'_>) {
        self.ops.push(PaintOp::DrawBitmap {
            bitmap: params.bitmap.clone(),
            source: params.source,
            destination: params.destination,
            scaling: params.scaling,
            filter: params.filter.cloned(),
            global_alpha: params.global_alpha,
            operator: params.operator,
            blur: params.blur,
            transform: params.transform,
            painter_transform: self.transform,
        });
    }

    fn clip(&mut self, _surface: &Surface, path: &Path, winding_rule: WindingRule) {
        self.ops.push(PaintOp::Clip {
            path: path.clone(),
            winding_rule,
        });
    }

    fn clear_rect(
        &mut self,
        _surface: &mut Surface,
        rect: FloatRect,
        transform: Transform,
        color: Color,
    ) {
        self.ops.push(PaintOp::ClearRect {
            rect,
            transform,
            color,
        });
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
        self.ops.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
        self.ops.push(PaintOp::Restore);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.ops.push(PaintOp::SetTransform(transform));
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.transform = Transform::identity();
        self.ops.push(PaintOp::Reset);
    }
}
