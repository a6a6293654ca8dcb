//! Fill, stroke, clip, and hit testing for Canvas2dContext.

use super::Canvas2dContext;
use crate::canvas_path::CanvasPath;
use crate::drawing_state::ClipEntry;
use crate::geometry::{FloatPoint, FloatRect, RectParams};
use crate::painter::{FillParams, Painter, StrokeParams, StrokeStyle};
use crate::path::{Path, WindingRule};
use crate::path2d::Path2D;
use crate::style::{FillStyle, LineCap, LineJoin, PaintStyle};
use tiny_skia::Transform;

/// Mean axis scale of a transform.
fn transform_scale(t: &Transform) -> f32 {
    ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0
}

/// Closed device-space rectangle: top-left, top-right, bottom-right,
/// bottom-left.
fn rect_path(params: &RectParams, transform: &Transform) -> Path {
    let RectParams {
        x,
        y,
        width,
        height,
    } = *params;
    let mut path = Path::new();
    path.move_to(FloatPoint::new(x, y).transformed(transform));
    path.line_to(FloatPoint::new(x + width, y).transformed(transform));
    path.line_to(FloatPoint::new(x + width, y + height).transformed(transform));
    path.line_to(FloatPoint::new(x, y + height).transformed(transform));
    path.close();
    path
}

fn rect_is_finite(params: &RectParams) -> bool {
    [params.x, params.y, params.width, params.height]
        .iter()
        .all(|v| v.is_finite())
}

impl<P: Painter> Canvas2dContext<P> {
    // --- Clipping ---

    /// Intersect the clip region with the current path (non-zero rule).
    pub fn clip(&mut self) {
        self.clip_with_rule(WindingRule::NonZero);
    }

    /// Intersect the clip region with the current path.
    pub fn clip_with_rule(&mut self, winding_rule: WindingRule) {
        log::debug!(target: "canvas", "clip {:?}", winding_rule);
        let path = self.path.closed_copy();
        self.clip_internal(path, winding_rule);
    }

    pub fn clip_path2d(&mut self, path: &Path2D) {
        self.clip_path2d_with_rule(path, WindingRule::NonZero);
    }

    pub fn clip_path2d_with_rule(&mut self, path: &Path2D, winding_rule: WindingRule) {
        log::debug!(target: "canvas", "clip path2d {:?}", winding_rule);
        let mut device = path.path().transformed(&self.state.transform);
        device.close_all_subpaths();
        self.clip_internal(device, winding_rule);
    }

    fn clip_internal(&mut self, path: Path, winding_rule: WindingRule) {
        if self.ensure_surface_mut().is_some() {
            if let Some(surface) = self.surface.as_ref() {
                self.painter.clip(surface, &path, winding_rule);
            }
        }
        self.state.clip.push(ClipEntry { path, winding_rule });
    }

    // --- Fill and stroke ---

    /// Fill the current path using the non-zero winding rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(WindingRule::NonZero);
    }

    /// Fill the current path. The current path itself is left open.
    pub fn fill_with_rule(&mut self, winding_rule: WindingRule) {
        log::debug!(target: "canvas", "fill {:?}", winding_rule);
        let path = self.path.closed_copy();
        self.fill_internal(&path, winding_rule);
    }

    pub fn fill_path2d(&mut self, path: &Path2D) {
        self.fill_path2d_with_rule(path, WindingRule::NonZero);
    }

    pub fn fill_path2d_with_rule(&mut self, path: &Path2D, winding_rule: WindingRule) {
        log::debug!(target: "canvas", "fill path2d {:?}", winding_rule);
        let mut device = path.path().transformed(&self.state.transform);
        device.close_all_subpaths();
        self.fill_internal(&device, winding_rule);
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        let path = self.path.clone();
        self.stroke_internal(&path);
    }

    pub fn stroke_path2d(&mut self, path: &Path2D) {
        log::debug!(target: "canvas", "stroke path2d");
        let device = path.path().transformed(&self.state.transform);
        self.stroke_internal(&device);
    }

    /// Fill a closed device-space path with the fill style.
    pub(crate) fn fill_internal(&mut self, path: &Path, winding_rule: WindingRule) {
        if path.is_empty() || self.ensure_surface_mut().is_none() {
            return;
        }
        self.taint_if_pattern(true);
        let style = PaintStyle::new(self.state.fill_style.clone(), self.state.transform);

        self.paint_passes(|painter, surface, state, pass| {
            painter.fill_path(
                surface,
                path,
                &FillParams {
                    style: &pass.style(&style),
                    filter: pass.filter,
                    global_alpha: state.global_alpha,
                    operator: state.composite_operator,
                    blur: pass.blur,
                    winding_rule,
                },
            );
        });

        let bounds = self.effect_bounds(path.bounding_box());
        self.did_draw(bounds);
    }

    /// Stroke an open device-space path with the stroke style.
    pub(crate) fn stroke_internal(&mut self, path: &Path) {
        if path.is_empty() || self.ensure_surface_mut().is_none() {
            return;
        }
        self.taint_if_pattern(false);
        let style = PaintStyle::new(self.state.stroke_style.clone(), self.state.transform);
        let stroke = self.stroke_style();
        let transform = self.state.transform;

        self.paint_passes(|painter, surface, state, pass| {
            painter.stroke_path(
                surface,
                path,
                &StrokeParams {
                    style: &pass.style(&style),
                    stroke: &stroke,
                    filter: pass.filter,
                    global_alpha: state.global_alpha,
                    operator: state.composite_operator,
                    blur: pass.blur,
                    transform,
                },
            );
        });

        let bounds = self.effect_bounds(path.bounding_box().inflated(self.stroke_outset()));
        self.did_draw(bounds);
    }

    /// Line parameters of the live state.
    fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.state.line_width,
            cap: self.state.line_cap,
            join: self.state.line_join,
            miter_limit: self.state.miter_limit,
            dash: self.state.line_dash.iter().map(|&d| d as f32).collect(),
            dash_offset: self.state.line_dash_offset,
        }
    }

    /// How far, in device pixels, a stroke can reach past its path.
    fn stroke_outset(&self) -> f32 {
        let state = &self.state;
        let mut factor: f32 = 1.0;
        if state.line_cap == LineCap::Square {
            factor = std::f32::consts::SQRT_2;
        }
        if state.line_join == LineJoin::Miter {
            factor = factor.max(state.miter_limit);
        }
        state.line_width / 2.0 * factor * transform_scale(&state.transform)
    }

    fn taint_if_pattern(&mut self, fill: bool) {
        let style = if fill {
            &self.state.fill_style
        } else {
            &self.state.stroke_style
        };
        if let FillStyle::Pattern(pattern) = style {
            if !pattern.is_origin_clean() && self.origin_clean {
                log::debug!(target: "canvas", "canvas tainted by cross-origin pattern");
                self.origin_clean = false;
            }
        }
    }

    // --- Hit testing ---

    /// Whether the device-space point lies inside the current path.
    pub fn is_point_in_path(&self, x: f32, y: f32, winding_rule: WindingRule) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.path.contains(FloatPoint::new(x, y), winding_rule)
    }

    /// Whether the device-space point lies inside `path` mapped by the
    /// current transform.
    pub fn is_point_in_path2d(
        &self,
        path: &Path2D,
        x: f32,
        y: f32,
        winding_rule: WindingRule,
    ) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        path.path()
            .transformed(&self.state.transform)
            .contains(FloatPoint::new(x, y), winding_rule)
    }

    // --- Rectangles ---

    /// Fill a rectangle. The current path is not touched.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if !rect_is_finite(params) {
            return;
        }
        let path = rect_path(params, &self.state.transform);
        self.fill_internal(&path, WindingRule::NonZero);
    }

    /// Stroke a rectangle. The current path is not touched.
    pub fn stroke_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "strokeRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if !rect_is_finite(params) {
            return;
        }
        let path = rect_path(params, &self.state.transform);
        self.stroke_internal(&path);
    }

    /// Set the pixels of a rectangle to the clear color.
    ///
    /// Styles, shadows, filters and the compositing operator do not apply;
    /// the clip region does.
    pub fn clear_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "clearRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if !rect_is_finite(params) {
            return;
        }
        let transform = self.state.transform;
        let rect = FloatRect::new(params.x, params.y, params.width, params.height).normalized();
        let Some(surface) = self.ensure_surface_mut() else {
            return;
        };
        let color = surface.clear_color();
        if let Some(surface) = self.surface.as_mut() {
            self.painter.clear_rect(surface, rect, transform, color);
        }
        self.did_draw(rect.transformed_bounds(&transform));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{recording_context, skia_context};
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::geometry::IntRect;
    use crate::painter::PaintOp;
    use crate::pattern::{CanvasPattern, Repetition};
    use rstest::rstest;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> RectParams {
        RectParams {
            x,
            y,
            width,
            height,
        }
    }

    fn pixel(ctx: &crate::Canvas2dContext, x: i32, y: i32) -> Vec<u8> {
        ctx.surface()
            .map(|s| s.read_pixels(IntRect::new(x, y, 1, 1)))
            .unwrap_or_default()
    }

    #[test]
    fn test_fill_rect_paints_pixels() {
        let mut ctx = skia_context(20, 20);
        ctx.set_fill_style("#00ff00");
        ctx.fill_rect(&rect(5.0, 5.0, 10.0, 10.0));
        assert_eq!(pixel(&ctx, 10, 10), vec![0, 255, 0, 255]);
        assert_eq!(pixel(&ctx, 2, 2), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_rect_path_order() {
        let mut ctx = recording_context(20, 20);
        ctx.fill_rect(&rect(1.0, 2.0, 3.0, 4.0));
        let Some(PaintOp::FillPath { path, .. }) = ctx.painter().paint_ops().next() else {
            panic!("expected a fill");
        };
        let subpath = &path.subpaths()[0];
        assert_eq!(subpath.start, FloatPoint::new(1.0, 2.0));
        let ends: Vec<_> = subpath.segments.iter().map(|s| s.end_point()).collect();
        assert_eq!(
            ends,
            vec![
                FloatPoint::new(4.0, 2.0),
                FloatPoint::new(4.0, 6.0),
                FloatPoint::new(1.0, 6.0),
            ]
        );
        assert!(subpath.closed);
    }

    #[test]
    fn test_fill_rect_leaves_current_path() {
        let mut ctx = skia_context(20, 20);
        ctx.move_to(0.0, 0.0);
        ctx.line_to(5.0, 5.0);
        ctx.fill_rect(&rect(0.0, 0.0, 2.0, 2.0));
        assert_eq!(ctx.path().subpaths().len(), 1);
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    #[case(f32::NEG_INFINITY)]
    fn test_non_finite_rect_is_ignored(#[case] bad: f32) {
        let mut ctx = recording_context(20, 20);
        ctx.fill_rect(&rect(bad, 0.0, 5.0, 5.0));
        ctx.stroke_rect(&rect(0.0, 0.0, bad, 5.0));
        ctx.clear_rect(&rect(0.0, 0.0, 5.0, bad));
        assert_eq!(ctx.painter().paint_ops().count(), 0);
        assert!(ctx.take_dirty_region().is_none());
    }

    #[test]
    fn test_fill_does_not_close_current_path() {
        let mut ctx = recording_context(50, 50);
        ctx.move_to(0.0, 0.0);
        ctx.line_to(40.0, 0.0);
        ctx.line_to(40.0, 40.0);
        ctx.fill();
        ctx.line_to(0.0, 40.0);
        ctx.fill();

        assert!(!ctx.path().subpaths()[0].closed);
        let fills: Vec<_> = ctx
            .painter()
            .paint_ops()
            .map(|op| match op {
                PaintOp::FillPath { path, .. } => path.subpaths()[0].clone(),
                other => panic!("unexpected op {:?}", other),
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].segments.len(), 2);
        assert!(fills[0].closed);
        assert_eq!(fills[1].segments.len(), 3);
        assert!(fills[1].closed);
    }

    #[test]
    fn test_stroke_keeps_path_open_and_passes_line_style() {
        let mut ctx = recording_context(50, 50);
        ctx.set_line_width(4.0);
        ctx.set_line_dash(vec![3.0, 1.5]);
        ctx.set_line_dash_offset(1.0);
        ctx.scale(2.0, 2.0);
        ctx.move_to(1.0, 1.0);
        ctx.line_to(10.0, 1.0);
        ctx.stroke();

        let Some(PaintOp::StrokePath {
            path,
            stroke,
            transform,
            ..
        }) = ctx.painter().paint_ops().next()
        else {
            panic!("expected a stroke");
        };
        assert!(!path.subpaths()[0].closed);
        assert_eq!(stroke.width, 4.0);
        assert_eq!(stroke.dash, vec![3.0f32, 1.5]);
        assert_eq!(stroke.dash_offset, 1.0);
        assert_eq!(*transform, Transform::from_scale(2.0, 2.0));
    }

    #[test]
    fn test_stroke_width_follows_transform() {
        let mut ctx = skia_context(40, 40);
        ctx.scale(4.0, 4.0);
        ctx.set_line_width(2.0);
        ctx.move_to(0.0, 5.0);
        ctx.line_to(10.0, 5.0);
        ctx.stroke();
        // 8 device pixels wide, centered on y = 20
        assert_eq!(pixel(&ctx, 20, 17)[3], 255);
        assert_eq!(pixel(&ctx, 20, 23)[3], 255);
        assert_eq!(pixel(&ctx, 20, 26)[3], 0);
    }

    #[test]
    fn test_empty_path_paints_nothing() {
        let mut ctx = recording_context(10, 10);
        ctx.fill();
        ctx.stroke();
        assert_eq!(ctx.painter().paint_ops().count(), 0);
    }

    #[test]
    fn test_fill_path2d_uses_transform() {
        let mut ctx = skia_context(40, 40);
        let mut square = Path2D::new();
        square.rect(&rect(0.0, 0.0, 10.0, 10.0));
        ctx.translate(20.0, 20.0);
        ctx.set_fill_style("red");
        ctx.fill_path2d(&square);
        assert_eq!(pixel(&ctx, 25, 25), vec![255, 0, 0, 255]);
        assert_eq!(pixel(&ctx, 5, 5), vec![0, 0, 0, 0]);
        // The Path2D keeps its own coordinates
        assert!(square
            .path()
            .contains(FloatPoint::new(5.0, 5.0), WindingRule::NonZero));
    }

    #[test]
    fn test_evenodd_fill() {
        let mut ctx = skia_context(30, 30);
        ctx.rect(&rect(0.0, 0.0, 30.0, 30.0));
        ctx.rect(&rect(10.0, 10.0, 10.0, 10.0));
        ctx.fill_with_rule(WindingRule::EvenOdd);
        assert_eq!(pixel(&ctx, 15, 15)[3], 0);
        assert_eq!(pixel(&ctx, 5, 5)[3], 255);
    }

    #[test]
    fn test_clip_narrows_and_restores() {
        let mut ctx = skia_context(20, 20);
        ctx.save();
        ctx.rect(&rect(0.0, 0.0, 10.0, 20.0));
        ctx.clip();
        ctx.begin_path();
        ctx.rect(&rect(5.0, 0.0, 15.0, 20.0));
        ctx.clip();
        assert_eq!(ctx.drawing_state().clip.len(), 2);
        ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
        assert_eq!(pixel(&ctx, 2, 5)[3], 0);
        assert_eq!(pixel(&ctx, 7, 5)[3], 255);
        assert_eq!(pixel(&ctx, 15, 5)[3], 0);

        ctx.restore();
        assert!(ctx.drawing_state().clip.is_empty());
        ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
        assert_eq!(pixel(&ctx, 15, 5)[3], 255);
    }

    #[test]
    fn test_clip_entry_is_closed_device_path() {
        let mut ctx = recording_context(20, 20);
        ctx.translate(5.0, 0.0);
        ctx.move_to(0.0, 0.0);
        ctx.line_to(10.0, 0.0);
        ctx.line_to(10.0, 10.0);
        ctx.clip_with_rule(WindingRule::EvenOdd);

        let entry = &ctx.drawing_state().clip[0];
        assert_eq!(entry.winding_rule, WindingRule::EvenOdd);
        assert!(entry.path.subpaths()[0].closed);
        assert_eq!(entry.path.subpaths()[0].start, FloatPoint::new(5.0, 0.0));
        assert!(matches!(
            ctx.painter().ops().last(),
            Some(PaintOp::Clip {
                winding_rule: WindingRule::EvenOdd,
                ..
            })
        ));
        // The current path stays open
        assert!(!ctx.path().subpaths()[0].closed);
    }

    #[test]
    fn test_is_point_in_path() {
        let mut ctx = skia_context(100, 100);
        ctx.translate(10.0, 10.0);
        ctx.rect(&rect(0.0, 0.0, 20.0, 20.0));
        // Device coordinates
        assert!(ctx.is_point_in_path(25.0, 25.0, WindingRule::NonZero));
        assert!(!ctx.is_point_in_path(5.0, 5.0, WindingRule::NonZero));
        assert!(!ctx.is_point_in_path(f32::NAN, 5.0, WindingRule::NonZero));
        // No paint, no dirty region
        assert!(ctx.surface().is_none());
        assert!(ctx.take_dirty_region().is_none());
    }

    #[test]
    fn test_is_point_in_unclosed_path() {
        let mut ctx = skia_context(100, 100);
        ctx.move_to(0.0, 0.0);
        ctx.line_to(50.0, 0.0);
        ctx.line_to(50.0, 50.0);
        assert!(ctx.is_point_in_path(40.0, 10.0, WindingRule::NonZero));
        assert!(!ctx.is_point_in_path(10.0, 40.0, WindingRule::NonZero));
    }

    #[test]
    fn test_is_point_in_path2d() {
        let mut ctx = skia_context(100, 100);
        let mut square = Path2D::new();
        square.rect(&rect(0.0, 0.0, 10.0, 10.0));
        ctx.scale(2.0, 2.0);
        assert!(ctx.is_point_in_path2d(&square, 15.0, 15.0, WindingRule::NonZero));
        assert!(!ctx.is_point_in_path2d(&square, 25.0, 25.0, WindingRule::NonZero));
    }

    #[test]
    fn test_clear_rect_bypasses_effects() {
        let mut ctx = recording_context(20, 20);
        ctx.set_shadow_color("black");
        ctx.set_shadow_offset_x(4.0);
        ctx.set_filter("blur(2px)");
        ctx.set_global_composite_operation("multiply");
        ctx.clear_rect(&rect(2.0, 2.0, 5.0, 5.0));

        let ops: Vec<_> = ctx.painter().paint_ops().collect();
        assert_eq!(ops.len(), 1);
        match ops[0] {
            PaintOp::ClearRect { rect: r, color, .. } => {
                assert_eq!(*r, FloatRect::new(2.0, 2.0, 5.0, 5.0));
                assert_eq!(color.alpha(), 0.0);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_clear_rect_clears_pixels() {
        let mut ctx = skia_context(20, 20);
        ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
        ctx.clear_rect(&rect(5.0, 5.0, 10.0, 10.0));
        assert_eq!(pixel(&ctx, 10, 10), vec![0, 0, 0, 0]);
        assert_eq!(pixel(&ctx, 2, 2), vec![0, 0, 0, 255]);
    }

    #[test]
    fn test_cross_origin_pattern_taints() {
        let mut ctx = skia_context(10, 10);
        let bitmap = Bitmap::from_rgba8(1, 1, &[255, 0, 0, 255]).unwrap();
        let pattern = CanvasPattern::new(bitmap, Repetition::Repeat).with_origin_clean(false);
        ctx.set_stroke_style_pattern(pattern.clone());
        ctx.fill_rect(&rect(0.0, 0.0, 5.0, 5.0));
        assert!(ctx.is_origin_clean());

        ctx.set_fill_style_pattern(pattern);
        ctx.fill_rect(&rect(0.0, 0.0, 5.0, 5.0));
        assert!(!ctx.is_origin_clean());
        ctx.set_fill_style("blue");
        assert!(!ctx.is_origin_clean());
    }

    #[test]
    fn test_stroke_dirty_rect_includes_line_width() {
        let mut ctx = skia_context(50, 50);
        ctx.set_line_width(4.0);
        ctx.set_line_join(LineJoin::Round);
        ctx.stroke_rect(&rect(10.0, 10.0, 10.0, 10.0));
        assert_eq!(
            ctx.take_dirty_region(),
            Some(FloatRect::new(8.0, 8.0, 14.0, 14.0))
        );
    }
}
