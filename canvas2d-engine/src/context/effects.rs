//! Shadow and filter routing shared by every paint operation.

use super::Canvas2dContext;
use crate::drawing_state::DrawingState;
use crate::filter::Filter;
use crate::geometry::FloatRect;
use crate::painter::Painter;
use crate::style::PaintStyle;
use crate::surface::Surface;
use std::borrow::Cow;
use tiny_skia::{Color, Transform};

/// Parameters of one pass of a paint operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PaintPass<'a> {
    /// Solid color replacing the paint style; set on the shadow pass.
    pub shadow_color: Option<Color>,
    /// The filter chain; never applied to shadows.
    pub filter: Option<&'a Filter>,
    pub blur: f32,
}

impl PaintPass<'_> {
    pub(crate) fn style<'s>(&self, style: &'s PaintStyle) -> Cow<'s, PaintStyle> {
        match self.shadow_color {
            Some(color) => Cow::Owned(PaintStyle::color(color)),
            None => Cow::Borrowed(style),
        }
    }
}

impl<P: Painter> Canvas2dContext<P> {
    /// Run `paint` once for the shadow (when one would be visible) and once
    /// for the content.
    ///
    /// The shadow pass runs with the painter translated by the shadow offset,
    /// which is measured in device pixels. No pass runs without a surface.
    pub(crate) fn paint_passes<F>(&mut self, mut paint: F)
    where
        F: FnMut(&mut P, &mut Surface, &DrawingState, PaintPass<'_>),
    {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let state = &self.state;

        if state.shadow_visible() {
            self.painter.save();
            self.painter.set_transform(Transform::from_translate(
                state.shadow_offset_x,
                state.shadow_offset_y,
            ));
            paint(
                &mut self.painter,
                surface,
                state,
                PaintPass {
                    shadow_color: Some(state.shadow_color),
                    filter: None,
                    blur: state.shadow_blur,
                },
            );
            self.painter.restore();
        }

        paint(
            &mut self.painter,
            surface,
            state,
            PaintPass {
                shadow_color: None,
                filter: state.filter.as_ref(),
                blur: 0.0,
            },
        );
    }

    /// Device-space area a paint covering `bounds` can touch, including its
    /// filter spread and its shadow.
    pub(crate) fn effect_bounds(&self, bounds: FloatRect) -> FloatRect {
        let state = &self.state;
        let spread = state.filter.as_ref().map(Filter::outset).unwrap_or(0.0);
        let content = bounds.inflated(spread);
        if !state.shadow_visible() {
            return content;
        }
        let shadow = bounds
            .translated(state.shadow_offset_x, state.shadow_offset_y)
            .inflated(state.shadow_blur * 1.5);
        content.united(&shadow)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::recording_context;
    use crate::geometry::{FloatRect, RectParams};
    use crate::painter::PaintOp;
    use crate::style::FillStyle;
    use tiny_skia::{Color, Transform};

    fn square() -> RectParams {
        RectParams {
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 20.0,
        }
    }

    #[test]
    fn test_shadow_pass_precedes_content() {
        let mut ctx = recording_context(100, 100);
        ctx.set_shadow_color("blue");
        ctx.set_shadow_offset_x(5.0);
        ctx.set_shadow_offset_y(6.0);
        ctx.set_shadow_blur(4.0);
        ctx.set_global_alpha(0.5);
        ctx.fill_rect(&square());

        let fills: Vec<_> = ctx.painter().paint_ops().collect();
        assert_eq!(fills.len(), 2);
        match fills[0] {
            PaintOp::FillPath {
                style,
                blur,
                global_alpha,
                painter_transform,
                filter,
                ..
            } => {
                assert!(matches!(style.style, FillStyle::Color(c) if c == Color::from_rgba8(0, 0, 255, 255)));
                assert_eq!(*blur, 4.0);
                assert_eq!(*global_alpha, 0.5);
                assert_eq!(*painter_transform, Transform::from_translate(5.0, 6.0));
                assert!(filter.is_none());
            }
            ref other => panic!("expected a shadow fill, got {:?}", other),
        }
        match fills[1] {
            PaintOp::FillPath {
                blur,
                painter_transform,
                ..
            } => {
                assert_eq!(*blur, 0.0);
                assert!(painter_transform.is_identity());
            }
            ref other => panic!("expected the content fill, got {:?}", other),
        }
    }

    #[test]
    fn test_no_shadow_under_copy() {
        let mut ctx = recording_context(100, 100);
        ctx.set_shadow_color("black");
        ctx.set_shadow_offset_x(5.0);
        ctx.set_shadow_blur(10.0);
        ctx.set_global_composite_operation("copy");
        ctx.fill_rect(&square());
        assert_eq!(ctx.painter().paint_ops().count(), 1);
    }

    #[test]
    fn test_no_shadow_for_transparent_color_or_zero_geometry() {
        let mut ctx = recording_context(100, 100);
        ctx.set_shadow_offset_x(5.0);
        ctx.fill_rect(&square());
        assert_eq!(ctx.painter().paint_ops().count(), 1);

        ctx.painter_mut().clear();
        ctx.set_shadow_color("black");
        ctx.set_shadow_offset_x(0.0);
        ctx.fill_rect(&square());
        assert_eq!(ctx.painter().paint_ops().count(), 1);
    }

    #[test]
    fn test_filter_only_on_content_pass() {
        let mut ctx = recording_context(100, 100);
        ctx.set_filter("grayscale(1)");
        ctx.set_shadow_color("black");
        ctx.set_shadow_offset_y(3.0);
        ctx.stroke_rect(&square());

        let filters: Vec<_> = ctx
            .painter()
            .paint_ops()
            .map(|op| match op {
                PaintOp::StrokePath { filter, .. } => filter.is_some(),
                other => panic!("unexpected op {:?}", other),
            })
            .collect();
        assert_eq!(filters, vec![false, true]);
    }

    #[test]
    fn test_dirty_region_covers_shadow() {
        let mut ctx = recording_context(100, 100);
        ctx.set_shadow_color("black");
        ctx.set_shadow_offset_x(50.0);
        ctx.fill_rect(&square());
        let dirty = ctx.take_dirty_region().unwrap();
        assert_eq!(dirty, FloatRect::new(10.0, 10.0, 70.0, 20.0));
    }
}
