//! tiny-skia rasterizer.

use super::effects;
use super::{BitmapParams, FillParams, Painter, StrokeParams};
use crate::filter::Filter;
use crate::geometry::FloatRect;
use crate::path::{Path, WindingRule};
use crate::style::{CompositeOperator, FillStyle, PaintStyle, ScalingMode};
use crate::surface::Surface;
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, Mask, Paint, PathBuilder, PathStroker, Pixmap,
    PixmapPaint, Rect, SpreadMode, Transform,
};

/// Paints onto a surface's pixmap with tiny-skia.
///
/// The clip region is kept as an anti-aliased coverage mask the size of the
/// surface. Paints that need a filter, a blur or plus-darker compositing are
/// rendered into an offscreen layer first; the layer is then composited with
/// the requested operator under the clip mask.
#[derive(Debug, Default)]
pub struct SkiaPainter {
    transform: Transform,
    clip: Option<Mask>,
    stack: Vec<(Transform, Option<Mask>)>,
}

impl SkiaPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw through a layer when a filter, a blur or an operator tiny-skia
    /// has no stage for is active, directly otherwise. `draw` receives the
    /// target pixmap, the blend mode to use and the clip mask to honour.
    fn composite<F>(
        &self,
        surface: &mut Surface,
        operator: CompositeOperator,
        blur: f32,
        filter: Option<&Filter>,
        draw: F,
    ) where
        F: FnOnce(&mut Pixmap, BlendMode, Option<&Mask>),
    {
        let filter = filter.filter(|f| !f.is_empty());
        let plus_darker = operator == CompositeOperator::PlusDarker;
        if blur <= 0.0 && filter.is_none() && !plus_darker {
            draw(surface.pixmap_mut(), operator.into(), self.clip.as_ref());
            return;
        }

        let Some(mut layer) = Pixmap::new(surface.width(), surface.height()) else {
            return;
        };
        draw(&mut layer, BlendMode::SourceOver, None);
        if blur > 0.0 {
            effects::gaussian_blur(&mut layer, blur / 2.0);
        }
        if let Some(filter) = filter {
            effects::apply_filter(&mut layer, filter);
        }
        if plus_darker {
            effects::plus_darker(surface.pixmap_mut(), &layer, self.clip.as_ref());
            return;
        }
        surface.pixmap_mut().draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode: operator.into(),
                quality: FilterQuality::Nearest,
            },
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    /// Device-space fill of an already built skia path.
    #[allow(clippy::too_many_arguments)]
    fn fill_skia_path(
        &self,
        surface: &mut Surface,
        path: &tiny_skia::Path,
        style: &PaintStyle,
        global_alpha: f32,
        operator: CompositeOperator,
        blur: f32,
        filter: Option<&Filter>,
        fill_rule: FillRule,
    ) {
        let (width, height) = (surface.width(), surface.height());
        let transform = self.transform;
        self.composite(surface, operator, blur, filter, |pixmap, blend_mode, mask| {
            with_paint(style, global_alpha, (width, height), |paint| {
                paint.blend_mode = blend_mode;
                pixmap.fill_path(path, paint, fill_rule, transform, mask);
            });
        });
    }
}

/// Build a paint for `style` and hand it to `f`. Styles that cannot paint
/// anything (empty gradients, untileable patterns) skip `f`.
fn with_paint<F>(style: &PaintStyle, global_alpha: f32, extent: (u32, u32), f: F)
where
    F: FnOnce(&mut Paint<'_>),
{
    match &style.style {
        FillStyle::Color(color) => {
            let mut color = *color;
            color.apply_opacity(global_alpha);
            let mut paint = Paint {
                anti_alias: true,
                ..Paint::default()
            };
            paint.set_color(color);
            f(&mut paint);
        }
        FillStyle::Gradient(gradient) => {
            let Some(shader) = gradient.to_shader(global_alpha, style.transform) else {
                return;
            };
            f(&mut Paint {
                shader,
                anti_alias: true,
                ..Paint::default()
            });
        }
        FillStyle::Pattern(pattern) => {
            let Some(tile) = pattern.tile(extent.0, extent.1) else {
                return;
            };
            f(&mut Paint {
                shader: tile.shader(pattern, style.transform, FilterQuality::Bilinear, global_alpha),
                anti_alias: true,
                ..Paint::default()
            });
        }
    }
}

impl Painter for SkiaPainter {
    fn fill_path(&mut self, surface: &mut Surface, path: &Path, params: &FillParams<'_>) {
        let Some(skia_path) = path.to_skia_path() else {
            return;
        };
        self.fill_skia_path(
            surface,
            &skia_path,
            params.style,
            params.global_alpha,
            params.operator,
            params.blur,
            params.filter,
            params.winding_rule.into(),
        );
    }

    fn stroke_path(&mut self, surface: &mut Surface, path: &Path, params: &StrokeParams<'_>) {
        // Stroke in user space so widths and dashes scale with the transform,
        // then fill the outline in device space.
        let Some(inverse) = params.transform.invert() else {
            return;
        };
        let Some(user_path) = path.transformed(&inverse).to_skia_path() else {
            return;
        };
        let resolution_scale = PathStroker::compute_resolution_scale(&params.transform);
        let Some(outline) = user_path
            .stroke(&params.stroke.to_skia(), resolution_scale)
            .and_then(|outline| outline.transform(params.transform))
        else {
            return;
        };
        self.fill_skia_path(
            surface,
            &outline,
            params.style,
            params.global_alpha,
            params.operator,
            params.blur,
            params.filter,
            FillRule::Winding,
        );
    }

    fn draw_bitmap(&mut self, surface: &mut Surface, params: &BitmapParams<'_>) {
        let source = params.source;
        let destination = params.destination;
        let Some(source_rect) =
            tiny_skia::IntRect::from_xywh(source.x, source.y, source.width as u32, source.height as u32)
        else {
            return;
        };
        let Some(cropped) = params.bitmap.pixmap().clone_rect(source_rect) else {
            return;
        };
        let Some(rect) =
            Rect::from_xywh(destination.x, destination.y, destination.width, destination.height)
        else {
            return;
        };

        let quality = match params.scaling {
            ScalingMode::NearestNeighbor => FilterQuality::Nearest,
            ScalingMode::Smooth => FilterQuality::Bilinear,
            ScalingMode::SmoothHigh => FilterQuality::Bicubic,
        };
        let image_to_user = Transform::from_row(
            destination.width / source.width as f32,
            0.0,
            0.0,
            destination.height / source.height as f32,
            destination.x,
            destination.y,
        );
        let transform = self.transform.pre_concat(params.transform);
        let path = PathBuilder::from_rect(rect);
        let global_alpha = params.global_alpha;

        self.composite(surface, params.operator, params.blur, params.filter, |pixmap, blend_mode, mask| {
            let paint = Paint {
                shader: tiny_skia::Pattern::new(
                    cropped.as_ref(),
                    SpreadMode::Pad,
                    quality,
                    global_alpha,
                    image_to_user,
                ),
                blend_mode,
                anti_alias: true,
                force_hq_pipeline: false,
            };
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, mask);
        });
    }

    fn clip(&mut self, surface: &Surface, path: &Path, winding_rule: WindingRule) {
        let fill_rule: FillRule = winding_rule.into();
        let skia_path = path.to_skia_path();
        match (&mut self.clip, skia_path) {
            (Some(mask), Some(skia_path)) => {
                mask.intersect_path(&skia_path, fill_rule, true, self.transform);
            }
            (Some(mask), None) => mask.data_mut().fill(0),
            (None, skia_path) => {
                let Some(mut mask) = Mask::new(surface.width(), surface.height()) else {
                    return;
                };
                if let Some(skia_path) = skia_path {
                    mask.fill_path(&skia_path, fill_rule, true, self.transform);
                }
                self.clip = Some(mask);
            }
        }
    }

    fn clear_rect(
        &mut self,
        surface: &mut Surface,
        rect: FloatRect,
        transform: Transform,
        color: Color,
    ) {
        let rect = rect.normalized();
        let Some(rect) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let mut paint = Paint {
            blend_mode: BlendMode::Source,
            anti_alias: true,
            ..Paint::default()
        };
        paint.set_color(color);
        surface.pixmap_mut().fill_rect(
            rect,
            &paint,
            self.transform.pre_concat(transform),
            self.clip.as_ref(),
        );
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.clip.clone()));
    }

    fn restore(&mut self) {
        if let Some((transform, clip)) = self.stack.pop() {
            self.transform = transform;
            self.clip = clip;
        }
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.clip = None;
        self.transform = Transform::identity();
    }
}
