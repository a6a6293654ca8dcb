//! Gradient types for Canvas 2D operations.

use crate::css::parse_color;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::RadialGradientParams;

/// A color stop in a gradient.
#[derive(Debug, Clone)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: tiny_skia::Color,
}

/// Canvas gradient (linear or radial).
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    /// Gradient type and geometry.
    pub gradient_type: GradientType,
    /// Color stops.
    pub stops: Vec<GradientStop>,
}

/// Type of gradient.
#[derive(Debug, Clone)]
pub enum GradientType {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// Radial gradient from inner circle to outer circle.
    Radial(RadialGradientParams),
}

impl CanvasGradient {
    /// Create a new linear gradient.
    pub fn new_linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            gradient_type: GradientType::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    /// Create a new radial gradient. Negative radii are an index size error.
    pub fn new_radial(params: &RadialGradientParams) -> Canvas2dResult<Self> {
        if params.r0 < 0.0 || params.r1 < 0.0 {
            return Err(Canvas2dError::IndexSize(format!(
                "negative gradient radius ({}, {})",
                params.r0, params.r1
            )));
        }
        Ok(Self {
            gradient_type: GradientType::Radial(*params),
            stops: Vec::new(),
        })
    }

    /// Add a color stop from a CSS color string.
    ///
    /// Offsets outside `[0, 1]` are an index size error.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Canvas2dResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::IndexSize(format!(
                "gradient stop offset {} outside [0, 1]",
                offset
            )));
        }
        let color = parse_color(color)
            .ok_or_else(|| Canvas2dError::ColorParseError(color.to_string()))?;
        self.stops.push(GradientStop { offset, color });
        // Stable sort keeps insertion order for equal offsets
        self.stops.sort_by(|a, b| {
            a.offset
                .partial_cmp(&b.offset)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }

    /// Build a tiny-skia shader with `global_alpha` folded into each stop.
    ///
    /// Returns None for a gradient without stops (which paints nothing).
    pub(crate) fn to_shader(
        &self,
        global_alpha: f32,
        transform: tiny_skia::Transform,
    ) -> Option<tiny_skia::Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }

        let stops: Vec<tiny_skia::GradientStop> = self
            .stops
            .iter()
            .map(|stop| {
                let mut color = stop.color;
                if global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * global_alpha).clamp(0.0, 1.0));
                }
                tiny_skia::GradientStop::new(stop.offset as f32, color)
            })
            .collect();

        match &self.gradient_type {
            GradientType::Linear { x0, y0, x1, y1 } => tiny_skia::LinearGradient::new(
                tiny_skia::Point { x: *x0, y: *y0 },
                tiny_skia::Point { x: *x1, y: *y1 },
                stops,
                tiny_skia::SpreadMode::Pad,
                transform,
            ),
            GradientType::Radial(params) => tiny_skia::RadialGradient::new(
                tiny_skia::Point {
                    x: params.x0,
                    y: params.y0,
                },
                tiny_skia::Point {
                    x: params.x1,
                    y: params.y1,
                },
                params.r1,
                stops,
                tiny_skia::SpreadMode::Pad,
                transform,
            ),
        }
    }
}
