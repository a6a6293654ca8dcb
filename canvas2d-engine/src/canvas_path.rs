//! Path building shared by the context's current path and [`Path2D`].
//!
//! Points are mapped by [`CanvasPath::path_transform`] as they are added, so
//! the context's current path is kept in device space while a `Path2D` stays
//! in its own user space. Non-finite arguments are ignored.
//!
//! [`Path2D`]: crate::Path2D

use crate::arc::{self, append_arc};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{
    ArcParams, ArcToParams, CornerRadius, CubicBezierParams, EllipseParams, FloatPoint,
    QuadraticBezierParams, RectParams, RoundRectParams,
};
use crate::path::{ArcSegment, Path};
use std::f32::consts::{FRAC_PI_2, PI};
use tiny_skia::Transform;

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// The path building methods of the canvas API.
pub trait CanvasPath {
    fn path(&self) -> &Path;

    fn path_mut(&mut self) -> &mut Path;

    /// Maps builder arguments into the stored path's space.
    fn path_transform(&self) -> Transform;

    fn move_to(&mut self, x: f32, y: f32) {
        if !all_finite(&[x, y]) {
            return;
        }
        let t = self.path_transform();
        self.path_mut().move_to(FloatPoint::new(x, y).transformed(&t));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if !all_finite(&[x, y]) {
            return;
        }
        let t = self.path_transform();
        self.path_mut().line_to(FloatPoint::new(x, y).transformed(&t));
    }

    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        if !all_finite(&[params.cpx, params.cpy, params.x, params.y]) {
            return;
        }
        let t = self.path_transform();
        self.path_mut().quad_to(
            FloatPoint::new(params.cpx, params.cpy).transformed(&t),
            FloatPoint::new(params.x, params.y).transformed(&t),
        );
    }

    fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        let values = [
            params.cp1x,
            params.cp1y,
            params.cp2x,
            params.cp2y,
            params.x,
            params.y,
        ];
        if !all_finite(&values) {
            return;
        }
        let t = self.path_transform();
        self.path_mut().cubic_to(
            FloatPoint::new(params.cp1x, params.cp1y).transformed(&t),
            FloatPoint::new(params.cp2x, params.cp2y).transformed(&t),
            FloatPoint::new(params.x, params.y).transformed(&t),
        );
    }

    fn close_path(&mut self) {
        self.path_mut().close();
    }

    /// Closed four-point subpath, then a new subpath at the origin corner.
    fn rect(&mut self, params: &RectParams) {
        let RectParams {
            x,
            y,
            width,
            height,
        } = *params;
        if !all_finite(&[x, y, width, height]) {
            return;
        }
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
        self.move_to(x, y);
    }

    /// Rounded rectangle with per-corner elliptical radii.
    ///
    /// Negative radii are an `InvalidArgument` error. Radii that do not fit
    /// are scaled down uniformly.
    fn round_rect(&mut self, params: &RoundRectParams) -> Canvas2dResult<()> {
        let RoundRectParams {
            x,
            y,
            width,
            height,
            radii,
        } = *params;
        if !all_finite(&[x, y, width, height]) {
            return Ok(());
        }
        if radii.iter().any(|r| !all_finite(&[r.x, r.y])) {
            return Ok(());
        }
        if radii.iter().any(|r| r.x < 0.0 || r.y < 0.0) {
            return Err(Canvas2dError::InvalidArgument(
                "roundRect radii must not be negative".to_string(),
            ));
        }

        let [mut upper_left, mut upper_right, mut lower_right, mut lower_left] = radii;
        let (mut x, mut y, mut width, mut height) = (x, y, width, height);
        if width < 0.0 {
            x += width;
            width = -width;
            std::mem::swap(&mut upper_left, &mut upper_right);
            std::mem::swap(&mut lower_left, &mut lower_right);
        }
        if height < 0.0 {
            y += height;
            height = -height;
            std::mem::swap(&mut upper_left, &mut lower_left);
            std::mem::swap(&mut upper_right, &mut lower_right);
        }

        let top = upper_left.x + upper_right.x;
        let right = upper_right.y + lower_right.y;
        let bottom = lower_right.x + lower_left.x;
        let left = upper_left.y + lower_left.y;
        let fit = |side: f32, sum: f32| if sum > 0.0 { side / sum } else { f32::INFINITY };
        let scale = fit(width, top)
            .min(fit(height, right))
            .min(fit(width, bottom))
            .min(fit(height, left));
        if scale < 1.0 {
            for r in [
                &mut upper_left,
                &mut upper_right,
                &mut lower_right,
                &mut lower_left,
            ] {
                r.x *= scale;
                r.y *= scale;
            }
        }

        let t = self.path_transform();
        let corner = |path: &mut Path, center: FloatPoint, r: CornerRadius, start: f32| {
            if r.x > 0.0 && r.y > 0.0 {
                append_arc(
                    path,
                    ArcSegment {
                        center,
                        radius_x: r.x,
                        radius_y: r.y,
                        rotation: 0.0,
                        start_angle: start,
                        sweep_angle: FRAC_PI_2,
                    },
                    &t,
                );
            }
        };

        self.move_to(x + upper_left.x, y);
        self.line_to(x + width - upper_right.x, y);
        corner(
            self.path_mut(),
            FloatPoint::new(x + width - upper_right.x, y + upper_right.y),
            upper_right,
            -FRAC_PI_2,
        );
        self.line_to(x + width, y + height - lower_right.y);
        corner(
            self.path_mut(),
            FloatPoint::new(x + width - lower_right.x, y + height - lower_right.y),
            lower_right,
            0.0,
        );
        self.line_to(x + lower_left.x, y + height);
        corner(
            self.path_mut(),
            FloatPoint::new(x + lower_left.x, y + height - lower_left.y),
            lower_left,
            FRAC_PI_2,
        );
        self.line_to(x, y + upper_left.y);
        corner(
            self.path_mut(),
            FloatPoint::new(x + upper_left.x, y + upper_left.y),
            upper_left,
            PI,
        );
        self.close_path();
        self.move_to(x, y);
        Ok(())
    }

    /// Circular arc; a negative radius is an `IndexSize` error.
    fn arc(&mut self, params: &ArcParams) -> Canvas2dResult<()> {
        self.ellipse(&EllipseParams::from(params))
    }

    fn ellipse(&mut self, params: &EllipseParams) -> Canvas2dResult<()> {
        let t = self.path_transform();
        arc::ellipse(self.path_mut(), params, &t)
    }

    fn arc_to(&mut self, params: &ArcToParams) -> Canvas2dResult<()> {
        let t = self.path_transform();
        // The corner is computed in user space
        let current = match self.path().current_point() {
            Some(point) => match t.invert() {
                Some(inverse) => Some(point.transformed(&inverse)),
                None => return Ok(()),
            },
            None => None,
        };
        arc::arc_to(self.path_mut(), current, params, &t)
    }
}
