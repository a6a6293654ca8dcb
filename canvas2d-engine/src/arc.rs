//! Arc, ellipse and arcTo construction on top of [`Path`].
//!
//! Angles follow the canvas conventions: the sweep is clamped to a full turn
//! once the requested span reaches 2π, otherwise it is the span reduced modulo
//! 2π in the requested direction.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{ArcToParams, EllipseParams, FloatPoint};
use crate::path::{ArcSegment, Path};
use std::f32::consts::TAU;
use tiny_skia::Transform;

/// Signed sweep from `start` to `end`.
pub(crate) fn sweep_angle(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if !anticlockwise && end - start >= TAU {
        TAU
    } else if anticlockwise && start - end >= TAU {
        -TAU
    } else if anticlockwise {
        -(start - end).rem_euclid(TAU)
    } else {
        (end - start).rem_euclid(TAU)
    }
}

/// Append an elliptical arc. Points are mapped through `transform` before
/// they land in `path`.
///
/// Returns `IndexSize` for negative radii; non-finite arguments are ignored.
pub fn ellipse(path: &mut Path, params: &EllipseParams, transform: &Transform) -> Canvas2dResult<()> {
    let values = [
        params.x,
        params.y,
        params.radius_x,
        params.radius_y,
        params.rotation,
        params.start_angle,
        params.end_angle,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Ok(());
    }
    if params.radius_x < 0.0 || params.radius_y < 0.0 {
        return Err(Canvas2dError::IndexSize(format!(
            "negative radius ({}, {})",
            params.radius_x, params.radius_y
        )));
    }

    let arc = ArcSegment {
        center: FloatPoint::new(params.x, params.y),
        radius_x: params.radius_x,
        radius_y: params.radius_y,
        rotation: params.rotation,
        start_angle: params.start_angle,
        sweep_angle: sweep_angle(params.start_angle, params.end_angle, params.anticlockwise),
    };
    append_arc(path, arc, transform);
    Ok(())
}

/// Append `arc`, keeping it as an arc segment when no transform applies.
pub(crate) fn append_arc(path: &mut Path, arc: ArcSegment, transform: &Transform) {
    if transform.is_identity() {
        path.arc(arc);
        return;
    }

    let start = arc.start_point().transformed(transform);
    if path.current_point().is_some() {
        path.line_to(start);
    } else {
        path.move_to(start);
    }
    for (c1, c2, end) in arc.to_cubics() {
        path.cubic_to(
            c1.transformed(transform),
            c2.transformed(transform),
            end.transformed(transform),
        );
    }
}

/// Append an arcTo corner.
///
/// `current` is the path's current point in the same space as `params` (user
/// space); `transform` maps user space into the path's space.
pub fn arc_to(
    path: &mut Path,
    current: Option<FloatPoint>,
    params: &ArcToParams,
    transform: &Transform,
) -> Canvas2dResult<()> {
    let values = [params.x1, params.y1, params.x2, params.y2, params.radius];
    if values.iter().any(|v| !v.is_finite()) {
        return Ok(());
    }
    if params.radius < 0.0 {
        return Err(Canvas2dError::IndexSize(format!(
            "negative radius {}",
            params.radius
        )));
    }

    let p1 = FloatPoint::new(params.x1, params.y1);
    let p2 = FloatPoint::new(params.x2, params.y2);
    let Some(p0) = current else {
        path.move_to(p1.transformed(transform));
        return Ok(());
    };

    // Vectors from the corner to the adjacent points
    let v1x = p0.x - p1.x;
    let v1y = p0.y - p1.y;
    let v2x = p2.x - p1.x;
    let v2y = p2.y - p1.y;
    let len1 = (v1x * v1x + v1y * v1y).sqrt();
    let len2 = (v2x * v2x + v2y * v2y).sqrt();

    if params.radius == 0.0 || len1 < 1e-6 || len2 < 1e-6 {
        path.line_to(p1.transformed(transform));
        return Ok(());
    }

    let (v1x, v1y) = (v1x / len1, v1y / len1);
    let (v2x, v2y) = (v2x / len2, v2y / len2);

    let cross = v1x * v2y - v1y * v2x;
    let dot = v1x * v2x + v1y * v2y;
    let angle = cross.atan2(dot);

    // Collinear points
    if angle.abs() < 1e-6 || (angle.abs() - std::f32::consts::PI).abs() < 1e-6 {
        path.line_to(p1.transformed(transform));
        return Ok(());
    }

    // Tangent points
    let tan_half = (angle / 2.0).tan().abs();
    let seg_len = params.radius / tan_half;
    let start = FloatPoint::new(p1.x + v1x * seg_len, p1.y + v1y * seg_len);
    let end = FloatPoint::new(p1.x + v2x * seg_len, p1.y + v2y * seg_len);

    let sign = if cross < 0.0 { -1.0 } else { 1.0 };
    let center = FloatPoint::new(
        start.x - v1y * sign * params.radius,
        start.y + v1x * sign * params.radius,
    );

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);

    path.line_to(start.transformed(transform));
    append_arc(
        path,
        ArcSegment {
            center,
            radius_x: params.radius,
            radius_y: params.radius,
            rotation: 0.0,
            start_angle,
            sweep_angle: sweep_angle(start_angle, end_angle, cross > 0.0),
        },
        transform,
    );
    Ok(())
}
