//! Path geometry model shared by the current path, Path2D and the painters.
//!
//! A [`Path`] is an ordered list of subpaths, each holding its own segments and
//! a closed flag. Fill and clip never work on the caller's path directly: they
//! take a [`Path::closed_copy`] so that later edits to the original stay
//! well-defined.

use crate::geometry::{FloatPoint, FloatRect};
use kurbo::Shape;
use tiny_skia::Transform;

/// Tolerance used when flattening arcs into cubic beziers.
const ARC_TOLERANCE: f64 = 0.1;

/// Fill rule deciding which points are inside a self-intersecting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl WindingRule {
    /// Whether a signed winding number counts as inside.
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::NonZero => winding != 0,
            WindingRule::EvenOdd => winding % 2 != 0,
        }
    }
}

impl From<WindingRule> for tiny_skia::FillRule {
    fn from(rule: WindingRule) -> Self {
        match rule {
            WindingRule::NonZero => tiny_skia::FillRule::Winding,
            WindingRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// An elliptical arc stored in parametric form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub center: FloatPoint,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation of the ellipse axes, in radians.
    pub rotation: f32,
    pub start_angle: f32,
    /// Signed sweep in radians; negative sweeps run anticlockwise.
    pub sweep_angle: f32,
}

impl ArcSegment {
    /// Point on the ellipse at parametric angle `angle`.
    pub fn point_at(&self, angle: f32) -> FloatPoint {
        let (sin_rot, cos_rot) = self.rotation.sin_cos();
        let px = self.radius_x * angle.cos();
        let py = self.radius_y * angle.sin();
        FloatPoint::new(
            self.center.x + px * cos_rot - py * sin_rot,
            self.center.y + px * sin_rot + py * cos_rot,
        )
    }

    pub fn start_point(&self) -> FloatPoint {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> FloatPoint {
        self.point_at(self.start_angle + self.sweep_angle)
    }

    fn to_kurbo(self) -> kurbo::Arc {
        kurbo::Arc {
            center: kurbo::Point::new(self.center.x as f64, self.center.y as f64),
            radii: kurbo::Vec2::new(self.radius_x as f64, self.radius_y as f64),
            start_angle: self.start_angle as f64,
            sweep_angle: self.sweep_angle as f64,
            x_rotation: self.rotation as f64,
        }
    }

    /// Cubic bezier approximation as `(ctrl1, ctrl2, end)` triples.
    pub fn to_cubics(&self) -> Vec<(FloatPoint, FloatPoint, FloatPoint)> {
        let mut cubics = Vec::new();
        for el in self.to_kurbo().append_iter(ARC_TOLERANCE) {
            if let kurbo::PathEl::CurveTo(p1, p2, p3) = el {
                cubics.push((from_kurbo(p1), from_kurbo(p2), from_kurbo(p3)));
            }
        }
        cubics
    }
}

/// One geometric segment of a subpath. The segment's start is the end of the
/// previous segment (or the subpath start).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    LineTo(FloatPoint),
    QuadTo(FloatPoint, FloatPoint),
    CubicTo(FloatPoint, FloatPoint, FloatPoint),
    Arc(ArcSegment),
}

impl Segment {
    pub fn end_point(&self) -> FloatPoint {
        match self {
            Segment::LineTo(p) => *p,
            Segment::QuadTo(_, p) => *p,
            Segment::CubicTo(_, _, p) => *p,
            Segment::Arc(arc) => arc.end_point(),
        }
    }
}

/// A run of connected segments starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub start: FloatPoint,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Subpath {
    fn new(start: FloatPoint) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Last point of the subpath, which is the start again once closed.
    pub fn end_point(&self) -> FloatPoint {
        if self.closed {
            return self.start;
        }
        self.segments
            .last()
            .map(Segment::end_point)
            .unwrap_or(self.start)
    }
}

/// Ordered sequence of subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// True when the path has no segments at all (lone move-tos are ignored).
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.segments.is_empty())
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    /// The point the next segment would start from, if any.
    pub fn current_point(&self) -> Option<FloatPoint> {
        self.subpaths.last().map(Subpath::end_point)
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: FloatPoint) {
        match self.subpaths.last_mut() {
            Some(last) if last.segments.is_empty() && !last.closed => last.start = p,
            _ => self.subpaths.push(Subpath::new(p)),
        }
    }

    /// Make sure there is an open subpath to append to. After a close the new
    /// subpath starts where the closed one started; with no subpath at all it
    /// starts at `fallback`.
    fn open_subpath(&mut self, fallback: FloatPoint) -> &mut Subpath {
        let start = match self.subpaths.last() {
            Some(last) if !last.closed => None,
            Some(last) => Some(last.start),
            None => Some(fallback),
        };
        if let Some(start) = start {
            self.subpaths.push(Subpath::new(start));
        }
        let idx = self.subpaths.len() - 1;
        &mut self.subpaths[idx]
    }

    pub fn line_to(&mut self, p: FloatPoint) {
        if self.subpaths.is_empty() {
            self.move_to(p);
            return;
        }
        self.open_subpath(p).segments.push(Segment::LineTo(p));
    }

    pub fn quad_to(&mut self, ctrl: FloatPoint, end: FloatPoint) {
        self.open_subpath(ctrl)
            .segments
            .push(Segment::QuadTo(ctrl, end));
    }

    pub fn cubic_to(&mut self, ctrl1: FloatPoint, ctrl2: FloatPoint, end: FloatPoint) {
        self.open_subpath(ctrl1)
            .segments
            .push(Segment::CubicTo(ctrl1, ctrl2, end));
    }

    /// Append an arc, connecting it to the current point with a straight line
    /// (or starting a new subpath at the arc start when there is none).
    pub fn arc(&mut self, arc: ArcSegment) {
        let start = arc.start_point();
        if self.current_point().is_some() {
            self.line_to(start);
        } else {
            self.move_to(start);
        }
        self.open_subpath(start).segments.push(Segment::Arc(arc));
    }

    /// Close the last subpath.
    pub fn close(&mut self) {
        if let Some(last) = self.subpaths.last_mut() {
            last.closed = true;
        }
    }

    /// Mark every subpath closed.
    pub fn close_all_subpaths(&mut self) {
        for subpath in &mut self.subpaths {
            subpath.closed = true;
        }
    }

    /// An independent copy with every subpath closed.
    pub fn closed_copy(&self) -> Path {
        let mut copy = self.clone();
        copy.close_all_subpaths();
        copy
    }

    /// Append all subpaths of `other`.
    pub fn append(&mut self, other: &Path) {
        self.subpaths.extend(other.subpaths.iter().cloned());
    }

    /// A copy with every point mapped through `t`. Arcs are converted to
    /// cubics unless `t` is the identity.
    pub fn transformed(&self, t: &Transform) -> Path {
        if t.is_identity() {
            return self.clone();
        }
        let map = |p: FloatPoint| p.transformed(t);
        let subpaths = self
            .subpaths
            .iter()
            .map(|subpath| {
                let mut segments = Vec::with_capacity(subpath.segments.len());
                for segment in &subpath.segments {
                    match segment {
                        Segment::LineTo(p) => segments.push(Segment::LineTo(map(*p))),
                        Segment::QuadTo(c, p) => segments.push(Segment::QuadTo(map(*c), map(*p))),
                        Segment::CubicTo(c1, c2, p) => {
                            segments.push(Segment::CubicTo(map(*c1), map(*c2), map(*p)))
                        }
                        Segment::Arc(arc) => {
                            for (c1, c2, p) in arc.to_cubics() {
                                segments.push(Segment::CubicTo(map(c1), map(c2), map(p)));
                            }
                        }
                    }
                }
                Subpath {
                    start: map(subpath.start),
                    segments,
                    closed: subpath.closed,
                }
            })
            .collect();
        Path { subpaths }
    }

    /// Tight bounding box of the geometry. Empty for an empty path.
    pub fn bounding_box(&self) -> FloatRect {
        if self.is_empty() {
            return FloatRect::default();
        }
        let rect = self.to_bez_path().bounding_box();
        FloatRect::new(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    /// Hit test against the closed form of the path.
    pub fn contains(&self, point: FloatPoint, rule: WindingRule) -> bool {
        if !point.is_finite() || self.is_empty() {
            return false;
        }
        let closed = self.closed_copy().to_bez_path();
        let winding = closed.winding(kurbo::Point::new(point.x as f64, point.y as f64));
        rule.is_inside(winding)
    }

    pub(crate) fn to_bez_path(&self) -> kurbo::BezPath {
        let mut bez = kurbo::BezPath::new();
        for subpath in &self.subpaths {
            bez.move_to(to_kurbo(subpath.start));
            for segment in &subpath.segments {
                match segment {
                    Segment::LineTo(p) => bez.line_to(to_kurbo(*p)),
                    Segment::QuadTo(c, p) => bez.quad_to(to_kurbo(*c), to_kurbo(*p)),
                    Segment::CubicTo(c1, c2, p) => {
                        bez.curve_to(to_kurbo(*c1), to_kurbo(*c2), to_kurbo(*p))
                    }
                    Segment::Arc(arc) => {
                        for el in arc.to_kurbo().append_iter(ARC_TOLERANCE) {
                            bez.push(el);
                        }
                    }
                }
            }
            if subpath.closed {
                bez.close_path();
            }
        }
        bez
    }

    /// Convert to a tiny-skia path. Returns None when there is nothing to draw.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for subpath in &self.subpaths {
            if subpath.segments.is_empty() {
                continue;
            }
            pb.move_to(subpath.start.x, subpath.start.y);
            for segment in &subpath.segments {
                match segment {
                    Segment::LineTo(p) => pb.line_to(p.x, p.y),
                    Segment::QuadTo(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
                    Segment::CubicTo(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                    Segment::Arc(arc) => {
                        for (c1, c2, p) in arc.to_cubics() {
                            pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                        }
                    }
                }
            }
            if subpath.closed {
                pb.close();
            }
        }
        pb.finish()
    }
}

fn to_kurbo(p: FloatPoint) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

fn from_kurbo(p: kurbo::Point) -> FloatPoint {
    FloatPoint::new(p.x as f32, p.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn pt(x: f32, y: f32) -> FloatPoint {
        FloatPoint::new(x, y)
    }

    fn square(path: &mut Path, x: f32, y: f32, size: f32) {
        path.move_to(pt(x, y));
        path.line_to(pt(x + size, y));
        path.line_to(pt(x + size, y + size));
        path.line_to(pt(x, y + size));
        path.close();
    }

    #[test]
    fn test_consecutive_move_to_replaces_start() {
        let mut path = Path::new();
        path.move_to(pt(1.0, 1.0));
        path.move_to(pt(5.0, 5.0));
        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].start, pt(5.0, 5.0));
    }

    #[test]
    fn test_line_to_without_subpath_moves() {
        let mut path = Path::new();
        path.line_to(pt(3.0, 4.0));
        assert_eq!(path.subpaths().len(), 1);
        assert!(path.is_empty());
        assert_eq!(path.current_point(), Some(pt(3.0, 4.0)));
    }

    #[test]
    fn test_line_after_close_starts_at_previous_start() {
        let mut path = Path::new();
        path.move_to(pt(10.0, 10.0));
        path.line_to(pt(20.0, 10.0));
        path.close();
        path.line_to(pt(20.0, 20.0));
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].start, pt(10.0, 10.0));
    }

    #[test]
    fn test_closed_copy_leaves_original_open() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(10.0, 0.0));
        path.line_to(pt(10.0, 10.0));
        let closed = path.closed_copy();
        assert!(closed.subpaths().iter().all(|s| s.closed));
        assert!(!path.subpaths()[0].closed);

        // Further edits to the original continue the open subpath.
        path.line_to(pt(0.0, 10.0));
        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].segments.len(), 3);
    }

    #[test]
    fn test_bounding_box_of_lines() {
        let mut path = Path::new();
        square(&mut path, 10.0, 20.0, 30.0);
        assert_eq!(path.bounding_box(), FloatRect::new(10.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn test_bounding_box_of_empty_path() {
        let mut path = Path::new();
        path.move_to(pt(4.0, 4.0));
        assert!(path.bounding_box().is_empty());
    }

    #[test]
    fn test_bounding_box_of_full_circle() {
        let mut path = Path::new();
        path.arc(ArcSegment {
            center: pt(50.0, 50.0),
            radius_x: 10.0,
            radius_y: 10.0,
            rotation: 0.0,
            start_angle: 0.0,
            sweep_angle: 2.0 * PI,
        });
        let bbox = path.bounding_box();
        assert!((bbox.x - 40.0).abs() < 0.2);
        assert!((bbox.width - 20.0).abs() < 0.2);
    }

    #[rstest]
    #[case(pt(15.0, 15.0), WindingRule::NonZero, true)]
    #[case(pt(15.0, 15.0), WindingRule::EvenOdd, true)]
    #[case(pt(25.0, 25.0), WindingRule::NonZero, true)]
    #[case(pt(25.0, 25.0), WindingRule::EvenOdd, false)]
    #[case(pt(50.0, 50.0), WindingRule::NonZero, false)]
    fn test_contains_nested_squares(
        #[case] point: FloatPoint,
        #[case] rule: WindingRule,
        #[case] expected: bool,
    ) {
        let mut path = Path::new();
        square(&mut path, 10.0, 10.0, 30.0);
        square(&mut path, 20.0, 20.0, 10.0);
        assert_eq!(path.contains(point, rule), expected);
    }

    #[test]
    fn test_contains_uses_implicit_close() {
        // An open triangle is hit-tested as if closed.
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(100.0, 0.0));
        path.line_to(pt(0.0, 100.0));
        assert!(path.contains(pt(10.0, 10.0), WindingRule::NonZero));
        assert!(!path.subpaths()[0].closed);
    }

    #[test]
    fn test_contains_rejects_non_finite_point() {
        let mut path = Path::new();
        square(&mut path, 0.0, 0.0, 10.0);
        assert!(!path.contains(pt(f32::NAN, 1.0), WindingRule::NonZero));
    }

    #[test]
    fn test_transformed_maps_points() {
        let mut path = Path::new();
        square(&mut path, 0.0, 0.0, 10.0);
        let moved = path.transformed(&Transform::from_translate(5.0, 7.0));
        assert_eq!(moved.subpaths()[0].start, pt(5.0, 7.0));
        assert_eq!(moved.bounding_box(), FloatRect::new(5.0, 7.0, 10.0, 10.0));
    }

    #[test]
    fn test_transformed_flattens_arcs() {
        let mut path = Path::new();
        path.arc(ArcSegment {
            center: pt(0.0, 0.0),
            radius_x: 10.0,
            radius_y: 10.0,
            rotation: 0.0,
            start_angle: 0.0,
            sweep_angle: PI,
        });
        let scaled = path.transformed(&Transform::from_scale(2.0, 1.0));
        let segments = &scaled.subpaths()[0].segments;
        assert!(!segments.is_empty());
        assert!(segments
            .iter()
            .all(|s| matches!(s, Segment::CubicTo(..))));
        let end = segments.last().map(Segment::end_point).unwrap_or_default();
        assert!((end.x + 20.0).abs() < 0.01);
    }

    #[test]
    fn test_arc_connects_with_line_when_current_point_exists() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.arc(ArcSegment {
            center: pt(50.0, 0.0),
            radius_x: 10.0,
            radius_y: 10.0,
            rotation: 0.0,
            start_angle: 0.0,
            sweep_angle: PI,
        });
        let segments = &path.subpaths()[0].segments;
        assert_eq!(segments[0], Segment::LineTo(pt(60.0, 0.0)));
        assert!(matches!(segments[1], Segment::Arc(_)));
    }

    #[test]
    fn test_to_skia_path_skips_lone_moves() {
        let mut path = Path::new();
        path.move_to(pt(1.0, 1.0));
        assert!(path.to_skia_path().is_none());
        path.line_to(pt(5.0, 5.0));
        assert!(path.to_skia_path().is_some());
    }
}
