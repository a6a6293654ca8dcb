//! Rectangles, points and parameter structs for Canvas 2D drawing operations.
//!
//! The parameter structs replace long positional argument lists with named fields,
//! grouping semantically related parameters together.

/// A point in floating-point device or user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatPoint {
    pub x: f32,
    pub y: f32,
}

impl FloatPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Map the point through an affine transform.
    pub fn transformed(self, t: &tiny_skia::Transform) -> Self {
        Self {
            x: t.sx * self.x + t.kx * self.y + t.tx,
            y: t.ky * self.x + t.sy * self.y + t.ty,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle with floating-point origin and size.
///
/// Width and height may be negative when built from raw API arguments;
/// [`FloatRect::normalized`] flips them into positive extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both points.
    pub fn from_points(a: FloatPoint, b: FloatPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, a.x.max(b.x) - x, a.y.max(b.y) - y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Flip negative extents so that width and height are non-negative.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    /// Intersection of two normalized rectangles. Disjoint rectangles yield an
    /// empty rectangle at the origin.
    pub fn intersected(&self, other: &FloatRect) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return Self::default();
        }
        Self::new(left, top, right - left, bottom - top)
    }

    /// Smallest rectangle containing both; empty rectangles are ignored.
    pub fn united(&self, other: &FloatRect) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn inflated(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Round each edge to the nearest integer.
    pub fn to_rounded(&self) -> IntRect {
        let left = self.x.round() as i32;
        let top = self.y.round() as i32;
        IntRect::new(
            left,
            top,
            self.right().round() as i32 - left,
            self.bottom().round() as i32 - top,
        )
    }

    /// Bounding box of the rectangle after mapping its corners through `t`.
    pub fn transformed_bounds(&self, t: &tiny_skia::Transform) -> Self {
        let corners = [
            FloatPoint::new(self.x, self.y),
            FloatPoint::new(self.right(), self.y),
            FloatPoint::new(self.right(), self.bottom()),
            FloatPoint::new(self.x, self.bottom()),
        ]
        .map(|p| p.transformed(t));
        corners[1..].iter().fold(
            FloatRect::new(corners[0].x, corners[0].y, 0.0, 0.0),
            |acc, p| acc.including(*p),
        )
    }

    /// Grow the rectangle to include `p`.
    pub(crate) fn including(self, p: FloatPoint) -> Self {
        let left = self.x.min(p.x);
        let top = self.y.min(p.y);
        let right = self.right().max(p.x);
        let bottom = self.bottom().max(p.y);
        Self::new(left, top, right - left, bottom - top)
    }
}

/// An axis-aligned rectangle in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Intersection of two rectangles; disjoint rectangles yield an empty one.
    pub fn intersected(&self, other: &IntRect) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left >= right || top >= bottom {
            return Self::default();
        }
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn to_float(&self) -> FloatRect {
        FloatRect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

/// Parameters for a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// X coordinate of the arc center.
    pub x: f32,
    /// Y coordinate of the arc center.
    pub y: f32,
    /// Radius of the arc.
    pub radius: f32,
    /// Starting angle in radians.
    pub start_angle: f32,
    /// Ending angle in radians.
    pub end_angle: f32,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

/// Parameters for an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    /// X coordinate of the ellipse center.
    pub x: f32,
    /// Y coordinate of the ellipse center.
    pub y: f32,
    /// X-axis radius of the ellipse.
    pub radius_x: f32,
    /// Y-axis radius of the ellipse.
    pub radius_y: f32,
    /// Rotation of the ellipse in radians.
    pub rotation: f32,
    /// Starting angle in radians.
    pub start_angle: f32,
    /// Ending angle in radians.
    pub end_angle: f32,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

impl From<&ArcParams> for EllipseParams {
    fn from(arc: &ArcParams) -> Self {
        Self {
            x: arc.x,
            y: arc.y,
            radius_x: arc.radius,
            radius_y: arc.radius,
            rotation: 0.0,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
            anticlockwise: arc.anticlockwise,
        }
    }
}

/// Parameters for an arcTo operation.
///
/// The arc is drawn from the current point through a tangent defined by
/// two control points with a given radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcToParams {
    /// First control point X.
    pub x1: f32,
    /// First control point Y.
    pub y1: f32,
    /// Second control point X.
    pub x2: f32,
    /// Second control point Y.
    pub y2: f32,
    /// Arc radius.
    pub radius: f32,
}

/// Parameters for a cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierParams {
    /// First control point X.
    pub cp1x: f32,
    /// First control point Y.
    pub cp1y: f32,
    /// Second control point X.
    pub cp2x: f32,
    /// Second control point Y.
    pub cp2y: f32,
    /// End point X.
    pub x: f32,
    /// End point Y.
    pub y: f32,
}

/// Source and destination rectangles for the nine-argument drawImage form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCropParams {
    /// Source rectangle X.
    pub sx: f32,
    /// Source rectangle Y.
    pub sy: f32,
    /// Source rectangle width.
    pub sw: f32,
    /// Source rectangle height.
    pub sh: f32,
    /// Destination rectangle X.
    pub dx: f32,
    /// Destination rectangle Y.
    pub dy: f32,
    /// Destination rectangle width.
    pub dw: f32,
    /// Destination rectangle height.
    pub dh: f32,
}

/// A dirty rectangle for partial image data writes, relative to the image data.
///
/// Negative sizes are allowed and grow the rectangle left or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    /// X offset into the source data.
    pub x: i32,
    /// Y offset into the source data.
    pub y: i32,
    /// Width of region to copy.
    pub width: i32,
    /// Height of region to copy.
    pub height: i32,
}

/// Parameters for a quadratic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezierParams {
    /// Control point X.
    pub cpx: f32,
    /// Control point Y.
    pub cpy: f32,
    /// End point X.
    pub x: f32,
    /// End point Y.
    pub y: f32,
}

/// Parameters for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    /// X coordinate of the rectangle origin.
    pub x: f32,
    /// Y coordinate of the rectangle origin.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

/// Parameters for a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRectParams {
    /// X coordinate of the rectangle origin.
    pub x: f32,
    /// Y coordinate of the rectangle origin.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
    /// Corner radii in order: [top-left, top-right, bottom-right, bottom-left].
    /// Each corner has independent x (horizontal) and y (vertical) radii.
    pub radii: [CornerRadius; 4],
}

/// An independent x/y corner radius for rounded rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadius {
    pub x: f32,
    pub y: f32,
}

impl CornerRadius {
    /// Create a corner radius with equal x and y values.
    pub const fn uniform(r: f32) -> Self {
        Self { x: r, y: r }
    }
}

/// Parameters for creating a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientParams {
    /// Inner circle center X.
    pub x0: f32,
    /// Inner circle center Y.
    pub y0: f32,
    /// Inner circle radius.
    pub r0: f32,
    /// Outer circle center X.
    pub x1: f32,
    /// Outer circle center Y.
    pub y1: f32,
    /// Outer circle radius.
    pub r1: f32,
}
