//! DOMMatrix type for 2D transformation matrices.

/// DOMMatrix represents a 2D transformation matrix.
///
/// The matrix is represented as:
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DOMMatrix {
    /// Scale X component.
    pub a: f32,
    /// Skew Y component.
    pub b: f32,
    /// Skew X component.
    pub c: f32,
    /// Scale Y component.
    pub d: f32,
    /// Translate X component.
    pub e: f32,
    /// Translate Y component.
    pub f: f32,
}

impl Default for DOMMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl DOMMatrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }

    /// `self * other`: `other` is applied first.
    pub fn multiply(&self, other: &DOMMatrix) -> DOMMatrix {
        let lhs: tiny_skia::Transform = (*self).into();
        lhs.pre_concat((*other).into()).into()
    }

    /// The inverse, or None for a singular matrix.
    pub fn inverse(&self) -> Option<DOMMatrix> {
        let t: tiny_skia::Transform = (*self).into();
        t.invert().map(Into::into)
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

impl From<tiny_skia::Transform> for DOMMatrix {
    fn from(t: tiny_skia::Transform) -> Self {
        DOMMatrix {
            a: t.sx,
            b: t.ky,
            c: t.kx,
            d: t.sy,
            e: t.tx,
            f: t.ty,
        }
    }
}

impl From<DOMMatrix> for tiny_skia::Transform {
    fn from(m: DOMMatrix) -> Self {
        tiny_skia::Transform::from_row(m.a, m.b, m.c, m.d, m.e, m.f)
    }
}
