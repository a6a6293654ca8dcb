//! Path2D implementation for reusable path objects.
//!
//! A Path2D keeps its geometry in its own user space. The context maps it
//! through the current transformation when it is filled, stroked, clipped or
//! hit tested.

use crate::canvas_path::CanvasPath;
use crate::dom_matrix::DOMMatrix;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{CubicBezierParams, QuadraticBezierParams};
use crate::path::Path;
use tiny_skia::Transform;

/// A reusable path object that can be used with fill, stroke, and clip operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path2D {
    path: Path,
}

impl Path2D {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a copy of another Path2D.
    pub fn from_path(other: &Path2D) -> Self {
        other.clone()
    }

    /// Create a Path2D from SVG path data string.
    ///
    /// Supports all SVG path commands (M, L, H, V, Q, T, C, S, A, Z).
    /// Arc commands are converted to cubic Bezier curves.
    ///
    /// # Example
    /// ```
    /// use canvas2d_engine::Path2D;
    ///
    /// let path = Path2D::from_svg_path_data("M10,10 L50,50 A10,10 0 0 1 100,100 Z").unwrap();
    /// assert!(!path.is_empty());
    /// ```
    pub fn from_svg_path_data(path_data: &str) -> Canvas2dResult<Self> {
        let mut path = Path2D::new();

        for segment in svgtypes::SimplifyingPathParser::from(path_data) {
            let segment = segment.map_err(|e| {
                Canvas2dError::InvalidArgument(format!("Invalid SVG path data: {:?}", e))
            })?;

            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => {
                    path.move_to(x as f32, y as f32);
                }
                svgtypes::SimplePathSegment::LineTo { x, y } => {
                    path.line_to(x as f32, y as f32);
                }
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    path.quadratic_curve_to(&QuadraticBezierParams {
                        cpx: x1 as f32,
                        cpy: y1 as f32,
                        x: x as f32,
                        y: y as f32,
                    });
                }
                svgtypes::SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    path.bezier_curve_to(&CubicBezierParams {
                        cp1x: x1 as f32,
                        cp1y: y1 as f32,
                        cp2x: x2 as f32,
                        cp2y: y2 as f32,
                        x: x as f32,
                        y: y as f32,
                    });
                }
                svgtypes::SimplePathSegment::ClosePath => {
                    path.close_path();
                }
            }
        }

        Ok(path)
    }

    /// Append the subpaths of `other`, mapped through `transform`.
    ///
    /// A transform with non-finite components is an `InvalidArgument` error.
    pub fn add_path(&mut self, other: &Path2D, transform: Option<DOMMatrix>) -> Canvas2dResult<()> {
        let transform = match transform {
            Some(matrix) if !matrix.is_finite() => {
                return Err(Canvas2dError::InvalidArgument(
                    "addPath transform must be finite".to_string(),
                ))
            }
            Some(matrix) => Transform::from(matrix),
            None => Transform::identity(),
        };
        self.path.append(&other.path.transformed(&transform));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl CanvasPath for Path2D {
    fn path(&self) -> &Path {
        &self.path
    }

    fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    fn path_transform(&self) -> Transform {
        Transform::identity()
    }
}
