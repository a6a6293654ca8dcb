//! Transform operations for Canvas2dContext.
//!
//! Calls with any non-finite argument leave the transform untouched.

use super::Canvas2dContext;
use crate::dom_matrix::DOMMatrix;
use crate::painter::Painter;
use tiny_skia::Transform;

impl<P: Painter> Canvas2dContext<P> {
    /// Translate the canvas.
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    /// Rotate the canvas clockwise by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        log::debug!(target: "canvas", "rotate {}", angle);
        if !angle.is_finite() {
            return;
        }
        let (sin, cos) = angle.sin_cos();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.state.transform = self.state.transform.pre_concat(rotation);
    }

    /// Scale the canvas.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.state.transform = self.state.transform.pre_scale(x, y);
    }

    /// Multiply the current transform by `matrix`.
    pub fn transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix);
        if !matrix.is_finite() {
            return;
        }
        self.state.transform = self.state.transform.pre_concat(matrix.into());
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        if !matrix.is_finite() {
            return;
        }
        self.state.transform = matrix.into();
    }

    /// Reset the transform to identity.
    pub fn reset_transform(&mut self) {
        log::debug!(target: "canvas", "resetTransform");
        self.state.transform = Transform::identity();
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> DOMMatrix {
        self.state.transform.into()
    }
}
