//! The context's current path.
//!
//! Builder calls come from [`CanvasPath`]; points are mapped by the current
//! transform as they are added, so later transform changes do not move
//! geometry that is already in the path.

use super::Canvas2dContext;
use crate::canvas_path::CanvasPath;
use crate::painter::Painter;
use crate::path::Path;
use tiny_skia::Transform;

impl<P: Painter> Canvas2dContext<P> {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path.clear();
    }
}

impl<P: Painter> CanvasPath for Canvas2dContext<P> {
    fn path(&self) -> &Path {
        &self.path
    }

    fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    fn path_transform(&self) -> Transform {
        self.state.transform
    }
}
