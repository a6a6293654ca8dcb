//! Immediate-mode Canvas 2D drawing engine.
//!
//! This crate implements the state machine behind a canvas 2D rendering
//! context without a browser or JavaScript runtime: the drawing-state stack,
//! path geometry with fill/stroke/clip semantics, the drawImage compositor,
//! shadows and filters, pixel read-back and text placement. It uses:
//! - `tiny-skia` for rasterization (behind the [`Painter`] trait)
//! - `cosmic-text` for text shaping (behind the [`TextShaper`] trait)
//! - `fontdb` for font database management (can be shared with other crates)
//!
//! # Example
//!
//! ```rust,no_run
//! use canvas2d_engine::{Canvas2dContext, RectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000");
//! ctx.fill_rect(&RectParams { x: 10.0, y: 10.0, width: 100.0, height: 50.0 });
//! let png_data = ctx.to_png(None)?;
//! # Ok::<(), canvas2d_engine::Canvas2dError>(())
//! ```

mod arc;
mod bitmap;
mod canvas_path;
mod context;
mod css;
mod dom_matrix;
mod drawing_state;
mod error;
mod filter;
mod font_config;
mod font_parser;
mod font_shaper;
mod geometry;
mod gradient;
mod image_data;
mod image_source;
pub mod painter;
mod path;
mod path2d;
mod pattern;
mod settings;
mod style;
mod surface;
mod text;

// Re-export public API
pub use bitmap::Bitmap;
pub use canvas_path::CanvasPath;
pub use context::{Canvas2dContext, Canvas2dContextBuilder, DirtyObserver};
pub use css::{parse_color, parse_filter_operations, serialize_color};
pub use dom_matrix::DOMMatrix;
pub use drawing_state::{ClipEntry, DrawingState};
pub use error::{Canvas2dError, Canvas2dResult};
pub use filter::{ColorFilterKind, Filter, FilterOperation};
pub use font_config::{CustomFont, FontConfig, GenericFamily, GenericFamilyMap};
pub use font_parser::{parse_font, FontStyle, FontWeight, ParsedFont, DEFAULT_FONT};
pub use font_shaper::CosmicTextShaper;
pub use geometry::{
    ArcParams, ArcToParams, CornerRadius, CubicBezierParams, DirtyRect, EllipseParams,
    FloatPoint, FloatRect, ImageCropParams, IntRect, QuadraticBezierParams,
    RadialGradientParams, RectParams, RoundRectParams,
};
pub use gradient::{CanvasGradient, GradientStop, GradientType};
pub use image_data::{ImageData, ImageDataSettings};
pub use image_source::{
    CanvasElementSource, CanvasImageSource, DecodedImage, ImageBitmap, ReadyState, Usability,
    VideoFrame,
};
pub use painter::{Painter, PaintOp, RecordingPainter, SkiaPainter};
pub use path::{ArcSegment, Path, Segment, Subpath, WindingRule};
pub use path2d::Path2D;
pub use pattern::{CanvasPattern, Repetition};
pub use settings::{CanvasColorType, ContextSettings, PredefinedColorSpace};
pub use style::{
    CompositeOperator, FillStyle, ImageSmoothingQuality, LineCap, LineJoin, PaintStyle,
    ScalingMode, TextAlign, TextBaseline,
};
pub use surface::{Surface, SurfaceFormat, MAX_DIMENSION};
pub use text::{
    anchor_transform, prepare_text, FontMetrics, GlyphRun, PreparedText, TextMetrics, TextShaper,
};
