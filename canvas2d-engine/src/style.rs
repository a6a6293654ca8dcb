//! Style types and enums for Canvas 2D operations.

use crate::error::Canvas2dError;
use crate::gradient::CanvasGradient;
use crate::pattern::CanvasPattern;
use std::fmt;
use std::str::FromStr;

/// Paint source for fills and strokes.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color fill.
    Color(tiny_skia::Color),
    /// Linear or radial gradient, in user space.
    Gradient(CanvasGradient),
    /// Image pattern, in user space.
    Pattern(CanvasPattern),
}

impl Default for FillStyle {
    fn default() -> Self {
        // Default is opaque black
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// A fill style resolved for painting: gradients and patterns carry the
/// transform that was current when the paint was issued.
#[derive(Debug, Clone)]
pub struct PaintStyle {
    pub style: FillStyle,
    pub transform: tiny_skia::Transform,
}

impl PaintStyle {
    pub fn new(style: FillStyle, transform: tiny_skia::Transform) -> Self {
        Self { style, transform }
    }

    pub fn color(color: tiny_skia::Color) -> Self {
        Self::new(FillStyle::Color(color), tiny_skia::Transform::identity())
    }
}

/// The compositing and blending operators accepted by
/// `globalCompositeOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperator {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    Copy,
    #[default]
    SourceOver,
    DestinationOver,
    SourceIn,
    DestinationIn,
    SourceOut,
    DestinationOut,
    SourceAtop,
    DestinationAtop,
    Xor,
    Lighter,
    PlusDarker,
    PlusLighter,
}

impl CompositeOperator {
    /// Every operator, in the order the tokens are listed by the canvas API.
    pub const ALL: [CompositeOperator; 30] = [
        CompositeOperator::Normal,
        CompositeOperator::Multiply,
        CompositeOperator::Screen,
        CompositeOperator::Overlay,
        CompositeOperator::Darken,
        CompositeOperator::Lighten,
        CompositeOperator::ColorDodge,
        CompositeOperator::ColorBurn,
        CompositeOperator::HardLight,
        CompositeOperator::SoftLight,
        CompositeOperator::Difference,
        CompositeOperator::Exclusion,
        CompositeOperator::Hue,
        CompositeOperator::Saturation,
        CompositeOperator::Color,
        CompositeOperator::Luminosity,
        CompositeOperator::Clear,
        CompositeOperator::Copy,
        CompositeOperator::SourceOver,
        CompositeOperator::DestinationOver,
        CompositeOperator::SourceIn,
        CompositeOperator::DestinationIn,
        CompositeOperator::SourceOut,
        CompositeOperator::DestinationOut,
        CompositeOperator::SourceAtop,
        CompositeOperator::DestinationAtop,
        CompositeOperator::Xor,
        CompositeOperator::Lighter,
        CompositeOperator::PlusDarker,
        CompositeOperator::PlusLighter,
    ];

    /// The canonical token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOperator::Normal => "normal",
            CompositeOperator::Multiply => "multiply",
            CompositeOperator::Screen => "screen",
            CompositeOperator::Overlay => "overlay",
            CompositeOperator::Darken => "darken",
            CompositeOperator::Lighten => "lighten",
            CompositeOperator::ColorDodge => "color-dodge",
            CompositeOperator::ColorBurn => "color-burn",
            CompositeOperator::HardLight => "hard-light",
            CompositeOperator::SoftLight => "soft-light",
            CompositeOperator::Difference => "difference",
            CompositeOperator::Exclusion => "exclusion",
            CompositeOperator::Hue => "hue",
            CompositeOperator::Saturation => "saturation",
            CompositeOperator::Color => "color",
            CompositeOperator::Luminosity => "luminosity",
            CompositeOperator::Clear => "clear",
            CompositeOperator::Copy => "copy",
            CompositeOperator::SourceOver => "source-over",
            CompositeOperator::DestinationOver => "destination-over",
            CompositeOperator::SourceIn => "source-in",
            CompositeOperator::DestinationIn => "destination-in",
            CompositeOperator::SourceOut => "source-out",
            CompositeOperator::DestinationOut => "destination-out",
            CompositeOperator::SourceAtop => "source-atop",
            CompositeOperator::DestinationAtop => "destination-atop",
            CompositeOperator::Xor => "xor",
            CompositeOperator::Lighter => "lighter",
            CompositeOperator::PlusDarker => "plus-darker",
            CompositeOperator::PlusLighter => "plus-lighter",
        }
    }
}

impl FromStr for CompositeOperator {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompositeOperator::ALL
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| {
                Canvas2dError::InvalidArgument(format!("Unknown composite operation: '{}'", s))
            })
    }
}

impl fmt::Display for CompositeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CompositeOperator> for tiny_skia::BlendMode {
    fn from(op: CompositeOperator) -> Self {
        use tiny_skia::BlendMode;
        match op {
            CompositeOperator::Normal | CompositeOperator::SourceOver => BlendMode::SourceOver,
            CompositeOperator::Multiply => BlendMode::Multiply,
            CompositeOperator::Screen => BlendMode::Screen,
            CompositeOperator::Overlay => BlendMode::Overlay,
            CompositeOperator::Darken => BlendMode::Darken,
            CompositeOperator::Lighten => BlendMode::Lighten,
            CompositeOperator::ColorDodge => BlendMode::ColorDodge,
            CompositeOperator::ColorBurn => BlendMode::ColorBurn,
            CompositeOperator::HardLight => BlendMode::HardLight,
            CompositeOperator::SoftLight => BlendMode::SoftLight,
            CompositeOperator::Difference => BlendMode::Difference,
            CompositeOperator::Exclusion => BlendMode::Exclusion,
            CompositeOperator::Hue => BlendMode::Hue,
            CompositeOperator::Saturation => BlendMode::Saturation,
            CompositeOperator::Color => BlendMode::Color,
            CompositeOperator::Luminosity => BlendMode::Luminosity,
            CompositeOperator::Clear => BlendMode::Clear,
            CompositeOperator::Copy => BlendMode::Source,
            CompositeOperator::DestinationOver => BlendMode::DestinationOver,
            CompositeOperator::SourceIn => BlendMode::SourceIn,
            CompositeOperator::DestinationIn => BlendMode::DestinationIn,
            CompositeOperator::SourceOut => BlendMode::SourceOut,
            CompositeOperator::DestinationOut => BlendMode::DestinationOut,
            CompositeOperator::SourceAtop => BlendMode::SourceAtop,
            CompositeOperator::DestinationAtop => BlendMode::DestinationAtop,
            CompositeOperator::Xor => BlendMode::Xor,
            CompositeOperator::Lighter | CompositeOperator::PlusLighter => BlendMode::Plus,
            // No tiny-skia stage; SkiaPainter composites it through a layer.
            CompositeOperator::PlusDarker => BlendMode::SourceOver,
        }
    }
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Text alignment for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Align text to the left of the anchor point.
    Left,
    /// Align text to the right of the anchor point.
    Right,
    /// Center text on the anchor point.
    Center,
    /// Align text to the start (left for LTR, right for RTL).
    #[default]
    Start,
    /// Align text to the end (right for LTR, left for RTL).
    End,
}

/// Text baseline for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Hanging baseline.
    Hanging,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline.
    Ideographic,
    /// Bottom of the em square.
    Bottom,
}

/// Image smoothing quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSmoothingQuality {
    /// Low quality (fastest).
    #[default]
    Low,
    /// Medium quality (balanced).
    Medium,
    /// High quality (slowest).
    High,
}

/// How a bitmap is resampled when drawn at a different size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Nearest-neighbor sampling, used when image smoothing is disabled.
    NearestNeighbor,
    /// Smooth sampling at the given quality.
    #[default]
    Smooth,
    /// Smooth sampling with the high quality hint.
    SmoothHigh,
}

impl ScalingMode {
    /// Scaling mode for the image smoothing flag and quality hint.
    pub fn from_smoothing(enabled: bool, quality: ImageSmoothingQuality) -> Self {
        match (enabled, quality) {
            (false, _) => ScalingMode::NearestNeighbor,
            (true, ImageSmoothingQuality::High) => ScalingMode::SmoothHigh,
            (true, _) => ScalingMode::Smooth,
        }
    }
}

impl From<ScalingMode> for tiny_skia::FilterQuality {
    fn from(mode: ScalingMode) -> Self {
        match mode {
            ScalingMode::NearestNeighbor => tiny_skia::FilterQuality::Nearest,
            ScalingMode::Smooth => tiny_skia::FilterQuality::Bilinear,
            ScalingMode::SmoothHigh => tiny_skia::FilterQuality::Bicubic,
        }
    }
}
