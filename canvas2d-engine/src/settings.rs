//! Context creation settings.

use crate::error::Canvas2dError;
use crate::surface::SurfaceFormat;

/// Color space of a context or of image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PredefinedColorSpace {
    #[default]
    Srgb,
    DisplayP3,
}

impl PredefinedColorSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedColorSpace::Srgb => "srgb",
            PredefinedColorSpace::DisplayP3 => "display-p3",
        }
    }
}

impl std::str::FromStr for PredefinedColorSpace {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "srgb" => Ok(PredefinedColorSpace::Srgb),
            "display-p3" => Ok(PredefinedColorSpace::DisplayP3),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid color space: '{}'",
                s
            ))),
        }
    }
}

/// Linear-light sRGB primaries to Display P3 primaries (D65 white).
const SRGB_TO_DISPLAY_P3: [[f32; 3]; 3] = [
    [0.822_462_1, 0.177_538, 0.0],
    [0.033_194_1, 0.966_805_8, 0.0],
    [0.017_082_7, 0.072_397_4, 0.910_519_9],
];

const DISPLAY_P3_TO_SRGB: [[f32; 3]; 3] = [
    [1.224_940_1, -0.224_940_4, 0.0],
    [-0.042_056_9, 1.042_057_1, 0.0],
    [-0.019_637_6, -0.078_636_1, 1.098_273_5],
];

fn decode_transfer(v: f32) -> f32 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn encode_transfer(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert straight-alpha RGBA8 pixels from one color space to another.
///
/// Both spaces use the sRGB transfer curve, so only the primaries change.
/// Colors outside the target gamut are clamped; alpha is left alone.
pub(crate) fn convert_rgba8(data: &mut [u8], from: PredefinedColorSpace, to: PredefinedColorSpace) {
    let matrix = match (from, to) {
        (PredefinedColorSpace::Srgb, PredefinedColorSpace::DisplayP3) => &SRGB_TO_DISPLAY_P3,
        (PredefinedColorSpace::DisplayP3, PredefinedColorSpace::Srgb) => &DISPLAY_P3_TO_SRGB,
        _ => return,
    };
    let linear: Vec<f32> = (0..=255u8)
        .map(|v| decode_transfer(v as f32 / 255.0))
        .collect();
    for px in data.chunks_exact_mut(4) {
        let rgb = [
            linear[px[0] as usize],
            linear[px[1] as usize],
            linear[px[2] as usize],
        ];
        for (channel, row) in px.iter_mut().zip(matrix) {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            *channel = (encode_transfer(v.clamp(0.0, 1.0)) * 255.0).round() as u8;
        }
    }
}

/// Per-channel storage type requested for the canvas backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasColorType {
    #[default]
    Unorm8,
    Float16,
}

impl std::str::FromStr for CanvasColorType {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unorm8" => Ok(CanvasColorType::Unorm8),
            "float16" => Ok(CanvasColorType::Float16),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid color type: '{}'",
                s
            ))),
        }
    }
}

/// Settings passed when the 2D context is created. They cannot change for the
/// lifetime of the context.
///
/// `alpha` and `color_space` affect rendering. `desynchronized`, `color_type`
/// and `will_read_frequently` are hints: they are accepted and reported back
/// through `Canvas2dContext::settings`, but the surface is always a
/// synchronous 8-bit tiny-skia pixmap and read-back never changes path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSettings {
    /// Whether the surface has an alpha channel.
    pub alpha: bool,
    /// Hint only.
    pub desynchronized: bool,
    /// Space the surface pixels are in. Image data in another space is
    /// converted on getImageData and putImageData.
    pub color_space: PredefinedColorSpace,
    /// Hint only: storage is always `Unorm8`.
    pub color_type: CanvasColorType,
    /// Hint only.
    pub will_read_frequently: bool,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            alpha: true,
            desynchronized: false,
            color_space: PredefinedColorSpace::Srgb,
            color_type: CanvasColorType::Unorm8,
            will_read_frequently: false,
        }
    }
}

impl ContextSettings {
    /// Surface format selected by the `alpha` setting.
    pub fn surface_format(&self) -> SurfaceFormat {
        if self.alpha {
            SurfaceFormat::Rgba
        } else {
            SurfaceFormat::Rgbx
        }
    }
}
