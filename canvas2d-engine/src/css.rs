//! CSS value parsing for canvas properties.
//!
//! Colors go through csscolorparser and filter lists through svgtypes. Both
//! return `None` on failure so that property setters can silently keep their
//! previous value.

use crate::filter::{ColorFilterKind, FilterOperation};

/// Parse a CSS color string into a tiny_skia::Color.
pub fn parse_color(s: &str) -> Option<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s.trim()).ok()?;
    let [r, g, b, a] = parsed.to_array();
    tiny_skia::Color::from_rgba(r, g, b, a)
}

/// Serialize a color the way canvas color getters report it: `#rrggbb` for
/// opaque colors, `rgba(r, g, b, a)` otherwise.
pub fn serialize_color(color: &tiny_skia::Color) -> String {
    let c = color.to_color_u8();
    if c.alpha() == 255 {
        format!("#{:02x}{:02x}{:02x}", c.red(), c.green(), c.blue())
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            c.red(),
            c.green(),
            c.blue(),
            format_alpha(color.alpha())
        )
    }
}

fn format_alpha(alpha: f32) -> String {
    if alpha == 0.0 {
        return "0".to_string();
    }
    // Round-trip through 8 bits the way browsers do, then print the shortest form
    let rounded = ((alpha * 255.0).round() / 255.0 * 1000.0).round() / 1000.0;
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Parse a CSS filter list (`blur(2px) sepia(50%)`) into filter operations in
/// source order. `url()` references are not supported and fail the whole list.
pub fn parse_filter_operations(s: &str) -> Option<Vec<FilterOperation>> {
    let mut operations = Vec::new();
    for value in svgtypes::FilterValueListParser::from(s) {
        let value = value.ok()?;
        operations.push(convert_filter_value(value)?);
    }
    if operations.is_empty() {
        return None;
    }
    Some(operations)
}

fn convert_filter_value(value: svgtypes::FilterValue<'_>) -> Option<FilterOperation> {
    use svgtypes::FilterValue;

    let color_op = |kind: ColorFilterKind, amount: f64| FilterOperation::Color {
        kind,
        amount: amount as f32,
    };

    Some(match value {
        FilterValue::Blur(std_dev) => FilterOperation::Blur {
            radius: length_to_px(std_dev)?,
        },
        FilterValue::DropShadow {
            color,
            dx,
            dy,
            std_dev,
        } => FilterOperation::DropShadow {
            offset_x: length_to_px(dx)?,
            offset_y: length_to_px(dy)?,
            radius: length_to_px(std_dev)?,
            color: color
                .map(|c| tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha))
                .unwrap_or(tiny_skia::Color::BLACK),
        },
        FilterValue::Brightness(amount) => color_op(ColorFilterKind::Brightness, amount),
        FilterValue::Contrast(amount) => color_op(ColorFilterKind::Contrast, amount),
        FilterValue::Grayscale(amount) => color_op(ColorFilterKind::Grayscale, amount),
        FilterValue::Invert(amount) => color_op(ColorFilterKind::Invert, amount),
        FilterValue::Opacity(amount) => color_op(ColorFilterKind::Opacity, amount),
        FilterValue::Saturate(amount) => color_op(ColorFilterKind::Saturate, amount),
        FilterValue::Sepia(amount) => color_op(ColorFilterKind::Sepia, amount),
        FilterValue::HueRotate(angle) => FilterOperation::HueRotate {
            degrees: angle.to_degrees() as f32,
        },
        FilterValue::Url(_) => return None,
    })
}

/// Absolute lengths only: font- and percentage-relative units have no
/// meaning for a canvas filter.
fn length_to_px(length: svgtypes::Length) -> Option<f32> {
    use svgtypes::LengthUnit;

    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => 96.0,
        LengthUnit::Cm => 96.0 / 2.54,
        LengthUnit::Mm => 96.0 / 25.4,
        LengthUnit::Pt => 4.0 / 3.0,
        LengthUnit::Pc => 16.0,
        _ => return None,
    };
    let px = (length.number * factor) as f32;
    px.is_finite().then_some(px)
}
