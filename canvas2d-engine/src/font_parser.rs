//! CSS font shorthand parsing for the `font` property.
//!
//! Parses strings like "12px Arial" or "bold italic 14pt 'Times New Roman'"
//! into a [`ParsedFont`]. Anything the shorthand grammar does not accept is an
//! error, which the `font` setter turns into "keep the previous value".

use crate::error::{Canvas2dError, Canvas2dResult};

/// Default canvas font.
pub const DEFAULT_FONT: &str = "10px sans-serif";

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Numeric font weight (1-1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

/// Parsed font specification from a CSS font string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    pub style: FontStyle,
    pub weight: FontWeight,
    pub small_caps: bool,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: FontStyle::Normal,
            weight: FontWeight::NORMAL,
            small_caps: false,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

/// Consume `keyword` at the start of `s` if it is followed by whitespace or
/// the end of input.
fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(keyword)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Parse a CSS font string into components.
///
/// Supports format: `[style] [variant] [weight] size[/line-height] family[, family]*`
pub fn parse_font(font_str: &str) -> Canvas2dResult<ParsedFont> {
    let font_str = font_str.trim();
    if font_str.is_empty() {
        return Err(Canvas2dError::FontParseError("empty font string".to_string()));
    }

    let mut result = ParsedFont::default();
    let mut remaining = font_str;

    // Style, variant and weight may come in any order before the size
    loop {
        let trimmed = remaining.trim_start();
        if let Some(rest) = strip_keyword(trimmed, "italic") {
            result.style = FontStyle::Italic;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "oblique") {
            result.style = FontStyle::Oblique;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "normal") {
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "small-caps") {
            result.small_caps = true;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "bold") {
            result.weight = FontWeight::BOLD;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "bolder") {
            result.weight = FontWeight::EXTRA_BOLD;
            remaining = rest;
        } else if let Some(rest) = strip_keyword(trimmed, "lighter") {
            result.weight = FontWeight::LIGHT;
            remaining = rest;
        } else if let Some((weight, rest)) = parse_numeric_weight(trimmed) {
            result.weight = weight;
            remaining = rest;
        } else {
            break;
        }
    }

    let (size, rest) = parse_font_size(remaining.trim_start())?;
    result.size_px = size;
    remaining = rest.trim_start();

    if let Some(rest) = remaining.strip_prefix('/') {
        remaining = skip_line_height(rest.trim_start());
    }

    result.families = parse_font_families(remaining.trim_start());
    if result.families.is_empty() {
        return Err(Canvas2dError::FontParseError(format!(
            "missing font family in '{}'",
            font_str
        )));
    }

    Ok(result)
}

/// Try to parse a numeric weight (1-1000) at the start of the string.
///
/// A number followed directly by a unit is a size, not a weight.
fn parse_numeric_weight(s: &str) -> Option<(FontWeight, &str)> {
    let digits_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    let rest = &s[digits_len..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let weight: u16 = s[..digits_len].parse().ok()?;
    if !(1..=1000).contains(&weight) {
        return None;
    }
    Some((FontWeight(weight), rest))
}

/// Parse font size from string.
fn parse_font_size(s: &str) -> Canvas2dResult<(f32, &str)> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if num_end == 0 {
        return Err(Canvas2dError::FontParseError(format!(
            "Expected font size, got: {}",
            s
        )));
    }

    let num_str = &s[..num_end];
    let rest = &s[num_end..];

    let size: f32 = num_str.parse().map_err(|_| {
        Canvas2dError::FontParseError(format!("Invalid font size number: {}", num_str))
    })?;

    // Relative units resolve against the 16px initial font size
    let units: [(&str, f32); 8] = [
        ("px", 1.0),
        ("pt", 4.0 / 3.0),
        ("pc", 16.0),
        ("in", 96.0),
        ("cm", 96.0 / 2.54),
        ("mm", 96.0 / 25.4),
        ("rem", 16.0),
        ("em", 16.0),
    ];
    let (multiplier, unit_len) = if rest.starts_with('%') {
        (16.0 / 100.0, 1)
    } else {
        units
            .iter()
            .find(|(unit, _)| rest.starts_with(unit))
            .map(|(unit, factor)| (*factor, unit.len()))
            .ok_or_else(|| {
                Canvas2dError::FontParseError(format!("Missing font size unit: {}", s))
            })?
    };

    let size_px = size * multiplier;
    if !size_px.is_finite() {
        return Err(Canvas2dError::FontParseError(format!(
            "Invalid font size: {}",
            num_str
        )));
    }
    Ok((size_px, &rest[unit_len..]))
}

/// Skip line-height specification after '/'.
fn skip_line_height(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[end..]
}

/// Parse font family list.
fn parse_font_families(s: &str) -> Vec<String> {
    let mut families = Vec::new();
    let mut remaining = s.trim();

    while !remaining.is_empty() {
        let (family, rest) = parse_single_family(remaining);
        if !family.is_empty() {
            families.push(family);
        }
        remaining = rest.trim_start();
        match remaining.strip_prefix(',') {
            Some(rest) => remaining = rest.trim_start(),
            None => break,
        }
    }

    families
}

/// Parse a single font family name, quoted or not.
fn parse_single_family(s: &str) -> (String, &str) {
    let s = s.trim_start();

    if let Some(quote) = s.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &s[1..];
        return match body.find(quote) {
            Some(end) => (body[..end].to_string(), &body[end + 1..]),
            None => (body.to_string(), ""),
        };
    }

    let end = s.find(',').unwrap_or(s.len());
    (s[..end].trim().to_string(), &s[end..])
}
