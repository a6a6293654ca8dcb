//! Drawing state that can be saved and restored.

use crate::filter::Filter;
use crate::font_parser::{ParsedFont, DEFAULT_FONT};
use crate::path::{Path, WindingRule};
use crate::style::{
    CompositeOperator, FillStyle, ImageSmoothingQuality, LineCap, LineJoin, ScalingMode,
    TextAlign, TextBaseline,
};
use tiny_skia::{Color, Transform};

/// One `clip()` call: a closed device-space path and its winding rule.
#[derive(Debug, Clone)]
pub struct ClipEntry {
    pub path: Path,
    pub winding_rule: WindingRule,
}

/// Drawing state that can be saved and restored.
///
/// `save()` pushes a copy of the live state; nothing in a pushed copy is
/// shared with the live one.
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Current transform matrix.
    pub transform: Transform,
    /// Clip paths applied at this level and the ones below; the clip region
    /// is their intersection.
    pub clip: Vec<ClipEntry>,
    pub fill_style: FillStyle,
    pub stroke_style: FillStyle,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    /// Dash lengths as set through `setLineDash`, always of even length.
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f32,
    pub global_alpha: f32,
    pub composite_operator: CompositeOperator,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    pub shadow_blur: f32,
    pub shadow_color: Color,
    pub filter: Option<Filter>,
    /// Last accepted `filter` string.
    pub filter_string: Option<String>,
    /// Parsed lazily; None means the default font.
    pub font: Option<ParsedFont>,
    /// Last accepted `font` string.
    pub font_string: String,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub image_smoothing_enabled: bool,
    pub image_smoothing_quality: ImageSmoothingQuality,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            clip: Vec::new(),
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            global_alpha: 1.0,
            composite_operator: CompositeOperator::SourceOver,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
            filter: None,
            filter_string: None,
            font: None,
            font_string: DEFAULT_FONT.to_string(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            image_smoothing_enabled: true,
            image_smoothing_quality: ImageSmoothingQuality::default(),
        }
    }
}

impl DrawingState {
    /// The font to shape with, falling back to the default font.
    pub fn font_or_default(&self) -> ParsedFont {
        self.font.clone().unwrap_or_default()
    }

    pub fn scaling_mode(&self) -> ScalingMode {
        ScalingMode::from_smoothing(self.image_smoothing_enabled, self.image_smoothing_quality)
    }

    /// Whether a shadow pass would be visible under the current state.
    pub fn shadow_visible(&self) -> bool {
        self.composite_operator != CompositeOperator::Copy
            && self.shadow_color.alpha() > 0.0
            && (self.shadow_blur > 0.0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DrawingState::default();
        assert!(state.transform.is_identity());
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.miter_limit, 10.0);
        assert_eq!(state.global_alpha, 1.0);
        assert_eq!(state.font_string, "10px sans-serif");
        assert_eq!(state.font_or_default().size_px, 10.0);
        assert_eq!(state.scaling_mode(), ScalingMode::Smooth);
        assert!(!state.shadow_visible());
    }

    #[test]
    fn test_shadow_visibility() {
        let mut state = DrawingState {
            shadow_color: Color::BLACK,
            shadow_offset_x: 2.0,
            ..DrawingState::default()
        };
        assert!(state.shadow_visible());
        state.composite_operator = CompositeOperator::Copy;
        assert!(!state.shadow_visible());
        state.composite_operator = CompositeOperator::SourceOver;
        state.shadow_offset_x = 0.0;
        assert!(!state.shadow_visible());
        state.shadow_blur = 4.0;
        assert!(state.shadow_visible());
    }
}
