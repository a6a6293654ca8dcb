//! Canvas 2D rendering context implementation.

mod drawing;
mod effects;
mod image_ops;
mod path_ops;
mod text_rendering;
mod transform;

use crate::css::{parse_color, parse_filter_operations, serialize_color};
use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::filter::Filter;
use crate::font_config::FontConfig;
use crate::font_parser::parse_font;
use crate::font_shaper::CosmicTextShaper;
use crate::geometry::{FloatRect, RadialGradientParams};
use crate::gradient::CanvasGradient;
use crate::painter::{Painter, SkiaPainter};
use crate::path::Path;
use crate::pattern::CanvasPattern;
use crate::settings::ContextSettings;
use crate::style::{
    CompositeOperator, FillStyle, ImageSmoothingQuality, LineCap, LineJoin, TextAlign,
    TextBaseline,
};
use crate::surface::{Surface, MAX_DIMENSION};
use crate::text::TextShaper;

/// Callback invoked with the device-space rectangle touched by each paint.
pub type DirtyObserver = Box<dyn FnMut(FloatRect)>;

/// Canvas 2D rendering context.
///
/// The context owns the drawing state stack, the current path and the
/// surface. Pixels are produced by the [`Painter`] `P`; text geometry comes
/// from a boxed [`TextShaper`].
pub struct Canvas2dContext<P: Painter = SkiaPainter> {
    settings: ContextSettings,
    /// Requested surface size. Zero in either axis means no surface.
    width: u32,
    height: u32,
    /// Allocated on first use.
    pub(crate) surface: Option<Surface>,
    pub(crate) painter: P,
    pub(crate) shaper: Box<dyn TextShaper>,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states.
    state_stack: Vec<DrawingState>,
    /// Current path, in device space.
    pub(crate) path: Path,
    /// Cleared for good once cross-origin content is drawn.
    pub(crate) origin_clean: bool,
    dirty: Option<FloatRect>,
    dirty_observer: Option<DirtyObserver>,
}

impl<P: Painter> std::fmt::Debug for Canvas2dContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas2dContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("settings", &self.settings)
            .field("has_surface", &self.surface.is_some())
            .field("saved_states", &self.state_stack.len())
            .field("origin_clean", &self.origin_clean)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Canvas2dContext`].
///
/// Without an explicit shaper, a [`CosmicTextShaper`] is built from the font
/// database (if given) or from the font configuration (default otherwise).
pub struct Canvas2dContextBuilder<P: Painter = SkiaPainter> {
    width: u32,
    height: u32,
    settings: ContextSettings,
    font_config: Option<FontConfig>,
    font_db: Option<fontdb::Database>,
    shaper: Option<Box<dyn TextShaper>>,
    painter: P,
}

impl Canvas2dContextBuilder<SkiaPainter> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            settings: ContextSettings::default(),
            font_config: None,
            font_db: None,
            shaper: None,
            painter: SkiaPainter::new(),
        }
    }
}

impl<P: Painter> Canvas2dContextBuilder<P> {
    pub fn with_settings(mut self, settings: ContextSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_font_config(mut self, config: FontConfig) -> Self {
        self.font_config = Some(config);
        self
    }

    /// Use an already-populated font database. Takes precedence over the
    /// font configuration.
    pub fn with_font_db(mut self, db: fontdb::Database) -> Self {
        self.font_db = Some(db);
        self
    }

    /// Use a custom shaper instead of cosmic-text.
    pub fn with_shaper(mut self, shaper: impl TextShaper + 'static) -> Self {
        self.shaper = Some(Box::new(shaper));
        self
    }

    /// Use a custom rasterizer.
    pub fn with_painter<Q: Painter>(self, painter: Q) -> Canvas2dContextBuilder<Q> {
        Canvas2dContextBuilder {
            width: self.width,
            height: self.height,
            settings: self.settings,
            font_config: self.font_config,
            font_db: self.font_db,
            shaper: self.shaper,
            painter,
        }
    }

    pub fn build(self) -> Canvas2dResult<Canvas2dContext<P>> {
        validate_size(self.width, self.height)?;
        let shaper: Box<dyn TextShaper> = match (self.shaper, self.font_db) {
            (Some(shaper), _) => shaper,
            (None, Some(db)) => {
                let hinting = self
                    .font_config
                    .as_ref()
                    .map(|config| config.hinting_enabled)
                    .unwrap_or(false);
                Box::new(CosmicTextShaper::new(db).with_hinting(hinting))
            }
            (None, None) => Box::new(CosmicTextShaper::from_config(
                &self.font_config.unwrap_or_default(),
            )),
        };
        log::debug!(
            target: "canvas",
            "new context {}x{} {:?}",
            self.width,
            self.height,
            self.settings
        );
        Ok(Canvas2dContext {
            settings: self.settings,
            width: self.width,
            height: self.height,
            surface: None,
            painter: self.painter,
            shaper,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path: Path::new(),
            origin_clean: true,
            dirty: None,
            dirty_observer: None,
        })
    }
}

fn validate_size(width: u32, height: u32) -> Canvas2dResult<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Canvas2dError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl Canvas2dContext<SkiaPainter> {
    /// Create a context with default settings and `FontConfig::default()`.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Canvas2dContextBuilder::new(width, height).build()
    }

    /// Create a context with the given font configuration.
    pub fn with_config(width: u32, height: u32, config: FontConfig) -> Canvas2dResult<Self> {
        Canvas2dContextBuilder::new(width, height)
            .with_font_config(config)
            .build()
    }
}

impl<P: Painter> Canvas2dContext<P> {
    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// The live drawing state.
    pub fn drawing_state(&self) -> &DrawingState {
        &self.state
    }

    /// False once anything cross-origin has been drawn.
    pub fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// The surface, if one has been allocated.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Allocate the surface for the requested size if there is none yet.
    ///
    /// Returns None while the requested size is empty.
    pub fn ensure_surface(&mut self) -> Option<&Surface> {
        self.ensure_surface_mut().map(|surface| &*surface)
    }

    pub(crate) fn ensure_surface_mut(&mut self) -> Option<&mut Surface> {
        if self.surface.is_none() && self.width > 0 && self.height > 0 {
            match Surface::new(self.width, self.height, self.settings.surface_format()) {
                Ok(surface) => {
                    log::debug!(
                        target: "canvas",
                        "allocated {}x{} {:?} surface",
                        self.width,
                        self.height,
                        surface.format()
                    );
                    self.surface = Some(surface);
                }
                Err(err) => {
                    log::debug!(target: "canvas", "surface allocation failed: {}", err);
                }
            }
        }
        self.surface.as_mut()
    }

    /// Change the requested size.
    ///
    /// A different size drops the surface (it is reallocated on the next
    /// paint) and returns the context to its default state.
    pub fn set_size(&mut self, width: u32, height: u32) -> Canvas2dResult<()> {
        validate_size(width, height)?;
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        log::debug!(target: "canvas", "set_size {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.surface = None;
        self.reset_drawing_state();
        Ok(())
    }

    /// Take the region touched since the last call.
    pub fn take_dirty_region(&mut self) -> Option<FloatRect> {
        self.dirty.take()
    }

    /// Register a callback that receives the rect of every paint.
    pub fn set_dirty_observer(&mut self, observer: impl FnMut(FloatRect) + 'static) {
        self.dirty_observer = Some(Box::new(observer));
    }

    pub(crate) fn did_draw(&mut self, rect: FloatRect) {
        let rect = rect.normalized();
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.united(&rect),
            None => rect,
        });
        if let Some(observer) = self.dirty_observer.as_mut() {
            observer(rect);
        }
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
        self.painter.save();
    }

    /// Restore the previously saved drawing state. No-op on an empty stack.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.painter.restore();
        }
    }

    /// Reset the rendering context to its default state.
    ///
    /// Clears the surface to the clear color, drops every saved state, the
    /// clip and the current path. The origin-clean flag stays as it is.
    pub fn reset(&mut self) {
        log::debug!(target: "canvas", "reset");
        self.reset_drawing_state();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
            let rect = surface.rect().to_float();
            self.did_draw(rect);
        }
    }

    fn reset_drawing_state(&mut self) {
        self.state = DrawingState::default();
        self.state_stack.clear();
        self.path.clear();
        self.painter.reset();
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string. Returns false (and keeps
    /// the previous style) when the string is not a color.
    pub fn set_fill_style(&mut self, style: &str) -> bool {
        match parse_color(style) {
            Some(color) => {
                self.state.fill_style = FillStyle::Color(color);
                true
            }
            None => {
                log::debug!(target: "canvas", "ignored fillStyle {:?}", style);
                false
            }
        }
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> bool {
        match parse_color(style) {
            Some(color) => {
                self.state.stroke_style = FillStyle::Color(color);
                true
            }
            None => {
                log::debug!(target: "canvas", "ignored strokeStyle {:?}", style);
                false
            }
        }
    }

    pub fn set_fill_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.fill_style = FillStyle::Gradient(gradient);
    }

    pub fn set_stroke_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.stroke_style = FillStyle::Gradient(gradient);
    }

    pub fn set_fill_style_pattern(&mut self, pattern: CanvasPattern) {
        self.state.fill_style = FillStyle::Pattern(pattern);
    }

    pub fn set_stroke_style_pattern(&mut self, pattern: CanvasPattern) {
        self.state.stroke_style = FillStyle::Pattern(pattern);
    }

    pub fn get_fill_style(&self) -> &FillStyle {
        &self.state.fill_style
    }

    pub fn get_stroke_style(&self) -> &FillStyle {
        &self.state.stroke_style
    }

    /// Create a linear gradient.
    pub fn create_linear_gradient(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> CanvasGradient {
        CanvasGradient::new_linear(x0, y0, x1, y1)
    }

    /// Create a radial gradient. Negative radii are an index size error.
    pub fn create_radial_gradient(
        &self,
        params: &RadialGradientParams,
    ) -> Canvas2dResult<CanvasGradient> {
        CanvasGradient::new_radial(params)
    }

    // --- Line styles ---

    /// Set the line width. Non-finite values and values <= 0 are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        } else {
            log::debug!(target: "canvas", "ignored lineWidth {}", width);
        }
    }

    pub fn get_line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn get_line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn get_line_join(&self) -> LineJoin {
        self.state.line_join
    }

    /// Set the miter limit. Non-finite values and values <= 0 are ignored.
    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        } else {
            log::debug!(target: "canvas", "ignored miterLimit {}", limit);
        }
    }

    pub fn get_miter_limit(&self) -> f32 {
        self.state.miter_limit
    }

    /// Set the line dash pattern.
    ///
    /// The whole list is ignored if any entry is negative or non-finite.
    /// Odd-length lists are repeated to make them even.
    pub fn set_line_dash(&mut self, mut segments: Vec<f64>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            log::debug!(target: "canvas", "ignored line dash {:?}", segments);
            return;
        }
        if segments.len() % 2 != 0 {
            segments.extend_from_within(..);
        }
        self.state.line_dash = segments;
    }

    pub fn get_line_dash(&self) -> &[f64] {
        &self.state.line_dash
    }

    /// Set the line dash offset. Non-finite values are ignored.
    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.line_dash_offset = offset;
        }
    }

    pub fn get_line_dash_offset(&self) -> f32 {
        self.state.line_dash_offset
    }

    // --- Compositing ---

    /// Set the global alpha. Non-finite values and values outside [0, 1] are
    /// ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        } else {
            log::debug!(target: "canvas", "ignored globalAlpha {}", alpha);
        }
    }

    pub fn get_global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Set the compositing and blending operator by name. Unknown names are
    /// ignored. Returns true if the value was accepted.
    pub fn set_global_composite_operation(&mut self, op: &str) -> bool {
        match op.parse::<CompositeOperator>() {
            Ok(operator) => {
                self.state.composite_operator = operator;
                true
            }
            Err(_) => {
                log::debug!(target: "canvas", "ignored globalCompositeOperation {:?}", op);
                false
            }
        }
    }

    pub fn get_global_composite_operation(&self) -> &'static str {
        self.state.composite_operator.as_str()
    }

    // --- Shadows ---

    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_x = offset;
        }
    }

    pub fn get_shadow_offset_x(&self) -> f32 {
        self.state.shadow_offset_x
    }

    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_y = offset;
        }
    }

    pub fn get_shadow_offset_y(&self) -> f32 {
        self.state.shadow_offset_y
    }

    /// Set the shadow blur. Negative and non-finite values are ignored.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow_blur = blur;
        } else {
            log::debug!(target: "canvas", "ignored shadowBlur {}", blur);
        }
    }

    pub fn get_shadow_blur(&self) -> f32 {
        self.state.shadow_blur
    }

    /// Set the shadow color from a CSS color string.
    pub fn set_shadow_color(&mut self, color: &str) -> bool {
        match parse_color(color) {
            Some(parsed) => {
                self.state.shadow_color = parsed;
                true
            }
            None => {
                log::debug!(target: "canvas", "ignored shadowColor {:?}", color);
                false
            }
        }
    }

    /// The shadow color serialized as `#rrggbb` or `rgba(...)`.
    pub fn get_shadow_color(&self) -> String {
        serialize_color(&self.state.shadow_color)
    }

    // --- Filters ---

    /// Set the filter from a CSS filter list.
    ///
    /// `"none"` clears the filter. A list that fails to parse leaves the
    /// current filter untouched. Otherwise each parsed primitive is composed
    /// in front of the filter already in effect.
    pub fn set_filter(&mut self, filter: &str) -> bool {
        if filter.trim() == "none" {
            self.state.filter = None;
            self.state.filter_string = None;
            return true;
        }
        let Some(operations) = parse_filter_operations(filter) else {
            log::debug!(target: "canvas", "ignored filter {:?}", filter);
            return false;
        };
        self.state.filter = Filter::compose_operations(self.state.filter.take(), operations);
        self.state.filter_string = Some(filter.to_string());
        true
    }

    /// The last accepted filter string, or `"none"`.
    pub fn get_filter(&self) -> &str {
        self.state.filter_string.as_deref().unwrap_or("none")
    }

    // --- Text state ---

    /// Set the font from a CSS font shorthand. Invalid strings are ignored.
    pub fn set_font(&mut self, font: &str) -> bool {
        match parse_font(font) {
            Ok(parsed) => {
                self.state.font = Some(parsed);
                self.state.font_string = font.to_string();
                true
            }
            Err(err) => {
                log::debug!(target: "canvas", "ignored font {:?}: {}", font, err);
                false
            }
        }
    }

    pub fn get_font(&self) -> &str {
        &self.state.font_string
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn get_text_align(&self) -> TextAlign {
        self.state.text_align
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    pub fn get_text_baseline(&self) -> TextBaseline {
        self.state.text_baseline
    }

    // --- Image smoothing ---

    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    pub fn get_image_smoothing_enabled(&self) -> bool {
        self.state.image_smoothing_enabled
    }

    pub fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) {
        self.state.image_smoothing_quality = quality;
    }

    pub fn get_image_smoothing_quality(&self) -> ImageSmoothingQuality {
        self.state.image_smoothing_quality
    }
}
