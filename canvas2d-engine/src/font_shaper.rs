//! Default [`TextShaper`] built on cosmic-text.

use crate::font_config::{FontConfig, GenericFamily};
use crate::font_parser::{FontStyle, ParsedFont};
use crate::geometry::FloatPoint;
use crate::path::Path;
use crate::text::{FontMetrics, GlyphRun, TextShaper};
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, Style,
    SwashCache, Weight, Wrap,
};

/// Shapes text with cosmic-text and extracts vector glyph outlines through
/// swash.
pub struct CosmicTextShaper {
    font_system: FontSystem,
    swash_cache: SwashCache,
    hinting_enabled: bool,
}

impl std::fmt::Debug for CosmicTextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicTextShaper")
            .field("faces", &self.font_system.db().len())
            .field("hinting_enabled", &self.hinting_enabled)
            .finish_non_exhaustive()
    }
}

impl CosmicTextShaper {
    pub fn new(font_db: fontdb::Database) -> Self {
        Self {
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), font_db),
            swash_cache: SwashCache::new(),
            hinting_enabled: false,
        }
    }

    pub fn from_config(config: &FontConfig) -> Self {
        Self::new(config.build_database()).with_hinting(config.hinting_enabled)
    }

    pub fn with_hinting(mut self, hinting_enabled: bool) -> Self {
        self.hinting_enabled = hinting_enabled;
        self
    }

    /// First family of the cascade the database can serve. Generic keywords
    /// always resolve; unknown names fall through to sans-serif.
    fn resolve_family(&self, font: &ParsedFont) -> ResolvedFamily {
        for name in &font.families {
            if let Some(generic) = GenericFamily::from_keyword(name) {
                return ResolvedFamily::Generic(generic);
            }
            let known = self.font_system.db().faces().any(|face| {
                face.families
                    .iter()
                    .any(|(family, _)| family.eq_ignore_ascii_case(name))
            });
            if known {
                return ResolvedFamily::Named(name.clone());
            }
        }
        ResolvedFamily::Generic(GenericFamily::SansSerif)
    }

    /// Lay `text` out on a single unwrapped line.
    fn layout(&mut self, text: &str, font: &ParsedFont) -> Buffer {
        let family = self.resolve_family(font);
        let flags = if self.hinting_enabled {
            CacheKeyFlags::empty()
        } else {
            CacheKeyFlags::DISABLE_HINTING
        };
        let attrs = Attrs::new()
            .family(family.as_family())
            .weight(Weight(font.weight.0))
            .style(match font.style {
                FontStyle::Normal => Style::Normal,
                FontStyle::Italic => Style::Italic,
                FontStyle::Oblique => Style::Oblique,
            })
            .cache_key_flags(flags);

        let size = font.size_px.max(f32::MIN_POSITIVE);
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        {
            let mut borrowed = buffer.borrow_with(&mut self.font_system);
            borrowed.set_wrap(Wrap::None);
            borrowed.set_size(None, None);
            borrowed.set_text(text, &attrs, Shaping::Advanced, None);
            borrowed.shape_until_scroll(false);
        }
        buffer
    }
}

enum ResolvedFamily {
    Generic(GenericFamily),
    Named(String),
}

impl ResolvedFamily {
    fn as_family(&self) -> Family<'_> {
        match self {
            ResolvedFamily::Named(name) => Family::Name(name),
            ResolvedFamily::Generic(GenericFamily::Serif) => Family::Serif,
            ResolvedFamily::Generic(GenericFamily::SansSerif) => Family::SansSerif,
            ResolvedFamily::Generic(GenericFamily::Monospace) => Family::Monospace,
            ResolvedFamily::Generic(GenericFamily::Cursive) => Family::Cursive,
            ResolvedFamily::Generic(GenericFamily::Fantasy) => Family::Fantasy,
        }
    }
}

impl TextShaper for CosmicTextShaper {
    fn shape(&mut self, origin: FloatPoint, text: &str, font: &ParsedFont) -> Vec<GlyphRun> {
        if text.is_empty() {
            return Vec::new();
        }
        let buffer = self.layout(text, font);

        let mut runs: Vec<GlyphRun> = Vec::new();
        let mut current_font = None;
        for layout_run in buffer.layout_runs() {
            for glyph in layout_run.glyphs.iter() {
                if current_font != Some(glyph.font_id) {
                    current_font = Some(glyph.font_id);
                    runs.push(GlyphRun {
                        path: Path::new(),
                        advance: 0.0,
                        size_px: glyph.font_size,
                    });
                }
                let Some(run) = runs.last_mut() else {
                    continue;
                };
                run.advance += glyph.w;

                let physical = glyph.physical((0.0, 0.0), 1.0);
                let glyph_x = origin.x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = origin.y + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                // Font outlines are y-up
                let at = |x: f32, y: f32| FloatPoint::new(glyph_x + x, glyph_y - y);
                for command in commands.iter() {
                    match command {
                        Command::MoveTo(p) => run.path.move_to(at(p.x, p.y)),
                        Command::LineTo(p) => run.path.line_to(at(p.x, p.y)),
                        Command::QuadTo(c, p) => run.path.quad_to(at(c.x, c.y), at(p.x, p.y)),
                        Command::CurveTo(c1, c2, p) => {
                            run.path
                                .cubic_to(at(c1.x, c1.y), at(c2.x, c2.y), at(p.x, p.y))
                        }
                        Command::Close => run.path.close(),
                    }
                }
            }
        }
        runs
    }

    fn font_metrics(&mut self, font: &ParsedFont) -> FontMetrics {
        let size_px = font.size_px;
        let mut buffer = self.layout("Ag", font);
        let line = buffer
            .borrow_with(&mut self.font_system)
            .line_layout(0)
            .and_then(|lines| lines.first())
            .map(|line| (line.max_ascent, line.max_descent));

        match line {
            Some((ascent, descent)) if ascent + descent > 0.0 => {
                // Normalise the glyph box onto the em box
                let scale = size_px / (ascent + descent);
                FontMetrics {
                    size_px,
                    ascent: ascent * scale,
                    descent: descent * scale,
                }
            }
            _ => FontMetrics {
                size_px,
                ascent: size_px * 0.8,
                descent: size_px * 0.2,
            },
        }
    }
}
