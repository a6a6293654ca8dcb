//! Font database configuration for text shaping.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// CSS generic font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    pub const ALL: [GenericFamily; 5] = [
        GenericFamily::Serif,
        GenericFamily::SansSerif,
        GenericFamily::Monospace,
        GenericFamily::Cursive,
        GenericFamily::Fantasy,
    ];

    /// Recognize a generic family keyword from a `font` family list.
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "serif" => Some(GenericFamily::Serif),
            "sans-serif" | "system-ui" => Some(GenericFamily::SansSerif),
            "monospace" => Some(GenericFamily::Monospace),
            "cursive" => Some(GenericFamily::Cursive),
            "fantasy" => Some(GenericFamily::Fantasy),
            _ => None,
        }
    }
}

/// Font configuration for a canvas context.
///
/// Only std types live here; [`FontConfig::build_database`] is the single
/// point where the configuration turns into a `fontdb::Database`.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Raw font files to register.
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families tried for each generic family.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Hint glyph outlines to the pixel grid (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

/// Font file bytes (TTF/OTF). Arc-wrapped for cheap cloning.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

impl CustomFont {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

/// Concrete family names for each generic family, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
    pub cursive: Vec<String>,
    pub fantasy: Vec<String>,
}

impl GenericFamilyMap {
    /// Browser-like preference lists.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec!["Arial".into(), "Helvetica".into(), "Liberation Sans".into()],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            cursive: vec!["Comic Sans MS".into(), "Apple Chancery".into()],
            fantasy: vec!["Impact".into(), "Papyrus".into()],
        }
    }

    pub fn get(&self, family: GenericFamily) -> &[String] {
        match family {
            GenericFamily::Serif => &self.serif,
            GenericFamily::SansSerif => &self.sans_serif,
            GenericFamily::Monospace => &self.monospace,
            GenericFamily::Cursive => &self.cursive,
            GenericFamily::Fantasy => &self.fantasy,
        }
    }
}

impl FontConfig {
    /// Build a font database: system fonts, font directories, custom fonts,
    /// then the first available family of each generic preference list.
    pub fn build_database(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();

        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &self.font_dirs {
            db.load_fonts_dir(dir);
        }
        for font in &self.custom_fonts {
            db.load_font_data(font.data.as_ref().clone());
        }

        apply_generic_families(&mut db, &self.generic_families);
        log::debug!(target: "canvas", "font database ready with {} faces", db.len());
        db
    }
}

fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _lang)| name.clone()))
        .collect();

    for generic in GenericFamily::ALL {
        let Some(family) = families
            .get(generic)
            .iter()
            .find(|family| available.contains(*family))
        else {
            continue;
        };
        match generic {
            GenericFamily::Serif => db.set_serif_family(family.as_str()),
            GenericFamily::SansSerif => db.set_sans_serif_family(family.as_str()),
            GenericFamily::Monospace => db.set_monospace_family(family.as_str()),
            GenericFamily::Cursive => db.set_cursive_family(family.as_str()),
            GenericFamily::Fantasy => db.set_fantasy_family(family.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert!(!config.hinting_enabled);
        assert_eq!(
            config.generic_families.get(GenericFamily::SansSerif)[0],
            "Arial"
        );
        assert_eq!(
            config.generic_families.get(GenericFamily::Fantasy),
            ["Impact", "Papyrus"]
        );
    }

    #[rstest]
    #[case("serif", Some(GenericFamily::Serif))]
    #[case("Sans-Serif", Some(GenericFamily::SansSerif))]
    #[case("monospace", Some(GenericFamily::Monospace))]
    #[case("Arial", None)]
    fn test_generic_keyword(#[case] name: &str, #[case] expected: Option<GenericFamily>) {
        assert_eq!(GenericFamily::from_keyword(name), expected);
    }

    #[test]
    fn test_build_database_without_system_fonts_is_empty() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        assert_eq!(config.build_database().faces().count(), 0);
    }

    #[test]
    fn test_font_config_clone_shares_font_data() {
        let config = FontConfig {
            custom_fonts: vec![CustomFont::new(vec![0u8; 1000])],
            ..FontConfig::default()
        };
        let cloned = config.clone();
        assert!(Arc::ptr_eq(
            &config.custom_fonts[0].data,
            &cloned.custom_fonts[0].data
        ));
    }
}
