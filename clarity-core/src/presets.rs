//! Named bundles of preference overrides
use crate::flags::FlagName;
use crate::scale::FontScale;
use crate::settings::PartialSettings;

/// An immutable, named [`PartialSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetDefinition {
    /// Stable identifier the UI passes to `apply_preset`.
    pub name: &'static str,
    /// i18n key of the display label.
    pub label_key: &'static str,
    pub icon: &'static str,
    pub settings: PartialSettings,
}

const BUILTIN: &[PresetDefinition] = &[
    PresetDefinition {
        name: "dyslexia",
        label_key: "presets.dyslexia",
        icon: "📖",
        settings: PartialSettings {
            font_scale: Some(FontScale::from_percent(125)),
            flags: &[
                (FlagName::ReadableFont, true),
                (FlagName::DisableAnimations, true),
            ],
        },
    },
    PresetDefinition {
        name: "vision",
        label_key: "presets.vision",
        icon: "👁️",
        settings: PartialSettings {
            font_scale: Some(FontScale::from_percent(150)),
            flags: &[
                (FlagName::HighContrast, true),
                (FlagName::UnderlineLinks, true),
                (FlagName::LargeCursor, true),
                (FlagName::ReadableFont, true),
            ],
        },
    },
    PresetDefinition {
        name: "cognitive",
        label_key: "presets.cognitive",
        icon: "🧠",
        settings: PartialSettings {
            font_scale: Some(FontScale::from_percent(120)),
            flags: &[
                (FlagName::ReadableFont, true),
                (FlagName::DisableAnimations, true),
            ],
        },
    },
];

/// Static lookup table from preset name to its overrides.
#[derive(Debug, Clone, Copy)]
pub struct PresetCatalog {
    presets: &'static [PresetDefinition],
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    #[must_use]
    pub const fn builtin() -> Self {
        Self { presets: BUILTIN }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static PresetDefinition> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static PresetDefinition> {
        self.presets.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.presets.iter().map(|preset| preset.name).collect()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_three_presets() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.names(), vec!["dyslexia", "vision", "cognitive"]);
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn dyslexia_preset_matches_legacy_values() {
        let preset = PresetCatalog::builtin().get("dyslexia").unwrap();
        assert_eq!(preset.settings.font_scale, Some(FontScale::clamped(125)));
        assert!(preset.settings.touches(FlagName::ReadableFont));
        assert!(preset.settings.touches(FlagName::DisableAnimations));
        assert!(!preset.settings.touches(FlagName::HighContrast));
    }

    #[test]
    fn preset_scales_are_within_bounds() {
        for preset in PresetCatalog::builtin().iter() {
            let scale = preset.settings.font_scale.unwrap_or_default();
            assert!((FontScale::MIN..=FontScale::MAX).contains(&scale), "{}", preset.name);
        }
    }
}
