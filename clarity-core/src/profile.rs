//! Deploy-time configuration for one widget instance
use serde::{Deserialize, Serialize};

use crate::flags::FlagName;

/// How a surface reflects the font scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Write the percentage onto the root element's font size.
    #[default]
    RootPercent,
    /// Swap one of five `font-size-*` class tokens.
    ClassBuckets,
}

/// Which flags, key, step and presentation tokens a widget variant uses.
///
/// Missing JSON fields fall back to [`WidgetProfile::modern`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetProfile {
    pub name: String,
    pub storage_key: String,
    pub font_step: i32,
    pub flags: Vec<FlagName>,
    pub class_prefix: String,
    pub scale_mode: ScaleMode,
    pub speech_lang: String,
    pub locale: String,
}

impl Default for WidgetProfile {
    fn default() -> Self {
        Self::modern()
    }
}

impl WidgetProfile {
    /// The original single-page widget: four flags, 25-point steps, bucket classes.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            storage_key: "accessibilitySettings".to_string(),
            font_step: 25,
            flags: vec![
                FlagName::HighContrast,
                FlagName::LargeCursor,
                FlagName::UnderlineLinks,
                FlagName::ReadableFont,
            ],
            class_prefix: String::new(),
            scale_mode: ScaleMode::ClassBuckets,
            speech_lang: "he-IL".to_string(),
            locale: "he".to_string(),
        }
    }

    /// The embeddable floating widget: all flags, 10-point steps, root percentage.
    #[must_use]
    pub fn modern() -> Self {
        Self {
            name: "modern".to_string(),
            storage_key: "clarity-settings".to_string(),
            font_step: 10,
            flags: FlagName::ALL.to_vec(),
            class_prefix: "clarity-".to_string(),
            scale_mode: ScaleMode::RootPercent,
            speech_lang: "he-IL".to_string(),
            locale: "he".to_string(),
        }
    }

    /// Look up a built-in profile by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }

    #[must_use]
    pub fn builtin_names() -> &'static [&'static str] {
        &["classic", "modern"]
    }

    #[must_use]
    pub fn offers(&self, flag: FlagName) -> bool {
        self.flags.contains(&flag)
    }

    /// Presentation class token for a flag, e.g. `clarity-high-contrast`.
    #[must_use]
    pub fn class_for(&self, flag: FlagName) -> String {
        format!("{}{}", self.class_prefix, flag.token())
    }

    /// Parse a profile from host-supplied JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an object of the expected field types.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_omits_motion_flag() {
        let classic = WidgetProfile::classic();
        assert!(!classic.offers(FlagName::DisableAnimations));
        assert_eq!(classic.font_step, 25);
        assert_eq!(classic.class_for(FlagName::HighContrast), "high-contrast");
    }

    #[test]
    fn modern_prefixes_classes() {
        let modern = WidgetProfile::modern();
        assert_eq!(
            modern.class_for(FlagName::DisableAnimations),
            "clarity-disable-animations"
        );
        assert!(FlagName::ALL.iter().all(|flag| modern.offers(*flag)));
    }

    #[test]
    fn partial_json_fills_from_modern() {
        let profile =
            WidgetProfile::from_json(r#"{"storage_key":"site-a11y","font_step":5}"#).unwrap();
        assert_eq!(profile.storage_key, "site-a11y");
        assert_eq!(profile.font_step, 5);
        assert_eq!(profile.scale_mode, ScaleMode::RootPercent);
        assert_eq!(profile.flags.len(), FlagName::ALL.len());
    }

    #[test]
    fn scale_mode_uses_kebab_case() {
        let profile = WidgetProfile::from_json(r#"{"scale_mode":"class-buckets"}"#).unwrap();
        assert_eq!(profile.scale_mode, ScaleMode::ClassBuckets);
        assert!(WidgetProfile::builtin("retro").is_none());
    }
}
