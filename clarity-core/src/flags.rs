//! Named boolean accessibility preferences
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed accessibility toggles a widget can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagName {
    HighContrast,
    LargeCursor,
    UnderlineLinks,
    ReadableFont,
    DisableAnimations,
}

impl FlagName {
    /// Every flag, in panel order.
    pub const ALL: [Self; 5] = [
        Self::HighContrast,
        Self::ReadableFont,
        Self::UnderlineLinks,
        Self::LargeCursor,
        Self::DisableAnimations,
    ];

    /// Key used in persisted blobs.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HighContrast => "highContrast",
            Self::LargeCursor => "largeCursor",
            Self::UnderlineLinks => "underlineLinks",
            Self::ReadableFont => "readableFont",
            Self::DisableAnimations => "disableAnimations",
        }
    }

    /// Kebab-case token used for presentation classes and element ids.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::HighContrast => "high-contrast",
            Self::LargeCursor => "large-cursor",
            Self::UnderlineLinks => "underline-links",
            Self::ReadableFont => "readable-font",
            Self::DisableAnimations => "disable-animations",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown accessibility flag: {0}")]
pub struct UnknownFlag(pub String);

impl FromStr for FlagName {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.key() == s || flag.token() == s)
            .ok_or_else(|| UnknownFlag(s.to_string()))
    }
}

/// Total mapping from [`FlagName`] to on/off.
///
/// Missing keys deserialize as `false` and unknown keys are ignored, so blobs
/// written before a flag existed still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    pub high_contrast: bool,
    pub large_cursor: bool,
    pub underline_links: bool,
    pub readable_font: bool,
    pub disable_animations: bool,
}

impl Flags {
    #[must_use]
    pub const fn get(&self, flag: FlagName) -> bool {
        match flag {
            FlagName::HighContrast => self.high_contrast,
            FlagName::LargeCursor => self.large_cursor,
            FlagName::UnderlineLinks => self.underline_links,
            FlagName::ReadableFont => self.readable_font,
            FlagName::DisableAnimations => self.disable_animations,
        }
    }

    pub fn set(&mut self, flag: FlagName, value: bool) {
        let slot = match flag {
            FlagName::HighContrast => &mut self.high_contrast,
            FlagName::LargeCursor => &mut self.large_cursor,
            FlagName::UnderlineLinks => &mut self.underline_links,
            FlagName::ReadableFont => &mut self.readable_font,
            FlagName::DisableAnimations => &mut self.disable_animations,
        };
        *slot = value;
    }

    /// Flags currently switched on, in panel order.
    pub fn enabled(&self) -> impl Iterator<Item = FlagName> + '_ {
        FlagName::ALL.into_iter().filter(|flag| self.get(*flag))
    }

    #[must_use]
    pub fn none_enabled(&self) -> bool {
        self.enabled().next().is_none()
    }
}
