//! Canonical settings record and sparse overrides
use serde::{Deserialize, Serialize};

use crate::flags::{FlagName, Flags};
use crate::scale::FontScale;

/// The full preference state of one widget instance.
///
/// Every field has a total default, so a record never carries an unset value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsRecord {
    pub font_scale: FontScale,
    pub flags: Flags,
}

impl SettingsRecord {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub const fn flag(&self, flag: FlagName) -> bool {
        self.flags.get(flag)
    }

    pub fn set_flag(&mut self, flag: FlagName, value: bool) {
        self.flags.set(flag, value);
    }

    /// Overwrite the fields `partial` names; everything else is left as is.
    pub fn merge(&mut self, partial: &PartialSettings) {
        self.merge_where(partial, |_| true);
    }

    /// Like [`SettingsRecord::merge`], skipping flags for which `accept` is false.
    pub fn merge_where(&mut self, partial: &PartialSettings, accept: impl Fn(FlagName) -> bool) {
        if let Some(scale) = partial.font_scale {
            self.font_scale = scale;
        }
        for &(flag, value) in partial.flags {
            if accept(flag) {
                self.flags.set(flag, value);
            } else {
                log::debug!("ignoring override for unavailable flag {flag}");
            }
        }
    }

    /// Turn off every flag `keep` rejects.
    pub fn retain_flags(&mut self, keep: impl Fn(FlagName) -> bool) {
        for flag in FlagName::ALL {
            if !keep(flag) {
                self.flags.set(flag, false);
            }
        }
    }
}

/// A sparse subset of [`SettingsRecord`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialSettings {
    pub font_scale: Option<FontScale>,
    pub flags: &'static [(FlagName, bool)],
}

impl PartialSettings {
    pub const EMPTY: Self = Self {
        font_scale: None,
        flags: &[],
    };

    #[must_use]
    pub fn touches(&self, flag: FlagName) -> bool {
        self.flags.iter().any(|(name, _)| *name == flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIGGER_UNDERLINED: PartialSettings = PartialSettings {
        font_scale: Some(FontScale::MAX),
        flags: &[(FlagName::UnderlineLinks, true)],
    };

    #[test]
    fn merge_only_touches_named_fields() {
        let mut record = SettingsRecord::default();
        record.set_flag(FlagName::HighContrast, true);
        record.merge(&BIGGER_UNDERLINED);
        assert_eq!(record.font_scale, FontScale::MAX);
        assert!(record.flag(FlagName::UnderlineLinks));
        assert!(record.flag(FlagName::HighContrast));
        assert!(!record.flag(FlagName::LargeCursor));
    }

    #[test]
    fn empty_partial_is_identity() {
        let mut record = SettingsRecord::default();
        record.set_flag(FlagName::LargeCursor, true);
        let before = record;
        record.merge(&PartialSettings::EMPTY);
        assert_eq!(record, before);
    }

    #[test]
    fn merge_where_skips_rejected_flags() {
        let mut record = SettingsRecord::default();
        record.merge_where(&BIGGER_UNDERLINED, |flag| flag != FlagName::UnderlineLinks);
        assert_eq!(record.font_scale, FontScale::MAX);
        assert!(!record.flag(FlagName::UnderlineLinks));
    }

    #[test]
    fn canonical_shape_serializes_camel_case() {
        let mut record = SettingsRecord::default();
        record.set_flag(FlagName::ReadableFont, true);
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["fontScale"], 100);
        assert_eq!(json["flags"]["readableFont"], true);
        assert_eq!(json["flags"]["highContrast"], false);
    }
}
