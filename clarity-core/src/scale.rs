//! Font scale percentage and its bounds
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Text scale as an integer percentage, always within [`FontScale::MIN`]..=[`FontScale::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FontScale(u16);

impl FontScale {
    pub const MIN: Self = Self(75);
    pub const MAX: Self = Self(200);
    pub const DEFAULT: Self = Self(100);

    /// Build a scale, clamping into bounds.
    #[must_use]
    pub fn clamped(percent: i64) -> Self {
        let bounded = percent.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u16::try_from(bounded).unwrap_or(Self::DEFAULT.0))
    }

    /// Const-context variant of [`FontScale::clamped`].
    #[must_use]
    pub const fn from_percent(percent: u16) -> Self {
        if percent < Self::MIN.0 {
            Self::MIN
        } else if percent > Self::MAX.0 {
            Self::MAX
        } else {
            Self(percent)
        }
    }

    /// Shift by `delta` percentage points, saturating at the bounds.
    #[must_use]
    pub fn adjusted(self, delta: i32) -> Self {
        Self::clamped(i64::from(self.0) + i64::from(delta))
    }

    #[must_use]
    pub const fn percent(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == Self::DEFAULT.0
    }

    #[must_use]
    pub const fn bucket(self) -> FontBucket {
        FontBucket::for_percent(self.0)
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FontScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for FontScale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(Self::clamped(raw))
    }
}

/// Coarse size class for surfaces that express scale as a class token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontBucket {
    Small,
    Medium,
    Large,
    XLarge,
    XxLarge,
}

impl FontBucket {
    pub const ALL: [Self; 5] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::XLarge,
        Self::XxLarge,
    ];

    #[must_use]
    pub const fn for_percent(percent: u16) -> Self {
        match percent {
            0..=75 => Self::Small,
            76..=100 => Self::Medium,
            101..=125 => Self::Large,
            126..=150 => Self::XLarge,
            _ => Self::XxLarge,
        }
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Small => "font-size-small",
            Self::Medium => "font-size-medium",
            Self::Large => "font-size-large",
            Self::XLarge => "font-size-xlarge",
            Self::XxLarge => "font-size-xxlarge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_saturates_at_both_bounds() {
        assert_eq!(FontScale::clamped(190).adjusted(25), FontScale::MAX);
        assert_eq!(FontScale::MIN.adjusted(-25), FontScale::MIN);
        assert_eq!(FontScale::DEFAULT.adjusted(10).percent(), 110);
        assert_eq!(FontScale::DEFAULT.adjusted(i32::MAX), FontScale::MAX);
        assert_eq!(FontScale::DEFAULT.adjusted(i32::MIN), FontScale::MIN);
    }

    #[test]
    fn deserialize_clamps_out_of_range_values() {
        let high: FontScale = serde_json::from_str("500").unwrap();
        let low: FontScale = serde_json::from_str("-3").unwrap();
        assert_eq!(high, FontScale::MAX);
        assert_eq!(low, FontScale::MIN);
        assert!(serde_json::from_str::<FontScale>("\"big\"").is_err());
    }

    #[test]
    fn buckets_follow_legacy_thresholds() {
        assert_eq!(FontScale::MIN.bucket(), FontBucket::Small);
        assert_eq!(FontScale::DEFAULT.bucket(), FontBucket::Medium);
        assert_eq!(FontScale::clamped(125).bucket(), FontBucket::Large);
        assert_eq!(FontScale::clamped(150).bucket(), FontBucket::XLarge);
        assert_eq!(FontScale::MAX.bucket(), FontBucket::XxLarge);
    }
}
