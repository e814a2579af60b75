//! Symbolic share durations offered by the sharing dialog.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A symbolic share lifetime, resolved to an absolute expiry at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationPreset {
    /// 24 hours from creation.
    #[serde(rename = "24-hours")]
    TwentyFourHours,
    /// 3 days from creation.
    #[serde(rename = "3-days")]
    ThreeDays,
    /// 7 days from creation.
    #[serde(rename = "7-days")]
    SevenDays,
    /// 30 days from creation.
    #[serde(rename = "30-days")]
    ThirtyDays,
    /// A far-future expiry; there is no "no expiry" sentinel.
    #[serde(rename = "never")]
    Never,
}

impl DurationPreset {
    /// Resolves the preset to an absolute expiry.
    ///
    /// `never_days` is the configured horizon used for [`DurationPreset::Never`].
    pub fn expires_at(&self, now: DateTime<Utc>, never_days: i64) -> DateTime<Utc> {
        let span = match self {
            Self::TwentyFourHours => Duration::hours(24),
            Self::ThreeDays => Duration::days(3),
            Self::SevenDays => Duration::days(7),
            Self::ThirtyDays => Duration::days(30),
            Self::Never => Duration::days(never_days),
        };
        now + span
    }

    /// Wire name of the preset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24-hours",
            Self::ThreeDays => "3-days",
            Self::SevenDays => "7-days",
            Self::ThirtyDays => "30-days",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for DurationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24-hours" => Ok(Self::TwentyFourHours),
            "3-days" => Ok(Self::ThreeDays),
            "7-days" => Ok(Self::SevenDays),
            "30-days" => Ok(Self::ThirtyDays),
            "never" => Ok(Self::Never),
            other => Err(format!("Unknown duration preset: {other}")),
        }
    }
}
