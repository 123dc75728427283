//! Boost tiers and the boost window arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::events;

/// Paid visibility tier of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum BoostLevel {
    Basic = 1,
    Premium = 2,
}

impl BoostLevel {
    /// How long one purchase of this tier keeps an event boosted
    pub fn duration(&self) -> Duration {
        match self {
            BoostLevel::Basic => Duration::hours(24),
            BoostLevel::Premium => Duration::hours(72),
        }
    }

    pub fn as_i16(&self) -> i16 {
        *self as i16
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(BoostLevel::Basic),
            2 => Some(BoostLevel::Premium),
            _ => None,
        }
    }

    /// Reads the tier from checkout metadata. Anything but an explicit "2" is Basic.
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("2") => BoostLevel::Premium,
            _ => BoostLevel::Basic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoostLevel::Basic => "Basic",
            BoostLevel::Premium => "Premium",
        }
    }
}

impl TryFrom<i16> for BoostLevel {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        BoostLevel::from_i16(value).ok_or_else(|| format!("invalid boost level {}", value))
    }
}

impl From<BoostLevel> for i16 {
    fn from(level: BoostLevel) -> Self {
        level.as_i16()
    }
}

/// Result of applying one purchase to an event's current boost state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostWindow {
    pub level: i16,
    pub until: DateTime<Utc>,
}

/// Computes the boost state after a purchase.
///
/// A window still open at `now` is extended from its end and keeps at least its
/// level. An expired window counts as no boost: the purchase starts from `now` at
/// the purchased level.
pub fn next_boost_window(
    current_until: Option<DateTime<Utc>>,
    current_level: i16,
    purchased: BoostLevel,
    now: DateTime<Utc>,
) -> BoostWindow {
    match current_until {
        Some(until) if until > now => BoostWindow {
            level: current_level.max(purchased.as_i16()),
            until: until + purchased.duration(),
        },
        _ => BoostWindow {
            level: purchased.as_i16(),
            until: now + purchased.duration(),
        },
    }
}

/// The boost an event effectively has at `now`, if any.
/// Expired windows count as unboosted whatever the stored flags say.
pub fn effective_boost(event: &events::Model, now: DateTime<Utc>) -> Option<BoostWindow> {
    match event.boost_until {
        Some(until) if event.is_boosted && event.boost_level > 0 && until > now => {
            Some(BoostWindow {
                level: event.boost_level,
                until,
            })
        }
        _ => None,
    }
}
