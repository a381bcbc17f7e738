//! Pitch zones for range checks
//!
//! Zones are rectangles in StatsBomb pitch coordinates with inclusive lower
//! and exclusive upper bounds. Every zone-style rule (thirds, halves, flanks,
//! centre channel, the box) is an instance of the same rectangle.

use serde::{Deserialize, Serialize};

use crate::event::PitchPoint;

/// Upper x bound of the default (whole pitch) zone
pub const ZONE_X_LIMIT: f64 = 121.0;
/// Upper y bound of the default (whole pitch) zone
pub const ZONE_Y_LIMIT: f64 = 81.0;

/// Rectangular pitch zone: `x_min <= x < x_max && y_min <= y < y_max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ZoneRepr", into = "ZoneBounds")]
pub struct Zone {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Zone {
    pub const FULL: Zone = Zone { x_min: 0.0, y_min: 0.0, x_max: ZONE_X_LIMIT, y_max: ZONE_Y_LIMIT };
    pub const DEFENSIVE_THIRD: Zone = Zone::FULL.with_x_max(40.0);
    pub const DEFENSIVE_HALF: Zone = Zone::FULL.with_x_max(60.0);
    pub const OFFENSIVE_HALF: Zone = Zone::FULL.with_x_min(60.0);
    pub const OFFENSIVE_THIRD: Zone = Zone::FULL.with_x_min(80.0);
    pub const CENTER: Zone = Zone::FULL.with_y_min(30.0).with_y_max(50.0);
    pub const LEFT_FLANK: Zone = Zone::FULL.with_y_max(20.0);
    pub const RIGHT_FLANK: Zone = Zone::FULL.with_y_min(60.0);

    pub const fn with_x_min(mut self, x_min: f64) -> Self {
        self.x_min = x_min;
        self
    }

    pub const fn with_x_max(mut self, x_max: f64) -> Self {
        self.x_max = x_max;
        self
    }

    pub const fn with_y_min(mut self, y_min: f64) -> Self {
        self.y_min = y_min;
        self
    }

    pub const fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = y_max;
        self
    }

    pub fn contains(&self, p: PitchPoint) -> bool {
        (self.x_min <= p.x && p.x < self.x_max) && (self.y_min <= p.y && p.y < self.y_max)
    }

    /// Overlap of two zones (may be empty)
    pub fn intersect(&self, other: &Zone) -> Zone {
        Zone {
            x_min: self.x_min.max(other.x_min),
            y_min: self.y_min.max(other.y_min),
            x_max: self.x_max.min(other.x_max),
            y_max: self.y_max.min(other.y_max),
        }
    }

    /// Bounds are finite and non-empty on both axes
    pub fn is_well_formed(&self) -> bool {
        [self.x_min, self.y_min, self.x_max, self.y_max].iter().all(|v| v.is_finite())
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::FULL
    }
}

/// Named zone presets usable in catalogs (`zone: offensive_third`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonePreset {
    DefensiveThird,
    DefensiveHalf,
    OffensiveHalf,
    OffensiveThird,
    Center,
    LeftFlank,
    RightFlank,
}

impl ZonePreset {
    pub fn zone(self) -> Zone {
        match self {
            ZonePreset::DefensiveThird => Zone::DEFENSIVE_THIRD,
            ZonePreset::DefensiveHalf => Zone::DEFENSIVE_HALF,
            ZonePreset::OffensiveHalf => Zone::OFFENSIVE_HALF,
            ZonePreset::OffensiveThird => Zone::OFFENSIVE_THIRD,
            ZonePreset::Center => Zone::CENTER,
            ZonePreset::LeftFlank => Zone::LEFT_FLANK,
            ZonePreset::RightFlank => Zone::RIGHT_FLANK,
        }
    }
}

/// Explicit bounds; omitted bounds default to the whole pitch
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct ZoneBounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Zone::FULL.into()
    }
}

impl From<Zone> for ZoneBounds {
    fn from(z: Zone) -> Self {
        Self { x_min: z.x_min, y_min: z.y_min, x_max: z.x_max, y_max: z.y_max }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ZoneRepr {
    Preset(ZonePreset),
    Bounds(ZoneBounds),
}

impl From<ZoneRepr> for Zone {
    fn from(repr: ZoneRepr) -> Self {
        match repr {
            ZoneRepr::Preset(preset) => preset.zone(),
            ZoneRepr::Bounds(b) => Zone { x_min: b.x_min, y_min: b.y_min, x_max: b.x_max, y_max: b.y_max },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_half_open() {
        let third = Zone::DEFENSIVE_THIRD;
        assert!(third.contains(PitchPoint::new(0.0, 0.0)));
        assert!(third.contains(PitchPoint::new(39.99, 80.0)));
        assert!(!third.contains(PitchPoint::new(40.0, 10.0)));

        assert!(Zone::OFFENSIVE_THIRD.contains(PitchPoint::new(80.0, 40.0)));
        assert!(!Zone::OFFENSIVE_THIRD.contains(PitchPoint::new(79.9, 40.0)));
    }

    #[test]
    fn test_flanks_and_center() {
        assert!(Zone::LEFT_FLANK.contains(PitchPoint::new(60.0, 5.0)));
        assert!(!Zone::LEFT_FLANK.contains(PitchPoint::new(60.0, 20.0)));
        assert!(Zone::RIGHT_FLANK.contains(PitchPoint::new(60.0, 60.0)));
        assert!(Zone::CENTER.contains(PitchPoint::new(60.0, 30.0)));
        assert!(!Zone::CENTER.contains(PitchPoint::new(60.0, 50.0)));
    }

    #[test]
    fn test_intersect() {
        let box_edge = Zone::CENTER.intersect(&Zone::FULL.with_x_min(105.0));
        assert!(box_edge.contains(PitchPoint::new(110.0, 40.0)));
        assert!(!box_edge.contains(PitchPoint::new(100.0, 40.0)));
        assert!(box_edge.is_well_formed());

        let empty = Zone::DEFENSIVE_THIRD.intersect(&Zone::OFFENSIVE_THIRD);
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn test_deserialize_preset_or_bounds() {
        let preset: Zone = serde_yaml::from_str("offensive_third").unwrap();
        assert_eq!(preset, Zone::OFFENSIVE_THIRD);

        let bounds: Zone = serde_yaml::from_str("x_min: 105").unwrap();
        assert_eq!(bounds, Zone::FULL.with_x_min(105.0));
    }
}
