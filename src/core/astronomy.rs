//! Sunlight clock - illumination levels and time until the sun turns lethal
//!
//! The host reports illumination as a scalar in [0, 1]. This module turns
//! that scalar into a hazard predicate and a countdown to hazard onset.

use crate::core::config::SunlightConfig;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Number of hours in a day
pub const HOURS_PER_DAY: u32 = 24;

/// Absorbs float noise such as `0.57 * 100.0 == 56.99999999999999`
const PERCENT_EPSILON: f64 = 1e-6;

// ============================================================================
// Illumination
// ============================================================================

/// Ambient light level, clamped to 0.0 (full dark) ..= 1.0 (noon)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Illumination(f64);

impl Illumination {
    pub const DARK: Illumination = Illumination(0.0);
    pub const FULL: Illumination = Illumination(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::DARK;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whole percentage points, truncated
    pub fn percent(&self) -> i32 {
        (self.0 * 100.0 + PERCENT_EPSILON).floor() as i32
    }
}

// ============================================================================
// Solar phases
// ============================================================================

/// Solar phase - 9 phases of the day with exact hour ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarPhase {
    /// 00:00-04:00 - Deepest darkness
    DeepNight,
    /// 04:00-06:00 - Sky begins to lighten
    PreDawn,
    /// 06:00-08:00 - Sun rises
    Dawn,
    /// 08:00-11:00 - Morning light
    Morning,
    /// 11:00-14:00 - Peak daylight
    Midday,
    /// 14:00-17:00 - Afternoon sun
    Afternoon,
    /// 17:00-19:00 - Sun sets
    Dusk,
    /// 19:00-22:00 - Twilight to dark
    Evening,
    /// 22:00-00:00 - Night begins
    Night,
}

impl SolarPhase {
    /// Get solar phase from hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour % HOURS_PER_DAY {
            0..=3 => SolarPhase::DeepNight,
            4..=5 => SolarPhase::PreDawn,
            6..=7 => SolarPhase::Dawn,
            8..=10 => SolarPhase::Morning,
            11..=13 => SolarPhase::Midday,
            14..=16 => SolarPhase::Afternoon,
            17..=18 => SolarPhase::Dusk,
            19..=21 => SolarPhase::Evening,
            _ => SolarPhase::Night, // 22, 23
        }
    }

    /// Base light level for this phase (0.0-1.0)
    pub fn base_light_level(&self) -> f64 {
        match self {
            SolarPhase::DeepNight => 0.0,
            SolarPhase::PreDawn => 0.1,
            SolarPhase::Dawn => 0.5,
            SolarPhase::Morning => 0.8,
            SolarPhase::Midday => 1.0,
            SolarPhase::Afternoon => 0.85,
            SolarPhase::Dusk => 0.5,
            SolarPhase::Evening => 0.2,
            SolarPhase::Night => 0.05,
        }
    }
}

/// Light level at a fractional hour, blending into the next hour's phase
pub fn light_at_hour(hour: f64) -> Illumination {
    let hour = hour.rem_euclid(HOURS_PER_DAY as f64);
    let whole = hour.floor() as u32;
    let blend = hour - whole as f64;
    let from = SolarPhase::from_hour(whole).base_light_level();
    let to = SolarPhase::from_hour(whole + 1).base_light_level();
    Illumination::new(from + (to - from) * blend)
}

// ============================================================================
// Clock model
// ============================================================================

/// Is the sun currently lethal?
pub fn is_hazardous(light: Illumination, config: &SunlightConfig) -> bool {
    light.percent() >= config.hazard_threshold_percent
}

/// Estimated ticks until sunlight becomes lethal
///
/// Returns `None` when the estimate is meaningless: in full darkness (the
/// curve is not rising yet) and once the threshold is already reached.
/// Otherwise `step * (threshold - current)` in whole percentage points.
pub fn ticks_until_hazard(light: Illumination, config: &SunlightConfig) -> Option<u32> {
    if light.value() <= 0.0 {
        return None;
    }
    let remaining = config.hazard_threshold_percent - light.percent();
    if remaining <= 0 {
        return None;
    }
    Some(config.ticks_between_light_changes.saturating_mul(remaining as u32))
}

// ============================================================================
// Tests
// ============================================================================
