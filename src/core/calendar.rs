//! Calendar system for time-of-day tracking
//!
//! Drives the host's illumination curve from the simulation tick.

use crate::core::astronomy::{light_at_hour, Illumination, SolarPhase, HOURS_PER_DAY};
use crate::core::types::Tick;
use serde::{Deserialize, Serialize};

/// Ticks in one simulated day
pub const TICKS_PER_DAY: u64 = 60_000;

/// Hour of day at tick zero
pub const START_HOUR: u32 = 6;

/// Offset applied when a game should begin in the evening instead of at dawn
pub const NIGHT_START_OFFSET: u64 = 32_500;

/// Calendar tracks simulation time with hour granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    tick: Tick,
    ticks_per_day: u64,
}

impl Calendar {
    pub fn new(ticks_per_day: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_day: ticks_per_day.max(1),
        }
    }

    /// A calendar whose first tick falls in the evening
    pub fn starting_at_night() -> Self {
        let mut calendar = Self::default();
        calendar.advance_by(NIGHT_START_OFFSET);
        calendar
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn advance_by(&mut self, ticks: u64) {
        self.tick += ticks;
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn current_day(&self) -> u64 {
        self.tick / self.ticks_per_day
    }

    /// Fractional hour of day, accounting for the dawn start
    pub fn hour_of_day(&self) -> f64 {
        let tick_in_day = self.tick % self.ticks_per_day;
        let hours = tick_in_day as f64 * HOURS_PER_DAY as f64 / self.ticks_per_day as f64;
        (hours + START_HOUR as f64) % HOURS_PER_DAY as f64
    }

    pub fn current_hour(&self) -> u32 {
        self.hour_of_day().floor() as u32
    }

    pub fn solar_phase(&self) -> SolarPhase {
        SolarPhase::from_hour(self.current_hour())
    }

    pub fn illumination(&self) -> Illumination {
        light_at_hour(self.hour_of_day())
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(TICKS_PER_DAY)
    }
}
