//! Day cycle and configuration integration tests

use std::path::Path;
use umbra::core::astronomy::{is_hazardous, ticks_until_hazard, SolarPhase};
use umbra::core::calendar::TICKS_PER_DAY;
use umbra::{Calendar, SunlightConfig};

#[test]
fn test_shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sunlight.toml");
    let config = SunlightConfig::load(&path).unwrap();
    assert_eq!(config, SunlightConfig::default());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = SunlightConfig::from_toml_str("hazard_threshold_percent = 40\n").unwrap();
    assert_eq!(config.hazard_threshold_percent, 40);
    assert_eq!(config.ticks_between_light_changes, 161);
}

#[test]
fn test_invalid_config_rejected() {
    assert!(SunlightConfig::from_toml_str("ticks_of_surviving_exposure = 0\n").is_err());
    assert!(SunlightConfig::from_toml_str("hazard_threshold_percent = 0\n").is_err());
}

#[test]
fn test_night_start_is_safe() {
    let config = SunlightConfig::default();
    let calendar = Calendar::starting_at_night();
    assert_eq!(calendar.solar_phase(), SolarPhase::Evening);
    assert!(!is_hazardous(calendar.illumination(), &config));
}

#[test]
fn test_dawn_counts_down_to_hazard() {
    let config = SunlightConfig::default();
    let mut calendar = Calendar::default();
    assert!(!is_hazardous(calendar.illumination(), &config));

    let mut last: Option<u32> = None;
    for _ in 0..(TICKS_PER_DAY / 100) {
        let light = calendar.illumination();
        if is_hazardous(light, &config) {
            break;
        }
        let remaining = ticks_until_hazard(light, &config).unwrap();
        if let Some(previous) = last {
            assert!(remaining <= previous);
        }
        last = Some(remaining);
        calendar.advance_by(100);
    }
    assert!(last.is_some());
    assert!(is_hazardous(calendar.illumination(), &config));
    assert_eq!(ticks_until_hazard(calendar.illumination(), &config), None);
}

#[test]
fn test_full_day_returns_to_start_light() {
    let mut calendar = Calendar::default();
    let morning = calendar.illumination();
    calendar.advance_by(TICKS_PER_DAY);
    assert_eq!(calendar.current_day(), 1);
    assert_eq!(calendar.illumination(), morning);
}
