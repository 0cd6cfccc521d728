//! Is a destination safe from the sun for this agent?

use crate::core::astronomy::{is_hazardous, ticks_until_hazard};
use crate::core::config::SunlightConfig;
use crate::core::types::CellPos;
use crate::entity::agent::Agent;
use crate::entity::tasks::CurrentTask;
use crate::sunlight::exposure::can_survive_exposure;
use crate::world::host::MapView;

/// A cell is safe when it is roofed and one of these holds:
/// - the sun is not lethal right now
/// - the agent can get there before sunrise, with leeway
/// - the agent survives the sunlit part of the walk
pub fn is_destination_safe<M: MapView + ?Sized>(
    map: &M,
    cell: CellPos,
    agent: &Agent,
    config: &SunlightConfig,
) -> bool {
    map.is_sheltered(cell)
        && (!is_hazardous(map.illumination(), config)
            || can_arrive_before_hazard(map, cell, agent, config, config.arrival_leeway_factor)
            || can_survive_exposure(map, cell, agent, config))
}

/// Straight-line travel estimate against the sunrise countdown
///
/// Uses the cardinal move cost over the truncated straight-line distance,
/// padded by `leeway_factor`. False whenever the countdown is unknown.
pub fn can_arrive_before_hazard<M: MapView + ?Sized>(
    map: &M,
    cell: CellPos,
    agent: &Agent,
    config: &SunlightConfig,
    leeway_factor: f64,
) -> bool {
    let Some(ticks_until) = ticks_until_hazard(map.illumination(), config) else {
        return false;
    };
    let distance = agent.position.distance_to(cell) as u32;
    let arrival = distance.saturating_mul(agent.movement.ticks_per_move_cardinal);
    let leeway = (arrival as f64 * leeway_factor) as u32;
    arrival.saturating_add(leeway) <= ticks_until
}

/// Whether the agent's current task keeps it out of the sun
pub fn is_task_safe<M: MapView + ?Sized>(
    map: &M,
    task: &CurrentTask,
    agent: &Agent,
    config: &SunlightConfig,
) -> bool {
    if task.is_digging_shelter() {
        return true;
    }
    task.target
        .is_some_and(|cell| cell.is_valid() && is_destination_safe(map, cell, agent, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::astronomy::Illumination;
    use crate::entity::agent::MovementSpeed;
    use crate::entity::tasks::TaskKind;
    use crate::world::grid_map::GridMap;

    fn map(light: f64) -> GridMap {
        GridMap::from_ascii("..........__").unwrap().with_illumination(Illumination::new(light))
    }

    fn agent() -> Agent {
        Agent::new("Mira", CellPos::new(0, 0)).with_movement(MovementSpeed {
            ticks_per_move_cardinal: 13,
            ticks_per_move_diagonal: 18,
        })
    }

    #[test]
    fn test_unroofed_is_never_safe() {
        let config = SunlightConfig::default();
        assert!(!is_destination_safe(&map(0.0), CellPos::new(5, 0), &agent(), &config));
    }

    #[test]
    fn test_roofed_is_safe_at_night() {
        let config = SunlightConfig::default();
        assert!(is_destination_safe(&map(0.1), CellPos::new(11, 0), &agent(), &config));
    }

    #[test]
    fn test_arrival_estimate_with_leeway() {
        let config = SunlightConfig::default();
        // 11 cells * 13 = 143, plus 71 leeway = 214 ticks needed
        let target = CellPos::new(11, 0);
        assert!(can_arrive_before_hazard(&map(0.58), target, &agent(), &config, 0.5));
        assert!(!can_arrive_before_hazard(&map(0.59), target, &agent(), &config, 0.5));
        assert!(can_arrive_before_hazard(&map(0.59), target, &agent(), &config, 0.0));
    }

    #[test]
    fn test_arrival_unknown_in_darkness() {
        let config = SunlightConfig::default();
        assert!(!can_arrive_before_hazard(&map(0.0), CellPos::new(1, 0), &agent(), &config, 0.5));
    }

    #[test]
    fn test_roofed_in_daylight_depends_on_exposure() {
        let config = SunlightConfig::default();
        let target = CellPos::new(11, 0);
        // 10 exposed cells * 18 = 180 ticks
        assert!(is_destination_safe(&map(1.0), target, &agent(), &config));
        let burnt = agent().with_exposure_stage(2);
        assert!(!is_destination_safe(&map(1.0), target, &burnt, &config));
    }

    #[test]
    fn test_digging_task_is_always_safe() {
        let config = SunlightConfig::default();
        let task = CurrentTask {
            kind: TaskKind::DigEmergencyShelter,
            target: None,
        };
        assert!(is_task_safe(&map(1.0), &task, &agent(), &config));
    }

    #[test]
    fn test_task_without_target_is_unsafe() {
        let config = SunlightConfig::default();
        let task = CurrentTask {
            kind: TaskKind::Work,
            target: None,
        };
        assert!(!is_task_safe(&map(0.0), &task, &agent(), &config));
        assert!(!is_task_safe(&map(0.0), &CurrentTask::goto(CellPos::INVALID), &agent(), &config));
        assert!(is_task_safe(&map(0.0), &CurrentTask::goto(CellPos::new(10, 0)), &agent(), &config));
    }
}
