//! Forward simulation of sunlight exposure along a path
//!
//! Walks a freshly computed path once, counting unroofed cells, and turns
//! the count into a survivability verdict for the agent.

use crate::core::config::SunlightConfig;
use crate::core::types::CellPos;
use crate::entity::agent::Agent;
use crate::world::host::{MapView, PathEndMode};
use crate::world::path::Path;

/// Result of simulating a walk to a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureEstimate {
    /// Path cells without a roof, destination excluded
    pub exposed_cells: u32,
    /// Sunlit ticks on arrival, counting damage already taken.
    /// Zero when no cell is exposed.
    pub ticks_to_arrive: u32,
    pub survivable: bool,
}

/// Consume `path`, counting unroofed cells before the final node
///
/// The path is dropped on return, releasing its buffer.
pub fn count_exposed_cells<M: MapView + ?Sized>(map: &M, mut path: Path<'_>) -> u32 {
    let mut exposed = 0;
    while path.nodes_left_count() > 1 {
        let Some(cell) = path.consume_next_node() else {
            break;
        };
        if !map.is_sheltered(cell) {
            exposed += 1;
        }
    }
    exposed
}

/// Ticks of exposure the agent has effectively already spent
pub fn accumulated_exposure_ticks(agent: &Agent, config: &SunlightConfig) -> u32 {
    (config.ticks_per_stage() * agent.exposure_stage as f64) as u32
}

/// Simulate the agent walking to `destination` in the current light
pub fn estimate_exposure<M: MapView + ?Sized>(
    map: &M,
    destination: CellPos,
    agent: &Agent,
    config: &SunlightConfig,
) -> ExposureEstimate {
    let path = map.find_path(agent.position, destination, agent, PathEndMode::OnCell);
    let exposed_cells = count_exposed_cells(map, path);
    tracing::trace!(agent = %agent.name, %destination, exposed_cells, "exposure walk");

    if exposed_cells == 0 {
        return ExposureEstimate {
            exposed_cells,
            ticks_to_arrive: 0,
            survivable: true,
        };
    }

    let ticks_to_arrive = exposed_cells
        .saturating_mul(agent.movement.ticks_per_move_diagonal)
        .saturating_add(accumulated_exposure_ticks(agent, config));

    ExposureEstimate {
        exposed_cells,
        ticks_to_arrive,
        survivable: ticks_to_arrive <= config.ticks_of_surviving_exposure,
    }
}

/// Can the agent walk to `destination` without burning to death?
pub fn can_survive_exposure<M: MapView + ?Sized>(
    map: &M,
    destination: CellPos,
    agent: &Agent,
    config: &SunlightConfig,
) -> bool {
    estimate_exposure(map, destination, agent, config).survivable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::agent::MovementSpeed;
    use crate::world::grid_map::GridMap;

    fn walker(stage: u32) -> Agent {
        Agent::new("Mira", CellPos::new(0, 0))
            .with_movement(MovementSpeed {
                ticks_per_move_cardinal: 13,
                ticks_per_move_diagonal: 13,
            })
            .with_exposure_stage(stage)
    }

    #[test]
    fn test_three_exposed_cells_unharmed_is_survivable() {
        let map = GridMap::from_ascii("...__").unwrap();
        let estimate = estimate_exposure(&map, CellPos::new(4, 0), &walker(0), &SunlightConfig::default());
        assert_eq!(estimate.exposed_cells, 3);
        assert_eq!(estimate.ticks_to_arrive, 39);
        assert!(estimate.survivable);
    }

    #[test]
    fn test_damage_stage_consumes_budget() {
        let map = GridMap::from_ascii("...__").unwrap();
        let estimate = estimate_exposure(&map, CellPos::new(4, 0), &walker(2), &SunlightConfig::default());
        assert_eq!(estimate.ticks_to_arrive, 2739);
        assert!(!estimate.survivable);
    }

    #[test]
    fn test_zero_exposure_survives_any_stage() {
        let map = GridMap::from_ascii("_____").unwrap();
        let estimate = estimate_exposure(&map, CellPos::new(4, 0), &walker(9), &SunlightConfig::default());
        assert_eq!(estimate.exposed_cells, 0);
        assert!(estimate.survivable);
    }

    #[test]
    fn test_unreachable_destination_counts_nothing() {
        let map = GridMap::from_ascii("..#__").unwrap();
        let estimate = estimate_exposure(&map, CellPos::new(4, 0), &walker(3), &SunlightConfig::default());
        assert_eq!(estimate.exposed_cells, 0);
        assert!(estimate.survivable);
    }

    #[test]
    fn test_path_released_after_walk() {
        let map = GridMap::from_ascii("...__").unwrap();
        estimate_exposure(&map, CellPos::new(4, 0), &walker(0), &SunlightConfig::default());
        assert_eq!(map.path_pool().outstanding(), 0);
        assert_eq!(map.path_pool().idle_buffers(), 1);
    }

    #[test]
    fn test_destination_cell_not_counted() {
        let path = Path::detached(vec![CellPos::new(0, 0), CellPos::new(1, 0)]);
        let map = GridMap::open(2, 1);
        // Only the start cell is walked; the destination is excluded
        assert_eq!(count_exposed_cells(&map, path), 1);
    }

    #[test]
    fn test_accumulated_ticks_per_stage() {
        let config = SunlightConfig::default();
        assert_eq!(accumulated_exposure_ticks(&walker(0), &config), 0);
        assert_eq!(accumulated_exposure_ticks(&walker(1), &config), 1350);
        assert_eq!(accumulated_exposure_ticks(&walker(2), &config), 2700);
    }
}
