//! Finding somewhere safe to go
//!
//! Two strategies, tried in order: the agent's remembered home point, then
//! a random cell in the nearest indoor region.

use crate::core::config::SunlightConfig;
use crate::core::types::CellPos;
use crate::entity::agent::Agent;
use crate::entity::tasks::ActionKind;
use crate::sunlight::safety::is_destination_safe;
use crate::world::host::{MapView, PathEndMode, TraverseParams};
use rand::{Rng, RngCore};

/// The home point, if the agent belongs here, it is set (not the origin)
/// and going there is safe
pub fn try_home_point<M: MapView + ?Sized>(map: &M, agent: &Agent, config: &SunlightConfig) -> Option<CellPos> {
    if !agent.is_home_affiliated() {
        return None;
    }
    let home = agent.home_point?;
    let usable = home.is_valid() && !home.is_origin() && map.in_bounds(home);
    if usable && is_destination_safe(map, home, agent, config) {
        Some(home)
    } else {
        None
    }
}

/// A random door-free cell in the closest indoor room. Doorways count as
/// indoors but are never picked as the room.
pub fn find_shelter_region_cell<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    config: &SunlightConfig,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    let start = map.region_at(agent.position)?;
    let region = map.find_nearest_region(
        start,
        TraverseParams::for_agent(agent),
        &|region| map.is_region_sheltered(region) && !map.is_door_region(region),
        config.region_search_cap,
    )?;
    map.random_cell_in_region(
        region,
        &|cell| cell.x > 0 && cell.z > 0 && map.in_bounds(cell) && !map.has_blocking_door(cell),
        rng,
    )
}

/// The nearest indoor cell, if going there is safe
pub fn try_shelter_region<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    config: &SunlightConfig,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    let cell = find_shelter_region_cell(map, agent, config, rng)?;
    is_destination_safe(map, cell, agent, config).then_some(cell)
}

/// Home point first, then the nearest indoor region. The region search
/// only runs when the home point fails.
pub fn find_safe_destination<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    config: &SunlightConfig,
    rng: &mut dyn RngCore,
) -> Option<(ActionKind, CellPos)> {
    if let Some(home) = try_home_point(map, agent, config) {
        tracing::debug!(agent = %agent.name, %home, "home point is safe");
        return Some((ActionKind::GoHome, home));
    }
    let cell = try_shelter_region(map, agent, config, rng)?;
    tracing::debug!(agent = %agent.name, %cell, "found indoor region");
    Some((ActionKind::GoToShelterRegion, cell))
}

/// A random roofed, walkable cell the agent can reach
pub fn find_cell_safe_from_hazard<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    attempts: usize,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    let (width, height) = map.size();
    if width <= 0 || height <= 0 {
        return None;
    }
    let traverse = TraverseParams::for_agent(agent);
    (0..attempts).find_map(|_| {
        let cell = CellPos::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let usable = !cell.is_origin()
            && map.in_bounds(cell)
            && map.is_sheltered(cell)
            && map.is_walkable(cell)
            && map.can_reach(agent.position, cell, PathEndMode::OnCell, traverse);
        usable.then_some(cell)
    })
}

/// Pick a home point for the agent: its bed on the player's home map,
/// otherwise any reachable roofed cell
pub fn determine_home_point<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    config: &SunlightConfig,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    if map.is_player_home() {
        if let Some(bed) = map.bed_for(agent) {
            return Some(bed);
        }
    }
    find_cell_safe_from_hazard(map, agent, config.safe_cell_attempts, rng)
}
