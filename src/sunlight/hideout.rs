//! Last resort: dig a hole and hide from the sun

use crate::core::config::SunlightConfig;
use crate::core::types::{CellPos, Rotation};
use crate::entity::agent::Agent;
use crate::world::host::{MapView, PathEndMode, StructureKind, TraverseParams};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Find a spot for `kind` at or near `center`
///
/// `center` wins if the structure fits there. Otherwise a random nearby
/// cell that is standable, accepts the structure, and can reach a random
/// anchor inside the clipped neighbourhood square.
pub fn find_hideout_spot<M: MapView + ?Sized>(
    map: &M,
    kind: StructureKind,
    rotation: Rotation,
    center: CellPos,
    radius: i32,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    if map.can_place_structure_at(kind, center, rotation) {
        return Some(center);
    }

    let (width, height) = map.size();
    let min_x = center.x.saturating_sub(radius).max(0);
    let max_x = center.x.saturating_add(radius).min(width - 1);
    let min_z = center.z.saturating_sub(radius).max(0);
    let max_z = center.z.saturating_add(radius).min(height - 1);
    if min_x > max_x || min_z > max_z {
        return None;
    }
    let anchor = CellPos::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_z..=max_z));

    let radius_sq = i64::from(radius) * i64::from(radius);
    let mut candidates: Vec<CellPos> = (min_z..=max_z)
        .flat_map(|z| (min_x..=max_x).map(move |x| CellPos::new(x, z)))
        .filter(|cell| {
            let dx = i64::from(cell.x) - i64::from(center.x);
            let dz = i64::from(cell.z) - i64::from(center.z);
            dx * dx + dz * dz <= radius_sq
        })
        .collect();
    candidates.shuffle(rng);

    candidates.into_iter().find(|&cell| {
        map.is_standable(cell)
            && map.can_place_structure_at(kind, cell, rotation)
            && map.can_reach(cell, anchor, PathEndMode::Touch, TraverseParams::pass_doors())
    })
}

/// Emergency shelter spot for the agent, if it can dig and is not digging already
pub fn try_dig_hideout<M: MapView + ?Sized>(
    map: &M,
    agent: &Agent,
    config: &SunlightConfig,
    rng: &mut dyn RngCore,
) -> Option<CellPos> {
    if !agent.can_do_manual_labor() {
        return None;
    }
    if agent.current_task.is_some_and(|task| task.is_digging_shelter()) {
        return None;
    }
    let rotation = Rotation::random(rng);
    find_hideout_spot(
        map,
        StructureKind::EmergencyShelter,
        rotation,
        agent.position,
        config.hideout_search_radius,
        rng,
    )
}
