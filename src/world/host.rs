//! Capabilities the host simulation provides to the sunlight core
//!
//! Every world query goes through `MapView`; the core never reaches for
//! ambient map state, which keeps it testable against synthetic fixtures.

use crate::core::astronomy::Illumination;
use crate::core::types::{CellPos, RegionId, Rotation};
use crate::entity::agent::Agent;
use crate::world::path::Path;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Where a path or reachability query may stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathEndMode {
    /// Must stand on the target cell
    OnCell,
    /// Any cell touching the target (including diagonals) will do
    Touch,
}

/// Door rules for traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraverseMode {
    PassDoors,
    NoPassDoors,
}

/// How dangerous a region is to walk through, least to most
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Danger {
    #[default]
    None,
    Some,
    Deadly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraverseParams {
    pub mode: TraverseMode,
    /// Most dangerous region the search may enter
    pub max_danger: Danger,
}

impl TraverseParams {
    pub fn new(mode: TraverseMode) -> Self {
        Self {
            mode,
            max_danger: Danger::Deadly,
        }
    }

    pub fn pass_doors() -> Self {
        Self::new(TraverseMode::PassDoors)
    }

    /// Traversal as the agent itself would move. A fleeing agent will
    /// cross any danger to get out of the sun.
    pub fn for_agent(agent: &Agent) -> Self {
        let mode = if agent.capabilities.opens_doors {
            TraverseMode::PassDoors
        } else {
            TraverseMode::NoPassDoors
        };
        Self::new(mode)
    }

    pub fn with_max_danger(mut self, max_danger: Danger) -> Self {
        self.max_danger = max_danger;
        self
    }

    pub fn can_pass_doors(&self) -> bool {
        self.mode == TraverseMode::PassDoors
    }

    pub fn tolerates(&self, danger: Danger) -> bool {
        danger <= self.max_danger
    }
}

/// Structures the core may ask the host to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// A hole dug into the ground to hide from the sun
    EmergencyShelter,
}

impl StructureKind {
    /// Footprint (width, depth) before rotation
    pub fn footprint(&self) -> (i32, i32) {
        match self {
            StructureKind::EmergencyShelter => (1, 1),
        }
    }

    pub fn is_emergency_shelter(&self) -> bool {
        matches!(self, StructureKind::EmergencyShelter)
    }
}

/// Queryable map surface, immutable for the duration of one evaluation
pub trait MapView {
    /// Map size as (width, height) in cells
    fn size(&self) -> (i32, i32);

    fn in_bounds(&self, cell: CellPos) -> bool;

    /// Protected from sunlight (roofed)
    fn is_sheltered(&self, cell: CellPos) -> bool;

    fn is_walkable(&self, cell: CellPos) -> bool;

    /// Walkable and free for an agent to stand and work on
    fn is_standable(&self, cell: CellPos) -> bool;

    fn has_blocking_door(&self, cell: CellPos) -> bool;

    fn illumination(&self) -> Illumination;

    fn region_at(&self, cell: CellPos) -> Option<RegionId>;

    /// Region counts as indoors
    fn is_region_sheltered(&self, region: RegionId) -> bool;

    /// Region is a single doorway cell
    fn is_door_region(&self, region: RegionId) -> bool;

    /// Breadth-first search over the region graph for the closest region
    /// matching `predicate`, examining at most `search_cap` regions and
    /// never entering doors or danger that `traverse` forbids
    fn find_nearest_region(
        &self,
        from: RegionId,
        traverse: TraverseParams,
        predicate: &dyn Fn(RegionId) -> bool,
        search_cap: usize,
    ) -> Option<RegionId>;

    fn random_cell_in_region(
        &self,
        region: RegionId,
        predicate: &dyn Fn(CellPos) -> bool,
        rng: &mut dyn RngCore,
    ) -> Option<CellPos>;

    /// Path from `from` to `to` as `agent` would walk it. An empty path
    /// means no route exists.
    fn find_path(&self, from: CellPos, to: CellPos, agent: &Agent, end_mode: PathEndMode) -> Path<'_>;

    fn can_reach(&self, from: CellPos, to: CellPos, end_mode: PathEndMode, traverse: TraverseParams) -> bool;

    fn can_place_structure_at(&self, kind: StructureKind, cell: CellPos, rotation: Rotation) -> bool;

    /// The map is the player's settlement
    fn is_player_home(&self) -> bool {
        false
    }

    /// Bed assigned to the agent, if the host tracks one
    fn bed_for(&self, _agent: &Agent) -> Option<CellPos> {
        None
    }
}
