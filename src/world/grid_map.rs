//! In-memory grid map implementing the host capabilities
//!
//! Maps are usually built from ASCII art:
//!
//! | Glyph | Terrain |
//! |-------|---------|
//! | `.` | open ground (diggable) |
//! | `,` | bare rock (walkable, not diggable) |
//! | `_` | roofed floor |
//! | `#` | wall |
//! | `+` | door |

use crate::core::astronomy::Illumination;
use crate::core::error::{Result, UmbraError};
use crate::core::types::{AgentId, CellPos, RegionId, Rotation};
use crate::entity::agent::Agent;
use crate::world::host::{Danger, MapView, PathEndMode, StructureKind, TraverseParams};
use crate::world::path::{Path, PathPool};
use crate::world::pathfinding::{self, MoveCosts};
use crate::world::regions::RegionMap;
use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terrain of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Ground,
    Rock,
    Floor,
    Wall,
    Door,
}

impl Terrain {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Terrain::Ground),
            ',' => Some(Terrain::Rock),
            '_' => Some(Terrain::Floor),
            '#' => Some(Terrain::Wall),
            '+' => Some(Terrain::Door),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Terrain::Ground => '.',
            Terrain::Rock => ',',
            Terrain::Floor => '_',
            Terrain::Wall => '#',
            Terrain::Door => '+',
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(self, Terrain::Wall)
    }

    pub fn is_roofed(&self) -> bool {
        matches!(self, Terrain::Floor | Terrain::Wall | Terrain::Door)
    }

    pub fn is_door(&self) -> bool {
        matches!(self, Terrain::Door)
    }

    /// Soft enough to dig a hiding hole into
    pub fn is_diggable(&self) -> bool {
        matches!(self, Terrain::Ground)
    }
}

/// Rectangular map of terrain with derived regions
#[derive(Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    regions: RegionMap,
    illumination: Illumination,
    structures: AHashSet<CellPos>,
    dangers: AHashMap<CellPos, Danger>,
    beds: AHashMap<AgentId, CellPos>,
    player_home: bool,
    paths: PathPool,
}

impl GridMap {
    /// A map of open ground
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let terrain = vec![Terrain::Ground; (width * height) as usize];
        let regions = RegionMap::build(width, height, &terrain);
        Self {
            width,
            height,
            terrain,
            regions,
            illumination: Illumination::DARK,
            structures: AHashSet::new(),
            dangers: AHashMap::new(),
            beds: AHashMap::new(),
            player_home: false,
            paths: PathPool::new(),
        }
    }

    /// Parse a map from rows of glyphs. Surrounding blank lines and
    /// indentation are ignored; all rows must have the same width.
    pub fn from_ascii(art: &str) -> Result<Self> {
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(UmbraError::Scenario("map has no rows".into()));
        }

        let width = rows[0].chars().count();
        let mut terrain = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(UmbraError::Scenario(format!(
                    "map row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    width
                )));
            }
            for (col, glyph) in line.chars().enumerate() {
                let cell = Terrain::from_glyph(glyph).ok_or(UmbraError::MapParse { row, col, glyph })?;
                terrain.push(cell);
            }
        }

        let width = width as i32;
        let height = rows.len() as i32;
        let regions = RegionMap::build(width, height, &terrain);
        Ok(Self {
            width,
            height,
            terrain,
            regions,
            illumination: Illumination::DARK,
            structures: AHashSet::new(),
            dangers: AHashMap::new(),
            beds: AHashMap::new(),
            player_home: false,
            paths: PathPool::new(),
        })
    }

    pub fn with_illumination(mut self, light: Illumination) -> Self {
        self.illumination = light;
        self
    }

    pub fn set_illumination(&mut self, light: Illumination) {
        self.illumination = light;
    }

    pub fn set_player_home(&mut self, player_home: bool) {
        self.player_home = player_home;
    }

    pub fn assign_bed(&mut self, agent: AgentId, cell: CellPos) {
        self.beds.insert(agent, cell);
    }

    /// Flag a cell as dangerous (fire, traps). `Danger::None` clears it.
    pub fn mark_danger(&mut self, cell: CellPos, danger: Danger) {
        if danger == Danger::None {
            self.dangers.remove(&cell);
        } else {
            self.dangers.insert(cell, danger);
        }
    }

    /// Worst danger of any cell in the region
    pub fn region_danger(&self, region: RegionId) -> Danger {
        if self.dangers.is_empty() {
            return Danger::None;
        }
        self.regions
            .cells(region)
            .iter()
            .filter_map(|cell| self.dangers.get(cell).copied())
            .max()
            .unwrap_or_default()
    }

    pub fn terrain(&self, cell: CellPos) -> Option<Terrain> {
        self.index(cell).map(|idx| self.terrain[idx])
    }

    /// Change one cell and rebuild regions
    pub fn set_terrain(&mut self, cell: CellPos, terrain: Terrain) {
        self.paint([cell], terrain);
    }

    /// Change many cells and rebuild regions once
    pub fn paint(&mut self, cells: impl IntoIterator<Item = CellPos>, terrain: Terrain) {
        for cell in cells {
            if let Some(idx) = self.index(cell) {
                self.terrain[idx] = terrain;
            }
        }
        self.regions = RegionMap::build(self.width, self.height, &self.terrain);
    }

    /// Build a structure if placement is legal. Returns whether it was placed.
    pub fn place_structure(&mut self, kind: StructureKind, cell: CellPos, rotation: Rotation) -> bool {
        if !self.can_place_structure_at(kind, cell, rotation) {
            return false;
        }
        self.structures.extend(footprint_cells(kind, cell, rotation));
        true
    }

    pub fn has_structure(&self, cell: CellPos) -> bool {
        self.structures.contains(&cell)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Pool backing this map's paths
    pub fn path_pool(&self) -> &PathPool {
        &self.paths
    }

    fn index(&self, cell: CellPos) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.z * self.width + cell.x) as usize)
        } else {
            None
        }
    }
}

fn footprint_cells(kind: StructureKind, origin: CellPos, rotation: Rotation) -> impl Iterator<Item = CellPos> {
    let (w, d) = kind.footprint();
    let (w, d) = rotation.rotate_size(w, d);
    (0..d).flat_map(move |dz| (0..w).map(move |dx| origin.offset(dx, dz)))
}

impl MapView for GridMap {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn in_bounds(&self, cell: CellPos) -> bool {
        cell.x >= 0 && cell.z >= 0 && cell.x < self.width && cell.z < self.height
    }

    fn is_sheltered(&self, cell: CellPos) -> bool {
        self.terrain(cell).is_some_and(|t| t.is_roofed())
    }

    fn is_walkable(&self, cell: CellPos) -> bool {
        self.terrain(cell).is_some_and(|t| t.is_walkable())
    }

    fn is_standable(&self, cell: CellPos) -> bool {
        self.terrain(cell)
            .is_some_and(|t| t.is_walkable() && !t.is_door())
            && !self.structures.contains(&cell)
    }

    fn has_blocking_door(&self, cell: CellPos) -> bool {
        self.terrain(cell).is_some_and(|t| t.is_door())
    }

    fn illumination(&self) -> Illumination {
        self.illumination
    }

    fn region_at(&self, cell: CellPos) -> Option<RegionId> {
        self.index(cell).and_then(|idx| self.regions.region_of(idx))
    }

    fn is_region_sheltered(&self, region: RegionId) -> bool {
        self.regions.is_sheltered(region)
    }

    fn is_door_region(&self, region: RegionId) -> bool {
        self.regions.is_door(region)
    }

    fn find_nearest_region(
        &self,
        from: RegionId,
        traverse: TraverseParams,
        predicate: &dyn Fn(RegionId) -> bool,
        search_cap: usize,
    ) -> Option<RegionId> {
        self.regions
            .nearest(from, traverse, &|region| self.region_danger(region), predicate, search_cap)
    }

    fn random_cell_in_region(
        &self,
        region: RegionId,
        predicate: &dyn Fn(CellPos) -> bool,
        rng: &mut dyn RngCore,
    ) -> Option<CellPos> {
        let candidates: Vec<CellPos> = self
            .regions
            .cells(region)
            .iter()
            .copied()
            .filter(|cell| predicate(*cell))
            .collect();
        candidates.choose(rng).copied()
    }

    fn find_path(&self, from: CellPos, to: CellPos, agent: &Agent, end_mode: PathEndMode) -> Path<'_> {
        let mut buffer = self.paths.take_buffer();
        let costs = MoveCosts::for_agent(agent);
        let traverse = TraverseParams::for_agent(agent);
        if !pathfinding::find_path_into(self, from, to, costs, traverse, end_mode, &mut buffer) {
            buffer.clear();
        }
        self.paths.acquire(buffer)
    }

    fn can_reach(&self, from: CellPos, to: CellPos, end_mode: PathEndMode, traverse: TraverseParams) -> bool {
        pathfinding::can_reach(self, from, to, end_mode, traverse)
    }

    fn can_place_structure_at(&self, kind: StructureKind, cell: CellPos, rotation: Rotation) -> bool {
        footprint_cells(kind, cell, rotation).all(|c| {
            self.terrain(c).is_some_and(|t| t.is_diggable()) && !self.structures.contains(&c)
        })
    }

    fn is_player_home(&self) -> bool {
        self.player_home
    }

    fn bed_for(&self, agent: &Agent) -> Option<CellPos> {
        self.beds.get(&agent.id).copied()
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.terrain.chunks(self.width as usize) {
            let line: String = row.iter().map(Terrain::glyph).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
