//! Region partition of a grid map
//!
//! A region is a 4-connected patch of walkable cells sharing the same roof
//! state. Every door is a region of its own, so door rules can be applied
//! when walking the region graph.

use crate::core::types::{CellPos, RegionId};
use crate::world::grid_map::Terrain;
use crate::world::host::{Danger, TraverseParams};
use ahash::AHashSet;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct RegionInfo {
    cells: Vec<CellPos>,
    sheltered: bool,
    door: bool,
    neighbors: Vec<RegionId>,
}

#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    cell_regions: Vec<Option<RegionId>>,
    regions: Vec<RegionInfo>,
}

impl RegionMap {
    /// Flood-fill `terrain` (row-major, `width * height`) into regions
    pub fn build(width: i32, height: i32, terrain: &[Terrain]) -> Self {
        let index = |cell: CellPos| -> Option<usize> {
            if cell.x >= 0 && cell.z >= 0 && cell.x < width && cell.z < height {
                Some((cell.z * width + cell.x) as usize)
            } else {
                None
            }
        };

        let mut cell_regions: Vec<Option<RegionId>> = vec![None; terrain.len()];
        let mut regions: Vec<RegionInfo> = Vec::new();

        for z in 0..height {
            for x in 0..width {
                let seed = CellPos::new(x, z);
                let Some(seed_idx) = index(seed) else {
                    continue;
                };
                let kind = terrain[seed_idx];
                if !kind.is_walkable() || cell_regions[seed_idx].is_some() {
                    continue;
                }

                let id = RegionId(regions.len() as u32);
                let mut cells = Vec::new();
                cell_regions[seed_idx] = Some(id);

                if kind.is_door() {
                    cells.push(seed);
                } else {
                    let mut queue = VecDeque::from([seed]);
                    while let Some(cell) = queue.pop_front() {
                        cells.push(cell);
                        for next in cell.cardinal_neighbors() {
                            let Some(idx) = index(next) else {
                                continue;
                            };
                            let t = terrain[idx];
                            if cell_regions[idx].is_none()
                                && t.is_walkable()
                                && !t.is_door()
                                && t.is_roofed() == kind.is_roofed()
                            {
                                cell_regions[idx] = Some(id);
                                queue.push_back(next);
                            }
                        }
                    }
                }

                regions.push(RegionInfo {
                    cells,
                    sheltered: kind.is_roofed(),
                    door: kind.is_door(),
                    neighbors: Vec::new(),
                });
            }
        }

        // Link regions that touch orthogonally
        for (i, region) in regions.iter_mut().enumerate() {
            let mut linked = AHashSet::new();
            for cell in &region.cells {
                for next in cell.cardinal_neighbors() {
                    if let Some(other) = index(next).and_then(|idx| cell_regions[idx]) {
                        if other.0 as usize != i {
                            linked.insert(other);
                        }
                    }
                }
            }
            let mut neighbors: Vec<RegionId> = linked.into_iter().collect();
            neighbors.sort_by_key(|r| r.0);
            region.neighbors = neighbors;
        }

        Self {
            cell_regions,
            regions,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region_of(&self, cell_index: usize) -> Option<RegionId> {
        self.cell_regions.get(cell_index).copied().flatten()
    }

    pub fn is_sheltered(&self, region: RegionId) -> bool {
        self.regions
            .get(region.0 as usize)
            .is_some_and(|r| r.sheltered)
    }

    pub fn is_door(&self, region: RegionId) -> bool {
        self.regions.get(region.0 as usize).is_some_and(|r| r.door)
    }

    pub fn cells(&self, region: RegionId) -> &[CellPos] {
        self.regions
            .get(region.0 as usize)
            .map(|r| r.cells.as_slice())
            .unwrap_or(&[])
    }

    /// Breadth-first search for the closest matching region, `from` included.
    /// Neighbours whose `danger_of` exceeds the traversal tolerance are not entered.
    pub fn nearest(
        &self,
        from: RegionId,
        traverse: TraverseParams,
        danger_of: &dyn Fn(RegionId) -> Danger,
        predicate: &dyn Fn(RegionId) -> bool,
        search_cap: usize,
    ) -> Option<RegionId> {
        if from.0 as usize >= self.regions.len() {
            return None;
        }

        let mut visited = AHashSet::new();
        let mut queue = VecDeque::from([from]);
        visited.insert(from);
        let mut examined = 0;

        while let Some(region) = queue.pop_front() {
            if examined >= search_cap {
                break;
            }
            examined += 1;

            if predicate(region) {
                return Some(region);
            }

            for &next in &self.regions[region.0 as usize].neighbors {
                if self.regions[next.0 as usize].door && !traverse.can_pass_doors() {
                    continue;
                }
                if !traverse.tolerates(danger_of(next)) {
                    continue;
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::host::TraverseMode;

    fn safe(_: RegionId) -> Danger {
        Danger::None
    }

    fn indoor_room(map: &RegionMap) -> impl Fn(RegionId) -> bool + '_ {
        move |r| map.is_sheltered(r) && !map.is_door(r)
    }

    fn parse(rows: &[&str]) -> (i32, i32, Vec<Terrain>) {
        let terrain = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| Terrain::from_glyph(c).unwrap()))
            .collect();
        (rows[0].len() as i32, rows.len() as i32, terrain)
    }

    #[test]
    fn test_roof_boundary_splits_regions() {
        let (w, h, terrain) = parse(&["..__"]);
        let map = RegionMap::build(w, h, &terrain);
        assert_eq!(map.len(), 2);
        assert!(!map.is_sheltered(map.region_of(0).unwrap()));
        assert!(map.is_sheltered(map.region_of(3).unwrap()));
    }

    #[test]
    fn test_doors_are_single_cell_regions() {
        let (w, h, terrain) = parse(&["..++__"]);
        let map = RegionMap::build(w, h, &terrain);
        assert_eq!(map.len(), 4);
        assert_ne!(map.region_of(2), map.region_of(3));
        assert_eq!(map.cells(map.region_of(2).unwrap()).len(), 1);
        assert!(map.is_door(map.region_of(2).unwrap()));
        assert!(!map.is_door(map.region_of(4).unwrap()));
    }

    #[test]
    fn test_door_region_takes_roof_state() {
        let (w, h, terrain) = parse(&["..+__"]);
        let map = RegionMap::build(w, h, &terrain);
        assert!(map.is_sheltered(map.region_of(2).unwrap()));
        assert!(!map.is_sheltered(map.region_of(0).unwrap()));
    }

    #[test]
    fn test_nearest_finds_sheltered_through_door() {
        let (w, h, terrain) = parse(&["...+__"]);
        let map = RegionMap::build(w, h, &terrain);
        let start = map.region_of(0).unwrap();
        let found = map.nearest(start, TraverseParams::pass_doors(), &safe, &indoor_room(&map), 100);
        assert_eq!(found, map.region_of(5));
    }

    #[test]
    fn test_nearest_blocked_by_door_rules() {
        let (w, h, terrain) = parse(&["...+__"]);
        let map = RegionMap::build(w, h, &terrain);
        let start = map.region_of(0).unwrap();
        let closed = TraverseParams::new(TraverseMode::NoPassDoors);
        assert!(map.nearest(start, closed, &safe, &indoor_room(&map), 100).is_none());
    }

    #[test]
    fn test_nearest_honours_search_cap() {
        let (w, h, terrain) = parse(&["...+__"]);
        let map = RegionMap::build(w, h, &terrain);
        let start = map.region_of(0).unwrap();
        // Outside, door, then the hut: two examinations are not enough
        let pass = TraverseParams::pass_doors();
        assert!(map.nearest(start, pass, &safe, &indoor_room(&map), 2).is_none());
        assert!(map.nearest(start, pass, &safe, &indoor_room(&map), 3).is_some());
    }

    #[test]
    fn test_nearest_avoids_intolerable_danger() {
        let (w, h, terrain) = parse(&["...+__"]);
        let map = RegionMap::build(w, h, &terrain);
        let start = map.region_of(0).unwrap();
        let door = map.region_of(3).unwrap();
        let burning_door = |r: RegionId| if r == door { Danger::Deadly } else { Danger::None };

        let cautious = TraverseParams::pass_doors().with_max_danger(Danger::Some);
        assert!(map.nearest(start, cautious, &burning_door, &indoor_room(&map), 100).is_none());

        let desperate = TraverseParams::pass_doors();
        assert_eq!(
            map.nearest(start, desperate, &burning_door, &indoor_room(&map), 100),
            map.region_of(5)
        );
    }

    #[test]
    fn test_walls_have_no_region() {
        let (w, h, terrain) = parse(&[".#."]);
        let map = RegionMap::build(w, h, &terrain);
        assert!(map.region_of(1).is_none());
        assert_eq!(map.len(), 2);
    }
}
