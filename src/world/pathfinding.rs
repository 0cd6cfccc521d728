//! A* pathfinding and reachability on grid maps
//!
//! Eight-way movement; diagonal steps may not clip wall corners.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use ahash::{AHashMap, AHashSet};

use crate::core::types::CellPos;
use crate::entity::agent::Agent;
use crate::world::grid_map::GridMap;
use crate::world::host::{MapView, PathEndMode, TraverseParams};

/// Tick cost of cardinal and diagonal steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCosts {
    pub cardinal: u32,
    pub diagonal: u32,
}

impl MoveCosts {
    pub fn for_agent(agent: &Agent) -> Self {
        Self {
            cardinal: agent.movement.ticks_per_move_cardinal.max(1),
            diagonal: agent.movement.ticks_per_move_diagonal.max(1),
        }
    }

    /// Octile distance, admissible for eight-way movement
    fn heuristic(&self, from: CellPos, to: CellPos) -> u32 {
        let dx = (from.x - to.x).unsigned_abs();
        let dz = (from.z - to.z).unsigned_abs();
        let diagonal_steps = dx.min(dz);
        let straight_steps = dx.max(dz) - diagonal_steps;
        let diagonal = self.diagonal.min(self.cardinal * 2);
        diagonal_steps * diagonal + straight_steps * self.cardinal
    }
}

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    cell: CellPos,
    f_cost: u32, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn passable(map: &GridMap, cell: CellPos, traverse: TraverseParams) -> bool {
    map.is_walkable(cell) && (traverse.can_pass_doors() || !map.has_blocking_door(cell))
}

/// Step from `from` to `to` is legal, including the corner rule
fn can_step(map: &GridMap, from: CellPos, to: CellPos, traverse: TraverseParams) -> bool {
    if !passable(map, to, traverse) {
        return false;
    }
    if from.is_diagonal_to(to) {
        let side_a = CellPos::new(to.x, from.z);
        let side_b = CellPos::new(from.x, to.z);
        return map.is_walkable(side_a) && map.is_walkable(side_b);
    }
    true
}

fn is_goal(cell: CellPos, goal: CellPos, end_mode: PathEndMode) -> bool {
    match end_mode {
        PathEndMode::OnCell => cell == goal,
        PathEndMode::Touch => cell.is_adjacent_or_same(goal),
    }
}

/// Find path using A* and write it (start first) into `out`
///
/// Returns false if no path exists; `out` is then left empty.
pub fn find_path_into(
    map: &GridMap,
    start: CellPos,
    goal: CellPos,
    costs: MoveCosts,
    traverse: TraverseParams,
    end_mode: PathEndMode,
    out: &mut Vec<CellPos>,
) -> bool {
    out.clear();
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return false;
    }
    if end_mode == PathEndMode::OnCell && !passable(map, goal, traverse) {
        return false;
    }
    if is_goal(start, goal, end_mode) {
        out.push(start);
        return true;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<CellPos, CellPos> = AHashMap::new();
    let mut g_scores: AHashMap<CellPos, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        cell: start,
        f_cost: costs.heuristic(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if is_goal(current.cell, goal, end_mode) {
            reconstruct_path(&came_from, current.cell, out);
            return true;
        }

        let current_g = *g_scores.get(&current.cell).unwrap_or(&u32::MAX);

        for neighbor in current.cell.neighbors() {
            if !can_step(map, current.cell, neighbor, traverse) {
                continue;
            }

            let step = if current.cell.is_diagonal_to(neighbor) {
                costs.diagonal
            } else {
                costs.cardinal
            };
            let tentative_g = current_g.saturating_add(step);
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.cell);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    cell: neighbor,
                    f_cost: tentative_g.saturating_add(costs.heuristic(neighbor, goal)),
                });
            }
        }
    }

    false // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<CellPos, CellPos>, mut current: CellPos, out: &mut Vec<CellPos>) {
    out.push(current);
    while let Some(&prev) = came_from.get(&current) {
        out.push(prev);
        current = prev;
    }
    out.reverse();
}

/// Breadth-first reachability test
pub fn can_reach(
    map: &GridMap,
    from: CellPos,
    to: CellPos,
    end_mode: PathEndMode,
    traverse: TraverseParams,
) -> bool {
    if !map.in_bounds(from) || !map.in_bounds(to) {
        return false;
    }
    if end_mode == PathEndMode::OnCell && !passable(map, to, traverse) {
        return false;
    }

    let mut visited = AHashSet::new();
    let mut queue = VecDeque::from([from]);
    visited.insert(from);

    while let Some(cell) = queue.pop_front() {
        if is_goal(cell, to, end_mode) {
            return true;
        }
        for next in cell.neighbors() {
            if can_step(map, cell, next, traverse) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid_map::Terrain;
    use crate::world::host::TraverseMode;

    const COSTS: MoveCosts = MoveCosts {
        cardinal: 13,
        diagonal: 18,
    };

    fn path(map: &GridMap, start: CellPos, goal: CellPos, end_mode: PathEndMode) -> Option<Vec<CellPos>> {
        let mut out = Vec::new();
        find_path_into(map, start, goal, COSTS, TraverseParams::pass_doors(), end_mode, &mut out).then_some(out)
    }

    #[test]
    fn test_pathfind_straight_line() {
        let map = GridMap::open(10, 10);
        let start = CellPos::new(0, 0);
        let goal = CellPos::new(5, 0);

        let path = path(&map, start, goal, PathEndMode::OnCell).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_pathfind_takes_diagonals() {
        let map = GridMap::open(10, 10);
        let path = path(&map, CellPos::new(0, 0), CellPos::new(4, 4), PathEndMode::OnCell).unwrap();
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let mut map = GridMap::open(10, 10);
        map.paint([CellPos::new(2, 0), CellPos::new(2, 1)], Terrain::Wall);

        let path = path(&map, CellPos::new(0, 0), CellPos::new(5, 0), PathEndMode::OnCell).unwrap();
        assert!(!path.contains(&CellPos::new(2, 0)));
        assert!(!path.contains(&CellPos::new(2, 1)));
    }

    #[test]
    fn test_no_corner_cutting() {
        let map = GridMap::from_ascii(
            "
            .#
            #.
            ",
        )
        .unwrap();
        assert!(path(&map, CellPos::new(0, 0), CellPos::new(1, 1), PathEndMode::OnCell).is_none());
    }

    #[test]
    fn test_pathfind_no_path() {
        let map = GridMap::from_ascii(
            "
            ..#..
            ..#..
            ",
        )
        .unwrap();
        assert!(path(&map, CellPos::new(0, 0), CellPos::new(4, 0), PathEndMode::OnCell).is_none());
    }

    #[test]
    fn test_touch_stops_next_to_wall_target() {
        let map = GridMap::from_ascii("...#").unwrap();
        let path = path(&map, CellPos::new(0, 0), CellPos::new(3, 0), PathEndMode::Touch).unwrap();
        assert_eq!(path.last(), Some(&CellPos::new(2, 0)));
        assert!(self::path(&map, CellPos::new(0, 0), CellPos::new(3, 0), PathEndMode::OnCell).is_none());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let map = GridMap::open(3, 3);
        let start = CellPos::new(1, 1);
        assert_eq!(path(&map, start, start, PathEndMode::OnCell), Some(vec![start]));
    }

    #[test]
    fn test_can_reach_respects_doors() {
        let map = GridMap::from_ascii(
            "
            ..#..
            ..+..
            ..#..
            ",
        )
        .unwrap();
        let from = CellPos::new(0, 1);
        let to = CellPos::new(4, 1);
        assert!(can_reach(&map, from, to, PathEndMode::OnCell, TraverseParams::pass_doors()));
        let closed = TraverseParams::new(TraverseMode::NoPassDoors);
        assert!(!can_reach(&map, from, to, PathEndMode::OnCell, closed));
    }

    #[test]
    fn test_heuristic_is_octile() {
        assert_eq!(COSTS.heuristic(CellPos::new(0, 0), CellPos::new(3, 1)), 18 + 2 * 13);
    }
}
