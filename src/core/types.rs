//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Fold the id into 64 bits for seeding deterministic RNGs
    pub fn seed_bits(&self) -> u64 {
        let (hi, lo) = self.0.as_u64_pair();
        hi ^ lo
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Identifier of a connected map region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Grid cell coordinate. `x` runs along columns, `z` along rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub z: i32,
}

impl CellPos {
    /// Sentinel for "no cell"
    pub const INVALID: CellPos = CellPos { x: -1000, z: -1000 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// False only for the invalid sentinel region (any negative coordinate)
    pub fn is_valid(&self) -> bool {
        self.x >= 0 && self.z >= 0
    }

    /// Hosts commonly leave unset cells at the origin
    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.z == 0
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Straight-line distance in cells
    pub fn distance_to(&self, other: CellPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }

    /// Moves are diagonal when both axes change
    pub fn is_diagonal_to(&self, other: CellPos) -> bool {
        self.x != other.x && self.z != other.z
    }

    /// True when `other` is one of the eight surrounding cells or this cell
    pub fn is_adjacent_or_same(&self, other: CellPos) -> bool {
        (self.x - other.x).abs() <= 1 && (self.z - other.z).abs() <= 1
    }

    /// The four orthogonal neighbours
    pub fn cardinal_neighbors(&self) -> [CellPos; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// All eight neighbours, cardinals first
    pub fn neighbors(&self) -> [CellPos; 8] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(1, 1),
            self.offset(1, -1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }
}

impl std::fmt::Display for CellPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Facing of a placed structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rotation {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub fn random(rng: &mut dyn rand::RngCore) -> Self {
        use rand::Rng;
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Rotate a footprint size: east/west swap the axes
    pub fn rotate_size(&self, width: i32, depth: i32) -> (i32, i32) {
        match self {
            Rotation::North | Rotation::South => (width, depth),
            Rotation::East | Rotation::West => (depth, width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sentinel() {
        assert!(!CellPos::INVALID.is_valid());
        assert!(CellPos::new(0, 0).is_valid());
        assert!(CellPos::new(0, 0).is_origin());
        assert!(!CellPos::new(3, 0).is_origin());
    }

    #[test]
    fn test_distance_and_diagonal() {
        let a = CellPos::new(0, 0);
        let b = CellPos::new(3, 4);
        assert_eq!(a.distance_to(b), 5.0);
        assert!(a.is_diagonal_to(CellPos::new(1, 1)));
        assert!(!a.is_diagonal_to(CellPos::new(1, 0)));
    }

    #[test]
    fn test_adjacency() {
        let c = CellPos::new(5, 5);
        assert!(c.is_adjacent_or_same(c));
        assert!(c.is_adjacent_or_same(CellPos::new(6, 4)));
        assert!(!c.is_adjacent_or_same(CellPos::new(7, 5)));
        assert_eq!(c.neighbors().len(), 8);
    }

    #[test]
    fn test_rotation_swaps_axes() {
        assert_eq!(Rotation::North.rotate_size(1, 2), (1, 2));
        assert_eq!(Rotation::East.rotate_size(1, 2), (2, 1));
        assert_eq!(Rotation::West.rotate_size(1, 2), (2, 1));
    }

    #[test]
    fn test_agent_id_seed_bits_stable() {
        let id = AgentId::new();
        assert_eq!(id.seed_bits(), id.seed_bits());
    }
}
