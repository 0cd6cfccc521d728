//! Hazard-vulnerable agent data model
//!
//! The core only reads agents. Damage stage and home point are written by
//! the host's own status systems.

use crate::core::types::{AgentId, CellPos};
use crate::entity::tasks::CurrentTask;
use serde::{Deserialize, Serialize};

/// Ticks spent per move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSpeed {
    pub ticks_per_move_cardinal: u32,
    pub ticks_per_move_diagonal: u32,
}

impl MovementSpeed {
    /// Diagonal moves cost sqrt(2) times a cardinal move
    pub fn from_cardinal(ticks_per_move_cardinal: u32) -> Self {
        let diagonal = (ticks_per_move_cardinal as f32 * std::f32::consts::SQRT_2).round() as u32;
        Self {
            ticks_per_move_cardinal,
            ticks_per_move_diagonal: diagonal,
        }
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self {
            ticks_per_move_cardinal: 13,
            ticks_per_move_diagonal: 18,
        }
    }
}

/// Which side of the map's ownership the agent stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Affiliation {
    /// Belongs to the map's home colony; home points apply
    #[default]
    Home,
    Visitor,
    Hostile,
}

/// Capability tags, resolved once when the agent is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub hazard_vulnerable: bool,
    pub manual_labor: bool,
    pub opens_doors: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            hazard_vulnerable: true,
            manual_labor: true,
            opens_doors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub position: CellPos,
    pub current_task: Option<CurrentTask>,
    pub movement: MovementSpeed,
    /// Ordinal severity of sunlight damage, 0 = unharmed
    pub exposure_stage: u32,
    pub home_point: Option<CellPos>,
    pub affiliation: Affiliation,
    pub capabilities: Capabilities,
    /// Under direct player control
    pub drafted: bool,
}

impl Agent {
    pub fn new(name: impl Into<String>, position: CellPos) -> Self {
        Self {
            id: AgentId::new(),
            name: name.into(),
            position,
            current_task: None,
            movement: MovementSpeed::default(),
            exposure_stage: 0,
            home_point: None,
            affiliation: Affiliation::Home,
            capabilities: Capabilities::default(),
            drafted: false,
        }
    }

    pub fn with_task(mut self, task: CurrentTask) -> Self {
        self.current_task = Some(task);
        self
    }

    pub fn with_home_point(mut self, home: CellPos) -> Self {
        self.home_point = Some(home);
        self
    }

    pub fn with_exposure_stage(mut self, stage: u32) -> Self {
        self.exposure_stage = stage;
        self
    }

    pub fn with_movement(mut self, movement: MovementSpeed) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_affiliation(mut self, affiliation: Affiliation) -> Self {
        self.affiliation = affiliation;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn drafted(mut self) -> Self {
        self.drafted = true;
        self
    }

    pub fn has_hazard_vulnerability(&self) -> bool {
        self.capabilities.hazard_vulnerable
    }

    pub fn can_do_manual_labor(&self) -> bool {
        self.capabilities.manual_labor
    }

    pub fn is_home_affiliated(&self) -> bool {
        self.affiliation == Affiliation::Home
    }

    /// Destination of the current task, if it has one
    pub fn destination(&self) -> Option<CellPos> {
        self.current_task.and_then(|task| task.target)
    }
}
