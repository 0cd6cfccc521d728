//! Tasks an agent is running and the actions the policy recommends

use crate::core::types::CellPos;
use serde::{Deserialize, Serialize};

/// Movement urgency attached to a recommended action
///
/// Higher numeric value = faster movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Urgency {
    Amble = 0,
    Walk = 1,
    Jog = 2,
    Sprint = 3,
}

impl Urgency {
    /// Hazard responses always move at this urgency
    pub const MAXIMUM: Urgency = Urgency::Sprint;
}

/// Corrective action kinds the policy can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    GoHome,
    GoToShelterRegion,
    DigEmergencyShelter,
}

/// A single recommended action, consumed immediately by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub target: CellPos,
    pub urgency: Urgency,
}

impl ActionDescriptor {
    pub fn new(kind: ActionKind, target: CellPos) -> Self {
        Self {
            kind,
            target,
            urgency: Urgency::MAXIMUM,
        }
    }

    /// The task an agent carries after the host accepts this action
    pub fn into_task(self) -> CurrentTask {
        let kind = match self.kind {
            ActionKind::GoHome | ActionKind::GoToShelterRegion => TaskKind::Goto,
            ActionKind::DigEmergencyShelter => TaskKind::DigEmergencyShelter,
        };
        CurrentTask {
            kind,
            target: Some(self.target),
        }
    }
}

/// What an agent is currently doing, as far as this core cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Goto,
    Work,
    DigEmergencyShelter,
}

/// The agent's current task and its destination, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTask {
    pub kind: TaskKind,
    pub target: Option<CellPos>,
}

impl CurrentTask {
    pub fn goto(target: CellPos) -> Self {
        Self {
            kind: TaskKind::Goto,
            target: Some(target),
        }
    }

    pub fn work_at(target: CellPos) -> Self {
        Self {
            kind: TaskKind::Work,
            target: Some(target),
        }
    }

    pub fn is_digging_shelter(&self) -> bool {
        self.kind == TaskKind::DigEmergencyShelter
    }
}
