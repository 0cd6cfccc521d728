//! Agents and their tasks

pub mod agent;
pub mod tasks;

pub use agent::{Affiliation, Agent, Capabilities, MovementSpeed};
pub use tasks::{ActionDescriptor, ActionKind, CurrentTask, TaskKind, Urgency};
