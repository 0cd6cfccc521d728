//! Umbra - keeps sun-vulnerable agents out of the daylight
//!
//! Given an agent on a grid map, decides whether its current plan is safe
//! from sunrise and, if not, whether to head home, head indoors, or dig in.

pub mod core;
pub mod entity;
pub mod sunlight;
pub mod world;

pub use crate::core::{Calendar, Result, SunlightConfig, UmbraError};
pub use entity::{ActionDescriptor, ActionKind, Agent, Urgency};
pub use sunlight::{Assessment, ShelterPolicy};
pub use world::{GridMap, MapView};
