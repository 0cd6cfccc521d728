//! Sunlight decision policy - what should this agent do right now?
//!
//! Checks run in strict order and the first terminal state wins:
//! 1. Agent is not vulnerable to sunlight: nothing to do
//! 2. Agent is under direct control: never override
//! 3. Current task is already safe: leave it alone
//! 4. Agent is already indoors: nothing to do
//! 5. Otherwise: go home, go to the nearest indoor region, or dig in
//!
//! Evaluation is stateless. Random choices draw from an RNG seeded by the
//! policy seed, the agent and the tick, so repeating a call against the
//! same world returns the same answer.

use crate::core::config::SunlightConfig;
use crate::core::types::{CellPos, Tick};
use crate::entity::agent::Agent;
use crate::entity::tasks::{ActionDescriptor, ActionKind};
use crate::sunlight::hideout::try_dig_hideout;
use crate::sunlight::refuge::find_safe_destination;
use crate::sunlight::safety::{is_destination_safe, is_task_safe};
use crate::world::host::MapView;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Why the policy did or did not act
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    NotVulnerable,
    ManualControl,
    TaskAlreadySafe,
    AlreadyIndoors,
    /// Standing somewhere with no region (inside a wall, off the graph)
    NoRegion,
    Act(ActionDescriptor),
    /// Every strategy failed; the sun will catch this agent
    Unavoidable,
}

impl Assessment {
    pub fn action(&self) -> Option<ActionDescriptor> {
        match self {
            Assessment::Act(action) => Some(*action),
            _ => None,
        }
    }
}

/// Decision engine for hazard-vulnerable agents
#[derive(Debug, Clone, Default)]
pub struct ShelterPolicy {
    config: SunlightConfig,
    seed: u64,
}

impl ShelterPolicy {
    pub fn new(config: SunlightConfig) -> Self {
        Self { config, seed: 0 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &SunlightConfig {
        &self.config
    }

    /// The recommended action for `agent` at `tick`, if any
    pub fn evaluate_agent<M: MapView + ?Sized>(&self, map: &M, agent: &Agent, tick: Tick) -> Option<ActionDescriptor> {
        self.assess(map, agent, tick).action()
    }

    /// Is `cell` a safe destination for `agent` in the current light?
    pub fn is_destination_safe<M: MapView + ?Sized>(&self, map: &M, cell: CellPos, agent: &Agent) -> bool {
        is_destination_safe(map, cell, agent, &self.config)
    }

    /// Full evaluation, including the reason no action was produced
    ///
    /// # Panics
    ///
    /// Panics if the agent stands outside the map.
    pub fn assess<M: MapView + ?Sized>(&self, map: &M, agent: &Agent, tick: Tick) -> Assessment {
        assert!(
            map.in_bounds(agent.position),
            "agent {} evaluated at {} outside the map",
            agent.name,
            agent.position
        );

        if !agent.has_hazard_vulnerability() {
            return Assessment::NotVulnerable;
        }
        if agent.drafted {
            return Assessment::ManualControl;
        }
        if let Some(task) = &agent.current_task {
            if is_task_safe(map, task, agent, &self.config) {
                tracing::debug!(agent = %agent.name, tick, "current task is sun-safe");
                return Assessment::TaskAlreadySafe;
            }
        }

        let Some(region) = map.region_at(agent.position) else {
            return Assessment::NoRegion;
        };
        if map.is_region_sheltered(region) {
            return Assessment::AlreadyIndoors;
        }

        let mut rng = self.rng_for(agent, tick);

        if let Some((kind, cell)) = find_safe_destination(map, agent, &self.config, &mut rng) {
            if let Some(action) = validated(map, kind, cell) {
                tracing::debug!(agent = %agent.name, tick, ?kind, target = %cell, "seeking shelter");
                return Assessment::Act(action);
            }
        }

        if let Some(cell) = try_dig_hideout(map, agent, &self.config, &mut rng) {
            if let Some(action) = validated(map, ActionKind::DigEmergencyShelter, cell) {
                tracing::debug!(agent = %agent.name, tick, target = %cell, "digging in");
                return Assessment::Act(action);
            }
        }

        tracing::warn!(agent = %agent.name, tick, position = %agent.position, "no escape from sunlight");
        Assessment::Unavoidable
    }

    fn rng_for(&self, agent: &Agent, tick: Tick) -> ChaCha8Rng {
        let seed = self.seed ^ agent.id.seed_bits() ^ tick.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ChaCha8Rng::seed_from_u64(seed)
    }
}

/// Wrap a finder result, rejecting off-map and unset (origin) cells
fn validated<M: MapView + ?Sized>(map: &M, kind: ActionKind, cell: CellPos) -> Option<ActionDescriptor> {
    if cell.is_valid() && !cell.is_origin() && map.in_bounds(cell) {
        Some(ActionDescriptor::new(kind, cell))
    } else {
        None
    }
}
