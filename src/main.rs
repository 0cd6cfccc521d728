//! Umbra - Scenario Runner
//!
//! Loads a map and a cast of sun-vulnerable agents from TOML, runs the day
//! cycle, and reports what the sunlight policy tells each agent to do.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use umbra::core::astronomy::is_hazardous;
use umbra::core::error::{Result, UmbraError};
use umbra::core::types::{CellPos, Rotation, Tick};
use umbra::core::{Calendar, SunlightConfig};
use umbra::entity::{ActionDescriptor, Affiliation, Agent, Capabilities, CurrentTask, MovementSpeed, TaskKind};
use umbra::sunlight::{determine_home_point, Assessment, ShelterPolicy};
use umbra::world::{GridMap, MapView, PathEndMode, StructureKind};

/// Sunlight scenario runner
#[derive(Parser, Debug)]
#[command(name = "umbra")]
#[command(about = "Run a sunlight scenario and report shelter decisions")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long, default_value = "data/scenarios/outpost.toml")]
    scenario: PathBuf,

    /// Optional sunlight config (TOML); defaults are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 60_000)]
    ticks: u64,

    /// Ticks between policy evaluations
    #[arg(long, default_value_t = 250)]
    step: u64,

    /// Begin in the evening rather than at dawn
    #[arg(long)]
    start_at_night: bool,

    /// Policy seed for deterministic runs
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Emit one JSON object per decision instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    map: String,
    #[serde(default)]
    start_at_night: bool,
    #[serde(default)]
    player_home: bool,
    #[serde(default)]
    agents: Vec<AgentEntry>,
}

#[derive(Debug, Deserialize)]
struct AgentEntry {
    name: String,
    position: [i32; 2],
    #[serde(default)]
    destination: Option<[i32; 2]>,
    #[serde(default)]
    home_point: Option<[i32; 2]>,
    #[serde(default)]
    bed: Option<[i32; 2]>,
    #[serde(default)]
    exposure_stage: u32,
    #[serde(default = "default_cardinal_ticks")]
    ticks_per_move_cardinal: u32,
    #[serde(default)]
    affiliation: Affiliation,
    #[serde(default = "default_true")]
    hazard_vulnerable: bool,
    #[serde(default = "default_true")]
    manual_labor: bool,
    #[serde(default)]
    drafted: bool,
}

fn default_cardinal_ticks() -> u32 {
    13
}

fn default_true() -> bool {
    true
}

fn cell([x, z]: [i32; 2]) -> CellPos {
    CellPos::new(x, z)
}

impl AgentEntry {
    fn build(&self) -> Agent {
        let mut agent = Agent::new(self.name.clone(), cell(self.position))
            .with_movement(MovementSpeed::from_cardinal(self.ticks_per_move_cardinal))
            .with_exposure_stage(self.exposure_stage)
            .with_affiliation(self.affiliation)
            .with_capabilities(Capabilities {
                hazard_vulnerable: self.hazard_vulnerable,
                manual_labor: self.manual_labor,
                ..Default::default()
            });
        agent.home_point = self.home_point.map(cell);
        agent.current_task = self.destination.map(|d| CurrentTask::work_at(cell(d)));
        agent.drafted = self.drafted;
        agent
    }
}

/// Host-side bookkeeping the core never sees
#[derive(Debug, Default)]
struct SimState {
    exposure_ticks: u64,
    hidden: bool,
    last_report: Option<String>,
}

#[derive(Serialize)]
struct DecisionRecord<'a> {
    tick: Tick,
    hour: u32,
    illumination: f64,
    agent: &'a str,
    position: CellPos,
    exposure_stage: u32,
    assessment: String,
    action: Option<ActionDescriptor>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("umbra=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SunlightConfig::load(path)?,
        None => SunlightConfig::default(),
    };
    let scenario: Scenario = toml::from_str(&fs::read_to_string(&args.scenario)?)?;
    if args.step == 0 {
        return Err(UmbraError::Scenario("--step must be positive".into()));
    }

    let mut map = GridMap::from_ascii(&scenario.map)?;
    map.set_player_home(scenario.player_home);

    let mut agents = Vec::with_capacity(scenario.agents.len());
    for entry in &scenario.agents {
        let agent = entry.build();
        if !map.in_bounds(agent.position) {
            return Err(UmbraError::Scenario(format!(
                "agent {} starts outside the map at {}",
                agent.name, agent.position
            )));
        }
        if let Some(bed) = entry.bed {
            map.assign_bed(agent.id, cell(bed));
        }
        agents.push(agent);
    }

    // Home-colony agents without a remembered home get one picked for them
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for agent in agents.iter_mut() {
        if agent.home_point.is_none() && agent.is_home_affiliated() {
            agent.home_point = determine_home_point(&map, agent, &config, &mut rng);
            tracing::info!(agent = %agent.name, home = ?agent.home_point, "assigned home point");
        }
    }

    tracing::info!(
        "Running scenario '{}' ({} agents, {} ticks)",
        scenario.name,
        agents.len(),
        args.ticks
    );
    if !args.json {
        println!("=== {} ===", scenario.name);
        print!("{}", map);
    }

    let mut calendar = if args.start_at_night || scenario.start_at_night {
        Calendar::starting_at_night()
    } else {
        Calendar::default()
    };
    let policy = ShelterPolicy::new(config.clone()).with_seed(args.seed);
    let mut states: Vec<SimState> = agents.iter().map(|_| SimState::default()).collect();

    let end_tick = calendar.current_tick() + args.ticks;
    while calendar.current_tick() < end_tick {
        let tick = calendar.current_tick();
        map.set_illumination(calendar.illumination());

        for (agent, state) in agents.iter_mut().zip(states.iter_mut()) {
            let assessment = policy.assess(&map, agent, tick);
            if let Some(action) = assessment.action() {
                agent.current_task = Some(action.into_task());
            }
            report(&args, &calendar, &map, agent, state, &assessment)?;

            advance_agent(&mut map, agent, state, args.step);
            accrue_exposure(&map, agent, state, &config, args.step);
        }

        calendar.advance_by(args.step);
    }

    Ok(())
}

fn describe(assessment: &Assessment) -> String {
    match assessment {
        Assessment::Act(action) => format!("{:?} -> {}", action.kind, action.target),
        other => format!("{:?}", other),
    }
}

fn report(
    args: &Args,
    calendar: &Calendar,
    map: &GridMap,
    agent: &Agent,
    state: &mut SimState,
    assessment: &Assessment,
) -> Result<()> {
    let summary = describe(assessment);
    if state.last_report.as_deref() == Some(summary.as_str()) {
        return Ok(());
    }

    if args.json {
        let record = DecisionRecord {
            tick: calendar.current_tick(),
            hour: calendar.current_hour(),
            illumination: map.illumination().value(),
            agent: &agent.name,
            position: agent.position,
            exposure_stage: agent.exposure_stage,
            assessment: summary.clone(),
            action: assessment.action(),
        };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!(
            "[{:>6}] {:02}:00 light {:>3}% | {:<10} at {:<9} stage {} | {}",
            calendar.current_tick(),
            calendar.current_hour(),
            map.illumination().percent(),
            agent.name,
            agent.position.to_string(),
            agent.exposure_stage,
            summary
        );
    }

    state.last_report = Some(summary);
    Ok(())
}

/// Walk the agent along its task path for `ticks` worth of movement
fn advance_agent(map: &mut GridMap, agent: &mut Agent, state: &mut SimState, ticks: u64) {
    let Some(task) = agent.current_task else {
        return;
    };
    let Some(target) = task.target else {
        return;
    };
    if state.hidden {
        return;
    }

    let mut budget = ticks;
    let mut position = agent.position;
    {
        let mut path = map.find_path(agent.position, target, agent, PathEndMode::OnCell);
        path.consume_next_node();
        while let Some(next) = path.peek_next() {
            let cost = u64::from(if position.is_diagonal_to(next) {
                agent.movement.ticks_per_move_diagonal
            } else {
                agent.movement.ticks_per_move_cardinal
            });
            if cost > budget {
                break;
            }
            budget -= cost;
            position = next;
            path.consume_next_node();
        }
    }
    agent.position = position;

    if position != target {
        return;
    }
    match task.kind {
        TaskKind::DigEmergencyShelter => {
            if map.place_structure(StructureKind::EmergencyShelter, target, Rotation::North) {
                tracing::info!(agent = %agent.name, %target, "dug in");
            }
            state.hidden = true;
        }
        TaskKind::Goto => agent.current_task = None,
        TaskKind::Work => {}
    }
}

/// Host-side sun damage: one stage per budgeted share of survivable exposure
fn accrue_exposure(map: &GridMap, agent: &mut Agent, state: &mut SimState, config: &SunlightConfig, ticks: u64) {
    if state.hidden || !agent.has_hazard_vulnerability() {
        return;
    }
    if !is_hazardous(map.illumination(), config) || map.is_sheltered(agent.position) {
        return;
    }
    state.exposure_ticks += ticks;
    let per_stage = config.ticks_per_stage().max(1.0);
    let stage = (state.exposure_ticks as f64 / per_stage) as u32;
    if stage > agent.exposure_stage {
        tracing::warn!(agent = %agent.name, stage, "burning in the sun");
        agent.exposure_stage = stage;
    }
}
