//! village — one day in a three-person village.
//!
//! A smith, a baker and a farmer follow their planned day.  Whenever one of
//! them idles, the innkeeper (a scripted stand-in for an external planner)
//! sends them to the tavern for a chat.  At noon the tavern table breaks and
//! the baker is called to the well, exercising the blocked-target and
//! override paths.
//!
//! Set `RUST_LOG=npc_sim=debug` to watch every transition.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use npc_agent::{AgentArenaBuilder, AgentSpec};
use npc_behavior::{
    DecisionCommand, DecisionContext, DecisionMaker, FeedbackRecord, PerceptionEvent, PerceptionKind,
};
use npc_core::{ActivityId, AgentId, SimConfig, TimeOfDay};
use npc_interaction::{EffectTable, Interactable, StatBlock, StatDelta, TargetTable};
use npc_mobility::{MovementConfig, TimedMovement};
use npc_output::{CsvWriter, OutputWriter, SimOutputObserver};
use npc_schedule::{Activity, load_activities_reader};
use npc_sim::{SimBuilder, SimObserver, TickSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:        &str = "output/village";
const CHAT_MINUTES:      u64  = 30;
const CHAT_PRIORITY:     i32  = 1;
const FIRST_REACTIVE_ID: u32  = 1_000;

// ── World ─────────────────────────────────────────────────────────────────────

const WORLD_TOML: &str = r#"
[sim]
start_time            = "06:00"
minutes_per_tick      = 1
total_ticks           = 960      # 06:00 → 22:00
seed                  = 42
idle_timeout_minutes  = 20
output_interval_ticks = 60

[movement]
default_travel_minutes = 8
approach_minutes       = 1

[[movement.routes]]
from    = "smithy"
to      = "tavern"
minutes = 4

[[movement.routes]]
from    = "bakery"
to      = "tavern"
minutes = 3

[default_stats]
hunger = { value = 40.0, min = 0.0, max = 100.0 }
energy = { value = 80.0, min = 0.0, max = 100.0 }
mood   = { value = 50.0, min = 0.0, max = 100.0 }

[[agents]]
name     = "ada"
location = "smithy"

[[agents]]
name     = "bo"
location = "bakery"

[[agents]]
name     = "cy"
location = "farm"

[[targets]]
name          = "anvil"
location      = "smithy"
cycle_minutes = 15

[[targets]]
name          = "oven"
location      = "bakery"
cycle_minutes = 20

[[targets]]
name          = "field"
location      = "farm"
cycle_minutes = 30

[[targets]]
name          = "table"
location      = "tavern"
cycle_minutes = 10

[[targets]]
name          = "bench"
location      = "tavern"
cycle_minutes = 10

[[targets]]
name          = "well"
location      = "square"
cycle_minutes = 5

[effects]
forge = [{ stat = "energy", delta = -2.0 }, { stat = "hunger", delta = 1.0 }]
bake  = [{ stat = "energy", delta = -1.0 }, { stat = "hunger", delta = 1.0 }]
till  = [{ stat = "energy", delta = -3.0 }, { stat = "hunger", delta = 2.0 }]
eat   = [{ stat = "hunger", delta = -6.0 }]
chat  = [{ stat = "mood", delta = 2.0 }]
fetch = [{ stat = "energy", delta = -1.0 }]
"#;

#[derive(Deserialize)]
struct World {
    sim:           SimConfig,
    movement:      MovementConfig,
    default_stats: StatBlock,
    agents:        Vec<AgentSpec>,
    targets:       Vec<Interactable>,
    effects:       BTreeMap<String, Vec<StatDelta>>,
}

// ── Planned day ───────────────────────────────────────────────────────────────

// Lunch at the tavern table for everyone.  Ada's mill order is planned after
// her lunch and outranks it, so the lunch is pushed back to 12:16.
const SCHEDULE_CSV: &str = "\
agent_id,activity_id,action,location,target,start,end,priority,flexible,reference_id,rationale
0,2,eat,tavern,table,12:00,12:45,3,true,ada-lunch,
0,1,forge,smithy,anvil,07:00,12:15,2,false,ada-forge,orders for the mill
0,3,forge,smithy,anvil,13:30,17:00,5,false,,
1,1,bake,bakery,oven,06:00,10:00,5,false,bo-bread,
1,2,eat,tavern,table,12:00,12:40,3,true,bo-lunch,
1,3,bake,bakery,oven,14:00,16:00,4,false,,
2,1,till,farm,field,06:30,11:30,4,false,,
2,2,eat,tavern,table,12:10,12:50,3,true,cy-lunch,
2,3,till,farm,field,13:30,18:30,4,false,,
";

// ── Decision maker ────────────────────────────────────────────────────────────

/// Answers every idle agent with a chat at the tavern bench; leaves
/// navigation failures to the schedule.
struct Innkeeper {
    pending:   Vec<AgentId>,
    next_id:   u32,
    successes: usize,
    failures:  usize,
}

impl Innkeeper {
    fn new() -> Self {
        Self { pending: Vec::new(), next_id: FIRST_REACTIVE_ID, successes: 0, failures: 0 }
    }

    fn chat(&mut self, now: TimeOfDay) -> Activity {
        let id = ActivityId(self.next_id);
        self.next_id += 1;
        Activity::new(id, "chat", now, now + CHAT_MINUTES, CHAT_PRIORITY)
            .at("tavern", "bench")
            .flexible(true)
    }
}

impl DecisionMaker for Innkeeper {
    fn on_perception(&mut self, event: &PerceptionEvent, ctx: &DecisionContext<'_>) -> bool {
        if event.kind != PerceptionKind::IdleTimeout {
            return false;
        }
        info!(agent = ctx.name, at = ctx.location, "innkeeper invites an idle villager");
        self.pending.push(event.agent);
        true
    }

    fn on_feedback(&mut self, record: &FeedbackRecord) {
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    fn poll(&mut self, now: TimeOfDay) -> Vec<(AgentId, DecisionCommand)> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|agent| {
                let activity = self.chat(now);
                (agent, DecisionCommand::Resolve { accept: true, activity: Some(activity) })
            })
            .collect()
    }
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:           SimOutputObserver<W>,
    feedback_rows:   usize,
    perception_rows: usize,
    summary_rows:    usize,
    snapshot_rows:   usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, feedback_rows: 0, perception_rows: 0, summary_rows: 0, snapshot_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_feedback(&mut self, record: &FeedbackRecord) {
        println!(
            "  {} {:<6} {:<6} {:<4} {}",
            record.time,
            record.action,
            record.target,
            if record.success { "ok" } else { "FAIL" },
            record.description,
        );
        self.feedback_rows += 1;
        self.inner.on_feedback(record);
    }

    fn on_perception(&mut self, event: &PerceptionEvent) {
        self.perception_rows += 1;
        self.inner.on_perception(event);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summary_rows += 1;
        self.inner.on_tick_end(summary);
    }

    fn on_snapshot(&mut self, tick: u64, now: TimeOfDay, agents: &npc_agent::AgentArena) {
        self.snapshot_rows += agents.count;
        self.inner.on_snapshot(tick, now, agents);
    }

    fn on_sim_end(&mut self, now: TimeOfDay) {
        self.inner.on_sim_end(now);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    println!("=== village — rust_npc behavior core ===");

    // 1. World definition.
    let world: World = toml::from_str(WORLD_TOML).context("parsing world definition")?;
    let config = world.sim;
    println!(
        "Agents: {}  |  Targets: {}  |  {} → {}  |  Seed: {}",
        world.agents.len(),
        world.targets.len(),
        config.start_time,
        config.end_time(),
        config.seed,
    );
    println!();

    // 2. Agents.
    let (arena, rngs) = AgentArenaBuilder::new(config.seed)
        .start_time(config.start_time)
        .push_back_gap(config.push_back_gap_minutes)
        .default_stats(world.default_stats)
        .specs(world.agents)
        .build();
    let agent_count = arena.count;

    // 3. Planned activities.
    let schedules = load_activities_reader(Cursor::new(SCHEDULE_CSV), agent_count)?;
    println!("Loaded {} planned activities", schedules.iter().map(Vec::len).sum::<usize>());

    // 4. Executors.
    world.movement.validate()?;
    let movement = TimedMovement::new(world.movement, agent_count);
    let effects = world
        .effects
        .into_iter()
        .fold(EffectTable::new(), |table, (action, deltas)| table.with(action, deltas));
    let targets: TargetTable = world.targets.into_iter().collect();

    // 5. Sim.
    let mut sim = SimBuilder::new(config.clone(), arena, rngs, Innkeeper::new(), movement, effects)
        .targets(targets)
        .schedules(schedules)
        .build()?;

    for agent in sim.agents.agent_ids() {
        let conflicts = sim.agents.schedules[agent.index()].conflicts();
        if !conflicts.is_empty() {
            println!("  {}: {} unresolved overlap(s)", sim.agents.names[agent.index()], conflicts.len());
        }
    }

    // 6. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer));

    // 7. Morning.
    println!();
    println!("Feedback:");
    let t0 = Instant::now();
    let to_noon = TimeOfDay::hm(12, 0) - config.start_time;
    sim.run_ticks(to_noon / u64::from(config.minutes_per_tick), &mut obs)?;

    // 8. Noon: the tavern table breaks and the well needs tending.
    println!("  {} -- tavern table breaks, bo is sent to the well", sim.now());
    sim.movement.block_target("table");
    let bo = sim.agents.find("bo").context("bo missing from the arena")?;
    let now = sim.now();
    let errand = Activity::new(ActivityId(900), "fetch", now, now + 20, 9).at("square", "well");
    sim.force_override(bo, errand)?;

    // 9. Rest of the day.
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 10. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  feedback.csv        : {} rows", obs.feedback_rows);
    println!("  perceptions.csv     : {} rows", obs.perception_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!(
        "  innkeeper saw {} successes, {} failures",
        sim.decision.successes, sim.decision.failures
    );
    println!();

    // 11. Final agent table.
    println!("{:<6} {:<10} {:<28} {:>7} {:>7} {:>7}", "Agent", "Location", "Phase", "hunger", "energy", "mood");
    println!("{}", "-".repeat(70));
    for view in sim.views() {
        let stats = &sim.agents.stats[view.agent.index()];
        let stat = |name: &str| stats.value(name).map_or_else(|| "-".to_owned(), |v| format!("{v:.0}"));
        println!(
            "{:<6} {:<10} {:<28} {:>7} {:>7} {:>7}",
            view.name,
            view.location,
            view.phase.to_string(),
            stat("hunger"),
            stat("energy"),
            stat("mood"),
        );
    }

    Ok(())
}
