use crate::config::SimConfig;
use anyhow::{Context, Result};
use natural_physics::{DVec3, VectorMath};
use natural_testkit::{JsonlSink, RunMetrics};
use natural_world::{Body, Simulation};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct HeadlessConfig {
    pub sim: SimConfig,
    /// Stream every event as JSONL here.
    pub trace: Option<PathBuf>,
    pub scenario: String,
}

/// Build the arena, run it to completion and summarise.
pub fn run(cfg: HeadlessConfig) -> Result<RunMetrics> {
    let sim_cfg = &cfg.sim;
    sim_cfg.validate()?;
    let math = VectorMath::new(sim_cfg.math);
    let mut metrics = RunMetrics::new(&cfg.scenario, sim_cfg.seed, math.backend_name());
    let mut sim = Simulation::new(sim_cfg.seed, math);
    populate(&mut sim, sim_cfg)?;

    let mut sink = match &cfg.trace {
        Some(path) => Some(JsonlSink::create(path)?),
        None => None,
    };

    info!(
        seed = sim_cfg.seed,
        ticks = sim_cfg.ticks,
        creatures = sim.creature_ids().len(),
        "arena started"
    );
    for _ in 0..sim_cfg.ticks {
        sim.step();
        let events = sim.drain_events();
        if let Some(sink) = sink.as_mut() {
            sink.write_all(&events).context("failed to write trace")?;
        }
        metrics.record_all(&events);
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    metrics.finish(sim.tick().0, sim.creature_ids().len());
    info!(
        ticks = metrics.ticks,
        alive = metrics.creatures_alive,
        swings = metrics.events.attack_swings,
        launches = metrics.events.projectiles_launched,
        deaths = metrics.events.died,
        "arena finished"
    );
    sim.shutdown();
    Ok(metrics)
}

fn populate(sim: &mut Simulation, cfg: &SimConfig) -> Result<()> {
    for player in &cfg.players {
        let mut body = Body::player(player.name.clone(), DVec3::new(player.x, cfg.floor, player.z))
            .in_world(player.world_id());
        if let Some(state) = body.player.as_mut() {
            state.finite_resources = !player.creative;
        }
        let id = sim.join_player(body);
        debug!(entity = id.0, name = %player.name, "player placed");
    }

    for group in &cfg.spawn {
        let profile = cfg
            .profile(&group.profile)
            .with_context(|| format!("unknown profile `{}`", group.profile))?;
        for i in 0..group.count {
            let position = DVec3::new(group.x + f64::from(i) * group.spacing, cfg.floor, group.z);
            sim.spawn_profile(&profile, group.world_id(), position)
                .with_context(|| format!("failed to spawn `{}`", group.profile))?;
        }
    }
    Ok(())
}

/// Human-readable summary for stdout.
pub fn report(metrics: &RunMetrics) -> String {
    let counts = &metrics.events;
    let mut out = String::new();
    out.push_str(&format!("scenario: {}\n", metrics.scenario));
    out.push_str(&format!("seed: {}\n", metrics.seed));
    out.push_str(&format!("math: {}\n", metrics.math_backend));
    out.push_str(&format!("ticks: {}\n", metrics.ticks));
    out.push_str(&format!("creatures alive: {}\n", metrics.creatures_alive));
    out.push_str(&format!("targets acquired: {}\n", counts.targets_acquired));
    out.push_str(&format!("targets lost: {}\n", counts.targets_lost));
    out.push_str(&format!("attacks: {}\n", counts.attack_swings));
    out.push_str(&format!("launches: {}\n", counts.projectiles_launched));
    out.push_str(&format!("damage dealt: {:.1}\n", metrics.total_damage));
    out.push_str(&format!("deaths: {}\n", counts.died));
    out
}
