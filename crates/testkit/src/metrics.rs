//! Run summaries for headless simulations.
//!
//! A [`RunMetrics`] is folded from the event stream of one run and written as
//! pretty JSON so CI can diff two runs of the same scenario.

use anyhow::Result;
use natural_world::{SimEvent, TickedEvent};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Ran to completion.
    Pass,
    /// Stopped early or violated an expectation.
    Fail,
}

/// Event counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    /// Idle creatures that picked a target.
    pub targets_acquired: u64,
    /// Creatures that went back to idle.
    pub targets_lost: u64,
    /// Hits that reached a creature's aggro logic.
    pub angered: u64,
    /// Melee swings.
    pub attack_swings: u64,
    /// Applied damage events.
    pub damaged: u64,
    /// Deaths.
    pub died: u64,
    /// Projectile launch requests.
    pub projectiles_launched: u64,
    /// Held-item broadcasts.
    pub equipment_changes: u64,
}

/// Summary of one headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Scenario identifier.
    pub scenario: String,
    /// World seed.
    pub seed: u64,
    /// Vector math backend the run used.
    pub math_backend: String,
    /// Ticks simulated.
    pub ticks: u64,
    /// Creatures alive at the end.
    pub creatures_alive: usize,
    /// Event counts.
    pub events: EventCounts,
    /// Sum of applied damage.
    pub total_damage: f64,
    /// Tick of the first death, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_death_tick: Option<u64>,
    /// Overall outcome.
    pub result: RunResult,
}

impl RunMetrics {
    /// Empty summary for a scenario.
    pub fn new(scenario: impl Into<String>, seed: u64, math_backend: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            seed,
            math_backend: math_backend.into(),
            ticks: 0,
            creatures_alive: 0,
            events: EventCounts::default(),
            total_damage: 0.0,
            first_death_tick: None,
            result: RunResult::Pass,
        }
    }

    /// Fold one event into the counts.
    pub fn record(&mut self, event: &TickedEvent) {
        let counts = &mut self.events;
        match &event.event {
            SimEvent::TargetAcquired { .. } => counts.targets_acquired += 1,
            SimEvent::TargetLost { .. } => counts.targets_lost += 1,
            SimEvent::Angered { .. } => counts.angered += 1,
            SimEvent::AttackSwing { .. } => counts.attack_swings += 1,
            SimEvent::Damaged { amount, .. } => {
                counts.damaged += 1;
                self.total_damage += f64::from(*amount);
            }
            SimEvent::Died { .. } => {
                counts.died += 1;
                self.first_death_tick.get_or_insert(event.tick.0);
            }
            SimEvent::ProjectileLaunched(_) => counts.projectiles_launched += 1,
            SimEvent::EquipmentChanged { .. } => counts.equipment_changes += 1,
        }
    }

    /// Fold a batch of events.
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a TickedEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Stamp the end-of-run totals.
    pub fn finish(&mut self, ticks: u64, creatures_alive: usize) {
        self.ticks = ticks;
        self.creatures_alive = creatures_alive;
    }
}

/// Writes [`RunMetrics`] to a JSON file.
pub struct MetricsSink {
    path: PathBuf,
}

impl MetricsSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Write the summary, replacing any previous file.
    pub fn write(&self, metrics: &RunMetrics) -> Result<()> {
        let json = serde_json::to_string_pretty(metrics)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        info!(path = %self.path.display(), scenario = %metrics.scenario, "run metrics written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natural_core::{EntityId, SimTick};
    use natural_world::DamageCause;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn at(tick: u64, event: SimEvent) -> TickedEvent {
        TickedEvent {
            tick: SimTick(tick),
            event,
        }
    }

    #[test]
    fn counts_follow_events() {
        let events = vec![
            at(
                3,
                SimEvent::TargetAcquired {
                    creature: EntityId(1),
                    target: EntityId(2),
                    interest: 400,
                },
            ),
            at(
                4,
                SimEvent::AttackSwing {
                    attacker: EntityId(1),
                    target: EntityId(2),
                },
            ),
            at(
                4,
                SimEvent::Damaged {
                    victim: EntityId(2),
                    attacker: Some(EntityId(1)),
                    cause: DamageCause::EntityAttack,
                    amount: 3.0,
                },
            ),
            at(
                9,
                SimEvent::Died {
                    entity: EntityId(2),
                    killer: Some(EntityId(1)),
                },
            ),
            at(
                12,
                SimEvent::Died {
                    entity: EntityId(5),
                    killer: None,
                },
            ),
        ];
        let mut metrics = RunMetrics::new("duel", 7, "portable");
        metrics.record_all(&events);
        metrics.finish(20, 1);

        assert_eq!(metrics.events.targets_acquired, 1);
        assert_eq!(metrics.events.attack_swings, 1);
        assert_eq!(metrics.events.died, 2);
        assert_eq!(metrics.total_damage, 3.0);
        assert_eq!(metrics.first_death_tick, Some(9));
        assert_eq!(metrics.ticks, 20);
    }

    #[test]
    fn metrics_sink_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "natural-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut metrics = RunMetrics::new("sink_test", 1, "lookup");
        metrics.finish(5, 0);

        let sink = MetricsSink::create(&path).unwrap();
        sink.write(&metrics).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("sink_test"));
        assert!(contents.contains("\"result\": \"pass\""));
        assert!(!contents.contains("first_death_tick"));
        let parsed: RunMetrics = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, metrics);
        fs::remove_file(&path).ok();
    }
}
