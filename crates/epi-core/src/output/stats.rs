//! Statistics Output
//!
//! Collects per-tick state tallies and writes a run summary for analysis.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use epi_events::{StateCounts, TransitionKind};

use super::OutputError;
use crate::systems::Transition;

/// Statistics output file name
pub const STATS_FILE_NAME: &str = "stats.json";

/// Statistics for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    pub tick: u64,
    /// Tallies after the tick completed
    pub counts: StateCounts,
    pub new_infections: usize,
    pub new_recoveries: usize,
    pub new_deaths: usize,
}

impl TickStats {
    /// Summarise one tick from its end-of-tick counts and committed transitions.
    pub fn from_transitions(tick: u64, counts: StateCounts, transitions: &[Transition]) -> Self {
        let mut stats = Self {
            tick,
            counts,
            ..Self::default()
        };
        for transition in transitions {
            match transition.kind() {
                Some(TransitionKind::Infection) => stats.new_infections += 1,
                Some(TransitionKind::Recovery) => stats.new_recoveries += 1,
                Some(TransitionKind::Death) => stats.new_deaths += 1,
                None => {}
            }
        }
        stats
    }
}

/// Overall simulation statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStats {
    pub run_id: Uuid,
    pub seed: u64,
    pub total_ticks: u64,
    pub population: usize,
    pub final_counts: StateCounts,
    pub peak_infected: usize,
    pub peak_tick: u64,
    pub total_infections: usize,
    pub total_recoveries: usize,
    pub total_deaths: usize,
    /// Share of the population ever infected
    pub attack_rate: f64,
    /// First tick after which no infected agents remained
    pub extinct_at: Option<u64>,
    pub tick_history: Vec<TickStats>,
}

/// Accumulates statistics during a run
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    history: Vec<TickStats>,
    total_infections: usize,
    total_recoveries: usize,
    total_deaths: usize,
    peak_infected: usize,
    peak_tick: u64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick (tick 0 is the initial state with no transitions)
    pub fn record(&mut self, stats: TickStats) {
        self.total_infections += stats.new_infections;
        self.total_recoveries += stats.new_recoveries;
        self.total_deaths += stats.new_deaths;
        if stats.counts.infected > self.peak_infected || self.history.is_empty() {
            self.peak_infected = stats.counts.infected;
            self.peak_tick = stats.tick;
        }
        self.history.push(stats);
    }

    pub fn history(&self) -> &[TickStats] {
        &self.history
    }

    pub fn latest(&self) -> Option<&TickStats> {
        self.history.last()
    }

    pub fn peak_infected(&self) -> (usize, u64) {
        (self.peak_infected, self.peak_tick)
    }

    /// Generate final statistics
    pub fn generate_stats(&self, seed: u64, extinct_at: Option<u64>) -> SimulationStats {
        let final_counts = self.latest().map(|s| s.counts).unwrap_or_default();
        let population = final_counts.total();
        let attack_rate = if population > 0 {
            final_counts.ever_infected() as f64 / population as f64
        } else {
            0.0
        };

        SimulationStats {
            run_id: Uuid::new_v4(),
            seed,
            total_ticks: self.latest().map_or(0, |s| s.tick),
            population,
            final_counts,
            peak_infected: self.peak_infected,
            peak_tick: self.peak_tick,
            total_infections: self.total_infections,
            total_recoveries: self.total_recoveries,
            total_deaths: self.total_deaths,
            attack_rate,
            extinct_at,
            tick_history: self.history.clone(),
        }
    }
}

/// Write statistics to `<dir>/stats.json`
pub fn write_stats(stats: &SimulationStats, dir: &Path) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(STATS_FILE_NAME);
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(&path, json)?;
    Ok(path)
}
