// src/pipeline/metrics.rs
//
// Planner observability. Tick counts, feature activity and tick timing.
// Cheap to clone; clones share the same counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PlannerMetrics {
    pub total_ticks: Arc<AtomicU64>,
    pub ticks_with_lead: Arc<AtomicU64>,
    pub adapted_ticks: Arc<AtomicU64>,
    pub advisor_limited_ticks: Arc<AtomicU64>,
    pub mode_trigger_updates: Arc<AtomicU64>,
    pub last_tick_us: Arc<AtomicU64>,
    pub max_tick_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl PlannerMetrics {
    pub fn new() -> Self {
        Self {
            total_ticks: Arc::new(AtomicU64::new(0)),
            ticks_with_lead: Arc::new(AtomicU64::new(0)),
            adapted_ticks: Arc::new(AtomicU64::new(0)),
            advisor_limited_ticks: Arc::new(AtomicU64::new(0)),
            mode_trigger_updates: Arc::new(AtomicU64::new(0)),
            last_tick_us: Arc::new(AtomicU64::new(0)),
            max_tick_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tick_time(&self, duration_us: u64) {
        self.last_tick_us.store(duration_us, Ordering::Relaxed);
        self.max_tick_us.fetch_max(duration_us, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.total_ticks.load(Ordering::Relaxed)
    }

    pub fn ticks_per_sec(&self) -> f64 {
        let ticks = self.ticks();
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            ticks as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> PlannerMetricsSummary {
        PlannerMetricsSummary {
            total_ticks: self.ticks(),
            ticks_per_sec: self.ticks_per_sec(),
            ticks_with_lead: self.ticks_with_lead.load(Ordering::Relaxed),
            adapted_ticks: self.adapted_ticks.load(Ordering::Relaxed),
            advisor_limited_ticks: self.advisor_limited_ticks.load(Ordering::Relaxed),
            mode_trigger_updates: self.mode_trigger_updates.load(Ordering::Relaxed),
            last_tick_us: self.last_tick_us.load(Ordering::Relaxed),
            max_tick_us: self.max_tick_us.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for PlannerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannerMetricsSummary {
    pub total_ticks: u64,
    pub ticks_per_sec: f64,
    pub ticks_with_lead: u64,
    pub adapted_ticks: u64,
    pub advisor_limited_ticks: u64,
    pub mode_trigger_updates: u64,
    pub last_tick_us: u64,
    pub max_tick_us: u64,
    pub elapsed_secs: f64,
}
