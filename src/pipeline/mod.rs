// src/pipeline/mod.rs

pub mod metrics;
pub mod outputs;
pub mod planner;
pub mod publisher;

pub use metrics::{PlannerMetrics, PlannerMetricsSummary};
pub use outputs::PlanningOutputs;
pub use planner::{LongitudinalPlanner, PlannerState};
pub use publisher::{JsonLinesPublisher, PlanPublisher};
