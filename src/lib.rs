// src/lib.rs
//
// Longitudinal planning arbitration: acceleration envelope, adaptive follow
// gap and cruise target, computed once per planning tick.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod interp;
pub mod longitudinal;
pub mod pipeline;
pub mod types;

pub use collaborators::{
    CurvatureSpeedAdvisor, InactiveModeTrigger, ModeTrigger, ModeTriggerInput, ModeTriggerState,
    NoSpeedAdvisor, SpeedAdvisor, UpcomingCurve,
};
pub use config::{ConfigError, PlannerParams, PlannerSettings};
pub use pipeline::{LongitudinalPlanner, PlannerState, PlanningOutputs};
pub use types::TickInput;
