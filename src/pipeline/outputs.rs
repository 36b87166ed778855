// src/pipeline/outputs.rs
//
// The snapshot published once per tick. Consumed by the trajectory solver
// and serialized at the publish boundary; never mutated after assembly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningOutputs {
    /// Upstream inputs were fresh and valid this tick.
    pub valid: bool,

    // Solver cost weights
    pub acceleration_jerk: f32,
    pub acceleration_jerk_stock: f32,
    pub ego_jerk: f32,
    pub ego_jerk_stock: f32,
    /// Adapted jerk coefficient (0 without a lead).
    pub jerk: f32,
    /// Time-gap (s).
    pub t_follow: f32,

    // Follow distances (m, whole metres)
    pub desired_follow_distance: i32,
    pub safe_obstacle_distance: i32,
    pub safe_obstacle_distance_stock: i32,
    pub stopped_equivalence_factor: i32,

    // Acceleration envelope (m/s²)
    pub min_acceleration: f32,
    pub max_acceleration: f32,

    /// Final cruise target (m/s).
    pub v_cruise: f32,
    /// Advisory target in display units (km/h or mph).
    pub adjusted_cruise: f32,

    /// Lane widths (m), 0 when not measured.
    pub lane_width_left: f32,
    pub lane_width_right: f32,

    pub conditional_experimental: bool,
    pub red_light: bool,
}
