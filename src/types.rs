// src/types.rs
//
// Read-only snapshots handed to the planner once per tick. Field names
// follow the producing services; everything is plain data with serde so a
// recorded drive can be replayed tick by tick.

use serde::{Deserialize, Serialize};

/// Ego vehicle state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleState {
    /// Ego speed (m/s). May be slightly negative from the estimator.
    pub v_ego: f32,
    /// Ego acceleration (m/s²).
    pub a_ego: f32,
    /// Speed shown on the instrument cluster (m/s).
    pub v_ego_cluster: f32,
    /// Metric (km/h, m) vs imperial (mph, ft) display units.
    pub is_metric: bool,
}

/// Nearest tracked object ahead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadState {
    /// Whether a lead is currently tracked.
    pub status: bool,
    /// Longitudinal distance to the lead (m).
    pub d_rel: f32,
    /// Lead speed relative to ego (m/s, negative = closing).
    pub v_rel: f32,
    /// Absolute lead speed (m/s).
    pub v_lead: f32,
}

/// Driving personality reported by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Aggressive,
    #[default]
    Standard,
    Relaxed,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "AGGRESSIVE",
            Self::Standard => "STANDARD",
            Self::Relaxed => "RELAXED",
        }
    }
}

/// Controller state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsState {
    /// Requested cruise speed (km/h).
    pub v_cruise: f32,
    /// Requested cruise speed as shown on the cluster (km/h).
    pub v_cruise_cluster: f32,
    pub personality: Personality,
    /// Longitudinal automation engaged.
    pub enabled: bool,
    /// Experimental (more permissive) mode active.
    pub experimental_mode: bool,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            v_cruise: 0.0,
            v_cruise_cluster: 0.0,
            personality: Personality::Standard,
            enabled: false,
            experimental_mode: false,
        }
    }
}

/// Localization quality flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationState {
    /// Filter status reported as valid.
    pub status_valid: bool,
    /// Geodetic position marked valid.
    pub position_valid: bool,
    /// GPS receiver reports a usable fix.
    pub gps_ok: bool,
}

impl LocalizationState {
    /// All three checks must pass before map-based advisors are trusted.
    pub fn is_valid(&self) -> bool {
        self.status_valid && self.position_valid && self.gps_ok
    }
}

/// A model-predicted line in the ego frame: `x` forward, `y` lateral (m).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polyline {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl Polyline {
    pub fn new(x: Vec<f32>, y: Vec<f32>) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }
}

/// Driving-model output consumed by the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOutput {
    /// Lane lines, left to right: far-left, left, right, far-right.
    pub lane_lines: [Polyline; 4],
    /// Road edges: left, right.
    pub road_edges: [Polyline; 2],
    /// Predicted forward velocity along the plan (m/s).
    pub velocity_x: Vec<f32>,
    /// Predicted lateral acceleration along the plan (m/s²).
    pub acceleration_y: Vec<f32>,
}

/// Static vehicle capabilities, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarParams {
    /// The vehicle runs our own longitudinal control (not the stock ACC).
    pub openpilot_longitudinal_control: bool,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            openpilot_longitudinal_control: true,
        }
    }
}

/// Everything the planner reads for one tick, snapshotted atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub vehicle: VehicleState,
    pub lead: LeadState,
    pub controls: ControlsState,
    pub localization: LocalizationState,
    pub model: ModelOutput,
    /// Upstream messages are fresh and valid.
    pub inputs_valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_names() {
        assert_eq!(Personality::Aggressive.as_str(), "AGGRESSIVE");
        assert_eq!(Personality::default().as_str(), "STANDARD");

        let parsed: Personality = serde_json::from_str("\"relaxed\"").unwrap();
        assert_eq!(parsed.as_str(), "RELAXED");
        assert!(serde_json::from_str::<Personality>("\"sporty\"").is_err());
    }
}
