// src/collaborators.rs
//
// Narrow interfaces to the modules the planner consults but does not own:
// a speed advisor for the road ahead and the driving-mode trigger. The
// planner only sees these traits; concrete implementations are wired in by
// the host process.

use crate::constants::COMFORT_BRAKE;
use crate::types::{LeadState, ModelOutput, VehicleState};
use serde::{Deserialize, Serialize};

// ============================================================================
// SPEED ADVISOR
// ============================================================================

/// Recommends a speed for the road ahead.
pub trait SpeedAdvisor {
    /// Target speed (m/s). Anything at or below `CRUISING_SPEED` is read as
    /// "no opinion" and replaced by the requested cruise speed.
    fn target_speed(&mut self, v_ego: f32, a_ego: f32) -> f32;
}

/// Advisor that never has an opinion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeedAdvisor;

impl SpeedAdvisor for NoSpeedAdvisor {
    fn target_speed(&mut self, _v_ego: f32, _a_ego: f32) -> f32 {
        0.0
    }
}

/// A curve ahead of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpcomingCurve {
    /// Path curvature at the apex (1/m).
    pub curvature: f32,
    /// Distance to the apex (m).
    pub distance: f32,
}

/// Below this the curve is treated as straight road (1/m).
const MIN_ADVISORY_CURVATURE: f32 = 1e-4;

/// Lateral-acceleration speed advisor for an upcoming curve.
///
/// The apex speed is `sqrt(a_lat / κ)`. The advisory speed now is the speed
/// from which a comfortable brake still reaches the apex speed by the apex:
/// `sqrt(v_apex² + 2·COMFORT_BRAKE·d)`.
#[derive(Debug, Clone)]
pub struct CurvatureSpeedAdvisor {
    target_lat_accel: f32,
    curve: Option<UpcomingCurve>,
}

impl CurvatureSpeedAdvisor {
    pub fn new(target_lat_accel: f32) -> Self {
        Self {
            target_lat_accel,
            curve: None,
        }
    }

    /// Set on every configuration refresh.
    pub fn set_target_lat_accel(&mut self, target_lat_accel: f32) {
        self.target_lat_accel = target_lat_accel;
    }

    /// Set each tick from the map/route source; `None` when no curve is known.
    pub fn set_upcoming_curve(&mut self, curve: Option<UpcomingCurve>) {
        self.curve = curve;
    }

    pub fn target_lat_accel(&self) -> f32 {
        self.target_lat_accel
    }
}

impl SpeedAdvisor for CurvatureSpeedAdvisor {
    fn target_speed(&mut self, _v_ego: f32, _a_ego: f32) -> f32 {
        let Some(curve) = self.curve else {
            return 0.0;
        };

        let curvature = curve.curvature.abs();
        if !curvature.is_finite() || curvature < MIN_ADVISORY_CURVATURE {
            return 0.0;
        }

        let v_apex_sq = self.target_lat_accel.max(0.0) / curvature;
        let braking = 2.0 * COMFORT_BRAKE * curve.distance.max(0.0);
        (v_apex_sq + braking).sqrt()
    }
}

// ============================================================================
// MODE TRIGGER
// ============================================================================

/// Everything the mode trigger sees on one tick.
#[derive(Debug, Clone, Copy)]
pub struct ModeTriggerInput<'a> {
    pub vehicle: &'a VehicleState,
    pub lead: &'a LeadState,
    pub model: &'a ModelOutput,
    pub enabled: bool,
    pub road_curvature: f32,
    pub t_follow: f32,
    pub v_ego: f32,
}

/// Observations published by the mode trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTriggerState {
    /// The trigger wants experimental mode on.
    pub experimental_mode: bool,
    pub red_light_detected: bool,
}

/// Decides whether to switch driving mode.
pub trait ModeTrigger {
    fn update(&mut self, input: &ModeTriggerInput<'_>);

    fn state(&self) -> ModeTriggerState;
}

/// Trigger that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct InactiveModeTrigger;

impl ModeTrigger for InactiveModeTrigger {
    fn update(&mut self, _input: &ModeTriggerInput<'_>) {}

    fn state(&self) -> ModeTriggerState {
        ModeTriggerState::default()
    }
}
