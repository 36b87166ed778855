// src/longitudinal/envelope.rs
//
// Per-tick selection of the active [min, max] acceleration bounds.

use super::profiles;
use crate::config::{AccelerationProfile, DecelerationProfile};
use crate::constants::{ACCEL_MAX, ACCEL_MIN};
use crate::interp::clip;
use serde::{Deserialize, Serialize};

/// Active acceleration bounds (m/s²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelEnvelope {
    pub min_accel: f32,
    pub max_accel: f32,
}

impl AccelEnvelope {
    /// Clip both bounds into the hardware limits.
    pub fn within_hardware_limits(self) -> Self {
        Self {
            min_accel: clip(self.min_accel, ACCEL_MIN, ACCEL_MAX),
            max_accel: clip(self.max_accel, ACCEL_MIN, ACCEL_MAX),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnvelopeRequest {
    /// Ego speed (m/s), already clamped to >= 0.
    pub v_ego: f32,
    pub acceleration_profile: AccelerationProfile,
    pub deceleration_profile: DecelerationProfile,
    pub experimental_mode: bool,
    /// The advisory target sat below the requested cruise speed last tick.
    pub cruise_increased: bool,
}

/// Select the acceleration envelope for this tick.
///
/// Max: Eco/Sport curve if selected, otherwise the stock curve, or the
/// hardware maximum in experimental mode. Min: Eco/Sport curve only while the
/// cruise target has not just been raised, otherwise the stock constant, or
/// the hardware minimum in experimental mode.
pub fn select_envelope(req: &EnvelopeRequest) -> AccelEnvelope {
    let max_accel = match profiles::max_accel_curve(req.acceleration_profile) {
        Some(curve) => curve.at(req.v_ego),
        None if !req.experimental_mode => profiles::max_accel(AccelerationProfile::Standard, req.v_ego),
        None => ACCEL_MAX,
    };

    let custom_min = if req.cruise_increased {
        None
    } else {
        profiles::min_accel_curve(req.deceleration_profile)
    };

    let min_accel = match custom_min {
        Some(curve) => curve.at(req.v_ego),
        None if !req.experimental_mode => profiles::min_accel(DecelerationProfile::Standard, req.v_ego),
        None => ACCEL_MIN,
    };

    AccelEnvelope {
        min_accel,
        max_accel,
    }
    .within_hardware_limits()
}
