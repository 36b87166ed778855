// src/longitudinal/profiles.rs
//
// Speed-dependent acceleration bounds for the tunable driving profiles.
// Eco and Sport each carry their own min/max tables; Standard defers to the
// stock curve (max) and the stock constant (min).

use crate::config::{AccelerationProfile, DecelerationProfile};
use crate::constants::{A_CRUISE_MAX_BP, A_CRUISE_MAX_VALS, A_CRUISE_MIN};
use crate::interp::interp;

// ============================================================================
// BREAKPOINT TABLES
// ============================================================================

/// Min-accel breakpoints (m/s). ≈ 0, 18, 36, 63, 94 mph.
const A_CRUISE_MIN_BP_CUSTOM: [f32; 5] = [0.0, 8.0, 16.0, 28.0, 42.0];
/// Max-accel breakpoints (m/s). ≈ 0, 6.7, 13.4, 17.9, 24.6, 33.6, 44.7, 55.9, 67.1, 123 mph.
const A_CRUISE_MAX_BP_CUSTOM: [f32; 10] = [0.0, 3.0, 6.0, 8.0, 11.0, 15.0, 20.0, 25.0, 30.0, 55.0];

const A_CRUISE_MIN_VALS_ECO: [f32; 5] = [-0.001, -0.010, -0.28, -0.56, -0.56];
const A_CRUISE_MAX_VALS_ECO: [f32; 10] = [3.5, 3.2, 2.3, 2.0, 1.15, 0.80, 0.58, 0.36, 0.30, 0.091];

const A_CRUISE_MIN_VALS_SPORT: [f32; 5] = [-0.50, -0.52, -0.55, -0.57, -0.60];
const A_CRUISE_MAX_VALS_SPORT: [f32; 10] = [3.5, 3.5, 3.3, 2.8, 1.5, 1.0, 0.75, 0.6, 0.38, 0.2];

/// A piecewise-linear acceleration curve over ego speed.
#[derive(Debug, Clone, Copy)]
pub struct AccelCurve {
    pub name: &'static str,
    breakpoints: &'static [f32],
    values: &'static [f32],
}

impl AccelCurve {
    /// Bound at `v_ego` (m/s), clamped to the end values outside the table.
    pub fn at(&self, v_ego: f32) -> f32 {
        interp(v_ego, self.breakpoints, self.values)
    }

    pub fn breakpoints(&self) -> &'static [f32] {
        self.breakpoints
    }

    pub fn values(&self) -> &'static [f32] {
        self.values
    }
}

pub const ECO_MIN: AccelCurve = AccelCurve {
    name: "eco_min",
    breakpoints: &A_CRUISE_MIN_BP_CUSTOM,
    values: &A_CRUISE_MIN_VALS_ECO,
};

pub const ECO_MAX: AccelCurve = AccelCurve {
    name: "eco_max",
    breakpoints: &A_CRUISE_MAX_BP_CUSTOM,
    values: &A_CRUISE_MAX_VALS_ECO,
};

pub const SPORT_MIN: AccelCurve = AccelCurve {
    name: "sport_min",
    breakpoints: &A_CRUISE_MIN_BP_CUSTOM,
    values: &A_CRUISE_MIN_VALS_SPORT,
};

pub const SPORT_MAX: AccelCurve = AccelCurve {
    name: "sport_max",
    breakpoints: &A_CRUISE_MAX_BP_CUSTOM,
    values: &A_CRUISE_MAX_VALS_SPORT,
};

pub const STOCK_MAX: AccelCurve = AccelCurve {
    name: "stock_max",
    breakpoints: &A_CRUISE_MAX_BP,
    values: &A_CRUISE_MAX_VALS,
};

// ============================================================================
// LOOKUPS
// ============================================================================

/// Custom max-accel curve for a profile; `None` for Standard.
pub fn max_accel_curve(profile: AccelerationProfile) -> Option<&'static AccelCurve> {
    match profile {
        AccelerationProfile::Eco => Some(&ECO_MAX),
        AccelerationProfile::Sport | AccelerationProfile::SportPlus => Some(&SPORT_MAX),
        AccelerationProfile::Standard => None,
    }
}

/// Custom min-accel curve for a profile; `None` for Standard.
pub fn min_accel_curve(profile: DecelerationProfile) -> Option<&'static AccelCurve> {
    match profile {
        DecelerationProfile::Eco => Some(&ECO_MIN),
        DecelerationProfile::Sport => Some(&SPORT_MIN),
        DecelerationProfile::Standard => None,
    }
}

/// Max acceleration for a profile at `v_ego`; Standard uses the stock curve.
pub fn max_accel(profile: AccelerationProfile, v_ego: f32) -> f32 {
    max_accel_curve(profile).unwrap_or(&STOCK_MAX).at(v_ego)
}

/// Min acceleration for a profile at `v_ego`; Standard uses the stock constant.
pub fn min_accel(profile: DecelerationProfile, v_ego: f32) -> f32 {
    min_accel_curve(profile)
        .map(|curve| curve.at(v_ego))
        .unwrap_or(A_CRUISE_MIN)
}
