// src/constants.rs
//
// Physical limits, cost weights and unit conversions shared by every
// longitudinal component. Values match the stock longitudinal stack the
// planner sits in front of.

// ============================================================================
// HARDWARE LIMITS
// ============================================================================

/// Absolute minimum acceleration the actuator stack accepts (m/s²).
pub const ACCEL_MIN: f32 = -3.5;
/// Absolute maximum acceleration the actuator stack accepts (m/s²).
pub const ACCEL_MAX: f32 = 2.0;

// ============================================================================
// STOCK LONGITUDINAL TUNING
// ============================================================================

/// Default deceleration bound when no custom profile applies (m/s²).
pub const A_CRUISE_MIN: f32 = -1.2;

/// Stock max-accel curve breakpoints (m/s).
pub const A_CRUISE_MAX_BP: [f32; 4] = [0.0, 10.0, 25.0, 40.0];
/// Stock max-accel curve values (m/s²).
pub const A_CRUISE_MAX_VALS: [f32; 4] = [1.6, 1.2, 0.8, 0.6];

/// Upper cap on the requested cruise speed (km/h).
pub const V_CRUISE_MAX: f32 = 145.0;

/// Solver cost weight on acceleration change.
pub const A_CHANGE_COST: f32 = 200.0;
/// Solver cost weight on ego jerk.
pub const J_EGO_COST: f32 = 5.0;

/// Comfortable braking deceleration magnitude (m/s²).
pub const COMFORT_BRAKE: f32 = 2.5;
/// Base standstill distance kept behind a lead (m).
pub const STOP_DISTANCE: f32 = 6.0;

/// Time-gap published when no lead is tracked (s).
pub const NO_LEAD_T_FOLLOW: f32 = 1.45;

// ============================================================================
// SPEED THRESHOLDS
// ============================================================================

/// Roughly the coasting speed in drive. Below this the speed advisor is
/// inactive, and an advisory target at this value means "no opinion" (m/s).
pub const CRUISING_SPEED: f32 = 5.0;

/// Minimum speed for lane-width measurement (20 mph in m/s).
pub const LANE_CHANGE_SPEED_MIN: f32 = 20.0 * MPH_TO_MS;

// ============================================================================
// UNIT CONVERSIONS
// ============================================================================

pub const KPH_TO_MS: f32 = 1.0 / 3.6;
pub const MS_TO_KPH: f32 = 3.6;
pub const MS_TO_MPH: f32 = 2.236_936;
pub const MPH_TO_MS: f32 = 0.447_04;
pub const FOOT_TO_METER: f32 = 0.3048;
