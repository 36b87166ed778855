// src/longitudinal/follow.rs
//
// Adaptive following gap.
//
// Each tick with a lead, the personality tier supplies a baseline jerk
// coefficient and time-gap. With aggressive acceleration enabled, both are
// divided by an acceleration offset derived from the lead's relative motion,
// which lets the vehicle take off more naturally behind a lead that is
// pulling away. The offset is clipped to [1, distance_factor], so the
// adaptation can only shrink the baseline, never grow it.
//
// The previous tick's time-gap is carried in `FollowGapState` and feeds the
// desired follow distance published this tick.

use crate::config::{PersonalityParams, PersonalityTier};
use crate::constants::{COMFORT_BRAKE, NO_LEAD_T_FOLLOW, STOP_DISTANCE};
use crate::interp::clip;
use crate::types::{LeadState, Personality};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// PERSONALITY LOOKUP
// ============================================================================

/// Stock jerk/time-gap table.
pub fn stock_tier(personality: Personality) -> PersonalityTier {
    match personality {
        Personality::Aggressive => PersonalityTier {
            jerk: 0.5,
            follow: 1.25,
        },
        Personality::Standard => PersonalityTier {
            jerk: 1.0,
            follow: 1.45,
        },
        Personality::Relaxed => PersonalityTier {
            jerk: 1.0,
            follow: 1.75,
        },
    }
}

/// Baseline jerk and time-gap for the active personality.
pub fn base_tier(personalities: &PersonalityParams, personality: Personality) -> PersonalityTier {
    if personalities.custom_personalities {
        personalities.tier(personality)
    } else {
        stock_tier(personality)
    }
}

// ============================================================================
// DISTANCE HELPERS
// ============================================================================

/// Standstill distance: base plus whatever part of the configured extra
/// distance the current speed has not yet covered (m).
pub fn stopping_distance(extra_m: f32, v_ego: f32) -> f32 {
    STOP_DISTANCE + (extra_m - v_ego).max(0.0)
}

/// Distance the solver keeps to an obstacle at `v_ego` with time-gap `t_follow` (m).
pub fn safe_obstacle_distance(v_ego: f32, t_follow: f32) -> f32 {
    v_ego * v_ego / (2.0 * COMFORT_BRAKE) + t_follow * v_ego + STOP_DISTANCE
}

/// Braking distance of the lead at `v_lead` (m).
pub fn stopped_equivalence_factor(v_lead: f32) -> f32 {
    v_lead * v_lead / (2.0 * COMFORT_BRAKE)
}

// ============================================================================
// ADAPTATION
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct FollowInputs {
    pub base_jerk: f32,
    pub base_t_follow: f32,
    /// Ego speed (m/s, >= 0).
    pub v_ego: f32,
    /// Absolute lead speed (m/s).
    pub v_lead: f32,
    /// Distance to the lead (m).
    pub d_rel: f32,
    /// Configured extra standstill distance (m).
    pub extra_stopping_distance: f32,
    pub aggressive_acceleration: bool,
    /// Conservative formula: adapt only the time-gap.
    pub release: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowValues {
    pub jerk: f32,
    pub t_follow: f32,
    /// Divisor applied to the baseline; always in [1, distance_factor].
    pub accel_offset: f32,
}

/// Apply the acceleration offset to the baseline jerk/time-gap.
pub fn adapt_follow_values(input: &FollowInputs) -> FollowValues {
    let unchanged = FollowValues {
        jerk: input.base_jerk,
        t_follow: input.base_t_follow,
        accel_offset: 1.0,
    };

    if !input.aggressive_acceleration {
        return unchanged;
    }

    let v_ego = input.v_ego;
    let stopping = stopping_distance(input.extra_stopping_distance, v_ego);
    let lead_distance = input.d_rel + stopping;

    if !input.release {
        let distance_factor = (lead_distance - v_ego * input.base_t_follow).max(1.0);
        let standstill_offset = (stopping - v_ego).max(0.0);
        let accel_offset = clip(
            (input.v_lead - v_ego) + standstill_offset - COMFORT_BRAKE,
            1.0,
            distance_factor,
        );
        FollowValues {
            jerk: input.base_jerk / accel_offset,
            t_follow: input.base_t_follow / accel_offset,
            accel_offset,
        }
    } else {
        let distance_factor = (lead_distance - input.v_lead * input.base_t_follow).max(1.0);
        let standstill_offset = (STOP_DISTANCE - v_ego.powf(COMFORT_BRAKE)).max(0.0);
        let accel_offset = clip(
            (input.v_lead - v_ego) + standstill_offset - COMFORT_BRAKE,
            1.0,
            distance_factor,
        );
        FollowValues {
            jerk: input.base_jerk,
            t_follow: input.base_t_follow / accel_offset,
            accel_offset,
        }
    }
}

// ============================================================================
// STATEFUL ADAPTER
// ============================================================================

/// Carried across ticks. `t_follow` is last tick's published time-gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowGapState {
    pub jerk: f32,
    pub t_follow: f32,
}

impl Default for FollowGapState {
    fn default() -> Self {
        Self {
            jerk: 0.0,
            t_follow: NO_LEAD_T_FOLLOW,
        }
    }
}

/// Per-tick settings for the adapter.
#[derive(Debug, Clone, Copy)]
pub struct FollowContext<'a> {
    pub v_ego: f32,
    pub personality: Personality,
    pub personalities: &'a PersonalityParams,
    /// Extra standstill distance (m).
    pub extra_stopping_distance: f32,
    pub aggressive_acceleration: bool,
    pub release: bool,
    pub time_gap_floor: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpdate {
    pub jerk: f32,
    pub t_follow: f32,
    /// Desired distance using last tick's time-gap (m, truncated).
    pub safe_obstacle_distance: i32,
    /// Desired distance using the baseline time-gap (m, truncated).
    pub safe_obstacle_distance_stock: i32,
    pub stopped_equivalence_factor: i32,
    /// Baseline was divided by an offset > 1.
    pub adapted: bool,
}

impl FollowUpdate {
    pub fn desired_follow_distance(&self) -> i32 {
        self.safe_obstacle_distance - self.stopped_equivalence_factor
    }
}

pub struct FollowGapAdapter {
    state: FollowGapState,
}

impl FollowGapAdapter {
    pub fn new() -> Self {
        Self::with_state(FollowGapState::default())
    }

    pub fn with_state(state: FollowGapState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> FollowGapState {
        self.state
    }

    /// Advance one tick. `lead` is `None` when no lead is tracked or the
    /// vehicle does not run its own longitudinal control.
    pub fn update(&mut self, lead: Option<&LeadState>, ctx: &FollowContext) -> FollowUpdate {
        let Some(lead) = lead else {
            self.state = FollowGapState::default();
            return FollowUpdate {
                jerk: self.state.jerk,
                t_follow: self.state.t_follow,
                ..FollowUpdate::default()
            };
        };

        let base = base_tier(ctx.personalities, ctx.personality);

        // Distances are published as whole metres, truncated toward zero
        let safe_distance = safe_obstacle_distance(ctx.v_ego, self.state.t_follow) as i32;
        let safe_distance_stock = safe_obstacle_distance(ctx.v_ego, base.follow) as i32;
        let lead_braking_distance = stopped_equivalence_factor(lead.v_lead) as i32;

        let values = adapt_follow_values(&FollowInputs {
            base_jerk: base.jerk,
            base_t_follow: base.follow,
            v_ego: ctx.v_ego,
            v_lead: lead.v_lead,
            d_rel: lead.d_rel,
            extra_stopping_distance: ctx.extra_stopping_distance,
            aggressive_acceleration: ctx.aggressive_acceleration,
            release: ctx.release,
        });

        let t_follow = values.t_follow.max(ctx.time_gap_floor);
        let adapted = values.accel_offset > 1.0;

        if adapted {
            debug!(
                "Follow gap adapted ({}): offset={:.2} | t_follow {:.2}s -> {:.2}s | jerk {:.2} -> {:.2} | d_rel={:.1}m v_lead={:.1}m/s",
                ctx.personality.as_str(),
                values.accel_offset,
                base.follow,
                t_follow,
                base.jerk,
                values.jerk,
                lead.d_rel,
                lead.v_lead,
            );
        }

        self.state = FollowGapState {
            jerk: values.jerk,
            t_follow,
        };

        FollowUpdate {
            jerk: values.jerk,
            t_follow,
            safe_obstacle_distance: safe_distance,
            safe_obstacle_distance_stock: safe_distance_stock,
            stopped_equivalence_factor: lead_braking_distance,
            adapted,
        }
    }

    pub fn reset(&mut self) {
        self.state = FollowGapState::default();
    }
}

impl Default for FollowGapAdapter {
    fn default() -> Self {
        Self::new()
    }
}
