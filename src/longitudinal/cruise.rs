// src/longitudinal/cruise.rs
//
// Cruise target arbitration.
//
// The curvature speed advisor's recommendation is fused with the driver's
// requested cruise speed. The advisory target from the previous tick gives a
// one-tick-lagged "advisor active" flag: once the advisor holds the target
// below the request, a momentary low road-curvature reading can no longer
// release it.
//
// Final selection collects every advisory candidate, replaces any candidate
// at or below the low-speed floor with the requested speed, and takes the
// minimum. An advisor that emits the floor is saying "no opinion".

use crate::collaborators::SpeedAdvisor;
use crate::constants::CRUISING_SPEED;
use crate::interp::clip;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Road curvature below which the curvature gate can release the advisor.
const CURVATURE_GATE_THRESHOLD: f32 = 1.0;

/// Carried across ticks for hysteresis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CruiseArbitrationState {
    /// Last tick's advisory target (m/s). Starts at 0.
    pub advisory_target: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisorToggles {
    pub advisor_enabled: bool,
    pub curvature_gate_enabled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CruiseRequest {
    /// Requested cruise speed (m/s), already capped.
    pub v_cruise: f32,
    /// Ego speed (m/s, >= 0).
    pub v_ego: f32,
    pub a_ego: f32,
    /// Curvature metric for the road ahead.
    pub road_curvature: f32,
    /// Longitudinal automation engaged.
    pub enabled: bool,
    pub localization_valid: bool,
}

/// Final cruise target from a set of advisory candidates.
///
/// Candidates at or below `CRUISING_SPEED` carry no opinion and are
/// replaced with `v_cruise`. With no candidates the request passes through.
pub fn select_cruise_target(candidates: &[f32], v_cruise: f32) -> f32 {
    candidates
        .iter()
        .map(|&target| if target > CRUISING_SPEED { target } else { v_cruise })
        .reduce(f32::min)
        .unwrap_or(v_cruise)
}

pub struct CruiseTargetArbiter {
    state: CruiseArbitrationState,
}

impl CruiseTargetArbiter {
    pub fn new() -> Self {
        Self::with_state(CruiseArbitrationState::default())
    }

    pub fn with_state(state: CruiseArbitrationState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> CruiseArbitrationState {
        self.state
    }

    pub fn advisory_target(&self) -> f32 {
        self.state.advisory_target
    }

    /// Whether last tick's advisory target sat below the request. Read before
    /// `update` so it reflects the previous tick.
    pub fn cruise_increased(&self, v_cruise: f32) -> bool {
        self.state.advisory_target < v_cruise
    }

    /// Advance one tick and return the final cruise target (m/s).
    pub fn update<A: SpeedAdvisor + ?Sized>(
        &mut self,
        req: &CruiseRequest,
        toggles: &AdvisorToggles,
        advisor: &mut A,
    ) -> f32 {
        let previous = self.state.advisory_target;

        let advisor_usable = toggles.advisor_enabled
            && req.v_ego > CRUISING_SPEED
            && req.enabled
            && req.localization_valid;

        let advisory_target = if advisor_usable {
            let advisor_active = previous < req.v_cruise;

            let mut target = clip(
                advisor.target_speed(req.v_ego, req.a_ego),
                CRUISING_SPEED,
                req.v_cruise,
            );

            if toggles.curvature_gate_enabled
                && req.road_curvature < CURVATURE_GATE_THRESHOLD
                && !advisor_active
            {
                target = req.v_cruise;
            }
            if target == CRUISING_SPEED {
                target = req.v_cruise;
            }
            target
        } else {
            req.v_cruise
        };

        let was_limiting = previous < req.v_cruise;
        let is_limiting = advisory_target < req.v_cruise;
        if was_limiting != is_limiting {
            debug!(
                "Speed advisor {}: target={:.2}m/s cruise={:.2}m/s v_ego={:.2}m/s curvature={:.3}",
                if is_limiting { "engaged" } else { "released" },
                advisory_target,
                req.v_cruise,
                req.v_ego,
                req.road_curvature,
            );
        }

        self.state.advisory_target = advisory_target;

        select_cruise_target(&[advisory_target], req.v_cruise)
    }

    pub fn reset(&mut self) {
        self.state = CruiseArbitrationState::default();
    }
}

impl Default for CruiseTargetArbiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedAdvisor(f32);

    impl SpeedAdvisor for FixedAdvisor {
        fn target_speed(&mut self, _v_ego: f32, _a_ego: f32) -> f32 {
            self.0
        }
    }

    const ON: AdvisorToggles = AdvisorToggles {
        advisor_enabled: true,
        curvature_gate_enabled: true,
    };

    fn request(road_curvature: f32) -> CruiseRequest {
        CruiseRequest {
            v_cruise: 30.0,
            v_ego: 25.0,
            a_ego: 0.0,
            road_curvature,
            enabled: true,
            localization_valid: true,
        }
    }

    #[test]
    fn test_disabled_advisor_passes_request_through() {
        let mut arbiter = CruiseTargetArbiter::new();
        let target = arbiter.update(&request(3.0), &AdvisorToggles::default(), &mut FixedAdvisor(12.0));
        assert_eq!(target, 30.0);
        assert_eq!(arbiter.advisory_target(), 30.0);
    }

    #[test]
    fn test_gating_conditions_pass_through() {
        let cases = [
            CruiseRequest { v_ego: 4.0, ..request(3.0) },
            CruiseRequest { enabled: false, ..request(3.0) },
            CruiseRequest { localization_valid: false, ..request(3.0) },
        ];
        for req in cases {
            let mut arbiter = CruiseTargetArbiter::new();
            assert_eq!(arbiter.update(&req, &ON, &mut FixedAdvisor(12.0)), 30.0);
        }
    }

    #[test]
    fn test_advisor_limits_speed_on_curve() {
        let mut arbiter = CruiseTargetArbiter::new();
        // Fresh state (target 0) counts as active, so the gate stays open
        let target = arbiter.update(&request(3.0), &ON, &mut FixedAdvisor(18.0));
        assert_eq!(target, 18.0);
        assert!(arbiter.cruise_increased(30.0));
    }

    #[test]
    fn test_curvature_gate_suppresses_inactive_advisor() {
        let mut arbiter = CruiseTargetArbiter::with_state(CruiseArbitrationState {
            advisory_target: 30.0,
        });
        let target = arbiter.update(&request(0.5), &ON, &mut FixedAdvisor(18.0));
        assert_eq!(target, 30.0, "low curvature with inactive advisor is ignored");
    }

    #[test]
    fn test_hysteresis_holds_through_curvature_dip() {
        let mut arbiter = CruiseTargetArbiter::with_state(CruiseArbitrationState {
            advisory_target: 30.0,
        });
        let mut advisor = FixedAdvisor(18.0);

        // Enough curvature: advisor engages
        assert_eq!(arbiter.update(&request(2.0), &ON, &mut advisor), 18.0);
        // Single-tick dip below 1.0: still limited
        assert_eq!(arbiter.update(&request(0.3), &ON, &mut advisor), 18.0);
        assert_eq!(arbiter.update(&request(2.0), &ON, &mut advisor), 18.0);
    }

    #[test]
    fn test_floor_value_falls_back_to_request() {
        let mut arbiter = CruiseTargetArbiter::new();
        let target = arbiter.update(&request(3.0), &ON, &mut FixedAdvisor(CRUISING_SPEED));
        assert_eq!(target, 30.0);
        assert_eq!(arbiter.advisory_target(), 30.0);

        // Below the floor is clipped up to it, then also treated as no opinion
        let target = arbiter.update(&request(3.0), &ON, &mut FixedAdvisor(1.0));
        assert_eq!(target, 30.0);
    }

    #[test]
    fn test_advisor_above_request_is_capped() {
        let mut arbiter = CruiseTargetArbiter::new();
        let target = arbiter.update(&request(3.0), &ON, &mut FixedAdvisor(45.0));
        assert_eq!(target, 30.0);
    }

    #[test]
    fn test_select_cruise_target_takes_minimum() {
        assert_eq!(select_cruise_target(&[], 30.0), 30.0);
        assert_eq!(select_cruise_target(&[22.0, 18.0, 26.0], 30.0), 18.0);
        assert_eq!(select_cruise_target(&[CRUISING_SPEED, 3.0], 30.0), 30.0);
        assert_eq!(select_cruise_target(&[CRUISING_SPEED, 25.0], 30.0), 25.0);
    }

    proptest! {
        /// Property: disabled advisor always returns the request
        #[test]
        fn prop_disabled_is_pass_through(
            v_cruise in 0.0f32..45.0f32,
            v_ego in 0.0f32..45.0f32,
            curvature in 0.0f32..5.0f32,
            advice in 0.0f32..60.0f32,
            previous in 0.0f32..45.0f32,
        ) {
            let mut arbiter = CruiseTargetArbiter::with_state(CruiseArbitrationState {
                advisory_target: previous,
            });
            let req = CruiseRequest { v_cruise, v_ego, road_curvature: curvature, ..request(0.0) };
            let target = arbiter.update(&req, &AdvisorToggles::default(), &mut FixedAdvisor(advice));
            prop_assert_eq!(target, v_cruise);
        }

        /// Property: the final target never exceeds the request
        #[test]
        fn prop_never_above_request(
            v_cruise in 0.0f32..45.0f32,
            v_ego in 0.0f32..45.0f32,
            curvature in 0.0f32..5.0f32,
            advice in 0.0f32..60.0f32,
        ) {
            let mut arbiter = CruiseTargetArbiter::new();
            let req = CruiseRequest { v_cruise, v_ego, road_curvature: curvature, ..request(0.0) };
            let target = arbiter.update(&req, &ON, &mut FixedAdvisor(advice));
            prop_assert!(target <= v_cruise);
        }
    }
}
