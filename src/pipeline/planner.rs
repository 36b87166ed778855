// src/pipeline/planner.rs
//
// Per-tick orchestrator. Wires the acceleration envelope, the follow-gap
// adapter and the cruise arbiter together with the road geometry helpers and
// the two external collaborators.
//
// Single entry point: call process_tick() once per planning tick.
//
// Step order matters:
//   1. normalize requested cruise and ego speed
//   2. read cruise_increased from LAST tick's advisory target
//   3. acceleration envelope
//   4. lane widths, road curvature
//   5. follow gap (uses last tick's time-gap for the distance metrics)
//   6. cruise arbitration (updates the advisory target)
//   7. mode trigger
//   8. assemble the snapshot
//
// Settings are swapped in with refresh_settings() on the slow cadence; the
// tick path only ever reads them.

use super::metrics::PlannerMetrics;
use super::outputs::PlanningOutputs;
use crate::collaborators::{ModeTrigger, ModeTriggerInput, SpeedAdvisor};
use crate::config::PlannerSettings;
use crate::constants::{
    A_CHANGE_COST, J_EGO_COST, KPH_TO_MS, LANE_CHANGE_SPEED_MIN, MS_TO_KPH, MS_TO_MPH,
    V_CRUISE_MAX,
};
use crate::geometry::{self, LaneWidths};
use crate::longitudinal::{
    select_envelope, AdvisorToggles, CruiseArbitrationState, CruiseRequest, CruiseTargetArbiter,
    EnvelopeRequest, FollowContext, FollowGapAdapter, FollowGapState,
};
use crate::types::TickInput;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Log a status line every N ticks.
const STATUS_LOG_INTERVAL: u64 = 100;

/// Everything the planner carries from one tick to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    pub follow: FollowGapState,
    pub cruise: CruiseArbitrationState,
}

pub struct LongitudinalPlanner<A: SpeedAdvisor, M: ModeTrigger> {
    settings: PlannerSettings,
    advisor: A,
    mode_trigger: M,
    follow: FollowGapAdapter,
    cruise: CruiseTargetArbiter,
    metrics: PlannerMetrics,
}

impl<A: SpeedAdvisor, M: ModeTrigger> LongitudinalPlanner<A, M> {
    pub fn new(settings: PlannerSettings, advisor: A, mode_trigger: M) -> Self {
        info!(
            "Longitudinal planner ready: accel={:?} decel={:?} aggressive_accel={} advisor={} curvature_gate={}",
            settings.acceleration_profile,
            settings.deceleration_profile,
            settings.aggressive_acceleration,
            settings.advisor_enabled,
            settings.curvature_gate,
        );

        Self {
            settings,
            advisor,
            mode_trigger,
            follow: FollowGapAdapter::new(),
            cruise: CruiseTargetArbiter::new(),
            metrics: PlannerMetrics::new(),
        }
    }

    /// Swap in freshly resolved settings. Carried state is kept.
    pub fn refresh_settings(&mut self, settings: PlannerSettings) {
        if settings != self.settings {
            debug!("Planner settings changed");
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn advisor_mut(&mut self) -> &mut A {
        &mut self.advisor
    }

    pub fn mode_trigger(&self) -> &M {
        &self.mode_trigger
    }

    pub fn metrics(&self) -> &PlannerMetrics {
        &self.metrics
    }

    pub fn state(&self) -> PlannerState {
        PlannerState {
            follow: self.follow.state(),
            cruise: self.cruise.state(),
        }
    }

    /// Replace the carried state, e.g. to resume a recorded drive.
    pub fn restore_state(&mut self, state: PlannerState) {
        self.follow = FollowGapAdapter::with_state(state.follow);
        self.cruise = CruiseTargetArbiter::with_state(state.cruise);
    }

    pub fn reset(&mut self) {
        self.follow.reset();
        self.cruise.reset();
    }

    pub fn process_tick(&mut self, input: &TickInput) -> PlanningOutputs {
        let started = Instant::now();
        let settings = &self.settings;

        // ══════════════════════════════════════════════════════════════
        // 1. NORMALIZE
        // ══════════════════════════════════════════════════════════════
        let v_cruise = input.controls.v_cruise.min(V_CRUISE_MAX).max(0.0) * KPH_TO_MS;
        let v_ego = input.vehicle.v_ego.max(0.0);

        // ══════════════════════════════════════════════════════════════
        // 2-3. ACCELERATION ENVELOPE
        // ══════════════════════════════════════════════════════════════
        let cruise_increased = self.cruise.cruise_increased(v_cruise);
        let envelope = select_envelope(&EnvelopeRequest {
            v_ego,
            acceleration_profile: settings.acceleration_profile,
            deceleration_profile: settings.deceleration_profile,
            experimental_mode: input.controls.experimental_mode,
            cruise_increased,
        });

        // ══════════════════════════════════════════════════════════════
        // 4. ROAD GEOMETRY
        // ══════════════════════════════════════════════════════════════
        let lane_widths = if settings.check_lane_width && v_ego >= LANE_CHANGE_SPEED_MIN {
            geometry::lane_widths(&input.model)
        } else {
            LaneWidths::default()
        };
        let road_curvature = geometry::road_curvature(&input.model, v_ego);

        // ══════════════════════════════════════════════════════════════
        // 5. FOLLOW GAP
        // ══════════════════════════════════════════════════════════════
        let tracked_lead = (input.lead.status && settings.car.openpilot_longitudinal_control)
            .then_some(&input.lead);

        let follow = self.follow.update(
            tracked_lead,
            &FollowContext {
                v_ego,
                personality: input.controls.personality,
                personalities: &settings.personalities,
                extra_stopping_distance: settings.stopping_distance_m(input.vehicle.is_metric),
                aggressive_acceleration: settings.aggressive_acceleration,
                release: settings.release,
                time_gap_floor: settings.time_gap_floor,
            },
        );

        // ══════════════════════════════════════════════════════════════
        // 6. CRUISE TARGET
        // ══════════════════════════════════════════════════════════════
        let final_cruise = self.cruise.update(
            &CruiseRequest {
                v_cruise,
                v_ego,
                a_ego: input.vehicle.a_ego,
                road_curvature,
                enabled: input.controls.enabled,
                localization_valid: input.localization.is_valid(),
            },
            &AdvisorToggles {
                advisor_enabled: settings.advisor_enabled,
                curvature_gate_enabled: settings.curvature_gate,
            },
            &mut self.advisor,
        );
        let advisory_target = self.cruise.advisory_target();

        // ══════════════════════════════════════════════════════════════
        // 7. MODE TRIGGER
        // ══════════════════════════════════════════════════════════════
        let trigger_active = settings.conditional_experimental_mode || settings.green_light_alert;
        if trigger_active {
            self.mode_trigger.update(&ModeTriggerInput {
                vehicle: &input.vehicle,
                lead: &input.lead,
                model: &input.model,
                enabled: input.controls.enabled,
                road_curvature,
                t_follow: follow.t_follow,
                v_ego,
            });
        }
        let mode = self.mode_trigger.state();

        // ══════════════════════════════════════════════════════════════
        // 8. SNAPSHOT
        // ══════════════════════════════════════════════════════════════
        let jerk_scale = if input.lead.status { follow.jerk } else { 1.0 };
        let display_scale = if input.vehicle.is_metric {
            MS_TO_KPH
        } else {
            MS_TO_MPH
        };

        let outputs = PlanningOutputs {
            valid: input.inputs_valid,
            acceleration_jerk: A_CHANGE_COST * jerk_scale,
            acceleration_jerk_stock: A_CHANGE_COST,
            ego_jerk: J_EGO_COST * jerk_scale,
            ego_jerk_stock: J_EGO_COST,
            jerk: follow.jerk,
            t_follow: follow.t_follow,
            desired_follow_distance: follow.desired_follow_distance(),
            safe_obstacle_distance: follow.safe_obstacle_distance,
            safe_obstacle_distance_stock: follow.safe_obstacle_distance_stock,
            stopped_equivalence_factor: follow.stopped_equivalence_factor,
            min_acceleration: envelope.min_accel,
            max_acceleration: envelope.max_accel,
            v_cruise: final_cruise,
            adjusted_cruise: advisory_target * display_scale,
            lane_width_left: lane_widths.left,
            lane_width_right: lane_widths.right,
            conditional_experimental: mode.experimental_mode,
            red_light: mode.red_light_detected,
        };

        // ══════════════════════════════════════════════════════════════
        // METRICS
        // ══════════════════════════════════════════════════════════════
        let m = &self.metrics;
        m.inc(&m.total_ticks);
        if tracked_lead.is_some() {
            m.inc(&m.ticks_with_lead);
        }
        if follow.adapted {
            m.inc(&m.adapted_ticks);
        }
        if advisory_target < v_cruise {
            m.inc(&m.advisor_limited_ticks);
        }
        if trigger_active {
            m.inc(&m.mode_trigger_updates);
        }
        m.record_tick_time(started.elapsed().as_micros() as u64);

        let tick = m.ticks();
        if tick % STATUS_LOG_INTERVAL == 0 {
            info!(
                "Tick {}: v_ego={:.1}m/s cruise={:.1}m/s accel=[{:.2}, {:.2}] t_follow={:.2}s lead={} | {:.0} ticks/s",
                tick,
                v_ego,
                outputs.v_cruise,
                outputs.min_acceleration,
                outputs.max_acceleration,
                outputs.t_follow,
                tracked_lead.is_some(),
                m.ticks_per_sec(),
            );
        }

        outputs
    }
}
