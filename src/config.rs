// src/config.rs
//
// User-tunable parameters. The YAML file is parsed into `PlannerParams`,
// validated once, then resolved into the immutable `PlannerSettings` the
// per-tick path reads. Resolution happens on the slow refresh cadence,
// never inside a tick.

use crate::constants::FOOT_TO_METER;
use crate::longitudinal::follow::stock_tier;
use crate::types::{CarParams, Personality};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("personality '{tier}' has invalid {field}: {value} (must be finite and > 0)")]
    InvalidPersonality {
        tier: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("turn speed aggressiveness {0}% outside 1..=200")]
    AggressivenessOutOfRange(u32),

    #[error("stopping distance must be >= 0, got {0}")]
    NegativeStoppingDistance(i32),

    #[error("time gap floor must be finite and > 0, got {0}")]
    InvalidTimeGapFloor(f32),

    #[error("{table} personality '{tier}' follows at {follow}s, below the time gap floor {floor}s")]
    FollowBelowTimeGapFloor {
        table: &'static str,
        tier: &'static str,
        follow: f32,
        floor: f32,
    },

    #[error("param refresh interval must be at least one tick")]
    ZeroRefreshInterval,
}

// ============================================================================
// PARAMETER FILE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    pub car: CarParams,
    pub longitudinal: LongitudinalParams,
    pub personalities: PersonalityParams,
    pub turn_speed: TurnSpeedParams,
    pub mode_trigger: ModeTriggerParams,
    pub lanes: LaneParams,
    pub follow: FollowParams,
    pub logging: LoggingConfig,
    pub replay: ReplayParams,
}

/// Acceleration profile. `Sport` and `SportPlus` share one curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelerationProfile {
    #[default]
    Standard,
    Eco,
    Sport,
    SportPlus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecelerationProfile {
    #[default]
    Standard,
    Eco,
    Sport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudinalParams {
    /// Master switch for every custom longitudinal option below.
    pub longitudinal_tune: bool,
    pub acceleration_profile: AccelerationProfile,
    pub deceleration_profile: DecelerationProfile,
    /// Shrink jerk/time-gap on takeoff behind a pulling-away lead.
    pub aggressive_acceleration: bool,
    /// Extra standstill distance, in display units (m or ft).
    pub stopping_distance: i32,
    /// Selects the conservative follow-gap formula.
    pub release: bool,
}

impl Default for LongitudinalParams {
    fn default() -> Self {
        Self {
            longitudinal_tune: false,
            acceleration_profile: AccelerationProfile::Standard,
            deceleration_profile: DecelerationProfile::Standard,
            aggressive_acceleration: false,
            stopping_distance: 0,
            release: false,
        }
    }
}

/// Jerk coefficient and base following time for one personality tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTier {
    pub jerk: f32,
    pub follow: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityParams {
    /// Use the tiers below instead of the stock table.
    pub custom_personalities: bool,
    pub aggressive: PersonalityTier,
    pub standard: PersonalityTier,
    pub relaxed: PersonalityTier,
}

impl Default for PersonalityParams {
    fn default() -> Self {
        Self {
            custom_personalities: false,
            aggressive: stock_tier(Personality::Aggressive),
            standard: stock_tier(Personality::Standard),
            relaxed: stock_tier(Personality::Relaxed),
        }
    }
}

impl PersonalityParams {
    pub fn tier(&self, personality: Personality) -> PersonalityTier {
        match personality {
            Personality::Aggressive => self.aggressive,
            Personality::Standard => self.standard,
            Personality::Relaxed => self.relaxed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnSpeedParams {
    /// Curvature speed advisor.
    pub enabled: bool,
    /// Ignore low road-curvature readings unless the advisor is already active.
    pub curvature_check: bool,
    /// Percentage scaling of the advisor's lateral acceleration target.
    pub aggressiveness: u32,
}

impl Default for TurnSpeedParams {
    fn default() -> Self {
        Self {
            enabled: false,
            curvature_check: false,
            aggressiveness: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeTriggerParams {
    pub conditional_experimental: bool,
    pub custom_alerts: bool,
    pub green_light_alert: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    pub custom_ui: bool,
    pub adjacent_path: bool,
    pub blind_spot_path: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowParams {
    /// Lower bound on the adapted time-gap (s).
    pub time_gap_floor: f32,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            time_gap_floor: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayParams {
    /// Re-read the parameter file every N ticks.
    pub param_refresh_ticks: u64,
}

impl Default for ReplayParams {
    fn default() -> Self {
        Self {
            param_refresh_ticks: 20,
        }
    }
}

impl PlannerParams {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        let params = Self::from_yaml(&contents)
            .with_context(|| format!("parsing parameter file {}", path.display()))?;
        Ok(params)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let params: PlannerParams = serde_yaml::from_str(contents)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.personalities;
        for (tier, values) in [
            ("aggressive", p.aggressive),
            ("standard", p.standard),
            ("relaxed", p.relaxed),
        ] {
            if !(values.jerk.is_finite() && values.jerk > 0.0) {
                return Err(ConfigError::InvalidPersonality {
                    tier,
                    field: "jerk",
                    value: values.jerk,
                });
            }
            if !(values.follow.is_finite() && values.follow > 0.0) {
                return Err(ConfigError::InvalidPersonality {
                    tier,
                    field: "follow",
                    value: values.follow,
                });
            }
        }

        if !(1..=200).contains(&self.turn_speed.aggressiveness) {
            return Err(ConfigError::AggressivenessOutOfRange(
                self.turn_speed.aggressiveness,
            ));
        }

        if self.longitudinal.stopping_distance < 0 {
            return Err(ConfigError::NegativeStoppingDistance(
                self.longitudinal.stopping_distance,
            ));
        }

        let floor = self.follow.time_gap_floor;
        if !(floor.is_finite() && floor > 0.0) {
            return Err(ConfigError::InvalidTimeGapFloor(floor));
        }

        // Either table may be active at runtime, so both must clear the floor
        for personality in [
            Personality::Aggressive,
            Personality::Standard,
            Personality::Relaxed,
        ] {
            for (table, tier) in [
                ("custom", p.tier(personality)),
                ("stock", stock_tier(personality)),
            ] {
                if tier.follow < floor {
                    return Err(ConfigError::FollowBelowTimeGapFloor {
                        table,
                        tier: tier_name(personality),
                        follow: tier.follow,
                        floor,
                    });
                }
            }
        }

        if self.replay.param_refresh_ticks == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }

        Ok(())
    }
}

fn tier_name(personality: Personality) -> &'static str {
    match personality {
        Personality::Aggressive => "aggressive",
        Personality::Standard => "standard",
        Personality::Relaxed => "relaxed",
    }
}

// ============================================================================
// RESOLVED SETTINGS
// ============================================================================

/// Immutable per-tick view of the parameters with every gating rule applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub car: CarParams,
    pub conditional_experimental_mode: bool,
    pub green_light_alert: bool,
    pub personalities: PersonalityParams,
    pub check_lane_width: bool,
    pub acceleration_profile: AccelerationProfile,
    pub deceleration_profile: DecelerationProfile,
    pub aggressive_acceleration: bool,
    /// Extra standstill distance in display units; see `stopping_distance_m`.
    pub stopping_distance: i32,
    pub release: bool,
    pub advisor_enabled: bool,
    pub curvature_gate: bool,
    /// Lateral acceleration target handed to the curvature advisor (m/s²).
    pub map_target_lat_accel: f32,
    pub time_gap_floor: f32,
}

impl PlannerSettings {
    pub fn resolve(params: &PlannerParams) -> Self {
        let own_long = params.car.openpilot_longitudinal_control;
        let long = &params.longitudinal;
        let tune = own_long && long.longitudinal_tune;

        let advisor_enabled = own_long && params.turn_speed.enabled;

        Self {
            car: params.car,
            conditional_experimental_mode: own_long
                && params.mode_trigger.conditional_experimental,
            green_light_alert: params.mode_trigger.custom_alerts
                && params.mode_trigger.green_light_alert,
            personalities: params.personalities.clone(),
            check_lane_width: params.lanes.custom_ui
                && (params.lanes.adjacent_path || params.lanes.blind_spot_path),
            acceleration_profile: if tune {
                long.acceleration_profile
            } else {
                AccelerationProfile::Standard
            },
            deceleration_profile: if tune {
                long.deceleration_profile
            } else {
                DecelerationProfile::Standard
            },
            aggressive_acceleration: tune && long.aggressive_acceleration,
            stopping_distance: if tune { long.stopping_distance } else { 0 },
            release: long.release,
            advisor_enabled,
            curvature_gate: advisor_enabled && params.turn_speed.curvature_check,
            map_target_lat_accel: 2.0 * (params.turn_speed.aggressiveness as f32 / 100.0),
            time_gap_floor: params.follow.time_gap_floor,
        }
    }

    /// Extra standstill distance converted to metres.
    pub fn stopping_distance_m(&self, is_metric: bool) -> f32 {
        let scale = if is_metric { 1.0 } else { FOOT_TO_METER };
        self.stopping_distance as f32 * scale
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::resolve(&PlannerParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_YAML: &str = r#"
car:
  openpilot_longitudinal_control: true
longitudinal:
  longitudinal_tune: true
  acceleration_profile: sport_plus
  deceleration_profile: eco
  aggressive_acceleration: true
  stopping_distance: 10
  release: false
personalities:
  custom_personalities: true
  aggressive: { jerk: 0.4, follow: 1.1 }
  standard: { jerk: 1.0, follow: 1.45 }
  relaxed: { jerk: 1.2, follow: 1.9 }
turn_speed:
  enabled: true
  curvature_check: true
  aggressiveness: 150
lanes:
  custom_ui: true
  blind_spot_path: true
"#;

    #[test]
    fn test_parse_full_file() {
        let params = PlannerParams::from_yaml(FULL_YAML).unwrap();
        assert_eq!(
            params.longitudinal.acceleration_profile,
            AccelerationProfile::SportPlus
        );
        assert_eq!(params.personalities.relaxed.follow, 1.9);
        assert_eq!(params.replay.param_refresh_ticks, 20, "missing sections use defaults");
    }

    #[test]
    fn test_unknown_enum_variant_rejected() {
        let yaml = "longitudinal:\n  acceleration_profile: turbo\n";
        assert!(PlannerParams::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_non_positive_personality_rejected() {
        let mut params = PlannerParams::default();
        params.personalities.standard.follow = 0.0;
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidPersonality {
                tier: "standard",
                field: "follow",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_custom_follow_below_floor_rejected() {
        let mut params = PlannerParams::default();
        params.personalities.custom_personalities = true;
        params.personalities.standard.follow = 0.02;
        assert_eq!(
            params.validate(),
            Err(ConfigError::FollowBelowTimeGapFloor {
                table: "custom",
                tier: "standard",
                follow: 0.02,
                floor: 0.05
            })
        );
    }

    #[test]
    fn test_floor_above_stock_tier_rejected() {
        let mut params = PlannerParams::default();
        params.follow.time_gap_floor = 1.3;
        // Custom tiers default to stock values, so the aggressive tier trips first
        assert!(matches!(
            params.validate(),
            Err(ConfigError::FollowBelowTimeGapFloor {
                tier: "aggressive",
                ..
            })
        ));

        params.follow.time_gap_floor = 1.25;
        assert!(params.validate().is_ok(), "floor equal to the shortest tier is fine");
    }

    #[test]
    fn test_aggressiveness_range() {
        let mut params = PlannerParams::default();
        params.turn_speed.aggressiveness = 0;
        assert_eq!(params.validate(), Err(ConfigError::AggressivenessOutOfRange(0)));
        params.turn_speed.aggressiveness = 200;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_resolve_applies_gating() {
        let params = PlannerParams::from_yaml(FULL_YAML).unwrap();
        let settings = PlannerSettings::resolve(&params);
        assert_eq!(settings.acceleration_profile, AccelerationProfile::SportPlus);
        assert!(settings.aggressive_acceleration);
        assert!(settings.curvature_gate);
        assert!(settings.check_lane_width);
        assert!((settings.map_target_lat_accel - 3.0).abs() < 1e-6);

        let mut no_long = params.clone();
        no_long.car.openpilot_longitudinal_control = false;
        let settings = PlannerSettings::resolve(&no_long);
        assert_eq!(settings.acceleration_profile, AccelerationProfile::Standard);
        assert_eq!(settings.deceleration_profile, DecelerationProfile::Standard);
        assert!(!settings.aggressive_acceleration);
        assert_eq!(settings.stopping_distance, 0);
        assert!(!settings.advisor_enabled);
        assert!(!settings.curvature_gate, "gate requires the advisor");
    }

    #[test]
    fn test_stopping_distance_units() {
        let mut params = PlannerParams::default();
        params.longitudinal.longitudinal_tune = true;
        params.longitudinal.stopping_distance = 10;
        let settings = PlannerSettings::resolve(&params);
        assert_eq!(settings.stopping_distance_m(true), 10.0);
        assert!((settings.stopping_distance_m(false) - 3.048).abs() < 1e-5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_YAML.as_bytes()).unwrap();
        let params = PlannerParams::load(file.path()).unwrap();
        assert!(params.turn_speed.enabled);

        let missing = PlannerParams::load("/nonexistent/planner.yaml");
        assert!(missing.is_err());
    }
}
