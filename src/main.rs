// src/main.rs
//
// Replays a recorded drive through the planner, one JSON line per tick, and
// writes the published plans to stdout as JSON lines.
//
//   planner_replay <replay.jsonl> [config.yaml]

use anyhow::{bail, Context, Result};
use longitudinal_planner::collaborators::{CurvatureSpeedAdvisor, InactiveModeTrigger, UpcomingCurve};
use longitudinal_planner::config::{PlannerParams, PlannerSettings};
use longitudinal_planner::pipeline::{JsonLinesPublisher, LongitudinalPlanner, PlanPublisher};
use longitudinal_planner::types::TickInput;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.yaml";

/// One recorded tick: the input snapshot plus what the map knew about the
/// road ahead at that moment.
#[derive(Debug, Deserialize)]
struct ReplayFrame {
    tick: TickInput,
    #[serde(default)]
    upcoming_curve: Option<UpcomingCurve>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(replay_path) = args.next().map(PathBuf::from) else {
        bail!("usage: planner_replay <replay.jsonl> [config.yaml]");
    };
    let config_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| Path::new(DEFAULT_CONFIG).exists().then(|| PathBuf::from(DEFAULT_CONFIG)));

    let params = match &config_path {
        Some(path) => PlannerParams::load(path)?,
        None => PlannerParams::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "longitudinal_planner={level},planner_replay={level}",
            level = params.logging.level
        ))
    });
    // Plans go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("🚗 Longitudinal planner replay starting");
    match &config_path {
        Some(path) => info!("✓ Configuration loaded from {}", path.display()),
        None => info!("No configuration file, using stock parameters"),
    }

    let mut refresh_ticks = params.replay.param_refresh_ticks;
    let settings = PlannerSettings::resolve(&params);
    let advisor = CurvatureSpeedAdvisor::new(settings.map_target_lat_accel);
    let mut planner = LongitudinalPlanner::new(settings, advisor, InactiveModeTrigger);

    let file = File::open(&replay_path)
        .with_context(|| format!("opening replay {}", replay_path.display()))?;
    let reader = BufReader::new(file);

    let stdout = io::stdout();
    let mut publisher = JsonLinesPublisher::new(BufWriter::new(stdout.lock()));

    let mut ticks: u64 = 0;
    let mut ticks_since_refresh: u64 = 0;
    let mut skipped: u64 = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading replay line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: ReplayFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping replay line {}: {}", line_no, e);
                skipped += 1;
                continue;
            }
        };

        if ticks_since_refresh >= refresh_ticks {
            ticks_since_refresh = 0;
            if let Some(path) = &config_path {
                if let Some(interval) = refresh_params(&mut planner, path) {
                    refresh_ticks = interval;
                }
            }
        }

        planner.advisor_mut().set_upcoming_curve(frame.upcoming_curve);
        let plan = planner.process_tick(&frame.tick);
        publisher.publish(&plan)?;
        ticks += 1;
        ticks_since_refresh += 1;
    }

    let mut writer = publisher.into_inner();
    writer.flush().context("flushing plans")?;

    info!("\n✓ Replay complete: {} tick(s), {} line(s) skipped", ticks, skipped);
    let summary = planner.metrics().summary();
    info!("📊 Planner metrics: {}", serde_json::to_string(&summary)?);

    Ok(())
}

/// Re-read the parameter file and return the refresh interval it asks for.
/// A bad file keeps the previous settings and interval.
fn refresh_params(
    planner: &mut LongitudinalPlanner<CurvatureSpeedAdvisor, InactiveModeTrigger>,
    path: &Path,
) -> Option<u64> {
    match PlannerParams::load(path) {
        Ok(params) => {
            let settings = PlannerSettings::resolve(&params);
            planner
                .advisor_mut()
                .set_target_lat_accel(settings.map_target_lat_accel);
            planner.refresh_settings(settings);
            debug!(
                "Parameters refreshed from {} (next in {} ticks)",
                path.display(),
                params.replay.param_refresh_ticks
            );
            Some(params.replay.param_refresh_ticks)
        }
        Err(e) => {
            warn!("⚠️  Parameter reload failed, keeping previous settings: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> LongitudinalPlanner<CurvatureSpeedAdvisor, InactiveModeTrigger> {
        let settings = PlannerSettings::default();
        let advisor = CurvatureSpeedAdvisor::new(settings.map_target_lat_accel);
        LongitudinalPlanner::new(settings, advisor, InactiveModeTrigger)
    }

    #[test]
    fn test_refresh_picks_up_new_interval_and_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"turn_speed:\n  enabled: true\n  aggressiveness: 150\nreplay:\n  param_refresh_ticks: 5\n")
            .unwrap();

        let mut p = planner();
        assert_eq!(refresh_params(&mut p, file.path()), Some(5));
        assert!(p.settings().advisor_enabled);
        assert!((p.advisor_mut().target_lat_accel() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_refresh_keeps_settings_on_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"replay:\n  param_refresh_ticks: 0\n").unwrap();

        let mut p = planner();
        let before = p.settings().clone();
        assert_eq!(refresh_params(&mut p, file.path()), None);
        assert_eq!(p.settings(), &before);
    }
}
