// src/geometry.rs
//
// Road geometry metrics derived from the driving model's predicted lines.
//
// Lane width: the lateral gap between the ego lane's boundary line and the
// next line (or the road edge, whichever is closer), averaged over the
// boundary's forward samples. Used to decide whether an adjacent lane is
// wide enough to show.
//
// Road curvature: the peak lateral-acceleration-to-speed² ratio along the
// predicted trajectory, rescaled to the current ego speed. Dimensionless in
// practice; values below ~1 mean the road ahead is close to straight at this
// speed.
//
// Coordinate system: ego frame, x forward (m), y lateral (m).

use crate::interp::{interp, mean};
use crate::types::{ModelOutput, Polyline};
use serde::{Deserialize, Serialize};

/// Forward speeds below this are skipped in the curvature ratio (m/s).
const MIN_CURVATURE_SPEED: f32 = 1e-3;

/// Lane widths on both sides of the ego lane (m). Zero when not measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneWidths {
    pub left: f32,
    pub right: f32,
}

/// Width of the lane beyond `current_lane`, bounded by `lane` or `road_edge`.
///
/// Returns 0 when any of the three lines has no usable samples.
pub fn lane_width(lane: &Polyline, current_lane: &Polyline, road_edge: &Polyline) -> f32 {
    if lane.is_empty() || current_lane.is_empty() || road_edge.is_empty() {
        return 0.0;
    }

    let (lane_x, lane_y) = sorted_by_x(lane);
    let (edge_x, edge_y) = sorted_by_x(road_edge);
    if lane_x.is_empty() || edge_x.is_empty() {
        return 0.0;
    }

    let mut to_lane = Vec::with_capacity(current_lane.x.len());
    let mut to_edge = Vec::with_capacity(current_lane.x.len());

    for (&x, &y) in current_lane.x.iter().zip(current_lane.y.iter()) {
        to_lane.push((y - interp(x, &lane_x, &lane_y)).abs());
        to_edge.push((y - interp(x, &edge_x, &edge_y)).abs());
    }

    match (mean(&to_lane), mean(&to_edge)) {
        (Some(lane), Some(edge)) => lane.min(edge),
        _ => 0.0,
    }
}

/// Left and right lane widths from the model's four lane lines and two edges.
pub fn lane_widths(model: &ModelOutput) -> LaneWidths {
    LaneWidths {
        left: lane_width(&model.lane_lines[0], &model.lane_lines[1], &model.road_edges[0]),
        right: lane_width(&model.lane_lines[3], &model.lane_lines[2], &model.road_edges[1]),
    }
}

/// Road curvature metric for the predicted trajectory at `v_ego`.
pub fn road_curvature(model: &ModelOutput, v_ego: f32) -> f32 {
    let peak_ratio = model
        .velocity_x
        .iter()
        .zip(model.acceleration_y.iter())
        .filter(|(v, _)| v.abs() >= MIN_CURVATURE_SPEED)
        .map(|(v, a)| a.abs() / (v * v))
        .fold(None, |acc: Option<f32>, r| Some(acc.map_or(r, |m| m.max(r))));

    match peak_ratio {
        Some(ratio) => ratio * v_ego * v_ego,
        None => 0.0,
    }
}

/// Samples sorted by x with duplicate x values dropped, ready for `interp`.
fn sorted_by_x(line: &Polyline) -> (Vec<f32>, Vec<f32>) {
    let mut points: Vec<(f32, f32)> = line
        .x
        .iter()
        .copied()
        .zip(line.y.iter().copied())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points.dedup_by(|next, prev| next.0 == prev.0);

    points.into_iter().unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(y: f32) -> Polyline {
        let x: Vec<f32> = (0..10).map(|i| i as f32 * 5.0).collect();
        let ys = vec![y; x.len()];
        Polyline::new(x, ys)
    }

    #[test]
    fn test_lane_width_parallel_lines() {
        // Current boundary at y = -1.8, next line at y = -5.4, edge further out
        let w = lane_width(&straight(-5.4), &straight(-1.8), &straight(-8.0));
        assert!((w - 3.6).abs() < 1e-5, "got {}", w);
    }

    #[test]
    fn test_lane_width_road_edge_closer() {
        let w = lane_width(&straight(-5.4), &straight(-1.8), &straight(-3.0));
        assert!((w - 1.2).abs() < 1e-5, "edge is closer, got {}", w);
    }

    #[test]
    fn test_lane_width_unsorted_input() {
        let lane = Polyline::new(vec![40.0, 0.0, 20.0], vec![-5.4, -5.4, -5.4]);
        let w = lane_width(&lane, &straight(-1.8), &straight(-8.0));
        assert!((w - 3.6).abs() < 1e-5, "got {}", w);
    }

    #[test]
    fn test_lane_width_empty_line() {
        assert_eq!(lane_width(&Polyline::default(), &straight(-1.8), &straight(-8.0)), 0.0);
    }

    #[test]
    fn test_lane_widths_uses_correct_lines() {
        let model = ModelOutput {
            lane_lines: [straight(-5.4), straight(-1.8), straight(1.8), straight(5.6)],
            road_edges: [straight(-9.0), straight(9.0)],
            ..ModelOutput::default()
        };
        let widths = lane_widths(&model);
        assert!((widths.left - 3.6).abs() < 1e-5);
        assert!((widths.right - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_road_curvature_scales_with_speed() {
        let model = ModelOutput {
            velocity_x: vec![20.0, 20.0, 10.0],
            acceleration_y: vec![0.4, 0.8, 0.5],
            ..ModelOutput::default()
        };
        // ratios: 0.001, 0.002, 0.005 -> 0.005 * 20² = 2.0
        let c = road_curvature(&model, 20.0);
        assert!((c - 2.0).abs() < 1e-4, "got {}", c);
        assert_eq!(road_curvature(&model, 0.0), 0.0);
    }

    #[test]
    fn test_road_curvature_no_prediction() {
        assert_eq!(road_curvature(&ModelOutput::default(), 25.0), 0.0);
    }

    #[test]
    fn test_road_curvature_skips_standstill_points() {
        let model = ModelOutput {
            velocity_x: vec![0.0, 10.0],
            acceleration_y: vec![1.0, 1.0],
            ..ModelOutput::default()
        };
        let c = road_curvature(&model, 10.0);
        assert!(c.is_finite());
        assert!((c - 1.0).abs() < 1e-5, "got {}", c);
    }
}
