// src/pipeline/publisher.rs
//
// Publish boundary. The planner hands each tick's snapshot to a publisher;
// the core itself never does I/O.

use super::outputs::PlanningOutputs;
use anyhow::{Context, Result};
use std::io::Write;

pub trait PlanPublisher {
    fn publish(&mut self, plan: &PlanningOutputs) -> Result<()>;
}

/// Writes one JSON object per line.
pub struct JsonLinesPublisher<W: Write> {
    writer: W,
    published: u64,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            published: 0,
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PlanPublisher for JsonLinesPublisher<W> {
    fn publish(&mut self, plan: &PlanningOutputs) -> Result<()> {
        serde_json::to_writer(&mut self.writer, plan).context("serializing plan")?;
        self.writer.write_all(b"\n").context("writing plan")?;
        self.published += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(v_cruise: f32) -> PlanningOutputs {
        PlanningOutputs {
            valid: true,
            v_cruise,
            ..PlanningOutputs::default()
        }
    }

    #[test]
    fn test_json_lines_one_object_per_line() {
        let mut publisher = JsonLinesPublisher::new(Vec::new());
        publisher.publish(&plan(20.0)).unwrap();
        publisher.publish(&plan(25.0)).unwrap();
        assert_eq!(publisher.published(), 2);

        let text = String::from_utf8(publisher.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["vCruise"], 20.0);
        assert_eq!(first["valid"], true);
        assert!(first.get("desiredFollowDistance").is_some());
    }
}
