use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::catalog::BodyKind;
use crate::error::Result;
use crate::sim::{FrameDriver, SimEvent};

/// Final state of one body at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct BodySummary {
    pub name: String,
    pub kind: BodyKind,
    pub true_anomaly_deg: f64,
    pub position: [f64; 3],  // display units
    pub distance_au: f64,
    pub revolutions: u64,
}

/// Summary of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_days: f64,
    pub tick_delta: f64,
    pub bodies: Vec<BodySummary>,
    pub events: Vec<SimEvent>,
}

impl RunSummary {
    pub fn from_driver(driver: &FrameDriver, events: Vec<SimEvent>) -> Self {
        let bodies = driver
            .registry()
            .iter()
            .map(|b| BodySummary {
                name: b.name.clone(),
                kind: b.kind,
                true_anomaly_deg: b.true_anomaly.to_degrees(),
                position: [b.position.x, b.position.y, b.position.z],
                distance_au: b.distance_au(),
                revolutions: b.revolutions,
            })
            .collect();

        RunSummary {
            ticks: driver.ticks(),
            elapsed_days: driver.elapsed(),
            tick_delta: driver.tick_delta(),
            bodies,
            events,
        }
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: W, summary: &RunSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    let mut file = File::create(path)?;
    write_summary(&mut file, summary)?;
    writeln!(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::OrreryConfig;
    use crate::sim::{run, NullSink, PerihelionDetector};

    #[test]
    fn summary_reflects_run() {
        let config = OrreryConfig::default();
        let mut driver = FrameDriver::from_catalog(Catalog::solar_system(&config), &config)
            .with_detector(PerihelionDetector);
        // 88 days: one Mercury perihelion
        let events = run(&mut driver, 880, &mut NullSink);
        let summary = RunSummary::from_driver(&driver, events);

        assert_eq!(summary.ticks, 880);
        assert_eq!(summary.bodies.len(), 8);
        assert_eq!(summary.events.len(), 1);
        assert_eq!(summary.events[0].body, "Mercury");
        let mercury = &summary.bodies[0];
        assert_eq!(mercury.revolutions, 1);
        assert!(mercury.true_anomaly_deg >= 0.0 && mercury.true_anomaly_deg < 360.0);
    }

    #[test]
    fn json_output_is_valid() {
        let config = OrreryConfig::default();
        let driver = FrameDriver::from_catalog(Catalog::solar_system(&config), &config);
        let summary = RunSummary::from_driver(&driver, vec![]);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["ticks"], 0);
        assert_eq!(value["bodies"][2]["name"], "Earth");
        assert_eq!(value["bodies"][2]["kind"], "planet");
    }
}
