use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::catalog::BodyKind;
use crate::error::Result;
use crate::sim::BodyRegistry;

#[derive(Serialize)]
struct PositionRow<'a> {
    tick: u64,
    time: f64,
    name: &'a str,
    kind: BodyKind,
    true_anomaly: f64,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize)]
struct TraceRow<'a> {
    name: &'a str,
    kind: BodyKind,
    index: usize,
    x: f64,
    y: f64,
    z: f64,
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Position snapshots across many ticks, one header.
///
/// Columns: tick, time, name, kind, true_anomaly, x, y, z
pub struct PositionLog<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> PositionLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: csv::Writer::from_writer(writer), rows: 0 }
    }

    /// Append one row per registered body.
    pub fn record(&mut self, tick: u64, time: f64, registry: &BodyRegistry) -> Result<()> {
        for body in registry.iter() {
            self.writer.serialize(PositionRow {
                tick,
                time,
                name: &body.name,
                kind: body.kind,
                true_anomaly: body.true_anomaly,
                x: body.position.x,
                y: body.position.y,
                z: body.position.z,
            })?;
            self.rows += 1;
        }
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl PositionLog<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

/// Write a single position snapshot.
pub fn write_positions<W: Write>(writer: W, tick: u64, time: f64, registry: &BodyRegistry) -> Result<()> {
    let mut log = PositionLog::new(writer);
    log.record(tick, time, registry)?;
    log.finish()?;
    Ok(())
}

pub fn write_positions_file<P: AsRef<Path>>(path: P, tick: u64, time: f64, registry: &BodyRegistry) -> Result<()> {
    write_positions(File::create(path)?, tick, time, registry)
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// Write every precomputed trace.
///
/// Columns: name, kind, index, x, y, z
pub fn write_traces<W: Write>(writer: W, registry: &BodyRegistry) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (body, trace) in registry.traces() {
        for (index, p) in trace.points().iter().enumerate() {
            wtr.serialize(TraceRow { name: &body.name, kind: body.kind, index, x: p.x, y: p.y, z: p.z })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_traces_file<P: AsRef<Path>>(path: P, registry: &BodyRegistry) -> Result<()> {
    write_traces(File::create(path)?, registry)
}
