use std::collections::HashMap;

use nalgebra::Vector3;

use crate::catalog::BodyKind;
use crate::orbital::OrbitPolyline;

/// Rendering collaborator fed by the frame driver.
///
/// Implement this to move scene objects, log positions or stream them
/// elsewhere. `place` is called once per body per tick; `trace` once per
/// traced body, before the first tick.
pub trait BodySink {
    /// Look up (or create) the visual for `name` and move it to `position`.
    fn place(&mut self, name: &str, kind: BodyKind, position: &Vector3<f64>);

    /// Receive a body's static orbit trace.
    fn trace(&mut self, _name: &str, _kind: BodyKind, _polyline: &OrbitPolyline) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Discards everything.
pub struct NullSink;

impl BodySink for NullSink {
    fn place(&mut self, _name: &str, _kind: BodyKind, _position: &Vector3<f64>) {}

    fn name(&self) -> &str {
        "null"
    }
}

/// Keeps the last published position per body and the published traces.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub positions: HashMap<String, Vector3<f64>>,
    pub traces: HashMap<String, Vec<Vector3<f64>>>,
    pub placements: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BodySink for RecordingSink {
    fn place(&mut self, name: &str, _kind: BodyKind, position: &Vector3<f64>) {
        self.placements += 1;
        match self.positions.get_mut(name) {
            Some(p) => *p = *position,
            None => {
                self.positions.insert(name.to_string(), *position);
            }
        }
    }

    fn trace(&mut self, name: &str, _kind: BodyKind, polyline: &OrbitPolyline) {
        self.traces.insert(name.to_string(), polyline.points().to_vec());
    }

    fn name(&self) -> &str {
        "recording"
    }
}
