use std::f64::consts::PI;

use serde::Serialize;

use crate::orbital::AnomalyStep;
use super::registry::BodyState;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    Perihelion,
    Aphelion,
    Custom(String),
}

/// A discrete event that occurred during a tick.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub tick: u64,
    pub time: f64,  // days since start, end of tick
    pub body: String,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Called once per body per tick with the body already advanced and the
/// anomaly sweep that got it there. A sweep crossing the same target
/// several times reports once.
pub trait EventDetector {
    fn check(&mut self, body: &BodyState, step: &AnomalyStep) -> Option<EventKind>;
}

/// Detects perihelion passage (ν crossing 0).
pub struct PerihelionDetector;

impl EventDetector for PerihelionDetector {
    fn check(&mut self, _body: &BodyState, step: &AnomalyStep) -> Option<EventKind> {
        (step.crossings(0.0) > 0).then_some(EventKind::Perihelion)
    }
}

/// Detects aphelion passage (ν crossing π).
pub struct AphelionDetector;

impl EventDetector for AphelionDetector {
    fn check(&mut self, _body: &BodyState, step: &AnomalyStep) -> Option<EventKind> {
        (step.crossings(PI) > 0).then_some(EventKind::Aphelion)
    }
}

/// Detects one body reaching a given true anomaly, once.
pub struct AnomalyDetector {
    pub body: String,
    pub anomaly: f64,  // rad
    fired: bool,
}

impl AnomalyDetector {
    pub fn new(body: impl Into<String>, anomaly: f64) -> Self {
        Self { body: body.into(), anomaly, fired: false }
    }
}

impl EventDetector for AnomalyDetector {
    fn check(&mut self, body: &BodyState, step: &AnomalyStep) -> Option<EventKind> {
        if self.fired || body.name != self.body {
            return None;
        }
        if step.crossings(self.anomaly) > 0 {
            self.fired = true;
            Some(EventKind::Custom(format!(
                "{} at ν = {:.1}°",
                self.body,
                self.anomaly.to_degrees()
            )))
        } else {
            None
        }
    }
}
