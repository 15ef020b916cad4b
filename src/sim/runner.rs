use tracing::{info, trace};

use crate::catalog::{BodyKind, Catalog};
use crate::config::OrreryConfig;
use crate::error::{OrreryError, Result};
use super::event::{EventDetector, SimEvent};
use super::registry::BodyRegistry;
use super::sink::BodySink;

// ---------------------------------------------------------------------------
// Frame driver
// ---------------------------------------------------------------------------

/// Owns the registry and advances every body by one fixed Δ per tick.
pub struct FrameDriver {
    registry: BodyRegistry,
    tick_delta: f64,       // days per tick
    fallback_period: f64,  // days
    ticks: u64,
    elapsed: f64,          // days
    detectors: Vec<Box<dyn EventDetector>>,
}

impl FrameDriver {
    pub fn new(registry: BodyRegistry, config: &OrreryConfig) -> Self {
        let trace_points: usize = registry.traces().map(|(_, t)| t.len()).sum();
        info!(
            planets = registry.count(BodyKind::Planet),
            minor_bodies = registry.count(BodyKind::MinorBody),
            traced = registry.traces().count(),
            trace_points,
            tick_delta = config.tick_delta,
            "frame driver ready"
        );
        Self {
            registry,
            tick_delta: config.tick_delta,
            fallback_period: config.fallback_period,
            ticks: 0,
            elapsed: 0.0,
            detectors: vec![],
        }
    }

    pub fn from_catalog(catalog: Catalog, config: &OrreryConfig) -> Self {
        Self::new(BodyRegistry::from_catalog(catalog, config), config)
    }

    pub fn with_detector(mut self, detector: impl EventDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated days since start.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_delta(&self) -> f64 {
        self.tick_delta
    }

    pub fn set_tick_delta(&mut self, delta: f64) -> Result<()> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(OrreryError::InvalidConfig(format!(
                "tick_delta must be positive and finite, got {delta}"
            )));
        }
        self.tick_delta = delta;
        Ok(())
    }

    /// Hand every precomputed trace to the sink.
    pub fn publish_traces(&self, sink: &mut dyn BodySink) {
        for (body, trace) in self.registry.traces() {
            sink.trace(&body.name, body.kind, trace);
        }
    }

    /// Publish current positions without advancing.
    pub fn publish_positions(&self, sink: &mut dyn BodySink) {
        for body in self.registry.iter() {
            sink.place(&body.name, body.kind, &body.position);
        }
    }

    /// Advance every body once and publish its new position.
    pub fn tick(&mut self, sink: &mut dyn BodySink) -> Vec<SimEvent> {
        let tick = self.ticks + 1;
        let time = self.elapsed + self.tick_delta;
        let mut events = Vec::new();

        for body in self.registry.iter_mut() {
            let step = body.advance(self.tick_delta, self.fallback_period);
            for detector in self.detectors.iter_mut() {
                if let Some(kind) = detector.check(body, &step) {
                    trace!(tick, body = %body.name, ?kind, "passage");
                    events.push(SimEvent { tick, time, body: body.name.clone(), kind });
                }
            }
            sink.place(&body.name, body.kind, &body.position);
        }

        self.ticks = tick;
        self.elapsed = time;
        events
    }
}

/// Run `ticks` frames headless, collecting every event.
pub fn run(driver: &mut FrameDriver, ticks: u64, sink: &mut dyn BodySink) -> Vec<SimEvent> {
    info!(ticks, sink = sink.name(), "run start");
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(driver.tick(sink));
    }
    info!(ticks = driver.ticks(), elapsed = driver.elapsed(), events = events.len(), "run done");
    events
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Appearance, CatalogEntry};
    use crate::orbital::{propagate, OrbitalElements};
    use crate::sim::event::{AphelionDetector, EventKind, PerihelionDetector};
    use crate::sim::sink::{NullSink, RecordingSink};
    use nalgebra::Vector3;
    use std::f64::consts::TAU;

    fn entry(name: &str, period: f64) -> CatalogEntry {
        CatalogEntry {
            name: name.into(),
            kind: BodyKind::MinorBody,
            elements: OrbitalElements::from_degrees(2.0, 0.2, 5.0, 40.0, 70.0, period),
            appearance: Appearance { texture: None, radius: 0.2, color: [255, 0, 0] },
        }
    }

    fn driver_with(entries: Vec<CatalogEntry>) -> FrameDriver {
        let config = OrreryConfig::default();
        let mut registry = BodyRegistry::new();
        for e in entries {
            registry.register(e, None).unwrap();
        }
        FrameDriver::new(registry, &config)
    }

    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn earth_at_perihelion_distance() {
        let earth = OrbitalElements::from_degrees(1.0, 0.0167, 0.0, 102.93, -5.11, 365.25);
        let mag = propagate(&earth, 0.0).norm();
        assert!((mag - 98.33).abs() / 98.33 < 0.01, "|p| = {:.3}", mag);

        let driver = FrameDriver::from_catalog(Catalog::solar_system(&OrreryConfig::default()), &OrreryConfig::default());
        let mag = driver.registry().get("Earth").unwrap().position.norm();
        assert!((mag - 98.33).abs() / 98.33 < 0.01, "registered |p| = {:.3}", mag);
    }

    #[test]
    fn zero_period_body_stays_finite() {
        let mut driver = driver_with(vec![entry("Zero", 0.0), entry("Nan", f64::NAN)]);
        driver.tick(&mut NullSink);
        for b in driver.registry().iter() {
            assert!(b.true_anomaly.is_finite(), "{} anomaly not finite", b.name);
            assert!(b.position.iter().all(|c| c.is_finite()), "{} position not finite", b.name);
        }
    }

    #[test]
    fn full_period_returns_to_start() {
        // T = 100, Δ = 0.1: 1000 ticks = one revolution
        let mut driver = driver_with(vec![entry("Cyc", 100.0)]);
        let start = driver.registry().get("Cyc").unwrap().position;
        run(&mut driver, 1000, &mut NullSink);
        let b = driver.registry().get("Cyc").unwrap();
        assert!(angular_distance(b.true_anomaly, 0.0) < 1e-9, "ν drifted to {}", b.true_anomaly);
        assert!((b.position - start).norm() < 1e-6);
    }

    #[test]
    fn every_body_published_once_per_tick() {
        let mut driver = FrameDriver::from_catalog(Catalog::solar_system(&OrreryConfig::default()), &OrreryConfig::default());
        let mut sink = RecordingSink::new();
        run(&mut driver, 25, &mut sink);
        assert_eq!(sink.placements, 8 * 25);
        assert_eq!(sink.positions.len(), 8);
        for b in driver.registry().iter() {
            assert_eq!(sink.positions[&b.name], b.position, "{} published stale position", b.name);
        }
    }

    #[test]
    fn publish_order_is_registration_order() {
        struct Order(Vec<String>);
        impl BodySink for Order {
            fn place(&mut self, name: &str, _kind: BodyKind, _position: &Vector3<f64>) {
                self.0.push(name.to_string());
            }
        }
        let mut driver = driver_with(vec![entry("c", 10.0), entry("a", 20.0), entry("b", 30.0)]);
        let mut order = Order(vec![]);
        run(&mut driver, 2, &mut order);
        assert_eq!(order.0, ["c", "a", "b", "c", "a", "b"]);
    }

    #[test]
    fn traces_published_for_traced_bodies() {
        let driver = FrameDriver::from_catalog(Catalog::solar_system(&OrreryConfig::default()), &OrreryConfig::default());
        let mut sink = RecordingSink::new();
        driver.publish_traces(&mut sink);
        assert_eq!(sink.traces.len(), 8);
        assert_eq!(sink.placements, 0);
    }

    #[test]
    fn passage_events_on_expected_ticks() {
        // T = 1.05, Δ = 0.1: aphelion during tick 6, perihelion during tick 11
        let mut driver = driver_with(vec![entry("Fast", 1.05)])
            .with_detector(PerihelionDetector)
            .with_detector(AphelionDetector);
        let events = run(&mut driver, 11, &mut NullSink);
        assert_eq!(events.len(), 2, "events: {:?}", events);
        assert_eq!(events[0].kind, EventKind::Aphelion);
        assert_eq!(events[0].tick, 6);
        assert_eq!(events[1].kind, EventKind::Perihelion);
        assert_eq!(events[1].tick, 11);
        assert!((events[1].time - 1.1).abs() < 1e-9);
    }

    #[test]
    fn mercury_revolutions() {
        // 8800 ticks of 0.1 d = 880 d ≈ 10.003 Mercury years
        let config = OrreryConfig::default();
        let mut driver = FrameDriver::from_catalog(Catalog::solar_system(&config), &config);
        run(&mut driver, 8800, &mut NullSink);
        assert_eq!(driver.registry().get("Mercury").unwrap().revolutions, 10);
        assert_eq!(driver.registry().get("Earth").unwrap().revolutions, 2);
        assert!((driver.elapsed() - 880.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_tick_delta() {
        let mut driver = driver_with(vec![]);
        assert!(driver.set_tick_delta(0.0).is_err());
        assert!(driver.set_tick_delta(f64::INFINITY).is_err());
        driver.set_tick_delta(0.5).unwrap();
        assert_eq!(driver.tick_delta(), 0.5);
    }
}
