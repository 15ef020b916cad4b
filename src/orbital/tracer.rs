use std::f64::consts::TAU;

use nalgebra::Vector3;

use super::elements::OrbitalElements;
use super::propagator::propagate;

/// Default angular step between trace samples (rad), ~629 samples per turn.
pub const DEFAULT_TRACE_STEP: f64 = 0.01;

/// Smallest accepted step (rad), ~63k samples per turn.
pub const MIN_TRACE_STEP: f64 = 1e-4;

/// Closed polyline approximating one full revolution, in display units.
///
/// Built once per body; only the body's phase moves afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPolyline {
    points: Vec<Vector3<f64>>,
}

impl OrbitPolyline {
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Sum of segment lengths, display units.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Sample the orbit from ν = 0 to 2π every `step` rad, then close it with
/// the exact ν = 0 point.
///
/// Samples are generated by index (`k·step`) so the sweep never drifts past
/// 2π through accumulated additions. A non-finite or non-positive `step`
/// falls back to [`DEFAULT_TRACE_STEP`]; smaller steps are raised to
/// [`MIN_TRACE_STEP`].
pub fn trace_orbit(el: &OrbitalElements, step: f64) -> OrbitPolyline {
    let step = if step.is_finite() && step > 0.0 {
        step.max(MIN_TRACE_STEP)
    } else {
        DEFAULT_TRACE_STEP
    };
    let samples = (TAU / step).floor() as usize;

    let mut points = Vec::with_capacity(samples + 2);
    for k in 0..=samples {
        points.push(propagate(el, k as f64 * step));
    }
    let first = points[0];
    points.push(first);

    OrbitPolyline { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::propagator::DISPLAY_SCALE;

    #[test]
    fn trace_is_closed() {
        let orbits = [
            OrbitalElements::from_degrees(0.387, 0.2056, 7.0, 77.46, 48.34, 87.97),
            OrbitalElements::from_degrees(30.07, 0.0089, 1.77, 46.68, 131.79, 60182.0),
            OrbitalElements::from_degrees(2.5, 0.6, 45.0, -10.0, 200.0, 1400.0),
        ];
        for el in &orbits {
            for step in [0.01, 0.1, 0.7, 1.0] {
                let trace = trace_orbit(el, step);
                assert!(trace.is_closed(), "trace with step {} not closed", step);
                assert_eq!(trace.points().first(), trace.points().last());
            }
        }
    }

    #[test]
    fn default_step_gives_hundreds_of_samples() {
        let el = OrbitalElements::circular(1.0, 365.25);
        let trace = trace_orbit(&el, DEFAULT_TRACE_STEP);
        // 0..=628 samples plus the closing point
        assert_eq!(trace.len(), 630);
    }

    #[test]
    fn circular_trace_length_matches_circumference() {
        let el = OrbitalElements::circular(1.0, 365.25);
        let trace = trace_orbit(&el, 0.001);
        let expected = TAU * DISPLAY_SCALE;
        assert!(
            (trace.length() - expected).abs() / expected < 1e-4,
            "trace length {:.4}, expected {:.4}",
            trace.length(),
            expected
        );
    }

    #[test]
    fn bad_step_uses_default() {
        let el = OrbitalElements::circular(1.0, 365.25);
        assert_eq!(trace_orbit(&el, 0.0).len(), trace_orbit(&el, DEFAULT_TRACE_STEP).len());
        assert_eq!(trace_orbit(&el, f64::NAN).len(), trace_orbit(&el, DEFAULT_TRACE_STEP).len());
    }

    #[test]
    fn samples_stay_within_apsides() {
        let el = OrbitalElements::from_degrees(2.5, 0.3, 12.0, 20.0, 70.0, 1400.0);
        let trace = trace_orbit(&el, 0.05);
        for p in trace.points() {
            let r = p.norm() / DISPLAY_SCALE;
            assert!(r >= el.perihelion() - 1e-9 && r <= el.aphelion() + 1e-9, "r={} outside apsides", r);
        }
    }

    #[test]
    fn tiny_step_is_clamped() {
        let el = OrbitalElements::circular(1.0, 365.25);
        let expected = (TAU / MIN_TRACE_STEP).floor() as usize + 2;
        for step in [1e-300, 1e-9, MIN_TRACE_STEP] {
            let trace = trace_orbit(&el, step);
            assert_eq!(trace.len(), expected, "step {} not clamped", step);
            assert!(trace.is_closed());
        }
    }
}
