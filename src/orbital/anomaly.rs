use std::f64::consts::TAU;

/// Period substituted when a body's period is zero, negative or non-finite.
pub const FALLBACK_PERIOD: f64 = 1.0;

/// One tick of anomaly advance for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyStep {
    pub from: f64,  // rad, in [0, 2π)
    pub to: f64,    // rad, in [0, 2π)
    pub swept: f64, // rad, unwrapped angle advanced this tick
}

impl AnomalyStep {
    /// Number of times the sweep crossed the anomaly `target` (rad).
    ///
    /// A body that starts exactly on `target` has not crossed it yet.
    pub fn crossings(&self, target: f64) -> u64 {
        if !self.swept.is_finite() {
            return 0;
        }
        let target = wrap_angle(target);
        let before = ((self.from - target) / TAU).floor();
        let after = ((self.from + self.swept - target) / TAU).floor();
        (after - before).max(0.0) as u64
    }
}

/// Map any finite angle into [0, 2π). Non-finite input maps to 0.
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Period actually used for integration.
///
/// A period is usable when it is finite, positive and large enough that
/// 2π/T stays finite.
pub fn effective_period(period: f64, fallback: f64) -> f64 {
    if usable_period(period) {
        period
    } else if usable_period(fallback) {
        fallback
    } else {
        FALLBACK_PERIOD
    }
}

fn usable_period(period: f64) -> bool {
    period.is_finite() && period > 0.0 && (TAU / period).is_finite()
}

/// Advance `nu` by `delta` time units on an orbit of `period`.
///
/// ν' = (ν + 2π/T·Δ) mod 2π, with `fallback` standing in for an unusable T.
pub fn step(nu: f64, period: f64, delta: f64, fallback: f64) -> AnomalyStep {
    let from = wrap_angle(nu);
    let rate = TAU / effective_period(period, fallback);
    let swept = rate * delta;
    let swept = if swept.is_finite() { swept } else { 0.0 };
    AnomalyStep {
        from,
        to: wrap_angle(from + swept),
        swept,
    }
}

/// Next true anomaly using the default fallback period.
pub fn advance(nu: f64, period: f64, delta: f64) -> f64 {
    step(nu, period, delta, FALLBACK_PERIOD).to
}
