use std::f64::consts::TAU;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OrreryError, Result};
use crate::orbital::MIN_TRACE_STEP;

// ---------------------------------------------------------------------------
// Orrery configuration
// ---------------------------------------------------------------------------

/// Tunables for the catalog fallbacks, the tracer and the frame driver.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub tick_delta: f64,         // simulated days per tick (Δ)
    pub trace_step: f64,         // rad between orbit trace samples
    pub fallback_period: f64,    // days, replaces T <= 0 or non-finite T
    pub mean_motion_min: f64,    // deg/day, randomized mean motion lower bound
    pub mean_motion_max: f64,    // deg/day, upper bound (exclusive)
    pub default_diameter: f64,   // km, minor body diameter when absent
    pub minor_size_scale: f64,   // minor body display radius per km of diameter
    pub planet_size_scale: f64,  // planet display diameter per km of diameter
    pub seed: Option<u64>,       // seed for randomized mean motion
    pub trace_minor_bodies: bool,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            tick_delta: 0.1,
            trace_step: 0.01,
            fallback_period: 1.0,
            mean_motion_min: 0.1,
            mean_motion_max: 1.0,
            default_diameter: 2.0,
            minor_size_scale: 0.1,
            planet_size_scale: 0.001,
            seed: None,
            trace_minor_bodies: true,
        }
    }
}

impl OrreryConfig {
    /// Load a (possibly partial) JSON config and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        positive("tick_delta", self.tick_delta)?;
        positive("trace_step", self.trace_step)?;
        if self.trace_step < MIN_TRACE_STEP {
            return Err(OrreryError::InvalidConfig(format!(
                "trace_step must be at least {MIN_TRACE_STEP}, got {}",
                self.trace_step
            )));
        }
        if self.trace_step >= TAU {
            return Err(OrreryError::InvalidConfig(format!(
                "trace_step must be below 2π, got {}",
                self.trace_step
            )));
        }
        positive("fallback_period", self.fallback_period)?;
        positive("mean_motion_min", self.mean_motion_min)?;
        positive("mean_motion_max", self.mean_motion_max)?;
        if self.mean_motion_min >= self.mean_motion_max {
            return Err(OrreryError::InvalidConfig(format!(
                "mean motion range is empty: [{}, {})",
                self.mean_motion_min, self.mean_motion_max
            )));
        }
        positive("default_diameter", self.default_diameter)?;
        positive("minor_size_scale", self.minor_size_scale)?;
        positive("planet_size_scale", self.planet_size_scale)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OrreryError::InvalidConfig(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
