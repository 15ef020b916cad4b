use std::collections::HashMap;
use std::fmt;

use nalgebra::Vector3;
use serde::Serialize;
use tracing::warn;

use crate::catalog::{Appearance, BodyKind, Catalog, CatalogEntry};
use crate::config::OrreryConfig;
use crate::error::{OrreryError, Result};
use crate::orbital::anomaly::{self, AnomalyStep};
use crate::orbital::{propagate, trace_orbit, OrbitPolyline, OrbitalElements, DISPLAY_SCALE};

// ---------------------------------------------------------------------------
// Per-body state
// ---------------------------------------------------------------------------

/// Live orbital state of one tracked body.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub name: String,
    pub kind: BodyKind,
    pub elements: OrbitalElements,
    pub appearance: Appearance,
    pub true_anomaly: f64,       // rad, in [0, 2π)
    pub position: Vector3<f64>,  // display units, last propagated
    pub revolutions: u64,        // completed perihelion passages
    trace: Option<OrbitPolyline>,
}

impl BodyState {
    /// Start at perihelion (ν = 0). The trace, if requested, is built here
    /// and never again.
    pub fn new(entry: CatalogEntry, trace_step: Option<f64>) -> Self {
        let trace = trace_step.map(|step| trace_orbit(&entry.elements, step));
        BodyState {
            position: propagate(&entry.elements, 0.0),
            name: entry.name,
            kind: entry.kind,
            elements: entry.elements,
            appearance: entry.appearance,
            true_anomaly: 0.0,
            revolutions: 0,
            trace,
        }
    }

    /// Integrate the anomaly by `delta`, then re-propagate the position.
    pub fn advance(&mut self, delta: f64, fallback_period: f64) -> AnomalyStep {
        let step = anomaly::step(self.true_anomaly, self.elements.period, delta, fallback_period);
        self.true_anomaly = step.to;
        self.position = propagate(&self.elements, step.to);
        self.revolutions = self.revolutions.saturating_add(step.crossings(0.0));
        step
    }

    pub fn trace(&self) -> Option<&OrbitPolyline> {
        self.trace.as_ref()
    }

    /// Heliocentric distance, AU.
    pub fn distance_au(&self) -> f64 {
        self.position.norm() / DISPLAY_SCALE
    }

    pub fn info(&self) -> BodyInfo {
        BodyInfo::new(&self.name, self.kind, &self.elements)
    }
}

// ---------------------------------------------------------------------------
// Registry: identity → state, stable iteration order
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<BodyState>,
    index: HashMap<String, usize>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every catalog entry. Planets are always traced, minor bodies
    /// when `config.trace_minor_bodies` is set. Duplicate names are renamed
    /// `"<name> #<k>"` instead of failing.
    pub fn from_catalog(catalog: Catalog, config: &OrreryConfig) -> Self {
        Self::build(catalog, |kind| {
            let traced = match kind {
                BodyKind::Planet => true,
                BodyKind::MinorBody => config.trace_minor_bodies,
            };
            traced.then_some(config.trace_step)
        })
    }

    /// Same identities as [`BodyRegistry::from_catalog`], but no traces.
    /// For lookups that never render.
    pub fn untraced(catalog: Catalog) -> Self {
        Self::build(catalog, |_| None)
    }

    fn build<F>(catalog: Catalog, trace_step: F) -> Self
    where
        F: Fn(BodyKind) -> Option<f64>,
    {
        let mut registry = Self::new();
        for mut entry in catalog {
            if registry.contains(&entry.name) {
                let renamed = registry.free_name(&entry.name);
                warn!(body = %entry.name, renamed = %renamed, "duplicate body identity renamed");
                entry.name = renamed;
            }
            let step = trace_step(entry.kind);
            registry.insert(BodyState::new(entry, step));
        }
        registry
    }

    /// Register one entry; identities must be unique.
    pub fn register(&mut self, entry: CatalogEntry, trace_step: Option<f64>) -> Result<&BodyState> {
        if self.contains(&entry.name) {
            return Err(OrreryError::DuplicateBody(entry.name));
        }
        let idx = self.insert(BodyState::new(entry, trace_step));
        Ok(&self.bodies[idx])
    }

    fn insert(&mut self, state: BodyState) -> usize {
        let idx = self.bodies.len();
        self.index.insert(state.name.clone(), idx);
        self.bodies.push(state);
        idx
    }

    fn free_name(&self, name: &str) -> String {
        let mut k = 2;
        loop {
            let candidate = format!("{name} #{k}");
            if !self.contains(&candidate) {
                return candidate;
            }
            k += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BodyState> {
        self.index.get(name).map(|&i| &self.bodies[i])
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }

    /// Bodies in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, BodyState> {
        self.bodies.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, BodyState> {
        self.bodies.iter_mut()
    }

    /// Bodies that carry a precomputed trace.
    pub fn traces(&self) -> impl Iterator<Item = (&BodyState, &OrbitPolyline)> {
        self.bodies
            .iter()
            .filter_map(|b| b.trace.as_ref().map(|t| (b, t)))
    }

    /// Parameter block of the named body, from its own elements.
    pub fn info(&self, name: &str) -> Result<BodyInfo> {
        self.get(name)
            .map(BodyState::info)
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    /// Body minimizing `metric(position)`, if that minimum is within `max_distance`.
    pub fn nearest_by<F>(&self, metric: F, max_distance: f64) -> Option<&BodyState>
    where
        F: Fn(&Vector3<f64>) -> f64,
    {
        self.bodies
            .iter()
            .map(|b| (metric(&b.position), b))
            .filter(|(d, _)| d.is_finite() && *d <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, b)| b)
    }
}

// ---------------------------------------------------------------------------
// Selected-body parameters
// ---------------------------------------------------------------------------

/// Human-facing orbital parameters of one body. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub name: String,
    pub kind: BodyKind,
    pub eccentricity: f64,
    pub semi_major_axis: f64,  // AU
    pub inclination: f64,      // deg
    pub long_peri: f64,        // deg
    pub long_node: f64,        // deg
    pub period: f64,           // days, as cataloged
}

impl BodyInfo {
    pub fn new(name: &str, kind: BodyKind, el: &OrbitalElements) -> Self {
        BodyInfo {
            name: name.to_string(),
            kind,
            eccentricity: el.ecc,
            semi_major_axis: el.sma,
            inclination: el.inc.to_degrees(),
            long_peri: el.long_peri.to_degrees(),
            long_node: el.long_node.to_degrees(),
            period: el.period,
        }
    }
}

impl fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.kind)?;
        writeln!(f, "Eccentricity:                {:.8}", self.eccentricity)?;
        writeln!(f, "Semi-major axis:             {:.8} AU", self.semi_major_axis)?;
        writeln!(f, "Inclination:                 {:.8}°", self.inclination)?;
        writeln!(f, "Perihelion longitude:        {:.8}°", self.long_peri)?;
        writeln!(f, "Longitude of ascending node: {:.8}°", self.long_node)?;
        if self.period.is_finite() && self.period > 0.0 {
            write!(f, "Period:                      {:.2} days", self.period)
        } else {
            write!(f, "Period:                      n/a (fallback period in use)")
        }
    }
}
