pub mod minor;
pub mod planets;

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::OrreryConfig;
use crate::orbital::OrbitalElements;

pub use minor::{MinorCatalog, MinorRecord};
pub use planets::{presets, PlanetRecord};

/// Display radius of the sun, drawn at the origin.
pub const SUN_RADIUS: f64 = 10.0;

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// Which population a body belongs to. Always explicit, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Planet,
    MinorBody,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Planet => "planet",
            BodyKind::MinorBody => "minor body",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the renderer needs to draw a body. Not used by the propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub texture: Option<String>,
    pub radius: f64,     // display units
    pub color: [u8; 3],  // RGB, trace and marker colour
}

/// One catalog record, ready to register.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: BodyKind,
    pub elements: OrbitalElements,
    pub appearance: Appearance,
}

// ---------------------------------------------------------------------------
// Catalog: ordered list of entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// The eight built-in planets.
    pub fn solar_system(config: &OrreryConfig) -> Self {
        CatalogBuilder::new(config.clone())
            .planets(&presets::planets())
            .build()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn count(&self, kind: BodyKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }
}

impl IntoIterator for Catalog {
    type Item = CatalogEntry;
    type IntoIter = std::vec::IntoIter<CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Catalog builder
// ---------------------------------------------------------------------------

pub struct CatalogBuilder {
    config: OrreryConfig,
    rng: StdRng,
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    /// Randomized fallbacks draw from `config.seed` when set, else from entropy.
    pub fn new(config: OrreryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng, entries: vec![] }
    }

    pub fn planets(mut self, records: &[PlanetRecord]) -> Self {
        self.entries
            .extend(records.iter().map(|r| r.to_entry(&self.config)));
        self
    }

    pub fn minor_bodies(mut self, catalog: &MinorCatalog) -> Self {
        let entries = catalog.to_entries(&self.config, &mut self.rng);
        self.entries.extend(entries);
        self
    }

    pub fn entry(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn build(self) -> Catalog {
        Catalog { entries: self.entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_system_has_eight_planets() {
        let catalog = Catalog::solar_system(&OrreryConfig::default());
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.count(BodyKind::Planet), 8);
        assert_eq!(catalog.count(BodyKind::MinorBody), 0);
        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names[0], "Mercury");
        assert_eq!(names[7], "Neptune");
    }

    #[test]
    fn builder_mixes_populations() {
        let minor: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["Ceres", "0.0785", "2.77", "10.59", "80.3", "73.6", "0", "0.214", "939.4"]] }"#,
        )
        .unwrap();
        let config = OrreryConfig { seed: Some(1), ..Default::default() };
        let catalog = CatalogBuilder::new(config)
            .planets(&presets::planets())
            .minor_bodies(&minor)
            .build();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.count(BodyKind::MinorBody), 1);
        assert_eq!(catalog.entries()[8].name, "Ceres");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(BodyKind::Planet.to_string(), "planet");
        assert_eq!(BodyKind::MinorBody.to_string(), "minor body");
    }
}
