use std::io::Read;

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Appearance, BodyKind, CatalogEntry};
use crate::config::OrreryConfig;
use crate::error::Result;
use crate::orbital::OrbitalElements;

/// Semi-major axis (AU) for a record without a usable one: mid main belt.
pub const DEFAULT_SEMI_MAJOR_AXIS: f64 = 2.7;

/// Marker colour for minor bodies.
pub const MINOR_BODY_COLOR: [u8; 3] = [0xFF, 0x00, 0x00];

/// Positional column order used when the document has no `fields` header:
/// name, e, a, i, om, w, ma, n, diameter. `ma` is not used.
const POSITIONAL: Columns = Columns {
    name: Some(0),
    e: Some(1),
    a: Some(2),
    i: Some(3),
    om: Some(4),
    w: Some(5),
    n: Some(7),
    diameter: Some(8),
};

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

/// Small-body query result: an optional header and rows of loosely typed
/// values (numbers, numeric strings or null).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinorCatalog {
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    name: Option<usize>,
    e: Option<usize>,
    a: Option<usize>,
    i: Option<usize>,
    om: Option<usize>,
    w: Option<usize>,
    n: Option<usize>,
    diameter: Option<usize>,
}

impl Columns {
    fn from_fields(fields: &[String]) -> Self {
        Columns {
            name: find_field(fields, &["full_name", "name"]),
            e: find_field(fields, &["e"]),
            a: find_field(fields, &["a"]),
            i: find_field(fields, &["i"]),
            om: find_field(fields, &["om"]),
            w: find_field(fields, &["w"]),
            n: find_field(fields, &["n"]),
            diameter: find_field(fields, &["diameter"]),
        }
    }
}

fn find_field(fields: &[String], names: &[&str]) -> Option<usize> {
    fields
        .iter()
        .position(|f| names.iter().any(|n| f.trim().eq_ignore_ascii_case(n)))
}

impl MinorCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode every row. Never fails; missing values stay `None`.
    pub fn records(&self) -> Vec<MinorRecord> {
        let columns = match &self.fields {
            Some(fields) => Columns::from_fields(fields),
            None => POSITIONAL,
        };
        self.data
            .iter()
            .map(|row| MinorRecord::from_row(row, &columns))
            .collect()
    }

    /// Decode and apply fallbacks. Row index feeds placeholder names.
    pub fn to_entries<R: Rng>(&self, config: &OrreryConfig, rng: &mut R) -> Vec<CatalogEntry> {
        let records = self.records();
        let mut randomized = 0;
        let entries: Vec<CatalogEntry> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if record.mean_motion.is_none() {
                    randomized += 1;
                }
                record.to_entry(index, config, rng)
            })
            .collect();
        info!(
            bodies = entries.len(),
            randomized_periods = randomized,
            "minor body catalog loaded"
        );
        entries
    }
}

// ---------------------------------------------------------------------------
// Decoded record
// ---------------------------------------------------------------------------

/// One minor-body row with each field decoded independently. Angles in degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinorRecord {
    pub name: Option<String>,
    pub e: Option<f64>,
    pub a: Option<f64>,           // AU
    pub i: Option<f64>,           // deg
    pub long_node: Option<f64>,   // deg
    pub long_peri: Option<f64>,   // deg
    pub mean_motion: Option<f64>, // deg/day, NaN when present but unparsable
    pub diameter: Option<f64>,    // km
}

impl MinorRecord {
    fn from_row(row: &[Value], columns: &Columns) -> Self {
        let cell = |col: Option<usize>| col.and_then(|c| row.get(c));
        let num = |col: Option<usize>| cell(col).and_then(numeric);
        MinorRecord {
            name: cell(columns.name).and_then(text),
            e: num(columns.e),
            a: num(columns.a),
            i: num(columns.i),
            long_node: num(columns.om),
            long_peri: num(columns.w),
            mean_motion: cell(columns.n).and_then(mean_motion_cell),
            diameter: num(columns.diameter),
        }
    }

    /// Build a catalog entry, substituting documented defaults:
    /// placeholder name, zero angles/eccentricity, [`DEFAULT_SEMI_MAJOR_AXIS`],
    /// period from mean motion (fallback period when n <= 0 or unparsable,
    /// random n when absent)
    /// and `config.default_diameter`.
    pub fn to_entry<R: Rng>(&self, index: usize, config: &OrreryConfig, rng: &mut R) -> CatalogEntry {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => {
                let placeholder = format!("Asteroid_{index}");
                warn!(index, name = %placeholder, "minor body without name, using placeholder");
                placeholder
            }
        };

        let e = self.e.unwrap_or_else(|| {
            debug!(body = %name, "missing eccentricity, using 0");
            0.0
        });
        let a = match self.a {
            Some(a) if a > 0.0 => a,
            _ => {
                debug!(body = %name, "missing semi-major axis, using {}", DEFAULT_SEMI_MAJOR_AXIS);
                DEFAULT_SEMI_MAJOR_AXIS
            }
        };
        if e >= 1.0 {
            warn!(body = %name, e, "open orbit in catalog, propagation undefined");
        }

        let period = match self.mean_motion {
            Some(n) if n > 0.0 => period_from_mean_motion(n),
            Some(n) => {
                warn!(body = %name, n, "unusable mean motion, using fallback period");
                config.fallback_period
            }
            None => {
                let n = random_mean_motion(config, rng);
                debug!(body = %name, n, "missing mean motion, randomized");
                period_from_mean_motion(n)
            }
        };

        let diameter = match self.diameter {
            Some(d) if d > 0.0 => d,
            _ => {
                debug!(body = %name, "missing diameter, using {}", config.default_diameter);
                config.default_diameter
            }
        };

        CatalogEntry {
            name,
            kind: BodyKind::MinorBody,
            elements: OrbitalElements::from_degrees(
                a,
                e,
                self.i.unwrap_or(0.0),
                self.long_peri.unwrap_or(0.0),
                self.long_node.unwrap_or(0.0),
                period,
            ),
            appearance: Appearance {
                texture: None,
                radius: diameter * config.minor_size_scale,
                color: MINOR_BODY_COLOR,
            },
        }
    }
}

/// Period in days for a mean motion in deg/day.
pub fn period_from_mean_motion(n: f64) -> f64 {
    360.0 / n
}

fn random_mean_motion<R: Rng>(config: &OrreryConfig, rng: &mut R) -> f64 {
    if config.mean_motion_min < config.mean_motion_max {
        rng.gen_range(config.mean_motion_min..config.mean_motion_max)
    } else {
        config.mean_motion_min
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|x| x.is_finite())
}

/// Null stays absent; anything else that does not parse is kept as NaN.
fn mean_motion_cell(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        other => Some(numeric(other).unwrap_or(f64::NAN)),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn positional_row_decodes() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["     1 Ceres", "0.0785", "2.767", "10.59", "80.25", "73.42", "291.4", "0.2141", "939.4"]] }"#,
        )
        .unwrap();
        let rec = &cat.records()[0];
        assert_eq!(rec.name.as_deref(), Some("1 Ceres"));
        assert_eq!(rec.e, Some(0.0785));
        assert_eq!(rec.a, Some(2.767));
        assert_eq!(rec.long_node, Some(80.25));
        assert_eq!(rec.long_peri, Some(73.42));
        assert_eq!(rec.mean_motion, Some(0.2141));
        assert_eq!(rec.diameter, Some(939.4));
    }

    #[test]
    fn header_reorders_columns() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "fields": ["diameter", "a", "e", "full_name", "n", "i", "w", "om"],
                 "data": [[12.5, 1.46, 0.22, "433 Eros", 0.5598, 10.83, 178.9, 304.3]] }"#,
        )
        .unwrap();
        let rec = &cat.records()[0];
        assert_eq!(rec.name.as_deref(), Some("433 Eros"));
        assert_eq!(rec.a, Some(1.46));
        assert_eq!(rec.e, Some(0.22));
        assert_eq!(rec.long_peri, Some(178.9));
        assert_eq!(rec.long_node, Some(304.3));
        assert_eq!(rec.diameter, Some(12.5));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let cat: MinorCatalog =
            serde_json::from_str(r#"{ "data": [[null, "0.1", "2.2", "3.0", "4.0", "5.0", null, null, null]] }"#).unwrap();
        let config = OrreryConfig::default();
        let entries = cat.to_entries(&config, &mut rng());
        let entry = &entries[0];
        assert_eq!(entry.name, "Asteroid_0");
        assert_eq!(entry.kind, BodyKind::MinorBody);
        assert!((entry.appearance.radius - 2.0 * 0.1).abs() < 1e-12, "default diameter 2 km × 0.1");
        // n drawn from [0.1, 1.0) deg/day → T in (360, 3600]
        let t = entry.elements.period;
        assert!(t > 360.0 && t <= 3600.0, "randomized period {} out of range", t);
    }

    #[test]
    fn blank_name_uses_row_index() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["A", "0", "1", "0", "0", "0", null, "1", null], ["   ", "0", "1", "0", "0", "0", null, "1", null]] }"#,
        )
        .unwrap();
        let entries = cat.to_entries(&OrreryConfig::default(), &mut rng());
        assert_eq!(entries[0].name, "A");
        assert_eq!(entries[1].name, "Asteroid_1");
    }

    #[test]
    fn non_numeric_values_degrade() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["X", "abc", "-3", true, {}, [], null, "0.5", "big"]] }"#,
        )
        .unwrap();
        let config = OrreryConfig::default();
        let entry = &cat.to_entries(&config, &mut rng())[0];
        assert_eq!(entry.elements.ecc, 0.0);
        assert_eq!(entry.elements.sma, DEFAULT_SEMI_MAJOR_AXIS);
        assert_eq!(entry.elements.inc, 0.0);
        assert!((entry.elements.period - 720.0).abs() < 1e-9);
        assert!((entry.appearance.radius - config.default_diameter * config.minor_size_scale).abs() < 1e-12);
    }

    #[test]
    fn non_positive_mean_motion_uses_fallback_period() {
        let cat: MinorCatalog =
            serde_json::from_str(r#"{ "data": [["Z", "0.1", "2", "0", "0", "0", null, "0", null]] }"#).unwrap();
        let config = OrreryConfig { fallback_period: 3.5, ..Default::default() };
        let entry = &cat.to_entries(&config, &mut rng())[0];
        assert_eq!(entry.elements.period, 3.5);
    }

    #[test]
    fn unparsable_mean_motion_uses_fallback_period() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["G", "0.1", "2", "0", "0", "0", null, "abc", null],
                          ["E", "0.1", "2", "0", "0", "0", null, "", null],
                          ["N", "0.1", "2", "0", "0", "0", null, null, null]] }"#,
        )
        .unwrap();
        let config = OrreryConfig { fallback_period: 3.5, ..Default::default() };
        let entries = cat.to_entries(&config, &mut rng());
        assert_eq!(entries[0].elements.period, 3.5, "garbage mean motion should take the fallback period");
        assert_eq!(entries[1].elements.period, 3.5, "blank mean motion should take the fallback period");
        // null is randomized: n in [0.1, 1.0) deg/day
        let t = entries[2].elements.period;
        assert!(t > 360.0 && t <= 3600.0, "null mean motion gave T = {}", t);
    }

    #[test]
    fn mean_motion_sets_period() {
        assert!((period_from_mean_motion(0.9856) - 365.26).abs() < 0.01);
    }

    #[test]
    fn seeded_randomization_is_reproducible() {
        let cat: MinorCatalog = serde_json::from_str(
            r#"{ "data": [["R1", "0", "2", "0", "0", "0"], ["R2", "0", "2", "0", "0", "0"]] }"#,
        )
        .unwrap();
        let config = OrreryConfig::default();
        let a = cat.to_entries(&config, &mut rng());
        let b = cat.to_entries(&config, &mut rng());
        assert_eq!(a[0].elements.period, b[0].elements.period);
        assert_eq!(a[1].elements.period, b[1].elements.period);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let cat: MinorCatalog = serde_json::from_str(r#"{ "data": [[], ["only-name"]] }"#).unwrap();
        let entries = cat.to_entries(&OrreryConfig::default(), &mut rng());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Asteroid_0");
        assert_eq!(entries[1].name, "only-name");
        assert!(entries.iter().all(|e| e.elements.has_valid_period()));
    }
}
