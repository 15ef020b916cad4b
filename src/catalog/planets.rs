use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Appearance, BodyKind, CatalogEntry};
use crate::config::OrreryConfig;
use crate::error::Result;
use crate::orbital::OrbitalElements;

/// Diameter (km) assumed for a planet record that does not carry one.
pub const DEFAULT_PLANET_DIAMETER: f64 = 12_742.0;

/// Trace colour for planet records without one.
pub const DEFAULT_PLANET_COLOR: [u8; 3] = [0xCC, 0xCC, 0xCC];

/// Major-body record as it appears in a catalog file. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub name: String,
    pub a: f64,          // AU
    pub e: f64,
    pub i: f64,          // deg
    pub long_peri: f64,  // deg
    pub long_node: f64,  // deg
    pub period: f64,     // days
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub diameter: Option<f64>, // km
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl PlanetRecord {
    pub fn to_entry(&self, config: &OrreryConfig) -> CatalogEntry {
        let elements =
            OrbitalElements::from_degrees(self.a, self.e, self.i, self.long_peri, self.long_node, self.period);
        if !elements.has_valid_period() {
            warn!(body = %self.name, period = self.period, "planet period unusable, fallback period applies");
        }

        let diameter = self
            .diameter
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_PLANET_DIAMETER);

        CatalogEntry {
            name: self.name.clone(),
            kind: BodyKind::Planet,
            elements,
            appearance: Appearance {
                texture: self.texture.clone(),
                radius: diameter * config.planet_size_scale / 2.0,
                color: self.color.unwrap_or(DEFAULT_PLANET_COLOR),
            },
        }
    }
}

/// Read a JSON array of planet records.
pub fn read_planets<R: Read>(reader: R) -> Result<Vec<PlanetRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

// ---------------------------------------------------------------------------
// Built-in planets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    fn planet(
        name: &str,
        a: f64,
        e: f64,
        i: f64,
        long_peri: f64,
        long_node: f64,
        period: f64,
        diameter: f64,
        color: [u8; 3],
    ) -> PlanetRecord {
        PlanetRecord {
            name: name.into(),
            a,
            e,
            i,
            long_peri,
            long_node,
            period,
            texture: Some(format!("./textures/{}.jpg", name.to_lowercase())),
            diameter: Some(diameter),
            color: Some(color),
        }
    }

    /// Mercury through Neptune, J2000 mean elements.
    pub fn planets() -> Vec<PlanetRecord> {
        vec![
            //      name       a            e           i            long_peri     long_node     period    diameter  colour
            planet("Mercury", 0.38709843, 0.20563661, 7.00559432, 77.45771895, 48.33961819, 87.97, 4_880.0, [0xCC, 0xCC, 0xFF]),
            planet("Venus", 0.72332102, 0.00676399, 3.39777545, 131.76755713, 76.67261496, 224.70, 12_104.0, [0xFF, 0xCC, 0xCC]),
            planet("Earth", 1.00000018, 0.01673163, -0.00054346, 102.93005885, -5.11260389, 365.25, 12_742.0, [0xCC, 0xFF, 0xCC]),
            planet("Mars", 1.52371243, 0.09336511, 1.85181869, -23.91744784, 49.71320984, 686.98, 6_779.0, [0xFF, 0xCC, 0x99]),
            planet("Jupiter", 5.20248019, 0.04853590, 1.29861416, 14.27495244, 100.29282654, 4332.59, 139_820.0, [0xFF, 0xFF, 0x99]),
            planet("Saturn", 9.54149883, 0.05550825, 2.49424102, 92.86136063, 113.63998702, 10759.22, 116_460.0, [0x99, 0xCC, 0xFF]),
            planet("Uranus", 19.18797948, 0.04685740, 0.77298127, 172.43404441, 73.96250215, 30688.5, 50_724.0, [0xFF, 0x99, 0xCC]),
            planet("Neptune", 30.06952752, 0.00895439, 1.77005520, 46.68158724, 131.78635853, 60182.0, 49_244.0, [0xCC, 0xCC, 0xFF]),
        ]
    }
}
