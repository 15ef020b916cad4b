/// Classical orbital elements of a closed heliocentric orbit.
///
/// `ecc < 1` is a precondition of everything downstream; it is not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub sma: f64,       // semi-major axis, AU
    pub ecc: f64,       // eccentricity (0 = circular)
    pub inc: f64,       // inclination, rad
    pub long_peri: f64, // argument / longitude of perihelion ω, rad
    pub long_node: f64, // longitude of ascending node Ω, rad
    pub period: f64,    // orbital period, days
}

impl OrbitalElements {
    /// Build from catalog values given in degrees.
    pub fn from_degrees(
        sma: f64,
        ecc: f64,
        inc_deg: f64,
        long_peri_deg: f64,
        long_node_deg: f64,
        period: f64,
    ) -> Self {
        OrbitalElements {
            sma,
            ecc,
            inc: inc_deg.to_radians(),
            long_peri: long_peri_deg.to_radians(),
            long_node: long_node_deg.to_radians(),
            period,
        }
    }

    /// Circular, uninclined orbit.
    pub fn circular(sma: f64, period: f64) -> Self {
        OrbitalElements {
            sma,
            ecc: 0.0,
            inc: 0.0,
            long_peri: 0.0,
            long_node: 0.0,
            period,
        }
    }

    /// Semi-latus rectum p = a(1 - e²), AU.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.sma * (1.0 - self.ecc * self.ecc)
    }

    /// Heliocentric distance at true anomaly `nu` (AU), polar form of the conic.
    pub fn radius(&self, nu: f64) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.ecc * nu.cos())
    }

    pub fn perihelion(&self) -> f64 {
        self.sma * (1.0 - self.ecc)
    }

    pub fn aphelion(&self) -> f64 {
        self.sma * (1.0 + self.ecc)
    }

    /// True when the catalog period can be used as-is.
    pub fn has_valid_period(&self) -> bool {
        self.period.is_finite() && self.period > 0.0
    }

    /// Mean angular rate (rad/day), `None` when the period is unusable.
    pub fn mean_motion(&self) -> Option<f64> {
        self.has_valid_period()
            .then(|| std::f64::consts::TAU / self.period)
    }
}
