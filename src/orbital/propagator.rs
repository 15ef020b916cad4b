use nalgebra::Vector3;

use super::elements::OrbitalElements;

/// Display multiplier applied to every propagated position (1 AU → 100 units).
/// Body radii use much smaller scales so orbits stay visually separated.
pub const DISPLAY_SCALE: f64 = 100.0;

/// Heliocentric ecliptic position in AU at true anomaly `nu`.
///
/// Rotates the perifocal radius through ω + ν, i and Ω in one step.
pub fn position_au(el: &OrbitalElements, nu: f64) -> Vector3<f64> {
    let r = el.radius(nu);

    let (sin_u, cos_u) = (el.long_peri + nu).sin_cos(); // argument of latitude
    let (sin_node, cos_node) = el.long_node.sin_cos();
    let (sin_inc, cos_inc) = el.inc.sin_cos();

    Vector3::new(
        r * (cos_u * cos_node - sin_u * cos_inc * sin_node),
        r * (cos_u * sin_node + sin_u * cos_inc * cos_node),
        r * (sin_u * sin_inc),
    )
}

/// Display-space position at true anomaly `nu`.
pub fn propagate(el: &OrbitalElements, nu: f64) -> Vector3<f64> {
    position_au(el, nu) * DISPLAY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn samples() -> Vec<OrbitalElements> {
        vec![
            OrbitalElements::from_degrees(0.38709843, 0.20563661, 7.00559432, 77.45771895, 48.33961819, 87.97),
            OrbitalElements::from_degrees(1.00000018, 0.01673163, -0.00054346, 102.93005885, -5.11260389, 365.25),
            OrbitalElements::from_degrees(2.77, 0.0785, 10.59, 73.6, 80.3, 1680.0),
            OrbitalElements::from_degrees(17.8, 0.967, 162.2, 111.3, 58.4, 27_500.0),
            OrbitalElements::circular(5.0, 4000.0),
        ]
    }

    #[test]
    fn position_is_periodic() {
        for el in samples() {
            let start = propagate(&el, 0.0);
            let end = propagate(&el, TAU);
            let err = (end - start).norm() / start.norm();
            assert!(err < 1e-12, "ν=0 and ν=2π differ by {:.2e} (relative)", err);
        }
    }

    #[test]
    fn magnitude_matches_conic_radius() {
        for el in samples() {
            for nu in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
                let expected = DISPLAY_SCALE * el.sma * (1.0 - el.ecc * el.ecc) / (1.0 + el.ecc * nu.cos());
                let got = propagate(&el, nu).norm();
                assert!(
                    (got - expected).abs() / expected < 1e-12,
                    "|r| at ν={:.3}: expected {:.6}, got {:.6}",
                    nu, expected, got
                );
            }
        }
    }

    #[test]
    fn uninclined_orbit_stays_in_ecliptic() {
        let el = OrbitalElements::from_degrees(1.5, 0.1, 0.0, 40.0, 25.0, 600.0);
        for k in 0..16 {
            let p = propagate(&el, k as f64 * TAU / 16.0);
            assert!(p.z.abs() < 1e-12, "z should be 0 for i=0, got {}", p.z);
        }
    }

    #[test]
    fn perihelion_direction_follows_omega_plus_node() {
        // i = 0 collapses the rotation to a single angle ω + Ω.
        let el = OrbitalElements::from_degrees(1.0, 0.2, 0.0, 30.0, 60.0, 365.0);
        let p = position_au(&el, 0.0);
        let angle = p.y.atan2(p.x);
        assert!((angle - FRAC_PI_2).abs() < 1e-12, "perihelion at {:.6} rad", angle);
        assert!((p.norm() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn inclination_lifts_out_of_plane() {
        let el = OrbitalElements::from_degrees(1.0, 0.0, 30.0, 90.0, 0.0, 365.0);
        // ω + ν = 90°: the body sits at the top of the inclined circle.
        let p = position_au(&el, 0.0);
        assert!((p.z - 30_f64.to_radians().sin()).abs() < 1e-12);
        assert!((p.y - 30_f64.to_radians().cos()).abs() < 1e-12);
        assert!(p.x.abs() < 1e-12);
    }
}
