use nalgebra::Vector3;

use orrery::catalog::BodyKind;
use orrery::orbital::OrbitPolyline;
use orrery::sim::BodySink;
use orrery::{Catalog, FrameDriver, OrreryConfig, DISPLAY_SCALE};

/// Tracks each body's closest and farthest published distance from the sun.
#[derive(Default)]
struct ExtremesSink {
    extremes: Vec<(String, f64, f64)>,
    trace_points: usize,
}

impl BodySink for ExtremesSink {
    fn place(&mut self, name: &str, _kind: BodyKind, position: &Vector3<f64>) {
        let r = position.norm() / DISPLAY_SCALE;
        match self.extremes.iter_mut().find(|(n, _, _)| n == name) {
            Some((_, min, max)) => {
                *min = min.min(r);
                *max = max.max(r);
            }
            None => self.extremes.push((name.to_string(), r, r)),
        }
    }

    fn trace(&mut self, _name: &str, _kind: BodyKind, polyline: &OrbitPolyline) {
        self.trace_points += polyline.len();
    }

    fn name(&self) -> &str {
        "Extremes"
    }
}

fn main() {
    let config = OrreryConfig { tick_delta: 1.0, ..Default::default() };
    let mut driver = FrameDriver::from_catalog(Catalog::solar_system(&config), &config);

    let mut sink = ExtremesSink::default();
    driver.publish_traces(&mut sink);

    println!("Feeding {} sink for 700 days...", sink.name());
    for _ in 0..700 {
        driver.tick(&mut sink);
    }

    println!("Received {} trace points", sink.trace_points);
    println!("  {:<8} {:>10} {:>10} {:>10}", "Body", "min (AU)", "max (AU)", "q (AU)");
    for (name, min, max) in &sink.extremes {
        let q = driver.registry().get(name).map_or(f64::NAN, |b| b.elements.perihelion());
        println!("  {:<8} {:>10.4} {:>10.4} {:>10.4}", name, min, max, q);
    }
}
