use orrery::catalog::presets;
use orrery::sim::{self, NullSink, PerihelionDetector};
use orrery::{CatalogBuilder, FrameDriver, OrreryConfig};

fn main() {
    let config = OrreryConfig::default();
    let inner: Vec<_> = presets::planets().into_iter().take(4).collect();
    let catalog = CatalogBuilder::new(config.clone()).planets(&inner).build();

    let mut driver = FrameDriver::from_catalog(catalog, &config).with_detector(PerihelionDetector);

    // Two Earth years
    let ticks = (2.0 * 365.25 / config.tick_delta) as u64;
    let events = sim::run(&mut driver, ticks, &mut NullSink);

    println!("Inner planets after {:.0} days", driver.elapsed());
    println!("  {:<8} {:>8} {:>8} {:>5}", "Body", "ν (deg)", "r (AU)", "revs");
    for b in driver.registry().iter() {
        println!(
            "  {:<8} {:>8.2} {:>8.4} {:>5}",
            b.name,
            b.true_anomaly.to_degrees(),
            b.distance_au(),
            b.revolutions
        );
    }

    println!();
    println!("Perihelion passages:");
    for e in &events {
        println!("  day {:>7.1}  {}", e.time, e.body);
    }
}
