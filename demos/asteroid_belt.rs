use orrery::catalog::{presets, BodyKind, MinorCatalog};
use orrery::sim::{self, AphelionDetector, EventKind, NullSink, PerihelionDetector};
use orrery::{CatalogBuilder, FrameDriver, OrreryConfig};

/// A few main-belt objects in the small-body query shape. Some rows are
/// deliberately incomplete to show the ingestion fallbacks.
const BELT: &str = r#"{
    "fields": ["full_name", "e", "a", "i", "om", "w", "n", "diameter"],
    "data": [
        ["     1 Ceres (A801 AA)", "0.0785", "2.766", "10.59", "80.25", "73.30", "0.2141", "939.4"],
        ["     2 Pallas (A802 FA)", "0.2305", "2.770", "34.93", "172.9", "310.9", "0.2134", "513"],
        ["     4 Vesta (A807 FA)", "0.0894", "2.362", "7.144", "103.7", "151.5", "0.2716", "525.4"],
        ["    10 Hygiea (A849 GA)", "0.1125", "3.139", "3.831", "283.2", "312.5", "0.1777", "407.1"],
        ["", "0.15", null, "5.0", "30", "40", null, null],
        ["Unnamed fragment", "bad", "2.5", null, null, null, "-1", "0.8"]
    ]
}"#;

fn main() -> anyhow::Result<()> {
    let config = OrreryConfig { seed: Some(7), ..Default::default() };
    let belt = MinorCatalog::from_reader(BELT.as_bytes())?;

    let catalog = CatalogBuilder::new(config.clone())
        .planets(&presets::planets()[2..5])
        .minor_bodies(&belt)
        .build();

    println!("{:<24} {:<11} {:>7} {:>7} {:>10}", "Name", "Kind", "a (AU)", "e", "T (days)");
    for entry in catalog.iter() {
        println!(
            "{:<24} {:<11} {:>7.3} {:>7.4} {:>10.1}",
            entry.name,
            entry.kind.label(),
            entry.elements.sma,
            entry.elements.ecc,
            entry.elements.period
        );
    }

    let mut driver = FrameDriver::from_catalog(catalog, &config)
        .with_detector(PerihelionDetector)
        .with_detector(AphelionDetector);
    let events = sim::run(&mut driver, 20_000, &mut NullSink);

    let minor = driver.registry().count(BodyKind::MinorBody);
    let passages = events.iter().filter(|e| e.kind == EventKind::Perihelion).count();
    println!();
    println!("{minor} minor bodies, {passages} perihelion passages in {:.0} days", driver.elapsed());

    println!();
    print!("{}", driver.registry().info("1 Ceres (A801 AA)")?);
    println!();
    Ok(())
}
