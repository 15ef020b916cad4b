use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use orrery::catalog::{planets, presets, MinorCatalog};
use orrery::io::{self, PositionLog, RunSummary};
use orrery::sim::{AphelionDetector, EventKind, NullSink, PerihelionDetector, SimEvent};
use orrery::{BodyKind, BodyRegistry, Catalog, CatalogBuilder, FrameDriver, OrreryConfig};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(about = "Heliocentric Keplerian orrery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct CatalogArgs {
    /// JSON config file (partial files accepted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of planet records, replaces the built-in planets
    #[arg(long)]
    planets: Option<PathBuf>,

    /// Small-body catalog JSON ({ "fields": [..], "data": [[..]] })
    #[arg(short, long)]
    asteroids: Option<PathBuf>,

    /// Seed for randomized mean motions
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the orrery headless and report
    Run {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Number of ticks to run
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Days per tick, overrides the config
        #[arg(long)]
        dt: Option<f64>,

        /// CSV of per-tick positions
        #[arg(long)]
        positions: Option<PathBuf>,

        /// Write every Nth tick to --positions
        #[arg(long, default_value = "1")]
        every: u64,

        /// CSV of orbit traces
        #[arg(long)]
        traces: Option<PathBuf>,

        /// JSON run summary
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// List catalog bodies
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Show one body's orbital parameters
    Info {
        /// Body name, e.g. "Mars"
        name: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { catalog, ticks, dt, positions, every, traces, summary } => {
            let mut config = load_config(&catalog)?;
            if let Some(dt) = dt {
                config.tick_delta = dt;
            }
            config.validate().context("invalid configuration")?;
            if every == 0 {
                bail!("--every must be at least 1");
            }
            let catalog = build_catalog(&catalog, &config)?;
            run(catalog, &config, ticks, positions.as_deref(), every, traces.as_deref(), summary.as_deref())
        }
        Commands::List { catalog } => {
            let config = load_config(&catalog)?;
            list(&build_catalog(&catalog, &config)?);
            Ok(())
        }
        Commands::Info { name, catalog } => {
            let config = load_config(&catalog)?;
            let registry = BodyRegistry::untraced(build_catalog(&catalog, &config)?);
            let info = registry.info(&name)?;
            println!();
            println!("{info}");
            println!();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog assembly
// ---------------------------------------------------------------------------

fn load_config(args: &CatalogArgs) -> Result<OrreryConfig> {
    let mut config = match &args.config {
        Some(path) => OrreryConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OrreryConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn build_catalog(args: &CatalogArgs, config: &OrreryConfig) -> Result<Catalog> {
    let planet_records = match &args.planets {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            planets::read_planets(file).with_context(|| format!("reading planets {}", path.display()))?
        }
        None => presets::planets(),
    };

    let mut builder = CatalogBuilder::new(config.clone()).planets(&planet_records);
    if let Some(path) = &args.asteroids {
        let minor = MinorCatalog::from_json_file(path)
            .with_context(|| format!("reading small-body catalog {}", path.display()))?;
        builder = builder.minor_bodies(&minor);
    }
    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn list(catalog: &Catalog) {
    println!();
    println!("  {:<28} {:<11} {:>10} {:>10} {:>12}", "Name", "Kind", "a (AU)", "e", "Period (d)");
    println!("  {}", "─".repeat(75));
    for entry in catalog.iter() {
        println!(
            "  {:<28} {:<11} {:>10.5} {:>10.6} {:>12.2}",
            entry.name,
            entry.kind.label(),
            entry.elements.sma,
            entry.elements.ecc,
            entry.elements.period
        );
    }
    println!();
    println!(
        "  {} planets, {} minor bodies",
        catalog.count(BodyKind::Planet),
        catalog.count(BodyKind::MinorBody)
    );
    println!();
}

fn run(
    catalog: Catalog,
    config: &OrreryConfig,
    ticks: u64,
    positions: Option<&Path>,
    every: u64,
    traces: Option<&Path>,
    summary: Option<&Path>,
) -> Result<()> {
    let mut driver = FrameDriver::from_catalog(catalog, config)
        .with_detector(PerihelionDetector)
        .with_detector(AphelionDetector);

    if let Some(path) = traces {
        io::write_traces_file(path, driver.registry())
            .with_context(|| format!("writing traces {}", path.display()))?;
        info!(path = %path.display(), "traces written");
    }

    let mut log = match positions {
        Some(path) => Some(PositionLog::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => None,
    };
    if let Some(log) = log.as_mut() {
        log.record(0, 0.0, driver.registry())?;
    }

    let mut sink = NullSink;
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(driver.tick(&mut sink));
        if let Some(log) = log.as_mut() {
            if driver.ticks() % every == 0 {
                log.record(driver.ticks(), driver.elapsed(), driver.registry())?;
            }
        }
    }
    if let Some(log) = log {
        let rows = log.rows();
        log.finish()?;
        info!(rows, "positions written");
    }

    report(&driver, &events);

    if let Some(path) = summary {
        let summary = RunSummary::from_driver(&driver, events);
        io::write_summary_file(path, &summary)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn report(driver: &FrameDriver, events: &[SimEvent]) {
    let registry = driver.registry();

    println!();
    println!("====================================================================");
    println!("  ORRERY RUN");
    println!("====================================================================");
    println!();
    println!("  Run Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Ticks:         {:>10}      Δ per tick:   {:>8.3} d",
        driver.ticks(),
        driver.tick_delta()
    );
    println!(
        "  Elapsed:       {:>10.1} d    ({:.2} yr)",
        driver.elapsed(),
        driver.elapsed() / 365.25
    );
    println!(
        "  Planets:       {:>10}      Minor bodies: {:>8}",
        registry.count(BodyKind::Planet),
        registry.count(BodyKind::MinorBody)
    );
    println!();

    println!("  Passages");
    println!("  ──────────────────────────────────────────────────────────────────");
    let perihelia = events.iter().filter(|e| e.kind == EventKind::Perihelion).count();
    let aphelia = events.iter().filter(|e| e.kind == EventKind::Aphelion).count();
    println!("  Perihelion:    {:>10}      Aphelion:     {:>8}", perihelia, aphelia);
    for e in events.iter().take(10) {
        println!("  {:<10} t={:>9.1}d  {:<24} {:?}", format!("#{}", e.tick), e.time, e.body, e.kind);
    }
    if events.len() > 10 {
        println!("  ... {} more", events.len() - 10);
    }
    println!();

    println!("  Final State");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:<24} {:>9}  {:>9}  {:>10}  {:>5}",
        "Body", "ν (deg)", "r (AU)", "x", "revs"
    );
    println!("  {}", "─".repeat(64));
    for b in registry.iter().take(40) {
        println!(
            "  {:<24} {:>9.2}  {:>9.4}  {:>10.2}  {:>5}",
            b.name,
            b.true_anomaly.to_degrees(),
            b.distance_au(),
            b.position.x,
            b.revolutions
        );
    }
    if registry.len() > 40 {
        println!("  ... {} more", registry.len() - 40);
    }
    println!();
}
