use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui::{self, Color32};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orrery::catalog::{presets, BodyKind, MinorCatalog, SUN_RADIUS};
use orrery::orbital::OrbitPolyline;
use orrery::sim::{BodyInfo, BodySink};
use orrery::{CatalogBuilder, FrameDriver, OrreryConfig, DISPLAY_SCALE};

const STAR_COUNT: usize = 1500;
const PICK_FRACTION: f64 = 0.03;  // of the visible width
const ZOOM_HALF_WIDTH: f64 = 25.0; // display units

#[derive(Parser)]
#[command(name = "orrery-viz")]
#[command(about = "Interactive orrery viewer")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Small-body catalog JSON
    #[arg(short, long)]
    asteroids: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => OrreryConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OrreryConfig::default(),
    };
    let mut builder = CatalogBuilder::new(config.clone()).planets(&presets::planets());
    if let Some(path) = &args.asteroids {
        let minor = MinorCatalog::from_json_file(path)
            .with_context(|| format!("reading small-body catalog {}", path.display()))?;
        builder = builder.minor_bodies(&minor);
    }

    let driver = FrameDriver::from_catalog(builder.build(), &config);
    let app = OrreryViz::new(driver);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Orrery", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow!("viewer failed: {e}"))
}

// ---------------------------------------------------------------------------
// Scene: what the driver publishes, in plot coordinates
// ---------------------------------------------------------------------------

/// Ecliptic (top-down x/y) view of the published bodies.
#[derive(Default)]
struct Scene {
    markers: HashMap<String, [f64; 2]>,
    traces: Vec<(String, Vec<[f64; 2]>)>,
}

impl BodySink for Scene {
    fn place(&mut self, name: &str, _kind: BodyKind, position: &Vector3<f64>) {
        match self.markers.get_mut(name) {
            Some(m) => *m = [position.x, position.y],
            None => {
                self.markers.insert(name.to_string(), [position.x, position.y]);
            }
        }
    }

    fn trace(&mut self, name: &str, _kind: BodyKind, polyline: &OrbitPolyline) {
        let points = polyline.points().iter().map(|p| [p.x, p.y]).collect();
        self.traces.push((name.to_string(), points));
    }

    fn name(&self) -> &str {
        "egui scene"
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct OrreryViz {
    driver: FrameDriver,
    scene: Scene,
    stars: Vec<[f64; 2]>,
    overview: f64,  // half-width of the overview, display units
    selected: Option<String>,
    reset_view: bool,
    paused: bool,
    ticks_per_frame: u32,
}

impl OrreryViz {
    fn new(driver: FrameDriver) -> Self {
        let mut scene = Scene::default();
        driver.publish_traces(&mut scene);
        driver.publish_positions(&mut scene);

        let outermost = driver
            .registry()
            .iter()
            .map(|b| b.elements.aphelion() * DISPLAY_SCALE)
            .filter(|r| r.is_finite())
            .fold(SUN_RADIUS * 4.0, f64::max);
        let overview = outermost * 1.1;

        let mut rng = StdRng::from_entropy();
        let extent = overview * 1.5;
        let stars = (0..STAR_COUNT)
            .map(|_| [rng.gen_range(-extent..extent), rng.gen_range(-extent..extent)])
            .collect();

        Self {
            driver,
            scene,
            stars,
            overview,
            selected: None,
            reset_view: true,
            paused: false,
            ticks_per_frame: 1,
        }
    }

    fn selected_info(&self) -> Option<BodyInfo> {
        let name = self.selected.as_deref()?;
        self.driver.registry().info(name).ok()
    }
}

fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

impl eframe::App for OrreryViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.paused {
            for _ in 0..self.ticks_per_frame {
                self.driver.tick(&mut self.scene);
            }
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Orrery");
                ui.separator();
                ui.checkbox(&mut self.paused, "Pause");
                ui.add(egui::Slider::new(&mut self.ticks_per_frame, 1..=200).text("ticks / frame"));
                ui.separator();
                ui.label(format!(
                    "Day {:.1}  |  Tick {}  |  Bodies: {}",
                    self.driver.elapsed(),
                    self.driver.ticks(),
                    self.driver.registry().len(),
                ));
            });
        });

        if let Some(info) = self.selected_info() {
            egui::SidePanel::right("info").min_width(320.0).show(ctx, |ui| {
                ui.heading(&info.name);
                ui.separator();
                ui.monospace(info.to_string());
                ui.separator();
                if ui.button("Back").clicked() {
                    self.selected = None;
                    self.reset_view = true;
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let registry = self.driver.registry();
            let focus = self
                .selected
                .as_deref()
                .and_then(|name| self.scene.markers.get(name).copied());

            let response = Plot::new("ecliptic")
                .data_aspect(1.0)
                .show_axes(false)
                .show_grid(false)
                .allow_double_click_reset(false)
                .show(ui, |plot_ui| {
                    if let Some([x, y]) = focus {
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                            [x - ZOOM_HALF_WIDTH, y - ZOOM_HALF_WIDTH],
                            [x + ZOOM_HALF_WIDTH, y + ZOOM_HALF_WIDTH],
                        ));
                    } else if self.reset_view {
                        let r = self.overview;
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max([-r, -r], [r, r]));
                    }

                    plot_ui.points(
                        Points::new("stars", PlotPoints::from(self.stars.clone()))
                            .radius(0.8)
                            .color(Color32::from_gray(140)),
                    );

                    for (name, points) in &self.scene.traces {
                        let rgb = registry.get(name).map_or([0x80; 3], |b| b.appearance.color);
                        plot_ui.line(
                            Line::new(name.as_str(), PlotPoints::from(points.clone()))
                                .color(color(rgb).gamma_multiply(0.5))
                                .width(1.0),
                        );
                    }

                    plot_ui.points(
                        Points::new("Sun", vec![[0.0, 0.0]])
                            .radius(SUN_RADIUS as f32 * 0.8)
                            .color(Color32::from_rgb(0xFF, 0xD7, 0x00)),
                    );

                    for body in registry.iter() {
                        let Some(&p) = self.scene.markers.get(&body.name) else { continue };
                        let radius = match body.kind {
                            BodyKind::Planet => (body.appearance.radius as f32).clamp(3.0, 8.0),
                            BodyKind::MinorBody => 1.5,
                        };
                        plot_ui.points(
                            Points::new(body.name.as_str(), vec![p])
                                .radius(radius)
                                .color(color(body.appearance.color)),
                        );
                    }

                    let clicked = plot_ui.response().clicked();
                    let pointer = plot_ui.pointer_coordinate();
                    let width = plot_ui.plot_bounds().width();
                    (clicked, pointer, width)
                });

            self.reset_view = false;
            let (clicked, pointer, width) = response.inner;
            if let (true, Some(p)) = (clicked, pointer) {
                let pick = registry.nearest_by(
                    |q| ((q.x - p.x).powi(2) + (q.y - p.y).powi(2)).sqrt(),
                    width * PICK_FRACTION,
                );
                if let Some(body) = pick {
                    self.selected = Some(body.name.clone());
                }
            }
        });

        ctx.request_repaint();
    }
}
