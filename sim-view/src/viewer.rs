//! Interactive cloth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] and
//! implements [`eframe::App`] to step it once per frame, draw the cloth as
//! a shaded triangle mesh, and expose the live controls.

use std::time::Instant;

use cloth_core::{Settings, Simulation, StepReport, config::Controls, error::ConfigError};
use eframe::App;
use glam::{Quat, Vec3};

const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 0.1;

/// Procedural surface patterns, coloured from the mesh UVs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Fabric,
    Squares,
    Carpet,
}

impl Pattern {
    const ALL: [Pattern; 3] = [Pattern::Fabric, Pattern::Squares, Pattern::Carpet];

    fn label(self) -> &'static str {
        match self {
            Pattern::Fabric => "Fabric",
            Pattern::Squares => "Squares",
            Pattern::Carpet => "Carpet",
        }
    }

    /// Base colour at texture coordinate `(u, v)`.
    fn color(self, u: f32, v: f32) -> egui::Color32 {
        match self {
            Pattern::Fabric => {
                let weave = ((u * 40.0).floor() + (v * 40.0).floor()) as i32 % 2 == 0;
                if weave {
                    egui::Color32::from_rgb(176, 58, 62)
                } else {
                    egui::Color32::from_rgb(158, 50, 56)
                }
            }
            Pattern::Squares => {
                let even = ((u * 8.0).floor() + (v * 8.0).floor()) as i32 % 2 == 0;
                if even {
                    egui::Color32::from_rgb(235, 235, 235)
                } else {
                    egui::Color32::from_rgb(40, 60, 120)
                }
            }
            Pattern::Carpet => {
                if ((u + v) * 6.0).fract() < 0.5 {
                    egui::Color32::from_rgb(122, 82, 44)
                } else {
                    egui::Color32::from_rgb(164, 112, 62)
                }
            }
        }
    }
}

/// A world-space triangle with its shaded vertex colours.
#[derive(Clone, Copy, Debug)]
struct ShadedTriangle {
    verts: [Vec3; 3],
    colors: [egui::Color32; 3],
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulation`] and its published buffers.
/// - Camera state (orbit yaw/pitch and distance) and the surface pattern.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input, forwarding control changes.
/// 2. If `running` is `true`, call [`Viewer::step_once`] with the egui clock.
/// 3. Rebuild the triangle cache if the output buffer changed, then draw.
pub struct Viewer {
    sim: Simulation,
    pattern: Pattern,

    running: bool,
    yaw: f32,
    pitch: f32,
    distance: f32,

    triangles: Vec<ShadedTriangle>,
    last_report: StepReport,
    last_step_ms: f64,
}

impl Viewer {
    /// Creates a viewer around a fresh simulation built from `settings`.
    ///
    /// ### Returns
    /// The viewer, or the validation error if the settings describe a
    /// lattice that cannot be built.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let sim = Simulation::new(settings.config, settings.controls)?;
        let mut viewer = Self {
            sim,
            pattern: Pattern::Fabric,
            running: true,
            yaw: 0.6,
            pitch: 0.15,
            distance: 22.0,
            triangles: Vec::new(),
            last_report: StepReport::default(),
            last_step_ms: 0.0,
        };
        viewer.refresh_triangles();
        Ok(viewer)
    }

    /// Advances the simulation by one step using `elapsed` as the wall clock.
    fn step_once(&mut self, elapsed: f64) {
        let start = Instant::now();
        self.last_report = self.sim.step(elapsed);
        self.last_step_ms = start.elapsed().as_secs_f64() * 1e3;
    }

    /// Rebuilds the shaded triangle cache from the published buffers.
    fn refresh_triangles(&mut self) {
        let positions = self.sim.output().positions();
        let mesh = self.sim.mesh();
        let light = Vec3::new(0.3, 1.0, 0.5).normalize();

        let vertex = |i: usize| Vec3::from_slice(&positions[3 * i..3 * i + 3]);
        let base = |i: usize| self.pattern.color(mesh.uvs[2 * i], mesh.uvs[2 * i + 1]);

        self.triangles = mesh
            .indices
            .chunks_exact(3)
            .map(|tri| {
                let ids = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                let verts = ids.map(&vertex);
                let normal = (verts[1] - verts[0])
                    .cross(verts[2] - verts[0])
                    .normalize_or_zero();
                // Double-sided cloth.
                let shade = 0.35 + 0.65 * normal.dot(light).abs();
                ShadedTriangle {
                    verts,
                    colors: ids.map(|i| scale_color(base(i), shade)),
                }
            })
            .collect();
    }

    /// Projects a world-space point through the orbit camera.
    ///
    /// ### Returns
    /// The screen position and view depth, or `None` if the point is
    /// behind the near plane.
    fn project(&self, p: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let rot = Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw);
        let v = rot * p;
        let depth = self.distance - v.z;
        if depth <= NEAR {
            return None;
        }
        let focal = 0.5 * rect.height() / (FOV_Y * 0.5).tan();
        let s = focal / depth;
        let center = rect.center();
        Some((egui::pos2(center.x + v.x * s, center.y - v.y * s), depth))
    }

    /// Builds a depth-sorted egui mesh of the cloth for the current camera.
    fn cloth_mesh(&self, rect: egui::Rect) -> egui::Mesh {
        let mut projected: Vec<(f32, [egui::Pos2; 3], [egui::Color32; 3])> = self
            .triangles
            .iter()
            .filter_map(|t| {
                let a = self.project(t.verts[0], rect)?;
                let b = self.project(t.verts[1], rect)?;
                let c = self.project(t.verts[2], rect)?;
                Some(((a.1 + b.1 + c.1) / 3.0, [a.0, b.0, c.0], t.colors))
            })
            .collect();

        // Painter's algorithm: far triangles first.
        projected.sort_by(|x, y| y.0.total_cmp(&x.0));

        let mut mesh = egui::Mesh::default();
        for (_, pts, colors) in projected {
            let base = mesh.vertices.len() as u32;
            for (p, c) in pts.into_iter().zip(colors) {
                mesh.colored_vertex(p, c);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        mesh
    }

    /// Builds the top panel UI (run controls, stepping, reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    self.step_once(now);
                }

                if ui.button("Reset").clicked() {
                    self.sim.reset();
                    self.last_report = StepReport::default();
                }
            });
        });
    }

    /// Builds the bottom status bar (steps, timing, solver diagnostics).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("step time = {:.2} ms", self.last_step_ms));
                ui.separator();
                ui.label(format!("max stretch = {:.4}", self.sim.max_link_excess()));
                ui.label(format!("degenerate = {}", self.last_report.degenerate_pairs));
                ui.separator();
                ui.label(format!("steps = {}", self.sim.steps_taken()));
            });
        });
    }

    /// Builds the right-hand panel for the live simulation controls.
    fn ui_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Controls");
                let mut controls: Controls = *self.sim.controls();

                ui.separator();
                ui.label("Wind");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut controls.wind_enabled, true, "On");
                    ui.radio_value(&mut controls.wind_enabled, false, "Off");
                });
                ui.add(egui::Slider::new(&mut controls.wind_level, 0..=100).text("Level"));

                ui.separator();
                ui.label("Attachment");
                ui.radio_value(&mut controls.point_attached, true, "Two corners");
                ui.radio_value(&mut controls.point_attached, false, "Whole top edge");

                ui.separator();
                ui.checkbox(&mut controls.cloth_tear, "Tear down the middle");

                if controls != *self.sim.controls() {
                    self.sim.set_controls(controls);
                }

                ui.separator();
                ui.label("Surface");
                let before = self.pattern;
                for pattern in Pattern::ALL {
                    ui.radio_value(&mut self.pattern, pattern, pattern.label());
                }
                if self.pattern != before {
                    self.refresh_triangles();
                }
            });
    }

    /// Builds the central panel where the cloth is drawn and the camera orbits.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(135, 206, 235)))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Orbit with drag.
                if response.dragged() {
                    let delta = response.drag_delta();
                    self.yaw += delta.x * 0.01;
                    self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
                }

                // Zoom with scroll.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let factor = (1.0 - scroll * 0.001).clamp(0.5, 2.0);
                    self.distance = (self.distance * factor).clamp(5.0, 200.0);
                }

                // Auto-run simulation if requested.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    self.step_once(now);
                    ctx.request_repaint();
                }

                if self.sim.output_mut().take_update() {
                    self.refresh_triangles();
                }

                // Pole along the top edge.
                let cfg = self.sim.config();
                let top = cfg.height / 2.0;
                if let (Some((a, _)), Some((b, _))) = (
                    self.project(Vec3::new(-cfg.width, top, 0.0), rect),
                    self.project(Vec3::new(cfg.width, top, 0.0), rect),
                ) {
                    painter.line_segment([a, b], egui::Stroke::new(3.0, egui::Color32::WHITE));
                }

                painter.add(egui::Shape::mesh(self.cloth_mesh(rect)));
            });
    }
}

/// Multiplies the RGB channels of an opaque colour by `k`.
fn scale_color(c: egui::Color32, k: f32) -> egui::Color32 {
    let f = |x: u8| (x as f32 * k).round().clamp(0.0, 255.0) as u8;
    egui::Color32::from_rgb(f(c.r()), f(c.g()), f(c.b()))
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_controls_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
