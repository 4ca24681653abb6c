// src/ui.rs
use egui;
use koch_snowflake::geometry::Polygon;

/// Snapshot of the presented stage for the overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudInfo {
    pub iteration: usize,
    pub last_iteration: usize,
    pub vertex_count: usize,
    pub perimeter: f64,
    pub paused: bool,
}

impl HudInfo {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            last_iteration: max_iterations.saturating_sub(1),
            ..Self::default()
        }
    }

    pub fn record(&mut self, polygon: &Polygon, iteration: usize) {
        self.iteration = iteration;
        self.vertex_count = polygon.len();
        self.perimeter = polygon.perimeter();
    }
}

pub fn build_ui(ctx: &egui::Context, hud: &HudInfo) {
    egui::Window::new("Koch Snowflake")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.label(format!("Iteration: {} / {}", hud.iteration, hud.last_iteration));
                ui.label(format!("Vertices: {}", hud.vertex_count));
                ui.label(format!("Perimeter: {:.4}", hud.perimeter));
                if hud.paused {
                    ui.label("Paused");
                }
                ui.separator();

                ui.label("Keyboard Controls:");
                ui.label("   Space: Pause/Resume");
                ui.label("   Right Arrow: Step once");
                ui.label("   R: Restart from seed");
                ui.label("   Click inside the snowflake: Pause/Resume");
                ui.label("   Escape: Quit");
            });
        });
}
