use egui::ViewportBuilder;
use hypno_lib::{
    config::{load_config, ChartConfig},
    ChartController,
};
use std::env;
use std::path::PathBuf;

mod painter;

use painter::EguiSurface;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path)?,
        None => ChartConfig::default(),
    };
    let app = HypnoApp::new(ChartController::from_entropy(config)?);

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "hypno — sleep heart rate",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("eframe: {err}"))
}

struct HypnoApp {
    controller: ChartController,
    status: String,
}

impl HypnoApp {
    fn new(controller: ChartController) -> Self {
        Self {
            controller,
            status: "Ready".into(),
        }
    }

    fn regenerate(&mut self) {
        self.status = match self.controller.regenerate() {
            Ok(()) => format!(
                "Generated {} samples",
                self.controller.current_series().len()
            ),
            Err(err) => {
                log::warn!("regeneration failed: {err}");
                format!("Error: {err}")
            }
        };
    }

    fn show_chart(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;
        self.controller
            .resize(rect.width() as f64, rect.height() as f64);

        let cursor = response.hover_pos().map(|pos| {
            ui.ctx().set_cursor_icon(egui::CursorIcon::None);
            ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
        });

        let mut surface = EguiSurface::new(&painter, rect.min);
        if let Err(err) = self.controller.render(&mut surface, cursor) {
            log::warn!("chart render failed: {err}");
        }
    }
}

impl eframe::App for HypnoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Update").clicked() {
                    self.regenerate();
                }
                if ui.button("TOGGLE REM MARKERS").clicked() {
                    let visible = self.controller.toggle_markers();
                    self.status = if visible {
                        "REM markers shown".into()
                    } else {
                        "REM markers hidden".into()
                    };
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Status: {}", self.status));
                ui.label(format!(
                    "Samples: {}",
                    self.controller.current_series().len()
                ));
                if self.controller.markers_visible() {
                    ui.label(format!("Markers: {}", self.controller.markers().len()));
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.show_chart(ui));
    }
}
