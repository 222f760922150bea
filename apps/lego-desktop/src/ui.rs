//! egui rendering of the debug panel and the stats overlay.

use lego_debug::{Control, DebugPanel, Folder};
use lego_tools::{FRAME_TIME_HISTORY_SIZE, FrameStats, SceneSummary, TARGET_FRAME_TIME_MS};

/// Frame time at the top of the overlay graph (30 FPS).
const GRAPH_MAX_FRAME_TIME_MS: f32 = 33.33;

/// Draw every folder of `panel`, writing control edits into the folder's
/// bound values.
pub fn draw_panel(ctx: &egui::Context, panel: &DebugPanel) {
    if !panel.is_visible() {
        return;
    }

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            let folders = panel.folders();
            if folders.is_empty() {
                ui.weak("Nothing bound");
            }
            for (i, folder) in folders.iter().enumerate() {
                egui::CollapsingHeader::new(folder.name.as_str())
                    .id_salt(("folder", i))
                    .default_open(true)
                    .show(ui, |ui| draw_folder(ui, folder));
            }
            ui.separator();
            ui.small("F1: toggle panel | drag: orbit | right drag: pan | wheel: zoom | R: reset");
        });
}

fn draw_folder(ui: &mut egui::Ui, folder: &Folder) {
    if folder.controls.is_empty() {
        ui.weak("(no controls)");
    }
    for control in &folder.controls {
        match control {
            Control::Slider { field, min, max } => {
                let Some(mut value) = folder.values.number(field) else {
                    continue;
                };
                let slider = egui::Slider::new(&mut value, *min..=*max).text(field.as_str());
                if ui.add(slider).changed() {
                    folder.values.set_number(field, value);
                }
            }
            Control::Color { field } => {
                let Some(color) = folder.values.color(field) else {
                    continue;
                };
                let mut rgb = color.to_array();
                ui.horizontal(|ui| {
                    if ui.color_edit_button_rgb(&mut rgb).changed() {
                        folder.values.set_color(field, rgb.into());
                    }
                    ui.label(field.as_str());
                });
            }
        }
    }
}

/// Frame rate, frame time graph and scene counts, pinned to the top right.
pub fn draw_stats(ctx: &egui::Context, stats: &FrameStats, scene: &SceneSummary) {
    egui::Window::new("Stats")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .title_bar(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", stats.fps()));
            ui.label(format!(
                "Frame: {:.2}ms (max {:.2}ms)",
                stats.average_frame_ms(),
                stats.max_frame_ms()
            ));
            ui.label(format!(
                "Nodes: {}  Triangles: {}",
                scene.nodes, scene.triangles
            ));
            frame_graph(ui, stats);
        });
}

fn frame_graph(ui: &mut egui::Ui, stats: &FrameStats) {
    let height = 40.0;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, height), egui::Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(30));

    let target_y = rect.bottom() - TARGET_FRAME_TIME_MS / GRAPH_MAX_FRAME_TIME_MS * height;
    painter.hline(
        rect.left()..=rect.right(),
        target_y,
        egui::Stroke::new(1.0, egui::Color32::from_gray(100)),
    );

    let bar_width = rect.width() / FRAME_TIME_HISTORY_SIZE as f32;
    for (i, ms) in stats.history().enumerate() {
        let x = rect.left() + i as f32 * bar_width;
        let bar = (ms / GRAPH_MAX_FRAME_TIME_MS * height).min(height);
        let color = if ms <= TARGET_FRAME_TIME_MS {
            egui::Color32::from_rgb(100, 200, 100)
        } else {
            egui::Color32::from_rgb(200, 200, 100)
        };
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - bar),
                egui::pos2(x + bar_width.max(1.0), rect.bottom()),
            ),
            0.0,
            color,
        );
    }
}
