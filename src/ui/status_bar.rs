use crate::overlay::{DotWaveOverlay, OverlayState};
use crate::timeline::Timeline;

pub fn show_status_bar(ctx: &egui::Context, overlay: &DotWaveOverlay, timeline: &Timeline) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            match overlay.state() {
                OverlayState::Detached => {
                    ui.label("Overlay hidden");
                }
                OverlayState::AttachedIdle => {
                    ui.colored_label(egui::Color32::from_rgb(200, 160, 40), "Overlay idle");
                }
                OverlayState::AttachedAnimating => {
                    ui.colored_label(egui::Color32::from_rgb(66, 133, 244), "Overlay animating");
                }
            }
            ui.separator();
            ui.label(format!("Glyphs: {}", overlay.glyphs().len()));
            ui.separator();
            ui.label(format!("Active waves: {}", timeline.active_count()));
        });
    });
}
