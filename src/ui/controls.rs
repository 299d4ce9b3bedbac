use std::ops::RangeInclusive;

use crate::config::OverlayConfig;
use crate::overlay::DotWaveOverlay;
use crate::ui::{parse_symbols, UiAction, UiState};

fn drag_row(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: RangeInclusive<f32>,
    speed: f64,
) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range).speed(speed))
            .changed()
    })
    .inner
}

pub fn show_controls_panel(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    config: &mut OverlayConfig,
    overlay: &DotWaveOverlay,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::SidePanel::right("controls")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Overlay");
            ui.separator();

            ui.horizontal(|ui| {
                if overlay.is_attached() {
                    if ui.button("Hide").clicked() {
                        actions.push(UiAction::HideOverlay);
                    }
                } else if ui.button("Show").clicked() {
                    actions.push(UiAction::ShowOverlay);
                }
                if ui.button("Quit").clicked() {
                    actions.push(UiAction::Quit);
                }
            });

            ui.add_space(4.0);
            ui.label("Symbols:");
            let response = ui.text_edit_singleline(&mut ui_state.symbols_text);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Apply").clicked() || submitted {
                actions.push(UiAction::SetSymbols(parse_symbols(&ui_state.symbols_text)));
            }

            ui.add_space(8.0);
            ui.heading("Style");
            ui.separator();

            let mut changed = false;
            changed |= drag_row(ui, "Font size:", &mut config.font_size, 8.0..=200.0, 1.0);
            changed |= drag_row(ui, "Glyph gap:", &mut config.glyph_gap, 0.0..=40.0, 0.5);
            changed |= drag_row(ui, "Panel width:", &mut config.panel_width, 20.0..=600.0, 1.0);
            changed |= drag_row(ui, "Panel height:", &mut config.panel_height, 20.0..=400.0, 1.0);
            changed |= drag_row(ui, "Corner radius:", &mut config.corner_radius, 0.0..=50.0, 0.5);
            changed |= drag_row(
                ui,
                "Backdrop opacity:",
                &mut config.backdrop_opacity,
                0.0..=1.0,
                0.01,
            );
            changed |= drag_row(ui, "Blur:", &mut config.blur_sigma, 0.0..=40.0, 0.5);

            ui.add_space(8.0);
            ui.heading("Wave");
            ui.separator();

            changed |= drag_row(ui, "Offset:", &mut config.wave_offset, 0.0..=80.0, 0.5);

            ui.horizontal(|ui| {
                ui.label("Duration:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut config.cycle_duration)
                            .range(0.05..=5.0)
                            .speed(0.01)
                            .suffix(" s"),
                    )
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Stagger:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut config.stagger_factor)
                            .range(0.0..=2.0)
                            .speed(0.01),
                    )
                    .changed();
            });

            ui.add_space(8.0);
            if ui.button("Reset to Defaults").clicked() {
                *config = OverlayConfig::default();
                changed = true;
            }

            if changed {
                config.save();
                actions.push(UiAction::ConfigChanged);
            }
        });

    actions
}
