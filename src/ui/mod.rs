pub mod controls;
pub mod status_bar;

use crate::config::OverlayConfig;
use crate::overlay::DotWaveOverlay;
use crate::timeline::Timeline;

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ShowOverlay,
    HideOverlay,
    SetSymbols(Vec<String>),
    ConfigChanged,
    Quit,
}

pub struct UiState {
    pub show_controls: bool,
    /// Contents of the symbols field, space separated.
    pub symbols_text: String,
    pub content_rect: egui::Rect,
}

impl UiState {
    pub fn new(symbols: &[String]) -> Self {
        Self {
            show_controls: true,
            symbols_text: symbols.join(" "),
            content_rect: egui::Rect::EVERYTHING,
        }
    }
}

/// Split the symbols field into glyphs. Blank input is an empty row.
pub fn parse_symbols(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Build the entire egui UI. Returns a list of actions to process.
pub fn build_ui(
    ctx: &egui::Context,
    ui_state: &mut UiState,
    config: &mut OverlayConfig,
    overlay: &DotWaveOverlay,
    timeline: &Timeline,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    status_bar::show_status_bar(ctx, overlay, timeline);

    if ui_state.show_controls {
        actions.extend(controls::show_controls_panel(
            ctx, ui_state, config, overlay,
        ));
    }

    // Whatever the panels left over is the host view the overlay covers.
    ui_state.content_rect = ctx.available_rect();

    actions
}
