//! Geometry of the overlay: the centered panel and the glyph row inside it.
//!
//! Everything here is pure and works in logical units, so the same layout
//! drives any renderer.

use egui::{pos2, vec2, Rect, Vec2};

use crate::config::OverlayConfig;

/// Fixed-size panel centered in the overlay bounds.
pub fn panel_rect(bounds: Rect, config: &OverlayConfig) -> Rect {
    Rect::from_center_size(
        bounds.center(),
        vec2(config.panel_width, config.panel_height),
    )
}

/// Intrinsic size of a glyph label. Width scales with the character count,
/// so an empty string measures zero wide.
pub fn glyph_size(text: &str, config: &OverlayConfig) -> Vec2 {
    let chars = text.chars().count() as f32;
    vec2(
        chars * config.font_size * config.glyph_advance,
        config.font_size * config.glyph_line_height,
    )
}

/// Lay glyphs out left to right inside `panel`.
///
/// The middle glyph (index `n / 2`) sits on the panel's center; the others
/// chain off it with `gap` between neighbouring edges. Every glyph is
/// vertically centered on the panel.
pub fn layout_glyphs(panel: Rect, sizes: &[Vec2], gap: f32) -> Vec<Rect> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let center = panel.center();
    let anchor = sizes.len() / 2;
    let mut frames = vec![Rect::NOTHING; sizes.len()];
    frames[anchor] = Rect::from_center_size(center, sizes[anchor]);

    for i in (0..anchor).rev() {
        let right = frames[i + 1].left() - gap;
        frames[i] = Rect::from_min_size(
            pos2(right - sizes[i].x, center.y - sizes[i].y / 2.0),
            sizes[i],
        );
    }

    for i in anchor + 1..sizes.len() {
        let left = frames[i - 1].right() + gap;
        frames[i] = Rect::from_min_size(pos2(left, center.y - sizes[i].y / 2.0), sizes[i]);
    }

    frames
}
