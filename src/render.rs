use anyhow::{anyhow, Result};
use skia_safe::{
    canvas::SaveLayerRec,
    font_style::{Slant, Weight, Width},
    image_filters, Canvas, ClipOp, Color, Font, FontMgr, FontStyle, Paint, RRect, Rect,
};

use crate::overlay::DotWaveOverlay;
use crate::timeline::Timeline;

fn to_skia(rect: egui::Rect) -> Rect {
    Rect::from_ltrb(rect.left(), rect.top(), rect.right(), rect.bottom())
}

fn color([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_argb(a, r, g, b)
}

fn match_typeface(style: FontStyle) -> Option<skia_safe::Typeface> {
    let font_mgr = FontMgr::default();
    font_mgr
        .match_family_style("DejaVu Sans", style)
        .or_else(|| font_mgr.match_family_style("sans-serif", style))
}

/// Skia drawing for the overlay and the demo host content beneath it.
pub struct OverlayPainter {
    glyph_font: Font,
    body_font: Font,
}

impl OverlayPainter {
    pub fn new(font_size: f32) -> Result<Self> {
        let heavy = FontStyle::new(Weight::EXTRA_BOLD, Width::NORMAL, Slant::Upright);
        let glyph_face =
            match_typeface(heavy).ok_or_else(|| anyhow!("no typeface available for glyphs"))?;
        let body_face = match_typeface(FontStyle::default())
            .ok_or_else(|| anyhow!("no typeface available for body text"))?;

        Ok(Self {
            glyph_font: Font::from_typeface(glyph_face, font_size),
            body_font: Font::from_typeface(body_face, 16.0),
        })
    }

    /// Keep the glyph font in step with the configured size.
    pub fn set_font_size(&mut self, size: f32) {
        if self.glyph_font.size() != size {
            self.glyph_font.set_size(size);
        }
    }

    /// Striped backdrop with a few lines of text, so the overlay's
    /// translucency and blur have something to act on.
    pub fn draw_host_content(&self, canvas: &Canvas, bounds: egui::Rect) {
        let area = to_skia(bounds);
        let mut paint = Paint::default();
        paint.set_anti_alias(true);

        paint.set_color(Color::from_argb(255, 236, 239, 244));
        canvas.draw_rect(area, &paint);

        paint.set_color(Color::from_argb(255, 66, 133, 244));
        let stripe = 24.0;
        let mut x = area.left();
        while x < area.right() {
            canvas.draw_rect(
                Rect::from_xywh(x, area.top(), stripe / 2.0, area.height()),
                &paint,
            );
            x += stripe * 2.0;
        }

        paint.set_color(Color::from_argb(255, 30, 30, 30));
        let mut y = area.top() + 40.0;
        let mut line = 1;
        while y < area.bottom() - 20.0 {
            canvas.draw_str(
                format!("Background work item {line}"),
                (area.left() + 24.0, y),
                &self.body_font,
                &paint,
            );
            y += 32.0;
            line += 1;
        }
    }

    /// Draw the overlay at the current timeline offsets. Coordinates are in
    /// logical units; the canvas is expected to be scaled to physical pixels.
    pub fn draw_overlay(&self, canvas: &Canvas, overlay: &DotWaveOverlay, timeline: &Timeline) {
        let config = overlay.config();
        let bounds = to_skia(overlay.bounds());
        if bounds.is_empty() {
            return;
        }
        let backdrop = RRect::new_rect_xy(bounds, config.corner_radius, config.corner_radius);

        canvas.save();
        canvas.clip_rrect(&backdrop, ClipOp::Intersect, true);

        if config.blur_sigma > 0.0 {
            if let Some(blur) = image_filters::blur(
                (config.blur_sigma, config.blur_sigma),
                None,
                None,
                bounds,
            ) {
                canvas.save_layer(&SaveLayerRec::default().bounds(&bounds).backdrop(&blur));
                canvas.restore();
            }
        }

        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(color(config.backdrop_rgba()));
        canvas.draw_rrect(&backdrop, &paint);

        let panel = to_skia(overlay.panel());
        paint.set_color(color(config.panel_tint));
        canvas.draw_rrect(
            RRect::new_rect_xy(panel, config.corner_radius, config.corner_radius),
            &paint,
        );

        paint.set_color(color(config.glyph_color));
        for glyph in overlay.glyphs() {
            let Some(layer) = glyph.layer else {
                continue;
            };
            let (_, ink) = self.glyph_font.measure_str(&glyph.text, Some(&paint));
            let cx = layer.resting.x;
            let cy = layer.resting.y + timeline.offset(glyph.id);
            canvas.draw_str(
                &glyph.text,
                (cx - ink.center_x(), cy - ink.center_y()),
                &self.glyph_font,
                &paint,
            );
        }

        canvas.restore();
    }
}
