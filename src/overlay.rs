//! The dot-wave overlay: a translucent panel with a row of glyphs bobbing in a
//! staggered wave.
//!
//! The overlay owns its layout and lifecycle. Hosting and frame timing come in
//! through [`Surface`] and [`Animator`], so the whole lifecycle runs against
//! test doubles as well as a real window.

use egui::Rect;
use thiserror::Error;

use crate::animator::{Animator, GlyphId};
use crate::config::OverlayConfig;
use crate::layout;
use crate::surface::{OverlayId, Surface, SurfaceId};
use crate::wave::WaveAnimation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Detached,
    AttachedAnimating,
    /// Attached but nothing is moving (empty row, or no glyph could animate).
    AttachedIdle,
}

#[derive(Debug, Error, PartialEq)]
pub enum OverlayError {
    #[error("overlay {overlay:?} is already attached to surface {current:?}")]
    AttachedElsewhere {
        overlay: OverlayId,
        current: SurfaceId,
    },
    #[error("overlay {overlay:?} is attached to {attached:?}, not {requested:?}")]
    WrongSurface {
        overlay: OverlayId,
        attached: SurfaceId,
        requested: SurfaceId,
    },
}

/// Renderable backing of a glyph. Only glyphs with a non-empty size get one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayer {
    /// Center of the glyph at rest.
    pub resting: egui::Pos2,
}

#[derive(Debug, Clone)]
pub struct Glyph {
    pub id: GlyphId,
    pub text: String,
    pub frame: Rect,
    pub layer: Option<GlyphLayer>,
    animating: bool,
}

impl Glyph {
    fn new(text: String) -> Self {
        Self {
            id: GlyphId::next(),
            text,
            frame: Rect::NOTHING,
            layer: None,
            animating: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }
}

pub struct DotWaveOverlay {
    id: OverlayId,
    config: OverlayConfig,
    bounds: Rect,
    panel: Rect,
    glyphs: Vec<Glyph>,
    host: Option<SurfaceId>,
}

impl DotWaveOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        let symbols = config.symbols.clone();
        Self::with_symbols(config, &symbols)
    }

    pub fn with_symbols<S: AsRef<str>>(config: OverlayConfig, symbols: &[S]) -> Self {
        let mut overlay = Self {
            id: OverlayId::next(),
            config,
            bounds: Rect::ZERO,
            panel: Rect::ZERO,
            glyphs: symbols
                .iter()
                .map(|s| Glyph::new(s.as_ref().to_string()))
                .collect(),
            host: None,
        };
        overlay.relayout();
        overlay
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn panel(&self) -> Rect {
        self.panel
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.state() == OverlayState::AttachedAnimating
    }

    pub fn state(&self) -> OverlayState {
        match self.host {
            None => OverlayState::Detached,
            Some(_) if self.glyphs.iter().any(|g| g.animating) => {
                OverlayState::AttachedAnimating
            }
            Some(_) => OverlayState::AttachedIdle,
        }
    }

    /// Cover `host` and start the wave, optionally swapping in a new glyph row.
    ///
    /// Repeating the call with the same row changes nothing: the overlay is
    /// inserted once and running glyphs keep their animation.
    pub fn attach<S, H, A>(
        &mut self,
        host: &mut H,
        animator: &mut A,
        symbols: Option<&[S]>,
    ) -> Result<(), OverlayError>
    where
        S: AsRef<str>,
        H: Surface + ?Sized,
        A: Animator + ?Sized,
    {
        let surface = host.surface_id();
        if let Some(current) = self.host {
            if current != surface {
                return Err(OverlayError::AttachedElsewhere {
                    overlay: self.id,
                    current,
                });
            }
        }

        if let Some(symbols) = symbols {
            self.reconcile(symbols, animator);
        }

        self.bounds = host.bounds();
        self.relayout();

        if !host.contains_child(self.id) {
            host.insert_child(self.id);
            log::info!(
                "Overlay {:?} attached to {:?} with {} glyph(s)",
                self.id,
                surface,
                self.glyphs.len()
            );
        }
        self.host = Some(surface);

        self.start_wave(animator);
        Ok(())
    }

    /// Stop every glyph's animation and leave the host. No-op when detached.
    pub fn detach<H, A>(&mut self, host: &mut H, animator: &mut A) -> Result<(), OverlayError>
    where
        H: Surface + ?Sized,
        A: Animator + ?Sized,
    {
        let Some(attached) = self.host else {
            return Ok(());
        };
        let requested = host.surface_id();
        if attached != requested {
            return Err(OverlayError::WrongSurface {
                overlay: self.id,
                attached,
                requested,
            });
        }

        self.stop_wave(animator);
        if !host.remove_child(self.id) {
            log::debug!("Overlay {:?} was already gone from {:?}", self.id, attached);
        }
        self.host = None;
        log::info!("Overlay {:?} detached", self.id);
        Ok(())
    }

    /// Follow a host resize. Animations are relative to the resting position,
    /// so they keep running untouched.
    pub fn sync_bounds<H: Surface + ?Sized>(&mut self, host: &H) {
        let bounds = host.bounds();
        if bounds != self.bounds {
            self.bounds = bounds;
            self.relayout();
        }
    }

    /// Restyle the overlay. Running waves restart so new timing takes effect.
    pub fn set_config<A: Animator + ?Sized>(&mut self, config: OverlayConfig, animator: &mut A) {
        self.stop_wave(animator);
        self.config = config;
        self.relayout();
        if self.host.is_some() {
            self.start_wave(animator);
        }
    }

    fn reconcile<S, A>(&mut self, symbols: &[S], animator: &mut A)
    where
        S: AsRef<str>,
        A: Animator + ?Sized,
    {
        let unchanged = symbols.len() == self.glyphs.len()
            && symbols
                .iter()
                .zip(&self.glyphs)
                .all(|(s, g)| s.as_ref() == g.text);
        if unchanged {
            return;
        }

        if symbols.len() != self.glyphs.len() {
            log::debug!(
                "Rebuilding glyph row: {} -> {} glyph(s)",
                self.glyphs.len(),
                symbols.len()
            );
            self.stop_wave(animator);
            self.glyphs = symbols
                .iter()
                .map(|s| Glyph::new(s.as_ref().to_string()))
                .collect();
        } else {
            for (glyph, symbol) in self.glyphs.iter_mut().zip(symbols) {
                glyph.text = symbol.as_ref().to_string();
            }
        }
        self.relayout();

        // A glyph emptied in place has nothing left to move.
        for glyph in self.glyphs.iter_mut().filter(|g| g.animating && g.layer.is_none()) {
            animator.cancel_all(glyph.id);
            glyph.animating = false;
        }
    }

    fn relayout(&mut self) {
        self.panel = layout::panel_rect(self.bounds, &self.config);
        let sizes: Vec<_> = self
            .glyphs
            .iter()
            .map(|g| layout::glyph_size(&g.text, &self.config))
            .collect();
        let frames = layout::layout_glyphs(self.panel, &sizes, self.config.glyph_gap);

        for (glyph, frame) in self.glyphs.iter_mut().zip(frames) {
            glyph.frame = frame;
            glyph.layer = (frame.width() > 0.0 && frame.height() > 0.0).then(|| GlyphLayer {
                resting: frame.center(),
            });
        }
    }

    /// Glyphs without a layer, or rejected by the animator, are skipped; the
    /// rest of the row still animates.
    fn start_wave<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        for (index, glyph) in self.glyphs.iter_mut().enumerate() {
            if glyph.animating {
                continue;
            }
            if glyph.layer.is_none() {
                log::warn!(
                    "Glyph {} ({:?}) has no renderable layer, skipping its animation",
                    index,
                    glyph.text
                );
                continue;
            }

            let wave = WaveAnimation::for_glyph(index, &self.config);
            match animator.start(glyph.id, &wave) {
                Ok(()) => glyph.animating = true,
                Err(e) => log::warn!("Failed to animate glyph {}: {}", index, e),
            }
        }
    }

    fn stop_wave<A: Animator + ?Sized>(&mut self, animator: &mut A) {
        for glyph in self.glyphs.iter_mut().filter(|g| g.animating) {
            animator.cancel_all(glyph.id);
            glyph.animating = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::AnimateError;
    use crate::wave::Repeat;
    use egui::{pos2, vec2};
    use std::collections::HashMap;

    const DOT: &str = "\u{2022}";

    struct FakeSurface {
        id: SurfaceId,
        bounds: Rect,
        children: Vec<OverlayId>,
        inserts: usize,
    }

    impl FakeSurface {
        fn new(w: f32, h: f32) -> Self {
            Self {
                id: SurfaceId::next(),
                bounds: Rect::from_min_size(pos2(0.0, 0.0), vec2(w, h)),
                children: Vec::new(),
                inserts: 0,
            }
        }
    }

    impl Surface for FakeSurface {
        fn surface_id(&self) -> SurfaceId {
            self.id
        }

        fn bounds(&self) -> Rect {
            self.bounds
        }

        fn insert_child(&mut self, child: OverlayId) {
            self.inserts += 1;
            self.children.push(child);
        }

        fn remove_child(&mut self, child: OverlayId) -> bool {
            let before = self.children.len();
            self.children.retain(|c| *c != child);
            self.children.len() != before
        }

        fn contains_child(&self, child: OverlayId) -> bool {
            self.children.contains(&child)
        }
    }

    #[derive(Default)]
    struct FakeAnimator {
        scheduled: HashMap<GlyphId, WaveAnimation>,
        starts: usize,
        cancels: HashMap<GlyphId, usize>,
        reject: Option<GlyphId>,
    }

    impl Animator for FakeAnimator {
        fn start(&mut self, target: GlyphId, wave: &WaveAnimation) -> Result<(), AnimateError> {
            if self.reject == Some(target) {
                return Err(AnimateError::InvalidTiming {
                    target,
                    duration: wave.duration,
                    delay: wave.delay,
                });
            }
            self.starts += 1;
            self.scheduled.insert(target, wave.clone());
            Ok(())
        }

        fn cancel_all(&mut self, target: GlyphId) {
            *self.cancels.entry(target).or_default() += 1;
            self.scheduled.remove(&target);
        }
    }

    fn frames(overlay: &DotWaveOverlay) -> Vec<Rect> {
        overlay.glyphs().iter().map(|g| g.frame).collect()
    }

    #[test]
    fn test_glyph_count_matches_sequence() {
        for n in 0..6 {
            let mut host = FakeSurface::new(800.0, 600.0);
            let mut animator = FakeAnimator::default();
            let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
            let symbols = vec![DOT; n];
            overlay
                .attach(&mut host, &mut animator, Some(&symbols[..]))
                .unwrap();
            assert_eq!(overlay.glyphs().len(), n);
            assert_eq!(animator.scheduled.len(), n);
        }
    }

    #[test]
    fn test_layout_before_attach() {
        let overlay = DotWaveOverlay::new(OverlayConfig::default());
        assert_eq!(overlay.state(), OverlayState::Detached);
        assert_eq!(overlay.glyphs().len(), 3);
        assert!(overlay.glyphs().iter().all(|g| g.layer.is_some()));
        assert_eq!(overlay.glyphs()[1].frame.center(), overlay.panel().center());
    }

    #[test]
    fn test_three_dots_scenario() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach(&mut host, &mut animator, Some(&[DOT, DOT, DOT][..]))
            .unwrap();

        assert_eq!(overlay.state(), OverlayState::AttachedAnimating);
        assert_eq!(overlay.bounds(), host.bounds);
        assert_eq!(overlay.panel().center(), pos2(400.0, 300.0));

        let glyphs = overlay.glyphs();
        assert_eq!(glyphs[1].frame.center(), overlay.panel().center());
        assert!((glyphs[0].frame.right() + 2.0 - glyphs[1].frame.left()).abs() < 1e-4);
        assert!((glyphs[1].frame.right() + 2.0 - glyphs[2].frame.left()).abs() < 1e-4);

        let expected = [0.0, 0.18, 0.36];
        for (glyph, delay) in glyphs.iter().zip(expected) {
            let wave = &animator.scheduled[&glyph.id];
            assert!((wave.delay - delay).abs() < 1e-9);
            assert_eq!(wave.amplitude(), 14.0);
            assert_eq!(wave.duration, 0.6);
            assert!(wave.autoreverses);
            assert_eq!(wave.repeat, Repeat::Forever);
        }
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        let symbols = ["a", "b", "c"];

        overlay
            .attach(&mut host, &mut animator, Some(&symbols[..]))
            .unwrap();
        let ids: Vec<_> = overlay.glyphs().iter().map(|g| g.id).collect();
        let before = frames(&overlay);

        overlay
            .attach(&mut host, &mut animator, Some(&symbols[..]))
            .unwrap();
        assert_eq!(host.inserts, 1);
        assert_eq!(host.children, vec![overlay.id()]);
        assert_eq!(animator.starts, 3);
        assert!(animator.cancels.is_empty());
        assert_eq!(frames(&overlay), before);
        assert_eq!(
            overlay.glyphs().iter().map(|g| g.id).collect::<Vec<_>>(),
            ids
        );
    }

    #[test]
    fn test_attach_without_symbols_keeps_row() {
        let mut host = FakeSurface::new(400.0, 300.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::with_symbols(OverlayConfig::default(), &["x", "y"]);
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();
        assert_eq!(overlay.symbols(), vec!["x", "y"]);
        assert_eq!(animator.starts, 2);
    }

    #[test]
    fn test_count_change_rebuilds() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());

        overlay.attach(&mut host, &mut animator, Some(&["A"][..])).unwrap();
        let old_id = overlay.glyphs()[0].id;
        assert_eq!(overlay.glyphs().len(), 1);

        overlay
            .attach(&mut host, &mut animator, Some(&["A", "B"][..]))
            .unwrap();
        assert_eq!(overlay.symbols(), vec!["A", "B"]);
        assert!(overlay.glyphs().iter().all(|g| g.id != old_id));
        assert_eq!(animator.cancels.get(&old_id), Some(&1));
        assert_eq!(animator.scheduled.len(), 2);
        assert!(!animator.scheduled.contains_key(&old_id));
        // "B" is now the middle glyph and "A" chains to its left.
        let glyphs = overlay.glyphs();
        assert_eq!(glyphs[1].frame.center(), overlay.panel().center());
        assert!(glyphs[0].frame.right() < glyphs[1].frame.left());
    }

    #[test]
    fn test_same_count_updates_in_place() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach(&mut host, &mut animator, Some(&["a", "b"][..]))
            .unwrap();
        let ids: Vec<_> = overlay.glyphs().iter().map(|g| g.id).collect();

        overlay
            .attach(&mut host, &mut animator, Some(&["cc", "d"][..]))
            .unwrap();
        assert_eq!(overlay.symbols(), vec!["cc", "d"]);
        assert_eq!(
            overlay.glyphs().iter().map(|g| g.id).collect::<Vec<_>>(),
            ids
        );
        assert!(animator.cancels.is_empty());
        // The wider first glyph still ends `gap` before the middle one.
        let glyphs = overlay.glyphs();
        assert_eq!(glyphs[0].frame.width(), 70.0);
        assert!((glyphs[0].frame.right() + 2.0 - glyphs[1].frame.left()).abs() < 1e-4);
    }

    #[test]
    fn test_emptied_glyph_stops_animating() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach(&mut host, &mut animator, Some(&["a", "b"][..]))
            .unwrap();
        let first = overlay.glyphs()[0].id;

        overlay
            .attach(&mut host, &mut animator, Some(&["", "b"][..]))
            .unwrap();
        assert_eq!(animator.cancels.get(&first), Some(&1));
        assert!(!overlay.glyphs()[0].is_animating());
        assert!(overlay.glyphs()[1].is_animating());
    }

    #[test]
    fn test_empty_sequence_is_inert() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        let empty: [&str; 0] = [];

        overlay
            .attach(&mut host, &mut animator, Some(&empty[..]))
            .unwrap();
        assert!(overlay.glyphs().is_empty());
        assert_eq!(animator.starts, 0);
        assert_eq!(overlay.state(), OverlayState::AttachedIdle);
        assert!(host.contains_child(overlay.id()));
    }

    #[test]
    fn test_detach_cancels_each_animated_glyph_once() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach(&mut host, &mut animator, Some(&[DOT, "", DOT][..]))
            .unwrap();
        let animated: Vec<_> = overlay
            .glyphs()
            .iter()
            .filter(|g| g.is_animating())
            .map(|g| g.id)
            .collect();
        assert_eq!(animated.len(), 2);

        overlay.detach(&mut host, &mut animator).unwrap();
        assert!(!host.contains_child(overlay.id()));
        assert_eq!(overlay.state(), OverlayState::Detached);
        assert!(animator.scheduled.is_empty());
        assert_eq!(animator.cancels.len(), 2);
        for id in animated {
            assert_eq!(animator.cancels[&id], 1);
        }

        // Second detach is a no-op.
        overlay.detach(&mut host, &mut animator).unwrap();
        assert_eq!(animator.cancels.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_missing_layer_skips_only_that_glyph() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach(&mut host, &mut animator, Some(&["a", "", "c"][..]))
            .unwrap();

        let glyphs = overlay.glyphs();
        assert!(glyphs[1].layer.is_none());
        assert!(!glyphs[1].is_animating());
        assert!(glyphs[0].is_animating() && glyphs[2].is_animating());
        assert_eq!(overlay.state(), OverlayState::AttachedAnimating);
    }

    #[test]
    fn test_animator_error_skips_only_that_glyph() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        let mut animator = FakeAnimator {
            reject: Some(overlay.glyphs()[0].id),
            ..Default::default()
        };
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();
        assert_eq!(animator.starts, 2);
        assert!(!overlay.glyphs()[0].is_animating());
    }

    #[test]
    fn test_reattach_after_detach_restarts_wave() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();
        overlay.detach(&mut host, &mut animator).unwrap();
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();
        assert_eq!(host.inserts, 2);
        assert_eq!(animator.starts, 6);
        assert_eq!(animator.scheduled.len(), 3);
    }

    #[test]
    fn test_attach_to_second_surface_is_rejected() {
        let mut first = FakeSurface::new(800.0, 600.0);
        let mut second = FakeSurface::new(200.0, 100.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach::<&str, _, _>(&mut first, &mut animator, None)
            .unwrap();

        let err = overlay
            .attach::<&str, _, _>(&mut second, &mut animator, None)
            .unwrap_err();
        assert!(matches!(err, OverlayError::AttachedElsewhere { .. }));
        assert!(second.children.is_empty());

        let err = overlay.detach(&mut second, &mut animator).unwrap_err();
        assert!(matches!(err, OverlayError::WrongSurface { .. }));
        assert!(first.contains_child(overlay.id()));
    }

    #[test]
    fn test_set_config_restarts_with_new_timing() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();

        let config = OverlayConfig {
            cycle_duration: 1.0,
            wave_offset: 20.0,
            ..Default::default()
        };
        overlay.set_config(config, &mut animator);
        assert_eq!(animator.cancels.len(), 3);
        assert_eq!(animator.starts, 6);
        let last = &animator.scheduled[&overlay.glyphs()[2].id];
        assert!((last.delay - 0.6).abs() < 1e-9);
        assert_eq!(last.amplitude(), 20.0);
    }

    #[test]
    fn test_set_config_while_detached_starts_nothing() {
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay.set_config(
            OverlayConfig {
                panel_width: 300.0,
                ..Default::default()
            },
            &mut animator,
        );
        assert_eq!(overlay.panel().width(), 300.0);
        assert_eq!(animator.starts, 0);
    }

    #[test]
    fn test_sync_bounds_relayouts_without_restarting() {
        let mut host = FakeSurface::new(800.0, 600.0);
        let mut animator = FakeAnimator::default();
        let mut overlay = DotWaveOverlay::new(OverlayConfig::default());
        overlay
            .attach::<&str, _, _>(&mut host, &mut animator, None)
            .unwrap();

        host.bounds = Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 400.0));
        overlay.sync_bounds(&host);
        assert_eq!(overlay.panel().center(), pos2(500.0, 200.0));
        assert_eq!(overlay.glyphs()[1].frame.center(), pos2(500.0, 200.0));
        assert_eq!(animator.starts, 3);
        assert!(animator.cancels.is_empty());
    }
}
