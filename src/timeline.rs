use std::collections::HashMap;

use crate::animator::{check_timing, AnimateError, Animator, GlyphId};
use crate::wave::WaveAnimation;

struct Scheduled {
    wave: WaveAnimation,
    scheduled_at: f64,
}

/// Frame-clock animator. The host advances the clock once per frame and the
/// renderer reads each glyph's offset back.
#[derive(Default)]
pub struct Timeline {
    now: f64,
    waves: HashMap<GlyphId, Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `now` seconds. Time never runs backwards.
    pub fn set_time(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Current offset of `glyph` from its resting position.
    pub fn offset(&self, glyph: GlyphId) -> f32 {
        self.waves
            .get(&glyph)
            .map(|s| s.wave.value_at(self.now - s.scheduled_at))
            .unwrap_or(0.0)
    }

    pub fn is_running(&self) -> bool {
        !self.waves.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.waves.len()
    }
}

impl Animator for Timeline {
    fn start(&mut self, target: GlyphId, wave: &WaveAnimation) -> Result<(), AnimateError> {
        check_timing(target, wave)?;
        self.waves.insert(
            target,
            Scheduled {
                wave: wave.clone(),
                scheduled_at: self.now,
            },
        );
        Ok(())
    }

    fn cancel_all(&mut self, target: GlyphId) {
        self.waves.remove(&target);
    }
}
