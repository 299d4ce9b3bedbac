use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::wave::WaveAnimation;

static NEXT_GLYPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one rendered glyph. Rebuilt glyphs get fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(u64);

impl GlyphId {
    pub fn next() -> Self {
        Self(NEXT_GLYPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnimateError {
    #[error("glyph {target:?}: animation timing is invalid (duration {duration}s, delay {delay}s)")]
    InvalidTiming {
        target: GlyphId,
        duration: f64,
        delay: f64,
    },
}

/// The compositor side of the overlay: schedules waves and tears them down.
///
/// Implementors own frame timing. `start` begins the wave at "now + delay".
pub trait Animator {
    fn start(&mut self, target: GlyphId, wave: &WaveAnimation) -> Result<(), AnimateError>;

    /// Drop every animation scheduled on `target`.
    fn cancel_all(&mut self, target: GlyphId);
}

/// Shared timing check for animators.
pub fn check_timing(target: GlyphId, wave: &WaveAnimation) -> Result<(), AnimateError> {
    let valid = wave.duration.is_finite()
        && wave.duration > 0.0
        && wave.delay.is_finite()
        && wave.delay >= 0.0;
    if valid {
        Ok(())
    } else {
        Err(AnimateError::InvalidTiming {
            target,
            duration: wave.duration,
            delay: wave.delay,
        })
    }
}
