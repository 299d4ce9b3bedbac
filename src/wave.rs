use crate::config::OverlayConfig;

/// Timing curve applied within each leg of a wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` (0.0–1.0) onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    Count(u32),
    Forever,
}

/// A repeating, delayed, eased interpolation of a glyph's vertical offset.
///
/// Values are offsets from the glyph's resting position, so a re-layout moves
/// the bob along with the glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveAnimation {
    pub from: f32,
    pub to: f32,
    /// Seconds per leg.
    pub duration: f64,
    /// Seconds between scheduling and the first frame.
    pub delay: f64,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Play each cycle forward then backward.
    pub autoreverses: bool,
}

impl WaveAnimation {
    /// The bob for the glyph at `index`: up by `wave_offset` and back, forever,
    /// starting `cycle_duration * stagger_factor * index` after the first glyph.
    pub fn for_glyph(index: usize, config: &OverlayConfig) -> Self {
        Self {
            from: 0.0,
            to: -config.wave_offset,
            duration: config.cycle_duration,
            delay: stagger(index, config),
            easing: Easing::EaseInOut,
            repeat: Repeat::Forever,
            autoreverses: true,
        }
    }

    /// Peak displacement from the resting position.
    pub fn amplitude(&self) -> f32 {
        (self.to - self.from).abs()
    }

    /// Length of one cycle, including the reverse leg.
    pub fn cycle_length(&self) -> f64 {
        if self.autoreverses {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    /// Offset `elapsed` seconds after the animation was scheduled.
    pub fn value_at(&self, elapsed: f64) -> f32 {
        let local = elapsed - self.delay;
        if local <= 0.0 || self.duration <= 0.0 {
            return self.from;
        }

        let cycle = self.cycle_length();
        if let Repeat::Count(n) = self.repeat {
            if local >= cycle * n as f64 {
                // Finished: hold the value of the last frame.
                return if self.autoreverses || n == 0 {
                    self.from
                } else {
                    self.to
                };
            }
        }

        let in_cycle = local % cycle;
        let progress = if in_cycle < self.duration {
            in_cycle / self.duration
        } else {
            1.0 - (in_cycle - self.duration) / self.duration
        };
        let eased = self.easing.apply(progress) as f32;
        self.from + (self.to - self.from) * eased
    }
}

/// Start delay for the glyph at `index`.
pub fn stagger(index: usize, config: &OverlayConfig) -> f64 {
    config.cycle_duration * config.stagger_factor * index as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!(approx(Easing::EaseInOut.apply(0.5), 0.5));
        assert!(Easing::EaseInOut.apply(0.1) < 0.1);
        assert!(Easing::EaseInOut.apply(0.9) > 0.9);
    }

    #[test]
    fn test_three_dot_parameters() {
        let config = OverlayConfig::default();
        let delays: Vec<f64> = (0..3)
            .map(|i| WaveAnimation::for_glyph(i, &config).delay)
            .collect();
        assert!(approx(delays[0], 0.0));
        assert!(approx(delays[1], 0.18));
        assert!(approx(delays[2], 0.36));

        let wave = WaveAnimation::for_glyph(2, &config);
        assert_eq!(wave.amplitude(), 14.0);
        assert_eq!(wave.duration, 0.6);
        assert!(wave.autoreverses);
        assert_eq!(wave.repeat, Repeat::Forever);
        assert_eq!(wave.easing, Easing::EaseInOut);
    }

    #[test]
    fn test_value_rests_during_delay() {
        let config = OverlayConfig::default();
        let wave = WaveAnimation::for_glyph(2, &config);
        assert_eq!(wave.value_at(0.0), 0.0);
        assert_eq!(wave.value_at(0.3), 0.0);
    }

    #[test]
    fn test_value_peaks_and_returns() {
        let config = OverlayConfig::default();
        let wave = WaveAnimation::for_glyph(0, &config);
        assert!((wave.value_at(0.3) - -7.0).abs() < 1e-4);
        assert!((wave.value_at(0.6) - -14.0).abs() < 1e-4);
        assert!((wave.value_at(0.9) - -7.0).abs() < 1e-4);
        assert!(wave.value_at(1.2).abs() < 1e-4);
        // Repeats forever.
        assert!((wave.value_at(120.6) - -14.0).abs() < 1e-3);
    }

    #[test]
    fn test_finite_repeat_holds_final_value() {
        let wave = WaveAnimation {
            from: 0.0,
            to: 10.0,
            duration: 1.0,
            delay: 0.0,
            easing: Easing::Linear,
            repeat: Repeat::Count(2),
            autoreverses: false,
        };
        assert!((wave.value_at(1.5) - 5.0).abs() < 1e-4);
        assert_eq!(wave.value_at(5.0), 10.0);
    }
}
