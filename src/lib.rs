pub mod animator;
pub mod config;
pub mod egui_integration;
pub mod gl_env;
pub mod host;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod surface;
pub mod timeline;
pub mod ui;
pub mod wave;

pub use animator::{AnimateError, Animator, GlyphId};
pub use config::OverlayConfig;
pub use overlay::{DotWaveOverlay, OverlayError, OverlayState};
pub use surface::{OverlayId, Surface, SurfaceId};
pub use timeline::Timeline;
pub use wave::WaveAnimation;
