use anyhow::Result;
use egui_winit::EventResponse;
use glutin::display::{GetGlDisplay, GlDisplay};
use std::sync::Arc;

/// egui drawn with glow into the same GL context skia renders to, so the
/// control panel composites on top of the host content.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    winit_state: egui_winit::State,
    painter: egui_glow::Painter,
    shapes: Vec<egui::epaint::ClippedShape>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl EguiIntegration {
    /// Set up the glow painter and winit input state.
    ///
    /// The GL context must be current and the `gl` loader initialized.
    pub fn new(
        window: &winit::window::Window,
        gl_context: &glutin::context::PossiblyCurrentContext,
    ) -> Result<Self> {
        let display = gl_context.display();
        let glow_context = unsafe {
            glow::Context::from_loader_function(|s| {
                let s = std::ffi::CString::new(s)
                    .expect("GL function names never contain NUL");
                display.get_proc_address(s.as_c_str()).cast()
            })
        };

        let painter = egui_glow::Painter::new(Arc::new(glow_context), "", None, false)?;
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );

        Ok(Self {
            ctx,
            winit_state,
            painter,
            shapes: Default::default(),
            textures_delta: Default::default(),
            pixels_per_point: window.scale_factor() as f32,
        })
    }

    /// Feed a window event to egui.
    ///
    /// When the response is `consumed`, the app should not act on the event
    /// (keys typed into the symbols field must not toggle the overlay).
    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> EventResponse {
        self.winit_state.on_window_event(window, event)
    }

    /// Start a pass and hand out the context for building panels.
    ///
    /// Frame order is `begin_frame`, UI code, `end_frame`, skia drawing and
    /// flush, then `paint`.
    pub fn begin_frame(&mut self, window: &winit::window::Window) -> &egui::Context {
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        &self.ctx
    }

    /// Finish the pass and keep its shapes for `paint()`.
    ///
    /// Must run before `paint()` and before reading `pixels_per_point()` for
    /// the frame.
    pub fn end_frame(&mut self, window: &winit::window::Window) {
        // end_pass() resets the input state, so read the scale first.
        self.pixels_per_point = self.ctx.input(|i| i.pixels_per_point);

        let output = self.ctx.end_pass();
        self.winit_state
            .handle_platform_output(window, output.platform_output);
        self.shapes = output.shapes;
        self.textures_delta = output.textures_delta;
    }

    /// Paint the frame over whatever is already in the framebuffer.
    ///
    /// Call after `end_frame()` and after skia has flushed, or the panels end
    /// up underneath the host content.
    pub fn paint(&mut self, window: &winit::window::Window) {
        let shapes = std::mem::take(&mut self.shapes);
        let textures_delta = std::mem::take(&mut self.textures_delta);
        let meshes = self.ctx.tessellate(shapes, self.pixels_per_point);

        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            self.pixels_per_point,
            &meshes,
            &textures_delta,
        );
    }

    /// Scale captured at the end of the last frame.
    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }
}

impl Drop for EguiIntegration {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}
