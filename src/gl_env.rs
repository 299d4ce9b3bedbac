use std::ffi::CString;
use std::num::NonZeroU32;

use anyhow::{anyhow, Context, Result};
use gl::types::GLint;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    prelude::{GlSurface, NotCurrentGlContext},
    surface::{Surface as GlutinSurface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use skia_safe::{
    gpu::{self, backend_render_targets, gl::FramebufferInfo, SurfaceOrigin},
    ColorType, Surface,
};
use winit::{dpi::LogicalSize, event_loop::EventLoop, window::Window};

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

/// Window, GL context and skia GPU surface.
///
/// Field order matters: the DirectContext must drop before the Window
/// (AMD drivers segfault otherwise).
pub struct GlEnv {
    pub surface: Surface,
    pub gl_surface: GlutinSurface<WindowSurface>,
    pub gr_context: gpu::DirectContext,
    pub gl_context: PossiblyCurrentContext,
    pub window: Window,
    fb_info: FramebufferInfo,
    num_samples: usize,
    stencil_size: usize,
}

impl Drop for GlEnv {
    fn drop(&mut self) {
        self.gr_context.release_resources_and_abandon();
    }
}

impl GlEnv {
    pub fn new(el: &EventLoop<()>, title: &str, size: LogicalSize<f64>) -> Result<Self> {
        let window_attributes = Window::default_attributes()
            .with_inner_size(size)
            .with_resizable(true)
            .with_title(title);

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(true);

        let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));
        let (window, gl_config) = display_builder
            .build(el, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        let transparency_check = config.supports_transparency().unwrap_or(false)
                            & !accum.supports_transparency().unwrap_or(false);
                        if transparency_check || config.num_samples() < accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("failed to build GL display: {e}"))?;
        let window = window.context("could not create window with OpenGL context")?;
        let raw_window_handle = window
            .window_handle()
            .context("failed to retrieve window handle")?
            .as_raw();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let gles_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_window_handle));

        let display = gl_config.display();
        let not_current = unsafe {
            match display.create_context(&gl_config, &context_attributes) {
                Ok(context) => context,
                Err(e) => {
                    log::info!("Desktop GL context unavailable ({}), trying GLES", e);
                    display
                        .create_context(&gl_config, &gles_attributes)
                        .context("failed to create GL context")?
                }
            }
        };

        let (width, height): (u32, u32) = window.inner_size().into();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            non_zero(width),
            non_zero(height),
        );
        let gl_surface = unsafe {
            display
                .create_window_surface(&gl_config, &attrs)
                .context("could not create GL window surface")?
        };
        let gl_context = not_current
            .make_current(&gl_surface)
            .context("could not make GL context current")?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => display.get_proc_address(name.as_c_str()),
            Err(_) => std::ptr::null(),
        });
        let interface = gpu::gl::Interface::new_load_with(|name| {
            if name == "eglGetCurrentDisplay" {
                return std::ptr::null();
            }
            match CString::new(name) {
                Ok(name) => display.get_proc_address(name.as_c_str()),
                Err(_) => std::ptr::null(),
            }
        })
        .context("could not create skia GL interface")?;

        let mut gr_context = gpu::direct_contexts::make_gl(interface, None)
            .context("could not create skia direct context")?;

        let fb_info = {
            let mut fboid: GLint = 0;
            unsafe { gl::GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut fboid) };
            FramebufferInfo {
                fboid: fboid.try_into()?,
                format: gpu::gl::Format::RGBA8.into(),
                ..Default::default()
            }
        };

        let num_samples = gl_config.num_samples() as usize;
        let stencil_size = gl_config.stencil_size() as usize;
        let surface = create_surface(&window, fb_info, &mut gr_context, num_samples, stencil_size)?;

        log::info!(
            "GL environment ready: {}x{} px, {} sample(s)",
            width,
            height,
            num_samples
        );

        Ok(Self {
            surface,
            gl_surface,
            gr_context,
            gl_context,
            window,
            fb_info,
            num_samples,
            stencil_size,
        })
    }

    /// Recreate the skia surface and resize the GL surface after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface = create_surface(
            &self.window,
            self.fb_info,
            &mut self.gr_context,
            self.num_samples,
            self.stencil_size,
        )?;
        self.gl_surface
            .resize(&self.gl_context, non_zero(width), non_zero(height));
        Ok(())
    }

    /// Flush skia's work. Call before painting egui on top.
    pub fn flush(&mut self) {
        self.gr_context.flush_and_submit();
    }

    pub fn present(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("failed to swap buffers")
    }
}

fn create_surface(
    window: &Window,
    fb_info: FramebufferInfo,
    gr_context: &mut gpu::DirectContext,
    num_samples: usize,
    stencil_size: usize,
) -> Result<Surface> {
    let size = window.inner_size();
    let size = (
        i32::try_from(size.width.max(1))?,
        i32::try_from(size.height.max(1))?,
    );
    let backend_render_target =
        backend_render_targets::make_gl(size, num_samples, stencil_size, fb_info);

    gpu::surfaces::wrap_backend_render_target(
        gr_context,
        &backend_render_target,
        SurfaceOrigin::BottomLeft,
        ColorType::RGBA8888,
        None,
        None,
    )
    .context("could not create skia surface")
}
