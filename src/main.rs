use std::time::Instant;

use anyhow::Result;
use skia_safe::Color;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowId,
};

use dotwave::config::OverlayConfig;
use dotwave::egui_integration::EguiIntegration;
use dotwave::gl_env::GlEnv;
use dotwave::host::HostView;
use dotwave::overlay::DotWaveOverlay;
use dotwave::render::OverlayPainter;
use dotwave::surface::Surface;
use dotwave::timeline::Timeline;
use dotwave::ui::{self, UiAction, UiState};

struct App {
    // Drops before `env`: egui's painter needs the GL context alive.
    egui: EguiIntegration,
    env: GlEnv,
    painter: OverlayPainter,
    config: OverlayConfig,
    overlay: DotWaveOverlay,
    host: HostView,
    timeline: Timeline,
    ui_state: UiState,
    started: Instant,
}

impl App {
    fn tick_clock(&mut self) {
        self.timeline.set_time(self.started.elapsed().as_secs_f64());
    }

    fn show(&mut self, symbols: Option<&[String]>) {
        self.tick_clock();
        if let Err(e) = self.overlay.attach(&mut self.host, &mut self.timeline, symbols) {
            log::warn!("Could not show overlay: {}", e);
        }
        self.env.window.request_redraw();
    }

    fn hide(&mut self) {
        if let Err(e) = self.overlay.detach(&mut self.host, &mut self.timeline) {
            log::warn!("Could not hide overlay: {}", e);
        }
        self.env.window.request_redraw();
    }

    fn toggle(&mut self) {
        if self.overlay.is_attached() {
            self.hide();
        } else {
            self.show(None);
        }
    }

    fn process_actions(&mut self, actions: Vec<UiAction>, event_loop: &ActiveEventLoop) {
        for action in actions {
            match action {
                UiAction::ShowOverlay => self.show(None),
                UiAction::HideOverlay => self.hide(),
                UiAction::SetSymbols(symbols) => {
                    log::info!("Applying {} symbol(s)", symbols.len());
                    if self.config.remember_symbols(&symbols) {
                        self.config.save();
                    }
                    self.show(Some(&symbols));
                }
                UiAction::ConfigChanged => {
                    self.tick_clock();
                    self.painter.set_font_size(self.config.font_size);
                    self.overlay
                        .set_config(self.config.clone(), &mut self.timeline);
                }
                UiAction::Quit => event_loop.exit(),
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let size = self.env.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.tick_clock();

        let ctx = self.egui.begin_frame(&self.env.window).clone();
        let actions = ui::build_ui(
            &ctx,
            &mut self.ui_state,
            &mut self.config,
            &self.overlay,
            &self.timeline,
        );
        self.egui.end_frame(&self.env.window);

        self.host.set_bounds(self.ui_state.content_rect);
        self.overlay.sync_bounds(&self.host);
        self.process_actions(actions, event_loop);

        let pixels_per_point = self.egui.pixels_per_point();
        let canvas = self.env.surface.canvas();
        canvas.clear(Color::from_argb(255, 128, 128, 128));
        canvas.save();
        canvas.scale((pixels_per_point, pixels_per_point));
        self.painter.draw_host_content(canvas, self.host.bounds());
        if self.host.contains_child(self.overlay.id()) {
            self.painter
                .draw_overlay(canvas, &self.overlay, &self.timeline);
        }
        canvas.restore();
        self.env.flush();

        self.egui.paint(&self.env.window);
        if let Err(e) = self.env.present() {
            log::error!("{:#}", e);
        }

        if self.timeline.is_running() {
            self.env.window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let response = self.egui.handle_event(&self.env.window, &event);
        if response.repaint {
            self.env.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                if let Err(e) = self
                    .env
                    .resize(physical_size.width, physical_size.height)
                {
                    log::error!("Failed to resize surface: {:#}", e);
                }
                self.env.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } if !response.consumed => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match &event.logical_key {
                    Key::Named(NamedKey::Space) => self.toggle(),
                    Key::Named(NamedKey::Escape) => event_loop.exit(),
                    Key::Character(c) if c.as_str() == "q" => event_loop.exit(),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: dotwave [SYMBOL...]");
        println!("Space toggles the overlay, Escape or q quits.");
        return Ok(());
    }

    let config = OverlayConfig::load();
    let symbols = if args.is_empty() {
        config.symbols.clone()
    } else {
        args
    };
    log::info!("Starting with symbols {:?}", symbols);

    let el = EventLoop::new()?;
    let env = GlEnv::new(&el, "dotwave", LogicalSize::new(960.0, 640.0))?;
    let egui_layer = EguiIntegration::new(&env.window, &env.gl_context)?;
    let painter = OverlayPainter::new(config.font_size)?;

    let logical = env
        .window
        .inner_size()
        .to_logical::<f32>(env.window.scale_factor());
    let host = HostView::new(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(logical.width, logical.height),
    ));

    let mut app = App {
        egui: egui_layer,
        env,
        painter,
        overlay: DotWaveOverlay::with_symbols(config.clone(), &symbols),
        ui_state: UiState::new(&symbols),
        config,
        host,
        timeline: Timeline::new(),
        started: Instant::now(),
    };
    app.show(None);

    el.run_app(&mut app)?;

    Ok(())
}
