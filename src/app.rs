use crate::config::AppConfig;
use crate::render::{Gl, Renderer};
use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{ffi::CString, num::NonZeroU32, ptr};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

struct App {
    // Dropped first so GL objects go while the context is still alive.
    renderer: Option<Renderer>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offered no GL configs")
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let (window, gl_config) = display_builder
            .build(&event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|err| anyhow!("Failed to create window: {err}"))?;
        let window = window.context("Display builder returned no window")?;

        let version = Version::new(config.window.gl_major, config.window.gl_minor);
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(version)))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .with_context(|| {
                format!(
                    "Failed to create OpenGL {}.{} core context",
                    config.window.gl_major, config.window.gl_minor
                )
            })?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;
        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if config.window.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Failed to set swap interval: {}", err);
        }

        let gl = Gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        })
        .context("OpenGL entry points are missing")?;

        let unknown = || "unknown".to_string();
        info!("OpenGL version: {}", gl.get_string(gl::VERSION).unwrap_or_else(unknown));
        info!("OpenGL renderer: {}", gl.get_string(gl::RENDERER).unwrap_or_else(unknown));

        let renderer = Renderer::new(gl, &config.render)?;
        let size = window.inner_size();
        renderer.resize(size.width, size.height);

        Ok((
            Self {
                renderer: Some(renderer),
                gl_surface,
                gl_context,
                window,
            },
            event_loop,
        ))
    }

    fn handle_event(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => self.shutdown(elwt),
                WindowEvent::Resized(size) => self.resize(size.width, size.height),
                WindowEvent::RedrawRequested => self.redraw()?,
                _ => (),
            },
            Event::AboutToWait => self.window.request_redraw(),
            Event::LoopExiting => self.release(),
            _ => (),
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, w, h);
        if let Some(renderer) = &self.renderer {
            renderer.resize(width, height);
        }
        debug!("Resized to {}x{}", width, height);
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.render_frame()?;
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")?;
        Ok(())
    }

    fn release(&mut self) {
        if self.renderer.take().is_some() {
            info!("Released GL resources");
        }
    }

    fn shutdown(&mut self, elwt: &EventLoopWindowTarget<()>) {
        self.release();
        elwt.exit();
    }
}

/// Opens the window and renders until it is closed or a frame fails.
pub fn run(config: &AppConfig) -> Result<()> {
    let (mut app, event_loop) = App::new(config)?;
    let mut failure = None;

    event_loop.run(|event, elwt| {
        if let Err(err) = app.handle_event(event, elwt) {
            failure = Some(err);
            app.shutdown(elwt);
        }
    })?;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
