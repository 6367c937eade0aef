use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{
    ffi::{CStr, CString},
    num::NonZeroU32,
    ptr,
    time::Instant,
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use crate::config::AppConfig;
use crate::render::FullscreenQuad;
use crate::shader::{GlBackend, ShaderProgram, SourceLoader};

/// Seconds since startup, read by the fragment shader.
pub const TIME_UNIFORM: &str = "u_Time";

pub struct App {
    // GL objects go before the context so they are dropped while it is alive.
    quad: FullscreenQuad,
    program: ShaderProgram<GlBackend>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    start: Instant,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to create display: {}", e))?;

        let window = window.context("Window was not created")?;
        let raw_window_handle = window.raw_window_handle();

        let (major, minor) = config.gl.version();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .with_context(|| format!("Failed to create OpenGL {}.{} context", major, minor))?;

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
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Failed to set swap interval: {}", e);
        }

        let backend = GlBackend::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });
        info!("OpenGL context: {}", gl_string(gl::VERSION));

        let quad = FullscreenQuad::new();
        let loader = SourceLoader::with_line_limit(config.shaders.line_limit());
        let program = ShaderProgram::build(
            backend,
            &loader,
            &config.shaders.vertex,
            &config.shaders.fragment,
            config.shaders.build_options(),
        )
        .context("Failed to build scene shader program")?;

        Ok((
            Self {
                quad,
                program,
                gl_surface,
                gl_context,
                window,
                start: Instant::now(),
            },
            event_loop,
        ))
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<()> {
        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => self.resize(size),
                WindowEvent::RedrawRequested => {
                    if let Err(e) = self.render() {
                        error!("Render failed: {:#}", e);
                        elwt.exit();
                    }
                }
                _ => (),
            },
            Event::AboutToWait => self.window.request_redraw(),
            _ => (),
        })?;

        info!("Event loop finished");
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    fn render(&mut self) -> Result<()> {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        let time = self.start.elapsed().as_secs_f32();
        self.program.set_uniform_1f(TIME_UNIFORM, time);
        self.quad.draw();

        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")?;
        Ok(())
    }
}

fn gl_string(name: gl::types::GLenum) -> String {
    let raw = unsafe { gl::GetString(name) };
    if raw.is_null() {
        return String::from("<unknown>");
    }
    unsafe { CStr::from_ptr(raw as *const _) }
        .to_string_lossy()
        .into_owned()
}
