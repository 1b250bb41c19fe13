//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;

use crate::error::AppError;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
///
/// Field order matters: the GL context is dropped before the window, and the window before
/// the SDL handles.
pub struct App {
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    pub gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub sdl: sdl2::Sdl,
}

impl App {
    /// Creates a new [`App`] instance with the specified title, width, and height, backed by
    /// an OpenGL 3.3 core context.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(title: &str, width: u32, height: u32, fullscreen: bool) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::WindowingInit)?;
        let video_subsystem = sdl.video().map_err(AppError::WindowingInit)?;
        video_subsystem
            .gl_load_library_default()
            .map_err(AppError::Loader)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let (width, height) = if fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(AppError::WindowCreation)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (width, height)
        };
        let mut window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| AppError::WindowCreation(e.to_string()))?;
        if fullscreen {
            window
                .set_fullscreen(sdl2::video::FullscreenType::Desktop)
                .map_err(AppError::WindowCreation)?;
        }

        let gl_context = window.gl_create_context().map_err(AppError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(AppError::Context)?;

        if video_subsystem.gl_get_proc_address("glGetString").is_null() {
            return Err(AppError::Loader(
                "glGetString could not be resolved".to_string(),
            ));
        }
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(AppError::WindowingInit)?;
        let gl = Arc::new(gl);

        let (drawable_width, drawable_height) = window.drawable_size();
        unsafe {
            gl.viewport(0, 0, drawable_width as i32, drawable_height as i32);
        }

        Ok(Self {
            gl,
            event_pump,
            gl_context,
            window,
            video_subsystem,
            sdl,
        })
    }

    /// Replaces the window title.
    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.window.set_title(title) {
            log::warn!("Failed to set window title: {e}");
        }
    }
}
