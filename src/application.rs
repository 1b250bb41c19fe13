//! The demo application: window setup, GPU resources and the frame loop.

use std::{path::Path, sync::Arc, time::Instant};

use glow::HasContext;
use image::DynamicImage;
use sdl2::event::{Event, WindowEvent};

use crate::{
    abs::{App, Mesh, Texture},
    config::{Config, TextureConfig, Variant},
    error::AppError,
    fps::{FpsCounter, format_title},
    geometry::{DrawCall, QUAD_INDICES, QUAD_VERTICES, TRIANGLE_VERTICES},
    input::{Controls, KeyBindings},
    shader_manager::ShaderManager,
};

/// Texture units the two textures are bound to, and the sampler uniforms reading them.
const TEXTURE_UNITS: [(u32, &str); 2] = [(0, "texture1"), (1, "texture2")];

pub struct Application {
    config: Config,
    bindings: KeyBindings,
    controls: Controls,
    fps: FpsCounter,
    started: Instant,
}

impl Application {
    pub fn new(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let bindings = KeyBindings::from_names(&config.keys)?;
        let fps = FpsCounter::new(0.0, config.fps_interval);
        Ok(Self {
            config,
            bindings,
            controls: Controls::new(),
            fps,
            started: Instant::now(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.controls.is_running()
    }

    pub fn mix_value(&self) -> f32 {
        self.controls.mix_value()
    }

    /// Sets up the window and GPU resources, then renders until asked to stop.
    ///
    /// Every GPU object is released before this returns, on success and on failure.
    pub fn run(&mut self) -> Result<(), AppError> {
        log::info!("Running application and initializing OpenGL...");
        let window = &self.config.window;
        let mut app = App::new(&window.title, window.width, window.height, window.fullscreen)?;

        log::info!("Creating shader program...");
        let shaders = self.build_shaders(&app.gl)?;
        log::info!("Shader program created successfully!");

        let mesh = self.build_mesh(&app.gl)?;
        let textures = match self.config.variant {
            Variant::TexturedQuad => self.load_textures(&app.gl, &shaders)?,
            Variant::Triangle => Vec::new(),
        };

        self.print_opengl_info(&app.gl);

        let draw_call = DrawCall::for_variant(self.config.variant);
        log::debug!(
            "Drawing {} triangle(s) per frame with {draw_call:?}",
            draw_call.triangles()
        );

        self.fps = FpsCounter::new(self.seconds(), self.config.fps_interval);
        while self.controls.is_running() {
            self.fps_calculate(&mut app);

            for event in app.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::Window {
                        win_event: WindowEvent::Close,
                        ..
                    } => self.controls.stop(),
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = app.window.drawable_size();
                        unsafe {
                            app.gl.viewport(0, 0, width as i32, height as i32);
                        }
                    }
                    _ => {}
                }
            }

            let keyboard = app.event_pump.keyboard_state();
            self.process_input(|code| keyboard.is_scancode_pressed(code));

            let [r, g, b, a] = self.config.clear_color;
            unsafe {
                app.gl.clear_color(r, g, b, a);
                app.gl.clear(glow::COLOR_BUFFER_BIT);
            }

            shaders.use_shader_program()?;
            if self.config.variant == Variant::TexturedQuad {
                shaders.program()?.set_uniform("mixValue", self.controls.mix_value());
            }
            for (texture, (unit, _)) in textures.iter().zip(TEXTURE_UNITS) {
                texture.bind(unit);
            }
            mesh.draw();

            app.window.gl_swap_window();
        }

        log::info!("Frame loop finished, releasing resources");
        Ok(())
    }

    fn seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Samples the frame rate and writes it into the window title when a sample is due.
    fn fps_calculate(&mut self, app: &mut App) {
        if let Some(sample) = self.fps.tick(self.seconds()) {
            app.set_title(&format_title(&self.config.window.title, &sample));
        }
    }

    /// Applies the keyboard state of this frame.
    pub fn process_input(&mut self, is_down: impl Fn(sdl2::keyboard::Scancode) -> bool) {
        self.controls
            .process(&self.bindings, self.config.variant, is_down);
    }

    fn print_opengl_info(&self, gl: &glow::Context) {
        unsafe {
            log::info!("Renderer: {}", gl.get_parameter_string(glow::RENDERER));
            log::info!(
                "OpenGL version supported: {}",
                gl.get_parameter_string(glow::VERSION)
            );
            log::info!(
                "GLSL version: {}",
                gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION)
            );
            log::info!("Vendor: {}", gl.get_parameter_string(glow::VENDOR));
        }
        log::info!("OpenGL initialized successfully!");
    }

    fn build_shaders(&self, gl: &Arc<glow::Context>) -> Result<ShaderManager, AppError> {
        let paths = self.config.shaders();
        let mut shaders = ShaderManager::new(
            self.config.asset_path(&paths.vertex),
            self.config.asset_path(&paths.fragment),
        );
        let result = shaders
            .create_shader_program()
            .and_then(|()| shaders.compile_shaders(gl))
            .and_then(|()| shaders.use_shader_program());
        if let Err(e) = result {
            log::error!("Failed to build shader program: {e}");
            return Err(e.into());
        }
        Ok(shaders)
    }

    fn build_mesh(&self, gl: &Arc<glow::Context>) -> Result<Mesh, AppError> {
        let mesh = match self.config.variant {
            Variant::Triangle => Mesh::new(gl, &TRIANGLE_VERTICES, None, glow::TRIANGLES),
            Variant::TexturedQuad => {
                Mesh::new(gl, &QUAD_VERTICES, Some(&QUAD_INDICES), glow::TRIANGLES)
            }
        };
        let mesh = mesh.map_err(|e| {
            log::error!("Failed to upload geometry: {e}");
            AppError::Geometry(e)
        })?;
        log::debug!(
            "Uploaded {} vertices and {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(mesh)
    }

    /// Loads both textures and points the sampler uniforms at their units.
    ///
    /// If the second texture fails, the first is dropped before returning.
    fn load_textures(
        &self,
        gl: &Arc<glow::Context>,
        shaders: &ShaderManager,
    ) -> Result<Vec<Texture>, AppError> {
        let mut textures = Vec::with_capacity(self.config.textures.len());
        for texture in &self.config.textures {
            textures.push(self.load_texture(gl, texture)?);
        }

        shaders.use_shader_program()?;
        let program = shaders.program()?;
        for (unit, name) in TEXTURE_UNITS {
            program.set_uniform(name, unit as i32);
        }
        Ok(textures)
    }

    fn load_texture(
        &self,
        gl: &Arc<glow::Context>,
        texture: &TextureConfig,
    ) -> Result<Texture, AppError> {
        let path = self.config.asset_path(&texture.path);
        let image = decode_texture(&path)?;
        let texture = Texture::new(gl, &image, &texture.params).map_err(|e| {
            log::error!("Failed to upload texture {}: {e}", path.display());
            AppError::TextureUpload(e)
        })?;
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.width(),
            texture.height()
        );
        Ok(texture)
    }
}

/// Decodes a texture image, flipped so that its first row is the bottom of the texture.
fn decode_texture(path: &Path) -> Result<DynamicImage, AppError> {
    let image = image::open(path).map_err(|source| {
        log::error!("Failed to load texture {}: {source}", path.display());
        AppError::TextureDecode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(image.flipv())
}

#[cfg(test)]
mod tests {
    use sdl2::keyboard::Scancode;

    use super::*;
    use crate::config::KeyBindingNames;

    #[test]
    fn test_new_rejects_bad_bindings() {
        let config = Config {
            keys: KeyBindingNames {
                mix_up: "Nope".to_string(),
                ..KeyBindingNames::default()
            },
            ..Config::default()
        };
        assert!(matches!(Application::new(config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_quit_key_stops_application() {
        let mut app = Application::new(Config::default()).unwrap();
        assert!(app.is_running());
        app.process_input(|code| code == Scancode::Escape);
        assert!(!app.is_running());
    }

    #[test]
    fn test_mix_value_follows_keys() {
        let mut app = Application::new(Config::default()).unwrap();
        app.process_input(|code| code == Scancode::Up);
        assert_eq!(app.mix_value(), 1.0);
        app.process_input(|code| code == Scancode::Down);
        assert_eq!(app.mix_value(), 0.0);
    }

    #[test]
    fn test_shipped_textures_decode() {
        let config = Config {
            asset_root: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
            ..Config::default()
        };
        for texture in &config.textures {
            let image = decode_texture(&config.asset_path(&texture.path)).unwrap();
            assert!(image.width() > 0 && image.height() > 0);
        }
    }

    #[test]
    fn test_undecodable_texture_is_reported() {
        let path = std::env::temp_dir().join(format!("gl-learning-{}-bad.png", std::process::id()));
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = decode_texture(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(err.exit_code(), 9);
        assert!(matches!(err, AppError::TextureDecode { .. }));
    }

    #[test]
    fn test_missing_texture_is_reported() {
        let path = std::env::temp_dir().join("gl-learning-no-such-texture.png");
        assert!(matches!(
            decode_texture(&path),
            Err(AppError::TextureDecode { .. })
        ));
    }

    #[test]
    fn test_textured_shaders_declare_uniforms() {
        let config = Config {
            asset_root: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
            ..Config::default()
        };
        let frag = config.asset_path(&config.textured_shaders.fragment);
        let source =
            ShaderManager::read_source(&frag, crate::abs::ShaderStage::Fragment).unwrap();
        for (_, name) in TEXTURE_UNITS {
            assert!(source.contains(name));
        }
        assert!(source.contains("mixValue"));
    }
}
