//! Runtime configuration.
//!
//! Everything the renderer reads from the outside world is described by [`Config`]: window
//! parameters, asset locations, key bindings and logging. All sections have defaults, so a
//! missing file yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    abs::{FilterMode, TextureParams, WrapMode},
    error::AppError,
};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "GL_LEARNING_CONFIG";
/// File name searched for in the working directory and the user config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Which tutorial iteration is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// A single vertex-colored triangle.
    Triangle,
    /// An indexed quad blending two textures.
    #[default]
    TexturedQuad,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "OpenGL Learning".to_string(),
            fullscreen: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub params: TextureParams,
}

/// Key bindings as SDL scancode names, e.g. `"Escape"` or `"Up"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingNames {
    pub quit: String,
    pub mix_up: String,
    pub mix_down: String,
}

impl Default for KeyBindingNames {
    fn default() -> Self {
        Self {
            quit: "Escape".to_string(),
            mix_up: "Up".to_string(),
            mix_down: "Down".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub variant: Variant,
    /// Relative asset paths are resolved against this directory.
    pub asset_root: PathBuf,
    /// Shader sources per variant.
    pub triangle_shaders: ShaderPaths,
    pub textured_shaders: ShaderPaths,
    /// Bound to texture units 0 and 1.
    pub textures: [TextureConfig; 2],
    pub keys: KeyBindingNames,
    pub clear_color: [f32; 4],
    /// Seconds between FPS samples.
    pub fps_interval: f64,
    /// `log` level filter name. `RUST_LOG` takes precedence.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            variant: Variant::default(),
            asset_root: PathBuf::from("assets"),
            triangle_shaders: ShaderPaths {
                vertex: PathBuf::from("shaders/triangle/vert.glsl"),
                fragment: PathBuf::from("shaders/triangle/frag.glsl"),
            },
            textured_shaders: ShaderPaths {
                vertex: PathBuf::from("shaders/textured/vert.glsl"),
                fragment: PathBuf::from("shaders/textured/frag.glsl"),
            },
            textures: [
                TextureConfig {
                    path: PathBuf::from("textures/container.png"),
                    params: TextureParams {
                        wrap: WrapMode::Repeat,
                        filter: FilterMode::Linear,
                    },
                },
                TextureConfig {
                    path: PathBuf::from("textures/face.png"),
                    params: TextureParams {
                        wrap: WrapMode::MirroredRepeat,
                        filter: FilterMode::Nearest,
                    },
                },
            ],
            keys: KeyBindingNames::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            fps_interval: 0.25,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON text and validates it.
    pub fn from_json(s: &str) -> Result<Self, AppError> {
        let config: Config = serde_json::from_str(s).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Loads the configuration from the first location that exists:
    /// `$GL_LEARNING_CONFIG`, `./config.json`, then `<config dir>/gl-learning/config.json`.
    /// Falls back to [`Config::default`].
    ///
    /// Also returns the file the configuration came from, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), AppError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::from_file(&path)?, Some(path)));
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(dirs::config_dir().map(|dir| dir.join("gl-learning").join(CONFIG_FILE)));
        for path in candidates {
            if path.is_file() {
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(AppError::Config(format!(
                "window size must be nonzero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(self.fps_interval.is_finite() && self.fps_interval > 0.0) {
            return Err(AppError::Config(format!(
                "fps_interval must be a positive number of seconds, got {}",
                self.fps_interval
            )));
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(AppError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Resolves an asset path against the asset root. Absolute paths are returned unchanged.
    pub fn asset_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }

    /// Shader sources for the configured variant.
    pub fn shaders(&self) -> &ShaderPaths {
        match self.variant {
            Variant::Triangle => &self.triangle_shaders,
            Variant::TexturedQuad => &self.textured_shaders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "OpenGL Learning");
        assert_eq!(config.fps_interval, 0.25);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            r#"{
                "window": { "title": "Quad" },
                "variant": "triangle",
                "asset_root": "/opt/demo",
                "keys": { "quit": "Q" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Quad");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.variant, Variant::Triangle);
        assert_eq!(config.keys.quit, "Q");
        assert_eq!(config.keys.mix_up, "Up");
        assert_eq!(config.shaders(), &config.triangle_shaders);
        assert_eq!(
            config.asset_path(Path::new("shaders/triangle/vert.glsl")),
            PathBuf::from("/opt/demo/shaders/triangle/vert.glsl")
        );
    }

    #[test]
    fn test_texture_params_flattened() {
        let config = Config::from_json(
            r#"{
                "textures": [
                    { "path": "a.png", "wrap": "clamp_to_edge", "filter": "nearest" },
                    { "path": "b.png", "wrap": "repeat", "filter": "linear" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.textures[0].path, PathBuf::from("a.png"));
        assert_eq!(config.textures[0].params.wrap, WrapMode::ClampToEdge);
        assert_eq!(config.textures[1].params.filter, FilterMode::Linear);
    }

    #[test]
    fn test_absolute_asset_path_kept() {
        let config = Config::default();
        let absolute = std::env::temp_dir().join("tex.png");
        assert_eq!(config.asset_path(&absolute), absolute);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "window": { "width": 0 } }"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "fps_interval": 0.0 }"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "log_level": "loud" }"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("gl-learning-missing-config.json");
        let err = Config::from_file(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::from_json(include_str!("../config.example.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
