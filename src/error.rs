//! Error types.
//!
//! [`AppError`] covers every way setup of the application can fail. Each variant maps to its
//! own process exit code so a failed run is distinguishable from a clean one.

use std::{fmt, path::PathBuf};

use crate::shader_manager::ShaderError;

/// A failure during application setup or the frame loop.
#[derive(Debug)]
pub enum AppError {
    /// The configuration file exists but could not be read or parsed, or holds invalid values.
    Config(String),
    /// SDL2 or its video subsystem failed to initialize.
    WindowingInit(String),
    /// The window could not be created.
    WindowCreation(String),
    /// The OpenGL context could not be created or made current.
    Context(String),
    /// OpenGL function pointers could not be loaded.
    Loader(String),
    Shader(ShaderError),
    /// Vertex data could not be uploaded.
    Geometry(String),
    /// A texture image could not be decoded.
    TextureDecode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// A decoded texture could not be uploaded.
    TextureUpload(String),
}

impl AppError {
    /// The process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::WindowingInit(_) => 3,
            AppError::WindowCreation(_) => 4,
            AppError::Context(_) => 5,
            AppError::Loader(_) => 6,
            AppError::Shader(_) => 7,
            AppError::Geometry(_) => 8,
            AppError::TextureDecode { .. } | AppError::TextureUpload(_) => 9,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            AppError::WindowingInit(msg) => write!(f, "failed to initialize SDL2: {msg}"),
            AppError::WindowCreation(msg) => write!(f, "failed to create window: {msg}"),
            AppError::Context(msg) => write!(f, "failed to create OpenGL context: {msg}"),
            AppError::Loader(msg) => write!(f, "failed to load OpenGL functions: {msg}"),
            AppError::Shader(err) => write!(f, "failed to build shader program: {err}"),
            AppError::Geometry(msg) => write!(f, "failed to upload geometry: {msg}"),
            AppError::TextureDecode { path, source } => {
                write!(f, "failed to decode texture {}: {source}", path.display())
            }
            AppError::TextureUpload(msg) => write!(f, "failed to upload texture: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Shader(err) => Some(err),
            AppError::TextureDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ShaderError> for AppError {
    fn from(err: ShaderError) -> Self {
        AppError::Shader(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            AppError::Config(String::new()),
            AppError::WindowingInit(String::new()),
            AppError::WindowCreation(String::new()),
            AppError::Context(String::new()),
            AppError::Loader(String::new()),
            AppError::Shader(ShaderError::NotReady),
            AppError::Geometry(String::new()),
            AppError::TextureUpload(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(AppError::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_shader_error_is_chained() {
        let err = AppError::from(ShaderError::Link("undefined symbol".to_string()));
        assert_eq!(err.exit_code(), 7);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("undefined symbol"));
    }
}
