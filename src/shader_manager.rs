//! Shader program loading.
//!
//! [`ShaderManager`] reads a vertex and a fragment shader from disk, builds them into a
//! [`ShaderProgram`] and guards its use:
//!
//! ```text
//! Uninitialized --create_shader_program--> Loaded --compile_shaders--> Ready --delete--> Released
//! ```
//!
//! Using the program in any state other than `Ready` is an error rather than a draw with no
//! program bound.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::abs::{Shader, ShaderProgram, ShaderStage};

/// A failure while loading, building or using a shader program.
#[derive(Debug)]
pub enum ShaderError {
    Read {
        path: PathBuf,
        stage: ShaderStage,
        source: std::io::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Compile {
        stage: ShaderStage,
        log: String,
    },
    Link(String),
    /// Sources have not been loaded, or the program has not been built.
    NotReady,
    /// The program was deleted.
    Released,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Read {
                path,
                stage,
                source,
            } => write!(
                f,
                "failed to read {stage} shader {}: {source}",
                path.display()
            ),
            ShaderError::Write { path, source } => {
                write!(f, "failed to write shader {}: {source}", path.display())
            }
            ShaderError::Compile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {}", log.trim_end())
            }
            ShaderError::Link(log) => write!(f, "program failed to link: {}", log.trim_end()),
            ShaderError::NotReady => f.write_str("shader program has not been built"),
            ShaderError::Released => f.write_str("shader program has been deleted"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Read { source, .. } | ShaderError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Source text of both stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

enum State {
    Uninitialized,
    Loaded(ShaderSources),
    Ready(ShaderProgram),
    Released,
}

/// Owns the shader program built from two source files.
pub struct ShaderManager {
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    state: State,
}

impl ShaderManager {
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        Self {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
            state: State::Uninitialized,
        }
    }

    /// Reads a whole shader source file. The content is not checked against `stage`.
    pub fn read_source(path: &Path, stage: ShaderStage) -> Result<String, ShaderError> {
        std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
            path: path.to_path_buf(),
            stage,
            source,
        })
    }

    /// Writes shader source text to `path`, replacing the file.
    pub fn write_source(path: &Path, source: &str) -> Result<(), ShaderError> {
        std::fs::write(path, source).map_err(|e| ShaderError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Reads and caches both shader sources.
    pub fn create_shader_program(&mut self) -> Result<(), ShaderError> {
        if let State::Released = self.state {
            return Err(ShaderError::Released);
        }
        let vertex = Self::read_source(&self.vertex_path, ShaderStage::Vertex)?;
        let fragment = Self::read_source(&self.fragment_path, ShaderStage::Fragment)?;
        log::debug!(
            "Loaded shader sources {} ({} bytes) and {} ({} bytes)",
            self.vertex_path.display(),
            vertex.len(),
            self.fragment_path.display(),
            fragment.len()
        );
        self.state = State::Loaded(ShaderSources { vertex, fragment });
        Ok(())
    }

    /// Compiles both cached sources and links them into a program.
    ///
    /// On failure the cached sources are kept and nothing is left allocated on the GPU.
    pub fn compile_shaders(&mut self, gl: &Arc<glow::Context>) -> Result<(), ShaderError> {
        let sources = match &self.state {
            State::Loaded(sources) => sources,
            State::Ready(_) => return Ok(()),
            State::Uninitialized => return Err(ShaderError::NotReady),
            State::Released => return Err(ShaderError::Released),
        };

        let vert = Shader::new(gl, ShaderStage::Vertex, &sources.vertex).map_err(|log| {
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                log,
            }
        })?;
        let frag = Shader::new(gl, ShaderStage::Fragment, &sources.fragment).map_err(|log| {
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                log,
            }
        })?;
        let program = ShaderProgram::new(gl, &[&vert, &frag]).map_err(ShaderError::Link)?;

        self.state = State::Ready(program);
        Ok(())
    }

    /// Binds the program for subsequent draw calls.
    pub fn use_shader_program(&self) -> Result<(), ShaderError> {
        let program = self.program()?;
        program.use_program();
        Ok(())
    }

    /// Returns the linked program, for uniform access.
    pub fn program(&self) -> Result<&ShaderProgram, ShaderError> {
        match &self.state {
            State::Ready(program) => Ok(program),
            State::Released => Err(ShaderError::Released),
            State::Uninitialized | State::Loaded(_) => Err(ShaderError::NotReady),
        }
    }

    /// Cached source text, once loaded.
    pub fn sources(&self) -> Option<&ShaderSources> {
        match &self.state {
            State::Loaded(sources) => Some(sources),
            _ => None,
        }
    }

    /// Deletes the program. Later use fails with [`ShaderError::Released`].
    pub fn delete_shader_program(&mut self) {
        if let State::Ready(_) = self.state {
            log::debug!("Deleting shader program");
        }
        self.state = State::Released;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gl-learning-{}-{name}", std::process::id()))
    }

    const VERT: &str = "#version 330 core\nvoid main() { gl_Position = vec4(0.0); }\n";
    const FRAG: &str = "#version 330 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";

    #[test]
    fn test_read_missing_file() {
        let path = temp_path("missing.vert");
        let err = ShaderManager::read_source(&path, ShaderStage::Vertex).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Read {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().contains("vertex"));
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("roundtrip.frag");
        ShaderManager::write_source(&path, FRAG).unwrap();
        let text = ShaderManager::read_source(&path, ShaderStage::Fragment).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, FRAG);
    }

    #[test]
    fn test_create_caches_sources() {
        let vert = temp_path("create.vert");
        let frag = temp_path("create.frag");
        ShaderManager::write_source(&vert, VERT).unwrap();
        ShaderManager::write_source(&frag, FRAG).unwrap();

        let mut manager = ShaderManager::new(&vert, &frag);
        assert!(manager.sources().is_none());
        manager.create_shader_program().unwrap();
        std::fs::remove_file(&vert).unwrap();
        std::fs::remove_file(&frag).unwrap();

        let sources = manager.sources().unwrap();
        assert_eq!(sources.vertex, VERT);
        assert_eq!(sources.fragment, FRAG);
        assert!(!manager.is_ready());
    }

    #[test]
    fn test_create_fails_when_fragment_missing() {
        let vert = temp_path("lonely.vert");
        ShaderManager::write_source(&vert, VERT).unwrap();
        let mut manager = ShaderManager::new(&vert, temp_path("absent.frag"));
        let err = manager.create_shader_program().unwrap_err();
        std::fs::remove_file(&vert).unwrap();
        assert!(matches!(
            err,
            ShaderError::Read {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert!(manager.sources().is_none());
    }

    #[test]
    fn test_use_before_build_is_rejected() {
        let manager = ShaderManager::new("a.vert", "a.frag");
        assert!(matches!(
            manager.use_shader_program(),
            Err(ShaderError::NotReady)
        ));
        assert!(matches!(manager.program(), Err(ShaderError::NotReady)));
    }

    #[test]
    fn test_released_manager_rejects_everything() {
        let mut manager = ShaderManager::new(temp_path("r.vert"), temp_path("r.frag"));
        manager.delete_shader_program();
        assert!(matches!(
            manager.use_shader_program(),
            Err(ShaderError::Released)
        ));
        assert!(matches!(
            manager.create_shader_program(),
            Err(ShaderError::Released)
        ));
    }

    #[test]
    fn test_compile_error_message_names_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3(1): error: syntax error\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: 0:3(1): error: syntax error"
        );
    }
}
