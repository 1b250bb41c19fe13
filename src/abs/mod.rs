//! Thin owners of the SDL2 window and OpenGL objects: application setup, shader management,
//! mesh handling and textures. Each wrapper releases its GPU object when dropped.

pub mod app;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
