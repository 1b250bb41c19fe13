//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture,
//! and [`TextureParams`] describing how it is sampled.

use std::sync::Arc;

use glow::HasContext;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// Texture coordinate wrapping outside of `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

impl WrapMode {
    fn gl_enum(self) -> u32 {
        match self {
            WrapMode::Repeat => glow::REPEAT,
            WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
            WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
            WrapMode::ClampToBorder => glow::CLAMP_TO_BORDER,
        }
    }
}

/// Texel filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Sampler parameters applied to a texture at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    pub wrap: WrapMode,
    pub filter: FilterMode,
}

impl TextureParams {
    /// Minification filter. Always samples the mipmap chain.
    pub fn min_filter(&self) -> u32 {
        match self.filter {
            FilterMode::Nearest => glow::NEAREST_MIPMAP_NEAREST,
            FilterMode::Linear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }

    /// Magnification filter.
    pub fn mag_filter(&self) -> u32 {
        match self.filter {
            FilterMode::Nearest => glow::NEAREST,
            FilterMode::Linear => glow::LINEAR,
        }
    }

    pub fn wrap(&self) -> u32 {
        self.wrap.gl_enum()
    }
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Repeat,
            filter: FilterMode::Linear,
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`] and generates its mipmaps.
    pub fn new(
        gl: &Arc<glow::Context>,
        image: &DynamicImage,
        params: &TextureParams,
    ) -> Result<Self, String> {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, params.wrap() as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, params.wrap() as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                params.min_filter() as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                params.mag_filter() as i32,
            );
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data.as_slice())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
