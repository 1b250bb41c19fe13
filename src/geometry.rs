//! Fixed geometry drawn by each variant, and the vertex layouts describing it.

use std::mem::{offset_of, size_of};

use glam::{Vec2, Vec3};

use crate::{abs::Vertex, config::Variant};

/// Position and color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

/// Position, color and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexturedVertex {
    pub position: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

/// Enables a float attribute at `location`.
fn float_attrib(gl: &glow::Context, location: u32, components: i32, stride: usize, offset: usize) {
    use glow::HasContext;

    unsafe {
        gl.vertex_attrib_pointer_f32(
            location,
            components,
            glow::FLOAT,
            false,
            stride as i32,
            offset as i32,
        );
        gl.enable_vertex_attrib_array(location);
    }
}

impl Vertex for ColorVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 3, stride, offset_of!(Self, position));
        float_attrib(gl, 1, 3, stride, offset_of!(Self, color));
    }
}

impl Vertex for TexturedVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 3, stride, offset_of!(Self, position));
        float_attrib(gl, 1, 3, stride, offset_of!(Self, color));
        float_attrib(gl, 2, 2, stride, offset_of!(Self, uv));
    }
}

pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex {
        position: Vec3::new(-0.5, -0.5, 0.0),
        color: Vec3::new(1.0, 0.0, 0.0),
    },
    ColorVertex {
        position: Vec3::new(0.5, -0.5, 0.0),
        color: Vec3::new(0.0, 1.0, 0.0),
    },
    ColorVertex {
        position: Vec3::new(0.0, 0.5, 0.0),
        color: Vec3::new(0.0, 0.0, 1.0),
    },
];

pub const QUAD_VERTICES: [TexturedVertex; 4] = [
    // top right
    TexturedVertex {
        position: Vec3::new(0.5, 0.5, 0.0),
        color: Vec3::new(1.0, 0.0, 0.0),
        uv: Vec2::new(1.0, 1.0),
    },
    // bottom right
    TexturedVertex {
        position: Vec3::new(0.5, -0.5, 0.0),
        color: Vec3::new(0.0, 1.0, 0.0),
        uv: Vec2::new(1.0, 0.0),
    },
    // bottom left
    TexturedVertex {
        position: Vec3::new(-0.5, -0.5, 0.0),
        color: Vec3::new(0.0, 0.0, 1.0),
        uv: Vec2::new(0.0, 0.0),
    },
    // top left
    TexturedVertex {
        position: Vec3::new(-0.5, 0.5, 0.0),
        color: Vec3::new(1.0, 1.0, 0.0),
        uv: Vec2::new(0.0, 1.0),
    },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// The draw call issued each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Arrays { count: usize },
    Elements { count: usize },
}

impl DrawCall {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Triangle => DrawCall::Arrays {
                count: TRIANGLE_VERTICES.len(),
            },
            Variant::TexturedQuad => DrawCall::Elements {
                count: QUAD_INDICES.len(),
            },
        }
    }

    /// Triangles emitted in `GL_TRIANGLES` mode.
    pub fn triangles(&self) -> usize {
        match *self {
            DrawCall::Arrays { count } | DrawCall::Elements { count } => count / 3,
        }
    }
}
