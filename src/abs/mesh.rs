//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing static mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use std::sync::Arc;

use glow::HasContext;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// Represents a mesh stored on the GPU side.
///
/// A mesh without an index buffer is drawn with `glDrawArrays`, otherwise with
/// `glDrawElements`.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    vertex_count: usize,
    index_count: usize,
}

fn as_bytes<T>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data)) }
}

impl Mesh {
    /// Uploads the given vertex and index data. Pass `None` for non-indexed geometry.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: Option<&[u32]>,
        draw_mode: u32,
    ) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(e);
                }
            };
            let ebo = match indices {
                Some(_) => match gl.create_buffer() {
                    Ok(ebo) => Some(ebo),
                    Err(e) => {
                        gl.delete_buffer(vbo);
                        gl.delete_vertex_array(vao);
                        return Err(e);
                    }
                },
                None => None,
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, as_bytes(vertices), glow::STATIC_DRAW);

            if let (Some(ebo), Some(indices)) = (ebo, indices) {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    as_bytes(indices),
                    glow::STATIC_DRAW,
                );
            }

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                ebo,
                vertex_count: vertices.len(),
                index_count: indices.map_or(0, <[u32]>::len),
            })
        }
    }

    /// Draws the mesh with the currently bound program.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            if self.ebo.is_some() {
                self.gl
                    .draw_elements(self.draw_mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            } else {
                self.gl
                    .draw_arrays(self.draw_mode, 0, self.vertex_count as i32);
            }
            self.gl.bind_vertex_array(None);
        }
    }

    /// Returns the number of vertices uploaded.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the number of indices, 0 when not indexed.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                self.gl.delete_buffer(ebo);
            }
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
