use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

/// Sprite vertex: position in logical pixels, texture coordinate in `0..1`.
///
/// Layout (16 bytes):
///
///  offset 0  position   [f32; 2]   loc 0
///  offset 8  tex_coord  [f32; 2]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // tex_coord
    ];

    #[inline]
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coord: [u, v],
        }
    }

    /// Returns a copy moved by `offset`. Texture coordinates are untouched.
    #[inline]
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            position: [self.position[0] + offset.x, self.position[1] + offset.y],
            tex_coord: self.tex_coord,
        }
    }

    #[inline]
    pub fn pos(self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Debug line endpoint (position only).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct LinePoint {
    pub position: [f32; 2],
}

impl LinePoint {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub fn new(p: Vec2) -> Self {
        Self { position: [p.x, p.y] }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LinePoint>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad spanning `(0,0)..(w,h)` with full texture coverage.
///
/// Winding and index order match the two-triangle layout used by the sprite
/// shader: `0-1-2`, `0-2-3`.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[inline]
pub fn quad_vertices(w: f32, h: f32) -> [Vertex; 4] {
    [
        Vertex::new(0.0, 0.0, 0.0, 0.0),
        Vertex::new(w, 0.0, 1.0, 0.0),
        Vertex::new(w, h, 1.0, 1.0),
        Vertex::new(0.0, h, 0.0, 1.0),
    ]
}
