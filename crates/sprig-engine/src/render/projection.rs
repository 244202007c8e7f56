use glam::{Mat4, Vec4};

use super::error::{RenderError, Result};
use super::RenderCtx;

/// Orthographic projection for a logical viewport.
///
/// Maps `(0, 0)` to the top-left corner and `(width, height)` to the
/// bottom-right corner of the screen (+Y down), depth `-1..1`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Projection {
    size: Option<(u32, u32)>,
    matrix: Mat4,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the matrix for a `width` x `height` viewport.
    ///
    /// Returns `true` when the matrix changed.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<bool> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport { width, height });
        }
        if self.size == Some((width, height)) {
            return Ok(false);
        }

        self.matrix = Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        self.size = Some((width, height));
        Ok(true)
    }

    /// Current matrix, or `ProjectionUnset` before the first `set_viewport`.
    pub fn matrix(&self) -> Result<Mat4> {
        match self.size {
            Some(_) => Ok(self.matrix),
            None => Err(RenderError::ProjectionUnset),
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.size.is_some()
    }

    #[inline]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Projects a logical-pixel point to normalized device coordinates.
    pub fn to_ndc(&self, x: f32, y: f32) -> Result<(f32, f32)> {
        let p = self.matrix()? * Vec4::new(x, y, 0.0, 1.0);
        Ok((p.x, p.y))
    }
}

/// GPU copy of the projection, bound at group 0 by every sprig pipeline.
pub(crate) struct ProjectionUniform {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ProjectionUniform {
    const SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(Self::SIZE),
                },
                count: None,
            }],
        });

        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprig projection ubo"),
            size: Self::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig projection bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }

    pub fn upload(&self, queue: &wgpu::Queue, matrix: Mat4) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&matrix.to_cols_array()));
    }

    #[inline]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
