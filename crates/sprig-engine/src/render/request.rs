use crate::coords::Vec2;

use super::config::BatchLimits;
use super::error::{BufferKind, RenderError, Result};
use super::geometry::check_indices;
use super::texture::TextureId;
use super::vertex::Vertex;

/// One caller-submitted unit of geometry for the current frame.
///
/// Borrows its vertex and index data; nothing is copied until the batch is built.
#[derive(Debug, Copy, Clone)]
pub struct DrawRequest<'a> {
    pub vertices: &'a [Vertex],
    /// Indices local to `vertices`.
    pub indices: &'a [u32],
    /// World-space translation added to every vertex position.
    pub offset: Option<Vec2>,
    pub texture: TextureId,
}

impl<'a> DrawRequest<'a> {
    #[inline]
    pub fn new(vertices: &'a [Vertex], indices: &'a [u32], texture: TextureId) -> Self {
        Self {
            vertices,
            indices,
            offset: None,
            texture,
        }
    }

    #[inline]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Rejects requests whose indices do not form whole triangles over `vertices`.
    pub fn validate(&self) -> Result<()> {
        check_indices(self.vertices.len(), self.indices)
    }
}

/// Anything the sprite renderer can draw.
pub trait Drawable {
    fn vertices(&self) -> &[Vertex];
    fn indices(&self) -> &[u32];
    fn texture(&self) -> TextureId;

    fn offset(&self) -> Option<Vec2> {
        None
    }

    fn draw_request(&self) -> DrawRequest<'_> {
        DrawRequest {
            vertices: self.vertices(),
            indices: self.indices(),
            offset: self.offset(),
            texture: self.texture(),
        }
    }
}

/// Pending draw requests for one frame.
///
/// Requests are kept in submission order; batching follows that order.
/// Running totals are checked against `BatchLimits` on every submit, so a
/// queue that accepted all its requests always fits the GPU buffers.
#[derive(Debug)]
pub struct DrawQueue<'a> {
    requests: Vec<DrawRequest<'a>>,
    limits: BatchLimits,
    vertex_total: usize,
    index_total: usize,
}

impl<'a> DrawQueue<'a> {
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            requests: Vec::new(),
            limits,
            vertex_total: 0,
            index_total: 0,
        }
    }

    /// Appends a request. On error the queue is left unchanged.
    pub fn submit(&mut self, request: DrawRequest<'a>) -> Result<()> {
        request.validate()?;

        let vertices = self.vertex_total + request.vertices.len();
        if vertices > self.limits.max_batch_vertices {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::Vertices,
                requested: vertices,
                capacity: self.limits.max_batch_vertices,
            });
        }
        let indices = self.index_total + request.indices.len();
        if indices > self.limits.max_batch_indices {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::Indices,
                requested: indices,
                capacity: self.limits.max_batch_indices,
            });
        }

        self.vertex_total = vertices;
        self.index_total = indices;
        self.requests.push(request);
        Ok(())
    }

    pub fn submit_drawable<D: Drawable + ?Sized>(&mut self, drawable: &'a D) -> Result<()> {
        self.submit(drawable.draw_request())
    }

    /// Regroups requests by texture handle (stable within a texture).
    ///
    /// Never applied implicitly: it changes paint order between textures.
    pub fn sort_by_texture(&mut self) {
        self.requests.sort_by_key(|r| r.texture);
    }

    #[inline]
    pub fn requests(&self) -> &[DrawRequest<'a>] {
        &self.requests
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    #[inline]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Vertices queued so far this frame.
    #[inline]
    pub fn vertex_total(&self) -> usize {
        self.vertex_total
    }

    #[inline]
    pub fn index_total(&self) -> usize {
        self.index_total
    }

    /// Removes every request and resets the running totals.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.vertex_total = 0;
        self.index_total = 0;
    }

    /// Takes every request out, leaving the queue empty.
    pub(crate) fn take(&mut self) -> Vec<DrawRequest<'a>> {
        self.vertex_total = 0;
        self.index_total = 0;
        std::mem::take(&mut self.requests)
    }
}
