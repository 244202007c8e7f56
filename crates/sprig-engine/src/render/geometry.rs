use crate::coords::Vec2;

use super::error::{RenderError, Result};
use super::vertex::Vertex;

/// CPU-side vertex/index storage for the batch being built.
///
/// Invariants:
/// - vertices are kept in insertion (draw) order
/// - every index is batch-local and `< vertices.len()`
/// - `clear()` empties both lists together
#[derive(Debug, Default)]
pub struct GeometryBuffer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl GeometryBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for one full batch so steady-state frames do not allocate.
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends one request's geometry.
    ///
    /// Vertices are translated by `offset` (if any). Indices are rebased by the
    /// vertex count before the append. Out-of-range indices are rejected and
    /// leave the buffer untouched.
    pub fn append(&mut self, vertices: &[Vertex], indices: &[u32], offset: Option<Vec2>) -> Result<()> {
        check_indices(vertices.len(), indices)?;

        let base = self.vertices.len() as u32;
        match offset {
            Some(o) => self.vertices.extend(vertices.iter().map(|v| v.translated(o))),
            None => self.vertices.extend_from_slice(vertices),
        }
        self.indices.extend(indices.iter().map(|&i| i + base));
        Ok(())
    }

    /// Empties vertices and indices. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Structural validation shared by `GeometryBuffer::append` and `DrawQueue::submit`.
pub(crate) fn check_indices(vertex_count: usize, indices: &[u32]) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(RenderError::IncompleteTriangle(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(RenderError::IndexOutOfRange { index, vertex_count });
    }
    Ok(())
}
