use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::texture::TextureId;

/// Which pre-allocated GPU buffer a capacity error refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertices,
    Indices,
    DebugLines,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertices => f.write_str("vertex"),
            BufferKind::Indices => f.write_str("index"),
            BufferKind::DebugLines => f.write_str("debug line"),
        }
    }
}

/// Errors reported by the sprite renderer and its building blocks.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("draw request index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("draw request has {0} indices, which is not a whole number of triangles")]
    IncompleteTriangle(usize),

    #[error("{kind} capacity exceeded: {requested} needed this frame, {capacity} available")]
    CapacityExceeded {
        kind: BufferKind,
        requested: usize,
        capacity: usize,
    },

    #[error("texture {0:?} is not loaded")]
    InvalidTexture(TextureId),

    #[error("projection has not been set; call set_projection before rendering")]
    ProjectionUnset,

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("shader `{label}` is missing required symbol `{symbol}`")]
    MissingShaderSymbol { label: String, symbol: String },

    #[error("shader `{label}` failed to compile:\n{log}")]
    ShaderCompile { label: String, log: String },

    #[error("pipeline `{label}` was rejected by the device: {log}")]
    PipelineCreation { label: String, log: String },

    #[error("failed to read shader source {}", path.display())]
    ShaderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
