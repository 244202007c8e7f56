//! Batched sprite rendering.
//!
//! Draw requests are collected per frame in a `DrawQueue`, split into
//! texture-contiguous batches by `BatchEmitter`, and drawn with one indexed
//! call per batch into pre-allocated GPU buffers.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - One orthographic projection uniform (group 0) is shared by all pipelines.

mod config;
mod ctx;
mod debug_lines;
mod emitter;
mod error;
mod geometry;
mod pipeline;
mod projection;
mod renderer;
mod request;
mod sprite;
mod texture;
mod vertex;

#[cfg(test)]
mod test_gpu;

pub use config::{BatchLimits, RendererConfig, ShaderSource};
pub use ctx::{RenderCtx, RenderTarget};
pub use debug_lines::DebugLines;
pub use emitter::{BatchEmitter, BatchSink, FrameStats};
pub use error::{BufferKind, RenderError, Result};
pub use geometry::GeometryBuffer;
pub use projection::Projection;
pub use renderer::Renderer;
pub use request::{DrawQueue, DrawRequest, Drawable};
pub use texture::{AssetError, ResourceTable, Texture, TextureId, TextureTable};
pub use vertex::{quad_vertices, Vertex, QUAD_INDICES};
