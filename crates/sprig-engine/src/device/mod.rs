//! GPU device + surface management.
//!
//! Creates the wgpu instance/adapter/device/queue for the game window,
//! keeps the surface configured across resizes and hands out frames.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
