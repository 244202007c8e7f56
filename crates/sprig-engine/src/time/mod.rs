//! Frame timing.
//!
//! - `FrameClock`: one per loop; `tick()` once per presented frame
//! - `FpsCounter`: frames per second over fixed one-second windows

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
