//! Sprig engine crate.
//!
//! Platform + GPU runtime and the batched sprite renderer used by the game.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod render;
