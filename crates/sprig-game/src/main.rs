mod assets;
mod config;
mod entity;
mod game;
mod world;

use anyhow::Result;
use sprig_engine::device::GpuInit;
use sprig_engine::logging::{init_logging, LoggingConfig};
use sprig_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::PhysicalSize;

use crate::config::GameConfig;
use crate::game::SpriteGame;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = GameConfig::default();
    let runtime = RuntimeConfig {
        title: config.title.clone(),
        window_size: PhysicalSize::new(config.window_width, config.window_height),
        pixel_scale: config.pixel_scale,
        resizable: true,
    };

    log::info!(
        "starting {} at {}x{} (pixel scale {})",
        config.title,
        config.window_width,
        config.window_height,
        config.pixel_scale
    );
    Runtime::run(runtime, GpuInit::default(), SpriteGame::new(config))
}
