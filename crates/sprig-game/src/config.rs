use std::path::PathBuf;

use sprig_engine::coords::{ColorRgba, Vec2};

/// Tunables for the game scene.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    /// Window size in physical pixels.
    pub window_width: u32,
    pub window_height: u32,
    /// Physical pixels per logical pixel.
    pub pixel_scale: u32,

    /// Directory holding `<name>.png` textures.
    pub asset_dir: PathBuf,

    pub clear_color: ColorRgba,
    pub grass_height: f32,

    pub player_size: Vec2,
    /// Logical pixels per second.
    pub player_speed: f32,

    pub enemy_count: usize,
    pub enemy_size: Vec2,
    /// Leftward drift speed range, logical pixels per second.
    pub enemy_speed: (f32, f32),
    /// Enemies whose x drops below this respawn at the right edge.
    pub respawn_x: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "sprig".to_string(),
            window_width: 960,
            window_height: 540,
            pixel_scale: 2,
            asset_dir: PathBuf::from("data/images"),
            clear_color: ColorRgba::from_rgb8(24, 20, 37),
            grass_height: 68.0,
            player_size: Vec2::new(16.0, 16.0),
            player_speed: 120.0,
            enemy_count: 10,
            enemy_size: Vec2::new(16.0, 16.0),
            enemy_speed: (20.0, 60.0),
            respawn_x: -20.0,
        }
    }
}
