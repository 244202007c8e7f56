use rand::Rng;
use sprig_engine::coords::{Rect, Vec2};
use sprig_engine::render::Drawable;

use crate::assets::Assets;
use crate::config::GameConfig;
use crate::entity::{Enemy, Player, Sprite};

/// Scene state: backdrop, ground strip, player and enemies, in logical pixels.
#[derive(Debug, Clone)]
pub struct World {
    area: Rect,
    grass_height: f32,
    respawn_x: f32,
    pub background: Sprite,
    pub grass: Sprite,
    pub player: Player,
    pub enemies: Vec<Enemy>,
}

impl World {
    /// Builds the scene for `area`. `grass_tile` is the grass texture's size,
    /// which the ground strip repeats across its width.
    pub fn new(
        config: &GameConfig,
        assets: &Assets,
        grass_tile: Vec2,
        area: Rect,
        rng: &mut impl Rng,
    ) -> Self {
        let start = Vec2::new(
            area.size.x * 0.25,
            (area.size.y - config.grass_height - config.player_size.y) * 0.5,
        );
        let player = Player {
            sprite: Sprite::new(assets.wizard, config.player_size).at(start),
            speed: config.player_speed,
        };

        let (lo, hi) = config.enemy_speed;
        let mut enemies = Vec::with_capacity(config.enemy_count);
        for _ in 0..config.enemy_count {
            let speed = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            let mut enemy = Enemy {
                sprite: Sprite::new(assets.black_mage, config.enemy_size),
                speed,
            };
            let x = area.size.x + rng.gen_range(0.0..area.size.x.max(1.0));
            enemy.sprite.position = Vec2::new(x, random_height(rng, area, config.grass_height, config.enemy_size.y));
            enemies.push(enemy);
        }

        let mut world = Self {
            area: Rect::default(),
            grass_height: config.grass_height,
            respawn_x: config.respawn_x,
            background: Sprite::new(assets.sky, area.size),
            grass: Sprite::tiled(assets.grass, Vec2::ZERO, grass_tile),
            player,
            enemies,
        };
        world.fit(area, grass_tile);
        world
    }

    #[inline]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Resizes the backdrop and ground to `area` and pulls the player back inside.
    /// Returns `false` when the area is unchanged.
    pub fn fit(&mut self, area: Rect, grass_tile: Vec2) -> bool {
        if area == self.area {
            return false;
        }
        self.area = area;

        self.background = Sprite::new(self.background.texture(), area.size).at(area.origin);
        let ground = Vec2::new(area.size.x, self.grass_height);
        self.grass = Sprite::tiled(self.grass.texture(), ground, grass_tile)
            .at(Vec2::new(area.origin.x, area.max().y - self.grass_height));
        self.player.sprite.position = self.player.sprite.bounds().clamped_into(area).origin;

        log::debug!("world fitted to {}x{}", area.size.x, area.size.y);
        true
    }

    /// Advances the player along `direction` and every enemy by `dt` seconds.
    pub fn update(&mut self, dt: f32, direction: Vec2, rng: &mut impl Rng) {
        self.player.update(dt, direction, self.area);

        for enemy in &mut self.enemies {
            enemy.update(dt);
            if enemy.is_past(self.respawn_x) {
                let y = random_height(rng, self.area, self.grass_height, enemy.sprite.size().y);
                enemy.sprite.position = Vec2::new(self.area.max().x + 20.0, y);
            }
        }
    }

    /// Sprites in draw order: background, grass, enemies, player.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        [&self.background, &self.grass]
            .into_iter()
            .chain(self.enemies.iter().map(|e| &e.sprite))
            .chain(std::iter::once(&self.player.sprite))
    }
}

/// Random top edge for a sprite of `height` that keeps it above the ground.
fn random_height(rng: &mut impl Rng, area: Rect, grass_height: f32, height: f32) -> f32 {
    let top = area.origin.y;
    let bottom = area.max().y - grass_height - height;
    if bottom > top { rng.gen_range(top..bottom) } else { top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sprig_engine::render::ResourceTable;

    fn assets() -> Assets {
        let mut t = ResourceTable::new();
        Assets {
            wizard: t.insert("wizard", ()),
            black_mage: t.insert("black_mage", ()),
            sky: t.insert("sky", ()),
            grass: t.insert("grass", ()),
        }
    }

    fn world(rng: &mut StdRng) -> World {
        World::new(
            &GameConfig::default(),
            &assets(),
            Vec2::new(32.0, 68.0),
            Rect::new(0.0, 0.0, 480.0, 270.0),
            rng,
        )
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn draw_order_is_background_grass_enemies_player() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = world(&mut rng);
        let a = assets();
        let textures: Vec<_> = w.sprites().map(|s| s.texture()).collect();

        assert_eq!(textures.len(), 13);
        assert_eq!(textures[0], a.sky);
        assert_eq!(textures[1], a.grass);
        assert!(textures[2..12].iter().all(|t| *t == a.black_mage));
        assert_eq!(textures[12], a.wizard);
    }

    #[test]
    fn grass_sits_on_the_bottom_edge() {
        let mut rng = StdRng::seed_from_u64(2);
        let w = world(&mut rng);
        assert_eq!(w.grass.bounds(), Rect::new(0.0, 202.0, 480.0, 68.0));
        assert_eq!(w.background.bounds(), Rect::new(0.0, 0.0, 480.0, 270.0));
    }

    #[test]
    fn enemies_start_off_screen_right() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = world(&mut rng);
        for e in &w.enemies {
            assert!(e.sprite.position.x >= 480.0);
            assert!(e.sprite.position.y >= 0.0 && e.sprite.position.y <= 202.0 - 16.0);
            assert!(e.speed >= 20.0 && e.speed < 60.0);
        }
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn fit_refits_backdrop_and_clamps_player() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut w = world(&mut rng);
        w.player.sprite.position = Vec2::new(400.0, 100.0);

        assert!(w.fit(Rect::new(0.0, 0.0, 240.0, 135.0), Vec2::new(32.0, 68.0)));
        assert_eq!(w.background.bounds().size, Vec2::new(240.0, 135.0));
        assert_eq!(w.grass.bounds().origin.y, 67.0);
        assert_eq!(w.player.sprite.position.x, 224.0);
        assert_eq!(w.grass.vertices()[2].tex_coord, [7.5, 1.0]);
    }

    #[test]
    fn fit_with_same_area_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut w = world(&mut rng);
        assert!(!w.fit(Rect::new(0.0, 0.0, 480.0, 270.0), Vec2::new(32.0, 68.0)));
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn enemy_past_threshold_respawns_at_right_edge() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut w = world(&mut rng);
        w.enemies[0].sprite.position = Vec2::new(-19.0, 50.0);
        w.enemies[0].speed = 10.0;

        w.update(0.5, Vec2::ZERO, &mut rng);

        let e = &w.enemies[0];
        assert_eq!(e.sprite.position.x, 500.0);
        assert!(e.sprite.position.y >= 0.0 && e.sprite.position.y < 186.0);
    }

    #[test]
    fn player_moves_with_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut w = world(&mut rng);
        let before = w.player.sprite.position;

        w.update(0.5, Vec2::new(-1.0, 0.0), &mut rng);

        assert_eq!(w.player.sprite.position, before + Vec2::new(-60.0, 0.0));
    }
}
