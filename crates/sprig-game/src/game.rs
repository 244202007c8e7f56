use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sprig_engine::coords::{Rect, Vec2};
use sprig_engine::core::{App, AppControl, FrameCtx};
use sprig_engine::input::{InputState, Key};
use sprig_engine::render::{RenderCtx, RenderTarget, Renderer, RendererConfig, TextureTable};
use sprig_engine::time::FpsCounter;

use crate::assets::Assets;
use crate::config::GameConfig;
use crate::world::World;

/// GPU-side scene state, created on the first rendered frame.
struct Scene {
    renderer: Renderer,
    textures: TextureTable,
    assets: Assets,
    world: World,
}

impl Scene {
    fn new(ctx: &RenderCtx<'_>, config: &GameConfig, rng: &mut StdRng) -> Result<Self> {
        let renderer = Renderer::new(ctx, &RendererConfig::default()).context("renderer init")?;
        let mut textures = TextureTable::new(config.asset_dir.clone());
        let assets = Assets::load(ctx, &mut textures).context("texture load")?;

        let world = World::new(
            config,
            &assets,
            grass_tile(&textures, &assets, config),
            viewport_rect(ctx),
            rng,
        );

        Ok(Self {
            renderer,
            textures,
            assets,
            world,
        })
    }

    fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        config: &GameConfig,
        show_bounds: bool,
    ) -> Result<()> {
        let (width, height) = ctx.viewport_px();
        self.renderer.set_projection(ctx, width, height)?;
        self.world
            .fit(viewport_rect(ctx), grass_tile(&self.textures, &self.assets, config));

        let mut queue = self.renderer.queue();
        for sprite in self.world.sprites() {
            if let Err(err) = queue.submit_drawable(sprite) {
                log::warn!("sprite dropped: {err}");
            }
        }
        let stats = self
            .renderer
            .render_objects(ctx, target, &self.textures, &mut queue)?;
        log::trace!("frame: {} draw calls, {} vertices", stats.draw_calls, stats.vertices);

        if show_bounds {
            for sprite in self.world.sprites().skip(2) {
                let bounds = sprite.bounds();
                if let Err(err) = self.renderer.add_debug_rect(bounds.min(), bounds.max()) {
                    log::warn!("debug rect dropped: {err}");
                    break;
                }
            }
            self.renderer.render_debug_lines(ctx, target)?;
        }
        Ok(())
    }

    fn dispose(mut self) {
        self.textures.unload_all();
        self.renderer.dispose();
    }
}

/// The sprite scene: a player dodging a stream of enemies.
pub struct SpriteGame {
    config: GameConfig,
    rng: StdRng,
    fps: FpsCounter,
    show_bounds: bool,
    scene: Option<Scene>,
}

impl SpriteGame {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
            fps: FpsCounter::new(),
            show_bounds: false,
            scene: None,
        }
    }
}

impl App for SpriteGame {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::F1) {
            self.show_bounds = !self.show_bounds;
            log::info!("bounding boxes {}", if self.show_bounds { "on" } else { "off" });
        }

        if let Some(fps) = self.fps.record(ctx.time.raw_dt) {
            ctx.runtime.set_title(format!("{} - {fps:.0} fps", self.config.title));
            log::debug!("{fps:.1} fps");
        }

        if let Some(scene) = &mut self.scene {
            scene.world.update(ctx.time.dt, direction(ctx.input), &mut self.rng);
        }

        let Self {
            config,
            rng,
            show_bounds,
            scene,
            ..
        } = self;

        ctx.render(config.clear_color, |rctx, target| {
            if scene.is_none() {
                match Scene::new(rctx, config, rng) {
                    Ok(s) => *scene = Some(s),
                    Err(err) => {
                        log::error!("scene setup failed: {err:#}");
                        return AppControl::Exit;
                    }
                }
            }
            let Some(scene) = scene.as_mut() else {
                return AppControl::Exit;
            };

            match scene.draw(rctx, target, config, *show_bounds) {
                Ok(()) => AppControl::Continue,
                Err(err) => {
                    log::error!("render failed: {err:#}");
                    AppControl::Exit
                }
            }
        })
    }

    fn on_exit(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.dispose();
        }
    }
}

/// Movement direction from the arrow keys and WASD (not normalized).
fn direction(input: &InputState) -> Vec2 {
    let axis = |neg: &[Key], pos: &[Key]| {
        (input.any_down(pos) as i8 - input.any_down(neg) as i8) as f32
    };
    Vec2::new(
        axis(&[Key::ArrowLeft, Key::A], &[Key::ArrowRight, Key::D]),
        axis(&[Key::ArrowUp, Key::W], &[Key::ArrowDown, Key::S]),
    )
}

fn viewport_rect(ctx: &RenderCtx<'_>) -> Rect {
    let (width, height) = ctx.viewport_px();
    Rect::new(0.0, 0.0, width as f32, height as f32)
}

fn grass_tile(textures: &TextureTable, assets: &Assets, config: &GameConfig) -> Vec2 {
    match textures.size(assets.grass) {
        Some((w, h)) => Vec2::new(w as f32, h as f32),
        None => Vec2::new(32.0, config.grass_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_engine::input::{ButtonState, InputEvent, InputFrame};

    fn press(state: &mut InputState, key: Key) {
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key,
                state: ButtonState::Pressed,
                repeat: false,
            },
        );
    }

    #[test]
    fn no_keys_means_no_movement() {
        assert_eq!(direction(&InputState::default()), Vec2::ZERO);
    }

    #[test]
    fn arrows_and_wasd_share_axes() {
        let mut input = InputState::default();
        press(&mut input, Key::ArrowRight);
        press(&mut input, Key::W);
        assert_eq!(direction(&input), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::default();
        press(&mut input, Key::A);
        press(&mut input, Key::D);
        assert_eq!(direction(&input), Vec2::ZERO);
    }
}
