use crate::coords::Vec2;

use super::config::{BatchLimits, RendererConfig};
use super::debug_lines::DebugLineRenderer;
use super::emitter::FrameStats;
use super::error::Result;
use super::projection::{Projection, ProjectionUniform};
use super::request::{DrawQueue, DrawRequest};
use super::sprite::{resolve_textures, SpriteRenderer};
use super::texture::{ResourceTable, TextureTable};
use super::{RenderCtx, RenderTarget};

/// Sprite batch renderer plus debug-line overlay sharing one projection.
///
/// Frame lifecycle:
/// 1. `set_projection` (once, and again on resize)
/// 2. fill a `DrawQueue` from `queue()`
/// 3. `render_objects` drains it and draws one call per texture batch
/// 4. optionally `add_debug_line` + `render_debug_lines`
pub struct Renderer {
    limits: BatchLimits,
    projection: Projection,
    uniform: ProjectionUniform,
    sprites: SpriteRenderer,
    lines: DebugLineRenderer,
}

impl Renderer {
    /// Builds pipelines and allocates every GPU buffer up front.
    pub fn new(ctx: &RenderCtx<'_>, config: &RendererConfig) -> Result<Self> {
        config.validate()?;

        let uniform = ProjectionUniform::new(ctx);
        let sprites = SpriteRenderer::new(ctx, config.limits, &config.sprite_shader, &uniform)?;
        let lines = DebugLineRenderer::new(
            ctx,
            config.limits.max_debug_lines,
            &config.debug_line_shader,
            &uniform,
        )?;

        log::info!(
            "renderer ready: {} vertices / {} indices per frame, {} debug lines, format {:?}",
            config.limits.max_batch_vertices,
            config.limits.max_batch_indices,
            config.limits.max_debug_lines,
            ctx.surface_format,
        );

        Ok(Self {
            limits: config.limits,
            projection: Projection::new(),
            uniform,
            sprites,
            lines,
        })
    }

    /// Sets the logical viewport. The uniform is rewritten only when it changes.
    pub fn set_projection(&mut self, ctx: &RenderCtx<'_>, width: u32, height: u32) -> Result<()> {
        if self.projection.set_viewport(width, height)? {
            self.uniform.upload(ctx.queue, self.projection.matrix()?);
            log::debug!("projection set to {width}x{height}");
        }
        Ok(())
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Empty queue sized to this renderer's buffers.
    pub fn queue<'a>(&self) -> DrawQueue<'a> {
        DrawQueue::new(self.limits)
    }

    /// Draws every queued request and leaves `queue` empty, even on error.
    ///
    /// Nothing is recorded unless the projection is set and every texture
    /// in the queue is loaded.
    pub fn render_objects(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        textures: &TextureTable,
        queue: &mut DrawQueue<'_>,
    ) -> Result<FrameStats> {
        let requests = prepare_frame(&self.projection, textures.resources(), queue)?;
        self.sprites
            .render(ctx, target, textures, &self.uniform, &requests)
    }

    pub fn add_debug_line(&mut self, p1: Vec2, p2: Vec2) -> Result<()> {
        self.lines.add_line(p1, p2)
    }

    /// Queues the outline of an axis-aligned box as four debug lines.
    pub fn add_debug_rect(&mut self, min: Vec2, max: Vec2) -> Result<()> {
        self.lines.add_rect(min, max)
    }

    /// Pending debug points (two per line).
    pub fn debug_point_count(&self) -> usize {
        self.lines.lines().point_count()
    }

    /// Draws and clears the debug lines. Returns the number of draw calls (0 or 1).
    pub fn render_debug_lines(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<usize> {
        if let Err(e) = self.projection.matrix() {
            self.lines.clear();
            return Err(e);
        }
        Ok(self.lines.render(ctx, target, &self.uniform))
    }

    /// Releases the GPU buffers: sprite batches, then debug lines, then the projection uniform.
    pub fn dispose(mut self) {
        self.sprites.destroy();
        self.lines.destroy();
        self.uniform.destroy();
        log::info!("renderer disposed");
    }
}

/// Drains `queue` and runs every check that must pass before GPU work starts.
fn prepare_frame<'a, T>(
    projection: &Projection,
    textures: &ResourceTable<T>,
    queue: &mut DrawQueue<'a>,
) -> Result<Vec<DrawRequest<'a>>> {
    let requests = queue.take();
    projection.matrix()?;
    resolve_textures(textures, &requests)?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::ShaderSource;
    use crate::render::emitter::{BatchEmitter, BatchSink};
    use crate::render::error::RenderError;
    use crate::render::geometry::GeometryBuffer;
    use crate::render::test_gpu;
    use crate::render::texture::TextureId;
    use crate::render::vertex::{quad_vertices, QUAD_INDICES};

    #[derive(Default)]
    struct CountingSink {
        binds: Vec<TextureId>,
        draws: usize,
    }

    impl BatchSink for CountingSink {
        fn bind_texture(&mut self, texture: TextureId) -> Result<()> {
            self.binds.push(texture);
            Ok(())
        }

        fn draw(&mut self, _geometry: &GeometryBuffer) -> Result<()> {
            self.draws += 1;
            Ok(())
        }
    }

    fn projection() -> Projection {
        let mut p = Projection::new();
        p.set_viewport(480, 270).unwrap();
        p
    }

    /// `render_objects` with the GPU pass swapped for `sink`.
    fn render_into(
        projection: &Projection,
        textures: &ResourceTable<()>,
        queue: &mut DrawQueue<'_>,
        sink: &mut CountingSink,
    ) -> Result<FrameStats> {
        let requests = prepare_frame(projection, textures, queue)?;
        BatchEmitter::new().emit(&requests, sink)
    }

    // ── frame preparation ─────────────────────────────────────────────────

    #[test]
    fn queue_is_drained_by_a_successful_frame() {
        let mut table = ResourceTable::new();
        let a = table.insert("wizard", ());
        let q = quad_vertices(16.0, 16.0);
        let mut queue = DrawQueue::new(BatchLimits::default());
        queue.submit(DrawRequest::new(&q, &QUAD_INDICES, a)).unwrap();

        let mut sink = CountingSink::default();
        let stats = render_into(&projection(), &table, &mut queue, &mut sink).unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert!(queue.is_empty());
        assert_eq!(queue.vertex_total(), 0);
    }

    #[test]
    fn unset_projection_fails_before_drawing_and_drains_queue() {
        let mut table = ResourceTable::new();
        let a = table.insert("wizard", ());
        let q = quad_vertices(16.0, 16.0);
        let mut queue = DrawQueue::new(BatchLimits::default());
        queue.submit(DrawRequest::new(&q, &QUAD_INDICES, a)).unwrap();

        let mut sink = CountingSink::default();
        let err = render_into(&Projection::new(), &table, &mut queue, &mut sink).unwrap_err();

        assert!(matches!(err, RenderError::ProjectionUnset));
        assert!(queue.is_empty());
        assert_eq!(sink.draws, 0);
    }

    #[test]
    fn unknown_texture_fails_with_no_sink_calls() {
        let mut table = ResourceTable::new();
        let a = table.insert("wizard", ());
        let q = quad_vertices(16.0, 16.0);
        let mut queue = DrawQueue::new(BatchLimits::default());
        // The valid batch comes first; it must not be bound or drawn either.
        queue.submit(DrawRequest::new(&q, &QUAD_INDICES, a)).unwrap();
        queue.submit(DrawRequest::new(&q, &QUAD_INDICES, TextureId(42))).unwrap();

        let mut sink = CountingSink::default();
        let err = render_into(&projection(), &table, &mut queue, &mut sink).unwrap_err();

        assert!(matches!(err, RenderError::InvalidTexture(TextureId(42))));
        assert!(sink.binds.is_empty());
        assert_eq!(sink.draws, 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn unloaded_texture_is_rejected() {
        let mut table = ResourceTable::new();
        let a = table.insert("sky", ());
        table.remove("sky");
        let q = quad_vertices(16.0, 16.0);
        let mut queue = DrawQueue::new(BatchLimits::default());
        queue.submit(DrawRequest::new(&q, &QUAD_INDICES, a)).unwrap();

        let err = prepare_frame(&projection(), &table, &mut queue).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTexture(id) if id == a));
    }

    // ── device ────────────────────────────────────────────────────────────
    // Skipped when no adapter is available.

    #[test]
    fn broken_shader_is_an_error_not_a_panic() {
        let Some(gpu) = test_gpu::device() else { return };
        let config = RendererConfig {
            sprite_shader: ShaderSource::new(
                "broken sprite shader",
                "fn vs_main( fs_main projection sprite_texture sprite_sampler",
                &["vs_main", "fs_main", "projection", "sprite_texture", "sprite_sampler"],
            ),
            ..RendererConfig::default()
        };

        let err = match Renderer::new(&gpu.ctx(), &config) {
            Ok(_) => panic!("broken shader was accepted"),
            Err(err) => err,
        };
        assert!(matches!(err, RenderError::ShaderCompile { ref label, .. } if label == "broken sprite shader"));
    }

    #[test]
    fn dispose_releases_a_fresh_renderer() {
        let Some(gpu) = test_gpu::device() else { return };
        let ctx = gpu.ctx();
        let mut renderer = Renderer::new(&ctx, &RendererConfig::default()).unwrap();
        renderer.set_projection(&ctx, 480, 270).unwrap();
        renderer.add_debug_line(Vec2::ZERO, Vec2::new(10.0, 10.0)).unwrap();

        renderer.dispose();
        gpu.device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
    }
}
