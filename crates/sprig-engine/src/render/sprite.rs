use std::collections::HashMap;

use super::config::{BatchLimits, ShaderSource};
use super::emitter::{BatchEmitter, BatchSink, FrameStats};
use super::error::{BufferKind, RenderError, Result};
use super::geometry::GeometryBuffer;
use super::pipeline::{alpha_blend, begin_load_pass, compile_shader, create_pipeline};
use super::projection::ProjectionUniform;
use super::request::DrawRequest;
use super::texture::{ResourceTable, TextureId, TextureTable};
use super::vertex::Vertex;
use super::{RenderCtx, RenderTarget};

/// Textured-triangle batch renderer.
///
/// Owns one vertex and one index buffer, allocated once at the configured
/// per-frame capacity. Each batch of a frame is written to the next free
/// sub-range of both buffers and drawn with `base_vertex` at the start of its
/// vertex range, so batch indices stay 0-based.
pub(crate) struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    limits: BatchLimits,

    // per-texture bind groups (group 1), created on first use
    bind_groups: HashMap<TextureId, wgpu::BindGroup>,
    emitter: BatchEmitter,
}

impl SpriteRenderer {
    pub(crate) fn new(
        ctx: &RenderCtx<'_>,
        limits: BatchLimits,
        shader: &ShaderSource,
        projection: &ProjectionUniform,
    ) -> Result<Self> {
        let module = compile_shader(ctx, shader)?;

        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprig sprite pipeline layout"),
            bind_group_layouts: &[projection.layout(), &texture_layout],
            immediate_size: 0,
        });

        let pipeline = create_pipeline(
            ctx,
            &wgpu::RenderPipelineDescriptor {
                label: Some("sprig sprite pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            },
        )?;

        let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprig sprite vbo"),
            size: (limits.max_batch_vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let ibo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprig sprite ibo"),
            size: (limits.max_batch_indices * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline,
            texture_layout,
            vbo,
            ibo,
            limits,
            bind_groups: HashMap::new(),
            emitter: BatchEmitter::with_capacity(limits.max_batch_vertices, limits.max_batch_indices),
        })
    }

    /// Batches `requests` in submission order and records one indexed draw per batch.
    ///
    /// Textures must already be resolved (see `resolve_textures`).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        textures: &TextureTable,
        projection: &ProjectionUniform,
        requests: &[DrawRequest<'_>],
    ) -> Result<FrameStats> {
        if requests.iter().all(|r| r.vertices.is_empty()) {
            return Ok(FrameStats::default());
        }
        self.ensure_bind_groups(ctx, textures, requests)?;

        let pass = begin_load_pass(target.encoder, target.color_view, "sprig sprite pass");
        let mut sink = GpuSink {
            pass,
            queue: ctx.queue,
            vbo: &self.vbo,
            ibo: &self.ibo,
            bind_groups: &self.bind_groups,
            limits: self.limits,
            vertex_cursor: 0,
            index_cursor: 0,
        };
        sink.pass.set_pipeline(&self.pipeline);
        sink.pass.set_bind_group(0, projection.bind_group(), &[]);
        sink.pass.set_vertex_buffer(0, self.vbo.slice(..));
        sink.pass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint32);

        let stats = self.emitter.emit(requests, &mut sink)?;
        log::trace!(
            "sprites: {} batches, {} vertices, {} indices",
            stats.batches,
            stats.vertices,
            stats.indices
        );
        Ok(stats)
    }

    fn ensure_bind_groups(
        &mut self,
        ctx: &RenderCtx<'_>,
        textures: &TextureTable,
        requests: &[DrawRequest<'_>],
    ) -> Result<()> {
        // Drop groups for unloaded textures; ids are never reissued.
        self.bind_groups.retain(|id, _| textures.contains(*id));

        for request in requests.iter().filter(|r| !r.vertices.is_empty()) {
            if self.bind_groups.contains_key(&request.texture) {
                continue;
            }
            let texture = textures
                .get(request.texture)
                .ok_or(RenderError::InvalidTexture(request.texture))?;

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("sprig sprite texture bind group"),
                layout: &self.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            });
            log::debug!("created bind group for texture {}", request.texture.raw());
            self.bind_groups.insert(request.texture, bind_group);
        }
        Ok(())
    }

    /// Frees the vertex and index buffers and every cached bind group.
    pub fn destroy(&mut self) {
        self.bind_groups.clear();
        self.vbo.destroy();
        self.ibo.destroy();
    }
}

/// Checks that every non-empty request names a loaded texture.
pub(crate) fn resolve_textures<T>(
    textures: &ResourceTable<T>,
    requests: &[DrawRequest<'_>],
) -> Result<()> {
    match requests
        .iter()
        .find(|r| !r.vertices.is_empty() && !textures.contains(r.texture))
    {
        Some(missing) => Err(RenderError::InvalidTexture(missing.texture)),
        None => Ok(()),
    }
}

/// Records batches into an open render pass.
struct GpuSink<'p, 'r> {
    pass: wgpu::RenderPass<'p>,
    queue: &'r wgpu::Queue,
    vbo: &'r wgpu::Buffer,
    ibo: &'r wgpu::Buffer,
    bind_groups: &'r HashMap<TextureId, wgpu::BindGroup>,
    limits: BatchLimits,
    vertex_cursor: usize,
    index_cursor: usize,
}

impl BatchSink for GpuSink<'_, '_> {
    fn bind_texture(&mut self, texture: TextureId) -> Result<()> {
        let bind_group = self
            .bind_groups
            .get(&texture)
            .ok_or(RenderError::InvalidTexture(texture))?;
        self.pass.set_bind_group(1, bind_group, &[]);
        Ok(())
    }

    fn draw(&mut self, geometry: &GeometryBuffer) -> Result<()> {
        let vertex_end = self.vertex_cursor + geometry.vertex_count();
        if vertex_end > self.limits.max_batch_vertices {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::Vertices,
                requested: vertex_end,
                capacity: self.limits.max_batch_vertices,
            });
        }
        let index_end = self.index_cursor + geometry.index_count();
        if index_end > self.limits.max_batch_indices {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::Indices,
                requested: index_end,
                capacity: self.limits.max_batch_indices,
            });
        }

        let vertex_offset = (self.vertex_cursor * std::mem::size_of::<Vertex>()) as u64;
        let index_offset = (self.index_cursor * std::mem::size_of::<u32>()) as u64;
        self.queue
            .write_buffer(self.vbo, vertex_offset, bytemuck::cast_slice(geometry.vertices()));
        self.queue
            .write_buffer(self.ibo, index_offset, bytemuck::cast_slice(geometry.indices()));

        self.pass.draw_indexed(
            self.index_cursor as u32..index_end as u32,
            self.vertex_cursor as i32,
            0..1,
        );

        self.vertex_cursor = vertex_end;
        self.index_cursor = index_end;
        Ok(())
    }
}
