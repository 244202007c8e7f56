use crate::coords::Vec2;

use super::config::ShaderSource;
use super::error::{BufferKind, RenderError, Result};
use super::pipeline::{alpha_blend, begin_load_pass, compile_shader, create_pipeline};
use super::projection::ProjectionUniform;
use super::vertex::LinePoint;
use super::{RenderCtx, RenderTarget};

/// Accumulated line segments for one frame (two points per line).
#[derive(Debug)]
pub struct DebugLines {
    points: Vec<LinePoint>,
    max_lines: usize,
}

impl DebugLines {
    pub fn new(max_lines: usize) -> Self {
        Self {
            points: Vec::with_capacity(max_lines * 2),
            max_lines,
        }
    }

    /// Queues the segment `p1 -> p2`. Beyond capacity the line is dropped.
    pub fn add_line(&mut self, p1: Vec2, p2: Vec2) -> Result<()> {
        let lines = self.line_count() + 1;
        if lines > self.max_lines {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::DebugLines,
                requested: lines,
                capacity: self.max_lines,
            });
        }
        self.points.push(LinePoint::new(p1));
        self.points.push(LinePoint::new(p2));
        Ok(())
    }

    /// Queues the four edges of an axis-aligned box.
    pub fn add_rect(&mut self, min: Vec2, max: Vec2) -> Result<()> {
        if self.line_count() + 4 > self.max_lines {
            return Err(RenderError::CapacityExceeded {
                kind: BufferKind::DebugLines,
                requested: self.line_count() + 4,
                capacity: self.max_lines,
            });
        }
        let tr = Vec2::new(max.x, min.y);
        let bl = Vec2::new(min.x, max.y);
        self.add_line(min, tr)?;
        self.add_line(tr, max)?;
        self.add_line(max, bl)?;
        self.add_line(bl, min)
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.points.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub(crate) fn points(&self) -> &[LinePoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Immediate-mode line overlay: one upload and one `LineList` draw per frame.
pub(crate) struct DebugLineRenderer {
    pipeline: wgpu::RenderPipeline,
    vbo: wgpu::Buffer,
    lines: DebugLines,
}

impl DebugLineRenderer {
    pub(crate) fn new(
        ctx: &RenderCtx<'_>,
        max_lines: usize,
        shader: &ShaderSource,
        projection: &ProjectionUniform,
    ) -> Result<Self> {
        let module = compile_shader(ctx, shader)?;

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprig debug line pipeline layout"),
            bind_group_layouts: &[projection.layout()],
            immediate_size: 0,
        });

        let pipeline = create_pipeline(
            ctx,
            &wgpu::RenderPipelineDescriptor {
                label: Some("sprig debug line pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[LinePoint::layout()],
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
                    topology: wgpu::PrimitiveTopology::LineList,
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

        // wgpu rejects zero-sized vertex buffers bound for drawing; keep one line of room.
        let size = (max_lines.max(1) * 2 * std::mem::size_of::<LinePoint>()) as u64;
        let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprig debug line vbo"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline,
            vbo,
            lines: DebugLines::new(max_lines),
        })
    }

    pub fn add_line(&mut self, p1: Vec2, p2: Vec2) -> Result<()> {
        self.lines.add_line(p1, p2)
    }

    pub fn add_rect(&mut self, min: Vec2, max: Vec2) -> Result<()> {
        self.lines.add_rect(min, max)
    }

    #[inline]
    pub fn lines(&self) -> &DebugLines {
        &self.lines
    }

    /// Discards queued lines without drawing them.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn destroy(&mut self) {
        self.lines.clear();
        self.vbo.destroy();
    }

    /// Draws every queued line and clears the list. Returns the number of draw calls.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        projection: &ProjectionUniform,
    ) -> usize {
        if self.lines.is_empty() {
            return 0;
        }

        ctx.queue
            .write_buffer(&self.vbo, 0, bytemuck::cast_slice(self.lines.points()));

        {
            let mut rpass = begin_load_pass(target.encoder, target.color_view, "sprig debug line pass");
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, projection.bind_group(), &[]);
            rpass.set_vertex_buffer(0, self.vbo.slice(..));
            rpass.draw(0..self.lines.point_count() as u32, 0..1);
        }

        log::trace!("debug lines: {} points", self.lines.point_count());
        self.lines.clear();
        1
    }
}
