use super::error::Result;
use super::geometry::GeometryBuffer;
use super::request::DrawRequest;
use super::texture::TextureId;

/// Receiver of completed batches.
///
/// For every batch the emitter calls `bind_texture` exactly once, immediately
/// followed by exactly one `draw`. The geometry is only valid for the
/// duration of the `draw` call; it is cleared afterwards.
pub trait BatchSink {
    fn bind_texture(&mut self, texture: TextureId) -> Result<()>;
    fn draw(&mut self, geometry: &GeometryBuffer) -> Result<()>;
}

/// Counters for one `emit` run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub batches: usize,
    pub draw_calls: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// Splits an ordered request stream into texture-contiguous batches.
///
/// A batch ends exactly where a request's texture differs from the previous
/// request's texture. Requests without vertices are skipped and never
/// produce an empty batch.
#[derive(Debug, Default)]
pub struct BatchEmitter {
    geometry: GeometryBuffer,
    current: Option<TextureId>,
}

impl BatchEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitter whose buffer is pre-sized for one full batch.
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            geometry: GeometryBuffer::with_capacity(vertices, indices),
            current: None,
        }
    }

    /// Batches `requests` in order and hands each batch to `sink`.
    ///
    /// On error the emitter is reset: the buffer is empty and no texture is
    /// current, so the next call starts clean.
    pub fn emit<S: BatchSink + ?Sized>(
        &mut self,
        requests: &[DrawRequest<'_>],
        sink: &mut S,
    ) -> Result<FrameStats> {
        let mut stats = FrameStats::default();
        let out = self.emit_inner(requests, sink, &mut stats);
        self.reset();
        out.map(|()| stats)
    }

    fn emit_inner<S: BatchSink + ?Sized>(
        &mut self,
        requests: &[DrawRequest<'_>],
        sink: &mut S,
        stats: &mut FrameStats,
    ) -> Result<()> {
        for request in requests {
            request.validate()?;
            if request.vertices.is_empty() {
                continue;
            }

            if self.current.is_some_and(|t| t != request.texture) {
                self.flush(sink, stats)?;
            }
            self.current = Some(request.texture);
            self.geometry.append(request.vertices, request.indices, request.offset)?;
        }
        self.flush(sink, stats)
    }

    fn flush<S: BatchSink + ?Sized>(&mut self, sink: &mut S, stats: &mut FrameStats) -> Result<()> {
        let Some(texture) = self.current else { return Ok(()) };
        if self.geometry.is_empty() {
            return Ok(());
        }

        sink.bind_texture(texture)?;
        sink.draw(&self.geometry)?;

        stats.batches += 1;
        stats.draw_calls += 1;
        stats.vertices += self.geometry.vertex_count();
        stats.indices += self.geometry.index_count();

        self.geometry.clear();
        Ok(())
    }

    fn reset(&mut self) {
        self.geometry.clear();
        self.current = None;
    }

    /// Current (unflushed) geometry. Empty between `emit` calls.
    #[inline]
    pub fn geometry(&self) -> &GeometryBuffer {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::render::error::RenderError;
    use crate::render::vertex::{quad_vertices, Vertex, QUAD_INDICES};

    #[derive(Debug, PartialEq)]
    enum Call {
        Bind(TextureId),
        Draw { vertices: Vec<Vertex>, indices: Vec<u32> },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_draw: bool,
    }

    impl Recorder {
        fn draws(&self) -> Vec<(&[Vertex], &[u32])> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw { vertices, indices } => Some((vertices.as_slice(), indices.as_slice())),
                    Call::Bind(_) => None,
                })
                .collect()
        }
    }

    impl BatchSink for Recorder {
        fn bind_texture(&mut self, texture: TextureId) -> Result<()> {
            self.calls.push(Call::Bind(texture));
            Ok(())
        }

        fn draw(&mut self, geometry: &GeometryBuffer) -> Result<()> {
            if self.fail_draw {
                return Err(RenderError::InvalidConfig("sink refused".into()));
            }
            self.calls.push(Call::Draw {
                vertices: geometry.vertices().to_vec(),
                indices: geometry.indices().to_vec(),
            });
            Ok(())
        }
    }

    fn quad(texture: u64, quad: &[Vertex; 4]) -> DrawRequest<'_> {
        DrawRequest::new(quad, &QUAD_INDICES, TextureId(texture))
    }

    // ── boundaries ────────────────────────────────────────────────────────

    #[test]
    fn empty_input_draws_nothing() {
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&[], &mut sink).unwrap();

        assert!(sink.calls.is_empty());
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn single_texture_is_one_draw_with_summed_indices() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(7, &q), quad(7, &q), quad(7, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&reqs, &mut sink).unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.indices, 18);
        let draws = sink.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].1.len(), 18);
    }

    #[test]
    fn k_texture_changes_give_k_plus_one_draws_each_after_a_bind() {
        let q = quad_vertices(1.0, 1.0);
        // A A B A C C -> changes at 2, 3, 4 -> 4 batches
        let reqs = [quad(0, &q), quad(0, &q), quad(1, &q), quad(0, &q), quad(2, &q), quad(2, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&reqs, &mut sink).unwrap();

        assert_eq!(stats.batches, 4);
        assert_eq!(sink.calls.len(), 8);
        let binds: Vec<_> = sink
            .calls
            .chunks(2)
            .map(|pair| match (&pair[0], &pair[1]) {
                (Call::Bind(t), Call::Draw { .. }) => *t,
                other => panic!("expected bind then draw, got {other:?}"),
            })
            .collect();
        assert_eq!(binds, vec![TextureId(0), TextureId(1), TextureId(0), TextureId(2)]);
    }

    #[test]
    fn empty_requests_do_not_split_or_flush() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(0, &q), DrawRequest::new(&[], &[], TextureId(5)), quad(0, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&reqs, &mut sink).unwrap();

        assert_eq!(stats.batches, 1);
        assert_eq!(sink.calls[0], Call::Bind(TextureId(0)));
    }

    // ── empty requests ────────────────────────────────────────────────────
    // A, empty B, A is one batch of A: the empty request is skipped before
    // the texture comparison, so it neither closes A nor binds B.

    #[test]
    fn empty_request_between_same_texture_keeps_one_batch() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(0, &q), DrawRequest::new(&[], &[], TextureId(1)), quad(0, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&reqs, &mut sink).unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert_eq!(sink.calls.len(), 2);
        assert_eq!(sink.calls[0], Call::Bind(TextureId(0)));
        let (vertices, indices) = sink.draws()[0];
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 12);
    }

    #[test]
    fn frame_of_only_empty_requests_binds_nothing() {
        let reqs = [DrawRequest::new(&[], &[], TextureId(1)), DrawRequest::new(&[], &[], TextureId(2))];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let stats = e.emit(&reqs, &mut sink).unwrap();

        assert!(sink.calls.is_empty());
        assert_eq!(stats, FrameStats::default());
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn indices_stay_below_batch_vertex_count() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(0, &q), quad(0, &q), quad(1, &q), quad(1, &q), quad(1, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        e.emit(&reqs, &mut sink).unwrap();

        for (vertices, indices) in sink.draws() {
            assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        }
    }

    #[test]
    fn offset_quad_is_drawn_translated() {
        let q = quad_vertices(1.0, 1.0);
        let req = quad(3, &q).with_offset(Vec2::new(10.0, 20.0));
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        e.emit(&[req], &mut sink).unwrap();

        let draws = sink.draws();
        assert_eq!(draws.len(), 1);
        let (vertices, indices) = draws[0];
        assert_eq!(indices.len(), 6);
        for (out, src) in vertices.iter().zip(q.iter()) {
            assert_eq!(out.position, [src.position[0] + 10.0, src.position[1] + 20.0]);
        }
    }

    #[test]
    fn two_textures_bind_in_order() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(10, &q), quad(11, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        e.emit(&reqs, &mut sink).unwrap();

        assert_eq!(sink.calls.len(), 4);
        assert_eq!(sink.calls[0], Call::Bind(TextureId(10)));
        assert_eq!(sink.calls[2], Call::Bind(TextureId(11)));
        // Each batch restarts at vertex 0.
        assert_eq!(sink.draws()[1].1, &QUAD_INDICES);
    }

    #[test]
    fn second_request_in_batch_is_rebased_by_four() {
        let q = quad_vertices(1.0, 1.0);
        let reqs = [quad(0, &q), quad(0, &q)];
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        e.emit(&reqs, &mut sink).unwrap();

        let (_, indices) = sink.draws()[0];
        let shifted: Vec<u32> = QUAD_INDICES.iter().map(|i| i + 4).collect();
        assert_eq!(&indices[6..], shifted.as_slice());
    }

    #[test]
    fn buffer_is_empty_after_emit() {
        let q = quad_vertices(1.0, 1.0);
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        e.emit(&[quad(0, &q), quad(1, &q)], &mut sink).unwrap();

        assert!(e.geometry().is_empty());
        assert_eq!(e.geometry().index_count(), 0);
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn malformed_request_resets_emitter() {
        let q = quad_vertices(1.0, 1.0);
        let bad = DrawRequest::new(&q, &[0, 1, 8], TextureId(0));
        let mut e = BatchEmitter::new();
        let mut sink = Recorder::default();
        let err = e.emit(&[quad(0, &q), bad], &mut sink).unwrap_err();

        assert!(matches!(err, RenderError::IndexOutOfRange { index: 8, .. }));
        assert!(e.geometry().is_empty());

        // Next frame starts from a clean slate.
        let mut sink = Recorder::default();
        let stats = e.emit(&[quad(1, &q)], &mut sink).unwrap();
        assert_eq!(stats.batches, 1);
        assert_eq!(sink.draws()[0].0.len(), 4);
    }

    #[test]
    fn sink_failure_propagates() {
        let q = quad_vertices(1.0, 1.0);
        let mut e = BatchEmitter::new();
        let mut sink = Recorder { fail_draw: true, ..Default::default() };
        assert!(e.emit(&[quad(0, &q)], &mut sink).is_err());
        assert!(e.geometry().is_empty());
    }
}
