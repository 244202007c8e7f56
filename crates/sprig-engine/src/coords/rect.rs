use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// True when the interiors overlap (touching edges do not count).
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        a0.x < b1.x && b0.x < a1.x && a0.y < b1.y && b0.y < a1.y
    }

    /// Moves the rectangle the least distance needed to lie within `outer`.
    ///
    /// A rectangle larger than `outer` on an axis is pinned to `outer`'s min edge.
    pub fn clamped_into(self, outer: Rect) -> Rect {
        let clamp_axis = |pos: f32, len: f32, lo: f32, hi: f32| {
            if len >= hi - lo { lo } else { pos.clamp(lo, hi - len) }
        };
        let (lo, hi) = (outer.min(), outer.max());
        Rect::new(
            clamp_axis(self.origin.x, self.size.x, lo.x, hi.x),
            clamp_axis(self.origin.y, self.size.y, lo.y, hi.y),
            self.size.x,
            self.size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(10.0, 10.0, 5.0, 5.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(10.0, 10.0, 5.0, 5.0).contains(Vec2::new(15.0, 15.0)));
    }

    // ── overlaps ──────────────────────────────────────────────────────────

    #[test]
    fn overlapping_rects() {
        assert!(r(0.0, 0.0, 10.0, 10.0).overlaps(r(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).overlaps(r(10.0, 0.0, 10.0, 10.0)));
    }

    // ── clamped_into ──────────────────────────────────────────────────────

    #[test]
    fn inside_rect_is_unchanged() {
        let outer = r(0.0, 0.0, 480.0, 270.0);
        assert_eq!(r(20.0, 30.0, 16.0, 16.0).clamped_into(outer), r(20.0, 30.0, 16.0, 16.0));
    }

    #[test]
    fn rect_past_right_bottom_is_pulled_back() {
        let outer = r(0.0, 0.0, 480.0, 270.0);
        let c = r(470.0, 300.0, 16.0, 16.0).clamped_into(outer);
        assert_eq!(c.origin, Vec2::new(464.0, 254.0));
    }

    #[test]
    fn rect_past_left_top_is_pulled_back() {
        let outer = r(0.0, 0.0, 480.0, 270.0);
        let c = r(-5.0, -1.0, 16.0, 16.0).clamped_into(outer);
        assert_eq!(c.origin, Vec2::ZERO);
    }

    #[test]
    fn oversized_rect_pins_to_min_edge() {
        let c = r(50.0, 0.0, 100.0, 5.0).clamped_into(r(0.0, 0.0, 40.0, 40.0));
        assert_eq!(c.origin.x, 0.0);
    }

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
