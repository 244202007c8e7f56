use sprig_engine::coords::{Rect, Vec2};
use sprig_engine::render::{Drawable, TextureId, Vertex, QUAD_INDICES};

/// Textured quad at a world position.
///
/// Vertices are local to the sprite (top-left at the origin); the position is
/// applied by the renderer as the draw offset.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub position: Vec2,
    size: Vec2,
    texture: TextureId,
    quad: [Vertex; 4],
}

impl Sprite {
    /// Quad showing the whole texture once.
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self::tiled(texture, size, size)
    }

    /// Quad repeating the texture every `tile` logical pixels.
    pub fn tiled(texture: TextureId, size: Vec2, tile: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            texture,
            quad: tiled_quad(size, tile),
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

impl Drawable for Sprite {
    fn vertices(&self) -> &[Vertex] {
        &self.quad
    }

    fn indices(&self) -> &[u32] {
        &QUAD_INDICES
    }

    fn texture(&self) -> TextureId {
        self.texture
    }

    fn offset(&self) -> Option<Vec2> {
        Some(self.position)
    }
}

fn tiled_quad(size: Vec2, tile: Vec2) -> [Vertex; 4] {
    let u = if tile.x > 0.0 { size.x / tile.x } else { 1.0 };
    let v = if tile.y > 0.0 { size.y / tile.y } else { 1.0 };
    [
        Vertex::new(0.0, 0.0, 0.0, 0.0),
        Vertex::new(size.x, 0.0, u, 0.0),
        Vertex::new(size.x, size.y, u, v),
        Vertex::new(0.0, size.y, 0.0, v),
    ]
}

/// Player-controlled sprite.
#[derive(Debug, Clone)]
pub struct Player {
    pub sprite: Sprite,
    pub speed: f32,
}

impl Player {
    /// Moves along `direction` (normalized here) and keeps the sprite inside `area`.
    pub fn update(&mut self, dt: f32, direction: Vec2, area: Rect) {
        self.sprite.position += direction.normalized_or_zero() * (self.speed * dt);
        self.sprite.position = self.sprite.bounds().clamped_into(area).origin;
    }
}

/// Sprite drifting right to left.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub sprite: Sprite,
    pub speed: f32,
}

impl Enemy {
    pub fn update(&mut self, dt: f32) {
        self.sprite.position.x -= self.speed * dt;
    }

    /// True once the enemy has drifted past `threshold` on the left.
    #[inline]
    pub fn is_past(&self, threshold: f32) -> bool {
        self.sprite.position.x < threshold
    }
}
