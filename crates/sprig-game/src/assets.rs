use image::{Rgba, RgbaImage};
use sprig_engine::render::{AssetError, RenderCtx, TextureId, TextureTable};

/// Texture handles used by the scene.
#[derive(Debug, Copy, Clone)]
pub struct Assets {
    pub wizard: TextureId,
    pub black_mage: TextureId,
    pub sky: TextureId,
    pub grass: TextureId,
}

impl Assets {
    /// Loads every scene texture, substituting a generated image for any
    /// file that is missing or fails to decode.
    pub fn load(ctx: &RenderCtx<'_>, textures: &mut TextureTable) -> Result<Self, AssetError> {
        Ok(Self {
            wizard: load_or(ctx, textures, "wizard", || checker(16, [92, 72, 190, 255]))?,
            black_mage: load_or(ctx, textures, "black_mage", || checker(16, [190, 48, 64, 255]))?,
            sky: load_or(ctx, textures, "sky", || sky_gradient(64, 64))?,
            grass: load_or(ctx, textures, "grass", || grass_stripes(32, 68))?,
        })
    }
}

fn load_or(
    ctx: &RenderCtx<'_>,
    textures: &mut TextureTable,
    name: &str,
    fallback: impl FnOnce() -> RgbaImage,
) -> Result<TextureId, AssetError> {
    let path = textures.path_for(name);
    if path.is_file() {
        match textures.load(ctx, name) {
            Ok(id) => return Ok(id),
            Err(err) => log::warn!("{err}; using placeholder"),
        }
    } else {
        log::warn!("texture `{name}` not found at {}; using placeholder", path.display());
    }
    textures.insert_rgba(ctx, name, &fallback())
}

// ── placeholders ──────────────────────────────────────────────────────────

/// Two-tone checkerboard of 4px cells with a transparent one-pixel border.
pub(crate) fn checker(size: u32, tint: [u8; 4]) -> RgbaImage {
    let dark = [tint[0] / 2, tint[1] / 2, tint[2] / 2, tint[3]];
    RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 || y == 0 || x + 1 == size || y + 1 == size {
            Rgba([0, 0, 0, 0])
        } else if (x / 4 + y / 4) % 2 == 0 {
            Rgba(tint)
        } else {
            Rgba(dark)
        }
    })
}

/// Vertical gradient, deep blue at the top to pale blue at the bottom.
pub(crate) fn sky_gradient(width: u32, height: u32) -> RgbaImage {
    let (top, bottom) = ([40.0, 60.0, 140.0], [150.0, 200.0, 235.0]);
    let span = height.saturating_sub(1).max(1) as f32;
    RgbaImage::from_fn(width, height, |_, y| {
        let t = y as f32 / span;
        let c = |i: usize| (top[i] + (bottom[i] - top[i]) * t).round() as u8;
        Rgba([c(0), c(1), c(2), 255])
    })
}

/// Green vertical stripes with a lighter top edge.
pub(crate) fn grass_stripes(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if y < 3 {
            Rgba([120, 200, 90, 255])
        } else if (x / 4) % 2 == 0 {
            Rgba([52, 130, 60, 255])
        } else {
            Rgba([40, 110, 50, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_has_transparent_border() {
        let img = checker(16, [200, 100, 50, 255]);
        assert_eq!(img.dimensions(), (16, 16));
        assert_eq!(img.get_pixel(0, 7)[3], 0);
        assert_eq!(img.get_pixel(15, 15)[3], 0);
        assert_eq!(img.get_pixel(1, 1), &Rgba([200, 100, 50, 255]));
        assert_eq!(img.get_pixel(5, 1), &Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn sky_gradient_runs_top_to_bottom() {
        let img = sky_gradient(4, 64);
        assert_eq!(img.get_pixel(0, 0), &Rgba([40, 60, 140, 255]));
        assert_eq!(img.get_pixel(3, 63), &Rgba([150, 200, 235, 255]));
        assert!(img.get_pixel(0, 32)[2] > 140);
    }

    #[test]
    fn single_row_sky_does_not_divide_by_zero() {
        let img = sky_gradient(2, 1);
        assert_eq!(img.get_pixel(1, 0), &Rgba([40, 60, 140, 255]));
    }

    #[test]
    fn grass_is_opaque() {
        let img = grass_stripes(32, 68);
        assert!(img.pixels().all(|p| p[3] == 255));
        assert_ne!(img.get_pixel(0, 10), img.get_pixel(4, 10));
    }
}
