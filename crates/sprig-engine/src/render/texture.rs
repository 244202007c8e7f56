use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::RenderCtx;

/// Opaque handle to a texture loaded into a [`TextureTable`].
///
/// Handles are compared by value; two requests batch together iff their
/// handles are equal. Handles are never reused within one table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(pub(crate) u64);

impl TextureId {
    /// Raw handle value (for logging and sorting).
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Error returned by texture loading and lookup.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing texture: {0}")]
    MissingTexture(String),

    #[error("failed to decode texture `{name}` from {}", path.display())]
    Decode {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture `{name}` has invalid dimensions {width}x{height}")]
    InvalidDimensions { name: String, width: u32, height: u32 },
}

/// Name-keyed resource storage handing out stable [`TextureId`]s.
///
/// The table owns every value; callers hold ids (or short-lived borrows) only.
/// Re-inserting a name replaces the old value and issues a fresh id, so stale
/// ids resolve to `None` instead of to the replacement.
#[derive(Debug)]
pub struct ResourceTable<T> {
    by_name: HashMap<String, TextureId>,
    entries: HashMap<TextureId, (String, T)>,
    next_id: u64,
}

impl<T> Default for ResourceTable<T> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
            entries: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> ResourceTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) -> TextureId {
        let name = name.into();
        if let Some(old) = self.by_name.remove(&name) {
            self.entries.remove(&old);
        }

        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.by_name.insert(name.clone(), id);
        self.entries.insert(id, (name, value));
        id
    }

    /// Looks up the handle registered under `name`.
    pub fn id(&self, name: &str) -> Result<TextureId, AssetError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::MissingTexture(name.to_string()))
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.entries.get(&id).map(|(_, v)| v)
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn name_of(&self, id: TextureId) -> Option<&str> {
        self.entries.get(&id).map(|(n, _)| n.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let id = self.by_name.remove(name)?;
        self.entries.remove(&id).map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry, returning the names in id order.
    pub fn drain_names(&mut self) -> Vec<String> {
        let mut ids: Vec<TextureId> = self.entries.keys().copied().collect();
        ids.sort();
        let names = ids
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|(n, _)| n))
            .collect();
        self.by_name.clear();
        names
    }
}

/// GPU texture with its view and sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Uploads straight-alpha RGBA8 pixels.
    ///
    /// Sampling is nearest-neighbour with repeat addressing (pixel-art sprites).
    pub fn from_rgba(ctx: &RenderCtx<'_>, label: &str, image: &image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }
}

/// Textures keyed by name, loaded from `<root>/<name>.png`.
pub struct TextureTable {
    root: PathBuf,
    table: ResourceTable<Texture>,
}

impl TextureTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            table: ResourceTable::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a texture named `name` is loaded from.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.png"))
    }

    /// Decodes `<root>/<name>.png` and uploads it.
    pub fn load(&mut self, ctx: &RenderCtx<'_>, name: &str) -> Result<TextureId, AssetError> {
        let path = self.path_for(name);
        let decoded = image::open(&path).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        let id = self.insert_rgba(ctx, name, &decoded.to_rgba8())?;
        log::info!("loaded texture `{name}` from {}", path.display());
        Ok(id)
    }

    /// Uploads already-decoded pixels under `name`.
    pub fn insert_rgba(
        &mut self,
        ctx: &RenderCtx<'_>,
        name: &str,
        image: &image::RgbaImage,
    ) -> Result<TextureId, AssetError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidDimensions {
                name: name.to_string(),
                width,
                height,
            });
        }

        let texture = Texture::from_rgba(ctx, name, image);
        Ok(self.table.insert(name, texture))
    }

    pub fn id(&self, name: &str) -> Result<TextureId, AssetError> {
        self.table.id(name)
    }

    pub(crate) fn resources(&self) -> &ResourceTable<Texture> {
        &self.table
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.table.get(id)
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.table.contains(id)
    }

    /// Pixel size of a loaded texture.
    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.table.get(id).map(|t| (t.width, t.height))
    }

    pub fn unload(&mut self, name: &str) -> bool {
        self.table.remove(name).is_some()
    }

    /// Releases every texture.
    pub fn unload_all(&mut self) {
        for name in self.table.drain_names() {
            log::info!("unloaded texture: {name}");
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
