use std::borrow::Cow;
use std::path::Path;

use super::error::{RenderError, Result};

/// Per-frame capacities of the pre-allocated GPU buffers.
///
/// Totals are per frame, across all batches: every batch of a frame occupies
/// its own sub-range of the same buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchLimits {
    pub max_batch_vertices: usize,
    pub max_batch_indices: usize,
    pub max_debug_lines: usize,
}

impl BatchLimits {
    /// Limits for `sprites` quads (4 vertices, 6 indices each) and `lines` debug lines.
    pub const fn for_sprites(sprites: usize, lines: usize) -> Self {
        Self {
            max_batch_vertices: sprites * 4,
            max_batch_indices: sprites * 6,
            max_debug_lines: lines,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_batch_vertices == 0 || self.max_batch_indices == 0 {
            return Err(RenderError::InvalidConfig(
                "sprite buffers need a non-zero vertex and index capacity".into(),
            ));
        }
        if self.max_batch_vertices > u32::MAX as usize {
            return Err(RenderError::InvalidConfig(format!(
                "max_batch_vertices {} does not fit 32-bit indices",
                self.max_batch_vertices
            )));
        }
        Ok(())
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self::for_sprites(2000, 100)
    }
}

/// WGSL source plus the symbols the renderer binds against.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: Cow<'static, str>,
    /// Entry points and resource names that must appear in `wgsl`.
    pub required_symbols: Vec<String>,
}

impl ShaderSource {
    pub fn new(
        label: impl Into<String>,
        wgsl: impl Into<Cow<'static, str>>,
        required_symbols: &[&str],
    ) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
            required_symbols: required_symbols.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Reads WGSL from disk, keeping the given required symbols.
    pub fn from_path(path: impl AsRef<Path>, required_symbols: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let wgsl = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), wgsl, required_symbols))
    }

    /// Built-in textured sprite shader.
    pub fn sprite() -> Self {
        Self::new(
            "sprig sprite shader",
            include_str!("shaders/sprite.wgsl"),
            &["vs_main", "fs_main", "projection", "sprite_texture", "sprite_sampler"],
        )
    }

    /// Built-in flat-colour line shader.
    pub fn debug_line() -> Self {
        Self::new(
            "sprig debug line shader",
            include_str!("shaders/debug_line.wgsl"),
            &["vs_main", "fs_main", "projection"],
        )
    }

    /// Checks that every required symbol occurs as a whole identifier.
    pub fn validate(&self) -> Result<()> {
        for symbol in &self.required_symbols {
            if !contains_identifier(&self.wgsl, symbol) {
                return Err(RenderError::MissingShaderSymbol {
                    label: self.label.clone(),
                    symbol: symbol.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Renderer configuration, validated once by `Renderer::new`.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub limits: BatchLimits,
    pub sprite_shader: ShaderSource,
    pub debug_line_shader: ShaderSource,
}

impl RendererConfig {
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        self.sprite_shader.validate()?;
        self.debug_line_shader.validate()
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            limits: BatchLimits::default(),
            sprite_shader: ShaderSource::sprite(),
            debug_line_shader: ShaderSource::debug_line(),
        }
    }
}

fn contains_identifier(src: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    src.match_indices(name).any(|(at, _)| {
        let before = src[..at].chars().next_back();
        let after = src[at + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
