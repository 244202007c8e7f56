//! Shared pipeline plumbing for the sprite and debug-line renderers.

use super::config::ShaderSource;
use super::error::{RenderError, Result};
use super::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha "over" blending (`src * a + dst * (1 - a)`).
///
/// Sprite textures are uploaded as decoded, without premultiplication.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── shader ────────────────────────────────────────────────────────────────

/// Creates a shader module and fails on any compiler error.
///
/// Blocks on the compilation info; only called during renderer setup.
pub(super) fn compile_shader(ctx: &RenderCtx<'_>, source: &ShaderSource) -> Result<wgpu::ShaderModule> {
    source.validate()?;

    let module = validated(
        ctx,
        || {
            ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&source.label),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.clone()),
            })
        },
        |log| RenderError::ShaderCompile {
            label: source.label.clone(),
            log,
        },
    )?;

    let info = pollster::block_on(module.get_compilation_info());
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if !errors.is_empty() {
        return Err(RenderError::ShaderCompile {
            label: source.label.clone(),
            log: errors.join("\n"),
        });
    }

    for warning in info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Warning))
    {
        log::warn!("{}: {}", source.label, warning.message);
    }

    Ok(module)
}

/// Creates a render pipeline, returning `PipelineCreation` if the device rejects it.
pub(super) fn create_pipeline(
    ctx: &RenderCtx<'_>,
    desc: &wgpu::RenderPipelineDescriptor<'_>,
) -> Result<wgpu::RenderPipeline> {
    let label = desc.label.unwrap_or("render pipeline");
    validated(
        ctx,
        || ctx.device.create_render_pipeline(desc),
        |log| RenderError::PipelineCreation {
            label: label.to_string(),
            log,
        },
    )
}

/// Runs `create` inside a validation error scope.
///
/// Without a scope wgpu hands validation errors to the uncaptured-error
/// handler, which panics by default.
fn validated<T>(
    ctx: &RenderCtx<'_>,
    create: impl FnOnce() -> T,
    on_error: impl FnOnce(String) -> RenderError,
) -> Result<T> {
    let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let error = pollster::block_on(scope.pop());
    scope_result(error, on_error).map(|()| value)
}

fn scope_result(
    error: Option<wgpu::Error>,
    on_error: impl FnOnce(String) -> RenderError,
) -> Result<()> {
    match error {
        None => Ok(()),
        Some(err) => Err(on_error(err.to_string())),
    }
}

// ── pass ──────────────────────────────────────────────────────────────────

/// Opens a pass that draws over whatever the frame already contains.
pub(super) fn begin_load_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_error(description: &str) -> wgpu::Error {
        wgpu::Error::Validation {
            source: Box::new(std::io::Error::other("naga")),
            description: description.to_string(),
        }
    }

    // ── error scopes ──────────────────────────────────────────────────────

    #[test]
    fn empty_scope_is_ok() {
        let out = scope_result(None, RenderError::InvalidConfig);
        assert!(out.is_ok());
    }

    #[test]
    fn captured_shader_error_becomes_compile_error() {
        let err = scope_result(Some(validation_error("expected `)`, found `fs_main`")), |log| {
            RenderError::ShaderCompile {
                label: "x".to_string(),
                log,
            }
        })
        .unwrap_err();

        match err {
            RenderError::ShaderCompile { label, log } => {
                assert_eq!(label, "x");
                assert!(log.contains("found `fs_main`"));
            }
            other => panic!("expected ShaderCompile, got {other:?}"),
        }
    }

    #[test]
    fn captured_pipeline_error_keeps_the_label() {
        let err = scope_result(Some(validation_error("entry point `vs_main` not found")), |log| {
            RenderError::PipelineCreation {
                label: "sprig sprite pipeline".to_string(),
                log,
            }
        })
        .unwrap_err();

        assert!(matches!(err, RenderError::PipelineCreation { ref label, .. } if label == "sprig sprite pipeline"));
        assert!(err.to_string().contains("vs_main"));
    }

    #[test]
    fn alpha_blend_is_straight_over() {
        let blend = alpha_blend();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }
}
