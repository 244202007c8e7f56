use std::sync::Once;

/// Logger configuration.
///
/// Filters use `env_logger` syntax (e.g. "info", "sprig_engine=debug,wgpu_core=warn").
/// Precedence: `env_filter`, then `RUST_LOG`, then `default_filter`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_filter: String,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            // wgpu internals are chatty at info.
            default_filter: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(&config, env.as_deref());

        env_logger::Builder::new()
            .parse_filters(filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter `{filter}`");
    });
}

fn resolve_filter<'a>(config: &'a LoggingConfig, env: Option<&'a str>) -> &'a str {
    config
        .env_filter
        .as_deref()
        .or(env.filter(|f| !f.trim().is_empty()))
        .unwrap_or(&config.default_filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        let config = LoggingConfig {
            env_filter: Some("debug".into()),
            ..Default::default()
        };
        assert_eq!(resolve_filter(&config, Some("trace")), "debug");
    }

    #[test]
    fn env_used_when_no_explicit_filter() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("sprig_game=trace")), "sprig_game=trace");
    }

    #[test]
    fn blank_env_falls_back_to_default() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("  ")), config.default_filter);
        assert_eq!(resolve_filter(&config, None), config.default_filter);
    }
}
