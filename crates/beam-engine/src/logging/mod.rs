//! Process-wide logger setup on top of the `log` facade.

use std::sync::Once;

use env_logger::WriteStyle;

/// wgpu and naga are noisy at `info`; the rest of the process is not.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger settings, usually filled from the game configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` directives such as `"debug"` or `"beam_game=trace,wgpu_core=warn"`.
    /// Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
    /// Include the emitting module in each line.
    pub module_path: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: WriteStyle::Auto,
            module_path: true,
        }
    }
}

/// Picks the filter: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
///
/// Blank values count as unset.
pub fn resolve_filter(explicit: Option<&str>, rust_log: Option<&str>) -> String {
    [explicit, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(config.env_filter.as_deref(), rust_log.as_deref());

        let result = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_module_path(config.module_path)
            .try_init();

        match result {
            Ok(()) => log::debug!("logging initialized with '{filter}'"),
            Err(e) => eprintln!("logger already installed: {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        assert_eq!(resolve_filter(Some("debug"), Some("warn")), "debug");
    }

    #[test]
    fn rust_log_is_second() {
        assert_eq!(resolve_filter(None, Some("beam_game=trace")), "beam_game=trace");
        assert_eq!(resolve_filter(Some("  "), Some("warn")), "warn");
    }

    #[test]
    fn default_quiets_gpu_internals() {
        let f = resolve_filter(None, None);
        assert_eq!(f, DEFAULT_FILTER);
        assert!(f.contains("wgpu_core=warn"));
    }
}
