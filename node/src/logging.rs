//! # Structured Logging
//!
//! `tracing` subscriber setup. Output goes to stderr; format is pretty for
//! humans or JSON lines for log aggregation. `RUST_LOG` overrides the
//! default directives when set.

use tracing_subscriber::EnvFilter;

/// Filtering applied when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "vernal_node=info,vernal_protocol=info,tower_http=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// Machine-parseable JSON lines for production aggregation.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively. Anything unrecognized
    /// falls back to `Pretty` rather than refusing to boot over a typo.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Installs the global subscriber. Call exactly once, early in `main()`;
/// a second call panics.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    tracing::debug!(?format, "logging initialized");
}
