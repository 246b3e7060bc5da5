//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use uapx_config::ConfigError;
use uapx_core::CoreError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("cannot read config file: {source}")]
    #[diagnostic(
        code(uapx::config),
        help(
            "Expected a YAML file at {path} with a non-empty `accesspoints` list.\n\
             Pass a different file with --config."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Server ───────────────────────────────────────────────────────
    #[error("cannot listen on port {port}")]
    #[diagnostic(
        code(uapx::bind),
        help("Another process may own the port. Change `global.port` in the config file.")
    )]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics server failed: {0}")]
    #[diagnostic(code(uapx::serve))]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(uapx::metrics))]
    Metrics(#[from] CoreError),
}

impl CliError {
    /// Map this error to an exit code for process termination. A bad
    /// config file exits 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::SUCCESS,
            Self::Bind { .. } | Self::Serve(_) | Self::Metrics(_) => exit_code::GENERAL,
        }
    }
}
