//! Process-wide structured logging.
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber once at startup with a minimum level and a renderer.

use clap::ValueEnum;
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Minimum level of processed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Output format of log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Renderer {
    /// `console` when stdout is a terminal, otherwise `json`.
    #[default]
    Auto,
    /// Human-readable lines.
    Console,
    /// One JSON object per record.
    Json,
}

impl Renderer {
    /// Resolves [`Renderer::Auto`] against the given terminal state.
    pub fn resolve(self, stdout_is_terminal: bool) -> Renderer {
        match self {
            Renderer::Auto if stdout_is_terminal => Renderer::Console,
            Renderer::Auto => Renderer::Json,
            other => other,
        }
    }
}

/// Installs the global subscriber and the panic hook.
///
/// `RUST_LOG`, when set, takes precedence over `min_level`. Fails if a
/// subscriber is already installed.
pub fn init(
    min_level: LogLevel,
    renderer: Renderer,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from(min_level).into())
            .parse_lossy("")
    });

    match renderer.resolve(std::io::stdout().is_terminal()) {
        Renderer::Json => tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_env_filter(filter)
            .try_init()?,
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init()?,
    }

    install_panic_hook();
    Ok(())
}

/// Logs panics as `unhandled_panic` before the default hook runs.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "unhandled_panic");
        default_hook(info);
    }));
}
