//! Structured logging setup
//!
//! Console output for development (pretty/compact), JSON for production,
//! optional daily-rotated log files. Driven entirely by `LoggingConfig`.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Initialize the global subscriber. Call once, before any logging.
pub fn init(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| EnvFilter::new("info"))
        // Quiet the noisy transport internals.
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower=warn".parse().unwrap())
        .add_directive("h2=warn".parse().unwrap());

    let to_file = matches!(config.output.as_str(), "file" | "both");
    let to_stdout = config.output != "file";

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if to_stdout {
        let layer = match config.format.as_str() {
            "json" => fmt::layer().json().with_current_span(true).boxed(),
            "compact" => fmt::layer().compact().boxed(),
            _ => fmt::layer().pretty().with_target(true).boxed(),
        };
        layers.push(layer);
    }

    if to_file {
        std::fs::create_dir_all(&config.directory).ok();
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.directory, "nlsql-server.log");
        layers.push(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    tracing::info!(
        level = %config.level,
        format = %config.format,
        output = %config.output,
        "logging initialized"
    );
}
