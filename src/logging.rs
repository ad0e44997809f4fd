//! Diagnostic logging setup.
//!
//! Menu prompts and report previews go to stdout through `println!`; log
//! events go to stderr so the two never interleave on one stream.
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Level defaults to `info` and can be
/// overridden with `RUST_LOG`, e.g. `RUST_LOG=mgnrega_report=debug`.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
