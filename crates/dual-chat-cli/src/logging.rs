use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the tracing subscriber. `RUST_LOG` wins; otherwise `--debug`
/// selects debug output for the workspace crates and warnings elsewhere.
/// Records from the `log` crate are forwarded too.
pub fn init_logging(debug: bool) {
    let fallback = if debug {
        "warn,chat_core=debug,chat_state=debug,backend_client=debug,dual_chat=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            fmt::layer()
                .with_target(debug)
                .with_line_number(debug)
                .with_writer(std::io::stderr),
        )
        .init();
}
