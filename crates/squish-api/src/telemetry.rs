//! Tracing initialization.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize console tracing with a compact format. Filter defaults to
/// debug for this service and tower-http; override with `RUST_LOG`.
pub fn init_telemetry() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(
            // EnvFilter directives match on crate targets, so each workspace
            // member is listed; a bare "squish=" prefix would match nothing.
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "squish_api=debug,squish_storage=debug,squish_processing=debug,squish_core=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(console_fmt)
        .init();
}
