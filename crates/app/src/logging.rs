use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "BENKI_LOG";

/// Install the stderr subscriber. The filter comes from `BENKI_LOG`, falling
/// back to `info` when unset or unparsable.
pub fn init_tracing() {
    let directives = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
