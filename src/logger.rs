use tracing_subscriber::{fmt, EnvFilter};

/// Install the global log subscriber; `RUST_LOG` takes precedence over `debug`
pub fn init(debug: bool) {
    let default_filter = if debug { "srcdump=debug" } else { "srcdump=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: Failed to set global logger: {}", e);
    }
}
