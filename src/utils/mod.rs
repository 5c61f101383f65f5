use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "fintrack=info";

/// Installs the global tracing subscriber, writing to stderr so command output
/// stays clean. `RUST_LOG` replaces the default `fintrack=info` filter when set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let _ = fmt()
            .with_env_filter(default_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn default_filter(env_directives: Option<String>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    env_directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
