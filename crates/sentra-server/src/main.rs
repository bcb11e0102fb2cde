use std::env;

use sentra_server::config::loader::load_config;
use sentra_server::{observability, AppState};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From SENTRA_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (sentra.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (SENTRA_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }
    if let Ok(path) = env::var("SENTRA_CONFIG") {
        return (path, ConfigSource::EnvironmentVariable);
    }
    ("sentra.toml".to_string(), ConfigSource::Default)
}

#[tokio::main]
async fn main() {
    // Load .env if present, before anything reads the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let (config_path, source) = resolve_config_path();
    let config = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );
    observability::apply_logging_level(&config.logging.level);

    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Startup error: {e}");
            std::process::exit(2);
        }
    };

    let app = sentra_server::router(state);
    let addr = config.server.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(addr = %addr, "Sentra server listening");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
