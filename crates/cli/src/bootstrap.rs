use switchyard_dns_domain::{CliOverrides, Config};
use tracing_subscriber::EnvFilter;

/// Resolves the config path and loads it with CLI overrides applied.
/// Returns the path too; the reload watcher keeps stat'ing it.
pub fn load_config(
    explicit_path: Option<&str>,
    overrides: CliOverrides,
) -> anyhow::Result<(String, Config)> {
    let path = Config::resolve_path(explicit_path)?;
    let config = Config::load(Some(&path), overrides)?;
    Ok((path, config))
}

/// `RUST_LOG` wins over the configured level so a one-off debug run needs
/// no config edit.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
