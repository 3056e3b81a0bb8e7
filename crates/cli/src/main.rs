use clap::Parser;
use switchyard_dns_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod di;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "switchyard-dns")]
#[command(version)]
#[command(about = "Switchyard DNS - rule-routing DNS forwarder with hot config reload")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// UDP port to listen on
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Default upstream nameserver (repeatable, replaces the configured list)
    #[arg(short = 'u', long = "upstream", value_name = "ADDR")]
    upstreams: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        default_upstreams: if cli.upstreams.is_empty() {
            None
        } else {
            Some(cli.upstreams.clone())
        },
    };

    let (config_path, config) = bootstrap::load_config(cli.config.as_deref(), overrides.clone())?;
    bootstrap::init_logging(&config);

    info!(
        config = %config_path,
        "Starting Switchyard DNS v{}",
        env!("CARGO_PKG_VERSION")
    );

    let services = di::Services::build(&config, config_path, overrides).await?;

    tokio::select! {
        _ = services.server.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
