use clap::Parser;
use dnsgate_domain::config::LogFormat;
use dnsgate_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dnsgate")]
#[command(version)]
#[command(about = "dnsgate - HTTP gateway for DNS lookups against well-known public resolvers")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Disable the HTTP response cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        web_port: cli.web_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        log_format: cli.log_format,
        disable_cache: cli.no_cache,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging)?;

    info!("Starting dnsgate v{}", env!("CARGO_PKG_VERSION"));

    let app_state = di::build_app_state(&config)?;

    let web_addr = config.server.socket_addr()?;

    server::start_web_server(web_addr, app_state).await?;

    info!("Server shutdown complete");
    Ok(())
}
