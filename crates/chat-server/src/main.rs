//! Group chat TCP server.

use anyhow::{Context, Result};
use chat_server::config::{Config, IpVersion};
use chat_server::server;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "chat-server")]
#[clap(about = "Multi-user group chat server")]
#[clap(after_help = "Example: chat-server v4 51511")]
struct Cli {
    /// Address family to listen on
    #[clap(value_enum)]
    ip_version: IpVersion,

    /// TCP port to listen on
    #[clap(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code)
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env(cli.ip_version, cli.port).context("invalid configuration")?;

    info!(
        "starting chat-server on {} (max_clients = {}, idle_timeout = {:?})",
        config.socket_addr(),
        config.max_clients,
        config.idle_timeout
    );

    server::run(config).await.context("server stopped")?;
    Ok(())
}
