use std::net::{IpAddr, Ipv4Addr};

use anyhow::Context;
use clap::Parser;
use resolver_proxy_host::config::DEFAULT_PORT;
use resolver_proxy_host::{HostConfig, boot, build_state, run as run_host};

#[derive(Debug, Parser)]
#[command(name = "resolver-proxy")]
struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Port to serve the HTTP server on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Print the resolved config and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "resolver proxy failed");
        eprintln!("resolver-proxy: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = HostConfig::from_env()?.with_bind(cli.bind, cli.port);
    if cli.print_config {
        println!("{}", cfg.explain());
        return Ok(());
    }
    boot::init(&cfg)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let state = build_state(&cfg, runtime.handle().clone());
    runtime.block_on(run_host(&cfg, state))
}
