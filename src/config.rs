//! Command-line configuration.

use std::net::SocketAddr;

use clap::Parser;

/// In-memory recipe catalog served over HTTP/JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "recipebox", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, value_name = "HOST:PORT", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}
