//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

/// Deform-style form demos served over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "oxide-forms-demo")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "DEMO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "DEMO_PORT", default_value_t = 6543)]
    pub port: u16,

    /// Locale used when a request does not pick one.
    #[arg(long, env = "DEMO_LOCALE", default_value = "en")]
    pub default_locale: String,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// The socket address to bind.
    pub fn addr(&self) -> std::io::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    }
}
