//! Command-line interface.
//!
//! Flags override whatever the config file says.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ProxyConfig;

#[derive(Debug, Parser)]
#[command(name = "prompt-proxy")]
#[command(about = "Rewrites model API requests on their way upstream", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Upstream base URL
    #[arg(short, long)]
    pub target: Option<String>,

    /// Listen host
    #[arg(long)]
    pub addr: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Temperature forced onto rewritten requests
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Directory holding the project note files
    #[arg(long)]
    pub context_root: Option<PathBuf>,

    /// Forward verb-generation requests instead of answering them locally
    #[arg(long)]
    pub no_suppress: bool,
}

impl Cli {
    /// Apply every flag that was given.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(target) = &self.target {
            config.upstream.target = target.clone();
        }
        if self.addr.is_some() || self.port.is_some() {
            let (host, port) = split_bind_address(&config.listener.bind_address);
            let host = self.addr.as_deref().unwrap_or(host);
            let port = self.port.map(|p| p.to_string()).unwrap_or_else(|| port.to_string());
            config.listener.bind_address = format!("{}:{}", host, port);
        }
        if let Some(temperature) = self.temperature {
            config.interception.temperature = temperature;
        }
        if let Some(root) = &self.context_root {
            config.context.root_dir = root.clone();
        }
        if self.no_suppress {
            config.interception.suppress_verb_generation = false;
        }
    }
}

fn split_bind_address(address: &str) -> (&str, &str) {
    match address.rsplit_once(':') {
        Some((host, port)) => (host, port),
        None => (address, "8080"),
    }
}
