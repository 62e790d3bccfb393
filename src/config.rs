//! Command-line interface and the validated runtime configuration built from it.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;

/// sqlchat - ask questions in plain language, get (mock) SQL back
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP API (items and /nl2sql)
    Serve {
        /// Address to bind
        #[arg(long, env = "SQLCHAT_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(short, long, env = "SQLCHAT_PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Open the desktop chat front end
    Chat {
        /// Base URL of the API serving /nl2sql
        #[arg(long, env = "SQLCHAT_API_URL", default_value = "http://localhost:8000")]
        api_url: String,

        /// Per-request timeout for /nl2sql calls; unset means wait forever
        #[arg(long, env = "SQLCHAT_REQUEST_TIMEOUT_SECS")]
        request_timeout_secs: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            bail!("server host must not be empty");
        }
        Ok(Self { host, port })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, request_timeout_secs: Option<u64>) -> Result<Self> {
        let api_url = api_url.into();
        let parsed = reqwest::Url::parse(&api_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("api url must use http or https: {api_url}");
        }

        let request_timeout = match request_timeout_secs {
            Some(0) => bail!("request timeout must be at least one second"),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }
}
