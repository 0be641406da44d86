//! Command-line surface and the typed display options shared by the sampler,
//! the render side and the input prompts.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

use crate::sort::SortKey;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MONITOR_PORT: u16 = 8222;
pub const DEFAULT_CONN_LIMIT: u32 = 1024;
pub const DEFAULT_DELAY_SECS: u64 = 1;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "natstop",
    about = "Live terminal monitor for a NATS server",
    disable_version_flag = true
)]
pub struct Cli {
    /// The NATS server host.
    #[arg(short = 's', long = "server", default_value = DEFAULT_HOST)]
    pub host: String,

    /// The NATS server monitoring port.
    #[arg(short = 'm', long = "monitor-port", default_value_t = DEFAULT_MONITOR_PORT)]
    pub port: u16,

    /// Maximum number of connections to poll.
    #[arg(short = 'n', long = "conns", default_value_t = DEFAULT_CONN_LIMIT)]
    pub conns: u32,

    /// Refresh interval in seconds (at least 1).
    #[arg(
        short = 'd',
        long = "delay",
        default_value_t = DEFAULT_DELAY_SECS as i64,
        allow_negative_numbers = true
    )]
    pub delay: i64,

    /// Value to sort the connections by: cid, subs, msgs_to, msgs_from, bytes_to, bytes_from.
    #[arg(long = "sort", default_value = "cid")]
    pub sort: String,

    /// Show natstop version.
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not use {0} as a refresh interval: must be at least 1 second")]
    InvalidDelay(i64),
    #[error("connection limit must be at least 1")]
    ZeroLimit,
    #[error("invalid monitoring endpoint {host}:{port}: {reason}")]
    InvalidEndpoint {
        host: String,
        port: u16,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub host: String,
    pub port: u16,
    /// Max rows to request from the server and display.
    pub conns: u32,
    pub delay: Duration,
    pub sort: SortKey,
}

impl DisplayOptions {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        conns: u32,
        delay_secs: i64,
        sort: SortKey,
    ) -> Result<Self, ConfigError> {
        if delay_secs < 1 {
            return Err(ConfigError::InvalidDelay(delay_secs));
        }
        if conns == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        let opts = Self {
            host: host.into(),
            port,
            conns,
            delay: Duration::from_secs(delay_secs as u64),
            sort,
        };
        opts.endpoint()?;
        Ok(opts)
    }

    /// Base URL of the monitoring endpoint, e.g. `http://127.0.0.1:8222/`.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            host: self.host.clone(),
            port: self.port,
            reason,
        };
        if self.host.trim().is_empty() {
            return Err(invalid("empty host".into()));
        }
        let url = Url::parse(&format!("http://{}:{}/", self.host, self.port))
            .map_err(|e| invalid(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("missing host".into()));
        }
        Ok(url)
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_MONITOR_PORT,
            conns: DEFAULT_CONN_LIMIT,
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            sort: SortKey::default(),
        }
    }
}

impl Cli {
    /// Validate the parsed flags. An unknown sort key is not fatal: it is
    /// logged and the default order is kept.
    pub fn into_options(self) -> Result<DisplayOptions, ConfigError> {
        let sort = match self.sort.parse::<SortKey>() {
            Ok(k) => k,
            Err(e) => {
                warn!(sort = %self.sort, "{e}; keeping {}", SortKey::default());
                SortKey::default()
            }
        };
        DisplayOptions::new(self.host, self.port, self.conns, self.delay, sort)
    }
}

/// Process-wide options. Written only from the input prompts' commit points;
/// the sampler reads a copy before each poll.
#[derive(Debug, Clone, Default)]
pub struct SharedOptions(Arc<RwLock<DisplayOptions>>);

impl SharedOptions {
    pub fn new(opts: DisplayOptions) -> Self {
        Self(Arc::new(RwLock::new(opts)))
    }

    pub async fn snapshot(&self) -> DisplayOptions {
        self.0.read().await.clone()
    }

    pub async fn sort(&self) -> SortKey {
        self.0.read().await.sort
    }

    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, DisplayOptions> {
        self.0.write().await
    }
}
