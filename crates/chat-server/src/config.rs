//! Configuration for the chat TCP server.
//!
//! The address family and port come from the command line. A few knobs can
//! be overridden via environment variables:
//!
//! - `CHAT_MAX_CLIENTS`       (default: 15, at most 15)
//! - `CHAT_IDLE_TIMEOUT_SECS` (default: unset, reads never time out; 0 is rejected)

use std::env;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chat_core::MAX_CLIENTS;
use clap::ValueEnum;
use thiserror::Error;

pub const MAX_CLIENTS_VAR: &str = "CHAT_MAX_CLIENTS";
pub const IDLE_TIMEOUT_VAR: &str = "CHAT_IDLE_TIMEOUT_SECS";

/// Which wildcard address the listener binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IpVersion {
    V4,
    V6,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: &'static str, value: String },

    #[error("{var} must be between 1 and {max}, got {0}", var = MAX_CLIENTS_VAR, max = MAX_CLIENTS)]
    MaxClientsOutOfRange(usize),

    #[error("{var} must be at least 1 second", var = IDLE_TIMEOUT_VAR)]
    ZeroIdleTimeout,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub ip_version: IpVersion,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously registered users.
    pub max_clients: usize,

    /// Close a connection whose next frame takes longer than this.
    pub idle_timeout: Option<Duration>,
}

impl Config {
    /// Build a `Config` for `ip_version`/`port`, taking the remaining
    /// settings from environment variables or their defaults.
    pub fn from_env(ip_version: IpVersion, port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(ip_version, port, |key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(ip_version: IpVersion, port: u16, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_clients = read_or_default(&lookup, MAX_CLIENTS_VAR, MAX_CLIENTS)?;
        if max_clients == 0 || max_clients > MAX_CLIENTS {
            return Err(ConfigError::MaxClientsOutOfRange(max_clients));
        }

        let idle_timeout = match lookup(IDLE_TIMEOUT_VAR) {
            Some(raw) => match parse::<u64>(IDLE_TIMEOUT_VAR, &raw)? {
                0 => return Err(ConfigError::ZeroIdleTimeout),
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        Ok(Config {
            ip_version,
            port,
            max_clients,
            idle_timeout,
        })
    }

    /// Wildcard socket address for the configured family and port.
    pub fn socket_addr(&self) -> SocketAddr {
        match self.ip_version {
            IpVersion::V4 => SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port)),
            IpVersion::V6 => SocketAddr::from((Ipv6Addr::UNSPECIFIED, self.port)),
        }
    }
}

fn read_or_default<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => parse(key, &val),
        None => Ok(default),
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Parse {
        key,
        value: raw.to_string(),
    })
}
