use super::rpc::Scheme;
use crate::config::{ConfigError, Overlay};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 7879;
pub const PORT_ENV: &str = "FUXI_SERVER_PORT";

/// Where and how to reach the volume service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    /// Per-call timeout. `None` blocks until the transport gives up.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scheme: Scheme::Http,
            timeout: None,
        }
    }
}

pub fn port_from_env() -> u16 {
    parse_port(std::env::var(PORT_ENV).ok().as_deref())
}

/// Unset, empty or unparsable values fall back to [`DEFAULT_PORT`].
pub fn parse_port(raw: Option<&str>) -> u16 {
    let raw = match raw.map(str::trim) {
        None | Some("") => return DEFAULT_PORT,
        Some(v) => v,
    };
    match raw.parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            warn!(value = raw, default = DEFAULT_PORT, "invalid {}, using default", PORT_ENV);
            DEFAULT_PORT
        }
    }
}

/// Per-call timeout. Bare numbers are seconds, otherwise humantime (`1m30s`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallTimeout(pub Duration);

impl FromStr for CallTimeout {
    type Err = humantime::DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(s) = s.parse::<u64>() {
            return Ok(CallTimeout(Duration::from_secs(s)));
        }
        Ok(CallTimeout(humantime::parse_duration(s)?))
    }
}

impl TryFrom<String> for CallTimeout {
    type Error = humantime::DurationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CallTimeout> for String {
    fn from(t: CallTimeout) -> Self {
        t.to_string()
    }
}

impl fmt::Display for CallTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(self.0))
    }
}

impl From<CallTimeout> for Duration {
    fn from(val: CallTimeout) -> Self {
        val.0
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientArgs {
    /// Host name or address of the volume service
    #[arg(long, env = "FUXI_SERVER_HOST")]
    #[serde(default)]
    pub host: Option<String>,

    /// Port of the volume service
    ///
    /// When unset, FUXI_SERVER_PORT is consulted and invalid values fall back to 7879.
    #[arg(long)]
    #[serde(default)]
    pub port: Option<u16>,

    /// Transport scheme
    #[arg(long, env = "FUXI_SERVER_SCHEME", value_enum)]
    #[serde(default)]
    pub scheme: Option<Scheme>,

    /// Per-call timeout (e.g. `30s`). Calls are unbounded when unset.
    #[arg(long, env = "FUXI_TIMEOUT")]
    #[serde(default)]
    pub timeout: Option<CallTimeout>,
}

impl Overlay for ClientArgs {
    fn overlay(self, over: Self) -> Self {
        Self {
            host: self.host.overlay(over.host),
            port: self.port.overlay(over.port),
            scheme: self.scheme.overlay(over.scheme),
            timeout: self.timeout.overlay(over.timeout),
        }
    }
}

impl TryFrom<ClientArgs> for ClientConfig {
    type Error = ConfigError;

    fn try_from(args: ClientArgs) -> Result<Self, Self::Error> {
        let host = args.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::Validation("host cannot be empty".into()));
        }
        if args.port == Some(0) {
            return Err(ConfigError::Validation("port cannot be 0".into()));
        }
        Ok(Self {
            host,
            port: args.port.unwrap_or_else(port_from_env),
            scheme: args.scheme.unwrap_or_default(),
            timeout: args.timeout.map(Duration::from),
        })
    }
}
