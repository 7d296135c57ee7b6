use super::error::VolumeError;
use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

/// Supplies the address of the host the volume service listens on.
#[async_trait]
pub trait HostLookup: Send + Sync {
    async fn host_ip(&self) -> Result<IpAddr, VolumeError>;
}

/// A fixed, already known address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticHost(pub IpAddr);

#[async_trait]
impl HostLookup for StaticHost {
    async fn host_ip(&self) -> Result<IpAddr, VolumeError> {
        Ok(self.0)
    }
}

/// Resolves a host name through the system resolver on every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost(pub String);

#[async_trait]
impl HostLookup for ResolvedHost {
    async fn host_ip(&self) -> Result<IpAddr, VolumeError> {
        if let Ok(ip) = self.0.parse::<IpAddr>() {
            return Ok(ip);
        }

        let mut addrs = tokio::net::lookup_host((self.0.as_str(), 0))
            .await
            .map_err(|e| VolumeError::Bind(format!("cannot resolve host '{}': {}", self.0, e)))?;

        let addr = addrs
            .next()
            .ok_or_else(|| VolumeError::Bind(format!("host '{}' has no addresses", self.0)))?;

        debug!(host = %self.0, ip = %addr.ip(), "resolved volume service host");
        Ok(addr.ip())
    }
}
