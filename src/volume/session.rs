//! Idempotent provisioning of a single volume.
//!
//! [`VolumeSession::ensure_mounted`] converges on "volume exists and is
//! mounted" from any starting state and may be re-run from the top after a
//! failure at any step:
//!
//! 1. bind a client if the session has none yet,
//! 2. `Get` the volume; on `Volume Not Found`, `Create` it and `Get` again,
//! 3. adopt a non-empty `Mountpoint` as is, otherwise `Mount` with an empty id,
//! 4. remember the adopted path for the rest of the session.
//!
//! Nothing is retried internally. Concurrent sessions for the same name may
//! both create; the remote service arbitrates.
use super::client::Client;
use super::config::ClientConfig;
use super::driver::VolumeService;
use super::error::VolumeError;
use super::host::{HostLookup, ResolvedHost};
use super::rpc::Endpoint;
use super::types::{MountId, VolumeName, VolumeOptions};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Produces a client bound to the volume service.
#[async_trait]
pub trait ClientBinder: Send + Sync {
    async fn bind(&self) -> Result<Arc<dyn VolumeService>, VolumeError>;
}

/// Binds HTTP clients to the discovered host and the configured port.
pub struct ServiceBinder {
    config: ClientConfig,
    host: Arc<dyn HostLookup>,
}

impl ServiceBinder {
    pub fn new(config: ClientConfig, host: Arc<dyn HostLookup>) -> Self {
        Self { config, host }
    }

    /// Looks up `config.host` through the system resolver on every bind.
    pub fn from_config(config: ClientConfig) -> Self {
        let host = Arc::new(ResolvedHost(config.host.clone()));
        Self::new(config, host)
    }
}

#[async_trait]
impl ClientBinder for ServiceBinder {
    async fn bind(&self) -> Result<Arc<dyn VolumeService>, VolumeError> {
        let ip = self.host.host_ip().await?;
        let endpoint = Endpoint::from_ip(self.config.scheme, ip, self.config.port)?;
        debug!(%endpoint, "binding volume service client");
        let client = Client::connect(endpoint, self.config.timeout)?;
        Ok(Arc::new(client))
    }
}

/// State shared by the attach and detach roles of one volume.
pub struct VolumeSession {
    name: VolumeName,
    path: Option<String>,
    client: Option<Arc<dyn VolumeService>>,
    binder: Arc<dyn ClientBinder>,
}

impl VolumeSession {
    pub fn new(name: VolumeName, binder: Arc<dyn ClientBinder>) -> Self {
        Self {
            name,
            path: None,
            client: None,
            binder,
        }
    }

    pub fn name(&self) -> &VolumeName {
        &self.name
    }

    /// Path adopted by a successful [`VolumeSession::ensure_mounted`], if any.
    pub fn resolved_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    async fn client(&mut self) -> Result<Arc<dyn VolumeService>, VolumeError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = self.binder.bind().await?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Makes sure the volume exists and is mounted, returning its local path.
    ///
    /// Missing `options` are replaced in place by an empty map before `Create`
    /// is issued. The session path is only updated when every step succeeded.
    pub async fn ensure_mounted(
        &mut self,
        options: &mut Option<VolumeOptions>,
    ) -> Result<String, VolumeError> {
        let client = self.client().await?;
        let name = &self.name;

        let volume = match client.get(name).await {
            Ok(volume) => volume,
            Err(VolumeError::NotFound) => {
                let opts = options.get_or_insert_with(VolumeOptions::new);
                info!(volume = %name, "volume not found, creating");
                client.create(name, opts).await?;
                client.get(name).await?
            }
            Err(e) => return Err(e),
        };

        let path = if volume.is_mounted() {
            debug!(volume = %name, mountpoint = %volume.mountpoint, "volume already mounted");
            volume.mountpoint
        } else {
            info!(volume = %name, "mounting volume");
            client.mount(name, &MountId::default()).await?
        };

        if path.is_empty() {
            return Err(VolumeError::EmptyMountpoint(name.to_string()));
        }

        info!(volume = %name, mountpoint = %path, "volume ready");
        self.path = Some(path.clone());
        Ok(path)
    }

    /// Best-effort lookup of the volume's local path.
    ///
    /// Returns the session's path when one was adopted, otherwise asks the
    /// service through a freshly bound client. Any failure yields `""`.
    pub async fn resolve_path(&self) -> String {
        if let Some(path) = self.path.as_ref().filter(|p| !p.is_empty()) {
            return path.clone();
        }

        let client = match self.binder.bind().await {
            Ok(client) => client,
            Err(e) => {
                debug!(volume = %self.name, error = %e, "cannot bind client for path lookup");
                return String::new();
            }
        };

        match client.get(&self.name).await {
            Ok(volume) => volume.mountpoint,
            Err(e) => {
                debug!(volume = %self.name, error = %e, "path lookup failed");
                String::new()
            }
        }
    }
}
