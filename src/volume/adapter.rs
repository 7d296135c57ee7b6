//! Attach and detach roles for a volume consumer.
//!
//! Both roles own a [`VolumeSession`] and expose only their half of the
//! lifecycle. The actual bind mount of the resolved path into the consumer is
//! performed by the caller, which is why [`Attributes::managed`] is false.
use super::config::ClientConfig;
use super::error::VolumeError;
use super::session::{ClientBinder, ServiceBinder, VolumeSession};
use super::types::{VolumeName, VolumeOptions};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub read_only: bool,
    /// Whether this plugin performs the local mount itself.
    pub managed: bool,
    pub supports_selinux: bool,
}

/// Builds attach and detach roles sharing one client binder.
#[derive(Clone)]
pub struct VolumePlugin {
    binder: Arc<dyn ClientBinder>,
}

impl VolumePlugin {
    pub fn new(binder: Arc<dyn ClientBinder>) -> Self {
        Self { binder }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(Arc::new(ServiceBinder::from_config(config)))
    }

    pub fn mounter(
        &self,
        name: VolumeName,
        options: Option<VolumeOptions>,
        read_only: bool,
    ) -> Mounter {
        Mounter {
            session: VolumeSession::new(name, self.binder.clone()),
            options,
            read_only,
        }
    }

    pub fn unmounter(&self, name: VolumeName) -> Unmounter {
        Unmounter {
            session: VolumeSession::new(name, self.binder.clone()),
        }
    }
}

/// Attach role.
pub struct Mounter {
    session: VolumeSession,
    options: Option<VolumeOptions>,
    read_only: bool,
}

impl Mounter {
    pub fn can_mount(&self) -> Result<(), VolumeError> {
        Ok(())
    }

    pub fn attributes(&self) -> Attributes {
        Attributes {
            read_only: self.read_only,
            managed: false,
            supports_selinux: false,
        }
    }

    /// Provisions and mounts the volume on the service, returning the path the
    /// caller should bind mount from.
    pub async fn set_up(&mut self) -> Result<String, VolumeError> {
        self.session.ensure_mounted(&mut self.options).await
    }

    pub async fn path(&self) -> String {
        self.session.resolve_path().await
    }

    pub fn options(&self) -> Option<&VolumeOptions> {
        self.options.as_ref()
    }

    pub fn session(&self) -> &VolumeSession {
        &self.session
    }
}

/// Detach role.
///
/// Tearing down never calls `Remove` or `Unmount` on the service: volumes are
/// durable and outlive any single consumer. Releasing the local bind mount is
/// the caller's job.
pub struct Unmounter {
    session: VolumeSession,
}

impl Unmounter {
    pub async fn tear_down(&self) -> Result<(), VolumeError> {
        let dir = self.session.resolve_path().await;
        self.tear_down_at(&dir)
    }

    pub fn tear_down_at(&self, dir: &str) -> Result<(), VolumeError> {
        debug!(volume = %self.session.name(), dir, "leaving remote volume in place");
        info!(volume = %self.session.name(), "volume detached");
        Ok(())
    }

    pub async fn path(&self) -> String {
        self.session.resolve_path().await
    }
}
