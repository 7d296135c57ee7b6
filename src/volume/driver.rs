use super::error::VolumeError;
use super::types::{Capability, MountId, Volume, VolumeName, VolumeOptions};
use async_trait::async_trait;

/// The verbs a remote volume service answers.
///
/// A service-reported `Volume Not Found` surfaces as [`VolumeError::NotFound`];
/// every other non-empty `Err` surfaces as [`VolumeError::Service`].
#[async_trait]
pub trait VolumeService: Send + Sync {
    /// Returns the plugin interfaces the service implements.
    async fn activate(&self) -> Result<Vec<String>, VolumeError>;
    /// Not idempotent by contract; probe with [`VolumeService::get`] first.
    async fn create(&self, name: &VolumeName, opts: &VolumeOptions) -> Result<(), VolumeError>;
    async fn remove(&self, name: &VolumeName) -> Result<(), VolumeError>;
    async fn get(&self, name: &VolumeName) -> Result<Volume, VolumeError>;
    async fn path(&self, name: &VolumeName) -> Result<String, VolumeError>;
    async fn mount(&self, name: &VolumeName, id: &MountId) -> Result<String, VolumeError>;
    async fn list(&self) -> Result<Vec<Volume>, VolumeError>;
    async fn capabilities(&self) -> Result<Capability, VolumeError>;
}
