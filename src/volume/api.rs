//! Wire documents of the volume plugin protocol.
//!
//! Every verb is a JSON `POST` to `/{Service}.{Method}`. Responses carry their
//! payload next to an `Err` string; a non-empty `Err` means the call failed
//! even though the exchange itself succeeded.
use super::error::VolumeError;
use super::types::{Capability, Volume, VolumeOptions};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Error text the service uses to report a missing volume.
///
/// Services emit exactly this literal, so it must match byte for byte.
pub const VOLUME_NOT_FOUND: &str = "Volume Not Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    Activate,
    Create,
    Remove,
    Mount,
    Get,
    List,
    Capabilities,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activate => "Plugin.Activate",
            Self::Create => "VolumeDriver.Create",
            Self::Remove => "VolumeDriver.Remove",
            Self::Mount => "VolumeDriver.Mount",
            Self::Get => "VolumeDriver.Get",
            Self::List => "VolumeDriver.List",
            Self::Capabilities => "VolumeDriver.Capabilities",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a response `Err` field into a result.
pub fn check_err(err: String) -> Result<(), VolumeError> {
    if err.is_empty() {
        Ok(())
    } else {
        Err(VolumeError::from_wire(err))
    }
}

/// Go-based services encode nil slices and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Serialize)]
pub struct EmptyRequest {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRequest<'a> {
    pub name: &'a str,
    pub opts: &'a VolumeOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "ID")]
    pub id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub implements: Vec<String>,
}

/// Response of verbs that only report success or failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: Volume,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}

/// `Path` is answered by `VolumeDriver.Get`, so both the flat and the
/// nested mountpoint shapes are accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mountpoint: String,
    #[serde(default)]
    pub volume: Option<Volume>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}

impl PathResponse {
    pub fn into_mountpoint(self) -> String {
        if !self.mountpoint.is_empty() {
            return self.mountpoint;
        }
        self.volume.map(|v| v.mountpoint).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mountpoint: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumes: Vec<Volume>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapabilitiesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Capability,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err: String,
}
