use super::api::{
    ActivateResponse, CapabilitiesResponse, CreateRequest, EmptyRequest, ErrResponse, GetResponse,
    ListResponse, MountRequest, MountResponse, NameRequest, PathResponse, RpcMethod, check_err,
};
use super::driver::VolumeService;
use super::error::VolumeError;
use super::rpc::{Endpoint, HttpTransport, Transport, call_json};
use super::types::{Capability, MountId, Volume, VolumeName, VolumeOptions};
use async_trait::async_trait;
use std::time::Duration;

/// Typed volume service client.
///
/// Holds nothing but its transport, so it is cheap to rebuild.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
}

impl Client<HttpTransport> {
    pub fn connect(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, VolumeError> {
        Ok(Self::new(HttpTransport::new(endpoint, timeout)?))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: Transport> VolumeService for Client<T> {
    async fn activate(&self) -> Result<Vec<String>, VolumeError> {
        let resp: ActivateResponse =
            call_json(&self.transport, RpcMethod::Activate, &EmptyRequest {}).await?;
        Ok(resp.implements)
    }

    async fn create(&self, name: &VolumeName, opts: &VolumeOptions) -> Result<(), VolumeError> {
        let req = CreateRequest {
            name: name.as_str(),
            opts,
        };
        let resp: ErrResponse = call_json(&self.transport, RpcMethod::Create, &req).await?;
        check_err(resp.err)
    }

    async fn remove(&self, name: &VolumeName) -> Result<(), VolumeError> {
        let req = NameRequest {
            name: name.as_str(),
        };
        let resp: ErrResponse = call_json(&self.transport, RpcMethod::Remove, &req).await?;
        check_err(resp.err)
    }

    async fn get(&self, name: &VolumeName) -> Result<Volume, VolumeError> {
        let req = NameRequest {
            name: name.as_str(),
        };
        let resp: GetResponse = call_json(&self.transport, RpcMethod::Get, &req).await?;
        check_err(resp.err)?;
        Ok(resp.volume)
    }

    async fn path(&self, name: &VolumeName) -> Result<String, VolumeError> {
        let req = NameRequest {
            name: name.as_str(),
        };
        let mut resp: PathResponse = call_json(&self.transport, RpcMethod::Get, &req).await?;
        check_err(std::mem::take(&mut resp.err))?;
        Ok(resp.into_mountpoint())
    }

    async fn mount(&self, name: &VolumeName, id: &MountId) -> Result<String, VolumeError> {
        let req = MountRequest {
            name: name.as_str(),
            id: id.as_str(),
        };
        let resp: MountResponse = call_json(&self.transport, RpcMethod::Mount, &req).await?;
        check_err(resp.err)?;
        Ok(resp.mountpoint)
    }

    async fn list(&self) -> Result<Vec<Volume>, VolumeError> {
        let resp: ListResponse =
            call_json(&self.transport, RpcMethod::List, &EmptyRequest {}).await?;
        check_err(resp.err)?;
        Ok(resp.volumes)
    }

    async fn capabilities(&self) -> Result<Capability, VolumeError> {
        let resp: CapabilitiesResponse =
            call_json(&self.transport, RpcMethod::Capabilities, &EmptyRequest {}).await?;
        check_err(resp.err)?;
        Ok(resp.capabilities)
    }
}
