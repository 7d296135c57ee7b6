//! Minimal JSON-over-HTTP RPC transport.
//!
//! A remote operation is addressed by appending its method name to a base
//! endpoint, e.g. `http://10.0.0.5:7879/VolumeDriver.Get`.
use super::api::RpcMethod;
use super::error::TransportError;
use async_trait::async_trait;
use clap::ValueEnum;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::debug;
use url::Url;

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Base address that method names are joined onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    pub fn new(scheme: Scheme, addr: SocketAddr) -> Result<Self, TransportError> {
        // SocketAddr brackets IPv6 literals for us.
        let base = Url::parse(&format!("{}://{}/", scheme, addr))?;
        Ok(Self { base })
    }

    pub fn from_ip(scheme: Scheme, ip: IpAddr, port: u16) -> Result<Self, TransportError> {
        Self::new(scheme, SocketAddr::new(ip, port))
    }

    pub fn url(&self, method: RpcMethod) -> Result<Url, TransportError> {
        Ok(self.base.join(method.as_str())?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// Request/response exchange with a remote service.
///
/// Implementations must surface every failure to produce a decoded document
/// as a [`TransportError`]; interpreting the document is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: RpcMethod, request: Value) -> Result<Value, TransportError>;
}

/// Serializes `request`, performs the call and decodes the response into the
/// document shape expected for `method`.
pub async fn call_json<T, Req, Resp>(
    transport: &T,
    method: RpcMethod,
    request: &Req,
) -> Result<Resp, TransportError>
where
    T: Transport + ?Sized,
    Req: Serialize + Sync + ?Sized,
    Resp: DeserializeOwned,
{
    let request = serde_json::to_value(request)
        .map_err(|source| TransportError::Encode { method, source })?;
    let response = transport.call(method, request).await?;
    serde_json::from_value(response).map_err(|source| TransportError::Decode { method, source })
}

/// HTTP/1 transport. Opens a fresh connection per call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    /// `timeout` of `None` leaves calls unbounded.
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: RpcMethod, request: Value) -> Result<Value, TransportError> {
        let url = self.endpoint.url(method)?;
        debug!(%method, %url, "calling volume service");

        let body = serde_json::to_vec(&request)
            .map_err(|source| TransportError::Encode { method, source })?;

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|source| TransportError::Request { method, source })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| TransportError::Request { method, source })?;

        // Plugins report logical failures inside a 200 body, so the status is
        // only consulted when the body is unusable.
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                method,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(source) => Err(TransportError::Decode { method, source }),
        }
    }
}
