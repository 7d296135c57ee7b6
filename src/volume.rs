//! Client side of the volume plugin protocol and the mount orchestration
//! built on top of it.
pub mod adapter;
pub mod api;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod rpc;
pub mod session;
pub mod types;

pub use adapter::{Attributes, Mounter, Unmounter, VolumePlugin};
pub use api::VOLUME_NOT_FOUND;
pub use client::Client;
pub use config::ClientConfig;
pub use driver::VolumeService;
pub use error::{TransportError, VolumeError};
pub use session::{ClientBinder, ServiceBinder, VolumeSession};
pub use types::{Capability, MountId, Volume, VolumeName, VolumeOptions};
