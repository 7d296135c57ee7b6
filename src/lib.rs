//! # fuxi-mount
//!
//! Client and mount orchestration for Fuxi volume services.
//!
//! The crate talks to a remote volume service over the JSON volume plugin
//! protocol and guarantees that a named volume exists and is mounted before a
//! consumer uses it:
//!
//! * [`volume::rpc`]: the request/response transport.
//! * [`volume::client`]: typed `Plugin.Activate` / `VolumeDriver.*` calls.
//! * [`volume::session`]: the idempotent get, create, mount sequence.
//! * [`volume::adapter`]: attach and detach roles for a consumer.
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod volume;
