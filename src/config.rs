//! Layered configuration: CLI/env on top of an optional TOML file on top of
//! built-in defaults.
use crate::error::FuxiError;
use clap::Args;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Validation(String),
}

/// Trait for merging two partial structs.
pub trait Overlay {
    /// self is the base layer, over is the top layer.
    fn overlay(self, over: Self) -> Self;
}

// If top layer exists, use it. Otherwise keep base.
impl<T> Overlay for Option<T> {
    fn overlay(self, over: Self) -> Self {
        over.or(self)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LayeredArgs<T: Args> {
    /// Path to configuration file
    #[arg(long, env = "FUXI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub inner: T,
}

impl<T> LayeredArgs<T>
where
    T: Args,
{
    pub fn load<C>(self) -> Result<C, FuxiError>
    where
        T: Layered<C>,
    {
        self.inner.resolve(self.config.as_deref())
    }
}

pub trait Layered<C>: Overlay + DeserializeOwned + Default + Sized {
    fn resolve(self, config_path: Option<&Path>) -> Result<C, FuxiError>;
}

impl<T, C> Layered<C> for T
where
    T: Overlay + DeserializeOwned + Default,
    T: TryInto<C>,
    <T as TryInto<C>>::Error: Into<FuxiError>,
{
    fn resolve(self, config_path: Option<&Path>) -> Result<C, FuxiError> {
        let base = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
                toml::from_str::<Self>(&content).map_err(ConfigError::Parse)?
            }
            _ => Self::default(),
        };

        let merged = base.overlay(self);

        merged.try_into().map_err(Into::into)
    }
}
