use crate::config::ConfigError;
use crate::volume::{TransportError, VolumeError};
use sysexits::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FuxiError {
    #[error(transparent)]
    Volume(#[from] VolumeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<TransportError> for FuxiError {
    fn from(e: TransportError) -> Self {
        FuxiError::Volume(VolumeError::Transport(e))
    }
}

impl std::process::Termination for FuxiError {
    fn report(self) -> std::process::ExitCode {
        let code = self.exit_code();
        tracing::error!(exit_code = code, "{}", self);
        std::process::ExitCode::from(code)
    }
}

impl FuxiError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FuxiError::Volume(e) => match e {
                VolumeError::Transport(_) => ExitCode::Unavailable.into(),
                VolumeError::NotFound => ExitCode::NoInput.into(),
                VolumeError::Service(_) => ExitCode::Unavailable.into(),
                VolumeError::EmptyMountpoint(_) => ExitCode::Protocol.into(),
                VolumeError::Bind(_) => ExitCode::Config.into(),
                VolumeError::Validation(_) => ExitCode::Usage.into(),
            },
            FuxiError::Config(e) => match e {
                ConfigError::Io(_) => ExitCode::IoErr.into(),
                ConfigError::Parse(_) => ExitCode::Config.into(),
                ConfigError::Validation(_) => ExitCode::Config.into(),
            },
            FuxiError::Json(_) => ExitCode::Software.into(),
            FuxiError::Anyhow(_) => ExitCode::Software.into(),
        }
    }
}
