use crate::config::LayeredArgs;
use crate::error::FuxiError;
use crate::logging::Logger;
use crate::volume::config::{ClientArgs, ClientConfig};
use clap::{Args, Parser, Subcommand};

mod mount;
mod volume;

pub use mount::{MountArgs, PathArgs, mount, path, unmount};
pub use volume::{VolumeArgs, VolumeCommand, volume};

#[derive(Parser, Debug)]
#[command(name = "fuxi-mount")]
#[command(version, about = "Provision and mount volumes from a Fuxi volume service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ensure a volume exists and is mounted, then print its local path
    Mount(Box<MountArgs>),

    /// Print the local path of a volume, if it is known
    Path(Box<PathArgs>),

    /// Detach from a volume. The remote volume is left in place.
    Unmount(Box<PathArgs>),

    /// Issue raw calls against the volume service
    Volume(Box<VolumeArgs>),
}

/// Connection and logging options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    #[command(flatten, next_help_heading = "Service Connection")]
    pub client: LayeredArgs<ClientArgs>,

    /// Logging configuration
    #[command(flatten)]
    pub logger: Logger,
}

impl ServiceArgs {
    /// Initializes logging and resolves the layered client configuration.
    pub fn init(self) -> Result<ClientConfig, FuxiError> {
        self.logger.init()?;
        self.client.load()
    }
}

/// Parses a `KEY=VALUE` driver option.
pub fn parse_option(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
