use super::{ServiceArgs, parse_option};
use crate::error::FuxiError;
use crate::volume::{VolumeName, VolumeOptions, VolumePlugin};
use clap::{ArgAction, Args};
use sysexits::ExitCode;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct MountArgs {
    /// Name of the volume
    pub name: VolumeName,

    /// Driver option forwarded to the service when the volume is created
    #[arg(
        short = 'o',
        long = "opt",
        value_name = "KEY=VALUE",
        value_parser = parse_option,
        action = ArgAction::Append,
    )]
    pub opts: Vec<(String, String)>,

    /// Mark the volume read-only for the consumer
    #[arg(long, env = "FUXI_READ_ONLY", default_value_t = false)]
    pub read_only: bool,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Name of the volume
    pub name: VolumeName,

    #[command(flatten)]
    pub service: ServiceArgs,
}

pub async fn mount(args: MountArgs) -> Result<ExitCode, FuxiError> {
    let config = args.service.init()?;
    let options = if args.opts.is_empty() {
        None
    } else {
        Some(args.opts.into_iter().collect::<VolumeOptions>())
    };

    let plugin = VolumePlugin::from_config(config);
    let mut mounter = plugin.mounter(args.name, options, args.read_only);
    mounter.can_mount()?;

    let path = mounter.set_up().await?;
    info!(attributes = ?mounter.attributes(), "mount complete");
    println!("{}", path);
    Ok(ExitCode::Ok)
}

pub async fn path(args: PathArgs) -> Result<ExitCode, FuxiError> {
    let config = args.service.init()?;
    let plugin = VolumePlugin::from_config(config);

    let path = plugin.unmounter(args.name.clone()).path().await;
    if path.is_empty() {
        warn!(volume = %args.name, "volume path is unknown");
        return Ok(ExitCode::Unavailable);
    }
    println!("{}", path);
    Ok(ExitCode::Ok)
}

pub async fn unmount(args: PathArgs) -> Result<ExitCode, FuxiError> {
    let config = args.service.init()?;
    let plugin = VolumePlugin::from_config(config);
    plugin.unmounter(args.name).tear_down().await?;
    Ok(ExitCode::Ok)
}
