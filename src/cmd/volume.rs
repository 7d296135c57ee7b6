use super::{ServiceArgs, parse_option};
use crate::error::FuxiError;
use crate::volume::{ClientBinder, ServiceBinder, VolumeName, VolumeOptions};
use clap::{ArgAction, Args, Subcommand};
use serde::Serialize;
use sysexits::ExitCode;
use tracing::info;

#[derive(Args, Debug)]
pub struct VolumeArgs {
    #[command(subcommand)]
    pub cmd: VolumeCommand,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Subcommand, Debug)]
pub enum VolumeCommand {
    /// List the plugin interfaces the service implements
    Activate,
    /// Show the scope reported by the service
    Capabilities,
    /// List all volumes
    List,
    /// Show a single volume
    Get {
        name: VolumeName,
    },
    /// Create a volume without mounting it
    Create {
        name: VolumeName,
        /// Driver option
        #[arg(
            short = 'o',
            long = "opt",
            value_name = "KEY=VALUE",
            value_parser = parse_option,
            action = ArgAction::Append,
        )]
        opts: Vec<(String, String)>,
    },
    /// Remove a volume
    Remove {
        name: VolumeName,
    },
}

pub async fn volume(args: VolumeArgs) -> Result<ExitCode, FuxiError> {
    let config = args.service.init()?;
    let client = ServiceBinder::from_config(config).bind().await?;

    match args.cmd {
        VolumeCommand::Activate => print_json(&client.activate().await?)?,
        VolumeCommand::Capabilities => print_json(&client.capabilities().await?)?,
        VolumeCommand::List => print_json(&client.list().await?)?,
        VolumeCommand::Get { name } => print_json(&client.get(&name).await?)?,
        VolumeCommand::Create { name, opts } => {
            let opts: VolumeOptions = opts.into_iter().collect();
            client.create(&name, &opts).await?;
            info!(volume = %name, "volume created");
        }
        VolumeCommand::Remove { name } => {
            client.remove(&name).await?;
            info!(volume = %name, "volume removed");
        }
    }
    Ok(ExitCode::Ok)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FuxiError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
