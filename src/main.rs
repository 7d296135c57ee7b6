use clap::Parser;
use fuxi_mount::cmd::{self, Cli, Command};
use std::process::{ExitCode, Termination};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Mount(args) => cmd::mount(*args).await,
        Command::Path(args) => cmd::path(*args).await,
        Command::Unmount(args) => cmd::unmount(*args).await,
        Command::Volume(args) => cmd::volume(*args).await,
    };
    match result {
        Ok(code) => code.report(),
        Err(e) => e.report(),
    }
}
