//! Change an existing service

use std::path::PathBuf;

use clap::Args;
use owo_colors::OwoColorize;
use systemd_net::{Config, Manager};

use super::{CommandResult, ServiceOptions};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Service name
    pub name: String,

    /// New path to the application
    #[arg(short = 'x', long = "exec")]
    pub exec_path: Option<PathBuf>,

    /// Run the executable directly instead of through the dotnet CLI
    #[arg(long, requires = "exec_path")]
    pub self_contained: bool,

    /// Fail if the executable does not exist
    #[arg(long)]
    pub strict: bool,

    /// Restart the service if it is running
    #[arg(long)]
    pub restart: bool,

    #[command(flatten)]
    pub options: ServiceOptions,
}

pub async fn edit(config: &Config, args: EditArgs) -> CommandResult {
    let store = config.store();
    let mut svc = store.load(&config.unit_name(&args.name)).await?;

    args.options.apply(&mut svc)?;
    if let Some(exec_path) = &args.exec_path {
        let runtime = if args.self_contained {
            String::new()
        } else {
            config.dotnet.to_string_lossy().into_owned()
        };
        svc.service
            .set_exec_start(&exec_path.to_string_lossy(), &runtime, args.strict)?;
    }

    let manager = Manager::new(store);
    manager.update(&mut svc).await?;

    if args.restart && manager.stop(&svc).await? {
        manager.start(&svc).await?;
    }

    println!("{}", format!("Service {} updated", svc.name).green());
    Ok(())
}
