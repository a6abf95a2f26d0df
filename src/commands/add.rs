//! Register a new service

use std::path::PathBuf;

use clap::Args;
use owo_colors::OwoColorize;
use systemd_net::{dotnet, Config, Manager};

use super::{CommandResult, ServiceOptions};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Service name (prefix is added when missing)
    pub name: String,

    /// Path to the application (.dll, or the executable when self-contained)
    #[arg(short = 'x', long = "exec")]
    pub exec_path: PathBuf,

    /// Run the executable directly instead of through the dotnet CLI
    #[arg(long)]
    pub self_contained: bool,

    /// Fail if the executable does not exist yet
    #[arg(long)]
    pub strict: bool,

    /// Start the service once registered
    #[arg(long)]
    pub start: bool,

    #[command(flatten)]
    pub options: ServiceOptions,
}

pub async fn add(config: &Config, args: AddArgs) -> CommandResult {
    let exec_path = args.exec_path.to_string_lossy();
    if exec_path.trim().is_empty() {
        return Err("Service execution path required (--exec)".into());
    }

    let store = config.store();
    let name = config.unit_name(&args.name);
    let mut svc = store.create_blank(&name).await?;

    args.options.apply(&mut svc)?;
    if args.options.aspnetcore_env.is_none() {
        svc.set_aspnetcore_environment("Production");
    }

    let runtime = if args.self_contained {
        String::new()
    } else {
        if !dotnet::is_installed(&config.dotnet) {
            log::warn!(
                "{} not found. Only self-contained apps can run.",
                config.dotnet.display()
            );
        }
        config.dotnet.to_string_lossy().into_owned()
    };
    svc.service
        .set_exec_start(exec_path.trim(), &runtime, args.strict)?;

    tokio::fs::create_dir_all(store.env_dir()).await?;

    let manager = Manager::new(store);
    manager.install(&mut svc).await?;
    if args.start {
        manager.start(&svc).await?;
    }

    let path = svc
        .path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!(
        "{}",
        format!("Service {} added to systemd - {}", svc.name, path).green()
    );
    Ok(())
}
