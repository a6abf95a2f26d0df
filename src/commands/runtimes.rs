//! List installed .NET runtimes

use systemd_net::{dotnet, Config};

use super::CommandResult;

pub async fn runtimes(config: &Config) -> CommandResult {
    if !dotnet::is_installed(&config.dotnet) {
        log::warn!(
            "{} not found. Only self-contained apps can run.",
            config.dotnet.display()
        );
    }

    for (idx, runtime) in dotnet::list_runtimes(&config.dotnet).await.iter().enumerate() {
        if runtime.path.is_empty() {
            println!("{}: {}", idx, runtime.name);
        } else {
            println!("{}: {} [{}]", idx, runtime.name, runtime.path);
        }
    }
    Ok(())
}
