//! Start a service

use owo_colors::OwoColorize;
use systemd_net::{Config, Manager};

use super::CommandResult;

pub async fn start(config: &Config, name: &str) -> CommandResult {
    let store = config.store();
    let svc = store.load(&config.unit_name(name)).await?;

    let manager = Manager::new(store);
    if manager.start(&svc).await? {
        println!("{}", format!("Service {} started", svc.name).green());
    } else {
        println!("{}", format!("Service {} is already running", svc.name).yellow());
    }
    Ok(())
}
