//! Stop a service

use owo_colors::OwoColorize;
use systemd_net::{Config, Manager};

use super::CommandResult;

pub async fn stop(config: &Config, name: &str) -> CommandResult {
    let store = config.store();
    let svc = store.load(&config.unit_name(name)).await?;

    let manager = Manager::new(store);
    if manager.stop(&svc).await? {
        println!("{}", format!("Service {} stopped", svc.name).green());
    } else {
        println!("{}", format!("Service {} is not running", svc.name).yellow());
    }
    Ok(())
}
