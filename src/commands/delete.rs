//! Delete a service

use owo_colors::OwoColorize;
use systemd_net::{Config, Manager};

use super::CommandResult;

pub async fn delete(config: &Config, name: &str, force: bool, cleanup: bool) -> CommandResult {
    let store = config.store();
    let svc = store.load(&config.unit_name(name)).await?;

    let manager = Manager::new(store);
    manager.delete(&svc, force, cleanup).await?;

    println!(
        "{}",
        format!("Service '{}' deleted from systemd", svc.name).green()
    );
    Ok(())
}
