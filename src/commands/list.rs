//! List managed services

use owo_colors::OwoColorize;
use systemd_net::{ActiveState, Config, Manager};

use super::CommandResult;

pub async fn list(config: &Config) -> CommandResult {
    let manager = Manager::new(config.store());
    let services = manager.store().list(&config.prefix).await?;

    if services.is_empty() {
        println!("No services registered.");
        return Ok(());
    }

    for svc in &services {
        let enabled = manager.is_enabled(svc).await;
        let active = manager.is_active(svc).await;
        let active = match active {
            ActiveState::Active => active.green().to_string(),
            ActiveState::Failed => active.red().to_string(),
            ActiveState::Activating | ActiveState::Deactivating | ActiveState::Reloading => {
                active.yellow().to_string()
            }
            _ => active.to_string(),
        };
        println!(
            "{}; {}; {}; {}",
            config.display_name(&svc.name),
            svc.aspnetcore_urls().unwrap_or("-"),
            enabled,
            active
        );
    }
    Ok(())
}
