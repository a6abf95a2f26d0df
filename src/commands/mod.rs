mod add;
mod delete;
mod edit;
mod list;
mod runtimes;
mod start;
mod stop;

pub use add::{add, AddArgs};
pub use delete::delete;
pub use edit::{edit, EditArgs};
pub use list::list;
pub use runtimes::runtimes;
pub use start::start;
pub use stop::stop;

use std::path::PathBuf;

use clap::Args;
use systemd_net::Service;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Settings shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct ServiceOptions {
    /// Unit description
    #[arg(long)]
    pub description: Option<String>,

    /// Account the service runs as
    #[arg(long)]
    pub user: Option<String>,

    /// Group the service runs as
    #[arg(long)]
    pub group: Option<String>,

    /// Working directory (must exist)
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// ASPNETCORE_URLS environment variable
    #[arg(long)]
    pub aspnetcore_urls: Option<String>,

    /// ASPNETCORE_ENVIRONMENT environment variable
    #[arg(long)]
    pub aspnetcore_env: Option<String>,

    /// Extra environment variable, repeatable
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,
}

impl ServiceOptions {
    /// Apply every option that was given
    pub fn apply(&self, svc: &mut Service) -> CommandResult {
        if let Some(dir) = &self.working_dir {
            svc.service.set_working_directory(&dir.to_string_lossy(), true)?;
        }
        if let Some(description) = &self.description {
            svc.set_description(description);
        }
        if let Some(user) = &self.user {
            if !matches!(nix::unistd::User::from_name(user), Ok(Some(_))) {
                log::warn!("User {} does not exist on this host", user);
            }
            svc.set_exec_user(user);
        }
        if let Some(group) = &self.group {
            if !matches!(nix::unistd::Group::from_name(group), Ok(Some(_))) {
                log::warn!("Group {} does not exist on this host", group);
            }
            svc.set_exec_group(group);
        }
        if let Some(urls) = self.aspnetcore_urls.as_deref().filter(|u| !u.trim().is_empty()) {
            svc.set_aspnetcore_urls(urls);
        }
        if let Some(env) = &self.aspnetcore_env {
            svc.set_aspnetcore_environment(env);
        }
        for (key, value) in &self.env {
            svc.environment.set(key, value);
        }
        Ok(())
    }
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
