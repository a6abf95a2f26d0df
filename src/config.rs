//! Runtime configuration shared by all commands

use std::path::PathBuf;

use crate::store::{Store, DEFAULT_MODE};
use crate::units::DOTNET_CLI;

pub const DEFAULT_SERVICE_DIR: &str = "/etc/systemd/system/";
pub const DEFAULT_ENV_DIR: &str = "/etc/systemd/system/env/";
pub const DEFAULT_PREFIX: &str = "netapp.";

/// Where managed services live and how they are named
#[derive(Debug, Clone)]
pub struct Config {
    pub service_dir: PathBuf,
    pub env_dir: PathBuf,
    /// Namespace separating managed services from the rest of the directory
    pub prefix: String,
    /// .NET CLI used as the runtime command in `ExecStart=`
    pub dotnet: PathBuf,
    /// Permission bits for written files
    pub mode: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_dir: PathBuf::from(DEFAULT_SERVICE_DIR),
            env_dir: PathBuf::from(DEFAULT_ENV_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            dotnet: PathBuf::from(DOTNET_CLI),
            mode: DEFAULT_MODE,
        }
    }
}

impl Config {
    /// Unit name for a user-supplied service name: prefix prepended when
    /// missing, `.service` suffix dropped
    pub fn unit_name(&self, name: &str) -> String {
        let name = name.trim();
        let name = name.strip_suffix(".service").unwrap_or(name);
        if name.starts_with(&self.prefix) {
            name.to_string()
        } else {
            format!("{}{}", self.prefix, name)
        }
    }

    /// Name shown to the user, without the prefix
    pub fn display_name<'a>(&self, unit_name: &'a str) -> &'a str {
        match unit_name.strip_prefix(&self.prefix) {
            Some(short) if !short.is_empty() => short,
            _ => unit_name,
        }
    }

    pub fn store(&self) -> Store {
        Store::new(&self.service_dir, &self.env_dir).with_mode(self.mode)
    }
}

/// Parse an octal file mode such as `644` or `0o640`
pub fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim().trim_start_matches("0o");
    let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("invalid mode '{}': {}", s, e))?;
    if mode > 0o7777 {
        return Err(format!("invalid mode '{}': out of range", s));
    }
    Ok(mode)
}
