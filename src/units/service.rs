//! Managed .NET service: three unit sections plus its environment file

use std::path::PathBuf;

use super::environment::{Environment, ASPNETCORE_ENVIRONMENT, ASPNETCORE_URLS};
use super::{InstallSection, ServiceSection, UnitSection};

/// Default runtime command prepended to `ExecStart=`
pub const DOTNET_CLI: &str = "/usr/bin/dotnet";

/// A service unit and its environment
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Unit name without the `.service` suffix
    pub name: String,
    /// Unit file location, set once loaded or saved
    pub path: Option<PathBuf>,
    pub unit: UnitSection,
    pub service: ServiceSection,
    pub install: InstallSection,
    pub environment: Environment,
}

impl Service {
    /// Blank service with default sections
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            unit: UnitSection::default(),
            service: ServiceSection::default(),
            install: InstallSection::default(),
            environment: Environment::new(),
        }
    }

    /// Full unit name as known to systemd (`name.service`)
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.unit.description()
    }

    pub fn set_description(&mut self, value: &str) {
        self.unit.set_description(value);
    }

    pub fn environment_file(&self) -> Option<&str> {
        self.service.get("EnvironmentFile")
    }

    pub fn set_environment_file(&mut self, path: &str) {
        self.service.set("EnvironmentFile", path);
    }

    pub fn exec_user(&self) -> Option<&str> {
        self.service.get("User")
    }

    pub fn set_exec_user(&mut self, user: &str) {
        self.service.set("User", user);
    }

    pub fn exec_group(&self) -> Option<&str> {
        self.service.get("Group")
    }

    pub fn set_exec_group(&mut self, group: &str) {
        self.service.set("Group", group);
    }

    pub fn aspnetcore_urls(&self) -> Option<&str> {
        self.environment.get(ASPNETCORE_URLS)
    }

    pub fn set_aspnetcore_urls(&mut self, value: &str) {
        self.environment.set(ASPNETCORE_URLS, value);
    }

    pub fn aspnetcore_environment(&self) -> Option<&str> {
        self.environment.get(ASPNETCORE_ENVIRONMENT)
    }

    pub fn set_aspnetcore_environment(&mut self, value: &str) {
        self.environment.set(ASPNETCORE_ENVIRONMENT, value);
    }

    /// `ExecStart=` split into program and arguments with shell quoting.
    /// Returns `None` when unset, blank, or unbalanced.
    pub fn exec_command(&self) -> Option<Vec<String>> {
        let raw = self.service.exec_start()?.trim();
        if raw.is_empty() {
            return None;
        }
        shlex::split(raw)
    }
}
