//! Unit file parsing and the managed service model
//!
//! Reads `.service` files and their environment files into [`Service`].

mod environment;
mod parser;
mod section;
mod service;

pub use environment::{Environment, ASPNETCORE_ENVIRONMENT, ASPNETCORE_URLS};
pub use parser::{parse_environment, parse_file, parse_unit_file, ParseError, ParsedFile};
pub use section::{InstallSection, Section, ServiceSection, UnitSection};
pub use service::{Service, DOTNET_CLI};

use std::path::{Path, PathBuf};

/// Sections a managed unit file must have
const REQUIRED_SECTIONS: &[&str] = &["Unit", "Service"];

/// Build a service from parsed INI data, layered over the defaults
pub fn parse_service(name: &str, parsed: &ParsedFile) -> Service {
    let mut svc = Service::new(name);

    if let Some(unit) = parsed.get("Unit") {
        svc.unit.merge(unit);
    }
    if let Some(service) = parsed.get("Service") {
        svc.service.merge(service);
    }
    if let Some(install) = parsed.get("Install") {
        svc.install.merge(install);
    }

    svc
}

/// Load a service from its unit file, including the environment file it
/// references
///
/// A missing environment file is not an error: the environment stays empty.
pub async fn load_service(path: &Path) -> Result<Service, ParseError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".service"))
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseError::NotAService(path.to_path_buf()))?;

    let parsed = parse_unit_file(path).await?;
    for &section in REQUIRED_SECTIONS {
        if !parsed.contains_key(section) {
            return Err(ParseError::MissingSection {
                path: path.to_path_buf(),
                section,
            });
        }
    }

    let mut svc = parse_service(name, &parsed);
    svc.path = Some(path.to_path_buf());

    let env_file = svc
        .environment_file()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PathBuf::from);
    if let Some(env_path) = env_file {
        if tokio::fs::try_exists(&env_path).await.unwrap_or(false) {
            svc.environment = load_environment(&env_path).await?;
        } else {
            log::warn!("Missing EnvironmentFile {}", env_path.display());
        }
    }

    log::debug!("Loaded {} from {}", svc.unit_name(), path.display());
    Ok(svc)
}

/// Load an environment file
pub async fn load_environment(path: &Path) -> Result<Environment, ParseError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(Environment::parse(&content))
}
