//! Unit and environment file persistence
//!
//! Discovers managed services by prefix, and writes them back with a
//! backup-before-overwrite protocol: an existing file is renamed to
//! `{path}.bak` before the new one is written.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::units::{self, ParseError, Service};

/// First line of every generated file
pub const FILEGEN_COMMENT: &str = "# This file was automatically created using systemd-net utility";

/// Default mode for written files (rw-r--r--)
pub const DEFAULT_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("File {0} exists and rewrite is disabled")]
    AlreadyExists(PathBuf),

    #[error("Service not found - {0}")]
    NotFound(PathBuf),

    #[error("Invalid service pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Unit files in one directory, environment files in another
#[derive(Debug, Clone)]
pub struct Store {
    unit_dir: PathBuf,
    env_dir: PathBuf,
    mode: u32,
}

impl Store {
    pub fn new(unit_dir: impl Into<PathBuf>, env_dir: impl Into<PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
            env_dir: env_dir.into(),
            mode: DEFAULT_MODE,
        }
    }

    /// Permission bits applied to every written file
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn unit_dir(&self) -> &Path {
        &self.unit_dir
    }

    pub fn env_dir(&self) -> &Path {
        &self.env_dir
    }

    /// `{unit_dir}/{name}.service`
    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.unit_dir.join(format!("{}.service", name))
    }

    /// A new unsaved service with its environment file placed in the
    /// environment directory. Fails if the unit file already exists.
    pub async fn create_blank(&self, name: &str) -> Result<Service, StoreError> {
        let name = name.trim();
        let name = name.strip_suffix(".service").unwrap_or(name);
        let path = self.unit_path(name);
        if exists(&path).await {
            return Err(StoreError::AlreadyExists(path));
        }

        let mut svc = Service::new(name);
        svc.service.set("SyslogIdentifier", name);
        let env_path = self.env_dir.join(format!("{}.env", name));
        svc.set_environment_file(&env_path.to_string_lossy());
        Ok(svc)
    }

    /// Load a managed service by name
    pub async fn load(&self, name: &str) -> Result<Service, StoreError> {
        let path = self.unit_path(name);
        if !exists(&path).await {
            return Err(StoreError::NotFound(path));
        }
        Ok(units::load_service(&path).await?)
    }

    /// Unit files matching `{prefix}*.service`, sorted by path
    pub fn list_files(&self, prefix: &str) -> Result<Vec<PathBuf>, StoreError> {
        let pattern = format!(
            "{}/{}*.service",
            glob::Pattern::escape(&self.unit_dir.to_string_lossy()),
            glob::Pattern::escape(prefix)
        );
        let mut files: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Unable to access {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    /// Load every service matching the prefix. Files that fail to parse are
    /// skipped with a warning.
    pub async fn list(&self, prefix: &str) -> Result<Vec<Service>, StoreError> {
        let mut services = Vec::new();
        for path in self.list_files(prefix)? {
            match units::load_service(&path).await {
                Ok(svc) => services.push(svc),
                Err(e) => log::warn!("Unable to read service {}: {}", path.display(), e),
            }
        }
        Ok(services)
    }

    /// Environment file path for `svc`: its `EnvironmentFile=` if set,
    /// otherwise `{unit_dir}/{name}.env`
    pub fn env_path(&self, svc: &Service) -> PathBuf {
        match svc.environment_file().map(str::trim) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.unit_dir.join(format!("{}.env", svc.name)),
        }
    }

    /// Write the unit file and its environment file
    ///
    /// Both targets are checked before anything is touched: with `overwrite`
    /// disabled an existing file fails the whole save. Otherwise existing
    /// files are renamed to `.bak` (replacing older backups) first.
    pub async fn save(&self, svc: &mut Service, overwrite: bool) -> Result<(), StoreError> {
        let unit_path = self.unit_path(&svc.name);
        let env_path = self.env_path(svc);
        svc.set_environment_file(&env_path.to_string_lossy());

        let mut to_backup = Vec::new();
        for path in [&unit_path, &env_path] {
            if exists(path).await {
                if !overwrite {
                    return Err(StoreError::AlreadyExists(path.clone()));
                }
                to_backup.push(path);
            }
        }

        for path in to_backup {
            let backup = backup_path(path);
            log::debug!("Backing up {} to {}", path.display(), backup.display());
            tokio::fs::rename(path, &backup).await.map_err(io_err(path))?;
        }

        let stamp = timestamp();
        let unit_content = [
            FILEGEN_COMMENT.to_string(),
            stamp.clone(),
            String::new(),
            svc.unit.format(),
            String::new(),
            svc.service.format(),
            String::new(),
            svc.install.format(),
        ]
        .join("\n");
        self.write_file(&unit_path, unit_content).await?;
        svc.path = Some(unit_path);

        let mut env_lines = vec![FILEGEN_COMMENT.to_string(), stamp];
        env_lines.extend(svc.environment.format_lines());
        self.write_file(&env_path, env_lines.join("\n")).await?;

        Ok(())
    }

    /// Remove the unit file and its environment file, and with `cleanup`
    /// their backups too. Missing files are skipped.
    pub async fn remove(&self, svc: &Service, cleanup: bool) -> Result<(), StoreError> {
        let unit_path = svc
            .path
            .clone()
            .unwrap_or_else(|| self.unit_path(&svc.name));

        let env_file = svc
            .environment_file()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from);

        for path in env_file.iter().chain(std::iter::once(&unit_path)) {
            if cleanup {
                remove_if_exists(&backup_path(path)).await?;
            }
            remove_if_exists(path).await?;
        }
        Ok(())
    }

    async fn write_file(&self, path: &Path, mut content: String) -> Result<(), StoreError> {
        content.push('\n');
        tokio::fs::write(path, content).await.map_err(io_err(path))?;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(self.mode))
            .await
            .map_err(io_err(path))?;
        log::debug!("Wrote {} (mode {:o})", path.display(), self.mode);
        Ok(())
    }
}

/// `{path}.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn timestamp() -> String {
    format!("# {}", chrono::Local::now().format("%d/%m/%Y %H:%M:%S"))
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    if exists(path).await {
        tokio::fs::remove_file(path).await.map_err(io_err(path))?;
        log::debug!("Removed {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/etc/systemd/system/netapp.api.service")),
            PathBuf::from("/etc/systemd/system/netapp.api.service.bak")
        );
    }

    #[test]
    fn test_env_path_default_and_explicit() {
        let store = Store::new("/units", "/envs");
        let mut svc = Service::new("netapp.api");
        assert_eq!(store.env_path(&svc), PathBuf::from("/units/netapp.api.env"));

        svc.set_environment_file("   ");
        assert_eq!(store.env_path(&svc), PathBuf::from("/units/netapp.api.env"));

        svc.set_environment_file("/envs/custom.env");
        assert_eq!(store.env_path(&svc), PathBuf::from("/envs/custom.env"));
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp();
        assert!(stamp.starts_with("# "));
        // dd/mm/YYYY HH:MM:SS
        assert_eq!(stamp.len(), 2 + 19);
    }
}
