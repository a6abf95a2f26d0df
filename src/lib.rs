//! systemd-net - manage systemd services for .NET applications
//!
//! Creates, lists, edits, starts, stops and deletes services through a thin
//! layer over systemd:
//! - Parses `.service` unit files and their `.env` environment files
//! - Writes them back with a backup-before-overwrite protocol
//! - Coordinates file state with `systemctl`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  systemd-net CLI                 │
//! ├─────────────────────────────────────────────────┤
//! │      Lifecycle Manager      │   File Store      │
//! ├─────────────────────────────────────────────────┤
//! │   Service model (Unit / Service / Install, env)  │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dotnet;
pub mod manager;
pub mod store;
pub mod units;

pub use config::Config;
pub use manager::{ActiveState, EnabledState, InitSystem, Manager, ManagerError, Systemctl};
pub use store::{Store, StoreError};
pub use units::{Environment, InstallSection, Section, Service, ServiceSection, UnitSection};
