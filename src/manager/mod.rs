//! Service lifecycle
//!
//! Coordinates unit files on disk with their registration and run state in
//! the init system.

mod state;
mod systemctl;

pub use state::{ActiveState, EnabledState};
pub use systemctl::{InitSystem, Systemctl};

use crate::store::{Store, StoreError};
use crate::units::Service;

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Service is currently active: {0}. Use --force to delete it anyway")]
    Active(String),

    #[error("{command} failed (exit code {code:?}): {stderr}")]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives services through the init system and the file store
pub struct Manager<S = Systemctl> {
    store: Store,
    init: S,
}

impl Manager<Systemctl> {
    /// Manager backed by `systemctl`
    pub fn new(store: Store) -> Self {
        Self::with_init_system(store, Systemctl::new())
    }
}

impl<S: InitSystem> Manager<S> {
    pub fn with_init_system(store: Store, init: S) -> Self {
        Self { store, init }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn init_system(&self) -> &S {
        &self.init
    }

    /// Registration state. Query failures read as `Unknown`.
    pub async fn is_enabled(&self, svc: &Service) -> EnabledState {
        match self.init.query_enabled(&svc.unit_name()).await {
            Ok(out) => EnabledState::parse(&out),
            Err(e) => {
                log::debug!("is-enabled {} failed: {}", svc.unit_name(), e);
                EnabledState::Unknown
            }
        }
    }

    /// Run state. Query failures read as `Unknown`.
    pub async fn is_active(&self, svc: &Service) -> ActiveState {
        match self.init.query_active(&svc.unit_name()).await {
            Ok(out) => ActiveState::parse(&out),
            Err(e) => {
                log::debug!("is-active {} failed: {}", svc.unit_name(), e);
                ActiveState::Unknown
            }
        }
    }

    /// Start unless already running. Returns whether start was issued.
    pub async fn start(&self, svc: &Service) -> Result<bool, ManagerError> {
        let state = self.is_active(svc).await;
        if matches!(state, ActiveState::Active | ActiveState::Activating) {
            log::info!("{} is already {}", svc.unit_name(), state);
            return Ok(false);
        }
        self.init.start(&svc.unit_name()).await?;
        Ok(true)
    }

    /// Stop if running. Returns whether stop was issued.
    pub async fn stop(&self, svc: &Service) -> Result<bool, ManagerError> {
        let state = self.is_active(svc).await;
        if !matches!(state, ActiveState::Active | ActiveState::Activating) {
            log::info!("{} is not running ({})", svc.unit_name(), state);
            return Ok(false);
        }
        self.init.stop(&svc.unit_name()).await?;
        Ok(true)
    }

    /// Enable the unit to start at boot
    pub async fn enable(&self, svc: &Service) -> Result<(), ManagerError> {
        self.init.enable(&svc.unit_name()).await
    }

    /// Make the init system re-read unit files
    pub async fn reload(&self) -> Result<(), ManagerError> {
        self.init.daemon_reload().await
    }

    /// Save a new service and register it: daemon-reload, then enable
    pub async fn install(&self, svc: &mut Service) -> Result<(), ManagerError> {
        self.store.save(svc, false).await?;
        self.reload().await?;
        self.enable(svc).await
    }

    /// Rewrite an existing service (previous files kept as `.bak`) and
    /// daemon-reload
    pub async fn update(&self, svc: &mut Service) -> Result<(), ManagerError> {
        self.store.save(svc, true).await?;
        self.reload().await
    }

    /// Unregister and remove a service
    ///
    /// Refused while the service is active unless `force` is set. The unit
    /// is disabled before its files are removed, then the daemon reloads.
    /// With `cleanup`, `.bak` files go too.
    pub async fn delete(&self, svc: &Service, force: bool, cleanup: bool) -> Result<(), ManagerError> {
        if !force && self.is_active(svc).await == ActiveState::Active {
            return Err(ManagerError::Active(svc.unit_name()));
        }

        self.init.disable(&svc.unit_name()).await?;
        self.store.remove(svc, cleanup).await?;
        self.reload().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and reports a fixed active state
    struct FakeInit {
        active: String,
        calls: Mutex<Vec<String>>,
    }

    impl FakeInit {
        fn new(active: &str) -> Self {
            Self {
                active: active.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InitSystem for FakeInit {
        async fn query_enabled(&self, _unit: &str) -> Result<String, ManagerError> {
            Err(ManagerError::Io("no systemctl".into()))
        }
        async fn query_active(&self, _unit: &str) -> Result<String, ManagerError> {
            Ok(self.active.clone())
        }
        async fn enable(&self, unit: &str) -> Result<(), ManagerError> {
            self.record(format!("enable {}", unit));
            Ok(())
        }
        async fn disable(&self, unit: &str) -> Result<(), ManagerError> {
            self.record(format!("disable {}", unit));
            Ok(())
        }
        async fn start(&self, unit: &str) -> Result<(), ManagerError> {
            self.record(format!("start {}", unit));
            Ok(())
        }
        async fn stop(&self, unit: &str) -> Result<(), ManagerError> {
            self.record(format!("stop {}", unit));
            Ok(())
        }
        async fn daemon_reload(&self) -> Result<(), ManagerError> {
            self.record("daemon-reload".to_string());
            Ok(())
        }
    }

    fn manager(active: &str) -> Manager<FakeInit> {
        Manager::with_init_system(Store::new("/nonexistent", "/nonexistent"), FakeInit::new(active))
    }

    #[test]
    fn test_query_failure_is_unknown() {
        let mgr = manager("active");
        let svc = Service::new("netapp.api");
        let state = tokio_test::block_on(mgr.is_enabled(&svc));
        assert_eq!(state, EnabledState::Unknown);
    }

    #[test]
    fn test_start_skips_running() {
        for state in ["active", "activating"] {
            let mgr = manager(state);
            let svc = Service::new("netapp.api");
            assert!(!tokio_test::block_on(mgr.start(&svc)).unwrap());
            assert!(mgr.init_system().calls().is_empty());
        }
    }

    #[test]
    fn test_start_when_stopped() {
        for state in ["inactive", "failed", ""] {
            let mgr = manager(state);
            let svc = Service::new("netapp.api");
            assert!(tokio_test::block_on(mgr.start(&svc)).unwrap());
            assert_eq!(mgr.init_system().calls(), vec!["start netapp.api.service"]);
        }
    }

    #[test]
    fn test_stop_only_when_running() {
        let mgr = manager("inactive");
        let svc = Service::new("netapp.api");
        assert!(!tokio_test::block_on(mgr.stop(&svc)).unwrap());
        assert!(mgr.init_system().calls().is_empty());

        let mgr = manager("activating");
        assert!(tokio_test::block_on(mgr.stop(&svc)).unwrap());
        assert_eq!(mgr.init_system().calls(), vec!["stop netapp.api.service"]);
    }

    #[test]
    fn test_delete_active_without_force() {
        let mgr = manager("active");
        let svc = Service::new("netapp.api");
        let result = tokio_test::block_on(mgr.delete(&svc, false, false));
        assert!(matches!(result, Err(ManagerError::Active(_))));
        assert!(mgr.init_system().calls().is_empty());
    }
}
