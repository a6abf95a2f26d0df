//! Integration tests for service lifecycle against a recording init system

use std::sync::Mutex;

use systemd_net::store::backup_path;
use systemd_net::{InitSystem, Manager, ManagerError, Service, Store};
use tempfile::TempDir;

/// Records every imperative call; reports a fixed active state
struct RecordingInit {
    active: &'static str,
    fail_disable: bool,
    calls: Mutex<Vec<String>>,
}

impl RecordingInit {
    fn new(active: &'static str) -> Self {
        Self {
            active,
            fail_disable: false,
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

impl InitSystem for RecordingInit {
    async fn query_enabled(&self, _unit: &str) -> Result<String, ManagerError> {
        Ok("enabled".to_string())
    }

    async fn query_active(&self, _unit: &str) -> Result<String, ManagerError> {
        Ok(self.active.to_string())
    }

    async fn enable(&self, unit: &str) -> Result<(), ManagerError> {
        self.record(format!("enable {}", unit));
        Ok(())
    }

    async fn disable(&self, unit: &str) -> Result<(), ManagerError> {
        self.record(format!("disable {}", unit));
        if self.fail_disable {
            return Err(ManagerError::Command {
                command: format!("systemctl disable {}", unit),
                code: Some(1),
                stderr: "Access denied".to_string(),
            });
        }
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

fn manager(dir: &TempDir, init: RecordingInit) -> Manager<RecordingInit> {
    Manager::with_init_system(Store::new(dir.path(), dir.path()), init)
}

/// Save a service straight through the store, bypassing the init system
async fn saved(dir: &TempDir, name: &str) -> Service {
    let mut svc = Service::new(name);
    svc.service
        .set_exec_start("/srv/api/Api.dll", "/usr/bin/dotnet", false)
        .unwrap();
    svc.set_aspnetcore_urls("http://+:5000");
    Store::new(dir.path(), dir.path())
        .save(&mut svc, false)
        .await
        .unwrap();
    svc
}

#[tokio::test]
async fn test_install_reloads_then_enables() {
    let dir = TempDir::new().unwrap();
    let mgr = manager(&dir, RecordingInit::new("inactive"));
    let mut svc = Service::new("netapp.api");

    mgr.install(&mut svc).await.unwrap();

    assert!(dir.path().join("netapp.api.service").is_file());
    assert_eq!(
        mgr.init_system().calls(),
        vec!["daemon-reload", "enable netapp.api.service"]
    );
}

#[tokio::test]
async fn test_install_refuses_existing_service() {
    let dir = TempDir::new().unwrap();
    let mut svc = saved(&dir, "netapp.api").await;
    let mgr = manager(&dir, RecordingInit::new("inactive"));

    let result = mgr.install(&mut svc).await;
    assert!(matches!(result, Err(ManagerError::Store(_))));
    assert!(mgr.init_system().calls().is_empty());
}

#[tokio::test]
async fn test_update_keeps_backup_and_reloads() {
    let dir = TempDir::new().unwrap();
    let mut svc = saved(&dir, "netapp.api").await;
    let mgr = manager(&dir, RecordingInit::new("active"));

    svc.set_description("Updated");
    mgr.update(&mut svc).await.unwrap();

    assert!(backup_path(&dir.path().join("netapp.api.service")).exists());
    assert_eq!(mgr.init_system().calls(), vec!["daemon-reload"]);
}

#[tokio::test]
async fn test_delete_active_without_force_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let svc = saved(&dir, "netapp.api").await;
    let mgr = manager(&dir, RecordingInit::new("active"));

    let result = mgr.delete(&svc, false, false).await;

    assert!(matches!(result, Err(ManagerError::Active(_))));
    assert!(dir.path().join("netapp.api.service").exists());
    assert!(dir.path().join("netapp.api.env").exists());
    assert!(mgr.init_system().calls().is_empty());
}

#[tokio::test]
async fn test_delete_active_with_force() {
    let dir = TempDir::new().unwrap();
    let svc = saved(&dir, "netapp.api").await;
    let mgr = manager(&dir, RecordingInit::new("active"));

    mgr.delete(&svc, true, false).await.unwrap();

    assert!(!dir.path().join("netapp.api.service").exists());
    assert!(!dir.path().join("netapp.api.env").exists());
    assert_eq!(
        mgr.init_system().calls(),
        vec!["disable netapp.api.service", "daemon-reload"]
    );
}

#[tokio::test]
async fn test_delete_inactive_with_cleanup() {
    let dir = TempDir::new().unwrap();
    let mut svc = saved(&dir, "netapp.api").await;
    Store::new(dir.path(), dir.path())
        .save(&mut svc, true)
        .await
        .unwrap();
    let mgr = manager(&dir, RecordingInit::new("inactive"));

    mgr.delete(&svc, false, true).await.unwrap();

    let remaining: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_delete_keeps_files_when_disable_fails() {
    let dir = TempDir::new().unwrap();
    let svc = saved(&dir, "netapp.api").await;
    let mut init = RecordingInit::new("inactive");
    init.fail_disable = true;
    let mgr = manager(&dir, init);

    let result = mgr.delete(&svc, false, false).await;

    assert!(matches!(result, Err(ManagerError::Command { .. })));
    assert!(dir.path().join("netapp.api.service").exists());
    assert_eq!(mgr.init_system().calls(), vec!["disable netapp.api.service"]);
}

#[tokio::test]
async fn test_status_probes() {
    let dir = TempDir::new().unwrap();
    let svc = saved(&dir, "netapp.api").await;
    let mgr = manager(&dir, RecordingInit::new("failed"));

    assert!(mgr.is_enabled(&svc).await.is_enabled());
    assert_eq!(mgr.is_active(&svc).await, systemd_net::ActiveState::Failed);
    assert!(mgr.init_system().calls().is_empty());
}
