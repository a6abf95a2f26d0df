//! Init-system collaborator
//!
//! Everything the manager asks of systemd goes through [`InitSystem`]. The
//! production implementation shells out to `systemctl`.

use std::path::PathBuf;
use tokio::process::Command;

use super::ManagerError;

/// Operations the manager needs from the init system
#[allow(async_fn_in_trait)]
pub trait InitSystem {
    /// Raw `is-enabled` output for a unit
    async fn query_enabled(&self, unit: &str) -> Result<String, ManagerError>;
    /// Raw `is-active` output for a unit
    async fn query_active(&self, unit: &str) -> Result<String, ManagerError>;
    async fn enable(&self, unit: &str) -> Result<(), ManagerError>;
    async fn disable(&self, unit: &str) -> Result<(), ManagerError>;
    async fn start(&self, unit: &str) -> Result<(), ManagerError>;
    async fn stop(&self, unit: &str) -> Result<(), ManagerError>;
    async fn daemon_reload(&self) -> Result<(), ManagerError>;
}

/// `systemctl` subprocess driver
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: PathBuf,
}

impl Default for Systemctl {
    fn default() -> Self {
        Self {
            program: PathBuf::from("systemctl"),
        }
    }
}

/// Captured result of one invocation
struct Output {
    success: bool,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Systemctl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary (e.g. a wrapper script)
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, ManagerError> {
        log::debug!("Running {} {}", self.program.display(), args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| ManagerError::Io(format!("{}: {}", self.program.display(), e)))?;

        Ok(Output {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Status verbs exit non-zero for perfectly normal answers ("inactive",
    /// "disabled"), so only stdout matters
    async fn query(&self, verb: &str, unit: &str) -> Result<String, ManagerError> {
        let output = self.run(&[verb, unit]).await?;
        Ok(output.stdout.trim().to_string())
    }

    async fn invoke(&self, args: &[&str]) -> Result<(), ManagerError> {
        let output = self.run(args).await?;
        if output.success {
            return Ok(());
        }
        Err(ManagerError::Command {
            command: format!("{} {}", self.program.display(), args.join(" ")),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

impl InitSystem for Systemctl {
    async fn query_enabled(&self, unit: &str) -> Result<String, ManagerError> {
        self.query("is-enabled", unit).await
    }

    async fn query_active(&self, unit: &str) -> Result<String, ManagerError> {
        self.query("is-active", unit).await
    }

    async fn enable(&self, unit: &str) -> Result<(), ManagerError> {
        self.invoke(&["enable", unit]).await
    }

    async fn disable(&self, unit: &str) -> Result<(), ManagerError> {
        self.invoke(&["disable", unit]).await
    }

    async fn start(&self, unit: &str) -> Result<(), ManagerError> {
        self.invoke(&["start", unit]).await
    }

    async fn stop(&self, unit: &str) -> Result<(), ManagerError> {
        self.invoke(&["stop", unit]).await
    }

    async fn daemon_reload(&self) -> Result<(), ManagerError> {
        self.invoke(&["daemon-reload"]).await
    }
}
