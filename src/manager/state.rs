//! Observed init-system state of a unit
//!
//! Status probes never fail: anything the init system reports that cannot
//! be read collapses into `Unknown`.

use std::fmt;

/// `systemctl is-active` result (maps to systemd's ActiveState)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveState {
    Active,
    Reloading,
    Activating,
    Deactivating,
    Inactive,
    Failed,
    #[default]
    Unknown,
}

impl ActiveState {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "active" => Self::Active,
            "reloading" => Self::Reloading,
            "activating" => Self::Activating,
            "deactivating" => Self::Deactivating,
            "inactive" => Self::Inactive,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Reloading => "reloading",
            Self::Activating => "activating",
            Self::Deactivating => "deactivating",
            Self::Inactive => "inactive",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// Running or on its way up; start is a no-op and stop applies
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Active | Self::Activating | Self::Reloading)
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `systemctl is-enabled` result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnabledState {
    Enabled,
    EnabledRuntime,
    Linked,
    Masked,
    Static,
    Indirect,
    Disabled,
    Generated,
    Transient,
    #[default]
    Unknown,
}

impl EnabledState {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "enabled" => Self::Enabled,
            "enabled-runtime" => Self::EnabledRuntime,
            "linked" | "linked-runtime" => Self::Linked,
            "masked" | "masked-runtime" => Self::Masked,
            "static" => Self::Static,
            "indirect" => Self::Indirect,
            "disabled" => Self::Disabled,
            "generated" => Self::Generated,
            "transient" => Self::Transient,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::EnabledRuntime => "enabled-runtime",
            Self::Linked => "linked",
            Self::Masked => "masked",
            Self::Static => "static",
            Self::Indirect => "indirect",
            Self::Disabled => "disabled",
            Self::Generated => "generated",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled | Self::EnabledRuntime)
    }
}

impl fmt::Display for EnabledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
