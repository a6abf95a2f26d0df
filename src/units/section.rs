//! Named key-value sections and the three section kinds of a managed unit

use indexmap::IndexMap;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use super::ParseError;

/// A named section holding `Key=Value` properties in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    properties: IndexMap<String, String>,
}

impl Section {
    /// Create an empty section. Fails if the name is blank.
    pub fn new(name: &str) -> Result<Self, ParseError> {
        if name.trim().is_empty() {
            return Err(ParseError::InvalidSectionName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            properties: IndexMap::new(),
        })
    }

    /// Create a section seeded with properties
    fn seeded(name: &'static str, defaults: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            properties: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Set a property. An existing key keeps its position.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Copy every property from `entries` over this section
    pub fn merge<'a>(&mut self, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (key, value) in entries {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    /// Render as `[Name]` followed by one `Key=Value` line per property
    pub fn format(&self) -> String {
        let mut lines = vec![format!("[{}]", self.name)];
        lines.extend(self.properties.iter().map(|(k, v)| format!("{}={}", k, v)));
        lines.join("\n")
    }
}

/// [Unit] section
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSection(Section);

impl Default for UnitSection {
    fn default() -> Self {
        Self(Section::seeded("Unit", &[("Description", ".NET Application")]))
    }
}

impl UnitSection {
    pub fn description(&self) -> Option<&str> {
        self.get("Description")
    }

    pub fn set_description(&mut self, value: &str) {
        self.set("Description", value);
    }
}

/// [Service] section
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSection(Section);

impl Default for ServiceSection {
    fn default() -> Self {
        Self(Section::seeded(
            "Service",
            &[
                ("WorkingDirectory", ""),
                ("ExecStart", ""),
                ("Restart", "always"),
                ("RestartSec", "5"),
                ("KillSignal", "SIGINT"),
                ("User", "www-data"),
                ("Group", "www-data"),
            ],
        ))
    }
}

impl ServiceSection {
    pub fn working_directory(&self) -> Option<&str> {
        self.get("WorkingDirectory")
    }

    /// Set `WorkingDirectory=`. With `ensure_exists` the path must be an
    /// existing directory.
    pub fn set_working_directory(
        &mut self,
        path: &str,
        ensure_exists: bool,
    ) -> Result<(), ParseError> {
        if ensure_exists && !Path::new(path).is_dir() {
            return Err(ParseError::NotADirectory(path.into()));
        }
        self.set("WorkingDirectory", path);
        Ok(())
    }

    pub fn exec_start(&self) -> Option<&str> {
        self.get("ExecStart")
    }

    /// Compose `ExecStart=` as `{runtime} {path}`, or `path` alone when the
    /// runtime command is empty.
    ///
    /// A blank `WorkingDirectory=` is filled with the parent directory of
    /// `path`. An executable outside the configured working directory only
    /// produces a warning.
    pub fn set_exec_start(
        &mut self,
        path: &str,
        runtime: &str,
        ensure_exists: bool,
    ) -> Result<(), ParseError> {
        if ensure_exists && !Path::new(path).exists() {
            return Err(ParseError::MissingExecutable(path.into()));
        }

        let exec_start = if runtime.is_empty() {
            path.to_string()
        } else {
            format!("{} {}", runtime, path)
        };
        self.set("ExecStart", exec_start);

        let wdir = self.working_directory().unwrap_or_default().to_string();
        if wdir.trim().is_empty() {
            let parent = Path::new(path)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.set("WorkingDirectory", parent);
        } else if !path.starts_with(&wdir) {
            log::warn!(
                "Execution path {} is not in the working directory {}",
                path,
                wdir
            );
        }
        Ok(())
    }
}

/// Keys rendered for [Install], in this order
const INSTALL_KEYS: &[&str] = &["WantedBy", "RequiredBy", "Also", "Alias"];

/// [Install] section
#[derive(Debug, Clone, PartialEq)]
pub struct InstallSection(Section);

impl Default for InstallSection {
    fn default() -> Self {
        Self(Section::seeded("Install", &[("WantedBy", "multi-user.target")]))
    }
}

impl InstallSection {
    pub fn wanted_by(&self) -> Option<&str> {
        self.get("WantedBy")
    }

    pub fn set_wanted_by(&mut self, value: &str) {
        self.set("WantedBy", value);
    }

    /// Render WantedBy=, RequiredBy=, Also= and Alias= in that fixed order,
    /// each only if present. Other keys are not written.
    pub fn format(&self) -> String {
        let mut lines = vec![format!("[{}]", self.name())];
        for key in INSTALL_KEYS {
            if let Some(value) = self.get(key) {
                lines.push(format!("{}={}", key, value));
            }
        }
        lines.join("\n")
    }
}

macro_rules! section_deref {
    ($($ty:ty),*) => {$(
        impl Deref for $ty {
            type Target = Section;
            fn deref(&self) -> &Section {
                &self.0
            }
        }

        impl DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut Section {
                &mut self.0
            }
        }
    )*};
}

section_deref!(UnitSection, ServiceSection, InstallSection);
