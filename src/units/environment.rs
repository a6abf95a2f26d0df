//! Environment file contents
//!
//! Values are stored the way they appear in the file. Named accessors read
//! and write through the quoting convention: a value is kept wrapped in one
//! pair of double quotes and unwrapped on read.

use indexmap::IndexMap;

/// ASP.NET Core listening URLs
pub const ASPNETCORE_URLS: &str = "ASPNETCORE_URLS";
/// ASP.NET Core hosting environment name
pub const ASPNETCORE_ENVIRONMENT: &str = "ASPNETCORE_ENVIRONMENT";

/// Ordered `KEY=VALUE` store backing an `.env` file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: IndexMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an environment file
    pub fn parse(content: &str) -> Self {
        Self {
            vars: super::parser::parse_environment(content),
        }
    }

    /// Value with one pair of surrounding double quotes removed
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| unquote(v))
    }

    /// Store `value` trimmed and wrapped in double quotes, unless it is
    /// already fully quoted
    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), quote(value.trim()));
    }

    /// Value exactly as stored
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Store a value without applying the quoting convention
    pub fn set_raw(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// One `KEY=VALUE` line per entry, in insertion order
    pub fn format_lines(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect()
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

fn unquote(value: &str) -> &str {
    if is_quoted(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn quote(value: &str) -> String {
    if is_quoted(value) {
        value.to_string()
    } else {
        format!("\"{}\"", value)
    }
}
