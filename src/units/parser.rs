//! INI-style unit file parser
//!
//! Parses the `[Unit]`/`[Service]`/`[Install]` shape used for managed
//! services, plus the flat `KEY=VALUE` environment files next to them.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Key-value pairs of one section, in the order they appeared
pub type ParsedSection = IndexMap<String, String>;

/// A parsed unit file is a map of bare section names (`Unit`, not `[Unit]`)
/// to their contents
pub type ParsedFile = IndexMap<String, ParsedSection>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid section name '{0}'")]
    InvalidSectionName(String),

    #[error("Cannot read {path} - missing [{section}] section")]
    MissingSection { path: PathBuf, section: &'static str },

    #[error("{0} is not a service")]
    NotAService(PathBuf),

    #[error("Missing executable {0}")]
    MissingExecutable(PathBuf),

    #[error("Working directory {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Parse a unit file from a string
///
/// A later section with the same name replaces the earlier one.
pub fn parse_file(content: &str) -> ParsedFile {
    let mut sections = ParsedFile::new();
    let mut current: Option<(String, ParsedSection)> = None;

    for line in content.lines().map(str::trim) {
        if is_comment(line) {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
            if let Some((name, entries)) = current.take() {
                insert_section(&mut sections, name, entries);
            }
            let name = line[1..line.len() - 1].to_string();
            current = Some((name, ParsedSection::new()));
            continue;
        }

        // Assignments outside of any section are ignored
        let Some((_, entries)) = current.as_mut() else {
            continue;
        };
        if let Some((key, value)) = split_assignment(line) {
            entries.insert(key, value);
        }
    }

    if let Some((name, entries)) = current {
        insert_section(&mut sections, name, entries);
    }

    sections
}

/// Parse an environment file: no sections, `#` comments skipped
pub fn parse_environment(content: &str) -> IndexMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(split_assignment)
        .collect()
}

/// Parse a unit file from disk
pub async fn parse_unit_file(path: &Path) -> Result<ParsedFile, ParseError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_file(&content))
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

fn insert_section(sections: &mut ParsedFile, name: String, entries: ParsedSection) {
    if sections.contains_key(&name) {
        log::debug!("Section [{}] appears more than once, keeping the last", name);
    }
    sections.insert(name, entries);
}

/// Split on the first `=`, trimming both halves
fn split_assignment(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_service() {
        let content = r#"
[Unit]
Description=Test Service

[Service]
WorkingDirectory=/srv/app
ExecStart=/usr/bin/dotnet /srv/app/app.dll

[Install]
WantedBy=multi-user.target
"#;
        let parsed = parse_file(content);

        assert_eq!(
            parsed.keys().collect::<Vec<_>>(),
            vec!["Unit", "Service", "Install"]
        );
        assert_eq!(parsed["Unit"]["Description"], "Test Service");
        assert_eq!(
            parsed["Service"]["ExecStart"],
            "/usr/bin/dotnet /srv/app/app.dll"
        );
        assert_eq!(parsed["Install"]["WantedBy"], "multi-user.target");
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_file("").is_empty());
    }

    #[test]
    fn test_header_comments_skipped() {
        let content = "# generated\n# 01/02/2024 10:00:00\n\n[Unit]\nDescription=Test\n";
        let parsed = parse_file(content);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["Unit"].len(), 1);
    }

    #[test]
    fn test_assignments_outside_section_ignored() {
        let content = "Orphan=value\n[Unit]\nDescription=Test\n";
        let parsed = parse_file(content);
        assert_eq!(parsed.len(), 1);
        assert!(!parsed["Unit"].contains_key("Orphan"));
    }

    #[test]
    fn test_lines_without_equals_ignored() {
        let content = "[Service]\njust some text\nUser=www-data\n";
        let parsed = parse_file(content);
        assert_eq!(parsed["Service"].len(), 1);
    }

    #[test]
    fn test_value_with_equals() {
        let content = "[Service]\nEnvironment=FOO=bar=baz\n";
        let parsed = parse_file(content);
        assert_eq!(parsed["Service"]["Environment"], "FOO=bar=baz");
    }

    #[test]
    fn test_whitespace_handling() {
        let content = "  [Unit]  \n   Description   =   Test Service   \n";
        let parsed = parse_file(content);
        assert_eq!(parsed["Unit"]["Description"], "Test Service");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let content = "[Service]\nZeta=1\nAlpha=2\nMid=3\n";
        let parsed = parse_file(content);
        let keys: Vec<_> = parsed["Service"].keys().cloned().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_duplicate_section_keeps_last() {
        let content = "[Unit]\nDescription=First\n[Unit]\nDescription=Second\n";
        let parsed = parse_file(content);
        assert_eq!(parsed["Unit"]["Description"], "Second");
    }

    #[test]
    fn test_empty_value() {
        let parsed = parse_file("[Service]\nWorkingDirectory=\n");
        assert_eq!(parsed["Service"]["WorkingDirectory"], "");
    }

    #[test]
    fn test_parse_environment() {
        let content = "# header\nASPNETCORE_URLS=\"http://+:5000\"\n  DOTNET_X = 1 \nnoise\n";
        let env = parse_environment(content);
        assert_eq!(env.len(), 2);
        assert_eq!(env["ASPNETCORE_URLS"], "\"http://+:5000\"");
        assert_eq!(env["DOTNET_X"], "1");
    }
}
