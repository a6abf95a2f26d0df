//! .NET runtime probe

use std::path::Path;
use tokio::process::Command;

/// Label of the pseudo-runtime used by apps that carry their own runtime
pub const SELF_CONTAINED: &str = "Self-contained Deployment";

/// An installed runtime as reported by `dotnet --list-runtimes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    /// e.g. `Microsoft.AspNetCore.App 8.0.1`
    pub name: String,
    /// Install directory; empty for self-contained deployment
    pub path: String,
}

pub fn is_installed(dotnet: &Path) -> bool {
    dotnet.exists()
}

/// Parse `dotnet --list-runtimes` output (`Name Version [path]` per line).
/// The self-contained entry always comes first.
pub fn parse_runtimes(output: &str) -> Vec<Runtime> {
    let mut runtimes = vec![Runtime {
        name: SELF_CONTAINED.to_string(),
        path: String::new(),
    }];

    for line in output.lines() {
        let Some(open) = line.find('[') else {
            continue;
        };
        let name = line[..open].trim();
        let path = line[open + 1..].trim().trim_end_matches(']').trim();
        runtimes.push(Runtime {
            name: name.to_string(),
            path: path.to_string(),
        });
    }
    runtimes
}

/// Installed runtimes. Without a usable CLI only the self-contained entry
/// is returned.
pub async fn list_runtimes(dotnet: &Path) -> Vec<Runtime> {
    if !is_installed(dotnet) {
        return parse_runtimes("");
    }

    match Command::new(dotnet).arg("--list-runtimes").output().await {
        Ok(output) => parse_runtimes(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            log::warn!("Failed to run {} --list-runtimes: {}", dotnet.display(), e);
            parse_runtimes("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtimes() {
        let output = "\
Microsoft.AspNetCore.App 8.0.1 [/usr/share/dotnet/shared/Microsoft.AspNetCore.App]
Microsoft.NETCore.App 8.0.1 [/usr/share/dotnet/shared/Microsoft.NETCore.App]
";
        let runtimes = parse_runtimes(output);
        assert_eq!(runtimes.len(), 3);
        assert_eq!(runtimes[0].name, SELF_CONTAINED);
        assert_eq!(runtimes[0].path, "");
        assert_eq!(runtimes[1].name, "Microsoft.AspNetCore.App 8.0.1");
        assert_eq!(
            runtimes[2].path,
            "/usr/share/dotnet/shared/Microsoft.NETCore.App"
        );
    }

    #[test]
    fn test_parse_runtimes_ignores_noise() {
        let runtimes = parse_runtimes("no runtimes here\n\n");
        assert_eq!(runtimes.len(), 1);
    }

    #[tokio::test]
    async fn test_list_runtimes_without_cli() {
        let runtimes = list_runtimes(Path::new("/nonexistent/dotnet")).await;
        assert_eq!(runtimes, parse_runtimes(""));
    }
}
