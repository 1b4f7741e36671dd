//! Startup check for the external tools and a display to draw on.

use crate::runner::ToolPaths;
use std::{
    env,
    ffi::OsStr,
    fmt,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// (command, package that ships it)
const PLAYERCTL: (&str, &str) = ("playerctl", "playerctl");
const PACTL: (&str, &str) = ("pactl", "pulseaudio-utils");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub name: String,
    pub hint: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[!] '{}' was not found.\n→ {}", self.name, self.hint)
    }
}

impl MissingDependency {
    fn command(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            hint: format!("Install it with: sudo apt install {package}"),
        }
    }

    fn display_server() -> Self {
        Self {
            name: "graphical display".to_string(),
            hint: "Start the panel from inside an X11 or Wayland session".to_string(),
        }
    }
}

/// Resolves both tools on `PATH` and confirms a display server is reachable.
/// Every missing piece is reported, not just the first.
pub fn check_dependencies() -> Result<ToolPaths, Vec<MissingDependency>> {
    let path_var = env::var_os("PATH");
    let display = env::var_os("WAYLAND_DISPLAY").or_else(|| env::var_os("DISPLAY"));
    check_with(path_var.as_deref(), display.as_deref())
}

fn check_with(
    path_var: Option<&OsStr>,
    display: Option<&OsStr>,
) -> Result<ToolPaths, Vec<MissingDependency>> {
    let mut missing = Vec::new();

    let mut locate = |(name, package): (&str, &str)| {
        let found = find_on_path(name, path_var);
        if found.is_none() {
            missing.push(MissingDependency::command(name, package));
        }
        found
    };
    let playerctl = locate(PLAYERCTL);
    let pactl = locate(PACTL);

    if !display.is_some_and(|value| !value.is_empty()) {
        missing.push(MissingDependency::display_server());
    }

    match (playerctl, pactl) {
        (Some(playerctl), Some(pactl)) if missing.is_empty() => {
            Ok(ToolPaths::new(playerctl, pactl))
        }
        _ => Err(missing),
    }
}

/// First executable file called `name` in the `PATH`-style list.
pub fn find_on_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    env::split_paths(path_var?)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
