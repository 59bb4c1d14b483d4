//! External tool path detection.

use std::path::{Path, PathBuf};

/// Find the path to mongoimport executable.
pub fn mongoimport_path() -> Option<PathBuf> {
    find_tool("mongoimport")
}

/// Look next to the running executable first (tools shipped alongside the binary),
/// then on `PATH`.
fn find_tool(name: &str) -> Option<PathBuf> {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(name)))
        .filter(|path| is_executable(path));

    sibling.or_else(|| which::which(name).ok())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
