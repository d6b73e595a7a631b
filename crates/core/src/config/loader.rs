//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the gateway's
//! install location.

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "DYNMSG_HOME";

/// Returns the dynmsg base directory.
///
/// Uses `$DYNMSG_HOME` when set, otherwise the directory containing the
/// running executable.
pub fn base_dir() -> ConfigResult<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the base configs directory.
///
/// Path: `{base}/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(base_dir()?.join("configs"))
}

/// Returns the core config path.
///
/// Path: `{base}/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}

/// Returns the default schema catalog path.
///
/// Path: `{base}/configs/catalog.toml`
pub fn catalog_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("catalog.toml"))
}

/// Resolve a configured path relative to `dir` unless it is absolute
pub fn resolve_in(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_in() {
        let dir = Path::new("/opt/dynmsg/configs");
        assert_eq!(
            resolve_in(dir, Path::new("catalog.toml")),
            PathBuf::from("/opt/dynmsg/configs/catalog.toml")
        );
        assert_eq!(
            resolve_in(dir, Path::new("/etc/dynmsg/catalog.toml")),
            PathBuf::from("/etc/dynmsg/catalog.toml")
        );
    }

    #[test]
    fn test_config_path_format() {
        let base = PathBuf::from("/opt/dynmsg");
        let expected = base.join("configs").join("core.toml");

        assert!(expected.ends_with("configs/core.toml"));
    }
}
