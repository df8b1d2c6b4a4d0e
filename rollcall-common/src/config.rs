//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "ROLLCALL_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "rollcall.db";

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `ROLLCALL_ROOT_FOLDER` environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<&str>) -> Self {
        Self {
            cli_arg: cli_arg.map(PathBuf::from),
        }
    }

    /// Resolve the root folder. Infallible: falls back to the compiled
    /// default when no override is configured.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("Root folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            info!("Root folder from {}: {}", ROOT_FOLDER_ENV, path);
            return PathBuf::from(path);
        }

        if let Ok(config_path) = find_config_file() {
            if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                    if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                        info!(
                            "Root folder from {}: {}",
                            config_path.display(),
                            root_folder
                        );
                        return PathBuf::from(root_folder);
                    }
                }
            }
        }

        let default = default_root_folder();
        info!("Root folder from compiled default: {}", default.display());
        default
    }
}

/// Prepares a resolved root folder for use: creates the directory when
/// missing and locates the database file inside it.
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder directory (and parents) if it does not exist.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the SQLite database file inside the root folder.
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}

/// Get the configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/rollcall/config.toml first, then /etc/rollcall/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("rollcall").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/rollcall/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("rollcall").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\rollcall
        dirs::data_local_dir()
            .map(|d| d.join("rollcall"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rollcall"))
    } else {
        // ~/.local/share/rollcall on Linux, ~/Library/Application Support/rollcall on macOS
        dirs::data_local_dir()
            .map(|d| d.join("rollcall"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rollcall"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_arg_has_highest_priority() {
        std::env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
        let resolver = RootFolderResolver::new(Some("/tmp/from-cli"));
        assert_eq!(resolver.resolve(), PathBuf::from("/tmp/from-cli"));
        std::env::remove_var(ROOT_FOLDER_ENV);
    }

    #[test]
    #[serial]
    fn env_var_used_when_no_cli_arg() {
        std::env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
        let resolver = RootFolderResolver::new(None);
        assert_eq!(resolver.resolve(), PathBuf::from("/tmp/from-env"));
        std::env::remove_var(ROOT_FOLDER_ENV);
    }

    #[test]
    #[serial]
    fn falls_back_to_compiled_default() {
        std::env::remove_var(ROOT_FOLDER_ENV);
        let resolver = RootFolderResolver::new(None);
        let resolved = resolver.resolve();
        assert!(!resolved.as_os_str().is_empty());
    }

    #[test]
    fn initializer_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("rollcall-root");

        let initializer = RootFolderInitializer::new(root.clone());
        initializer.ensure_directory_exists().unwrap();

        assert!(root.is_dir());
        assert_eq!(initializer.database_path(), root.join(DATABASE_FILE));
    }
}
