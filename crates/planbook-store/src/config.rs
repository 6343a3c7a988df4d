use std::env;
use std::path::{Path, PathBuf};

/// Store configuration.
///
/// Reads from the `PLANBOOK_DATA_DIR` environment variable, falling back to
/// `$XDG_DATA_HOME/planbook` and then `~/.local/share/planbook`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding every durable slot.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Environment variable that overrides the data directory.
    pub const DATA_DIR_ENV: &str = "PLANBOOK_DATA_DIR";

    /// Slot holding the ordered lesson collection.
    pub const LESSONS_SLOT: &str = "lessons";

    /// Slot holding the signed-in user.
    pub const USER_SLOT: &str = "user";

    /// Build a config from the environment.
    ///
    /// Priority: `PLANBOOK_DATA_DIR`, then the XDG data directory.
    pub fn from_env() -> Self {
        let data_dir = env::var(Self::DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_data_dir());
        Self { data_dir }
    }

    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The XDG-style default data directory.
    ///
    /// Uses `$XDG_DATA_HOME/planbook` or `~/.local/share/planbook` on every
    /// platform, so the layout matches the config directory.
    pub fn default_data_dir() -> PathBuf {
        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("planbook");
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join("planbook")
    }

    /// Path of the file backing a named slot.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir.join(format!("{slot}.json"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_new() {
        let cfg = StoreConfig::new("/tmp/planbook-test");
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/planbook-test"));
    }

    #[test]
    fn slot_paths_live_in_data_dir() {
        let cfg = StoreConfig::new("/var/lib/planbook");
        assert_eq!(
            cfg.slot_path(StoreConfig::LESSONS_SLOT),
            PathBuf::from("/var/lib/planbook/lessons.json")
        );
        assert_eq!(
            cfg.slot_path(StoreConfig::USER_SLOT),
            PathBuf::from("/var/lib/planbook/user.json")
        );
    }

    #[test]
    fn default_dir_ends_with_planbook() {
        assert!(StoreConfig::default_data_dir().ends_with("planbook"));
    }
}
