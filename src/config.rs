//! Configuration file support
//!
//! Loads settings from ~/.restyle.conf (or %USERPROFILE%\.restyle.conf on Windows)
//!
//! Format: simple key=value pairs, one per line
//! Lines starting with # are comments
//!
//! Example:
//! ```text
//! # restyle configuration
//! highlighting = true
//! debounce-ms = 250
//! minimap-width = 16
//! lines-per-minimap-row = 4
//! profile-dir = /home/me/.config/restyle/profiles
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::syntax::DEFAULT_DEBOUNCE_MS;

/// Configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Whether syntax highlighting is enabled
    pub highlighting: bool,
    /// Quiet period before the symbol index refreshes, in milliseconds
    pub debounce_ms: u64,
    /// Minimap width in cells
    pub minimap_width: usize,
    /// Buffer lines folded into one minimap row
    pub lines_per_minimap_row: usize,
    /// Directory of extra TOML language profiles
    pub profile_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            highlighting: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            minimap_width: 12,
            lines_per_minimap_row: 4,
            profile_dir: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".restyle.conf"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".restyle.conf"))
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();
        if let Ok(contents) = fs::read_to_string(path) {
            let settings = Self::parse(&contents);
            config.apply(&settings);
            debug!(path = %path.display(), ?config, "configuration loaded");
        }
        config
    }

    /// Symbol index debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse config file contents into key-value pairs
    fn parse(contents: &str) -> HashMap<String, String> {
        let mut settings = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();
                settings.insert(key, value);
            }
        }

        settings
    }

    /// Apply settings from parsed config
    fn apply(&mut self, settings: &HashMap<String, String>) {
        if let Some(value) = settings.get("highlighting") {
            self.highlighting = parse_bool(value);
        }

        if let Some(value) = settings.get("debounce-ms") {
            if let Ok(n) = value.parse::<u64>() {
                self.debounce_ms = n.clamp(50, 5000);
            }
        }

        if let Some(value) = settings.get("minimap-width") {
            if let Ok(n) = value.parse::<usize>() {
                self.minimap_width = n.clamp(4, 80);
            }
        }

        if let Some(value) = settings.get("lines-per-minimap-row") {
            if let Ok(n) = value.parse::<usize>() {
                self.lines_per_minimap_row = n.clamp(1, 64);
            }
        }

        if let Some(value) = settings.get("profile-dir") {
            if !value.is_empty() {
                self.profile_dir = Some(PathBuf::from(value));
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let mut contents = format!(
            "# restyle configuration\n\
             # Generated automatically\n\n\
             highlighting = {}\n\
             debounce-ms = {}\n\
             minimap-width = {}\n\
             lines-per-minimap-row = {}\n",
            self.highlighting, self.debounce_ms, self.minimap_width, self.lines_per_minimap_row
        );
        if let Some(dir) = &self.profile_dir {
            contents.push_str(&format!("profile-dir = {}\n", dir.display()));
        }
        fs::write(path, contents)
    }
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
highlighting = false
Debounce-MS = 250
minimap-width=16
        "#;

        let settings = Config::parse(contents);
        assert_eq!(settings.get("highlighting"), Some(&"false".to_string()));
        assert_eq!(settings.get("debounce-ms"), Some(&"250".to_string()));
        assert_eq!(settings.get("minimap-width"), Some(&"16".to_string()));
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn test_apply_clamps() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("debounce-ms".to_string(), "5".to_string());
        settings.insert("minimap-width".to_string(), "500".to_string());
        settings.insert("lines-per-minimap-row".to_string(), "0".to_string());
        settings.insert("unknown-key".to_string(), "1".to_string());

        config.apply(&settings);

        assert!(config.highlighting);
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.minimap_width, 80);
        assert_eq!(config.lines_per_minimap_row, 1);
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let mut config = Config::default();
        let mut settings = HashMap::new();
        settings.insert("debounce-ms".to_string(), "soon".to_string());
        config.apply(&settings);
        assert_eq!(config.debounce(), Duration::from_millis(DEFAULT_DEBOUNCE_MS));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".restyle.conf");
        let config = Config {
            highlighting: false,
            debounce_ms: 900,
            minimap_width: 20,
            lines_per_minimap_row: 8,
            profile_dir: Some(dir.path().join("profiles")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("absent")), Config::default());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("anything"));
    }
}
