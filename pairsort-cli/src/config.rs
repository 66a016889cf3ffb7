/// Config file loading and creation for pairsort CLI.
///
/// Config lives at $XDG_CONFIG_HOME/pairsort/config.toml (~/.config by default).
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct PairsortConfig {
    pub insertion_threshold: Option<usize>,
    pub seed: Option<u64>,
    pub state_dir: Option<PathBuf>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# pairsort configuration
# All values here can be overridden by CLI flags.

# Ranges shorter than this are insertion-sorted instead of partitioned.
# insertion_threshold = 12

# Fixed pivot seed. With a seed, the same judgments always lead to the same
# next question. Without one, a random seed is drawn per run.
# seed = 42

# Directory for judgment files when --state is not given.
# Defaults to the current directory.
# state_dir = \"/home/me/.local/share/pairsort\"
";

pub fn config_path() -> PathBuf {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_dir(xdg, home)
        .unwrap_or_else(|| bail("Neither XDG_CONFIG_HOME nor HOME is set"))
        .join("pairsort")
        .join("config.toml")
}

/// A relative XDG_CONFIG_HOME is invalid and skipped.
fn config_dir(xdg: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    xdg.filter(|dir| dir.is_absolute())
        .or_else(|| home.map(|home| home.join(".config")))
}

/// Contents of `path`, or `None` when there is no such file.
pub fn read_if_exists(path: &Path, what: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => bail(format!("Failed to read {what} at {}: {e}", path.display())),
    }
}

/// Parse config text. Kept separate from file IO for tests.
pub fn parse_config(content: &str) -> Result<PairsortConfig, toml::de::Error> {
    toml::from_str(content)
}

/// A missing file means every setting falls back to its default.
pub fn load_config(path: &Path) -> PairsortConfig {
    let Some(content) = read_if_exists(path, "config") else {
        return PairsortConfig::default();
    };
    parse_config(&content).unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}
