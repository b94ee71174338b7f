//! Runtime configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `MAHJONG_SAVE_PATH` | `mahjong-match-save.json` | Snapshot file |
//! | `MAHJONG_SEED` | wall clock | RNG seed for new boards |
//! | `MAHJONG_LOG_DIR` | `logs` | Log file directory |
//! | `MAHJONG_LOG` | `info` | Log level/spec (`RUST_LOG` wins if set) |
//! | `MAHJONG_NO_SAVE` | off | `1`/`true`: keep the snapshot in memory only |

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub save_path: PathBuf,
    pub seed: Option<u32>,
    pub log_dir: PathBuf,
    pub log_spec: String,
    pub persist: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("mahjong-match-save.json"),
            seed: None,
            log_dir: PathBuf::from("logs"),
            log_spec: "info".to_string(),
            persist: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset, blank or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let save_path = get("MAHJONG_SAVE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.save_path);
        let seed = get("MAHJONG_SEED").and_then(|s| s.parse().ok());
        let log_dir = get("MAHJONG_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);
        let log_spec = get("MAHJONG_LOG").unwrap_or(defaults.log_spec);
        let persist = !get("MAHJONG_NO_SAVE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            save_path,
            seed,
            log_dir,
            log_spec,
            persist,
        }
    }
}
