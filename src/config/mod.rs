pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-facing settings. Game rules (board size, speeds, rewards) are not configurable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub controls: ControlsConfig,
    pub game: GameConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_ghost: bool,
    pub show_next: bool,
    // Redraw interval when nothing else wakes the loop
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ghost: true,
            show_next: true,
            frame_interval_ms: 33,
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Only used on terminals that cannot report key releases: fast drop
    /// ends this long after the last Down press or repeat.
    pub fast_drop_release_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            fast_drop_release_ms: 600,
        }
    }
}

impl ControlsConfig {
    #[must_use]
    pub fn fast_drop_release(&self) -> Duration {
        Duration::from_millis(self.fast_drop_release_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed seed for the piece sequence. Random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "blockfall.log".to_string(),
        }
    }
}
