use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::hierarchy::{ENTER_KEYCODE, XTEST_MARKER};

/// Persistent settings, stored as `settings.json` in the data directory
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CoopConfig {
    /// Keycode a player presses to claim a keyboard (36 = Return on evdev layouts)
    pub confirm_keycode: u32,
    /// How often a cancellable wait re-checks its cancel condition
    pub poll_interval_ms: u64,
    /// Slave devices whose name contains this are never offered for detection
    pub excluded_device_marker: String,
    /// The `xinput` executable used for hierarchy changes
    pub xinput_bin: String,
    /// Default players are named `<prefix>1`, `<prefix>2`, ...
    pub default_name_prefix: String,
    /// Upper bound for the player count asked by the menu front end
    pub max_menu_players: usize,
}

impl Default for CoopConfig {
    fn default() -> Self {
        CoopConfig {
            confirm_keycode: ENTER_KEYCODE,
            poll_interval_ms: 200,
            excluded_device_marker: XTEST_MARKER.to_string(),
            xinput_bin: "xinput".to_string(),
            default_name_prefix: "Player".to_string(),
            max_menu_players: 10,
        }
    }
}

impl CoopConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero interval would turn the cancellable wait into a busy loop.
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
