//! Pure functions for the session module

mod names;
mod progress;

pub use names::{player_names, players, validate_player_names};
pub use progress::progress_percent;
