//! Multiplayer setup sessions
//!
//! One session asks each player in turn to press Return on their keyboard
//! (and optionally click their mouse), remembers which physical device did it,
//! then gives every player after the first a master pair of their own and
//! moves the claimed devices onto it.
//!
//! Front ends drive a session through `run_session` and watch it through a
//! `Reporter`; all session state lives in the values passed along.
//!
//! ## Module Structure
//! - `types.rs`: Player, Claims, SessionRequest, SessionEvent, Cancellation
//! - `pure/`: Player naming, progress
//! - `pipelines/`: detect, assign, run/reset

mod pipelines;
mod pure;
mod types;


// Re-export types
pub use types::{Cancellation, Reporter, SessionEvent, SessionOutcome, SessionRequest};
#[cfg(test)]
pub use types::Player;

// Re-export pipelines
pub use pipelines::{current_configuration, reset_to_single_player, run_session};

// Re-export pure functions
pub use pure::{player_names, players};
