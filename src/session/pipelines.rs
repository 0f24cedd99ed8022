//! Session pipelines - detection and assignment workflows
//!
//! Composes hierarchy queries, raw press waiting and hierarchy changes into
//! complete setup, reset and inspection flows.

mod assign;
mod detect;
mod run;

pub use assign::{assign_devices, cleanup_masters};
pub use detect::detect_devices;
pub use run::{current_configuration, reset_to_single_player, run_session};
