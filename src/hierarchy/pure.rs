//! Pure functions over device lists
//!
//! These functions have no side effects and are deterministic.

mod filter;
mod masters;
mod summary;

pub use filter::{device_name, press_qualifies, slave_ids};
pub use masters::{core_master_id, find_master, stale_master_pairs};
pub use summary::summarize;
