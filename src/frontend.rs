//! Front ends: how a session is shown to the people at the keyboards
//!
//! Both front ends drive the same session pipelines and differ only in how
//! they talk to the user.
//!
//! ## Module Structure
//! - `console.rs`: One-shot command line run, printed line by line
//! - `menu.rs`: Interactive menu, sessions on a worker thread, Ctrl-C cancels

mod console;
mod menu;

pub use console::{run_console, run_reset, run_show};
pub use menu::run_menu;
