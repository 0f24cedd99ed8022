//! Hierarchy operations - talking to the X server and the `xinput` tool

mod display;
mod xinput_cli;

pub use display::X11Display;
pub use xinput_cli::XinputCli;
