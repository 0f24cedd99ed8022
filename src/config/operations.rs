mod io;

pub use io::{load_cfg, save_cfg};
