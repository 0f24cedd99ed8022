use crate::config::types::CoopConfig;
use crate::error::CoopResult;
use crate::paths::PATH_DATA;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn load_cfg() -> CoopConfig {
    load_cfg_from(&PATH_DATA.join("settings.json"))
}

pub fn save_cfg(config: &CoopConfig) -> CoopResult<()> {
    save_cfg_to(&PATH_DATA.join("settings.json"), config)
}

fn load_cfg_from(path: &Path) -> CoopConfig {
    if let Ok(file) = File::open(path) {
        match serde_json::from_reader::<_, CoopConfig>(BufReader::new(file)) {
            Ok(config) => return config,
            Err(e) => log::warn!(
                "config - Ignoring unreadable {}: {}",
                path.display(),
                e
            ),
        }
    }

    // Return default settings if file doesn't exist or has error
    CoopConfig::default()
}

fn save_cfg_to(path: &Path, config: &CoopConfig) -> CoopResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    log::info!("config - Saved settings to {}", path.display());
    Ok(())
}
