// Player naming

use std::collections::HashSet;

use crate::hierarchy::VIRTUAL_CORE;
use crate::session::types::Player;

/// Names for `count` players
///
/// Custom names fill the first slots in order; the rest become
/// `<prefix>2`, `<prefix>3`, ... by position. Surplus custom names are dropped.
pub fn player_names(count: usize, custom: &[String], prefix: &str) -> Vec<String> {
    (0..count)
        .map(|i| {
            custom
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("{}{}", prefix, i + 1))
        })
        .collect()
}

/// Reject name lists that would confuse master lookup by name
pub fn validate_player_names(names: &[String]) -> Result<(), String> {
    if names.is_empty() {
        return Err("at least one player is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(format!("player {} has an empty name", i + 1));
        }
        if name.trim() != name {
            return Err(format!("'{}' has leading or trailing whitespace", name));
        }
        if name.starts_with(VIRTUAL_CORE) {
            return Err(format!("'{}' clashes with the default master pair", name));
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("'{}' is used more than once", name));
        }
    }

    Ok(())
}

pub fn players(names: Vec<String>) -> Vec<Player> {
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| Player { index, name })
        .collect()
}
