//! Assignment: drop stale masters, create missing ones, reattach claimed devices
//!
//! The steps run strictly in that order. Cleanup goes first so an old pair
//! that happens to carry a current player's name is never mistaken for the
//! one that player needs; the keep-list protects exactly those names.

use crate::error::{CoopError, CoopResult};
use crate::hierarchy::{
    DeviceKind, InputSystem, MasterSummary, core_master_id, find_master, stale_master_pairs,
    summarize,
};
use crate::session::types::{Claims, Player, Reporter, SessionEvent};

/// Remove every extra master pair not named in `keep`
///
/// Orphaned slaves go back to the default pair. Returns how many pairs went.
pub fn cleanup_masters<S: InputSystem + ?Sized>(
    system: &mut S,
    keep: &[String],
    reporter: &mut dyn Reporter,
) -> CoopResult<usize> {
    let devices = system.query_devices()?;
    let core_pointer = core_master_id(&devices, DeviceKind::Pointer);
    let core_keyboard = core_master_id(&devices, DeviceKind::Keyboard);

    let stale = stale_master_pairs(&devices, keep);
    for pair in &stale {
        log::info!(
            "assign - Removing master '{}' (pointer ID: {})",
            pair.name,
            pair.pointer_id
        );
        reporter.report(SessionEvent::RemovingMaster { pair: pair.clone() });
        system.remove_master(pair.pointer_id, core_pointer, core_keyboard)?;
    }

    Ok(stale.len())
}

/// Make sure every player but the first has a master pair of their own
fn create_masters<S: InputSystem + ?Sized>(
    system: &mut S,
    players: &[Player],
    reporter: &mut dyn Reporter,
) -> CoopResult<()> {
    let devices = system.query_devices()?;

    for player in players {
        if player.is_first() {
            reporter.report(SessionEvent::UsingCoreMaster {
                player: player.clone(),
            });
        } else if let Some(existing) = find_master(&devices, &player.name, DeviceKind::Keyboard) {
            reporter.report(SessionEvent::MasterExists {
                player: player.clone(),
                keyboard_id: existing.id,
            });
        } else {
            log::info!("assign - Creating master for {}", player.name);
            reporter.report(SessionEvent::CreatingMaster {
                player: player.clone(),
            });
            system.create_master(&player.name)?;
        }
    }

    Ok(())
}

/// Route each claimed device to its player's master
fn reattach_claims<S: InputSystem + ?Sized>(
    system: &mut S,
    players: &[Player],
    claims: &Claims,
    reporter: &mut dyn Reporter,
) -> CoopResult<()> {
    let devices = system.query_devices()?;

    for kind in [DeviceKind::Keyboard, DeviceKind::Pointer] {
        for player in players {
            let Some(device) = claims.get(kind, player.index) else {
                continue;
            };

            let master = if player.is_first() {
                core_master_id(&devices, kind)
            } else {
                find_master(&devices, &player.name, kind)
                    .map(|d| d.id)
                    .ok_or_else(|| CoopError::MasterMissing {
                        player: player.name.clone(),
                        kind,
                    })?
            };

            log::info!(
                "assign - Reattaching {} {} to master {} for {}",
                kind,
                device,
                master,
                player.name
            );
            reporter.report(SessionEvent::Reattaching {
                player: player.clone(),
                kind,
                device,
                master,
            });
            system.reattach(device, master)?;
        }
    }

    Ok(())
}

/// Apply a completed set of claims to the hierarchy
///
/// Any failing step ends the session; nothing is retried or skipped.
/// Returns the resulting configuration.
pub fn assign_devices<S: InputSystem + ?Sized>(
    system: &mut S,
    players: &[Player],
    claims: &Claims,
    reporter: &mut dyn Reporter,
) -> CoopResult<Vec<MasterSummary>> {
    reporter.report(SessionEvent::Assigning);

    let keep: Vec<String> = players
        .iter()
        .filter(|p| !p.is_first())
        .map(|p| p.name.clone())
        .collect();
    cleanup_masters(system, &keep, reporter)?;
    create_masters(system, players, reporter)?;
    reattach_claims(system, players, claims, reporter)?;

    Ok(summarize(&system.query_devices()?))
}
