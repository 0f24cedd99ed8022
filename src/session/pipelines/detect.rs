//! Device detection: one player at a time, one device kind at a time

use std::collections::BTreeSet;

use crate::error::{CoopError, CoopResult};
use crate::hierarchy::{
    DeviceKind, DeviceRef, InputSystem, RawEventSource, device_name, press_qualifies, slave_ids,
};
use crate::session::pure::progress_percent;
use crate::session::types::{Cancellation, Claims, Reporter, SessionEvent, SessionRequest};

/// Block until a device from `accept` produces a qualifying press
///
/// Returns the device id, or `None` if `cancel` fired first. The raw event
/// selection is always cleared again before returning.
pub fn wait_for_device<S: RawEventSource + ?Sized>(
    source: &mut S,
    kind: DeviceKind,
    accept: &BTreeSet<u16>,
    confirm_keycode: u32,
    cancel: &Cancellation<'_>,
) -> CoopResult<Option<u16>> {
    source.listen(kind)?;
    let result = wait_loop(source, kind, accept, confirm_keycode, cancel);
    let cleared = source.unlisten();
    let found = result?;
    cleared?;
    Ok(found)
}

fn wait_loop<S: RawEventSource + ?Sized>(
    source: &mut S,
    kind: DeviceKind,
    accept: &BTreeSet<u16>,
    confirm_keycode: u32,
    cancel: &Cancellation<'_>,
) -> CoopResult<Option<u16>> {
    loop {
        let timeout = match cancel {
            Cancellation::Never => None,
            Cancellation::Polling {
                interval,
                predicate,
            } => {
                if predicate() {
                    log::info!("detect - Wait for a {} cancelled", kind);
                    return Ok(None);
                }
                Some(*interval)
            }
        };

        if let Some(press) = source.next_press(timeout)? {
            if press_qualifies(&press, kind, accept, confirm_keycode) {
                return Ok(Some(press.device_id));
            }
            log::trace!("detect - Ignoring {:?}", press);
        }
    }
}

/// Detect one keyboard (and optionally one pointer) per player
///
/// The set of claimable devices is taken once, at the start. Returns `None`
/// when cancelled; nothing in the hierarchy has changed at that point.
pub fn detect_devices<S: InputSystem + ?Sized>(
    system: &mut S,
    request: &SessionRequest,
    reporter: &mut dyn Reporter,
    cancel: &Cancellation<'_>,
) -> CoopResult<Option<Claims>> {
    let devices = system.query_devices()?;

    let mut kinds = vec![DeviceKind::Keyboard];
    if request.detect_mice {
        kinds.push(DeviceKind::Pointer);
    }

    let mut universes = Vec::new();
    for kind in kinds {
        let accept = slave_ids(&devices, kind, &request.excluded_marker);
        log::debug!("detect - Claimable {}s: {:?}", kind, accept);
        if accept.len() < request.players.len() {
            return Err(CoopError::NotEnoughDevices {
                kind,
                players: request.players.len(),
                available: accept.len(),
            });
        }
        universes.push((kind, accept));
    }

    let mut claims = Claims::default();
    for (kind, accept) in &universes {
        for player in &request.players {
            loop {
                reporter.report(SessionEvent::Waiting {
                    player: player.clone(),
                    kind: *kind,
                    percent: progress_percent(
                        *kind,
                        player.index,
                        request.players.len(),
                        request.detect_mice,
                    ),
                });

                let Some(id) =
                    wait_for_device(system, *kind, accept, request.confirm_keycode, cancel)?
                else {
                    return Ok(None);
                };
                let device = DeviceRef {
                    id,
                    name: device_name(&devices, id),
                };

                match claims.claim(*kind, player.index, id) {
                    Ok(()) => {
                        log::info!(
                            "detect - {} claimed {} {} ({})",
                            player.name,
                            kind,
                            device.id,
                            device.name
                        );
                        reporter.report(SessionEvent::Detected {
                            player: player.clone(),
                            kind: *kind,
                            device,
                        });
                        break;
                    }
                    Err(holder) => {
                        reporter.report(SessionEvent::AlreadyClaimed {
                            player: player.clone(),
                            kind: *kind,
                            device,
                            holder: request.players[holder].name.clone(),
                        });
                    }
                }
            }
        }
    }

    Ok(Some(claims))
}
