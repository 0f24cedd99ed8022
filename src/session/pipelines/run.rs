//! Whole-session entry points used by the front ends

use crate::error::{CoopError, CoopResult};
use crate::hierarchy::{DeviceQuery, InputSystem, MasterSummary, summarize};
use crate::session::pipelines::{assign_devices, cleanup_masters, detect_devices};
use crate::session::pure::validate_player_names;
use crate::session::types::{Cancellation, Reporter, SessionEvent, SessionOutcome, SessionRequest};

/// Detect a device for every player, then apply the assignment
pub fn run_session<S: InputSystem + ?Sized>(
    system: &mut S,
    request: &SessionRequest,
    reporter: &mut dyn Reporter,
    cancel: &Cancellation<'_>,
) -> CoopResult<SessionOutcome> {
    let names = request.player_names();
    validate_player_names(&names).map_err(CoopError::InvalidPlayers)?;

    reporter.report(SessionEvent::Started {
        players: names,
        detect_mice: request.detect_mice,
    });

    let Some(claims) = detect_devices(system, request, reporter, cancel)? else {
        return Ok(SessionOutcome::Cancelled);
    };

    let summary = assign_devices(system, &request.players, &claims, reporter)?;
    reporter.report(SessionEvent::Finished {
        summary: summary.clone(),
    });

    Ok(SessionOutcome::Completed(summary))
}

/// Remove every extra master pair, sending all devices back to the default pair
pub fn reset_to_single_player<S: InputSystem + ?Sized>(
    system: &mut S,
    reporter: &mut dyn Reporter,
) -> CoopResult<Vec<MasterSummary>> {
    let removed = cleanup_masters(system, &[], reporter)?;
    log::info!("reset - Removed {} master pair(s)", removed);
    current_configuration(system)
}

pub fn current_configuration<S: DeviceQuery + ?Sized>(
    system: &mut S,
) -> CoopResult<Vec<MasterSummary>> {
    Ok(summarize(&system.query_devices()?))
}
