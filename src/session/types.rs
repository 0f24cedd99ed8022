//! Session type definitions

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::config::CoopConfig;
use crate::hierarchy::{DeviceKind, DeviceRef, MasterPair, MasterSummary};

/// A player taking part in one setup session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// 0-based position; position 0 keeps the default master pair
    pub index: usize,
    pub name: String,
}

impl Player {
    /// 1-based position, for display
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// Which player claimed which slave device
///
/// A device id is held by at most one player per kind; `claim` refuses a
/// device someone else already holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Claims {
    keyboards: BTreeMap<usize, u16>,
    pointers: BTreeMap<usize, u16>,
}

impl Claims {
    fn map(&self, kind: DeviceKind) -> &BTreeMap<usize, u16> {
        match kind {
            DeviceKind::Keyboard => &self.keyboards,
            DeviceKind::Pointer => &self.pointers,
        }
    }

    fn map_mut(&mut self, kind: DeviceKind) -> &mut BTreeMap<usize, u16> {
        match kind {
            DeviceKind::Keyboard => &mut self.keyboards,
            DeviceKind::Pointer => &mut self.pointers,
        }
    }

    /// Index of the player holding `device`, if any
    pub fn holder(&self, kind: DeviceKind, device: u16) -> Option<usize> {
        self.map(kind)
            .iter()
            .find(|(_, id)| **id == device)
            .map(|(player, _)| *player)
    }

    /// Give `device` to `player`. On conflict, returns the current holder.
    pub fn claim(&mut self, kind: DeviceKind, player: usize, device: u16) -> Result<(), usize> {
        match self.holder(kind, device) {
            Some(holder) if holder != player => Err(holder),
            _ => {
                self.map_mut(kind).insert(player, device);
                Ok(())
            }
        }
    }

    pub fn get(&self, kind: DeviceKind, player: usize) -> Option<u16> {
        self.map(kind).get(&player).copied()
    }
}

/// Everything a setup session needs to know up front
#[derive(Clone, Debug)]
pub struct SessionRequest {
    pub players: Vec<Player>,
    pub detect_mice: bool,
    pub confirm_keycode: u32,
    pub excluded_marker: String,
}

impl SessionRequest {
    pub fn new(players: Vec<Player>, detect_mice: bool, cfg: &CoopConfig) -> Self {
        Self {
            players,
            detect_mice,
            confirm_keycode: cfg.confirm_keycode,
            excluded_marker: cfg.excluded_device_marker.clone(),
        }
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }
}

/// Progress notifications, in the order they happen
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Started {
        players: Vec<String>,
        detect_mice: bool,
    },
    /// `player` should press the confirm key / click now
    Waiting {
        player: Player,
        kind: DeviceKind,
        percent: u8,
    },
    Detected {
        player: Player,
        kind: DeviceKind,
        device: DeviceRef,
    },
    /// The press came from a device `holder` already owns; `player` is asked again
    AlreadyClaimed {
        player: Player,
        kind: DeviceKind,
        device: DeviceRef,
        holder: String,
    },
    Assigning,
    RemovingMaster {
        pair: MasterPair,
    },
    UsingCoreMaster {
        player: Player,
    },
    MasterExists {
        player: Player,
        keyboard_id: u16,
    },
    CreatingMaster {
        player: Player,
    },
    Reattaching {
        player: Player,
        kind: DeviceKind,
        device: u16,
        master: u16,
    },
    Finished {
        summary: Vec<MasterSummary>,
    },
}

/// Receives session progress; implemented by each front end
pub trait Reporter {
    fn report(&mut self, event: SessionEvent);
}

impl Reporter for Sender<SessionEvent> {
    fn report(&mut self, event: SessionEvent) {
        // The receiving side going away only means nobody is watching.
        let _ = self.send(event);
    }
}

/// How a wait for a device may be abandoned
#[derive(Clone, Copy)]
pub enum Cancellation<'a> {
    /// Block until a device shows up
    Never,
    /// Re-check `predicate` at least every `interval`; stop once it returns true
    Polling {
        interval: Duration,
        predicate: &'a (dyn Fn() -> bool + Sync),
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Completed(Vec<MasterSummary>),
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_refuses_a_device_held_by_someone_else() {
        let mut claims = Claims::default();
        assert_eq!(claims.claim(DeviceKind::Keyboard, 0, 7), Ok(()));
        assert_eq!(claims.claim(DeviceKind::Keyboard, 1, 7), Err(0));
        assert_eq!(claims.get(DeviceKind::Keyboard, 1), None);
        assert_eq!(claims.get(DeviceKind::Keyboard, 0), Some(7));
    }

    #[test]
    fn keyboards_and_pointers_are_claimed_independently() {
        let mut claims = Claims::default();
        assert_eq!(claims.claim(DeviceKind::Keyboard, 0, 7), Ok(()));
        assert_eq!(claims.claim(DeviceKind::Pointer, 1, 7), Ok(()));
        assert_eq!(claims.holder(DeviceKind::Pointer, 7), Some(1));
        assert_eq!(claims.holder(DeviceKind::Keyboard, 7), Some(0));
    }

    #[test]
    fn reclaiming_your_own_device_is_fine() {
        let mut claims = Claims::default();
        assert_eq!(claims.claim(DeviceKind::Pointer, 2, 8), Ok(()));
        assert_eq!(claims.claim(DeviceKind::Pointer, 2, 8), Ok(()));
        assert_eq!(claims.holder(DeviceKind::Pointer, 8), Some(2));
    }

    #[test]
    fn player_ordinals_are_one_based() {
        let player = Player {
            index: 0,
            name: "Player1".to_string(),
        };
        assert_eq!(player.ordinal(), 1);
        assert!(player.is_first());
    }
}
