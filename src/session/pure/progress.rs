// Detection progress

use crate::hierarchy::DeviceKind;

/// Percentage done when `player_index` starts waiting for a device of `kind`
///
/// Keyboards take the whole range, or the first half when mice follow.
pub fn progress_percent(
    kind: DeviceKind,
    player_index: usize,
    player_count: usize,
    detect_mice: bool,
) -> u8 {
    if player_count == 0 {
        return 0;
    }
    let (base, span) = match (kind, detect_mice) {
        (DeviceKind::Keyboard, false) => (0, 100),
        (DeviceKind::Keyboard, true) => (0, 50),
        (DeviceKind::Pointer, _) => (50, 50),
    };
    let done = player_index.min(player_count) * span / player_count;
    (base + done) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboards_only_span_everything() {
        assert_eq!(progress_percent(DeviceKind::Keyboard, 0, 4, false), 0);
        assert_eq!(progress_percent(DeviceKind::Keyboard, 2, 4, false), 50);
        assert_eq!(progress_percent(DeviceKind::Keyboard, 3, 4, false), 75);
    }

    #[test]
    fn mice_take_the_second_half() {
        assert_eq!(progress_percent(DeviceKind::Keyboard, 1, 2, true), 25);
        assert_eq!(progress_percent(DeviceKind::Pointer, 0, 2, true), 50);
        assert_eq!(progress_percent(DeviceKind::Pointer, 1, 2, true), 75);
    }

    #[test]
    fn no_players_is_zero() {
        assert_eq!(progress_percent(DeviceKind::Pointer, 0, 0, true), 0);
    }
}
