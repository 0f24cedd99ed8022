// Device filtering and raw press qualification

use std::collections::BTreeSet;

use crate::hierarchy::types::{Device, DeviceKind, RawPress};

/// Ids of the slave devices of `kind` a player may claim
///
/// Devices whose name contains `excluded_marker` (the XTEST devices, unless
/// configured otherwise) are left out. An empty marker excludes nothing.
pub fn slave_ids(devices: &[Device], kind: DeviceKind, excluded_marker: &str) -> BTreeSet<u16> {
    devices
        .iter()
        .filter(|d| d.role == kind.slave_role())
        .filter(|d| excluded_marker.is_empty() || !d.name.contains(excluded_marker))
        .map(|d| d.id)
        .collect()
}

/// Display name for a device id, tolerating devices that vanished
pub fn device_name(devices: &[Device], id: u16) -> String {
    devices
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| format!("Unknown (ID: {})", id))
}

/// Whether a raw press claims a device of `kind`
///
/// Only presses from `accept` count; master devices are never in there, which
/// drops the duplicate each press produces on its master. Keyboards must also
/// press the confirm key, pointers may click any button.
pub fn press_qualifies(
    press: &RawPress,
    kind: DeviceKind,
    accept: &BTreeSet<u16>,
    confirm_keycode: u32,
) -> bool {
    if press.kind != kind || !accept.contains(&press.device_id) {
        return false;
    }
    match kind {
        DeviceKind::Keyboard => press.detail == confirm_keycode,
        DeviceKind::Pointer => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::pure::fixtures::{dev, stock_devices};
    use crate::hierarchy::types::{DeviceRole, ENTER_KEYCODE, XTEST_MARKER};

    fn press(kind: DeviceKind, device_id: u16, detail: u32) -> RawPress {
        RawPress {
            kind,
            device_id,
            detail,
        }
    }

    #[test]
    fn slave_keyboards_exclude_xtest() {
        let ids = slave_ids(&stock_devices(), DeviceKind::Keyboard, XTEST_MARKER);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![6, 7, 9]);
    }

    #[test]
    fn slave_pointers_exclude_xtest() {
        let ids = slave_ids(&stock_devices(), DeviceKind::Pointer, XTEST_MARKER);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn marker_filter_applies_to_every_enumeration() {
        // Extra masters and floating slaves must not let a marked device through
        let mut devices = stock_devices();
        devices.push(dev(10, "Player2 pointer", DeviceRole::MasterPointer, None));
        devices.push(dev(11, "Player2 keyboard", DeviceRole::MasterKeyboard, None));
        devices.push(dev(12, "Player2 XTEST keyboard", DeviceRole::SlaveKeyboard, Some(11)));
        devices.push(dev(13, "Player2 XTEST pointer", DeviceRole::SlavePointer, Some(10)));
        devices.push(dev(14, "Floating XTEST thing", DeviceRole::FloatingSlave, None));

        for kind in [DeviceKind::Keyboard, DeviceKind::Pointer] {
            for id in slave_ids(&devices, kind, XTEST_MARKER) {
                let name = device_name(&devices, id);
                assert!(!name.contains(XTEST_MARKER), "{} leaked through", name);
            }
        }
    }

    #[test]
    fn custom_marker_is_honoured() {
        let ids = slave_ids(&stock_devices(), DeviceKind::Keyboard, "Button");
        assert!(!ids.contains(&6));
        assert!(ids.contains(&5));
    }

    #[test]
    fn empty_marker_excludes_nothing() {
        let ids = slave_ids(&stock_devices(), DeviceKind::Keyboard, "");
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn masters_and_floating_slaves_are_never_candidates() {
        let devices = vec![
            dev(3, "Virtual core keyboard", DeviceRole::MasterKeyboard, None),
            dev(20, "Loose keyboard", DeviceRole::FloatingSlave, None),
        ];
        assert!(slave_ids(&devices, DeviceKind::Keyboard, XTEST_MARKER).is_empty());
    }

    #[test]
    fn device_name_falls_back_for_unknown_ids() {
        let devices = stock_devices();
        assert_eq!(device_name(&devices, 7), "AT Translated Set 2 keyboard");
        assert_eq!(device_name(&devices, 42), "Unknown (ID: 42)");
    }

    #[test]
    fn keyboard_press_needs_confirm_key() {
        let accept = BTreeSet::from([7, 9]);
        assert!(press_qualifies(
            &press(DeviceKind::Keyboard, 7, ENTER_KEYCODE),
            DeviceKind::Keyboard,
            &accept,
            ENTER_KEYCODE
        ));
        assert!(!press_qualifies(
            &press(DeviceKind::Keyboard, 7, 38),
            DeviceKind::Keyboard,
            &accept,
            ENTER_KEYCODE
        ));
    }

    #[test]
    fn master_duplicates_are_ignored() {
        // The same Return arrives once from the slave and once from its master
        let accept = BTreeSet::from([7, 9]);
        assert!(!press_qualifies(
            &press(DeviceKind::Keyboard, 3, ENTER_KEYCODE),
            DeviceKind::Keyboard,
            &accept,
            ENTER_KEYCODE
        ));
    }

    #[test]
    fn any_button_claims_a_pointer() {
        let accept = BTreeSet::from([8]);
        for button in [1, 2, 3, 8] {
            assert!(press_qualifies(
                &press(DeviceKind::Pointer, 8, button),
                DeviceKind::Pointer,
                &accept,
                ENTER_KEYCODE
            ));
        }
    }

    #[test]
    fn press_of_the_wrong_kind_does_not_qualify() {
        let accept = BTreeSet::from([8]);
        assert!(!press_qualifies(
            &press(DeviceKind::Pointer, 8, 1),
            DeviceKind::Keyboard,
            &accept,
            1
        ));
    }
}
