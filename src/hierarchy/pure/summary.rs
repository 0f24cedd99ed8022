// Configuration summary (which slaves hang off which master)

use crate::hierarchy::pure::masters::find_master;
use crate::hierarchy::types::{Device, DeviceKind, DeviceRef, DeviceRole, MasterSummary};

/// Group the device list by master keyboard, in server order
pub fn summarize(devices: &[Device]) -> Vec<MasterSummary> {
    devices
        .iter()
        .filter(|d| d.role == DeviceRole::MasterKeyboard)
        .map(|keyboard_master| {
            let name = keyboard_master
                .name
                .strip_suffix(" keyboard")
                .unwrap_or(&keyboard_master.name)
                .to_string();
            let pointer_master = find_master(devices, &name, DeviceKind::Pointer);

            MasterSummary {
                keyboards: attached(devices, DeviceRole::SlaveKeyboard, keyboard_master.id),
                pointers: pointer_master
                    .map(|p| attached(devices, DeviceRole::SlavePointer, p.id))
                    .unwrap_or_default(),
                keyboard_master: keyboard_master.into(),
                pointer_master: pointer_master.map(DeviceRef::from),
                name,
            }
        })
        .collect()
}

fn attached(devices: &[Device], role: DeviceRole, master: u16) -> Vec<DeviceRef> {
    devices
        .iter()
        .filter(|d| d.role == role && d.attachment == Some(master))
        .map(DeviceRef::from)
        .collect()
}
