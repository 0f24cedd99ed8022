// Master pair lookup by name

use crate::hierarchy::types::{
    Device, DeviceKind, DeviceRole, MasterPair, VIRTUAL_CORE, VIRTUAL_CORE_KEYBOARD,
    VIRTUAL_CORE_POINTER,
};

/// Find the master of `kind` belonging to the pair called `name`
pub fn find_master<'a>(devices: &'a [Device], name: &str, kind: DeviceKind) -> Option<&'a Device> {
    let full_name = format!("{} {}", name, kind.suffix());
    devices
        .iter()
        .find(|d| d.role == kind.master_role() && d.name == full_name)
}

/// Id of the default master of `kind`, falling back to the well-known ids
pub fn core_master_id(devices: &[Device], kind: DeviceKind) -> u16 {
    find_master(devices, VIRTUAL_CORE, kind)
        .map(|d| d.id)
        .unwrap_or(match kind {
            DeviceKind::Keyboard => VIRTUAL_CORE_KEYBOARD,
            DeviceKind::Pointer => VIRTUAL_CORE_POINTER,
        })
}

/// Every complete master pair other than the default one
///
/// A pair is a master pointer "X pointer" with a master keyboard "X keyboard".
/// Masters without a partner are left alone.
pub fn extra_master_pairs(devices: &[Device]) -> Vec<MasterPair> {
    devices
        .iter()
        .filter(|d| d.role == DeviceRole::MasterPointer)
        .filter_map(|pointer| {
            let prefix = pointer.name.strip_suffix(" pointer")?;
            if prefix == VIRTUAL_CORE {
                return None;
            }
            let keyboard = find_master(devices, prefix, DeviceKind::Keyboard)?;
            Some(MasterPair {
                name: prefix.to_string(),
                pointer_id: pointer.id,
                keyboard_id: keyboard.id,
            })
        })
        .collect()
}

/// Extra pairs whose name is not in `keep`
pub fn stale_master_pairs(devices: &[Device], keep: &[String]) -> Vec<MasterPair> {
    extra_master_pairs(devices)
        .into_iter()
        .filter(|pair| !keep.iter().any(|name| *name == pair.name))
        .collect()
}
