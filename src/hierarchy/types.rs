//! Device hierarchy type definitions

use std::fmt;

/// Well-known id of the server's default master pointer
pub const VIRTUAL_CORE_POINTER: u16 = 2;
/// Well-known id of the server's default master keyboard
pub const VIRTUAL_CORE_KEYBOARD: u16 = 3;
/// Name prefix shared by the default master pair
pub const VIRTUAL_CORE: &str = "Virtual core";
/// Return on evdev keymaps
pub const ENTER_KEYCODE: u32 = 36;
/// The server's synthetic test devices carry this in their name
pub const XTEST_MARKER: &str = "XTEST";

/// What a device is in the XInput2 hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceRole {
    MasterPointer,
    MasterKeyboard,
    SlavePointer,
    SlaveKeyboard,
    /// Slave detached from every master
    FloatingSlave,
}

/// The two halves of a master pair, and the two things a player can claim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    Keyboard,
    Pointer,
}

impl DeviceKind {
    pub fn master_role(self) -> DeviceRole {
        match self {
            DeviceKind::Keyboard => DeviceRole::MasterKeyboard,
            DeviceKind::Pointer => DeviceRole::MasterPointer,
        }
    }

    pub fn slave_role(self) -> DeviceRole {
        match self {
            DeviceKind::Keyboard => DeviceRole::SlaveKeyboard,
            DeviceKind::Pointer => DeviceRole::SlavePointer,
        }
    }

    /// Suffix the server appends to a master pair's name
    pub fn suffix(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Pointer => "pointer",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One entry of the server's device list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: u16,
    pub name: String,
    pub role: DeviceRole,
    /// Master this slave currently reports through
    pub attachment: Option<u16>,
}

/// A raw (slave-originated) key or button press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPress {
    pub kind: DeviceKind,
    pub device_id: u16,
    /// Keycode for keys, button number for buttons
    pub detail: u32,
}

/// A master pointer and master keyboard sharing a name prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPair {
    /// "Player2" for "Player2 pointer" / "Player2 keyboard"
    pub name: String,
    pub pointer_id: u16,
    pub keyboard_id: u16,
}

/// Id and name, for display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRef {
    pub id: u16,
    pub name: String,
}

impl From<&Device> for DeviceRef {
    fn from(device: &Device) -> Self {
        DeviceRef {
            id: device.id,
            name: device.name.clone(),
        }
    }
}

/// One master keyboard (and its pointer, if any) with everything attached to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterSummary {
    pub name: String,
    pub keyboard_master: DeviceRef,
    pub pointer_master: Option<DeviceRef>,
    pub keyboards: Vec<DeviceRef>,
    pub pointers: Vec<DeviceRef>,
}
