//! XInput2 device hierarchy access
//!
//! Everything the tool knows about input devices comes from the X server and
//! every change goes through the `xinput` command line tool. This module keeps
//! both behind three small traits so the session logic can be driven by a fake
//! hierarchy in tests.
//!
//! ## Module Structure
//! - `types.rs`: Device, DeviceRole, DeviceKind, RawPress, MasterPair, MasterSummary
//! - `pure/`: Filters and name matching over device lists
//! - `operations/`: The X11 connection and the `xinput` tool

mod operations;
mod pure;
mod types;

use std::time::Duration;

use crate::error::CoopResult;

// Re-export types
pub use types::{
    Device, DeviceKind, DeviceRef, ENTER_KEYCODE, MasterPair, MasterSummary, RawPress,
    VIRTUAL_CORE, XTEST_MARKER,
};
#[cfg(test)]
pub use types::{DeviceRole, VIRTUAL_CORE_KEYBOARD, VIRTUAL_CORE_POINTER};

// Re-export operations
pub use operations::{X11Display, XinputCli};

// Re-export pure functions
pub use pure::{
    core_master_id, device_name, find_master, press_qualifies, slave_ids, stale_master_pairs,
    summarize,
};

/// Live view of the device list
pub trait DeviceQuery {
    /// Fetch the current device list. Never cached: devices come and go.
    fn query_devices(&mut self) -> CoopResult<Vec<Device>>;
}

/// Source of raw key/button presses
pub trait RawEventSource {
    /// Start receiving raw presses of `kind` from every device
    fn listen(&mut self, kind: DeviceKind) -> CoopResult<()>;

    /// Stop receiving raw presses
    fn unlisten(&mut self) -> CoopResult<()>;

    /// Next raw press. With `timeout`, gives up after roughly that long and
    /// returns `None`; without, blocks until something arrives.
    fn next_press(&mut self, timeout: Option<Duration>) -> CoopResult<Option<RawPress>>;
}

/// Mutations of the master/slave hierarchy
pub trait HierarchyControl {
    /// Create the pair "`name` pointer" / "`name` keyboard"
    fn create_master(&mut self, name: &str) -> CoopResult<()>;

    /// Route `device` through `master`
    fn reattach(&mut self, device: u16, master: u16) -> CoopResult<()>;

    /// Remove the pair owning `master_pointer`, sending its slaves to the given masters
    fn remove_master(
        &mut self,
        master_pointer: u16,
        return_pointer: u16,
        return_keyboard: u16,
    ) -> CoopResult<()>;
}

/// Everything a setup session needs from the windowing system
pub trait InputSystem: DeviceQuery + RawEventSource + HierarchyControl {}

impl<T: DeviceQuery + RawEventSource + HierarchyControl> InputSystem for T {}

/// The real thing: an X connection for queries and events, `xinput` for changes
pub struct XSystem {
    pub display: X11Display,
    pub xinput: XinputCli,
}

impl DeviceQuery for XSystem {
    fn query_devices(&mut self) -> CoopResult<Vec<Device>> {
        self.display.query_devices()
    }
}

impl RawEventSource for XSystem {
    fn listen(&mut self, kind: DeviceKind) -> CoopResult<()> {
        self.display.listen(kind)
    }

    fn unlisten(&mut self) -> CoopResult<()> {
        self.display.unlisten()
    }

    fn next_press(&mut self, timeout: Option<Duration>) -> CoopResult<Option<RawPress>> {
        self.display.next_press(timeout)
    }
}

impl HierarchyControl for XSystem {
    fn create_master(&mut self, name: &str) -> CoopResult<()> {
        self.xinput.create_master(name)
    }

    fn reattach(&mut self, device: u16, master: u16) -> CoopResult<()> {
        self.xinput.reattach(device, master)
    }

    fn remove_master(
        &mut self,
        master_pointer: u16,
        return_pointer: u16,
        return_keyboard: u16,
    ) -> CoopResult<()> {
        self.xinput
            .remove_master(master_pointer, return_pointer, return_keyboard)
    }
}
