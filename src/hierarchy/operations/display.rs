// XInput2 connection: version handshake, device queries, raw press events

use std::os::fd::AsFd;
use std::time::Duration;

use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::Event;
use x11rb::protocol::xinput::{self, ConnectionExt};
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use crate::error::{CoopError, CoopResult};
use crate::hierarchy::types::{Device, DeviceKind, DeviceRole, RawPress};
use crate::hierarchy::{DeviceQuery, RawEventSource};
use crate::util::wait_readable;

// Not defined by x11rb.
const XI_ALL_DEVICES: u16 = 0;

pub struct X11Display {
    conn: RustConnection,
    root: Window,
}

impl X11Display {
    /// Connect to `$DISPLAY` and make sure XInput 2 is there
    pub fn connect() -> CoopResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;

        if conn
            .extension_information(xinput::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(CoopError::ExtensionMissing);
        }

        let version = conn.xinput_xi_query_version(2, 0)?.reply()?;
        log::debug!(
            "display - Server supports XInput {}.{}",
            version.major_version,
            version.minor_version
        );
        if version.major_version < 2 {
            return Err(CoopError::VersionTooOld {
                major: version.major_version,
                minor: version.minor_version,
            });
        }

        let root = conn.setup().roots[screen_num].root;
        Ok(Self { conn, root })
    }

    fn select_raw(&self, mask: Vec<xinput::XIEventMask>) -> CoopResult<()> {
        let interest = xinput::EventMask {
            deviceid: XI_ALL_DEVICES,
            mask,
        };
        self.conn
            .xinput_xi_select_events(self.root, std::slice::from_ref(&interest))?
            .check()?;
        Ok(())
    }
}

fn role_of(type_: xinput::DeviceType) -> DeviceRole {
    match type_ {
        xinput::DeviceType::MASTER_POINTER => DeviceRole::MasterPointer,
        xinput::DeviceType::MASTER_KEYBOARD => DeviceRole::MasterKeyboard,
        xinput::DeviceType::SLAVE_POINTER => DeviceRole::SlavePointer,
        xinput::DeviceType::SLAVE_KEYBOARD => DeviceRole::SlaveKeyboard,
        _ => DeviceRole::FloatingSlave,
    }
}

/// Convert one X event into a raw press, if it is one
fn raw_press(event: Event) -> Option<RawPress> {
    match event {
        Event::XinputRawKeyPress(e) => Some(RawPress {
            kind: DeviceKind::Keyboard,
            device_id: e.deviceid,
            detail: e.detail,
        }),
        Event::XinputRawButtonPress(e) => Some(RawPress {
            kind: DeviceKind::Pointer,
            device_id: e.deviceid,
            detail: e.detail,
        }),
        _ => None,
    }
}

impl DeviceQuery for X11Display {
    fn query_devices(&mut self) -> CoopResult<Vec<Device>> {
        let infos = self
            .conn
            .xinput_xi_query_device(XI_ALL_DEVICES)?
            .reply()?
            .infos;

        Ok(infos
            .into_iter()
            .map(|info| {
                let role = role_of(info.type_);
                let attachment = match role {
                    DeviceRole::SlavePointer | DeviceRole::SlaveKeyboard => Some(info.attachment),
                    _ => None,
                };
                Device {
                    id: info.deviceid,
                    name: String::from_utf8_lossy(&info.name).into_owned(),
                    role,
                    attachment,
                }
            })
            .collect())
    }
}

impl RawEventSource for X11Display {
    fn listen(&mut self, kind: DeviceKind) -> CoopResult<()> {
        let mask = match kind {
            DeviceKind::Keyboard => xinput::XIEventMask::RAW_KEY_PRESS,
            DeviceKind::Pointer => xinput::XIEventMask::RAW_BUTTON_PRESS,
        };
        log::debug!("display - Selecting raw {} presses on root", kind);
        self.select_raw(vec![mask])
    }

    fn unlisten(&mut self) -> CoopResult<()> {
        // An empty mask clears the selection.
        self.select_raw(Vec::new())?;
        self.conn.flush()?;
        Ok(())
    }

    fn next_press(&mut self, timeout: Option<Duration>) -> CoopResult<Option<RawPress>> {
        let Some(timeout) = timeout else {
            loop {
                if let Some(press) = raw_press(self.conn.wait_for_event()?) {
                    return Ok(Some(press));
                }
            }
        };

        // Events may already be buffered; only sleep on the socket when not.
        while let Some(event) = self.conn.poll_for_event()? {
            if let Some(press) = raw_press(event) {
                return Ok(Some(press));
            }
        }
        if !wait_readable(self.conn.stream().as_fd(), timeout)? {
            return Ok(None);
        }
        while let Some(event) = self.conn.poll_for_event()? {
            if let Some(press) = raw_press(event) {
                return Ok(Some(press));
            }
        }
        Ok(None)
    }
}
