//! Crate-wide error type.
//!
//! Everything here is fatal for the running session. A player pressing a key
//! on a device that is already claimed is not an error; the session reports
//! it and asks again.

use crate::hierarchy::DeviceKind;

#[derive(Debug, thiserror::Error)]
pub enum CoopError {
    #[error("cannot connect to the X display: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),
    #[error("X connection failed: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),
    #[error("X request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
    #[error("the X server does not support the XInput extension (is this a Wayland session?)")]
    ExtensionMissing,
    #[error("XInput {major}.{minor} is too old, version 2.0 or newer is required")]
    VersionTooOld { major: u16, minor: u16 },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {detail}")]
    Command { command: String, detail: String },
    #[error("no master {kind} found for {player}")]
    MasterMissing { player: String, kind: DeviceKind },
    #[error("invalid player list: {0}")]
    InvalidPlayers(String),
    #[error("{players} players need {players} {kind}s but only {available} can be detected")]
    NotEnoughDevices {
        kind: DeviceKind,
        players: usize,
        available: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CoopResult<T> = Result<T, CoopError>;
