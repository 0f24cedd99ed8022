// Hierarchy changes through the `xinput` command line tool

use std::process::Command;

use crate::error::{CoopError, CoopResult};
use crate::hierarchy::HierarchyControl;

pub struct XinputCli {
    bin: String,
}

impl XinputCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run `xinput <args>`; any non-zero exit is an error carrying stderr as-is
    fn run(&self, args: &[String]) -> CoopResult<()> {
        let command = format!("{} {}", self.bin, args.join(" "));
        log::debug!("xinput - Running {}", command);

        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|source| CoopError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(CoopError::Command { command, detail });
        }

        Ok(())
    }
}

impl HierarchyControl for XinputCli {
    fn create_master(&mut self, name: &str) -> CoopResult<()> {
        self.run(&["create-master".to_string(), name.to_string()])
    }

    fn reattach(&mut self, device: u16, master: u16) -> CoopResult<()> {
        self.run(&[
            "reattach".to_string(),
            device.to_string(),
            master.to_string(),
        ])
    }

    fn remove_master(
        &mut self,
        master_pointer: u16,
        return_pointer: u16,
        return_keyboard: u16,
    ) -> CoopResult<()> {
        self.run(&[
            "remove-master".to_string(),
            master_pointer.to_string(),
            "AttachToMaster".to_string(),
            return_pointer.to_string(),
            return_keyboard.to_string(),
        ])
    }
}
