// Console front end: prompts and progress straight to stdout

use crate::error::CoopResult;
use crate::hierarchy::{DeviceKind, ENTER_KEYCODE, InputSystem, MasterSummary, VIRTUAL_CORE};
use crate::session::{
    Cancellation, Reporter, SessionEvent, SessionOutcome, SessionRequest,
    current_configuration, reset_to_single_player, run_session,
};

const RULE_WIDTH: usize = 50;

/// Prints every session event as a line of text
pub struct ConsoleReporter {
    confirm_keycode: u32,
    show_pointers: bool,
    announced_pointers: bool,
}

impl ConsoleReporter {
    pub fn new(confirm_keycode: u32, show_pointers: bool) -> Self {
        Self {
            confirm_keycode,
            show_pointers,
            announced_pointers: false,
        }
    }

    /// The text printed for one event
    pub fn describe(&mut self, event: &SessionEvent) -> String {
        match event {
            SessionEvent::Started {
                players,
                detect_mice,
            } => {
                let mut text = format!(
                    "Setting up {} player(s): {}",
                    players.len(),
                    players.join(", ")
                );
                if *detect_mice {
                    text.push_str("\n(with mice detection enabled)");
                }
                text.push('\n');
                text
            }
            SessionEvent::Waiting {
                player,
                kind: DeviceKind::Keyboard,
                ..
            } => format!("{}: {}", player.name, key_prompt(self.confirm_keycode)),
            SessionEvent::Waiting {
                player,
                kind: DeviceKind::Pointer,
                ..
            } => {
                let gap = if self.announced_pointers { "" } else { "\n" };
                self.announced_pointers = true;
                format!("{}{}: CLICK with your mouse...", gap, player.name)
            }
            SessionEvent::Detected { device, .. } => {
                format!("  ✓ Detected: {} (ID: {})", device.name, device.id)
            }
            SessionEvent::AlreadyClaimed {
                kind,
                device,
                holder,
                ..
            } => format!(
                "  ⚠ {} '{}' (ID: {}) already assigned to {}. Try another.",
                noun(*kind, true),
                device.name,
                device.id,
                holder
            ),
            SessionEvent::Assigning => "\nAssigning devices to masters...\n".to_string(),
            SessionEvent::RemovingMaster { pair } => format!(
                "Removing master '{}' (pointer ID: {})...",
                pair.name, pair.pointer_id
            ),
            SessionEvent::UsingCoreMaster { player } => format!(
                "{} will use existing '{} keyboard'",
                player.name, VIRTUAL_CORE
            ),
            SessionEvent::MasterExists {
                player,
                keyboard_id,
            } => format!(
                "{} master already exists (ID: {})",
                player.name, keyboard_id
            ),
            SessionEvent::CreatingMaster { player } => {
                format!("Creating master for {}...", player.name)
            }
            SessionEvent::Reattaching {
                player,
                kind,
                device,
                master,
            } => {
                let target = if player.is_first() {
                    format!("{} {}", VIRTUAL_CORE, kind.suffix())
                } else {
                    player.name.clone()
                };
                format!(
                    "Reattaching {} {} to {} (master ID: {})...",
                    noun(*kind, false),
                    device,
                    target,
                    master
                )
            }
            SessionEvent::Finished { summary } => format!(
                "{}\n\nSetup complete!",
                format_configuration(summary, "Final Configuration", self.show_pointers)
            ),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: SessionEvent) {
        println!("{}", self.describe(&event));
    }
}

fn key_prompt(confirm_keycode: u32) -> String {
    if confirm_keycode == ENTER_KEYCODE {
        "Press ENTER on your keyboard...".to_string()
    } else {
        format!("Press the key with keycode {} on your keyboard...", confirm_keycode)
    }
}

fn noun(kind: DeviceKind, capitalized: bool) -> &'static str {
    match (kind, capitalized) {
        (DeviceKind::Keyboard, false) => "keyboard",
        (DeviceKind::Keyboard, true) => "Keyboard",
        (DeviceKind::Pointer, false) => "mouse",
        (DeviceKind::Pointer, true) => "Mouse",
    }
}

/// Render a configuration as an indented tree under a ruled heading
pub fn format_configuration(
    summary: &[MasterSummary],
    heading: &str,
    show_pointers: bool,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{}\n{}:\n{}", rule, heading, rule);

    for master in summary {
        out.push_str(&format!("\n\n{}:", master.name));
        out.push_str(&format!(
            "\n  Master keyboard: {} (ID: {})",
            master.keyboard_master.name, master.keyboard_master.id
        ));
        for slave in &master.keyboards {
            out.push_str(&format!("\n    └─ {} (ID: {})", slave.name, slave.id));
        }

        if !show_pointers {
            continue;
        }
        if let Some(pointer) = &master.pointer_master {
            out.push_str(&format!(
                "\n  Master pointer: {} (ID: {})",
                pointer.name, pointer.id
            ));
            for slave in &master.pointers {
                out.push_str(&format!("\n    └─ {} (ID: {})", slave.name, slave.id));
            }
        }
    }

    out
}

/// Run one blocking setup session, printing as it goes
pub fn run_console<S: InputSystem + ?Sized>(
    system: &mut S,
    request: &SessionRequest,
) -> CoopResult<()> {
    let mut reporter = ConsoleReporter::new(request.confirm_keycode, request.detect_mice);
    match run_session(system, request, &mut reporter, &Cancellation::Never)? {
        SessionOutcome::Completed(_) => Ok(()),
        SessionOutcome::Cancelled => {
            println!("Setup cancelled.");
            Ok(())
        }
    }
}

pub fn run_reset<S: InputSystem + ?Sized>(system: &mut S) -> CoopResult<()> {
    let mut reporter = ConsoleReporter::new(ENTER_KEYCODE, true);
    let summary = reset_to_single_player(system, &mut reporter)?;
    println!("{}", format_configuration(&summary, "Current Configuration", true));
    println!("\nReset complete! All devices returned to single player mode.");
    Ok(())
}

pub fn run_show<S: InputSystem + ?Sized>(system: &mut S) -> CoopResult<()> {
    let summary = current_configuration(system)?;
    println!("{}", format_configuration(&summary, "Current Configuration", true));
    Ok(())
}
