// Menu front end: setup, reset and inspection from a small numbered menu
//
// Detection runs on a scoped worker thread and reports back over a channel,
// so the foreground can keep drawing progress and notice Ctrl-C.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::config::CoopConfig;
use crate::error::CoopResult;
use crate::frontend::console::{ConsoleReporter, format_configuration};
use crate::hierarchy::InputSystem;
use crate::session::{
    Cancellation, Reporter, SessionEvent, SessionOutcome, SessionRequest, current_configuration,
    player_names, players, reset_to_single_player, run_session,
};
use crate::util::wait_readable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    SetupKeyboards,
    SetupKeyboardsAndMice,
    Reset,
    ShowConfiguration,
    Exit,
}

const MENU_ITEMS: [(MenuChoice, &str); 5] = [
    (MenuChoice::SetupKeyboards, "Set up players (keyboards only)"),
    (MenuChoice::SetupKeyboardsAndMice, "Set up players (keyboards + mice)"),
    (MenuChoice::Reset, "Reset to single player"),
    (MenuChoice::ShowConfiguration, "Show current configuration"),
    (MenuChoice::Exit, "Exit"),
];

fn parse_choice(input: &str) -> Option<MenuChoice> {
    let n: usize = input.trim().parse().ok()?;
    MENU_ITEMS.get(n.checked_sub(1)?).map(|(choice, _)| *choice)
}

fn parse_player_count(input: &str, max: usize) -> Result<usize, String> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(format!("Please enter a number between 1 and {}", max)),
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// SIGINT cancels the running detection or the open question; a second one
/// while still set exits. SIGTERM cancels and leaves the menu.
struct Signals {
    interrupt: Arc<AtomicBool>,
    terminate: Arc<AtomicBool>,
}

impl Signals {
    fn new() -> Self {
        Self {
            interrupt: Arc::new(AtomicBool::new(false)),
            terminate: Arc::new(AtomicBool::new(false)),
        }
    }

    fn register() -> CoopResult<Self> {
        let signals = Self::new();

        flag::register_conditional_shutdown(SIGINT, 130, Arc::clone(&signals.interrupt))?;
        flag::register(SIGINT, Arc::clone(&signals.interrupt))?;
        flag::register(SIGTERM, Arc::clone(&signals.terminate))?;

        Ok(signals)
    }

    fn cancelled(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst) || self.terminate.load(Ordering::SeqCst)
    }

    fn terminating(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    fn clear_interrupt(&self) {
        self.interrupt.store(false, Ordering::SeqCst);
    }

    /// Consume a pending SIGINT
    fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }
}

/// Foreground rendering of worker events, with the percentage in front
struct MenuProgress {
    console: ConsoleReporter,
    players: usize,
}

impl Reporter for MenuProgress {
    fn report(&mut self, event: SessionEvent) {
        let text = self.console.describe(&event);
        match event {
            SessionEvent::Waiting {
                player, percent, ..
            } => println!(
                "[{:>3}%] ({}/{}) {}",
                percent,
                player.ordinal(),
                self.players,
                text.trim_start()
            ),
            SessionEvent::Finished { .. } => {
                println!("[100%] Configuring devices... done");
                println!("{}", text);
            }
            _ => println!("{}", text),
        }
    }
}

/// Reads the user's answers line by line
///
/// The input is polled rather than read blocking, so SIGINT and SIGTERM are
/// noticed while a question is open. Blank lines are skipped: every Return
/// pressed while players claim their keyboards also lands in the terminal.
struct Prompt<'a, R> {
    input: R,
    pending: Vec<u8>,
    signals: &'a Signals,
    interval: Duration,
}

impl<'a, R: Read + AsFd> Prompt<'a, R> {
    fn new(input: R, signals: &'a Signals, interval: Duration) -> Self {
        Self {
            input,
            pending: Vec::new(),
            signals,
            interval,
        }
    }

    /// `None` when input ends or the question is abandoned by a signal
    fn ask(&mut self, question: &str) -> CoopResult<Option<String>> {
        // A Ctrl-C from before the question was shown does not answer it.
        self.signals.clear_interrupt();

        loop {
            print!("{} ", question);
            io::stdout().flush()?;

            match self.next_line()? {
                None => {
                    println!();
                    return Ok(None);
                }
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line)),
            }
        }
    }

    fn next_line(&mut self) -> CoopResult<Option<String>> {
        loop {
            if let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=end).collect();
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
            if self.signals.terminating() {
                return Ok(None);
            }
            if self.signals.take_interrupt() {
                log::debug!("menu - Question abandoned by SIGINT");
                return Ok(None);
            }
            if !wait_readable(self.input.as_fd(), self.interval)? {
                continue;
            }

            let mut buf = [0u8; 1024];
            let n = match self.input.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let line = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                return Ok(Some(line));
            }
            self.pending.extend_from_slice(&buf[..n]);
        }
    }
}

/// Run the interactive menu until the user leaves or SIGTERM arrives
pub fn run_menu<S: InputSystem + Send>(
    system: &mut S,
    cfg: &CoopConfig,
    title: &str,
) -> CoopResult<()> {
    let signals = Signals::register()?;
    let stdin = File::from(io::stdin().as_fd().try_clone_to_owned()?);
    let mut prompt = Prompt::new(stdin, &signals, cfg.poll_interval());

    println!("{}", title);
    println!("Ctrl-C cancels a running detection or backs out of a question.");

    while !signals.terminating() {
        println!();
        for (n, (_, label)) in MENU_ITEMS.iter().enumerate() {
            println!("  {}) {}", n + 1, label);
        }

        let Some(answer) = prompt.ask("Choice:")? else {
            break;
        };

        let choice = match parse_choice(&answer) {
            Some(choice) => choice,
            None => {
                println!("Unknown choice '{}'", answer.trim());
                continue;
            }
        };
        log::debug!("menu - Selected {:?}", choice);

        match choice {
            MenuChoice::SetupKeyboards => {
                setup(system, cfg, &signals, &mut prompt, false)?;
            }
            MenuChoice::SetupKeyboardsAndMice => {
                setup(system, cfg, &signals, &mut prompt, true)?;
            }
            MenuChoice::Reset => reset(system, cfg, &mut prompt)?,
            MenuChoice::ShowConfiguration => {
                let summary = current_configuration(system)?;
                println!("{}", format_configuration(&summary, "Current Configuration", true));
            }
            MenuChoice::Exit => break,
        }
    }

    println!("Bye!");
    Ok(())
}

fn setup<S: InputSystem + Send, R: Read + AsFd>(
    system: &mut S,
    cfg: &CoopConfig,
    signals: &Signals,
    prompt: &mut Prompt<'_, R>,
    detect_mice: bool,
) -> CoopResult<Option<SessionOutcome>> {
    let question = format!("How many players? (1-{})", cfg.max_menu_players);
    let count = loop {
        let Some(answer) = prompt.ask(&question)? else {
            return Ok(None);
        };
        match parse_player_count(&answer, cfg.max_menu_players) {
            Ok(count) => break count,
            Err(msg) => println!("{}", msg),
        }
    };

    let names = player_names(count, &[], &cfg.default_name_prefix);
    let request = SessionRequest::new(players(names), detect_mice, cfg);

    signals.clear_interrupt();
    let outcome = run_in_background(system, &request, cfg, signals)?;
    signals.clear_interrupt();

    match &outcome {
        SessionOutcome::Completed(summary) => {
            log::info!("menu - Setup finished with {} master pair(s)", summary.len())
        }
        SessionOutcome::Cancelled => {
            log::info!("menu - Setup cancelled");
            println!("\nSetup cancelled. Nothing was changed.");
        }
    }
    Ok(Some(outcome))
}

fn run_in_background<S: InputSystem + Send>(
    system: &mut S,
    request: &SessionRequest,
    cfg: &CoopConfig,
    signals: &Signals,
) -> CoopResult<SessionOutcome> {
    let (tx, rx) = mpsc::channel();
    let interval = cfg.poll_interval();

    std::thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let mut tx = tx;
            let predicate = || signals.cancelled();
            let cancel = Cancellation::Polling {
                interval,
                predicate: &predicate,
            };
            run_session(system, request, &mut tx, &cancel)
        });

        let mut progress = MenuProgress {
            console: ConsoleReporter::new(request.confirm_keycode, request.detect_mice),
            players: request.players.len(),
        };
        // Ends once the worker finishes and drops its sender.
        for event in rx {
            progress.report(event);
        }

        match worker.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

fn reset<S: InputSystem, R: Read + AsFd>(
    system: &mut S,
    cfg: &CoopConfig,
    prompt: &mut Prompt<'_, R>,
) -> CoopResult<()> {
    println!("Reset all players to single player mode?");
    println!("This will remove all extra master devices.");
    let Some(answer) = prompt.ask("Continue? [y/N]")? else {
        return Ok(());
    };
    if !is_yes(&answer) {
        return Ok(());
    }

    let mut console = ConsoleReporter::new(cfg.confirm_keycode, true);
    let summary = reset_to_single_player(system, &mut console)?;
    println!("{}", format_configuration(&summary, "Current Configuration", true));
    println!("\nReset complete! All devices returned to single player mode.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::os::unix::net::UnixStream;
    use std::time::Instant;

    use crate::error::CoopError;
    use crate::hierarchy::{
        Device, DeviceKind, DeviceQuery, DeviceRole, ENTER_KEYCODE, HierarchyControl,
        RawEventSource, RawPress,
    };

    const TICK: Duration = Duration::from_millis(10);

    /// Two keyboards on the core pair; presses come from a script
    struct StubSystem {
        devices: Vec<Device>,
        presses: VecDeque<RawPress>,
        commands: Vec<String>,
    }

    impl StubSystem {
        fn new(enter_from: &[u16]) -> Self {
            let dev = |id, name: &str, role, attachment| Device {
                id,
                name: name.to_string(),
                role,
                attachment,
            };
            Self {
                devices: vec![
                    dev(2, "Virtual core pointer", DeviceRole::MasterPointer, None),
                    dev(3, "Virtual core keyboard", DeviceRole::MasterKeyboard, None),
                    dev(7, "AT Translated Set 2 keyboard", DeviceRole::SlaveKeyboard, Some(3)),
                    dev(9, "Dell KB216 Wired Keyboard", DeviceRole::SlaveKeyboard, Some(3)),
                ],
                presses: enter_from
                    .iter()
                    .map(|id| RawPress {
                        kind: DeviceKind::Keyboard,
                        device_id: *id,
                        detail: ENTER_KEYCODE,
                    })
                    .collect(),
                commands: Vec::new(),
            }
        }
    }

    impl DeviceQuery for StubSystem {
        fn query_devices(&mut self) -> CoopResult<Vec<Device>> {
            Ok(self.devices.clone())
        }
    }

    impl RawEventSource for StubSystem {
        fn listen(&mut self, _kind: DeviceKind) -> CoopResult<()> {
            Ok(())
        }

        fn unlisten(&mut self) -> CoopResult<()> {
            Ok(())
        }

        fn next_press(&mut self, _timeout: Option<Duration>) -> CoopResult<Option<RawPress>> {
            Ok(self.presses.pop_front())
        }
    }

    impl HierarchyControl for StubSystem {
        fn create_master(&mut self, name: &str) -> CoopResult<()> {
            self.commands.push(format!("create-master {}", name));
            self.devices.push(Device {
                id: 20,
                name: format!("{} pointer", name),
                role: DeviceRole::MasterPointer,
                attachment: None,
            });
            self.devices.push(Device {
                id: 21,
                name: format!("{} keyboard", name),
                role: DeviceRole::MasterKeyboard,
                attachment: None,
            });
            Ok(())
        }

        fn reattach(&mut self, device: u16, master: u16) -> CoopResult<()> {
            self.commands.push(format!("reattach {} {}", device, master));
            Ok(())
        }

        fn remove_master(&mut self, pointer: u16, _: u16, _: u16) -> CoopResult<()> {
            Err(CoopError::Command {
                command: format!("remove-master {}", pointer),
                detail: "unexpected".to_string(),
            })
        }
    }

    fn two_players() -> SessionRequest {
        let names = player_names(2, &[], "Player");
        SessionRequest::new(players(names), false, &CoopConfig::default())
    }

    fn fast_cfg() -> CoopConfig {
        CoopConfig {
            poll_interval_ms: 10,
            ..Default::default()
        }
    }

    #[test]
    fn menu_choices_are_one_based() {
        assert_eq!(parse_choice("1\n"), Some(MenuChoice::SetupKeyboards));
        assert_eq!(parse_choice(" 4 "), Some(MenuChoice::ShowConfiguration));
        assert_eq!(parse_choice("5"), Some(MenuChoice::Exit));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("6"), None);
        assert_eq!(parse_choice("reset"), None);
    }

    #[test]
    fn player_count_must_be_in_range() {
        assert_eq!(parse_player_count("3\n", 10), Ok(3));
        assert_eq!(parse_player_count("10", 10), Ok(10));
        assert!(parse_player_count("0", 10).is_err());
        assert!(parse_player_count("11", 10).is_err());
        assert!(parse_player_count("-2", 10).is_err());
        assert_eq!(
            parse_player_count("x", 4),
            Err("Please enter a number between 1 and 4".to_string())
        );
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("YES"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn prompt_skips_blank_lines_left_by_detection() {
        let signals = Signals::new();
        let (reader, mut writer) = UnixStream::pair().unwrap();
        writer.write_all(b"\n\n  \n2\n3").unwrap();
        drop(writer);

        let mut prompt = Prompt::new(reader, &signals, TICK);
        assert_eq!(prompt.ask("Choice:").unwrap(), Some("2\n".to_string()));
        assert_eq!(prompt.ask("Choice:").unwrap(), Some("3".to_string()));
        assert_eq!(prompt.ask("Choice:").unwrap(), None);
    }

    #[test]
    fn interrupt_abandons_an_open_question() {
        let signals = Signals::new();
        let (reader, _writer) = UnixStream::pair().unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                std::thread::sleep(Duration::from_millis(50));
                signals.interrupt.store(true, Ordering::SeqCst);
            });
            let mut prompt = Prompt::new(reader, &signals, TICK);
            assert_eq!(prompt.ask("How many players?").unwrap(), None);
        });

        // Consumed by the prompt, so the next session is not cancelled by it
        assert!(!signals.cancelled());
    }

    #[test]
    fn interrupt_before_the_question_is_ignored() {
        let signals = Signals::new();
        signals.interrupt.store(true, Ordering::SeqCst);
        let (reader, mut writer) = UnixStream::pair().unwrap();
        writer.write_all(b"4\n").unwrap();

        let mut prompt = Prompt::new(reader, &signals, TICK);
        assert_eq!(prompt.ask("Choice:").unwrap(), Some("4\n".to_string()));
    }

    #[test]
    fn sigterm_ends_a_blocked_prompt() {
        let signals = Signals::register().unwrap();
        let (reader, _writer) = UnixStream::pair().unwrap();
        let started = Instant::now();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                std::thread::sleep(Duration::from_millis(50));
                signal_hook::low_level::raise(SIGTERM).unwrap();
            });
            let mut prompt = Prompt::new(reader, &signals, TICK);
            assert_eq!(prompt.ask("Choice:").unwrap(), None);
        });

        assert!(signals.terminating());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn pending_interrupt_cancels_background_detection() {
        let signals = Signals::new();
        signals.interrupt.store(true, Ordering::SeqCst);
        let mut system = StubSystem::new(&[7, 9]);

        let outcome = run_in_background(&mut system, &two_players(), &fast_cfg(), &signals);

        assert_eq!(outcome.unwrap(), SessionOutcome::Cancelled);
        assert!(system.commands.is_empty());
    }

    #[test]
    fn terminate_cancels_background_detection() {
        let signals = Signals::new();
        signals.terminate.store(true, Ordering::SeqCst);
        let mut system = StubSystem::new(&[]);

        let outcome = run_in_background(&mut system, &two_players(), &fast_cfg(), &signals);

        assert_eq!(outcome.unwrap(), SessionOutcome::Cancelled);
    }

    #[test]
    fn background_session_applies_the_claims() {
        let signals = Signals::new();
        let mut system = StubSystem::new(&[7, 9]);

        let outcome = run_in_background(&mut system, &two_players(), &fast_cfg(), &signals);

        assert!(matches!(outcome, Ok(SessionOutcome::Completed(_))));
        assert_eq!(
            system.commands,
            vec!["create-master Player2", "reattach 7 3", "reattach 9 21"]
        );
    }

    #[test]
    fn stale_interrupt_does_not_cancel_the_next_setup() {
        let signals = Signals::new();
        let (reader, mut writer) = UnixStream::pair().unwrap();
        writer.write_all(b"2\n").unwrap();
        let mut prompt = Prompt::new(reader, &signals, TICK);
        let mut system = StubSystem::new(&[7, 9]);

        // Left over from a Ctrl-C during the previous session
        signals.interrupt.store(true, Ordering::SeqCst);
        let outcome = setup(&mut system, &fast_cfg(), &signals, &mut prompt, false).unwrap();

        assert!(matches!(outcome, Some(SessionOutcome::Completed(_))));
        assert!(!signals.cancelled());
    }
}
