mod config;
mod error;
mod frontend;
mod hierarchy;
mod paths;
mod session;
mod util;

use std::process::ExitCode;

use clap::Parser;

use crate::config::{load_cfg, save_cfg};
use crate::error::CoopResult;
use crate::frontend::{run_console, run_menu, run_reset, run_show};
use crate::hierarchy::{X11Display, XSystem, XinputCli};
use crate::session::{SessionRequest, player_names, players};

/// Give every player their own keyboard (and mouse) on one X display.
///
/// Each player presses Return on the keyboard they want; everyone after the
/// first gets a master pointer/keyboard pair of their own, so split-screen
/// games see separate input devices.
#[derive(Parser, Debug)]
#[command(name = "xi2coop", version)]
struct Cli {
    /// How many players to set up
    #[arg(
        value_name = "NUM_PLAYERS",
        value_parser = clap::value_parser!(u16).range(1..),
        required_unless_present_any = ["gui", "kodi", "reset", "show"]
    )]
    num_players: Option<u16>,

    /// Player names, in order. Missing ones become Player<N>.
    #[arg(long, num_args = 1.., value_name = "NAME")]
    names: Vec<String>,

    /// Also ask every player to click their mouse
    #[arg(long)]
    mice: bool,

    /// Interactive menu
    #[arg(long)]
    gui: bool,

    /// Interactive menu, media center flavour
    #[arg(long)]
    kodi: bool,

    /// Remove every extra master and go back to a single player
    #[arg(long)]
    reset: bool,

    /// Print the current device configuration and exit
    #[arg(long)]
    show: bool,

    /// Keycode players press to claim a keyboard (default: Return)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(8..=255))]
    keycode: Option<u32>,

    /// Save the effective settings as the new defaults
    #[arg(long)]
    save_config: bool,
}

fn run(args: Cli) -> CoopResult<()> {
    let mut cfg = load_cfg();
    if let Some(keycode) = args.keycode {
        cfg.confirm_keycode = keycode;
    }
    if args.save_config {
        save_cfg(&cfg)?;
    }
    log::debug!("main - Effective settings: {:?}", cfg);

    let mut system = XSystem {
        display: X11Display::connect()?,
        xinput: XinputCli::new(cfg.xinput_bin.clone()),
    };

    if args.reset {
        return run_reset(&mut system);
    }
    if args.show {
        return run_show(&mut system);
    }
    if args.gui || args.kodi {
        let title = if args.kodi {
            "🕹️ XInput2 Multiplayer Setup (media center)"
        } else {
            "🕹️ XInput2 Multiplayer Setup"
        };
        return run_menu(&mut system, &cfg, title);
    }

    match args.num_players {
        Some(count) => {
            let names = player_names(count.into(), &args.names, &cfg.default_name_prefix);
            let request = SessionRequest::new(players(names), args.mice, &cfg);
            run_console(&mut system, &request)
        }
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
