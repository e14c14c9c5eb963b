use crate::errors::CliError;
use crate::println_pad;
use crate::utils::session::Workspace;
use colored::Colorize;
use miette::Result;
use std::sync::Arc;
use stella_mod_core::SysinfoProbe;
use stella_mod_lib::{LaunchEvent, LaunchOptions, Launcher};

pub struct LaunchArgs {
    pub no_restore: bool,
    pub allow_conflicts: bool,
}

pub fn launch_game(args: LaunchArgs) -> Result<()> {
    let workspace = Workspace::load()?;
    let hide_while_running = workspace.config.hide_ui_while_running_or_default();
    let session = workspace.open_session()?;

    let restore_on_close = session.settings.restore_on_close && !args.no_restore;
    let exe = session.settings.game_exe.clone();
    let probe = Arc::new(SysinfoProbe::for_exe(&exe));

    println!();
    println_pad!(
        "{} {}",
        "🎮 Launching".bright_blue().bold(),
        exe.as_str().bright_white()
    );

    // The lock stays held until the session is over
    let _lock = session.lock;
    let handle = Launcher::new(session.engine, exe, probe)
        .with_options(LaunchOptions {
            restore_on_close,
            allow_conflicts: args.allow_conflicts,
        })
        .spawn();

    let mut muted = false;
    for event in handle.rx.iter() {
        match event {
            LaunchEvent::Log(line) => {
                if !muted {
                    println_pad!("{}", line.dimmed());
                }
            }
            LaunchEvent::GameStarted => {
                println_pad!("{}", "✓ Game started".bright_green().bold());
                if hide_while_running {
                    println_pad!("{}", "Waiting for the game to close...".bright_cyan());
                    muted = true;
                }
            }
            LaunchEvent::GameExited => {
                muted = false;
                println_pad!("{}", "Game closed".bright_cyan());
            }
            LaunchEvent::GameNotDetected => {
                muted = false;
                println_pad!(
                    "{}",
                    "⚠ Could not detect the game process; mods were left applied".bright_yellow()
                );
                println_pad!(
                    "  {} Run 'stella-mod restore' after playing to put the original files back",
                    "•".bright_cyan()
                );
            }
            LaunchEvent::Restored(count) => {
                println_pad!(
                    "{} {} original file(s) restored",
                    "✓".bright_green(),
                    count.to_string().bright_white().bold()
                );
            }
            // The error itself is reported from the join result
            LaunchEvent::Failed(_) => {}
            LaunchEvent::Finished => break,
        }
    }

    handle.join().map_err(CliError::from)?;
    Ok(())
}
