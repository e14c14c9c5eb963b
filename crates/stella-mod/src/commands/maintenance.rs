use crate::errors::CliError;
use crate::println_pad;
use crate::utils::print_batch_report;
use crate::utils::session::Workspace;
use colored::Colorize;
use miette::Result;
use stella_mod_core::{GameProbe, SysinfoProbe};
use stella_overlay::enabled_conflict_groups;

pub fn sync_mods() -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;

    let report = session.engine.reconcile().map_err(CliError::from)?;

    println!();
    println_pad!(
        "{} {} mod(s) tracked",
        "✓".bright_green(),
        session.engine.store().records().len()
    );
    if !report.orphaned.is_empty() {
        println_pad!(
            "{} {} removed mod(s) cleaned up, {} original file(s) restored",
            "•".bright_cyan(),
            report.orphaned.len(),
            report.restored.len()
        );
    }
    if report.swept > 0 {
        println_pad!(
            "{} {} empty backup folder(s) removed",
            "•".bright_cyan(),
            report.swept
        );
    }
    Ok(())
}

pub fn show_conflicts(mod_path: Option<String>) -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;

    println!();
    match mod_path {
        Some(query) => {
            let mod_path = session.resolve_mod(&query)?;
            let conflicts = session.engine.check_conflicts(&mod_path);
            if conflicts.is_empty() {
                println_pad!(
                    "{} No enabled mod conflicts with {}",
                    "✓".bright_green(),
                    mod_path.bright_white()
                );
            } else {
                println_pad!(
                    "{} {} shares its file name with:",
                    "⚠".bright_yellow(),
                    mod_path.bright_white().bold()
                );
                for other in conflicts {
                    println_pad!("   {} {}", "•".bright_yellow(), other.path);
                }
            }
        }
        None => {
            let groups = enabled_conflict_groups(session.engine.store());
            if groups.is_empty() {
                println_pad!("{} No conflicts between enabled mods", "✓".bright_green());
            }
            for group in groups {
                println_pad!(
                    "{} {}",
                    "⚠".bright_yellow(),
                    group.file_name.bright_white().bold()
                );
                for path in group.mods {
                    println_pad!("   {} {}", "•".bright_yellow(), path);
                }
            }
        }
    }
    Ok(())
}

pub fn verify_mods() -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;

    let report = session.engine.verify_enabled().map_err(CliError::from)?;
    let failed = print_batch_report("verified", &report);
    if failed > 0 {
        return Err(CliError::batch_failed(failed).into());
    }
    Ok(())
}

pub fn install_mods() -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;

    let report = session
        .engine
        .install_all_enabled()
        .map_err(CliError::from)?;
    let failed = print_batch_report("installed", &report);
    if failed > 0 {
        return Err(CliError::batch_failed(failed).into());
    }
    Ok(())
}

pub fn restore_originals() -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;

    let exe = session.settings.game_exe.clone();
    if SysinfoProbe::for_exe(&exe).is_running() {
        return Err(CliError::GameAlreadyRunning.into());
    }

    let restored = session.engine.restore_all().map_err(CliError::from)?;

    println!();
    println_pad!(
        "{} {} original file(s) restored",
        "✓".bright_green(),
        restored.to_string().bright_white().bold()
    );
    Ok(())
}

/// Read-only overview; does not take the instance lock.
pub fn show_status() -> Result<()> {
    let workspace = Workspace::load()?;

    println!();
    let Some(exe) = workspace.config.game_exe() else {
        println_pad!(
            "{} {}",
            "Game:".bright_white(),
            "(not set)".bright_yellow()
        );
        return Ok(());
    };

    let running = SysinfoProbe::for_exe(&exe).is_running();
    println_pad!("{} {}", "Game:".bright_white(), exe);
    println_pad!(
        "{} {}",
        "Running:".bright_white(),
        if running {
            "yes".bright_green()
        } else {
            "no".dimmed()
        }
    );

    let store = stella_overlay::ModStatusStore::open(
        workspace.config.mods_dir_or_default(&workspace.install),
        workspace.install.join(stella_overlay::STATUS_FILE_NAME),
    );
    let enabled = store.records().iter().filter(|r| r.enabled).count();
    let applied = store.records().iter().filter(|r| r.is_applied()).count();
    println_pad!(
        "{} {} tracked, {} enabled, {} applied",
        "Mods:".bright_white(),
        store.records().len(),
        enabled,
        applied
    );
    Ok(())
}
