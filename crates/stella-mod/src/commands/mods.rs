use crate::errors::CliError;
use crate::println_pad;
use crate::utils::print_batch_report;
use crate::utils::session::Workspace;
use colored::Colorize;
use inquire::Confirm;
use miette::{IntoDiagnostic, Result};
use stella_overlay::enabled_conflict_groups;

pub struct EnableModArgs {
    pub mod_path: String,
    pub force: bool,
}

pub fn list_mods() -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;

    let mods = session.engine.list_mods().map_err(CliError::from)?;
    println!();
    println_pad!(
        "{} {}",
        "📁 Mods:".bright_blue().bold(),
        session.engine.mods_dir().as_str().bright_white()
    );

    if mods.is_empty() {
        println_pad!(
            "   {}",
            format!("No {} files found", session.engine.extension()).bright_yellow()
        );
        return Ok(());
    }

    for entry in &mods {
        let state = match (entry.enabled, entry.applied) {
            (true, true) => "enabled".bright_green(),
            (true, false) => "enabled (not applied)".bright_yellow(),
            (false, _) => "disabled".dimmed(),
        };
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            entry.path.bright_white().bold(),
            format!("[{}]", state)
        );
    }

    for group in enabled_conflict_groups(session.engine.store()) {
        println_pad!(
            "\n{} {} is replaced by {}",
            "⚠ Conflict:".bright_yellow().bold(),
            group.file_name.bright_white(),
            group.mods.join(", ")
        );
    }

    println!();
    Ok(())
}

pub fn enable_mod(args: EnableModArgs) -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;
    let mod_path = session.resolve_mod(&args.mod_path)?;

    if session.engine.is_enabled(&mod_path) {
        println_pad!("{} {} is already enabled", "•".bright_cyan(), mod_path);
        return Ok(());
    }

    let conflicts = session.engine.check_conflicts(&mod_path);
    if !conflicts.is_empty() && !args.force {
        println_pad!(
            "{} These enabled mods also replace {}:",
            "⚠".bright_yellow(),
            stella_overlay::utils::posix_file_name(&mod_path).bright_white()
        );
        for other in &conflicts {
            println_pad!("   {} {}", "•".bright_yellow(), other.path);
        }

        let disable_others = Confirm::new("Disable them before enabling this mod?")
            .with_default(true)
            .with_help_message("Otherwise the mod applied last wins")
            .prompt()
            .into_diagnostic()?;

        if disable_others {
            for other in &conflicts {
                session
                    .engine
                    .toggle(&other.path, false)
                    .map_err(CliError::from)?;
            }
        }
    }

    session
        .engine
        .toggle(&mod_path, true)
        .map_err(CliError::from)?;

    println!();
    println_pad!(
        "{} {}",
        "✓ Enabled".bright_green().bold(),
        mod_path.bright_white()
    );
    Ok(())
}

pub fn disable_mod(mod_path: String) -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;
    let mod_path = session.resolve_mod(&mod_path)?;

    if !session.engine.is_enabled(&mod_path) && !session.engine.is_applied(&mod_path) {
        println_pad!("{} {} is already disabled", "•".bright_cyan(), mod_path);
        return Ok(());
    }

    session
        .engine
        .toggle(&mod_path, false)
        .map_err(CliError::from)?;

    println!();
    println_pad!(
        "{} {}",
        "✓ Disabled".bright_green().bold(),
        mod_path.bright_white()
    );
    Ok(())
}

pub fn set_all_mods(enable: bool) -> Result<()> {
    let workspace = Workspace::load()?;
    let mut session = workspace.open_session()?;
    session.engine.reconcile().map_err(CliError::from)?;

    let report = session.engine.set_all(enable).map_err(CliError::from)?;
    let action = if enable { "enabled" } else { "disabled" };
    let failed = print_batch_report(action, &report);

    if enable {
        for group in enabled_conflict_groups(session.engine.store()) {
            println_pad!(
                "{} {}: {} (last applied wins)",
                "⚠ Conflict".bright_yellow().bold(),
                group.file_name.bright_white(),
                group.mods.join(", ")
            );
        }
    }

    if failed > 0 {
        return Err(CliError::batch_failed(failed).into());
    }
    Ok(())
}
