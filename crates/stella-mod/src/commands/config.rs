use crate::errors::CliError;
use crate::utils::logging::default_log_dir;
use crate::utils::session::Workspace;
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::Result;
use stella_mod_core::{detect_from_running_process, is_valid_game_path, GAME_EXE_NAME};

/// Print a config path entry with status indicator
fn print_path_config(name: &str, path: Option<&Utf8Path>, is_default: bool, valid: bool) {
    match path {
        Some(p) => {
            let status = if valid {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            let origin = if is_default { " (default)" } else { "" };
            println!(
                "  {} {}{} {}",
                format!("{}:", name).bright_white(),
                p,
                origin.dimmed(),
                status
            );
        }
        None => {
            println!(
                "  {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow()
            );
        }
    }
}

fn print_value_config(name: &str, value: String, is_default: bool) {
    let origin = if is_default { " (default)" } else { "" };
    println!(
        "  {} {}{}",
        format!("{}:", name).bright_white(),
        value,
        origin.dimmed()
    );
}

pub fn show_config() -> Result<()> {
    let workspace = Workspace::load()?;
    let cfg = &workspace.config;
    let install = &workspace.install;

    println!();
    println!(
        "  {} {}",
        "config_file:".bright_white(),
        workspace.store.path()
    );

    let exe = cfg.game_exe();
    print_path_config(
        "game_exe_path",
        exe.as_deref(),
        false,
        exe.as_deref().map(is_valid_game_path).unwrap_or(false),
    );

    let mods_dir = cfg.mods_dir_or_default(install);
    print_path_config(
        "mods_dir",
        Some(mods_dir.as_path()),
        cfg.mods_dir.is_none(),
        mods_dir.is_dir(),
    );

    let backups_dir = cfg.backups_dir_or_default(install);
    print_path_config(
        "backups_dir",
        Some(backups_dir.as_path()),
        cfg.backups_dir.is_none(),
        true,
    );

    print_value_config(
        "mod_extension",
        cfg.mod_extension_or_default(),
        cfg.mod_extension.is_none(),
    );
    print_value_config(
        "restore_on_close",
        cfg.restore_on_close_or_default().to_string(),
        cfg.restore_on_close.is_none(),
    );
    print_value_config(
        "hide_ui_while_running",
        cfg.hide_ui_while_running_or_default().to_string(),
        cfg.hide_ui_while_running.is_none(),
    );

    if let Some(dir) = default_log_dir() {
        println!("  {} {}", "log_dir:".bright_white(), dir.display());
    }

    println!();
    Ok(())
}

pub fn set_config(key: String, value: String) -> Result<()> {
    let mut workspace = Workspace::load()?;

    if key == "game_exe_path" && !value.trim().is_empty() {
        let path = Utf8PathBuf::from(value.trim());
        if !is_valid_game_path(&path) {
            eprintln!(
                "  {}",
                format!("The path must point to '{}'.", GAME_EXE_NAME).bright_yellow()
            );
            eprintln!();
            eprintln!("  {} The file does not exist", "•".bright_red());
            eprintln!(
                "  {} The file is not named '{}'",
                "•".bright_red(),
                GAME_EXE_NAME
            );
            return Err(CliError::invalid_game_path(path).into());
        }
    }

    workspace
        .config
        .set_value(&key, &value)
        .map_err(CliError::from)?;
    workspace
        .store
        .save(&workspace.config)
        .map_err(CliError::from)?;

    println!("{}", "✓ Configuration updated".bright_green().bold());
    println!();
    if value.trim().is_empty() {
        println!(
            "  {} {}",
            format!("{}:", key).bright_white().bold(),
            "(reset to default)".bright_yellow()
        );
    } else {
        println!(
            "  {} {}",
            format!("{}:", key).bright_white().bold(),
            value.trim().bright_green()
        );
    }
    Ok(())
}

pub fn detect_game_path() -> Result<()> {
    println!(
        "{}",
        "Looking for a running Stella Sora process...".bright_cyan()
    );
    println!();

    match detect_from_running_process() {
        Some(detected) => {
            println!("{}", "✓ Found Stella Sora!".bright_green().bold());
            println!();
            println!(
                "  {} {}",
                "Path:".bright_white().bold(),
                detected.as_str().bright_green()
            );
            println!();

            let mut workspace = Workspace::load()?;
            workspace.config.game_exe_path = Some(detected.to_string());
            workspace
                .store
                .save(&workspace.config)
                .map_err(CliError::from)?;

            println!(
                "{}",
                "✓ Configuration updated successfully!".bright_green().bold()
            );
        }
        None => {
            println!(
                "{}",
                "✗ Stella Sora is not running".bright_red().bold()
            );
            println!();
            println!(
                "  {} Start the game, then run 'stella-mod config detect' again",
                "•".bright_cyan()
            );
            println!(
                "  {} Or set the path manually: 'stella-mod config set game_exe_path <path>'",
                "•".bright_cyan()
            );
        }
    }

    Ok(())
}
