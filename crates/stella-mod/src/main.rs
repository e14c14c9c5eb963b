use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    detect_game_path, disable_mod, enable_mod, install_mods, launch_game, list_mods,
    restore_originals, set_all_mods, set_config, show_config, show_conflicts, show_status,
    sync_mods, verify_mods, EnableModArgs, LaunchArgs,
};
use miette::Result;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List mods in the mods folder and whether they are enabled
    List,
    /// Enable a mod and apply it to the game files
    Enable {
        /// Path relative to the mods folder, or the file name if unique
        mod_path: String,

        /// Skip the conflict prompt; the mod applied last wins
        #[arg(short, long)]
        force: bool,
    },
    /// Disable a mod and restore the files it replaced
    Disable {
        /// Path relative to the mods folder, or the file name if unique
        mod_path: String,
    },
    /// Enable every mod in the mods folder
    EnableAll,
    /// Disable every mod in the mods folder
    DisableAll,
    /// Pick up added, changed and removed mod files
    Sync,
    /// Show enabled mods that replace the same game file
    Conflicts {
        /// Only show conflicts for this mod
        mod_path: Option<String>,
    },
    /// Check that enabled mods are really applied, re-applying where needed
    Verify,
    /// Apply every enabled mod
    Install,
    /// Put every backed-up original file back into the game
    Restore,
    /// Apply enabled mods, start the game and restore originals once it closes
    Launch {
        /// Leave mods applied after the game closes
        #[arg(long)]
        no_restore: bool,

        /// Launch even if enabled mods replace the same file
        #[arg(long)]
        allow_conflicts: bool,
    },
    /// Show the configured game and whether it is running
    Status,
    /// Show or change settings in config.toml
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set a value; an empty value resets it to the default
    Set { key: String, value: String },
    /// Find the game executable from a running game process
    Detect,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    let (_log_guard, _log_dir) = utils::logging::init_logging();

    tracing::debug!("Running {:?}", args.command);

    match args.command {
        Commands::List => list_mods(),
        Commands::Enable { mod_path, force } => enable_mod(EnableModArgs { mod_path, force }),
        Commands::Disable { mod_path } => disable_mod(mod_path),
        Commands::EnableAll => set_all_mods(true),
        Commands::DisableAll => set_all_mods(false),
        Commands::Sync => sync_mods(),
        Commands::Conflicts { mod_path } => show_conflicts(mod_path),
        Commands::Verify => verify_mods(),
        Commands::Install => install_mods(),
        Commands::Restore => restore_originals(),
        Commands::Launch {
            no_restore,
            allow_conflicts,
        } => launch_game(LaunchArgs {
            no_restore,
            allow_conflicts,
        }),
        Commands::Status => show_status(),
        Commands::Config { action } => match action {
            ConfigCommands::Show => show_config(),
            ConfigCommands::Set { key, value } => set_config(key, value),
            ConfigCommands::Detect => detect_game_path(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_launch_flags() {
        let args = Args::try_parse_from(["stella-mod", "launch", "--no-restore"]).unwrap();
        assert!(matches!(
            args.command,
            Commands::Launch {
                no_restore: true,
                allow_conflicts: false
            }
        ));
    }

    #[test]
    fn test_parse_config_set_allows_empty_value() {
        let args = Args::try_parse_from(["stella-mod", "config", "set", "mods_dir", ""]).unwrap();
        assert!(matches!(
            args.command,
            Commands::Config {
                action: ConfigCommands::Set { ref key, ref value }
            } if key == "mods_dir" && value.is_empty()
        ));
    }
}
