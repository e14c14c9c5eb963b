use colored::Colorize;
use stella_overlay::BatchReport;

pub mod logging;
pub mod session;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Normalize a mod path typed on the command line to the stored POSIX form.
pub fn normalize_mod_arg(arg: &str) -> String {
    arg.trim()
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}

/// Print the outcome of a batch operation and return how many items failed.
pub fn print_batch_report(action: &str, report: &BatchReport) -> usize {
    println!();
    println_pad!(
        "{} {} {}",
        "✓".bright_green(),
        report.succeeded.len().to_string().bright_white().bold(),
        action
    );
    for (path, error) in &report.failed {
        println_pad!("{} {}: {}", "✗".bright_red(), path.bright_white(), error);
    }
    report.failed.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mod_arg() {
        assert_eq!(normalize_mod_arg("A\\char.unity3d"), "A/char.unity3d");
        assert_eq!(normalize_mod_arg("./A/char.unity3d"), "A/char.unity3d");
        assert_eq!(normalize_mod_arg(" char.unity3d "), "char.unity3d");
    }
}
