//! Detecting and waiting on the game process.

use crate::error::{CoreError, Result};
use camino::Utf8Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use sysinfo::{ProcessRefreshKind, RefreshKind, System};

/// How long [`GameProbe::wait_for_exit`] looks for the process to appear,
/// and how often it polls while the game runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub discovery_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            discovery_attempts: 30,
            poll_interval: Duration::from_secs(1),
        }
    }
}

pub trait GameProbe: Send + Sync {
    fn is_running(&self) -> bool;

    fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::default()
    }

    /// Wait for the game to start and then to close.
    ///
    /// Returns `false` if the process never showed up within the discovery
    /// window, `true` once it has appeared and exited. Playing time is not
    /// bounded.
    fn wait_for_exit(&self) -> bool {
        let policy = self.wait_policy();

        let mut seen = false;
        for _ in 0..policy.discovery_attempts {
            if self.is_running() {
                seen = true;
                break;
            }
            thread::sleep(policy.poll_interval);
        }

        if !seen {
            return false;
        }

        while self.is_running() {
            thread::sleep(policy.poll_interval);
        }
        true
    }
}

/// Finds the game by executable filename among running processes.
#[derive(Debug, Clone)]
pub struct SysinfoProbe {
    exe_name: String,
    policy: WaitPolicy,
}

impl SysinfoProbe {
    pub fn new(exe_name: impl Into<String>) -> Self {
        Self {
            exe_name: exe_name.into(),
            policy: WaitPolicy::default(),
        }
    }

    /// Probe for the process started from `exe_path`.
    pub fn for_exe(exe_path: &Utf8Path) -> Self {
        Self::new(exe_path.file_name().unwrap_or(exe_path.as_str()))
    }

    pub fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn exe_name(&self) -> &str {
        &self.exe_name
    }
}

impl GameProbe for SysinfoProbe {
    fn is_running(&self) -> bool {
        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new()),
        );
        let found = system.processes().values().any(|process| {
            process
                .name()
                .to_string_lossy()
                .eq_ignore_ascii_case(&self.exe_name)
        });
        tracing::trace!("Process {} running: {}", self.exe_name, found);
        found
    }

    fn wait_policy(&self) -> WaitPolicy {
        self.policy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The game was seen running and has since closed.
    Exited,
    /// The game never appeared within the discovery window.
    NotDetected,
}

/// A background wait on a [`GameProbe`].
pub struct GameMonitor {
    pub events: Receiver<GameEvent>,
    handle: JoinHandle<()>,
}

impl GameMonitor {
    pub fn spawn(probe: Arc<dyn GameProbe>) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let event = if probe.wait_for_exit() {
                GameEvent::Exited
            } else {
                GameEvent::NotDetected
            };
            let _ = tx.send(event);
        });
        Self { events: rx, handle }
    }

    /// Block until the wait finishes.
    pub fn wait(self) -> GameEvent {
        let event = self.events.recv().unwrap_or(GameEvent::NotDetected);
        let _ = self.handle.join();
        event
    }
}

/// Start the game detached, with its own folder as the working directory.
pub fn launch_game(exe_path: &Utf8Path) -> Result<Child> {
    let mut cmd = Command::new(exe_path.as_std_path());
    if let Some(dir) = exe_path.parent() {
        cmd.current_dir(dir.as_std_path());
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    tracing::info!("Launching {}", exe_path);
    cmd.spawn().map_err(|source| CoreError::Spawn {
        path: exe_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed sequence of `is_running` answers, then `false`.
    struct ScriptedProbe {
        answers: Mutex<Vec<bool>>,
        calls: AtomicUsize,
        attempts: u32,
    }

    impl ScriptedProbe {
        fn new(answers: &[bool], attempts: u32) -> Self {
            let mut answers = answers.to_vec();
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                calls: AtomicUsize::new(0),
                attempts,
            }
        }
    }

    impl GameProbe for ScriptedProbe {
        fn is_running(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers.lock().unwrap().pop().unwrap_or(false)
        }

        fn wait_policy(&self) -> WaitPolicy {
            WaitPolicy {
                discovery_attempts: self.attempts,
                poll_interval: Duration::ZERO,
            }
        }
    }

    #[test]
    fn test_wait_for_exit_after_play() {
        let probe = ScriptedProbe::new(&[false, false, true, true, true, false], 5);
        assert!(probe.wait_for_exit());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_wait_for_exit_never_started() {
        let probe = ScriptedProbe::new(&[], 3);
        assert!(!probe.wait_for_exit());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_monitor_reports_events() {
        let monitor = GameMonitor::spawn(Arc::new(ScriptedProbe::new(&[true, false], 2)));
        assert_eq!(monitor.wait(), GameEvent::Exited);

        let monitor = GameMonitor::spawn(Arc::new(ScriptedProbe::new(&[], 2)));
        assert_eq!(monitor.wait(), GameEvent::NotDetected);
    }

    #[test]
    fn test_sysinfo_probe_for_exe() {
        let probe = SysinfoProbe::for_exe(Utf8Path::new("C:/Games/StellaSora/StellaSora.exe"));
        assert_eq!(probe.exe_name(), "StellaSora.exe");
        assert!(!probe.is_running());
    }
}
