//! A full play session: prepare mods, run the game, clean up afterwards.
//!
//! The session runs on its own thread and reports through a channel, so a
//! caller can print progress while the game is being played.

use crate::error::{LibError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use stella_mod_core::{launch_game, GameEvent, GameMonitor, GameProbe};
use stella_overlay::{enabled_conflict_groups, OverlayEngine};

/// Progress reported by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    /// A human-readable progress line.
    Log(String),
    GameStarted,
    GameExited,
    /// The game process never appeared after launch.
    GameNotDetected,
    /// Original files put back after the game closed.
    Restored(usize),
    /// The session aborted; the message is the error.
    Failed(String),
    /// Always the last event.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub restore_on_close: bool,
    /// Launch even if enabled mods target the same file.
    pub allow_conflicts: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            restore_on_close: true,
            allow_conflicts: false,
        }
    }
}

type Starter = Box<dyn Fn(&Utf8Path) -> Result<()> + Send>;

pub struct Launcher {
    engine: OverlayEngine,
    game_exe: Utf8PathBuf,
    probe: Arc<dyn GameProbe>,
    starter: Starter,
    options: LaunchOptions,
}

pub struct LaunchHandle {
    pub rx: Receiver<LaunchEvent>,
    join: JoinHandle<Result<()>>,
}

impl LaunchHandle {
    /// Wait for the session thread and return its outcome.
    pub fn join(self) -> Result<()> {
        self.join.join().map_err(|_| LibError::WorkerPanicked)?
    }
}

impl Launcher {
    pub fn new(engine: OverlayEngine, game_exe: Utf8PathBuf, probe: Arc<dyn GameProbe>) -> Self {
        Self {
            engine,
            game_exe,
            probe,
            starter: Box::new(|exe: &Utf8Path| {
                launch_game(exe)?;
                Ok(())
            }),
            options: LaunchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace how the game process is started.
    pub fn with_starter<F>(mut self, starter: F) -> Self
    where
        F: Fn(&Utf8Path) -> Result<()> + Send + 'static,
    {
        self.starter = Box::new(starter);
        self
    }

    /// Run the session on a worker thread.
    pub fn spawn(self) -> LaunchHandle {
        let (tx, rx) = mpsc::channel();
        let join = thread::spawn(move || {
            let outcome = self.run(tx.clone());
            if let Err(e) = &outcome {
                tracing::error!("Launch session failed: {}", e);
                let _ = tx.send(LaunchEvent::Failed(e.to_string()));
            }
            let _ = tx.send(LaunchEvent::Finished);
            outcome
        });
        LaunchHandle { rx, join }
    }

    fn run(self, tx: Sender<LaunchEvent>) -> Result<()> {
        let Launcher {
            engine,
            game_exe,
            probe,
            starter,
            options,
        } = self;

        let log_tx = tx.clone();
        let mut engine = engine.with_logger(move |line| {
            let _ = log_tx.send(LaunchEvent::Log(line.to_string()));
        });
        let emit = |event: LaunchEvent| {
            let _ = tx.send(event);
        };
        let log = |line: &str| {
            tracing::info!("{}", line);
            emit(LaunchEvent::Log(line.to_string()));
        };

        if probe.is_running() {
            return Err(LibError::AlreadyRunning);
        }

        let report = engine.reconcile()?;
        if !report.orphaned.is_empty() {
            log(&format!(
                "Restored {} file(s) from {} removed mod(s)",
                report.restored.len(),
                report.orphaned.len()
            ));
        }

        if !options.allow_conflicts {
            let groups = enabled_conflict_groups(engine.store());
            if !groups.is_empty() {
                return Err(LibError::Conflicts(groups));
            }
        }

        let verified = engine.verify_enabled()?;
        if !verified.is_clean() {
            log(&format!(
                "{} mod(s) could not be applied; launching anyway",
                verified.failed.len()
            ));
        }

        log("Starting game...");
        starter(&game_exe)?;
        emit(LaunchEvent::GameStarted);

        match GameMonitor::spawn(probe).wait() {
            GameEvent::Exited => {
                log("Game closed detected.");
                emit(LaunchEvent::GameExited);
            }
            GameEvent::NotDetected => {
                log("Could not detect game process start.");
                emit(LaunchEvent::GameNotDetected);
                // The game may still be starting; leave its files alone
                return Ok(());
            }
        }

        if options.restore_on_close {
            let restored = engine.restore_all()?;
            emit(LaunchEvent::Restored(restored));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use stella_mod_core::WaitPolicy;
    use stella_overlay::OverlayPaths;

    struct ScriptedProbe {
        answers: Mutex<Vec<bool>>,
    }

    impl ScriptedProbe {
        fn new(answers: &[bool]) -> Arc<Self> {
            let mut answers = answers.to_vec();
            answers.reverse();
            Arc::new(Self {
                answers: Mutex::new(answers),
            })
        }
    }

    impl GameProbe for ScriptedProbe {
        fn is_running(&self) -> bool {
            self.answers.lock().unwrap().pop().unwrap_or(false)
        }

        fn wait_policy(&self) -> WaitPolicy {
            WaitPolicy {
                discovery_attempts: 3,
                poll_interval: Duration::ZERO,
            }
        }
    }

    struct Sandbox {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            write(&root.join("game/StellaSora.exe"), b"");
            write(&root.join("game/data/char.unity3d"), b"orig");
            std::fs::create_dir_all(root.join("Mods")).unwrap();
            Self { _dir: dir, root }
        }

        fn engine(&self) -> OverlayEngine {
            OverlayEngine::new(OverlayPaths {
                game_dir: self.root.join("game"),
                mods_dir: self.root.join("Mods"),
                backups_dir: self.root.join("Backups"),
                status_path: self.root.join("ModsStatus.json"),
            })
            .unwrap()
        }

        fn enable(&self, rel: &str, content: &[u8]) {
            write(&self.root.join("Mods").join(rel), content);
            let mut engine = self.engine();
            engine.reconcile().unwrap();
            engine.toggle(rel, true).unwrap();
        }

        fn game_content(&self) -> Vec<u8> {
            std::fs::read(self.root.join("game/data/char.unity3d")).unwrap()
        }

        fn launcher(&self, probe: Arc<ScriptedProbe>, starts: Arc<AtomicUsize>) -> Launcher {
            Launcher::new(self.engine(), self.root.join("game/StellaSora.exe"), probe)
                .with_starter(move |_| {
                    starts.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
        }
    }

    fn write(path: &Utf8Path, content: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn collect(handle: LaunchHandle) -> (Vec<LaunchEvent>, Result<()>) {
        let events: Vec<LaunchEvent> = handle.rx.iter().collect();
        (events, handle.join())
    }

    fn markers(events: &[LaunchEvent]) -> Vec<&LaunchEvent> {
        events
            .iter()
            .filter(|e| !matches!(e, LaunchEvent::Log(_)))
            .collect()
    }

    #[test]
    fn test_session_applies_plays_and_restores() {
        let sb = Sandbox::new();
        sb.enable("A/char.unity3d", b"v1");
        // Restore by hand so the session has to re-apply
        sb.engine().restore_all().unwrap();
        assert_eq!(sb.game_content(), b"orig");

        let starts = Arc::new(AtomicUsize::new(0));
        let probe = ScriptedProbe::new(&[false, true, false]);
        let (events, outcome) = collect(sb.launcher(probe, starts.clone()).spawn());

        outcome.unwrap();
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert_eq!(
            markers(&events),
            vec![
                &LaunchEvent::GameStarted,
                &LaunchEvent::GameExited,
                &LaunchEvent::Restored(1),
                &LaunchEvent::Finished,
            ]
        );
        assert!(events.contains(&LaunchEvent::Log("Re-applying A/char.unity3d...".into())));
        assert_eq!(sb.game_content(), b"orig");
    }

    #[test]
    fn test_session_without_restore_keeps_mods() {
        let sb = Sandbox::new();
        sb.enable("A/char.unity3d", b"v1");

        let starts = Arc::new(AtomicUsize::new(0));
        let probe = ScriptedProbe::new(&[false, true, false]);
        let launcher = sb.launcher(probe, starts).with_options(LaunchOptions {
            restore_on_close: false,
            allow_conflicts: false,
        });
        let (events, outcome) = collect(launcher.spawn());

        outcome.unwrap();
        assert!(!events.iter().any(|e| matches!(e, LaunchEvent::Restored(_))));
        assert_eq!(sb.game_content(), b"v1");
    }

    #[test]
    fn test_refuses_when_game_already_running() {
        let sb = Sandbox::new();
        let starts = Arc::new(AtomicUsize::new(0));
        let probe = ScriptedProbe::new(&[true]);

        let (events, outcome) = collect(sb.launcher(probe, starts.clone()).spawn());

        assert!(matches!(outcome, Err(LibError::AlreadyRunning)));
        assert_eq!(starts.load(Ordering::SeqCst), 0);
        assert_eq!(events.last(), Some(&LaunchEvent::Finished));
        assert!(events.iter().any(|e| matches!(e, LaunchEvent::Failed(_))));
    }

    #[test]
    fn test_conflicts_block_launch_unless_allowed() {
        let sb = Sandbox::new();
        sb.enable("A/char.unity3d", b"a");
        sb.enable("B/char.unity3d", b"b");

        let starts = Arc::new(AtomicUsize::new(0));
        let (_, outcome) = collect(sb.launcher(ScriptedProbe::new(&[false]), starts.clone()).spawn());
        assert!(matches!(outcome, Err(LibError::Conflicts(ref groups)) if groups.len() == 1));
        assert_eq!(starts.load(Ordering::SeqCst), 0);

        let launcher = sb
            .launcher(ScriptedProbe::new(&[false, true, false]), starts.clone())
            .with_options(LaunchOptions {
                restore_on_close: false,
                allow_conflicts: true,
            });
        let (_, outcome) = collect(launcher.spawn());
        outcome.unwrap();
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        // Last applied wins
        assert_eq!(sb.game_content(), b"b");
    }

    #[test]
    fn test_undetected_game_skips_restore() {
        let sb = Sandbox::new();
        sb.enable("A/char.unity3d", b"v1");

        let starts = Arc::new(AtomicUsize::new(0));
        let (events, outcome) = collect(sb.launcher(ScriptedProbe::new(&[]), starts).spawn());

        outcome.unwrap();
        assert!(events.contains(&LaunchEvent::GameNotDetected));
        assert_eq!(sb.game_content(), b"v1");
    }
}
