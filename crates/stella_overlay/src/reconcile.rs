//! Bringing the store, vault and game tree back in line with the mods folder.
//!
//! Users add, replace and delete mod files behind the launcher's back. A
//! deleted mod that was enabled would leave its content in the game forever,
//! so reconciliation restores that mod's backups before its record is
//! forgotten.

use crate::engine::OverlayEngine;
use crate::error::Result;
use crate::status::ModRecord;
use camino::Utf8PathBuf;

/// What one reconciliation pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Enabled records whose mod file disappeared.
    pub orphaned: Vec<ModRecord>,
    /// Game files restored from those records' backups.
    pub restored: Vec<Utf8PathBuf>,
    /// Empty vault folders removed.
    pub swept: usize,
}

/// Sync the store against disk, restore orphaned mods' game files, sweep the
/// vault and save. Cheap enough to run on every refresh.
pub fn reconcile(engine: &mut OverlayEngine) -> Result<ReconcileReport> {
    let files = engine.scan_mod_files()?;
    let orphaned = engine.store_mut().sync(&files);

    let restored = if orphaned.is_empty() {
        Vec::new()
    } else {
        engine.restore_orphans(&orphaned)
    };
    for record in &orphaned {
        engine.log(format!("Removed orphaned mod: {}", record.path));
    }

    let swept = engine.vault().sweep_empty_folders();
    engine.store_mut().save_if_dirty()?;

    tracing::debug!(
        "Reconciled {} mod file(s): {} orphaned, {} restored, {} folder(s) swept",
        files.len(),
        orphaned.len(),
        restored.len(),
        swept
    );

    Ok(ReconcileReport {
        orphaned,
        restored,
        swept,
    })
}
