//! Path normalization and file copy helpers shared by the store, vault and engine.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use filetime::FileTime;

/// Compute the POSIX-style path of `path` relative to `root`.
///
/// Mod records and backup mirrors are keyed by this string, so separators are
/// always normalized to `/` regardless of platform.
pub fn relative_posix(root: &Utf8Path, path: &Utf8Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| Error::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    })?;

    let joined = rel
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/");

    Ok(joined.replace('\\', "/"))
}

/// Resolve a POSIX-style relative key back to a path under `root`.
pub fn join_posix(root: &Utf8Path, rel: &str) -> Utf8PathBuf {
    rel.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Final segment of a POSIX-style relative key.
pub fn posix_file_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Copy `src` over `dst`, keeping the source's modification time.
///
/// Creates `dst`'s parent directories first. The copy is byte-for-byte; the
/// timestamp is best-effort and a failure to set it is only logged.
pub fn copy_preserving(src: &Utf8Path, dst: &Utf8Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent.as_std_path())?;
    }

    std::fs::copy(src.as_std_path(), dst.as_std_path())?;

    if let Ok(metadata) = std::fs::metadata(src.as_std_path()) {
        let mtime = FileTime::from_last_modification_time(&metadata);
        if let Err(e) = filetime::set_file_mtime(dst.as_std_path(), mtime) {
            tracing::debug!("Could not preserve mtime on {}: {}", dst, e);
        }
    }

    Ok(())
}
