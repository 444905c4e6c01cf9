//! Atomic file replacement.
//!
//! Writes go to a temp file in the destination directory, are synced, then
//! renamed over the target. Readers see either the old or the new contents,
//! never a truncated file.

use log::debug;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `bytes` via temp file + rename.
///
/// # Errors
/// - Returns the I/O error from temp creation, write, sync or rename.
///   The destination is left untouched on failure.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|err| err.error)?;
    best_effort_sync_parent_dir(parent);
    Ok(())
}

fn best_effort_sync_parent_dir(parent: &Path) {
    #[cfg(unix)]
    {
        if let Err(err) = std::fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            debug!(
                "event=dir_sync module=repo status=skipped path={} error={}",
                parent.display(),
                err
            );
        }
    }
    #[cfg(not(unix))]
    {
        let _ = parent;
    }
}
