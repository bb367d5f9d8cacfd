//! File I/O primitives with consistent error handling.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Atomically publish a finished temporary file at its final path.
///
/// The rename is atomic on POSIX filesystems, so readers always see either
/// the old artifact or the complete new one, never a partial write.
pub fn publish_atomic(tmp: &Path, dest: &Path) -> Result<()> {
    fs::rename(tmp, dest)?;
    Ok(())
}

/// Best-effort removal of an abandoned temporary file. Failures are
/// deliberately ignored: the caller is already unwinding from the real error.
pub fn discard_quiet(path: &Path) {
    let _ = fs::remove_file(path);
}
