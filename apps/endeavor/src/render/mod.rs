// PDF output: output paths, printpdf rendering, atomic file replacement.

pub mod output_path;
pub mod pdf;

use std::io::Write;
use std::path::Path;

use crate::errors::AppError;

pub use output_path::{applicant_folder, output_path};
pub use pdf::render_pdf;

/// Writes `bytes` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
///
/// The temporary file lives in the destination directory so the final rename
/// stays on one filesystem.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}
