//! Deterministic output locations derived from the applicant's name.
//!
//! `<output_dir>/<Safe_Name>/proposed_endeavor_<Safe_Name>.pdf`, with exhibits
//! captured beside the document in `<output_dir>/<Safe_Name>/Exhibit_1B/` etc.

use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Characters that are not allowed in a file name on at least one platform.
const FORBIDDEN: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strips forbidden characters and joins whitespace runs with `_`.
///
/// `"Dr. Amara  Okafor"` → `"Dr._Amara_Okafor"`.
pub fn safe_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Folder holding the document and its exhibits.
pub fn applicant_folder(output_dir: &Path, applicant_name: &str) -> Result<PathBuf, AppError> {
    let safe = safe_name(applicant_name);
    if safe.chars().all(|c| c == '.') {
        return Err(AppError::Validation(format!(
            "applicant name '{applicant_name}' leaves nothing usable for a file name"
        )));
    }
    Ok(output_dir.join(safe))
}

/// Full path of the generated PDF.
pub fn output_path(output_dir: &Path, applicant_name: &str) -> Result<PathBuf, AppError> {
    let folder = applicant_folder(output_dir, applicant_name)?;
    let safe = safe_name(applicant_name);
    Ok(folder.join(format!("proposed_endeavor_{safe}.pdf")))
}
