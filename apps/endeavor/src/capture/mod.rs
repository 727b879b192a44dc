//! Exhibit capture: prints each validated source URL to a PDF with a headless
//! Chromium, next to the generated document.
//!
//! Capture is best effort. A browser that fails to start, exits non-zero,
//! times out, or produces no file is logged and skipped. Exhibit folders from
//! an earlier run are cleared first, and the browser prints into a temporary
//! file that only replaces the exhibit after a clean exit.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::models::ValidatedSource;

/// File name of each captured exhibit inside its `Exhibit_1X` folder.
pub const EXHIBIT_FILE_NAME: &str = "source_material.pdf";

/// Prefix shared by every exhibit folder name.
const EXHIBIT_FOLDER_PREFIX: &str = "Exhibit_";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to start {browser}: {source}")]
    Spawn {
        browser: PathBuf,
        source: std::io::Error,
    },

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("exit code {code}: {stderr}")]
    Exit { code: i32, stderr: String },

    #[error("browser exited cleanly but wrote no file")]
    NoOutput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of capturing one exhibit.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Captured(PathBuf),
    Failed { url: String, reason: String },
}

pub struct ChromeCapture {
    chrome: PathBuf,
    timeout: Duration,
}

impl ChromeCapture {
    pub fn new(chrome: PathBuf, timeout: Duration) -> Self {
        Self { chrome, timeout }
    }

    /// Renders `url` to `dest`, creating the parent directory.
    ///
    /// `dest` is replaced only when the browser exits cleanly with a non-empty file.
    pub async fn capture(&self, url: &str, dest: &Path) -> Result<(), CaptureError> {
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(dir).await?;

        let tmp = tempfile::Builder::new()
            .prefix(".capture-")
            .suffix(".pdf")
            .tempfile_in(dir)?
            .into_temp_path();

        let mut cmd = Command::new(&self.chrome);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg(format!("--print-to-pdf={}", tmp.display()))
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| CaptureError::Spawn {
            browser: self.chrome.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CaptureError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            return Err(CaptureError::Exit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let written = tokio::fs::metadata(&tmp).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(CaptureError::NoOutput);
        }
        tmp.persist(dest).map_err(|e| CaptureError::Io(e.error))?;
        Ok(())
    }
}

/// Removes the `Exhibit_*` folders under `folder` left by an earlier run.
///
/// Other entries, such as the document itself, are kept.
pub async fn clear_exhibit_folders(folder: &Path) -> std::io::Result<()> {
    let mut entries = match tokio::fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    while let Some(entry) = entries.next_entry().await? {
        let is_exhibit = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(EXHIBIT_FOLDER_PREFIX));
        if is_exhibit && entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(entry.path()).await?;
        }
    }
    Ok(())
}

/// Captures every source into `<folder>/<Exhibit_1X>/source_material.pdf`.
///
/// Sequential, one browser process at a time.
pub async fn capture_exhibits(
    capture: &ChromeCapture,
    folder: &Path,
    sources: &[ValidatedSource],
) -> Vec<CaptureOutcome> {
    if let Err(e) = clear_exhibit_folders(folder).await {
        warn!("Could not clear old exhibits in {}: {}", folder.display(), e);
    }

    let mut outcomes = Vec::with_capacity(sources.len());
    for source in sources {
        let dest = folder
            .join(source.exhibit.folder_name())
            .join(EXHIBIT_FILE_NAME);
        match capture.capture(&source.url, &dest).await {
            Ok(()) => {
                info!("Captured {} -> {}", source.exhibit, dest.display());
                outcomes.push(CaptureOutcome::Captured(dest));
            }
            Err(e) => {
                warn!("Could not capture {} ({}): {}", source.exhibit, source.url, e);
                outcomes.push(CaptureOutcome::Failed {
                    url: source.url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    outcomes
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    use crate::models::ExhibitLabel;

    /// Writes an executable shell script standing in for the browser.
    fn fake_browser(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-chrome");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    const PRINTS_PDF: &str = r#"for arg in "$@"; do
  case "$arg" in
    --print-to-pdf=*) printf '%%PDF-1.4 fake' > "${arg#--print-to-pdf=}" ;;
  esac
done"#;

    fn sources(n: usize) -> Vec<ValidatedSource> {
        (0..n)
            .map(|i| ValidatedSource {
                url: format!("https://example.gov/{i}"),
                exhibit: ExhibitLabel::from_index(i).unwrap(),
            })
            .collect()
    }

    fn capture_with(bin: &Path, body: &str, timeout: Duration) -> ChromeCapture {
        ChromeCapture::new(fake_browser(bin, body), timeout)
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_captures_into_exhibit_folders() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let capture = capture_with(bin.path(), PRINTS_PDF, Duration::from_secs(10));

        let outcomes = capture_exhibits(&capture, out.path(), &sources(2)).await;

        let expected_b = out.path().join("Exhibit_1B").join(EXHIBIT_FILE_NAME);
        let expected_c = out.path().join("Exhibit_1C").join(EXHIBIT_FILE_NAME);
        assert_eq!(
            outcomes,
            vec![
                CaptureOutcome::Captured(expected_b.clone()),
                CaptureOutcome::Captured(expected_c)
            ]
        );
        assert!(std::fs::read(expected_b).unwrap().starts_with(b"%PDF"));
        // No temporary files are left beside the exhibit.
        assert_eq!(file_names(&out.path().join("Exhibit_1B")), vec![EXHIBIT_FILE_NAME]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported_not_fatal() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let capture = capture_with(
            bin.path(),
            "echo 'net::ERR_NAME_NOT_RESOLVED' >&2\nexit 3",
            Duration::from_secs(10),
        );

        let outcomes = capture_exhibits(&capture, out.path(), &sources(2)).await;
        assert_eq!(outcomes.len(), 2);
        match &outcomes[0] {
            CaptureOutcome::Failed { url, reason } => {
                assert_eq!(url, "https://example.gov/0");
                assert!(reason.contains("exit code 3"));
                assert!(reason.contains("ERR_NAME_NOT_RESOLVED"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(file_names(&out.path().join("Exhibit_1B")).is_empty());
    }

    #[tokio::test]
    async fn test_previous_run_file_is_not_reported_as_captured() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let dest_dir = out.path().join("Exhibit_1B");
        std::fs::create_dir_all(&dest_dir).unwrap();
        std::fs::write(dest_dir.join(EXHIBIT_FILE_NAME), b"%PDF old run, url A").unwrap();
        let capture = capture_with(bin.path(), "exit 0", Duration::from_secs(10));

        let outcomes = capture_exhibits(&capture, out.path(), &sources(1)).await;

        assert_eq!(
            outcomes,
            vec![CaptureOutcome::Failed {
                url: "https://example.gov/0".to_string(),
                reason: "browser exited cleanly but wrote no file".to_string(),
            }]
        );
        assert!(!dest_dir.join(EXHIBIT_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_failed_capture_keeps_existing_file_in_place() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("x.pdf");
        std::fs::write(&dest, b"%PDF earlier").unwrap();
        let capture = capture_with(bin.path(), "exit 0", Duration::from_secs(10));

        let err = capture.capture("https://example.gov/", &dest).await.unwrap_err();
        assert!(matches!(err, CaptureError::NoOutput));
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF earlier");
        assert_eq!(file_names(out.path()), vec!["x.pdf"]);
    }

    #[tokio::test]
    async fn test_stale_exhibit_folders_are_removed() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for stale in ["Exhibit_1B", "Exhibit_1F"] {
            let dir = out.path().join(stale);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(EXHIBIT_FILE_NAME), b"%PDF stale").unwrap();
        }
        std::fs::write(out.path().join("proposed_endeavor_Amara_Okafor.pdf"), b"%PDF doc").unwrap();
        let capture = capture_with(bin.path(), PRINTS_PDF, Duration::from_secs(10));

        capture_exhibits(&capture, out.path(), &sources(1)).await;

        assert_eq!(
            file_names(out.path()),
            vec!["Exhibit_1B", "proposed_endeavor_Amara_Okafor.pdf"]
        );
        let fresh = std::fs::read(out.path().join("Exhibit_1B").join(EXHIBIT_FILE_NAME)).unwrap();
        assert_eq!(fresh, b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_clearing_a_missing_folder_is_ok() {
        let out = tempfile::tempdir().unwrap();
        clear_exhibit_folders(&out.path().join("never-created")).await.unwrap();
    }

    #[tokio::test]
    async fn test_slow_browser_times_out() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let capture = capture_with(bin.path(), "sleep 5", Duration::from_millis(200));

        let err = capture
            .capture("https://example.gov/", &out.path().join("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_start() {
        let out = tempfile::tempdir().unwrap();
        let capture =
            ChromeCapture::new(PathBuf::from("/nonexistent/chromium"), Duration::from_secs(1));
        let err = capture
            .capture("https://example.gov/", &out.path().join("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Spawn { .. }));
        assert!(err.to_string().contains("failed to start"));
    }
}
