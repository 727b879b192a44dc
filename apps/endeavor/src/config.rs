use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_LINK_CHECK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 60;

/// Browser binaries probed on `PATH` when `CHROME_PATH` is not set.
const CHROME_CANDIDATES: [&str; 3] = ["chromium", "chromium-browser", "google-chrome"];

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub output_dir: PathBuf,
    /// Directory holding `regular.ttf`, `bold.ttf` and `italic.ttf`.
    /// `None` selects the bundled DejaVu Serif family.
    pub font_dir: Option<PathBuf>,
    /// Draw with the PDF core Times fonts instead of embedding a family.
    pub builtin_fonts: bool,
    pub link_check_timeout: Duration,
    pub capture_exhibits: bool,
    /// Resolved browser binary used for exhibit capture, if any.
    pub chrome_path: Option<PathBuf>,
    pub capture_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chrome_path = match std::env::var("CHROME_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => find_on_path(&CHROME_CANDIDATES),
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            output_dir: std::env::var("ENDEAVOR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            font_dir: std::env::var("ENDEAVOR_FONT_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            builtin_fonts: parse_bool(
                "ENDEAVOR_BUILTIN_FONTS",
                std::env::var("ENDEAVOR_BUILTIN_FONTS").ok(),
                false,
            )?,
            link_check_timeout: Duration::from_secs(parse_secs(
                "LINK_CHECK_TIMEOUT_SECS",
                std::env::var("LINK_CHECK_TIMEOUT_SECS").ok(),
                DEFAULT_LINK_CHECK_TIMEOUT_SECS,
            )?),
            capture_exhibits: parse_bool(
                "CAPTURE_EXHIBITS",
                std::env::var("CAPTURE_EXHIBITS").ok(),
                true,
            )?,
            chrome_path,
            capture_timeout: Duration::from_secs(parse_secs(
                "CAPTURE_TIMEOUT_SECS",
                std::env::var("CAPTURE_TIMEOUT_SECS").ok(),
                DEFAULT_CAPTURE_TIMEOUT_SECS,
            )?),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(v) => {
            let secs = v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of seconds, got '{v}'"))?;
            if secs == 0 {
                bail!("{key} must be greater than zero");
            }
            Ok(secs)
        }
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} must be a boolean (true/false), got '{v}'"),
        },
    }
}

fn find_on_path(candidates: &[&str]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| candidates.iter().map(move |name| dir.join(name)))
        .find(|p| p.is_file())
}
