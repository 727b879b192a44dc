mod capture;
mod config;
mod console;
mod drafting;
mod errors;
mod intake;
mod layout;
mod llm_client;
mod models;
mod pipeline;
mod render;
mod research;

use std::io::{IsTerminal, Write};

use anyhow::Result;
use tracing::{info, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::capture::{CaptureOutcome, ChromeCapture};
use crate::config::Config;
use crate::intake::MenuStyle;
use crate::layout::FontSource;
use crate::llm_client::LlmClient;
use crate::pipeline::{cited_sources, RunSettings};
use crate::research::LinkChecker;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or invalid env vars)
    let config = Config::from_env()?;

    // Structured logging to stderr; stdout belongs to the interactive prompts
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Endeavor v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let link_checker = LinkChecker::new(config.link_check_timeout)?;

    let capture = match (&config.chrome_path, config.capture_exhibits) {
        (Some(chrome), true) => {
            info!("Exhibit capture enabled with {}", chrome.display());
            Some(ChromeCapture::new(chrome.clone(), config.capture_timeout))
        }
        (None, true) => {
            info!("No Chromium binary found; exhibit capture disabled");
            None
        }
        (_, false) => None,
    };

    let settings = RunSettings {
        output_dir: config.output_dir.clone(),
        fonts: FontSource::from_settings(config.font_dir.as_deref(), config.builtin_fonts),
        menu: if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
            MenuStyle::Interactive
        } else {
            MenuStyle::Numbered
        },
        prepared_on: chrono::Local::now().date_naive(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    writeln!(output, "--- Proposed Endeavor Generator ---\n")?;

    let run_span = tracing::info_span!("run", run_id = %Uuid::new_v4());
    let summary = pipeline::run(
        &llm,
        &link_checker,
        capture.as_ref(),
        &settings,
        &mut input,
        &mut output,
    )
    .instrument(run_span)
    .await?;

    writeln!(output, "\nSuccess! Your document has been saved as:")?;
    writeln!(output, "  {}", summary.pdf_path.display())?;
    writeln!(
        output,
        "  {} pages, {} of {} exhibits cited",
        summary.page_count,
        cited_sources(&summary).len(),
        summary.document.sources.len()
    )?;
    for outcome in &summary.captures {
        match outcome {
            CaptureOutcome::Captured(path) => {
                writeln!(output, "  Exhibit saved: {}", path.display())?
            }
            CaptureOutcome::Failed { url, reason } => {
                writeln!(output, "  Could not capture {url}: {reason}")?
            }
        }
    }

    Ok(())
}
