//! Reachability checks for candidate sources.
//!
//! One HEAD request per URL, redirects followed, short timeout. A URL is citable
//! iff the final status is below 400. No retry, no backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{ExhibitLabel, ValidatedSource, MAX_EXHIBITS};

const MAX_REDIRECTS: usize = 10;

/// Browser-like User-Agent; several .gov hosts reject unknown clients outright.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    Reachable { status: u16 },
    Unreachable { reason: String },
}

/// Decides whether a URL is citable.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Reachability;
}

/// HTTP implementation of `ReachabilityProbe`.
#[derive(Clone)]
pub struct LinkChecker {
    client: Client,
}

impl LinkChecker {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProbe for LinkChecker {
    async fn probe(&self, url: &str) -> Reachability {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.as_u16() < 400 {
                    Reachability::Reachable {
                        status: status.as_u16(),
                    }
                } else {
                    Reachability::Unreachable {
                        reason: format!("status {}", status.as_u16()),
                    }
                }
            }
            Err(e) if e.is_timeout() => Reachability::Unreachable {
                reason: "timed out".to_string(),
            },
            Err(e) => Reachability::Unreachable {
                reason: e.to_string(),
            },
        }
    }
}

/// Probes every URL in order and keeps the reachable ones, labelled
/// `Exhibit 1B`, `Exhibit 1C`, ... in the order they survive.
///
/// The result is always an ordered subset of `urls`. Probing stops once every
/// exhibit label is taken.
pub async fn validate_sources(
    probe: &dyn ReachabilityProbe,
    urls: &[String],
) -> Vec<ValidatedSource> {
    let mut validated = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        let Some(exhibit) = ExhibitLabel::from_index(validated.len()) else {
            warn!(
                "Exhibit limit of {MAX_EXHIBITS} reached, {} candidates not checked",
                urls.len() - i
            );
            break;
        };
        match probe.probe(url).await {
            Reachability::Reachable { status } => {
                info!("{exhibit}: {url} [VALID, status {status}]");
                validated.push(ValidatedSource {
                    url: url.clone(),
                    exhibit,
                });
            }
            Reachability::Unreachable { reason } => {
                warn!("{url} [BROKEN/INVALID: {reason}] - skipping");
            }
        }
    }

    validated
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{http::StatusCode, response::Redirect, routing::get, Router};

    use super::*;

    /// Probe answering from a fixed table; unknown URLs are unreachable.
    struct TableProbe(HashMap<String, bool>);

    #[async_trait]
    impl ReachabilityProbe for TableProbe {
        async fn probe(&self, url: &str) -> Reachability {
            if self.0.get(url).copied().unwrap_or(false) {
                Reachability::Reachable { status: 200 }
            } else {
                Reachability::Unreachable {
                    reason: "table".to_string(),
                }
            }
        }
    }

    /// Counts probes; every URL is reachable.
    #[derive(Default)]
    struct CountingProbe(AtomicUsize);

    #[async_trait]
    impl ReachabilityProbe for CountingProbe {
        async fn probe(&self, _url: &str) -> Reachability {
            self.0.fetch_add(1, Ordering::SeqCst);
            Reachability::Reachable { status: 200 }
        }
    }

    fn is_reachable(verdict: &Reachability) -> bool {
        matches!(verdict, Reachability::Reachable { .. })
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/moved", get(|| async { Redirect::permanent("/ok") }))
            .route("/moved-to-missing", get(|| async { Redirect::temporary("/missing") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_link_checker_classifies_statuses() {
        let base = spawn_server().await;
        let checker = LinkChecker::new(Duration::from_secs(2)).unwrap();

        assert_eq!(
            checker.probe(&format!("{base}/ok")).await,
            Reachability::Reachable { status: 200 }
        );
        assert!(!is_reachable(&checker.probe(&format!("{base}/missing")).await));
        assert!(!is_reachable(&checker.probe(&format!("{base}/broken")).await));
    }

    #[tokio::test]
    async fn test_link_checker_follows_redirects() {
        let base = spawn_server().await;
        let checker = LinkChecker::new(Duration::from_secs(2)).unwrap();

        assert_eq!(
            checker.probe(&format!("{base}/moved")).await,
            Reachability::Reachable { status: 200 }
        );
        let verdict = checker.probe(&format!("{base}/moved-to-missing")).await;
        assert!(!is_reachable(&verdict));
    }

    #[tokio::test]
    async fn test_link_checker_times_out() {
        let base = spawn_server().await;
        let checker = LinkChecker::new(Duration::from_millis(300)).unwrap();
        assert_eq!(
            checker.probe(&format!("{base}/slow")).await,
            Reachability::Unreachable {
                reason: "timed out".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_link_checker_connection_refused_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let checker = LinkChecker::new(Duration::from_secs(2)).unwrap();
        assert!(!is_reachable(&checker.probe(&format!("http://{addr}/")).await));
    }

    #[tokio::test]
    async fn test_validate_sources_is_ordered_subset_with_consecutive_labels() {
        let urls: Vec<String> = [
            "https://a.gov",
            "https://dead.gov",
            "https://b.gov",
            "https://c.gov",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let probe = TableProbe(HashMap::from([
            ("https://a.gov".to_string(), true),
            ("https://dead.gov".to_string(), false),
            ("https://b.gov".to_string(), true),
            ("https://c.gov".to_string(), true),
        ]));

        let validated = validate_sources(&probe, &urls).await;

        let kept: Vec<&str> = validated.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(kept, vec!["https://a.gov", "https://b.gov", "https://c.gov"]);
        let labels: Vec<String> = validated.iter().map(|v| v.exhibit.to_string()).collect();
        assert_eq!(labels, vec!["Exhibit 1B", "Exhibit 1C", "Exhibit 1D"]);
        assert!(validated.iter().all(|v| urls.contains(&v.url)));
    }

    #[tokio::test]
    async fn test_validate_sources_all_unreachable_is_empty() {
        let urls = vec!["https://x.gov".to_string()];
        let probe = TableProbe(HashMap::new());
        assert!(validate_sources(&probe, &urls).await.is_empty());
    }

    #[tokio::test]
    async fn test_validate_sources_caps_at_max_exhibits() {
        let urls: Vec<String> = (0..30).map(|i| format!("https://site{i}.gov")).collect();
        let probe = TableProbe(urls.iter().map(|u| (u.clone(), true)).collect());
        let validated = validate_sources(&probe, &urls).await;
        assert_eq!(validated.len(), MAX_EXHIBITS);
        assert_eq!(validated.last().unwrap().exhibit.letter(), 'Z');
    }

    #[tokio::test]
    async fn test_validate_sources_stops_probing_at_the_cap() {
        let urls: Vec<String> = (0..40).map(|i| format!("https://site{i}.gov")).collect();
        let probe = CountingProbe::default();
        let validated = validate_sources(&probe, &urls).await;
        assert_eq!(validated.len(), MAX_EXHIBITS);
        assert_eq!(probe.0.load(Ordering::SeqCst), MAX_EXHIBITS);
    }
}
