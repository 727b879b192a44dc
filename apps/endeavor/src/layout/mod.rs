// Document layout: typefaces, font metrics, greedy word wrap, pagination.
// CPU-bound layout must run inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod paginate;
pub mod typeface;
pub mod wrap;

// Re-export the public API consumed by the renderer and the pipeline.
pub use font_metrics::{a4_page_config, FontStyle, PageConfig};
pub use paginate::{layout_document, Align, DocumentLayout};
pub use typeface::{FontSource, Typefaces};
