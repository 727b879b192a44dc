pub mod document;
pub mod source;

pub use document::{CitedParagraph, DocumentSection, EndeavorDocument};
pub use source::{ExhibitLabel, ValidatedSource, MAX_EXHIBITS};
