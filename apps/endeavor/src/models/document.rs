use serde::{Deserialize, Serialize};

use crate::models::source::{ExhibitLabel, ValidatedSource};

/// A paragraph of drafted prose and the exhibits it cites, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedParagraph {
    pub text: String,
    pub citations: Vec<ExhibitLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub heading: String,
    pub paragraphs: Vec<CitedParagraph>,
}

/// Everything the PDF writer needs. Built by the drafting stage, consumed by `render`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndeavorDocument {
    pub applicant_name: String,
    pub topic: String,
    pub sections: Vec<DocumentSection>,
    /// Validated sources, in exhibit order. Only these may be cited.
    pub sources: Vec<ValidatedSource>,
}

impl EndeavorDocument {
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// Exhibits cited anywhere in the body, deduplicated, in exhibit order.
    pub fn cited_exhibits(&self) -> Vec<ExhibitLabel> {
        let mut cited: Vec<ExhibitLabel> = self
            .sections
            .iter()
            .flat_map(|s| s.paragraphs.iter())
            .flat_map(|p| p.citations.iter().copied())
            .collect();
        cited.sort();
        cited.dedup();
        cited
    }
}
