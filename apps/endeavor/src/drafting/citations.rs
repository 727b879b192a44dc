//! Citation extraction and scrubbing.
//!
//! Drafted prose cites exhibits as `(Exhibit 1B)`, `(Exhibit 1B & 1C)` or bare
//! `Exhibit 1D`. Only exhibits that passed the reachability check may remain in
//! the text; references to anything else are removed.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{CitedParagraph, ExhibitLabel};

/// Either a parenthesized citation group or a bare in-sentence reference.
static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<group>\s*\(\s*exhibits?\s+1\s*[a-z](?:\s*(?:&|and|,|;)\s*(?:exhibits?\s+)?1\s*[a-z])*\s*\))|(?P<bare>\bexhibits?\s+1\s*(?P<letter>[a-z])\b)",
    )
    .expect("CITATION_REGEX is a compile-time constant")
});

/// Exhibit letters inside a citation group.
static GROUP_LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)1\s*([a-z])\b").expect("GROUP_LETTER_REGEX is a compile-time constant")
});

static MULTI_SPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]{2,}").expect("MULTI_SPACE_REGEX is a compile-time constant")
});

static SPACE_BEFORE_PUNCT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([,.;:!?])").expect("SPACE_BEFORE_PUNCT_REGEX is a compile-time constant")
});

/// Removes citations to unknown exhibits and records the known ones.
///
/// Citation groups are rewritten canonically (`(Exhibit 1B & 1C)`); the
/// returned `citations` list is in first-appearance order without duplicates.
pub fn scrub_citations(text: &str, known: &HashSet<ExhibitLabel>) -> CitedParagraph {
    let mut citations: Vec<ExhibitLabel> = Vec::new();
    let mut record = |label: ExhibitLabel| {
        if !citations.contains(&label) {
            citations.push(label);
        }
    };

    let replaced = CITATION_REGEX.replace_all(text, |caps: &Captures| {
        if let Some(group) = caps.name("group") {
            let mut kept: Vec<ExhibitLabel> = Vec::new();
            for letter_caps in GROUP_LETTER_REGEX.captures_iter(group.as_str()) {
                let label = letter_caps[1]
                    .chars()
                    .next()
                    .and_then(ExhibitLabel::from_letter);
                if let Some(label) = label.filter(|l| known.contains(l)) {
                    if !kept.contains(&label) {
                        kept.push(label);
                    }
                }
            }
            if kept.is_empty() {
                return String::new();
            }
            for label in &kept {
                record(*label);
            }
            format!(" ({})", render_group(&kept))
        } else {
            let label = caps
                .name("letter")
                .and_then(|m| m.as_str().chars().next())
                .and_then(ExhibitLabel::from_letter);
            match label.filter(|l| known.contains(l)) {
                Some(label) => {
                    record(label);
                    label.to_string()
                }
                None => String::new(),
            }
        }
    });

    let collapsed = MULTI_SPACE_REGEX.replace_all(&replaced, " ");
    let cleaned = SPACE_BEFORE_PUNCT_REGEX.replace_all(&collapsed, "$1");

    CitedParagraph {
        text: cleaned.trim().to_string(),
        citations,
    }
}

/// `Exhibit 1B`, `Exhibit 1B & 1C`, `Exhibit 1B, 1C & 1D`.
fn render_group(labels: &[ExhibitLabel]) -> String {
    let letters: Vec<String> = labels.iter().map(|l| format!("1{}", l.letter())).collect();
    match letters.split_last() {
        None => String::new(),
        Some((last, [])) => format!("Exhibit {last}"),
        Some((last, rest)) => format!("Exhibit {} & {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(letters: &[char]) -> HashSet<ExhibitLabel> {
        letters
            .iter()
            .map(|c| ExhibitLabel::from_letter(*c).unwrap())
            .collect()
    }

    fn label(c: char) -> ExhibitLabel {
        ExhibitLabel::from_letter(c).unwrap()
    }

    #[test]
    fn test_known_single_citation_is_kept() {
        let p = scrub_citations("Solar demand doubled (Exhibit 1B).", &known(&['B']));
        assert_eq!(p.text, "Solar demand doubled (Exhibit 1B).");
        assert_eq!(p.citations, vec![label('B')]);
    }

    #[test]
    fn test_unknown_citation_is_removed() {
        let p = scrub_citations("Solar demand doubled (Exhibit 1F).", &known(&['B']));
        assert_eq!(p.text, "Solar demand doubled.");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn test_group_keeps_only_known_members() {
        let p = scrub_citations(
            "Storage is a priority (Exhibit 1B & 1Q and Exhibit 1C).",
            &known(&['B', 'C']),
        );
        assert_eq!(p.text, "Storage is a priority (Exhibit 1B & 1C).");
        assert_eq!(p.citations, vec![label('B'), label('C')]);
    }

    #[test]
    fn test_group_normalizes_case_and_spacing() {
        let p = scrub_citations("Claim ( exhibit 1d ,1b ).", &known(&['B', 'D']));
        assert_eq!(p.text, "Claim (Exhibit 1D & 1B).");
        assert_eq!(p.citations, vec![label('D'), label('B')]);
    }

    #[test]
    fn test_bare_reference_known_and_unknown() {
        let p = scrub_citations(
            "As Exhibit 1C shows, funding grew; Exhibit 1Z disagrees.",
            &known(&['C']),
        );
        assert_eq!(p.text, "As Exhibit 1C shows, funding grew; disagrees.");
        assert_eq!(p.citations, vec![label('C')]);
    }

    #[test]
    fn test_citations_in_first_appearance_order_without_duplicates() {
        let p = scrub_citations(
            "A (Exhibit 1D). B (Exhibit 1B). C (Exhibit 1D).",
            &known(&['B', 'D']),
        );
        assert_eq!(p.citations, vec![label('D'), label('B')]);
    }

    #[test]
    fn test_no_sources_strips_every_citation() {
        let p = scrub_citations("Claim (Exhibit 1B). Another (Exhibit 1C & 1D).", &known(&[]));
        assert_eq!(p.text, "Claim. Another.");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn test_text_without_citations_is_untouched() {
        let text = "I will build a national consortium for grid storage research.";
        let p = scrub_citations(text, &known(&['B']));
        assert_eq!(p.text, text);
    }

    #[test]
    fn test_exhibit_two_is_not_a_citation_match() {
        // Only exhibit number 1 is valid; "Exhibit 2" is left as ordinary prose.
        let p = scrub_citations("See Exhibit 2 for details.", &known(&['B']));
        assert_eq!(p.text, "See Exhibit 2 for details.");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn test_render_group_three_members() {
        assert_eq!(
            render_group(&[label('B'), label('C'), label('D')]),
            "Exhibit 1B, 1C & 1D"
        );
    }
}
