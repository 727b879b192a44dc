use std::fmt;

use serde::{Deserialize, Serialize};

/// First exhibit letter; `Exhibit 1A` is reserved for the endeavor document itself.
const FIRST_LETTER: u8 = b'B';
const LAST_LETTER: u8 = b'Z';

/// Maximum number of citable exhibits (`Exhibit 1B` through `Exhibit 1Z`).
pub const MAX_EXHIBITS: usize = (LAST_LETTER - FIRST_LETTER + 1) as usize;

/// An exhibit label of the form `Exhibit 1<letter>`. The number is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExhibitLabel {
    letter: char,
}

impl ExhibitLabel {
    /// Label for the `index`-th validated source (0 → `Exhibit 1B`).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= MAX_EXHIBITS {
            return None;
        }
        Some(Self {
            letter: (FIRST_LETTER + index as u8) as char,
        })
    }

    /// Label for a letter as written in a citation; case-insensitive.
    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii() && (FIRST_LETTER..=LAST_LETTER).contains(&(upper as u8)) {
            Some(Self { letter: upper })
        } else {
            None
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Directory name used for the captured exhibit, e.g. `Exhibit_1B`.
    pub fn folder_name(&self) -> String {
        format!("Exhibit_1{}", self.letter)
    }
}

impl fmt::Display for ExhibitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exhibit 1{}", self.letter)
    }
}

/// A source URL that passed the reachability check, with its exhibit label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSource {
    pub url: String,
    pub exhibit: ExhibitLabel,
}
