//! Interactive topic selection.
//!
//! On a terminal the topics are offered as an `inquire` arrow-key menu. Piped
//! input, or a terminal `inquire` cannot drive, gets a numbered list answered
//! on the input stream.

use std::fmt;
use std::io::{BufRead, Write};

use inquire::{InquireError, Select};
use tracing::debug;

use crate::console::{prompt, read_line};
use crate::errors::AppError;

/// What the user asked for at the topic prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    /// Zero-based index into the presented topics.
    Selected(usize),
    /// The user wants five fresh suggestions.
    Regenerate,
}

/// How the topic menu is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuStyle {
    /// Arrow-key menu drawn by `inquire` on the controlling terminal.
    Interactive,
    /// Numbered list answered on the input stream.
    #[default]
    Numbered,
}

/// One row of the interactive menu.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuEntry<'a> {
    Topic(usize, &'a str),
    Regenerate,
}

impl fmt::Display for MenuEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuEntry::Topic(i, topic) => write!(f, "{}. {}", i + 1, topic),
            MenuEntry::Regenerate => f.write_str("Request five new topics"),
        }
    }
}

fn menu_entries(topics: &[String]) -> Vec<MenuEntry<'_>> {
    topics
        .iter()
        .enumerate()
        .map(|(i, t)| MenuEntry::Topic(i, t.as_str()))
        .chain(std::iter::once(MenuEntry::Regenerate))
        .collect()
}

/// Presents `topics` and reads a choice.
///
/// Invalid input re-prompts; EOF or a cancelled menu is `InputClosed`.
pub fn choose_topic<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    topics: &[String],
    style: MenuStyle,
) -> Result<TopicChoice, AppError> {
    if topics.is_empty() {
        return Err(AppError::Validation("no topics to choose from".to_string()));
    }

    if style == MenuStyle::Interactive {
        match select_interactively(topics) {
            Ok(choice) => return Ok(choice),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Err(AppError::InputClosed);
            }
            Err(e) => debug!("Interactive menu unavailable ({e}); using the numbered list"),
        }
    }

    choose_numbered(input, output, topics)
}

fn select_interactively(topics: &[String]) -> Result<TopicChoice, InquireError> {
    let entries = menu_entries(topics);
    let page_size = entries.len();
    let picked = Select::new("Choose a topic for your proposed endeavor:", entries)
        .with_page_size(page_size)
        .prompt()?;
    Ok(match picked {
        MenuEntry::Topic(i, _) => TopicChoice::Selected(i),
        MenuEntry::Regenerate => TopicChoice::Regenerate,
    })
}

fn choose_numbered<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    topics: &[String],
) -> Result<TopicChoice, AppError> {
    writeln!(output, "\nPlease choose a topic for your proposed endeavor:")?;
    for (i, topic) in topics.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, topic)?;
    }

    let message = format!(
        "\nEnter the number of your choice (1-{}, or 'r' for new topics): ",
        topics.len()
    );

    loop {
        prompt(output, &message)?;
        let line = read_line(input)?.ok_or(AppError::InputClosed)?;
        match parse_choice(&line, topics.len()) {
            Some(choice) => return Ok(choice),
            None => writeln!(
                output,
                "Invalid input. Please enter a number between 1 and {}.",
                topics.len()
            )?,
        }
    }
}

fn parse_choice(line: &str, count: usize) -> Option<TopicChoice> {
    let answer = line.trim();
    if answer.eq_ignore_ascii_case("r") {
        return Some(TopicChoice::Regenerate);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(TopicChoice::Selected(n - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<String> {
        (1..=5).map(|i| format!("Topic {i}")).collect()
    }

    #[test]
    fn test_valid_number_selects_zero_based_index() {
        let mut input = "3\n".as_bytes();
        let mut out = Vec::new();
        let choice = choose_topic(&mut input, &mut out, &topics(), MenuStyle::Numbered).unwrap();
        assert_eq!(choice, TopicChoice::Selected(2));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("  1. Topic 1"));
        assert!(printed.contains("  5. Topic 5"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let mut input = "zero\n0\n6\n  5 \n".as_bytes();
        let mut out = Vec::new();
        let choice = choose_topic(&mut input, &mut out, &topics(), MenuStyle::Numbered).unwrap();
        assert_eq!(choice, TopicChoice::Selected(4));
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Invalid input").count(), 3);
    }

    #[test]
    fn test_r_requests_regeneration() {
        let mut input = "R\n".as_bytes();
        let mut out = Vec::new();
        assert_eq!(
            choose_topic(&mut input, &mut out, &topics(), MenuStyle::Numbered).unwrap(),
            TopicChoice::Regenerate
        );
    }

    #[test]
    fn test_eof_is_an_error() {
        let mut input = "9\n".as_bytes();
        let mut out = Vec::new();
        let err = choose_topic(&mut input, &mut out, &topics(), MenuStyle::Numbered).unwrap_err();
        assert!(matches!(err, AppError::InputClosed));
    }

    #[test]
    fn test_menu_lists_topics_then_regenerate() {
        let topics = topics();
        let entries = menu_entries(&topics);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].to_string(), "1. Topic 1");
        assert_eq!(entries[4], MenuEntry::Topic(4, "Topic 5"));
        assert_eq!(entries[5], MenuEntry::Regenerate);
        assert_eq!(entries[5].to_string(), "Request five new topics");
    }

    #[test]
    fn test_no_topics_is_a_validation_error() {
        let mut input = "1\n".as_bytes();
        let err =
            choose_topic(&mut input, &mut Vec::new(), &[], MenuStyle::Interactive).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
