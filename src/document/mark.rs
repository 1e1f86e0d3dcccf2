//! Overlay votes onto an already laid-out ballot.
//!
//! Used to produce marked test decks: bubbles that match a vote are filled,
//! and write-in names are printed just above their write-in line.

use std::collections::HashMap;

use super::{Bubble, Document, Element, FontStyle, FontWeight, Rectangle, TextAlign, TextBox};
use crate::election::GridPosition;

/// Fill color of a marked bubble.
pub const MARKED_FILL: &str = "black";

const WRITE_IN_FONT: FontStyle = FontStyle::new(10.0, FontWeight::Normal, 10.0);

/// A single vote within a contest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vote {
    /// A candidate vote. Write-in candidates are matched to write-in slots in
    /// the order they appear.
    Candidate {
        id: String,
        name: String,
        is_write_in: bool,
    },
    /// A ballot measure vote, by option id.
    Option(String),
}

/// Votes keyed by contest id.
pub type Votes = HashMap<String, Vec<Vote>>;

/// Return a copy of `document` with every voted bubble filled in.
pub fn mark_ballot(document: Document, votes: &Votes) -> Document {
    document.map_elements(|element| match element {
        Element::Bubble(bubble) if is_voted(&bubble, votes) => Element::Bubble(Bubble {
            fill: MARKED_FILL.to_string(),
            ..bubble
        }),
        Element::Rectangle(rect) => Element::Rectangle(add_write_in_name(rect, votes)),
        other => other,
    })
}

fn write_in_names<'a>(votes: &'a Votes, contest_id: &str) -> Vec<&'a str> {
    votes
        .get(contest_id)
        .map(|contest_votes| {
            contest_votes
                .iter()
                .filter_map(|vote| match vote {
                    Vote::Candidate {
                        name,
                        is_write_in: true,
                        ..
                    } => Some(name.as_str()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn is_voted(bubble: &Bubble, votes: &Votes) -> bool {
    match &bubble.grid_position {
        GridPosition::Option {
            contest_id,
            option_id,
            ..
        } => votes.get(contest_id).is_some_and(|contest_votes| {
            contest_votes.iter().any(|vote| match vote {
                Vote::Candidate {
                    id, is_write_in, ..
                } => !is_write_in && id == option_id,
                Vote::Option(id) => id == option_id,
            })
        }),
        GridPosition::WriteIn {
            contest_id,
            write_in_index,
            ..
        } => (*write_in_index as usize) < write_in_names(votes, contest_id).len(),
    }
}

/// If `rect` is a write-in option row with a matching vote, add the write-in
/// name above its line. The line is the row's solid black child rectangle.
fn add_write_in_name(mut rect: Rectangle, votes: &Votes) -> Rectangle {
    let name = rect.children.iter().find_map(|child| match child {
        Element::Bubble(Bubble {
            grid_position:
                GridPosition::WriteIn {
                    contest_id,
                    write_in_index,
                    ..
                },
            ..
        }) => write_in_names(votes, contest_id)
            .get(*write_in_index as usize)
            .map(|name| name.to_string()),
        _ => None,
    });
    let Some(name) = name else {
        return rect;
    };

    let line = rect.children.iter().find_map(|child| match child {
        Element::Rectangle(line) if line.fill.as_deref() == Some("black") => {
            Some((line.x, line.y, line.width))
        }
        _ => None,
    });
    if let Some((x, y, width)) = line {
        rect.children.push(Element::TextBox(TextBox {
            x,
            y: y - WRITE_IN_FONT.line_height - 1.0,
            width,
            height: WRITE_IN_FONT.line_height,
            text_lines: vec![name],
            font: WRITE_IN_FONT,
            align: Some(TextAlign::Left),
        }));
    }
    rect
}
