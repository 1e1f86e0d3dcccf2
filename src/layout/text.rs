//! Text measurement and wrapping.
//!
//! Widths come from a closed-form per-character heuristic rather than real
//! font metrics, so layout needs no font files. Renderers must use the same
//! heuristic or a font whose glyphs are no wider.
//!
//! The heuristic is frozen: existing layout fixtures depend on it, and a more
//! accurate measurement would need every fixture re-baselined.

use crate::document::{FontStyle, Rectangle, TextAlign, TextBox};

/// Approximate advance width of one character, in points.
///
/// Any character unchanged by upper-casing (capitals, digits, punctuation,
/// spaces) counts as wide.
pub fn character_width(character: char, font: &FontStyle) -> f64 {
    let mut upper = character.to_uppercase();
    let is_upper_case = upper.next() == Some(character) && upper.next().is_none();
    font.font_size * if is_upper_case { 0.69 } else { 0.43 }
        + (f64::from(font.font_weight.value()) - 400.0) / 500.0
}

pub fn text_width(text: &str, font: &FontStyle) -> f64 {
    text.chars().map(|c| character_width(c, font)).sum()
}

/// Greedily wrap one line word by word. Words are never split, so a single
/// word wider than `max_width` gets a line of its own.
fn wrap_line(line: &str, font: &FontStyle, max_width: f64) -> Vec<String> {
    let mut results = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let extended = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&extended, font) <= max_width {
            current = extended;
        } else {
            results.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    results.push(current);
    results
}

/// Split on explicit newlines, then wrap each line to `max_width`.
pub fn text_wrap(text: &str, font: &FontStyle, max_width: f64) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line, font, max_width))
        .collect()
}

pub fn text_height(lines: &[String], font: &FontStyle) -> f64 {
    lines.len() as f64 * font.line_height
}

/// A run of text sharing one style within a [`text_block`].
#[derive(Debug, Clone)]
pub struct TextGroup {
    pub text: String,
    pub font: FontStyle,
}

impl TextGroup {
    pub fn new(text: impl Into<String>, font: FontStyle) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

/// Stack text groups vertically, each wrapped independently to `width`.
///
/// Every group takes its wrapped height plus a quarter line of spacing; the
/// returned rectangle's height is the sum, and parent layout relies on it.
pub fn text_block(
    (x, y): (f64, f64),
    width: f64,
    groups: &[TextGroup],
    align: Option<TextAlign>,
) -> Rectangle {
    let mut height_used = 0.0;
    let mut rect = Rectangle::new(x, y, width, 0.0);
    for group in groups {
        let lines = text_wrap(&group.text, &group.font, width);
        let height = text_height(&lines, &group.font) + group.font.line_height / 4.0;
        rect.children.push(
            TextBox {
                x: 0.0,
                y: height_used,
                width,
                height,
                text_lines: lines,
                font: group.font,
                align,
            }
            .into(),
        );
        height_used += height;
    }
    rect.height = height_used;
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, FontWeight};

    const BODY: FontStyle = FontStyle::new(10.0, FontWeight::Normal, 10.0);
    const BOLD: FontStyle = FontStyle::new(10.0, FontWeight::Bold, 10.0);

    #[test]
    fn test_character_width_case() {
        assert!((character_width('A', &BODY) - 6.9).abs() < 1e-9);
        assert!((character_width('a', &BODY) - 4.3).abs() < 1e-9);
        // Digits and spaces are unchanged by upper-casing.
        assert!((character_width('7', &BODY) - 6.9).abs() < 1e-9);
        assert!((character_width(' ', &BODY) - 6.9).abs() < 1e-9);
    }

    #[test]
    fn test_character_width_weight() {
        assert!((character_width('a', &BOLD) - (4.3 + 0.6)).abs() < 1e-9);
    }

    #[test]
    fn test_text_width_sums_characters() {
        assert!((text_width("Ab", &BODY) - 11.2).abs() < 1e-9);
        assert_eq!(text_width("", &BODY), 0.0);
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(text_wrap("vote here", &BODY, 1000.0), vec!["vote here"]);
    }

    #[test]
    fn test_wrap_breaks_between_words() {
        // "ab" = 8.6, "ab ab" = 8.6 + 6.9 + 8.6 = 24.1
        assert_eq!(text_wrap("ab ab ab", &BODY, 25.0), vec!["ab ab", "ab"]);
    }

    #[test]
    fn test_wrap_never_splits_words() {
        let lines = text_wrap("supercalifragilistic", &BODY, 10.0);
        assert_eq!(lines, vec!["", "supercalifragilistic"]);
    }

    #[test]
    fn test_wrap_respects_newlines() {
        assert_eq!(text_wrap("one\ntwo", &BODY, 1000.0), vec!["one", "two"]);
    }

    #[test]
    fn test_text_block_height() {
        let h3 = FontStyle::new(13.0, FontWeight::Bold, 13.0);
        let block = text_block(
            (5.0, 6.0),
            1000.0,
            &[TextGroup::new("Mayor", h3), TextGroup::new("Vote for 1\nor none", BODY)],
            None,
        );
        // 13 + 13/4 + 2 * 10 + 10/4
        assert!((block.height - 38.75).abs() < 1e-9);
        assert_eq!((block.x, block.y), (5.0, 6.0));
        assert_eq!(block.children.len(), 2);
        match &block.children[1] {
            Element::TextBox(t) => {
                assert!((t.y - 16.25).abs() < 1e-9);
                assert_eq!(t.text_lines, vec!["Vote for 1", "or none"]);
            }
            other => panic!("expected text box, got {other:?}"),
        }
    }
}
