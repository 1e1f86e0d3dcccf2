//! # Ballot Document Model
//!
//! A laid-out ballot is a [`Document`]: a list of pages, each holding a tree of
//! geometric primitives ([`Element`]). [`Rectangle`] is the only container;
//! every voting target is a [`Bubble`] carrying its grid position.
//!
//! ```
//! use hmpb_layout::document::*;
//!
//! let doc = Document {
//!     width: 612.0,
//!     height: 792.0,
//!     pages: vec![Page {
//!         children: vec![Rectangle::new(0.0, 0.0, 612.0, 792.0).fill("white").into()],
//!     }],
//! };
//! let json = serde_json::to_string(&doc).unwrap();
//! assert!(json.contains(r#""type":"Rectangle""#));
//! ```

pub mod mark;
pub mod types;

pub use mark::{Vote, Votes, mark_ballot};
pub use types::*;

use serde::{Deserialize, Serialize};

/// One physical side of a ballot sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub children: Vec<Element>,
}

impl Page {
    /// Every element on the page, depth-first.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().flat_map(|e| e.descendants())
    }

    /// All voting targets on the page.
    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.elements().filter_map(|e| match e {
            Element::Bubble(b) => Some(b),
            _ => None,
        })
    }

    /// All text lines on the page, in tree order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.elements()
            .filter_map(|e| match e {
                Element::TextBox(t) => Some(t.text_lines.iter()),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
    }
}

/// The full printable artifact for one ballot style/precinct. Dimensions are
/// in points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

impl Document {
    /// Apply `f` to every node of every page, children first.
    pub fn map_elements<F>(self, mut f: F) -> Document
    where
        F: FnMut(Element) -> Element,
    {
        Document {
            width: self.width,
            height: self.height,
            pages: self
                .pages
                .into_iter()
                .map(|page| Page {
                    children: page
                        .children
                        .into_iter()
                        .map(|child| child.map_tree(&mut f))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Whether any text line on any page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .any(|page| page.text_lines().any(|line| line.contains(needle)))
    }
}
