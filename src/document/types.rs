//! Element types for the ballot document tree.
//!
//! All types derive `Serialize + Deserialize` so a laid-out document can be
//! handed to an external renderer as JSON. Coordinates are in points (1/72 in)
//! relative to the parent [`Rectangle`].

use serde::{Deserialize, Serialize};

use crate::election::GridPosition;

// ============================================================================
// TEXT STYLE
// ============================================================================

/// Font weight, serialized as the CSS numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum FontWeight {
    Normal,
    Semibold,
    Bold,
}

impl FontWeight {
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Semibold => 500,
            FontWeight::Bold => 700,
        }
    }
}

impl From<FontWeight> for u16 {
    fn from(weight: FontWeight) -> u16 {
        weight.value()
    }
}

impl TryFrom<u16> for FontWeight {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            400 => Ok(FontWeight::Normal),
            500 => Ok(FontWeight::Semibold),
            700 => Ok(FontWeight::Bold),
            other => Err(format!("unsupported font weight {other}")),
        }
    }
}

/// Size, weight and line height of a run of text, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub line_height: f64,
}

impl FontStyle {
    pub const fn new(font_size: f64, font_weight: FontWeight, line_height: f64) -> Self {
        Self {
            font_size,
            font_weight,
            line_height,
        }
    }

    pub fn with_weight(self, font_weight: FontWeight) -> Self {
        Self { font_weight, ..self }
    }

    pub fn with_line_height(self, line_height: f64) -> Self {
        Self { line_height, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// The only container element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_string());
        self.stroke_width = Some(width);
        self
    }

    pub fn fill(mut self, color: &str) -> Self {
        self.fill = Some(color.to_string());
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Pre-wrapped text. The renderer draws one line per entry of `text_lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text_lines: Vec<String>,
    #[serde(flatten)]
    pub font: FontStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

/// Where an image's pixels come from. Exactly one is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    /// URL of an asset the renderer resolves.
    Href(String),
    /// Inline SVG markup.
    Contents(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub source: ImageSource,
}

/// A voting target. Always carries the grid position it maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub border_radius: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    pub grid_position: GridPosition,
}

/// Any node of the document tree, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Rectangle(Rectangle),
    TextBox(TextBox),
    Image(Image),
    Bubble(Bubble),
}

impl Element {
    pub fn height(&self) -> f64 {
        match self {
            Element::Rectangle(r) => r.height,
            Element::TextBox(t) => t.height,
            Element::Image(i) => i.height,
            Element::Bubble(b) => b.height,
        }
    }

    /// Rebuild the tree bottom-up, passing every node (children first) through `f`.
    pub fn map_tree<F>(self, f: &mut F) -> Element
    where
        F: FnMut(Element) -> Element,
    {
        let node = match self {
            Element::Rectangle(mut rect) => {
                let children = std::mem::take(&mut rect.children);
                for child in children {
                    rect.children.push(child.map_tree(&mut *f));
                }
                Element::Rectangle(rect)
            }
            leaf => leaf,
        };
        f(node)
    }

    /// Depth-first iterator over this element and all its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        if let Element::Rectangle(rect) = element {
            self.stack.extend(rect.children.iter().rev());
        }
        Some(element)
    }
}

impl From<Rectangle> for Element {
    fn from(rect: Rectangle) -> Self {
        Element::Rectangle(rect)
    }
}

impl From<TextBox> for Element {
    fn from(text: TextBox) -> Self {
        Element::TextBox(text)
    }
}

impl From<Image> for Element {
    fn from(image: Image) -> Self {
        Element::Image(image)
    }
}

impl From<Bubble> for Element {
    fn from(bubble: Bubble) -> Self {
        Element::Bubble(bubble)
    }
}
