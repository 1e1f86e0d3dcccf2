//! Layout configuration values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::measurements::LayoutDensity;
use crate::document::TextAlign;

/// Which side of the option text the voting target sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubblePosition {
    #[default]
    Left,
    Right,
}

impl BubblePosition {
    /// Option labels are aligned toward their bubble.
    pub fn text_align(self) -> TextAlign {
        match self {
            BubblePosition::Left => TextAlign::Left,
            BubblePosition::Right => TextAlign::Right,
        }
    }
}

/// What the printed ballots are for. Only `Official` ballots are live;
/// `Sample` ballots carry no machine-readable metadata at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotMode {
    #[default]
    Official,
    Test,
    Sample,
}

impl BallotMode {
    pub fn label(self) -> &'static str {
        match self {
            BallotMode::Official => "Official",
            BallotMode::Test => "Test",
            BallotMode::Sample => "Sample",
        }
    }

    pub fn is_test_mode(self) -> bool {
        self != BallotMode::Official
    }
}

/// Pure layout configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    #[serde(default)]
    pub bubble_position: BubblePosition,
    #[serde(default)]
    pub layout_density: LayoutDensity,
}

/// Per-ballot-style overrides for the ballot header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomContent {
    /// Replaces the election title in the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub election_title: Option<String>,
    /// Inline SVG of the clerk's signature, shown at the right of the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clerk_signature_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clerk_signature_caption: Option<String>,
}

/// Custom content keyed by ballot style id.
pub type CustomContentByBallotStyle = HashMap<String, CustomContent>;
