//! Grid layout types shared with the scan interpreter.
//!
//! Positions are expressed in timing-mark grid coordinates (see
//! [`crate::layout::grid_for_paper`]), never in pixels.

use serde::{Deserialize, Serialize};

/// Which side of a ballot sheet a page is printed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    /// Odd pages are fronts, even pages are backs.
    pub fn for_page(page_number: u32) -> Self {
        if page_number % 2 == 1 { Side::Front } else { Side::Back }
    }
}

/// Area above a write-in line reserved for the handwritten name, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriteInArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Location of a single voting target, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GridPosition {
    #[serde(rename = "option", rename_all = "camelCase")]
    Option {
        sheet_number: u32,
        side: Side,
        contest_id: String,
        option_id: String,
        column: f64,
        row: f64,
    },
    #[serde(rename = "write-in", rename_all = "camelCase")]
    WriteIn {
        sheet_number: u32,
        side: Side,
        contest_id: String,
        write_in_index: u32,
        column: f64,
        row: f64,
        write_in_area: WriteInArea,
    },
}

impl GridPosition {
    pub fn contest_id(&self) -> &str {
        match self {
            GridPosition::Option { contest_id, .. } | GridPosition::WriteIn { contest_id, .. } => {
                contest_id
            }
        }
    }

    pub fn sheet_number(&self) -> u32 {
        match self {
            GridPosition::Option { sheet_number, .. } | GridPosition::WriteIn { sheet_number, .. } => {
                *sheet_number
            }
        }
    }

    pub fn side(&self) -> Side {
        match self {
            GridPosition::Option { side, .. } | GridPosition::WriteIn { side, .. } => *side,
        }
    }

    /// `(column, row)` of the target in grid coordinates.
    pub fn location(&self) -> (f64, f64) {
        match self {
            GridPosition::Option { column, row, .. } | GridPosition::WriteIn { column, row, .. } => {
                (*column, *row)
            }
        }
    }
}

/// Extent of an option's label area relative to its target mark, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionBounds {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// All voting target positions for one ballot style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub ballot_style_id: String,
    pub option_bounds_from_target_mark: OptionBounds,
    pub grid_positions: Vec<GridPosition>,
}
