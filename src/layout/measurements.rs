//! # Ballot Geometry
//!
//! Every pixel dimension on the ballot derives from the paper size and the
//! layout density. Positions are mostly expressed in grid units (rows and
//! columns of the timing-mark grid) and converted to points with
//! [`Measurements::grid_point`] and friends.
//!
//! ## Calculations
//!
//! ```text
//! rows    = height_in * 4 - 3
//! columns = width_in * 4
//!
//! For Letter (8.5 x 11 in):
//!   rows = 41, columns = 34
//!   COLUMN_GAP = 612 / 35 ≈ 17.49 pt
//!   ROW_GAP    = 792 / 42 ≈ 18.86 pt
//! ```

use serde::{Deserialize, Serialize};

use crate::document::{FontStyle, FontWeight};
use crate::election::BallotPaperSize;

/// Points per inch.
pub const PPI: f64 = 72.0;

const COLUMNS_PER_INCH: f64 = 4.0;
const ROWS_PER_INCH: f64 = 4.0;

/// Size of the timing-mark grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub columns: u32,
}

/// Timing-mark grid for a paper size.
///
/// This mirrors the Accuvote ballot grid and is hard-coded identically in the
/// scan interpreter. Changing it breaks compatibility with every ballot
/// already printed; it is never recomputed anywhere else in this crate.
pub fn grid_for_paper(paper_size: BallotPaperSize) -> GridDimensions {
    let dimensions = paper_size.dimensions();
    GridDimensions {
        rows: (dimensions.height * ROWS_PER_INCH) as u32 - 3,
        columns: (dimensions.width * COLUMNS_PER_INCH) as u32,
    }
}

/// Layout density. Higher densities use smaller fonts and tighter rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LayoutDensity {
    #[default]
    Default,
    Medium,
    Condensed,
}

impl LayoutDensity {
    pub const ALL: [LayoutDensity; 3] = [
        LayoutDensity::Default,
        LayoutDensity::Medium,
        LayoutDensity::Condensed,
    ];

    fn index(self) -> usize {
        match self {
            LayoutDensity::Default => 0,
            LayoutDensity::Medium => 1,
            LayoutDensity::Condensed => 2,
        }
    }

    /// Pick the entry for this density from a `[default, medium, condensed]` table.
    fn pick<T: Copy>(self, table: [T; 3]) -> T {
        table[self.index()]
    }
}

impl From<LayoutDensity> for u8 {
    fn from(density: LayoutDensity) -> u8 {
        density.index() as u8
    }
}

impl TryFrom<u8> for LayoutDensity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LayoutDensity::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("layout density must be 0, 1 or 2, got {value}"))
    }
}

/// How yes/no options are placed relative to a ballot measure's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPosition {
    /// Options stacked below the description.
    Block,
    /// Options beside the description, at the right edge.
    Inline,
}

/// Text styles for one density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyles {
    pub h1: FontStyle,
    pub h2: FontStyle,
    pub h3: FontStyle,
    pub body: FontStyle,
    pub small: FontStyle,
}

impl FontStyles {
    fn for_density(density: LayoutDensity) -> Self {
        let style = |sizes: [f64; 3], weight| {
            let size = density.pick(sizes);
            FontStyle::new(size, weight, size)
        };
        Self {
            h1: style([20.0, 18.0, 16.0], FontWeight::Bold),
            h2: style([16.0, 14.0, 12.0], FontWeight::Bold),
            h3: style([13.0, 11.0, 9.0], FontWeight::Bold),
            body: style([10.0, 9.0, 8.0], FontWeight::Normal),
            small: style([9.0, 8.0, 7.0], FontWeight::Normal),
        }
    }
}

/// All derived dimensions for one paper size and density.
///
/// Fields ending in `_row_height` / `_column_width` are in grid units;
/// `document_*`, `column_gap` and `row_gap` are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub grid: GridDimensions,
    pub header_row_height: f64,
    pub instructions_row_height: f64,
    pub header_and_instructions_row_height: f64,
    pub footer_row_height: f64,
    /// Includes margin.
    pub timing_marks_row_height: f64,
    pub content_area_row_height: f64,
    pub content_area_column_width: f64,
    pub gutter_width: f64,
    pub contest_column_width: f64,
    pub contest_padding: f64,
    pub contest_row_margin: f64,
    pub max_contest_row_height: f64,
    pub write_in_row_height: f64,
    pub ballot_measure_option_position: OptionPosition,
    pub document_width: f64,
    pub document_height: f64,
    pub column_gap: f64,
    pub row_gap: f64,
    pub font_styles: FontStyles,
}

impl Measurements {
    pub fn new(paper_size: BallotPaperSize, density: LayoutDensity) -> Self {
        let grid = grid_for_paper(paper_size);
        let rows = f64::from(grid.rows);
        let columns = f64::from(grid.columns);

        let header_row_height = density.pick([3.75, 3.0, 2.5]);
        let instructions_row_height = density.pick([3.5, 3.0, 2.5]);
        let footer_row_height = density.pick([2.0, 2.0, 1.5]);
        let timing_marks_row_height = 1.5;
        let content_area_row_height = rows - timing_marks_row_height * 2.0 + 1.0;
        let content_area_column_width = columns - 3.0;
        let gutter_width = 0.5;
        let contest_row_margin = 0.4;

        let dimensions = paper_size.dimensions();
        let document_width = dimensions.width * PPI;
        let document_height = dimensions.height * PPI;

        Self {
            grid,
            header_row_height,
            instructions_row_height,
            header_and_instructions_row_height: header_row_height + instructions_row_height,
            footer_row_height,
            timing_marks_row_height,
            content_area_row_height,
            content_area_column_width,
            gutter_width,
            contest_column_width: (content_area_column_width - gutter_width * 2.0) / 3.0,
            contest_padding: density.pick([0.5, 0.4, 0.3]),
            contest_row_margin,
            max_contest_row_height: content_area_row_height
                - contest_row_margin * 2.0
                - footer_row_height,
            write_in_row_height: density.pick([2.0, 1.0, 1.0]),
            ballot_measure_option_position: density.pick([
                OptionPosition::Block,
                OptionPosition::Block,
                OptionPosition::Inline,
            ]),
            document_width,
            document_height,
            column_gap: document_width / (columns + 1.0),
            row_gap: document_height / (rows + 1.0),
            font_styles: FontStyles::for_density(density),
        }
    }

    /// Point coordinates of a grid location.
    pub fn grid_point(&self, row: f64, column: f64) -> (f64, f64) {
        (column * self.column_gap, row * self.row_gap)
    }

    pub fn grid_width(&self, columns: f64) -> f64 {
        columns * self.column_gap
    }

    pub fn grid_height(&self, rows: f64) -> f64 {
        rows * self.row_gap
    }

    pub fn y_to_row(&self, y: f64) -> f64 {
        y / self.row_gap
    }

    pub fn x_to_column(&self, x: f64) -> f64 {
        x / self.column_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_for_letter() {
        assert_eq!(
            grid_for_paper(BallotPaperSize::Letter),
            GridDimensions { rows: 41, columns: 34 }
        );
    }

    #[test]
    fn test_grid_for_legal() {
        assert_eq!(
            grid_for_paper(BallotPaperSize::Legal),
            GridDimensions { rows: 53, columns: 34 }
        );
    }

    #[test]
    fn test_grid_for_custom_sizes() {
        assert_eq!(grid_for_paper(BallotPaperSize::Custom17).rows, 65);
        assert_eq!(grid_for_paper(BallotPaperSize::Custom22).rows, 85);
        for size in BallotPaperSize::ALL {
            assert_eq!(grid_for_paper(size).columns, 34);
        }
    }

    #[test]
    fn test_letter_measurements() {
        let m = Measurements::new(BallotPaperSize::Letter, LayoutDensity::Default);
        assert_eq!(m.document_width, 612.0);
        assert_eq!(m.document_height, 792.0);
        assert_eq!(m.content_area_row_height, 39.0);
        assert_eq!(m.content_area_column_width, 31.0);
        assert_eq!(m.contest_column_width, 10.0);
        assert!((m.max_contest_row_height - 36.2).abs() < 1e-9);
        assert!((m.row_gap - 792.0 / 42.0).abs() < 1e-9);
        assert!((m.column_gap - 612.0 / 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_tables() {
        let condensed = Measurements::new(BallotPaperSize::Letter, LayoutDensity::Condensed);
        assert_eq!(condensed.font_styles.h1.font_size, 16.0);
        assert_eq!(condensed.font_styles.small.line_height, 7.0);
        assert_eq!(condensed.footer_row_height, 1.5);
        assert_eq!(condensed.ballot_measure_option_position, OptionPosition::Inline);

        let medium = Measurements::new(BallotPaperSize::Letter, LayoutDensity::Medium);
        assert_eq!(medium.write_in_row_height, 1.0);
        assert_eq!(medium.font_styles.body.font_size, 9.0);
        assert_eq!(medium.ballot_measure_option_position, OptionPosition::Block);
    }

    #[test]
    fn test_density_serde() {
        assert_eq!(serde_json::to_string(&LayoutDensity::Condensed).unwrap(), "2");
        let density: LayoutDensity = serde_json::from_str("1").unwrap();
        assert_eq!(density, LayoutDensity::Medium);
        assert!(serde_json::from_str::<LayoutDensity>("3").is_err());
    }

    #[test]
    fn test_grid_point_round_trip() {
        let m = Measurements::new(BallotPaperSize::Legal, LayoutDensity::Default);
        let (x, y) = m.grid_point(10.0, 5.0);
        assert!((m.x_to_column(x) - 5.0).abs() < 1e-9);
        assert!((m.y_to_row(y) - 10.0).abs() < 1e-9);
    }
}
