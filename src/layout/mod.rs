//! # Ballot Layout
//!
//! Turns an election into print-ready [`Document`](crate::document::Document)s.
//!
//! ## Pipeline
//!
//! ```text
//! Election ──► contests per ballot style ──► measure ──► pack into columns
//!                                                            │
//!        Document + GridLayout ◄── footers ◄── pages ◄───────┘
//! ```
//!
//! - [`measurements`]: the grid, density tables and unit conversions
//! - [`text`]: approximate text measurement and wrapping
//! - [`columns`]: the column packing optimizer
//! - [`contests`]: candidate contest and ballot measure renderers
//! - [`page`]: timing marks, header, instructions and footer
//! - [`ballot`]: one ballot style in one precinct
//! - [`all_ballot_styles`]: every ballot of an election, hash included

pub mod all_ballot_styles;
pub mod ballot;
pub mod columns;
pub mod contests;
pub mod measurements;
pub mod options;
pub mod page;
pub mod text;

pub use all_ballot_styles::{AllBallotLayouts, AllBallotStylesParams, lay_out_all_ballot_styles};
pub use ballot::{BallotLayout, BallotParams, lay_out_ballot};
pub use columns::{ColumnLayout, HasHeight, lay_out_in_columns};
pub use measurements::{GridDimensions, LayoutDensity, Measurements, PPI, grid_for_paper};
pub use options::{BallotMode, BubblePosition, CustomContent, CustomContentByBallotStyle, LayoutOptions};
