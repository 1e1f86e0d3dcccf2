//! # HMPB Layout - Hand-Marked Paper Ballot Layout Engine
//!
//! hmpb-layout turns an election definition into print-ready ballot
//! documents. It provides:
//!
//! - **Layout**: contests packed into columns on a fixed timing-mark grid
//! - **Grid layouts**: the position of every voting target, for the scanner
//! - **Election hashing**: a two-pass layout that embeds the hash of the
//!   final election definition in every page's QR code
//! - **Marking**: filling bubbles on a laid-out ballot from a set of votes
//!
//! ## Quick Start
//!
//! ```no_run
//! use hmpb_layout::{
//!     election::Election,
//!     layout::{AllBallotStylesParams, BallotMode, CustomContentByBallotStyle, LayoutOptions},
//!     layout::lay_out_all_ballot_styles,
//!     election::BallotType,
//!     metadata::QrMetadataEncoder,
//! };
//!
//! let json = std::fs::read_to_string("election.json")?;
//! let election: Election = serde_json::from_str(&json)?;
//!
//! let result = lay_out_all_ballot_styles(&AllBallotStylesParams {
//!     election: &election,
//!     ballot_type: BallotType::Precinct,
//!     ballot_mode: BallotMode::Official,
//!     layout_options: LayoutOptions::default(),
//!     custom_content: &CustomContentByBallotStyle::new(),
//!     encoder: &QrMetadataEncoder,
//! })?;
//!
//! println!("{} ballots, election hash {}",
//!     result.ballots.len(),
//!     result.election_definition.election_hash);
//!
//! # Ok::<(), hmpb_layout::error::LayoutError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`election`] | Election model, grid layouts, hashed definitions |
//! | [`document`] | Element tree produced by layout, ballot marking |
//! | [`layout`] | Measurements, column packing, contests, pages |
//! | [`metadata`] | Page metadata QR codes |
//! | [`error`] | Error types |
//!
//! ## Grid
//!
//! Every page is divided into the grid returned by
//! [`layout::grid_for_paper`]. Scanners derive the same grid from the timing
//! marks, so changing that function is a breaking change for every ballot
//! already printed.

pub mod document;
pub mod election;
pub mod error;
pub mod layout;
pub mod metadata;

// Re-exports for convenience
pub use error::LayoutError;
pub use layout::{lay_out_all_ballot_styles, lay_out_ballot};
