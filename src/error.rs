//! # Error Types
//!
//! This module defines error types used throughout the hmpb-layout library.
//!
//! Layout either fully succeeds for a ballot style/precinct or fails for it as
//! a whole; there are no partial documents.

use thiserror::Error;

/// Main error type for ballot layout operations
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A ballot style/precinct combination has no contests to lay out
    #[error("No contests assigned to ballot style {ballot_style_id} in precinct {precinct_id}")]
    NoContests {
        ballot_style_id: String,
        precinct_id: String,
    },

    /// A single contest is taller than the contest area of an empty page
    #[error("Contest is too tall to fit on a page: {title} ({contest_id})")]
    ContestTooTall { contest_id: String, title: String },

    /// A ballot style references a precinct the election does not define
    #[error("Unknown precinct: {0}")]
    UnknownPrecinct(String),

    /// A primary ballot style has no matching party
    #[error("Unknown party for ballot style {0}")]
    UnknownParty(String),

    /// Precincts sharing a ballot style produced different grid layouts
    #[error("Precincts of ballot style {ballot_style_id} produced different grid layouts")]
    InconsistentGridLayout { ballot_style_id: String },

    /// Embedding the election hash changed the ballot geometry
    #[error("Grid layout for ballot style {ballot_style_id} changed after embedding the election hash")]
    UnstableGridLayout { ballot_style_id: String },

    /// Ballot metadata or QR code encoding error
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Election definition serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
