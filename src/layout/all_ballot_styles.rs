//! Lay out every ballot style of an election.
//!
//! The election hash goes into every page's QR code, but the hash covers the
//! grid layouts, which come from laying out the ballots. So ballots are laid
//! out twice: once without a hash to get the grid layouts, then again with
//! the hash of the election carrying those layouts. QR codes live in the
//! footer at a fixed size, so the second pass must produce the same geometry
//! as the first; that is checked rather than assumed.

use rayon::prelude::*;
use tracing::info;

use super::ballot::{BallotLayout, BallotParams, lay_out_ballot};
use super::options::{BallotMode, CustomContent, CustomContentByBallotStyle, LayoutOptions};
use crate::election::{BallotStyle, BallotType, Election, ElectionDefinition, GridLayout};
use crate::error::LayoutError;
use crate::metadata::MetadataEncoder;

/// Inputs shared by every ballot of an election.
#[derive(Clone, Copy)]
pub struct AllBallotStylesParams<'a> {
    pub election: &'a Election,
    pub ballot_type: BallotType,
    pub ballot_mode: BallotMode,
    pub layout_options: LayoutOptions,
    pub custom_content: &'a CustomContentByBallotStyle,
    pub encoder: &'a dyn MetadataEncoder,
}

/// Every laid-out ballot plus the election definition they were stamped with.
#[derive(Debug, Clone)]
pub struct AllBallotLayouts {
    /// One per (ballot style, precinct), in election order.
    pub ballots: Vec<BallotLayout>,
    /// The election with grid layouts attached, and its hash.
    pub election_definition: ElectionDefinition,
}

fn lay_out_ballots(
    params: &AllBallotStylesParams<'_>,
    election: &Election,
    election_hash: Option<&str>,
) -> Result<Vec<BallotLayout>, LayoutError> {
    let no_custom_content = CustomContent::default();
    let pairs: Vec<(&BallotStyle, &str)> = election
        .ballot_styles
        .iter()
        .flat_map(|style| style.precincts.iter().map(move |id| (style, id.as_str())))
        .collect();

    pairs
        .par_iter()
        .map(|&(ballot_style, precinct_id)| {
            let precinct = election
                .precinct_by_id(precinct_id)
                .ok_or_else(|| LayoutError::UnknownPrecinct(precinct_id.to_string()))?;
            lay_out_ballot(&BallotParams {
                election,
                precinct,
                ballot_style,
                ballot_type: params.ballot_type,
                ballot_mode: params.ballot_mode,
                election_hash,
                layout_options: params.layout_options,
                custom_content: params
                    .custom_content
                    .get(&ballot_style.id)
                    .unwrap_or(&no_custom_content),
                encoder: params.encoder,
            })
        })
        .collect()
}

/// One grid layout per ballot style. Every precinct of a ballot style must
/// have produced the same one.
fn grid_layouts_by_ballot_style(ballots: &[BallotLayout]) -> Result<Vec<GridLayout>, LayoutError> {
    let mut grid_layouts: Vec<GridLayout> = Vec::new();
    for ballot in ballots {
        let layout = &ballot.grid_layout;
        match grid_layouts
            .iter()
            .find(|existing| existing.ballot_style_id == layout.ballot_style_id)
        {
            Some(existing) if existing != layout => {
                return Err(LayoutError::InconsistentGridLayout {
                    ballot_style_id: layout.ballot_style_id.clone(),
                });
            }
            Some(_) => {}
            None => grid_layouts.push(layout.clone()),
        }
    }
    Ok(grid_layouts)
}

/// Lay out all ballots for every ballot style/precinct combination and
/// produce the election definition with grid layouts attached.
///
/// Ballot styles with no contests are left out of both the ballots and the
/// election definition.
pub fn lay_out_all_ballot_styles(
    params: &AllBallotStylesParams<'_>,
) -> Result<AllBallotLayouts, LayoutError> {
    let mut election = params.election.clone();
    election
        .ballot_styles
        .retain(|style| !params.election.contests_for_ballot_style(style).is_empty());
    election.grid_layouts = None;

    info!(
        ballot_styles = election.ballot_styles.len(),
        "computing grid layouts"
    );
    let unhashed = lay_out_ballots(params, &election, None)?;
    election.grid_layouts = Some(grid_layouts_by_ballot_style(&unhashed)?);

    let election_definition = ElectionDefinition::from_election(election)?;
    info!(
        election_hash = %election_definition.election_hash,
        ballots = unhashed.len(),
        "laying out ballots with election hash"
    );
    let ballots = lay_out_ballots(
        params,
        &election_definition.election,
        Some(election_definition.election_hash.as_str()),
    )?;

    for (before, after) in unhashed.iter().zip(&ballots) {
        if before.grid_layout != after.grid_layout {
            return Err(LayoutError::UnstableGridLayout {
                ballot_style_id: after.grid_layout.ballot_style_id.clone(),
            });
        }
    }

    Ok(AllBallotLayouts {
        ballots,
        election_definition,
    })
}
