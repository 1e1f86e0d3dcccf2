//! Single-ballot page composer.
//!
//! Contests are split into sections (candidate contests, then ballot
//! measures) and pulled off a queue page by page. Each section is packed into
//! whatever vertical room the page has left; contests that don't fit go back
//! on the front of the queue for the next page. Pages are added until every
//! contest is placed and the page count is even.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::columns::{ColumnLayout, HasHeight, lay_out_in_columns};
use super::contests::{ContestContext, Placement, contest_columns_chunk, render_contest};
use super::measurements::Measurements;
use super::options::{BallotMode, BubblePosition, CustomContent, LayoutOptions};
use super::page::{BallotContext, blank_page_message, footer, header_and_instructions, timing_mark_grid};
use crate::document::{Document, Element, Page};
use crate::election::{
    BallotStyle, BallotType, Contest, Election, GridLayout, OptionBounds, Precinct,
};
use crate::error::LayoutError;
use crate::metadata::MetadataEncoder;

/// Grid column where the contest area starts.
const CONTEST_AREA_COLUMN: f64 = 2.0;

/// Inputs for laying out one ballot style in one precinct.
#[derive(Clone, Copy)]
pub struct BallotParams<'a> {
    pub election: &'a Election,
    pub precinct: &'a Precinct,
    pub ballot_style: &'a BallotStyle,
    pub ballot_type: BallotType,
    pub ballot_mode: BallotMode,
    /// `None` while grid layouts are still being computed.
    pub election_hash: Option<&'a str>,
    pub layout_options: LayoutOptions,
    pub custom_content: &'a CustomContent,
    pub encoder: &'a dyn MetadataEncoder,
}

/// A laid-out ballot and the voting target positions on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotLayout {
    pub precinct_id: String,
    pub document: Document,
    pub grid_layout: GridLayout,
}

struct MeasuredContest<'a> {
    contest: &'a Contest,
    /// Rendered height plus the margin above it.
    height: f64,
}

impl HasHeight for MeasuredContest<'_> {
    fn height(&self) -> f64 {
        self.height
    }
}

fn too_tall(contest: &Contest) -> LayoutError {
    LayoutError::ContestTooTall {
        contest_id: contest.id().to_string(),
        title: contest.title().to_string(),
    }
}

/// Render each contest once at the origin to learn its height.
fn measure_section<'a>(
    ctx: ContestContext<'_>,
    section: &[&'a Contest],
) -> Result<Vec<MeasuredContest<'a>>, LayoutError> {
    let m = ctx.m;
    let max_height = m.grid_height(m.max_contest_row_height);
    section
        .iter()
        .map(|&contest| {
            let (rect, _) = render_contest(ctx, contest, Placement::ORIGIN);
            let height = rect.height + m.grid_height(m.contest_row_margin);
            if height > max_height {
                return Err(too_tall(contest));
            }
            Ok(MeasuredContest { contest, height })
        })
        .collect()
}

fn contest_sections(contests: Vec<&Contest>) -> VecDeque<Vec<&Contest>> {
    let (candidate_contests, ballot_measures): (Vec<_>, Vec<_>) =
        contests.into_iter().partition(|contest| contest.is_candidate());
    [candidate_contests, ballot_measures]
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect()
}

fn option_bounds(bubble_position: BubblePosition) -> OptionBounds {
    match bubble_position {
        BubblePosition::Left => OptionBounds {
            top: 1.0,
            bottom: 1.0,
            left: 1.0,
            right: 9.0,
        },
        BubblePosition::Right => OptionBounds {
            top: 1.0,
            bottom: 1.0,
            left: 9.0,
            right: 1.0,
        },
    }
}

/// Lay out the contests of a ballot style on as many pages as needed.
///
/// Fails if the ballot style has no contests, if any single contest is too
/// tall for an empty page, or if the metadata encoder fails.
pub fn lay_out_ballot(params: &BallotParams<'_>) -> Result<BallotLayout, LayoutError> {
    let election = params.election;
    let m = Measurements::new(
        election.ballot_layout.paper_size,
        params.layout_options.layout_density,
    );

    let contests = election.contests_for_ballot_style(params.ballot_style);
    if contests.is_empty() {
        return Err(LayoutError::NoContests {
            ballot_style_id: params.ballot_style.id.clone(),
            precinct_id: params.precinct.id.clone(),
        });
    }
    let mut sections = contest_sections(contests);

    let page_ctx = BallotContext {
        election,
        ballot_style: params.ballot_style,
        precinct: params.precinct,
        ballot_type: params.ballot_type,
        ballot_mode: params.ballot_mode,
        custom_content: params.custom_content,
        m: &m,
    };
    let contest_ctx = ContestContext {
        election,
        bubble_position: params.layout_options.bubble_position,
        m: &m,
    };

    let mut pages: Vec<Page> = Vec::new();
    let mut grid_positions = Vec::new();
    while !sections.is_empty() || pages.len() % 2 != 0 {
        let page_number = pages.len() as u32 + 1;
        debug!(
            ballot_style = %params.ballot_style.id,
            precinct = %params.precinct.id,
            page_number,
            sections_left = sections.len(),
            "laying out page"
        );

        let header = header_and_instructions(&page_ctx, page_number)?;
        let header_rows = if header.is_some() {
            m.header_and_instructions_row_height
        } else {
            0.0
        };
        let contests_rows = m.content_area_row_height
            - m.contest_row_margin * 2.0
            - header_rows
            - m.footer_row_height;
        let available_height = m.grid_height(contests_rows);

        let mut height_used = 0.0;
        let mut contest_objects: Vec<Element> = Vec::new();
        while height_used < available_height {
            let Some(section) = sections.pop_front() else {
                break;
            };
            let num_columns = if section.first().is_some_and(|c| c.is_candidate()) {
                3
            } else {
                1
            };
            let ColumnLayout {
                columns,
                height,
                leftover,
            } = lay_out_in_columns(
                measure_section(contest_ctx, &section)?,
                num_columns,
                available_height - height_used,
            );

            let placed = section.len() - leftover.len();
            if !leftover.is_empty() {
                sections.push_front(leftover.into_iter().map(|c| c.contest).collect());
            }
            if height == 0.0 {
                break;
            }

            let columns: Vec<Vec<&Contest>> = columns
                .into_iter()
                .map(|column| column.into_iter().map(|c| c.contest).collect())
                .collect();
            let (chunk, positions) = contest_columns_chunk(
                contest_ctx,
                &columns,
                height,
                m.timing_marks_row_height + header_rows + m.y_to_row(height_used),
                CONTEST_AREA_COLUMN,
                page_number,
            );
            debug!(page_number, placed, "laid out contests");
            contest_objects.push(chunk.into());
            height_used += height;
            grid_positions.extend(positions);
        }

        if contest_objects.is_empty() {
            // A back page has the most room any page gets.
            if header.is_none() {
                if let Some(contest) = sections.front().and_then(|section| section.first()) {
                    return Err(too_tall(contest));
                }
            }
            contest_objects.push(blank_page_message(&m, header_rows, contests_rows).into());
        }

        let mut children: Vec<Element> = vec![timing_mark_grid(&m).into()];
        children.extend(header.map(Element::from));
        children.extend(contest_objects);
        pages.push(Page { children });
    }

    let total_pages = pages.len() as u32;
    for (index, page) in pages.iter_mut().enumerate() {
        let footer = footer(
            &page_ctx,
            index as u32 + 1,
            total_pages,
            params.election_hash,
            params.encoder,
        )?;
        page.children.push(footer.into());
    }

    Ok(BallotLayout {
        precinct_id: params.precinct.id.clone(),
        document: Document {
            width: m.document_width,
            height: m.document_height,
            pages,
        },
        grid_layout: GridLayout {
            ballot_style_id: params.ballot_style.id.clone(),
            option_bounds_from_target_mark: option_bounds(params.layout_options.bubble_position),
            grid_positions,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::{Contest, GridPosition, fixtures};
    use crate::layout::measurements::LayoutDensity;
    use crate::metadata::QrMetadataEncoder;

    fn lay_out(election: &Election, options: LayoutOptions) -> Result<BallotLayout, LayoutError> {
        lay_out_ballot(&BallotParams {
            election,
            precinct: &election.precincts[0],
            ballot_style: &election.ballot_styles[0],
            ballot_type: BallotType::Precinct,
            ballot_mode: BallotMode::Official,
            election_hash: None,
            layout_options: options,
            custom_content: &CustomContent::default(),
            encoder: &QrMetadataEncoder,
        })
    }

    fn page_of(position: &GridPosition) -> u32 {
        position.sheet_number() * 2
            - match position.side() {
                crate::election::Side::Front => 1,
                crate::election::Side::Back => 0,
            }
    }

    #[test]
    fn test_single_contest_gets_blank_back() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 3)]);
        let layout = lay_out(&election, LayoutOptions::default()).unwrap();
        assert_eq!(layout.document.pages.len(), 2);
        let back: Vec<&str> = layout.document.pages[1].text_lines().collect();
        assert!(back.contains(&"This page intentionally left blank."));
        assert_eq!(layout.grid_layout.grid_positions.len(), 4);
        assert_eq!(layout.precinct_id, "p1");
    }

    #[test]
    fn test_sections_order_candidates_before_measures() {
        let election = fixtures::election(vec![
            fixtures::measure("m1", "d1"),
            fixtures::candidate_contest("mayor", "d1", 1, 2),
        ]);
        let layout = lay_out(&election, LayoutOptions::default()).unwrap();
        let contest_ids: Vec<&str> = layout
            .grid_layout
            .grid_positions
            .iter()
            .map(|p| p.contest_id())
            .collect();
        assert_eq!(contest_ids.first(), Some(&"mayor"));
        assert_eq!(contest_ids.last(), Some(&"m1"));
    }

    #[test]
    fn test_many_contests_span_pages() {
        let contests: Vec<Contest> = (0..30)
            .map(|i| fixtures::candidate_contest(&format!("c{i}"), "d1", 1, 5))
            .collect();
        let election = fixtures::election(contests);
        let layout = lay_out(&election, LayoutOptions::default()).unwrap();
        let pages = layout.document.pages.len();
        assert!(pages > 2);
        assert_eq!(pages % 2, 0);
        let last_page = layout
            .grid_layout
            .grid_positions
            .iter()
            .map(page_of)
            .max()
            .unwrap();
        assert!(last_page as usize <= pages);
        // Every contest is placed exactly once.
        let mut ids: Vec<&str> = layout
            .grid_layout
            .grid_positions
            .iter()
            .map(|p| p.contest_id())
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_footer_on_every_page() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 3)]);
        let layout = lay_out(&election, LayoutOptions::default()).unwrap();
        assert!(layout.document.contains_text("1/2"));
        assert!(layout.document.contains_text("2/2"));
        assert!(layout.document.contains_text("You have completed voting."));
    }

    #[test]
    fn test_no_contests() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d9", 1, 3)]);
        let err = lay_out(&election, LayoutOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::NoContests { ballot_style_id, precinct_id }
                if ballot_style_id == "1" && precinct_id == "p1"
        ));
    }

    #[test]
    fn test_contest_too_tall() {
        let election = fixtures::election(vec![fixtures::candidate_contest("huge", "d1", 1, 60)]);
        let err = lay_out(&election, LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::ContestTooTall { contest_id, .. } if contest_id == "huge"));
    }

    fn condensed() -> LayoutOptions {
        LayoutOptions {
            layout_density: LayoutDensity::Condensed,
            ..LayoutOptions::default()
        }
    }

    #[test]
    fn test_tallest_contest_that_fits_a_back_page() {
        // 32 one-row candidates plus heading, write-in and margins is 35.9 of
        // the 36.7 rows a condensed Letter back page offers.
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 32)]);
        let layout = lay_out(&election, condensed()).unwrap();
        assert_eq!(layout.document.pages.len(), 2);
        assert_eq!(layout.grid_layout.grid_positions.len(), 33);
        assert!(
            layout
                .grid_layout
                .grid_positions
                .iter()
                .all(|p| p.side() == crate::election::Side::Back)
        );
    }

    #[test]
    fn test_one_candidate_more_is_too_tall() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 33)]);
        let err = lay_out(&election, condensed()).unwrap_err();
        assert!(matches!(err, LayoutError::ContestTooTall { contest_id, .. } if contest_id == "mayor"));
    }

    #[test]
    fn test_option_bounds_follow_bubble_position() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 2)]);
        let right = lay_out(
            &election,
            LayoutOptions {
                bubble_position: BubblePosition::Right,
                layout_density: LayoutDensity::Default,
            },
        )
        .unwrap();
        assert_eq!(right.grid_layout.option_bounds_from_target_mark.left, 9.0);
        assert_eq!(right.grid_layout.option_bounds_from_target_mark.right, 1.0);
    }

    #[test]
    fn test_denser_layout_uses_fewer_pages() {
        let contests: Vec<Contest> = (0..30)
            .map(|i| fixtures::candidate_contest(&format!("c{i}"), "d1", 1, 5))
            .collect();
        let election = fixtures::election(contests);
        let default = lay_out(&election, LayoutOptions::default()).unwrap();
        let condensed = lay_out(
            &election,
            LayoutOptions {
                layout_density: LayoutDensity::Condensed,
                ..LayoutOptions::default()
            },
        )
        .unwrap();
        assert!(condensed.document.pages.len() <= default.document.pages.len());
    }
}
