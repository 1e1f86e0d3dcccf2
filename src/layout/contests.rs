//! Contest renderers.
//!
//! Each renderer turns one contest into a positioned [`Rectangle`] subtree plus
//! the grid positions of its voting targets. Heights are computed bottom-up
//! from the text blocks and option rows, so a contest can be rendered once at
//! the origin just to measure it.

use super::measurements::{Measurements, OptionPosition, PPI};
use super::options::BubblePosition;
use super::text::{TextGroup, text_block};
use crate::document::{Bubble, Element, FontWeight, Rectangle, TextBox};
use crate::election::{
    CandidateContest, Contest, Election, ElectionType, GridPosition, Side, WriteInArea,
    YesNoContest,
};

/// A rendered contest (or column of contests) and its voting targets.
pub type Rendered = (Rectangle, Vec<GridPosition>);

/// Shared inputs for rendering contests on one ballot.
#[derive(Clone, Copy)]
pub struct ContestContext<'a> {
    pub election: &'a Election,
    pub bubble_position: BubblePosition,
    pub m: &'a Measurements,
}

/// Where a contest goes.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Row offset within the parent column, in grid units.
    pub row: f64,
    /// Absolute grid row of the contest's top edge.
    pub grid_row: f64,
    /// Absolute grid column of the contest's left edge.
    pub grid_column: f64,
    pub page_number: u32,
}

impl Placement {
    /// Placement used when rendering only to measure height.
    pub const ORIGIN: Placement = Placement {
        row: 0.0,
        grid_row: 0.0,
        grid_column: 0.0,
        page_number: 0,
    };

    fn sheet_number(&self) -> u32 {
        self.page_number.div_ceil(2)
    }

    fn side(&self) -> Side {
        Side::for_page(self.page_number)
    }
}

/// A voting target centered on a grid point of its parent.
pub fn option_bubble(row: f64, column: f64, grid_position: GridPosition, m: &Measurements) -> Bubble {
    let width = 0.2 * PPI;
    let height = 0.13 * PPI;
    let (x, y) = m.grid_point(row, column);
    Bubble {
        x: x - width / 2.0,
        y: y - height / 2.0,
        width,
        height,
        border_radius: 0.07 * PPI,
        stroke: "black".into(),
        stroke_width: 0.5,
        fill: "none".into(),
        grid_position,
    }
}

/// The heavy rule along the top of contests, instructions and footer.
pub fn top_border(width: f64) -> Element {
    Rectangle::new(0.0, 0.0, width, 2.0).fill("black").into()
}

fn heading_row_height(heading: &Rectangle, m: &Measurements) -> f64 {
    (m.y_to_row(heading.height) + m.contest_padding).round()
}

pub fn render_contest(ctx: ContestContext<'_>, contest: &Contest, at: Placement) -> Rendered {
    match contest {
        Contest::Candidate(contest) => candidate_contest(ctx, contest, at),
        Contest::YesNo(contest) => ballot_measure(ctx, contest, at),
    }
}

fn candidate_contest(ctx: ContestContext<'_>, contest: &CandidateContest, at: Placement) -> Rendered {
    let m = ctx.m;
    let fonts = &m.font_styles;
    let width = m.contest_column_width;

    let mut heading_groups = vec![
        TextGroup::new(&contest.title, fonts.h3),
        TextGroup::new(
            if contest.seats == 1 {
                "Vote for not more than 1".to_string()
            } else {
                format!("Vote for up to {}", contest.seats)
            },
            fonts.body,
        ),
    ];
    if contest.seats > 1 {
        heading_groups.push(TextGroup::new(format!("{} will be elected", contest.seats), fonts.body));
    }
    if let Some(term) = &contest.term_description {
        heading_groups.push(TextGroup::new(term, fonts.body));
    }
    let heading = text_block(
        m.grid_point(m.contest_padding, m.contest_padding),
        m.grid_width(width - 2.0 * m.contest_padding),
        &heading_groups,
        None,
    );
    let heading_rows = heading_row_height(&heading, m);

    let (bubble_column, label_column) = match ctx.bubble_position {
        BubblePosition::Left => (1.0, 1.75),
        BubblePosition::Right => (width - 1.0, 0.5),
    };
    let align = Some(ctx.bubble_position.text_align());

    let mut positions = Vec::new();
    let mut options: Vec<Rectangle> = Vec::new();
    let mut rows_used = heading_rows;

    for candidate in &contest.candidates {
        let party_text = match ctx.election.election_type {
            ElectionType::Primary => None,
            ElectionType::General => ctx.election.candidate_parties_description(candidate),
        };
        let option_row = rows_used;

        let mut groups = vec![TextGroup::new(
            &candidate.name,
            fonts.body.with_weight(FontWeight::Bold),
        )];
        if let Some(party) = &party_text {
            // At the tightest density the party line is condensed further so
            // name and party share one grid row.
            let factor = if fonts.body.line_height == 8.0 { 0.75 } else { 1.0 };
            groups.push(TextGroup::new(
                party,
                fonts.body.with_line_height(fonts.body.line_height * factor),
            ));
        }
        let party_offset = if party_text.is_some() { 0.15 } else { 0.0 };
        let label = text_block(
            m.grid_point(
                0.9 - m.y_to_row(fonts.body.font_size) / 2.0 - party_offset,
                label_column,
            ),
            m.grid_width(width - 2.25),
            &groups,
            align,
        );

        let position = GridPosition::Option {
            sheet_number: at.sheet_number(),
            side: at.side(),
            contest_id: contest.id.clone(),
            option_id: candidate.id.clone(),
            column: at.grid_column + bubble_column - 1.0,
            row: at.grid_row + option_row,
        };
        positions.push(position.clone());

        let option_rows = m.y_to_row(label.height).ceil();
        let (x, y) = m.grid_point(option_row, 0.0);
        options.push(
            Rectangle::new(x, y, m.grid_width(width), m.grid_height(option_rows))
                .child(option_bubble(1.0, bubble_column, position, m))
                .child(label),
        );
        rows_used += option_rows;
    }

    if contest.allow_write_ins {
        let extra_rows = (m.write_in_row_height - 1.0) / 2.0;
        for write_in_index in 0..contest.seats {
            let option_row = rows_used;

            // Floats just above the write-in line. At higher densities it is
            // shortened so it clears the "write-in" label.
            let position = GridPosition::WriteIn {
                sheet_number: at.sheet_number(),
                side: at.side(),
                contest_id: contest.id.clone(),
                write_in_index,
                column: at.grid_column + bubble_column - 1.0,
                row: at.grid_row + option_row,
                write_in_area: WriteInArea {
                    x: at.grid_column + label_column - 1.0,
                    y: at.grid_row + option_row - 0.25 - extra_rows,
                    width: width - 2.0,
                    height: 0.45 + extra_rows,
                },
            };
            positions.push(position.clone());

            let (x, y) = m.grid_point(option_row, 0.0);
            let (line_x, line_y) = m.grid_point(1.25, label_column);
            let (label_x, label_y) = m.grid_point(1.3, label_column);
            options.push(
                Rectangle::new(x, y, m.grid_width(width), m.grid_height(m.write_in_row_height))
                    .child(option_bubble(1.0, bubble_column, position, m))
                    .child(
                        Rectangle::new(
                            line_x,
                            line_y,
                            m.grid_width(width - 2.25),
                            m.write_in_row_height * 0.5,
                        )
                        .fill("black"),
                    )
                    .child(TextBox {
                        x: label_x,
                        y: label_y,
                        width: m.grid_width(width - 2.5),
                        height: m.grid_height(1.0),
                        text_lines: vec!["write-in".into()],
                        font: fonts.small,
                        align,
                    }),
            );
            rows_used += m.write_in_row_height;
        }
    }

    let write_in_padding = if contest.allow_write_ins {
        m.grid_height(2.0 - m.write_in_row_height)
    } else {
        0.0
    };
    let height = m.grid_height(heading_rows)
        + options.iter().map(|o| o.height).sum::<f64>()
        + write_in_padding
        + m.grid_height(0.5);

    (contest_box(width, height, heading, options, at, m), positions)
}

fn ballot_measure(ctx: ContestContext<'_>, contest: &YesNoContest, at: Placement) -> Rendered {
    let m = ctx.m;
    let fonts = &m.font_styles;
    let width = m.content_area_column_width;
    let inline = m.ballot_measure_option_position == OptionPosition::Inline;

    let heading = text_block(
        m.grid_point(m.contest_padding, m.contest_padding),
        m.grid_width(width - 2.0 * m.contest_padding - if inline { 2.0 } else { 0.0 }),
        &[
            TextGroup::new(&contest.title, fonts.h3),
            TextGroup::new(&contest.description, fonts.body),
        ],
        None,
    );
    let heading_rows = heading_row_height(&heading, m);

    let (bubble_column, label_column) = match (ctx.bubble_position, inline) {
        (BubblePosition::Left, true) => (width - 2.0, 3.75),
        (BubblePosition::Left, false) => (1.0, 3.75),
        (BubblePosition::Right, _) => (width - 1.0, 0.0),
    };
    let align = Some(ctx.bubble_position.text_align());

    let option_row_height = 1.0;
    let first_option_row = if inline {
        heading_rows - ((heading_rows + 1.0) / 2.0).ceil()
    } else {
        heading_rows
    };

    let mut positions = Vec::new();
    let mut options = Vec::new();
    for (index, choice) in [&contest.yes_option, &contest.no_option].into_iter().enumerate() {
        let option_row = first_option_row + index as f64 * option_row_height;
        let position = GridPosition::Option {
            sheet_number: at.sheet_number(),
            side: at.side(),
            contest_id: contest.id.clone(),
            option_id: choice.id.clone(),
            column: at.grid_column + bubble_column - 1.0,
            row: at.grid_row + option_row,
        };
        positions.push(position.clone());

        let (x, y) = m.grid_point(option_row, bubble_column - 3.0);
        let (label_x, label_y) = m.grid_point(0.7, label_column);
        options.push(
            Rectangle::new(x, y, m.grid_width(width), m.grid_height(option_row_height))
                .child(option_bubble(1.0, 3.0, position, m))
                .child(TextBox {
                    x: label_x,
                    y: label_y,
                    width: m.grid_width(2.25),
                    height: m.grid_height(1.0),
                    text_lines: vec![choice.label.clone()],
                    font: fonts.body.with_weight(FontWeight::Bold),
                    align,
                }),
        );
    }

    let options_height = options.iter().map(|o| o.height).sum::<f64>() + m.grid_height(1.0);
    let height = m.grid_height(heading_rows.max(m.y_to_row(options_height)))
        + if inline { 0.0 } else { options_height }
        + m.grid_height(0.5);

    (contest_box(width, height, heading, options, at, m), positions)
}

/// Outlined contest container with a heavy top rule.
fn contest_box(
    width: f64,
    height: f64,
    heading: Rectangle,
    options: Vec<Rectangle>,
    at: Placement,
    m: &Measurements,
) -> Rectangle {
    let (x, y) = m.grid_point(at.row, 0.0);
    let mut children = vec![top_border(m.grid_width(width)), heading.into()];
    children.extend(options.into_iter().map(Element::from));
    Rectangle::new(x, y, m.grid_width(width), height)
        .stroke("black", 0.5)
        .children(children)
}

/// Stack contests top to bottom in one column starting at an absolute grid point.
pub fn contest_column(
    ctx: ContestContext<'_>,
    contests: &[&Contest],
    grid_row: f64,
    grid_column: f64,
    page_number: u32,
) -> Rendered {
    let m = ctx.m;
    let mut positions = Vec::new();
    let mut rects: Vec<Rectangle> = Vec::new();
    let mut last_row = 0.0;

    for contest in contests {
        let (rect, contest_positions) = render_contest(
            ctx,
            contest,
            Placement {
                row: last_row + m.contest_row_margin,
                grid_row: grid_row + last_row + m.contest_row_margin,
                grid_column,
                page_number,
            },
        );
        last_row += m.y_to_row(rect.height) + m.contest_row_margin;
        rects.push(rect);
        positions.extend(contest_positions);
    }

    let (x, y) = m.grid_point(grid_row, grid_column);
    let width = rects.first().map_or(0.0, |r| r.width);
    let column = Rectangle::new(x, y, width, m.grid_height(last_row))
        .children(rects.into_iter().map(Element::from).collect());
    (column, positions)
}

/// Side-by-side contest columns that together fit in the contest area of a
/// page, e.g. three columns of candidate contests or one column of measures.
pub fn contest_columns_chunk(
    ctx: ContestContext<'_>,
    columns: &[Vec<&Contest>],
    height: f64,
    grid_row: f64,
    grid_column: f64,
    page_number: u32,
) -> Rendered {
    let m = ctx.m;
    let mut positions = Vec::new();
    let mut rects = Vec::new();
    let mut last_column = 0.0;

    for contests in columns {
        let (rect, column_positions) =
            contest_column(ctx, contests, grid_row, grid_column + last_column, page_number);
        last_column += m.x_to_column(rect.width) + m.gutter_width;
        rects.push(Element::from(rect));
        positions.extend(column_positions);
    }

    let chunk = Rectangle::new(0.0, 0.0, m.grid_width(last_column - m.gutter_width), height)
        .children(rects);
    (chunk, positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::fixtures;
    use crate::election::{BallotPaperSize, YesNoOption};
    use crate::layout::measurements::LayoutDensity;

    fn measurements(density: LayoutDensity) -> Measurements {
        Measurements::new(BallotPaperSize::Letter, density)
    }

    fn ctx<'a>(election: &'a Election, m: &'a Measurements, bubble_position: BubblePosition) -> ContestContext<'a> {
        ContestContext {
            election,
            bubble_position,
            m,
        }
    }

    fn at(page_number: u32) -> Placement {
        Placement {
            row: 0.4,
            grid_row: 10.0,
            grid_column: 2.0,
            page_number,
        }
    }

    #[test]
    fn test_candidate_contest_positions() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 3)]);
        let m = measurements(LayoutDensity::Default);
        let (rect, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Left), &election.contests[0], at(1));

        assert_eq!(positions.len(), 4);
        let candidates: Vec<_> = positions
            .iter()
            .filter(|p| matches!(p, GridPosition::Option { .. }))
            .collect();
        assert_eq!(candidates.len(), 3);
        for position in &positions {
            assert_eq!(position.sheet_number(), 1);
            assert_eq!(position.side(), Side::Front);
            assert_eq!(position.location().0, 2.0);
        }
        // One bubble row per candidate, each on its own grid row.
        let rows: Vec<f64> = positions.iter().map(|p| p.location().1).collect();
        assert!(rows.windows(2).all(|w| w[1] > w[0]));
        assert!(rows.iter().all(|r| r.fract() == 0.0));
        assert_eq!(rect.width, m.grid_width(m.contest_column_width));
    }

    #[test]
    fn test_candidate_contest_write_ins_per_seat() {
        let election = fixtures::election(vec![fixtures::candidate_contest("council", "d1", 3, 4)]);
        let m = measurements(LayoutDensity::Medium);
        let (rect, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Left), &election.contests[0], at(2));

        let write_ins: Vec<u32> = positions
            .iter()
            .filter_map(|p| match p {
                GridPosition::WriteIn { write_in_index, write_in_area, .. } => {
                    assert!((write_in_area.height - 0.45).abs() < 1e-9);
                    Some(*write_in_index)
                }
                _ => None,
            })
            .collect();
        assert_eq!(write_ins, vec![0, 1, 2]);
        assert!(positions.iter().all(|p| p.side() == Side::Back));
        assert!(positions.iter().all(|p| p.sheet_number() == 1));
        let bubbles = Element::from(rect)
            .descendants()
            .filter(|e| matches!(e, Element::Bubble(_)))
            .count();
        assert_eq!(bubbles, 7);
    }

    #[test]
    fn test_right_bubbles_move_to_last_column() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 1, 2)]);
        let m = measurements(LayoutDensity::Default);
        let (_, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Right), &election.contests[0], at(1));
        let expected = 2.0 + m.contest_column_width - 1.0 - 1.0;
        assert!(positions.iter().all(|p| p.location().0 == expected));
    }

    #[test]
    fn test_height_does_not_depend_on_placement() {
        let election = fixtures::election(vec![fixtures::candidate_contest("mayor", "d1", 2, 5)]);
        let m = measurements(LayoutDensity::Default);
        let c = ctx(&election, &m, BubblePosition::Left);
        let (measured, _) = render_contest(c, &election.contests[0], Placement::ORIGIN);
        let (placed, _) = render_contest(c, &election.contests[0], at(3));
        assert_eq!(measured.height, placed.height);
    }

    #[test]
    fn test_ballot_measure_block_options() {
        let election = fixtures::election(vec![fixtures::measure("m1", "d1")]);
        let m = measurements(LayoutDensity::Default);
        let (rect, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Left), &election.contests[0], at(1));
        assert_eq!(positions.len(), 2);
        let (yes, no) = (positions[0].location(), positions[1].location());
        assert_eq!(yes.0, 2.0);
        assert_eq!(no.1, yes.1 + 1.0);
        assert_eq!(rect.width, m.grid_width(m.content_area_column_width));
    }

    #[test]
    fn test_ballot_measure_inline_options() {
        let election = fixtures::election(vec![fixtures::measure("m1", "d1")]);
        let m = measurements(LayoutDensity::Condensed);
        let (_, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Left), &election.contests[0], at(1));
        // Inline options sit at the right edge beside the description.
        let expected_column = 2.0 + m.content_area_column_width - 2.0 - 1.0;
        assert!(positions.iter().all(|p| p.location().0 == expected_column));
    }

    #[test]
    fn test_ballot_measure_option_ids() {
        let contest = Contest::YesNo(YesNoContest {
            id: "prop-1".into(),
            district_id: "d1".into(),
            title: "Proposition 1".into(),
            description: "Shall the town build a library?".into(),
            yes_option: YesNoOption { id: "prop-1-for".into(), label: "For".into() },
            no_option: YesNoOption { id: "prop-1-against".into(), label: "Against".into() },
        });
        let election = fixtures::election(vec![contest]);
        let m = measurements(LayoutDensity::Default);
        let (_, positions) =
            render_contest(ctx(&election, &m, BubblePosition::Left), &election.contests[0], at(1));
        let ids: Vec<&str> = positions
            .iter()
            .filter_map(|p| match p {
                GridPosition::Option { option_id, .. } => Some(option_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["prop-1-for", "prop-1-against"]);
    }

    #[test]
    fn test_contest_column_stacks_with_margins() {
        let election = fixtures::election(vec![
            fixtures::candidate_contest("a", "d1", 1, 2),
            fixtures::candidate_contest("b", "d1", 1, 2),
        ]);
        let m = measurements(LayoutDensity::Default);
        let c = ctx(&election, &m, BubblePosition::Left);
        let contests: Vec<&Contest> = election.contests.iter().collect();
        let (column, _) = contest_column(c, &contests, 8.0, 2.0, 1);
        let (single, _) = render_contest(c, contests[0], Placement::ORIGIN);
        let expected = 2.0 * (single.height + m.grid_height(m.contest_row_margin));
        assert!((column.height - expected).abs() < 1e-6);
        assert_eq!(column.children.len(), 2);
    }

    #[test]
    fn test_columns_chunk_offsets_columns() {
        let election = fixtures::election(vec![
            fixtures::candidate_contest("a", "d1", 1, 2),
            fixtures::candidate_contest("b", "d1", 1, 2),
        ]);
        let m = measurements(LayoutDensity::Default);
        let c = ctx(&election, &m, BubblePosition::Left);
        let columns = vec![vec![&election.contests[0]], vec![&election.contests[1]]];
        let (chunk, positions) = contest_columns_chunk(c, &columns, 100.0, 8.0, 2.0, 1);
        assert_eq!(chunk.height, 100.0);
        let a = positions.iter().find(|p| p.contest_id() == "a").unwrap().location().0;
        let b = positions.iter().find(|p| p.contest_id() == "b").unwrap().location().0;
        assert!((b - a - (m.contest_column_width + m.gutter_width)).abs() < 1e-9);
    }
}
