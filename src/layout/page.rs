//! Page furniture: timing marks, header and instructions, footer, QR code.

use super::contests::top_border;
use super::measurements::{Measurements, PPI};
use super::options::{BallotMode, CustomContent};
use super::text::{TextGroup, text_block, text_width};
use crate::document::{Element, FontWeight, Image, ImageSource, Rectangle, TextAlign, TextBox};
use crate::election::{BallotStyle, BallotType, Election, ElectionType, Precinct};
use crate::error::LayoutError;
use crate::metadata::{BallotPageMetadata, MetadataEncoder, QrCodeData};

const INSTRUCTIONS_BACKGROUND: &str = "#ededed";

/// Everything about the ballot being laid out that page furniture depends on.
#[derive(Clone, Copy)]
pub struct BallotContext<'a> {
    pub election: &'a Election,
    pub ballot_style: &'a BallotStyle,
    pub precinct: &'a Precinct,
    pub ballot_type: BallotType,
    pub ballot_mode: BallotMode,
    pub custom_content: &'a CustomContent,
    pub m: &'a Measurements,
}

fn image(x: f64, y: f64, width: f64, height: f64, source: ImageSource) -> Element {
    Image {
        x,
        y,
        width,
        height,
        source,
    }
    .into()
}

fn timing_mark(row: f64, column: f64, m: &Measurements) -> Element {
    let width = 0.1875 * PPI;
    let height = 0.0625 * PPI;
    let (x, y) = m.grid_point(row, column);
    Rectangle::new(x - width / 2.0, y - height / 2.0, width, height)
        .fill("black")
        .into()
}

/// Marks along all four edges at every grid row and column. The scanner
/// locates these to establish the grid.
pub fn timing_mark_grid(m: &Measurements) -> Rectangle {
    let rows = f64::from(m.grid.rows);
    let columns = f64::from(m.grid.columns);
    let mut marks = Vec::new();
    for column in 1..=m.grid.columns {
        marks.push(timing_mark(1.0, f64::from(column), m));
    }
    for column in 1..=m.grid.columns {
        marks.push(timing_mark(rows, f64::from(column), m));
    }
    for row in 1..=m.grid.rows {
        marks.push(timing_mark(f64::from(row), 1.0, m));
    }
    for row in 1..=m.grid.rows {
        marks.push(timing_mark(f64::from(row), columns, m));
    }
    Rectangle::new(0.0, 0.0, m.document_width, m.document_height).children(marks)
}

fn ballot_title(ctx: &BallotContext<'_>) -> Result<String, LayoutError> {
    let ballot_type = match ctx.ballot_type {
        BallotType::Precinct => "",
        BallotType::Absentee => " Absentee",
        BallotType::Provisional => " Provisional",
    };
    let party = match ctx.election.election_type {
        ElectionType::Primary => format!(
            " • {}",
            ctx.election.party_for_ballot_style(ctx.ballot_style)?.full_name
        ),
        ElectionType::General => String::new(),
    };
    Ok(format!("{}{} Ballot{}", ctx.ballot_mode.label(), ballot_type, party))
}

fn clerk_signature_block(ctx: &BallotContext<'_>, signature: &str, column_width: f64) -> Rectangle {
    let m = ctx.m;
    let row_height = m.header_row_height - m.header_row_height / 4.0;
    let (x, y) = m.grid_point(
        (m.header_row_height - 0.25 - row_height) / 2.0,
        m.content_area_column_width - column_width - 0.5,
    );
    let caption = ctx
        .custom_content
        .clerk_signature_caption
        .clone()
        .unwrap_or_default();
    Rectangle::new(x, y, m.grid_width(column_width), m.grid_height(row_height))
        .child(image(
            0.0,
            0.0,
            m.grid_width(column_width),
            m.grid_height(row_height - 0.5),
            ImageSource::Contents(signature.to_string()),
        ))
        .child(text_block(
            m.grid_point(row_height - 0.5, 0.0),
            m.grid_width(column_width),
            &[TextGroup::new(caption, m.font_styles.body)],
            Some(TextAlign::Center),
        ))
}

fn header(ctx: &BallotContext<'_>) -> Result<Rectangle, LayoutError> {
    let m = ctx.m;
    let fonts = &m.font_styles;
    let seal_row_height = m.header_row_height - 0.5;

    let signature = ctx.custom_content.clerk_signature_image.as_deref();
    let signature_column_width = if signature.is_some() { 6.5 } else { 0.0 };

    let election_title = ctx
        .custom_content
        .election_title
        .as_deref()
        .unwrap_or(&ctx.election.title);
    let date = ctx.election.date.format("%B %-d, %Y");
    let location = [
        ctx.precinct.name.as_str(),
        ctx.election.county.name.as_str(),
        ctx.election.state.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    let title_block = text_block(
        m.grid_point(m.header_row_height / 15.0, seal_row_height + 1.5),
        m.grid_width(m.content_area_column_width - 1.0 - signature_column_width),
        &[
            TextGroup::new(
                ballot_title(ctx)?,
                fonts.h1.with_line_height(fonts.h1.line_height * 0.85),
            ),
            TextGroup::new(format!("{election_title} • {date}"), fonts.h3),
            TextGroup::new(location, fonts.body),
        ],
        None,
    );

    let mut rect = Rectangle::new(
        0.0,
        0.0,
        m.grid_width(m.content_area_column_width),
        m.grid_height(m.header_row_height),
    )
    .child(title_block);
    if let Some(seal) = &ctx.election.seal {
        let (x, y) = m.grid_point((m.header_row_height - 0.25 - seal_row_height) / 2.0, 0.5);
        rect = rect.child(image(
            x,
            y,
            m.grid_width(seal_row_height),
            m.grid_height(seal_row_height),
            ImageSource::Contents(seal.clone()),
        ));
    }
    if let Some(signature) = signature {
        rect = rect.child(clerk_signature_block(ctx, signature, signature_column_width));
    }
    Ok(rect)
}

fn instructions(m: &Measurements) -> Rectangle {
    let fonts = &m.font_styles;
    let small_bold = fonts.small.with_weight(FontWeight::Bold);
    let (x, y) = m.grid_point(m.header_row_height, 0.0);
    let (fill_x, fill_y) = m.grid_point((m.instructions_row_height - 2.0) / 2.0, 7.5);
    let (write_in_x, write_in_y) = m.grid_point((m.instructions_row_height - 1.5) / 2.0, 25.5);

    Rectangle::new(
        x,
        y,
        m.grid_width(m.content_area_column_width),
        m.grid_height(m.instructions_row_height),
    )
    .stroke("black", 0.5)
    .fill(INSTRUCTIONS_BACKGROUND)
    .child(top_border(m.grid_width(m.content_area_column_width)))
    .child(text_block(
        m.grid_point(0.25, 0.5),
        m.grid_width(7.5),
        &[
            TextGroup::new("Instructions", fonts.h3),
            TextGroup::new("To Vote:", small_bold),
            TextGroup::new(
                "To vote, completely fill in the oval next to your choice.",
                fonts.small,
            ),
        ],
        None,
    ))
    .child(image(
        fill_x,
        fill_y,
        m.grid_width(5.0),
        m.grid_height(2.0),
        ImageSource::Href("/images/instructions-fill-oval.svg".into()),
    ))
    .child(text_block(
        m.grid_point(0.5, 13.0),
        m.grid_width(13.0),
        &[
            TextGroup::new("To Vote for a Write-In:", small_bold),
            TextGroup::new(
                "To vote for a person whose name is not on the ballot, write the person’s name on the \"write-in\" line and completely fill in the oval next to the line.",
                fonts.small,
            ),
        ],
        None,
    ))
    .child(image(
        write_in_x,
        write_in_y,
        m.grid_width(5.0),
        m.grid_height(1.5),
        ImageSource::Href("/images/instructions-write-in.svg".into()),
    ))
}

/// Header and voting instructions. Only front (odd) pages get them.
pub fn header_and_instructions(
    ctx: &BallotContext<'_>,
    page_number: u32,
) -> Result<Option<Rectangle>, LayoutError> {
    if page_number % 2 == 0 {
        return Ok(None);
    }
    let m = ctx.m;
    let (x, y) = m.grid_point(m.timing_marks_row_height, 2.0);
    Ok(Some(
        Rectangle::new(
            x,
            y,
            m.grid_width(m.content_area_column_width),
            m.grid_height(m.header_and_instructions_row_height),
        )
        .child(header(ctx)?)
        .child(instructions(m)),
    ))
}

fn qr_code(x: f64, y: f64, width: f64, height: f64, data: &QrCodeData) -> Rectangle {
    let module_size = width / data.len() as f64 + 0.1;
    let mut modules: Vec<Element> = Vec::new();
    for (column, column_data) in data.iter().enumerate() {
        for (row, &dark) in column_data.iter().enumerate() {
            modules.push(
                Rectangle::new(
                    x + column as f64 * module_size,
                    y + row as f64 * module_size,
                    module_size,
                    module_size,
                )
                .fill(if dark { "black" } else { "white" })
                .into(),
            );
        }
    }
    Rectangle::new(x, y, width, height).children(modules)
}

/// Outline standing in for the QR code on sample ballots.
fn placeholder_qr_code(x: f64, y: f64, width: f64, height: f64) -> Rectangle {
    Rectangle::new(x, y, width, height).stroke("black", 1.0)
}

/// Page-number text and end-of-page instruction inside the footer.
fn footer_text(m: &Measurements, page_number: u32, total_pages: u32) -> Vec<Element> {
    let h3 = m.font_styles.h3;
    let text_row = m.footer_row_height / 2.0 - m.y_to_row(h3.font_size + 2.0) / 2.0;

    let mut children = vec![
        text_block(
            m.grid_point(m.footer_row_height / 8.0, 0.5),
            m.grid_width(5.0),
            &[
                TextGroup::new("Page", m.font_styles.small),
                TextGroup::new(format!("{page_number}/{total_pages}"), m.font_styles.h2),
            ],
            None,
        )
        .into(),
    ];

    if page_number == total_pages {
        let text = "You have completed voting.";
        let width = text_width(text, &h3);
        let (x, y) = m.grid_point(
            text_row,
            m.content_area_column_width - m.footer_row_height - m.x_to_column(width) - 0.5,
        );
        children.push(
            TextBox {
                x,
                y,
                width: width + 10.0,
                height: m.grid_height(m.footer_row_height),
                text_lines: vec![text.into()],
                font: h3,
                align: None,
            }
            .into(),
        );
    } else {
        let text = if page_number % 2 == 1 {
            "Turn ballot over and continue voting"
        } else {
            "Continue voting on next ballot"
        };
        let width = text_width(text, &h3);
        let (x, y) = m.grid_point(
            text_row,
            m.content_area_column_width - m.footer_row_height - m.x_to_column(width) - 3.0,
        );
        children.push(
            TextBox {
                x,
                y,
                width: width + 5.0,
                height: m.grid_height(m.footer_row_height),
                text_lines: vec![text.into()],
                font: h3,
                align: Some(TextAlign::Right),
            }
            .into(),
        );
        let arrow_height = m.footer_row_height - 0.75;
        let (arrow_x, arrow_y) = m.grid_point(
            (m.footer_row_height - arrow_height) / 2.0,
            m.content_area_column_width - m.footer_row_height - 2.0,
        );
        children.push(image(
            arrow_x,
            arrow_y,
            m.grid_width(arrow_height),
            m.grid_height(arrow_height),
            ImageSource::Href("/images/arrow-right-circle.svg".into()),
        ));
    }
    children
}

/// Footer with the page's QR code. Needs the final page count, so it is
/// attached only after all pages are laid out.
pub fn footer(
    ctx: &BallotContext<'_>,
    page_number: u32,
    total_pages: u32,
    election_hash: Option<&str>,
    encoder: &dyn MetadataEncoder,
) -> Result<Rectangle, LayoutError> {
    let m = ctx.m;
    let qr_size = (m.grid_width(m.footer_row_height), m.grid_height(m.footer_row_height));
    let qr: Rectangle = match ctx.ballot_mode {
        BallotMode::Sample => placeholder_qr_code(0.0, 0.0, qr_size.0, qr_size.1),
        _ => {
            let data = match election_hash {
                Some(election_hash) => encoder.encode_metadata(
                    ctx.election,
                    &BallotPageMetadata {
                        election_hash: election_hash.to_string(),
                        precinct_id: ctx.precinct.id.clone(),
                        ballot_style_id: ctx.ballot_style.id.clone(),
                        page_number,
                        ballot_type: ctx.ballot_type,
                        is_test_mode: ctx.ballot_mode.is_test_mode(),
                    },
                )?,
                None => encoder.encode_empty()?,
            };
            qr_code(0.0, 0.0, qr_size.0, qr_size.1, &data)
        }
    };

    let inner_width = m.grid_width(m.content_area_column_width - m.footer_row_height - 0.5);
    let (inner_x, inner_y) = m.grid_point(0.0, m.footer_row_height + 0.5);
    let mut inner_children = vec![top_border(inner_width)];
    inner_children.extend(footer_text(m, page_number, total_pages));
    let inner = Rectangle::new(inner_x, inner_y, inner_width, m.grid_height(m.footer_row_height))
        .fill(INSTRUCTIONS_BACKGROUND)
        .stroke("black", 0.5)
        .children(inner_children);

    let (x, y) = m.grid_point(
        m.timing_marks_row_height + m.content_area_row_height - m.footer_row_height,
        2.0,
    );
    Ok(Rectangle::new(
        x,
        y,
        m.grid_width(m.content_area_column_width),
        m.grid_height(m.footer_row_height),
    )
    .child(qr)
    .child(inner))
}

/// Centered placeholder for a page that received no contests.
pub fn blank_page_message(m: &Measurements, header_rows: f64, contests_rows: f64) -> TextBox {
    let text = "This page intentionally left blank.";
    let width = text_width(text, &m.font_styles.h2);
    let (x, y) = m.grid_point(
        m.timing_marks_row_height + header_rows + contests_rows / 2.0,
        f64::from(m.grid.columns) / 2.0 - m.x_to_column(width) / 2.0,
    );
    TextBox {
        x,
        y,
        width,
        height: m.grid_height(2.0),
        text_lines: vec![text.into()],
        font: m.font_styles.h2,
        align: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::{BallotPaperSize, fixtures};
    use crate::layout::measurements::LayoutDensity;
    use crate::metadata::QrMetadataEncoder;

    fn texts(element: &Element) -> Vec<String> {
        element
            .descendants()
            .filter_map(|e| match e {
                Element::TextBox(t) => Some(t.text_lines.join(" ")),
                _ => None,
            })
            .collect()
    }

    fn with_ctx<R>(
        election: &Election,
        mode: BallotMode,
        content: &CustomContent,
        f: impl FnOnce(&BallotContext<'_>) -> R,
    ) -> R {
        let m = Measurements::new(BallotPaperSize::Letter, LayoutDensity::Default);
        let ctx = BallotContext {
            election,
            ballot_style: &election.ballot_styles[0],
            precinct: &election.precincts[0],
            ballot_type: BallotType::Absentee,
            ballot_mode: mode,
            custom_content: content,
            m: &m,
        };
        f(&ctx)
    }

    #[test]
    fn test_timing_mark_count() {
        let m = Measurements::new(BallotPaperSize::Letter, LayoutDensity::Default);
        let grid = timing_mark_grid(&m);
        assert_eq!(grid.children.len(), 2 * 34 + 2 * 41);
    }

    #[test]
    fn test_header_only_on_front_pages() {
        let election = fixtures::election(vec![]);
        with_ctx(&election, BallotMode::Official, &CustomContent::default(), |ctx| {
            assert!(header_and_instructions(ctx, 1).unwrap().is_some());
            assert!(header_and_instructions(ctx, 2).unwrap().is_none());
            assert!(header_and_instructions(ctx, 3).unwrap().is_some());
        });
    }

    #[test]
    fn test_header_text() {
        let election = fixtures::election(vec![]);
        with_ctx(&election, BallotMode::Test, &CustomContent::default(), |ctx| {
            let header: Element = header_and_instructions(ctx, 1).unwrap().unwrap().into();
            let lines = texts(&header);
            assert!(lines.contains(&"Test Absentee Ballot".to_string()));
            assert!(lines.contains(&"General Election • November 5, 2024".to_string()));
            assert!(lines.contains(&"Precinct 1, Franklin County, State of Hamilton".to_string()));
        });
    }

    #[test]
    fn test_header_custom_content() {
        let election = fixtures::election(vec![]);
        let content = CustomContent {
            election_title: Some("Annual Town Meeting".into()),
            clerk_signature_image: Some("<svg></svg>".into()),
            clerk_signature_caption: Some("Town Clerk".into()),
        };
        with_ctx(&election, BallotMode::Official, &content, |ctx| {
            let header: Element = header_and_instructions(ctx, 1).unwrap().unwrap().into();
            let lines = texts(&header);
            assert!(lines.iter().any(|l| l.starts_with("Annual Town Meeting • ")));
            assert!(lines.contains(&"Town Clerk".to_string()));
            assert!(header.descendants().any(|e| matches!(
                e,
                Element::Image(Image { source: ImageSource::Contents(svg), .. }) if svg == "<svg></svg>"
            )));
        });
    }

    #[test]
    fn test_primary_header_requires_party() {
        let mut election = fixtures::election(vec![]);
        election.election_type = ElectionType::Primary;
        with_ctx(&election, BallotMode::Official, &CustomContent::default(), |ctx| {
            assert!(matches!(
                header_and_instructions(ctx, 1),
                Err(LayoutError::UnknownParty(_))
            ));
        });
        election.ballot_styles[0].party_id = Some("dem".into());
        with_ctx(&election, BallotMode::Official, &CustomContent::default(), |ctx| {
            let header: Element = header_and_instructions(ctx, 1).unwrap().unwrap().into();
            assert!(texts(&header).contains(&"Official Absentee Ballot • Democratic Party".to_string()));
        });
    }

    #[test]
    fn test_footer_end_of_page_text() {
        let election = fixtures::election(vec![]);
        with_ctx(&election, BallotMode::Official, &CustomContent::default(), |ctx| {
            let page = |n| Element::from(footer(ctx, n, 4, None, &QrMetadataEncoder).unwrap());
            assert!(texts(&page(1)).contains(&"Turn ballot over and continue voting".to_string()));
            assert!(texts(&page(2)).contains(&"Continue voting on next ballot".to_string()));
            assert!(texts(&page(4)).contains(&"You have completed voting.".to_string()));
            assert!(texts(&page(4)).contains(&"4/4".to_string()));
        });
    }

    #[test]
    fn test_sample_footer_has_placeholder_qr() {
        let election = fixtures::election(vec![]);
        with_ctx(&election, BallotMode::Sample, &CustomContent::default(), |ctx| {
            let footer = footer(ctx, 1, 2, Some("not-even-hex"), &QrMetadataEncoder).unwrap();
            match &footer.children[0] {
                Element::Rectangle(qr) => {
                    assert!(qr.children.is_empty());
                    assert_eq!(qr.stroke.as_deref(), Some("black"));
                }
                other => panic!("expected placeholder, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_footer_geometry_ignores_hash() {
        let election = fixtures::election(vec![]);
        let hash = "ab".repeat(32);
        with_ctx(&election, BallotMode::Official, &CustomContent::default(), |ctx| {
            let without = footer(ctx, 1, 2, None, &QrMetadataEncoder).unwrap();
            let with = footer(ctx, 1, 2, Some(hash.as_str()), &QrMetadataEncoder).unwrap();
            assert_eq!((without.x, without.y, without.height), (with.x, with.y, with.height));
        });
    }
}
