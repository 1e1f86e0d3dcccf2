//! # Election Model
//!
//! Read-only election definition consumed by the layout engine. The model is
//! validated upstream; this module only carries the data and the lookups the
//! layout needs.
//!
//! ```
//! use hmpb_layout::election::Election;
//!
//! let json = r#"{
//!     "title": "General Election",
//!     "type": "general",
//!     "date": "2024-11-05",
//!     "county": {"id": "franklin", "name": "Franklin County"},
//!     "state": "State of Hamilton",
//!     "parties": [],
//!     "districts": [{"id": "d1", "name": "District 1"}],
//!     "precincts": [{"id": "p1", "name": "Precinct 1"}],
//!     "ballotStyles": [{"id": "1", "precincts": ["p1"], "districts": ["d1"]}],
//!     "contests": [],
//!     "ballotLayout": {"paperSize": "letter"}
//! }"#;
//! let election: Election = serde_json::from_str(json).unwrap();
//! assert_eq!(election.precinct_by_id("p1").unwrap().name, "Precinct 1");
//! ```

mod definition;
mod grid;

pub use definition::ElectionDefinition;
pub use grid::{GridLayout, GridPosition, OptionBounds, Side, WriteInArea};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Election type. Primaries print the ballot style's party in the header and
/// omit candidate party labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionType {
    General,
    Primary,
}

/// Supported ballot paper sizes. All are 8.5 inches wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallotPaperSize {
    #[serde(rename = "letter")]
    Letter,
    #[serde(rename = "legal")]
    Legal,
    #[serde(rename = "custom-8.5x17")]
    Custom17,
    #[serde(rename = "custom-8.5x18")]
    Custom18,
    #[serde(rename = "custom-8.5x21")]
    Custom21,
    #[serde(rename = "custom-8.5x22")]
    Custom22,
}

/// Physical paper dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperDimensions {
    pub width: f64,
    pub height: f64,
}

impl BallotPaperSize {
    pub const ALL: [BallotPaperSize; 6] = [
        BallotPaperSize::Letter,
        BallotPaperSize::Legal,
        BallotPaperSize::Custom17,
        BallotPaperSize::Custom18,
        BallotPaperSize::Custom21,
        BallotPaperSize::Custom22,
    ];

    /// Paper dimensions in inches.
    pub fn dimensions(self) -> PaperDimensions {
        let height = match self {
            BallotPaperSize::Letter => 11.0,
            BallotPaperSize::Legal => 14.0,
            BallotPaperSize::Custom17 => 17.0,
            BallotPaperSize::Custom18 => 18.0,
            BallotPaperSize::Custom21 => 21.0,
            BallotPaperSize::Custom22 => 22.0,
        };
        PaperDimensions { width: 8.5, height }
    }
}

/// How the ballot will be cast. Affects the header title and the metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotType {
    #[default]
    Precinct,
    Absentee,
    Provisional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotLayoutSettings {
    pub paper_size: BallotPaperSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub abbrev: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precinct {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotStyle {
    pub id: String,
    pub precincts: Vec<String>,
    pub districts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub party_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateContest {
    pub id: String,
    pub district_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_id: Option<String>,
    pub title: String,
    pub seats: u32,
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub allow_write_ins: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YesNoContest {
    pub id: String,
    pub district_id: String,
    pub title: String,
    pub description: String,
    pub yes_option: YesNoOption,
    pub no_option: YesNoOption,
}

/// A contest on the ballot, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Contest {
    Candidate(CandidateContest),
    #[serde(rename = "yesno")]
    YesNo(YesNoContest),
}

impl Contest {
    pub fn id(&self) -> &str {
        match self {
            Contest::Candidate(c) => &c.id,
            Contest::YesNo(c) => &c.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Contest::Candidate(c) => &c.title,
            Contest::YesNo(c) => &c.title,
        }
    }

    pub fn district_id(&self) -> &str {
        match self {
            Contest::Candidate(c) => &c.district_id,
            Contest::YesNo(c) => &c.district_id,
        }
    }

    /// Ballot measures never belong to a party.
    pub fn party_id(&self) -> Option<&str> {
        match self {
            Contest::Candidate(c) => c.party_id.as_deref(),
            Contest::YesNo(_) => None,
        }
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, Contest::Candidate(_))
    }
}

/// The full election definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub title: String,
    #[serde(rename = "type")]
    pub election_type: ElectionType,
    pub date: NaiveDate,
    pub county: County,
    pub state: String,
    /// Inline SVG markup for the jurisdiction seal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal: Option<String>,
    pub parties: Vec<Party>,
    pub districts: Vec<District>,
    pub precincts: Vec<Precinct>,
    pub ballot_styles: Vec<BallotStyle>,
    pub contests: Vec<Contest>,
    pub ballot_layout: BallotLayoutSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_layouts: Option<Vec<GridLayout>>,
}

impl Election {
    /// Contests that appear on a ballot style: the contest's district must be
    /// one of the style's districts and its party must match the style's party.
    pub fn contests_for_ballot_style<'a>(&'a self, ballot_style: &BallotStyle) -> Vec<&'a Contest> {
        self.contests
            .iter()
            .filter(|contest| {
                ballot_style
                    .districts
                    .iter()
                    .any(|d| d == contest.district_id())
                    && ballot_style.party_id.as_deref() == contest.party_id()
            })
            .collect()
    }

    pub fn precinct_by_id(&self, precinct_id: &str) -> Option<&Precinct> {
        self.precincts.iter().find(|p| p.id == precinct_id)
    }

    pub fn precinct_index(&self, precinct_id: &str) -> Option<usize> {
        self.precincts.iter().position(|p| p.id == precinct_id)
    }

    pub fn ballot_style_index(&self, ballot_style_id: &str) -> Option<usize> {
        self.ballot_styles.iter().position(|b| b.id == ballot_style_id)
    }

    pub fn party_by_id(&self, party_id: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.id == party_id)
    }

    /// The party a primary ballot style belongs to.
    pub fn party_for_ballot_style(&self, ballot_style: &BallotStyle) -> Result<&Party, LayoutError> {
        ballot_style
            .party_id
            .as_deref()
            .and_then(|id| self.party_by_id(id))
            .ok_or_else(|| LayoutError::UnknownParty(ballot_style.id.clone()))
    }

    /// Party label printed under a candidate's name, e.g. "Democrat, Liberal".
    /// Returns `None` for candidates without known parties.
    pub fn candidate_parties_description(&self, candidate: &Candidate) -> Option<String> {
        let names: Vec<&str> = candidate
            .party_ids
            .iter()
            .filter_map(|id| self.party_by_id(id))
            .map(|party| party.name.as_str())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn candidate(id: &str, name: &str, party_ids: &[&str]) -> Candidate {
        Candidate {
            id: id.into(),
            name: name.into(),
            party_ids: party_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn candidate_contest(id: &str, district_id: &str, seats: u32, candidates: usize) -> Contest {
        Contest::Candidate(CandidateContest {
            id: id.into(),
            district_id: district_id.into(),
            party_id: None,
            title: format!("Contest {id}"),
            seats,
            candidates: (0..candidates)
                .map(|i| candidate(&format!("{id}-c{i}"), &format!("Candidate {i}"), &["dem"]))
                .collect(),
            allow_write_ins: true,
            term_description: None,
        })
    }

    pub fn measure(id: &str, district_id: &str) -> Contest {
        Contest::YesNo(YesNoContest {
            id: id.into(),
            district_id: district_id.into(),
            title: format!("Measure {id}"),
            description: "Shall the measure be adopted?".into(),
            yes_option: YesNoOption { id: format!("{id}-yes"), label: "Yes".into() },
            no_option: YesNoOption { id: format!("{id}-no"), label: "No".into() },
        })
    }

    pub fn election(contests: Vec<Contest>) -> Election {
        Election {
            title: "General Election".into(),
            election_type: ElectionType::General,
            date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
            county: County { id: "franklin".into(), name: "Franklin County".into() },
            state: "State of Hamilton".into(),
            seal: None,
            parties: vec![Party {
                id: "dem".into(),
                name: "Democrat".into(),
                full_name: "Democratic Party".into(),
                abbrev: "D".into(),
            }],
            districts: vec![District { id: "d1".into(), name: "District 1".into() }],
            precincts: vec![
                Precinct { id: "p1".into(), name: "Precinct 1".into() },
                Precinct { id: "p2".into(), name: "Precinct 2".into() },
            ],
            ballot_styles: vec![BallotStyle {
                id: "1".into(),
                precincts: vec!["p1".into(), "p2".into()],
                districts: vec!["d1".into()],
                party_id: None,
            }],
            contests,
            ballot_layout: BallotLayoutSettings { paper_size: BallotPaperSize::Letter },
            grid_layouts: None,
        }
    }
}
