//! # HMPB Layout CLI
//!
//! Command-line interface for laying out hand-marked paper ballots.
//!
//! ## Usage
//!
//! ```bash
//! # Lay out every ballot style of an election
//! hmpb-layout layout election.json --out ballots/
//!
//! # Test ballots with bubbles on the right, condensed
//! hmpb-layout layout election.json --out ballots/ --ballot-mode test \
//!     --bubble-position right --density 2
//!
//! # Per-ballot-style header overrides
//! hmpb-layout layout election.json --out ballots/ --custom-content custom.json
//! ```
//!
//! Writes `election.json` (the election definition with grid layouts, whose
//! SHA-256 is the election hash) and one `ballot-<style>-<precinct>.json`
//! document per ballot style and precinct. Set `RUST_LOG=debug` to follow
//! page-by-page progress.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hmpb_layout::{
    LayoutError,
    election::{BallotType, Election},
    layout::{
        AllBallotStylesParams, BallotMode, BubblePosition, CustomContentByBallotStyle,
        LayoutDensity, LayoutOptions, lay_out_all_ballot_styles,
    },
    metadata::QrMetadataEncoder,
};

/// hmpb-layout - Hand-marked paper ballot layout
#[derive(Parser, Debug)]
#[command(name = "hmpb-layout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out all ballots for an election
    Layout {
        /// Election JSON file
        election: PathBuf,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        out: PathBuf,

        /// How the ballots will be cast
        #[arg(long, value_enum, default_value = "precinct")]
        ballot_type: BallotTypeArg,

        /// Official, test or sample ballots
        #[arg(long, value_enum, default_value = "official")]
        ballot_mode: BallotModeArg,

        /// Side of the option text the bubbles go on
        #[arg(long, value_enum, default_value = "left")]
        bubble_position: BubblePositionArg,

        /// Layout density, 0 (roomiest) to 2 (most condensed)
        #[arg(long, value_enum, default_value = "0")]
        density: DensityArg,

        /// JSON map of ballot style id to custom header content
        #[arg(long, value_name = "FILE")]
        custom_content: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BallotTypeArg {
    Precinct,
    Absentee,
    Provisional,
}

impl From<BallotTypeArg> for BallotType {
    fn from(arg: BallotTypeArg) -> Self {
        match arg {
            BallotTypeArg::Precinct => BallotType::Precinct,
            BallotTypeArg::Absentee => BallotType::Absentee,
            BallotTypeArg::Provisional => BallotType::Provisional,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BallotModeArg {
    Official,
    Test,
    Sample,
}

impl From<BallotModeArg> for BallotMode {
    fn from(arg: BallotModeArg) -> Self {
        match arg {
            BallotModeArg::Official => BallotMode::Official,
            BallotModeArg::Test => BallotMode::Test,
            BallotModeArg::Sample => BallotMode::Sample,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BubblePositionArg {
    Left,
    Right,
}

impl From<BubblePositionArg> for BubblePosition {
    fn from(arg: BubblePositionArg) -> Self {
        match arg {
            BubblePositionArg::Left => BubblePosition::Left,
            BubblePositionArg::Right => BubblePosition::Right,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DensityArg {
    #[value(name = "0")]
    Default,
    #[value(name = "1")]
    Medium,
    #[value(name = "2")]
    Condensed,
}

impl From<DensityArg> for LayoutDensity {
    fn from(arg: DensityArg) -> Self {
        match arg {
            DensityArg::Default => LayoutDensity::Default,
            DensityArg::Medium => LayoutDensity::Medium,
            DensityArg::Condensed => LayoutDensity::Condensed,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LayoutError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout {
            election,
            out,
            ballot_type,
            ballot_mode,
            bubble_position,
            density,
            custom_content,
        } => {
            let election: Election = read_json(&election)?;
            let custom_content: CustomContentByBallotStyle = match custom_content {
                Some(path) => read_json(&path)?,
                None => CustomContentByBallotStyle::new(),
            };
            let result = lay_out_all_ballot_styles(&AllBallotStylesParams {
                election: &election,
                ballot_type: ballot_type.into(),
                ballot_mode: ballot_mode.into(),
                layout_options: LayoutOptions {
                    bubble_position: bubble_position.into(),
                    layout_density: density.into(),
                },
                custom_content: &custom_content,
                encoder: &QrMetadataEncoder,
            })?;

            fs::create_dir_all(&out)?;
            fs::write(out.join("election.json"), &result.election_definition.election_data)?;
            for ballot in &result.ballots {
                let name = format!(
                    "ballot-{}-{}.json",
                    ballot.grid_layout.ballot_style_id, ballot.precinct_id
                );
                fs::write(out.join(&name), serde_json::to_string_pretty(&ballot.document)?)?;
            }

            info!(
                ballots = result.ballots.len(),
                election_hash = %result.election_definition.election_hash,
                out = %out.display(),
                "wrote ballots"
            );
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LayoutError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn density_of(args: &[&str]) -> Result<DensityArg, clap::Error> {
        let cli = Cli::try_parse_from(
            ["hmpb-layout", "layout", "election.json", "--out", "out"]
                .iter()
                .chain(args),
        )?;
        match cli.command {
            Commands::Layout { density, .. } => Ok(density),
        }
    }

    #[test]
    fn test_density_defaults_to_roomiest() {
        assert_eq!(density_of(&[]).unwrap(), DensityArg::Default);
    }

    #[test]
    fn test_density_values() {
        assert_eq!(
            LayoutDensity::from(density_of(&["--density", "2"]).unwrap()),
            LayoutDensity::Condensed
        );
        assert_eq!(
            LayoutDensity::from(density_of(&["--density", "1"]).unwrap()),
            LayoutDensity::Medium
        );
    }

    #[test]
    fn test_density_out_of_range_is_a_usage_error() {
        let err = density_of(&["--density", "3"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
