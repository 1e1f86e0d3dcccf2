//! # Ballot Page Metadata
//!
//! Every ballot page carries a QR code identifying the election, precinct,
//! ballot style and page so the scanner can interpret it. The encoder is a
//! seam: layout only needs *some* byte-to-bit-matrix function, so it takes a
//! [`MetadataEncoder`] and ships [`QrMetadataEncoder`] as the default.
//!
//! ## Payload
//!
//! | Bytes | Field |
//! |-------|-------|
//! | 0-1 | prelude `VP` |
//! | 2 | format version |
//! | 3-12 | first 20 hex digits of the election hash |
//! | 13-14 | precinct index (big endian) |
//! | 15-16 | ballot style index (big endian) |
//! | 17 | page number |
//! | 18 | flags: bit 0 test mode, bits 1-2 ballot type |

use qrcode::{EcLevel, QrCode};

use crate::election::{BallotType, Election};
use crate::error::LayoutError;

/// QR modules indexed `[column][row]`; `true` is a dark module.
pub type QrCodeData = Vec<Vec<bool>>;

const PRELUDE: &[u8; 2] = b"VP";
const VERSION: u8 = 1;
const HASH_HEX_DIGITS: usize = 20;

/// What the scanner needs to know about a single printed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotPageMetadata {
    pub election_hash: String,
    pub precinct_id: String,
    pub ballot_style_id: String,
    pub page_number: u32,
    pub ballot_type: BallotType,
    pub is_test_mode: bool,
}

/// Turns page metadata into a QR bit matrix.
pub trait MetadataEncoder: Sync {
    fn encode_metadata(
        &self,
        election: &Election,
        metadata: &BallotPageMetadata,
    ) -> Result<QrCodeData, LayoutError>;

    /// QR code used before the election hash is known.
    fn encode_empty(&self) -> Result<QrCodeData, LayoutError>;
}

/// Default encoder: the compact payload above in a byte-mode QR code.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrMetadataEncoder;

impl MetadataEncoder for QrMetadataEncoder {
    fn encode_metadata(
        &self,
        election: &Election,
        metadata: &BallotPageMetadata,
    ) -> Result<QrCodeData, LayoutError> {
        encode_in_qr_code(&encode_ballot_page_metadata(election, metadata)?)
    }

    fn encode_empty(&self) -> Result<QrCodeData, LayoutError> {
        encode_in_qr_code(&[])
    }
}

/// Pack page metadata into the payload bytes.
pub fn encode_ballot_page_metadata(
    election: &Election,
    metadata: &BallotPageMetadata,
) -> Result<Vec<u8>, LayoutError> {
    let precinct_index = election
        .precinct_index(&metadata.precinct_id)
        .ok_or_else(|| LayoutError::UnknownPrecinct(metadata.precinct_id.clone()))?;
    let ballot_style_index = election
        .ballot_style_index(&metadata.ballot_style_id)
        .ok_or_else(|| {
            LayoutError::Metadata(format!("unknown ballot style {}", metadata.ballot_style_id))
        })?;
    let page_number = u8::try_from(metadata.page_number)
        .map_err(|_| LayoutError::Metadata(format!("page number {} out of range", metadata.page_number)))?;

    let mut bytes = Vec::with_capacity(19);
    bytes.extend_from_slice(PRELUDE);
    bytes.push(VERSION);
    bytes.extend(hash_prefix(&metadata.election_hash)?);
    bytes.extend(index_bytes(precinct_index)?);
    bytes.extend(index_bytes(ballot_style_index)?);
    bytes.push(page_number);
    let ballot_type_bits = match metadata.ballot_type {
        BallotType::Precinct => 0,
        BallotType::Absentee => 1,
        BallotType::Provisional => 2,
    };
    bytes.push(u8::from(metadata.is_test_mode) | (ballot_type_bits << 1));
    Ok(bytes)
}

fn hash_prefix(election_hash: &str) -> Result<Vec<u8>, LayoutError> {
    let digits = election_hash
        .as_bytes()
        .get(..HASH_HEX_DIGITS)
        .ok_or_else(|| LayoutError::Metadata(format!("election hash too short: {election_hash:?}")))?;
    let not_hex = || LayoutError::Metadata(format!("election hash is not hex: {election_hash:?}"));
    digits
        .chunks(2)
        .map(|pair| {
            let high = hex_value(pair[0]).ok_or_else(not_hex)?;
            let low = hex_value(pair[1]).ok_or_else(not_hex)?;
            Ok(high << 4 | low)
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).map(|value| value as u8)
}

fn index_bytes(index: usize) -> Result<[u8; 2], LayoutError> {
    u16::try_from(index)
        .map(u16::to_be_bytes)
        .map_err(|_| LayoutError::Metadata(format!("index {index} out of range")))
}

/// Encode raw bytes as a QR code bit matrix.
pub fn encode_in_qr_code(data: &[u8]) -> Result<QrCodeData, LayoutError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)
        .map_err(|e| LayoutError::Metadata(format!("QR code generation failed: {}", e)))?;
    let size = code.width();
    Ok((0..size)
        .map(|x| (0..size).map(|y| code[(x, y)] == qrcode::Color::Dark).collect())
        .collect())
}
