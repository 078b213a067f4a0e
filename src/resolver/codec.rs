//! Legacy numeric id to alphanumeric id transcoding
//!
//! Legacy ids (`av170001`) are mapped onto the modern `BV` scheme with a
//! fixed XOR mask, a base-58 digit expansion and a final position swap.

use crate::{Error, Result, types::VideoId};

/// Digit alphabet of the modern scheme
const ALPHABET: &[u8; 58] = b"FcwAPNKTMug3GV5Lj7EJnHpWsx4tb8haYeviqBz6rkCy12mUSDQX9RdoZf";
/// Numeric base of the digit expansion
const BASE: u64 = 58;
/// Mask applied after the marker bit is set
const XOR_CODE: u64 = 23_442_827_791_579;
/// Marker bit; also the exclusive upper bound of legacy ids
const MAX_AID: u64 = 1 << 51;
/// Buffer before digit expansion: literal prefix then zero placeholders
const TEMPLATE: [u8; VideoId::LEN] = *b"BV1000000000";
/// Digits are written backward from the end down to this position
const FIRST_DIGIT: usize = 3;
/// Position pairs exchanged after expansion
const SWAPS: [(usize, usize); 2] = [(3, 9), (4, 7)];

/// Transcode a legacy id such as `av170001`, `AV2` or a bare `170001`.
pub fn av_to_bv(av: &str) -> Result<VideoId> {
    let digits = match av.get(..2) {
        Some(marker) if marker.eq_ignore_ascii_case("av") => &av[2..],
        _ => av,
    };

    let aid: u64 = digits
        .parse()
        .map_err(|_| Error::invalid_identifier(format!("invalid av number: {:?}", av)))?;

    encode(aid)
}

/// Transcode a numeric legacy id.
pub fn encode(aid: u64) -> Result<VideoId> {
    if aid >= MAX_AID {
        return Err(Error::invalid_identifier(format!(
            "av number out of range: {}",
            aid
        )));
    }

    let mut buf = TEMPLATE;
    let mut tmp = (MAX_AID | aid) ^ XOR_CODE;
    let mut pos = buf.len() - 1;
    while tmp > 0 && pos >= FIRST_DIGIT {
        buf[pos] = ALPHABET[(tmp % BASE) as usize];
        tmp /= BASE;
        pos -= 1;
    }

    for (a, b) in SWAPS {
        buf.swap(a, b);
    }

    let encoded = std::str::from_utf8(&buf)
        .map_err(|e| Error::internal(format!("non-ascii id buffer: {}", e)))?;
    VideoId::new(encoded).ok_or_else(|| Error::internal(format!("malformed id {:?}", encoded)))
}
