//! Encoded polyline decoding.
//!
//! Directions providers return route geometry as a signed-delta,
//! base-63-offset polyline string (Google's encoding). Each coordinate
//! delta is packed into 5-bit groups with a continuation bit at 0x20; the
//! sign lives in the lowest bit of the accumulated value. Latitude deltas
//! precede longitude deltas, and both accumulate onto running integer
//! counters scaled by the precision factor.

use crate::domain::GeoPoint;

/// Scale factor for `polyline6` geometry (six decimal places).
pub const PRECISION_POLYLINE6: f64 = 1e6;

/// Error decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// Input ended in the middle of a 5-bit chunk sequence.
    #[error("polyline truncated mid-chunk at byte {index}")]
    Truncated { index: usize },
}

/// Decode a polyline string with six-decimal precision.
pub fn decode_polyline6(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    decode_polyline(encoded, PRECISION_POLYLINE6)
}

/// Decode a polyline string into an ordered sequence of points.
///
/// `precision` is the integer scale factor of the encoding (1e5 for the
/// classic five-decimal encoding, 1e6 for `polyline6`).
pub fn decode_polyline(encoded: &str, precision: f64) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        lng += next_delta(bytes, &mut index)?;
        points.push(GeoPoint::new(lat as f64 / precision, lng as f64 / precision));
    }

    Ok(points)
}

/// Decode one signed delta, advancing `index` past its chunks.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut shift = 0;
    let mut result: i64 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated { index: *index });
        };
        let chunk = i64::from(byte) - 63;
        *index += 1;

        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    // Lowest bit carries the sign: one's-complement negation when set.
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
