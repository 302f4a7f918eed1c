//! Coordinate extraction from a support's characteristic table.
//!
//! Coordinates are stored as two rows of the table, keyed by characteristic
//! GUID, with hemisphere-suffixed strings such as `55.7512N` and `37.6184E`.
//! `S` and `W` flip the sign. A decimal comma is accepted anywhere a decimal
//! point is.

use serde::Serialize;

use crate::model::CharacteristicRow;
use crate::schema::SchemaNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// (positive, negative) hemisphere letters
    fn hemispheres(&self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// A fully resolved position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// GeoJSON position: longitude first.
    pub fn position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Result of scanning a table; either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoordinatePair {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CoordinatePair {
    /// Both halves present.
    pub fn resolved(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude?, self.longitude?))
    }
}

/// A matching row whose value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCoordinate {
    pub axis: Axis,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateResolution {
    pub pair: CoordinatePair,
    pub malformed: Vec<MalformedCoordinate>,
}

/// Scan a characteristic table for the latitude and longitude rows.
///
/// For each axis the last matching row with a non-empty value is used. An
/// absent table resolves to `(None, None)`.
pub fn resolve(rows: Option<&[CharacteristicRow]>, names: &SchemaNames) -> CoordinateResolution {
    let mut latitude_raw: Option<&str> = None;
    let mut longitude_raw: Option<&str> = None;

    for row in rows.unwrap_or_default() {
        let (Some(id), Some(value)) = (row.characteristic.as_deref(), row.value.as_deref()) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        if same_guid(id, &names.latitude_characteristic) {
            latitude_raw = Some(value);
        } else if same_guid(id, &names.longitude_characteristic) {
            longitude_raw = Some(value);
        }
    }

    let mut resolution = CoordinateResolution::default();
    resolution.pair.latitude = decode_axis(latitude_raw, Axis::Latitude, &mut resolution);
    resolution.pair.longitude = decode_axis(longitude_raw, Axis::Longitude, &mut resolution);
    resolution
}

/// Pair-only form of [`resolve`].
pub fn resolve_coordinates(rows: Option<&[CharacteristicRow]>, names: &SchemaNames) -> CoordinatePair {
    resolve(rows, names).pair
}

fn decode_axis(raw: Option<&str>, axis: Axis, resolution: &mut CoordinateResolution) -> Option<f64> {
    let raw = raw?;
    let value = decode_hemisphere(raw, axis);
    if value.is_none() {
        resolution.malformed.push(MalformedCoordinate {
            axis,
            raw: raw.to_string(),
        });
    }
    value
}

fn same_guid(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Decode a hemisphere-marked coordinate (`55.5N`, `S55,5`, `37.5w`).
///
/// The hemisphere letter may lead or trail and is case-insensitive; a value
/// without a letter is taken as signed decimal degrees.
pub fn decode_hemisphere(raw: &str, axis: Axis) -> Option<f64> {
    let text = raw.trim();
    let (positive, negative) = axis.hemispheres();

    let mut sign = 1.0;
    let mut body = text;
    let marker = |c: char| {
        let c = c.to_ascii_uppercase();
        (c == positive || c == negative).then_some(c)
    };

    if let Some(letter) = text.chars().last().and_then(marker) {
        body = &text[..text.len() - 1];
        if letter == negative {
            sign = -1.0;
        }
    } else if let Some(letter) = text.chars().next().and_then(marker) {
        body = &text[1..];
        if letter == negative {
            sign = -1.0;
        }
    }

    parse_decimal(body).map(|value| sign * value)
}

/// Parse a decimal number written with either `.` or `,` as separator.
///
/// Returns `None` for empty, malformed or non-finite input.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, value: &str) -> CharacteristicRow {
        CharacteristicRow {
            characteristic: Some(id.to_string()),
            value: Some(value.to_string()),
        }
    }

    fn lat_row(value: &str) -> CharacteristicRow {
        row(&SchemaNames::default().latitude_characteristic, value)
    }

    fn lon_row(value: &str) -> CharacteristicRow {
        row(&SchemaNames::default().longitude_characteristic, value)
    }

    #[test]
    fn test_hemisphere_decoding() {
        assert_eq!(decode_hemisphere("55.5N", Axis::Latitude), Some(55.5));
        assert_eq!(decode_hemisphere("55.5S", Axis::Latitude), Some(-55.5));
        assert_eq!(decode_hemisphere("37.5E", Axis::Longitude), Some(37.5));
        assert_eq!(decode_hemisphere("37.5W", Axis::Longitude), Some(-37.5));
    }

    #[test]
    fn test_hemisphere_variants() {
        assert_eq!(decode_hemisphere(" 55,25 n ", Axis::Latitude), Some(55.25));
        assert_eq!(decode_hemisphere("S12.5", Axis::Latitude), Some(-12.5));
        assert_eq!(decode_hemisphere("-33.9", Axis::Latitude), Some(-33.9));
        assert_eq!(decode_hemisphere("151.2", Axis::Longitude), Some(151.2));
    }

    #[test]
    fn test_wrong_axis_letter_is_malformed() {
        assert_eq!(decode_hemisphere("55.5E", Axis::Latitude), None);
        assert_eq!(decode_hemisphere("37.5N", Axis::Longitude), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("110"), Some(110.0));
        assert_eq!(parse_decimal("0,4"), Some(0.4));
        assert_eq!(parse_decimal(" 6.3 "), Some(6.3));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1,234.5"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn test_resolve_both_axes() {
        let names = SchemaNames::default();
        let rows = vec![
            row("00000000-aaaa-bbbb-cccc-000000000000", "ignored"),
            lat_row("55.0N"),
            lon_row("37.0E"),
        ];
        let pair = resolve_coordinates(Some(&rows), &names);
        assert_eq!(pair.resolved(), Some(GeoPoint::new(55.0, 37.0)));
        assert_eq!(pair.resolved().unwrap().position(), [37.0, 55.0]);
    }

    #[test]
    fn test_resolve_absent_table() {
        let names = SchemaNames::default();
        let pair = resolve_coordinates(None, &names);
        assert_eq!(pair, CoordinatePair::default());
        assert!(pair.resolved().is_none());
    }

    #[test]
    fn test_resolve_half_pair_is_unresolved() {
        let names = SchemaNames::default();
        let rows = vec![lat_row("55.0N"), lon_row("  ")];
        let pair = resolve_coordinates(Some(&rows), &names);
        assert_eq!(pair.latitude, Some(55.0));
        assert_eq!(pair.longitude, None);
        assert!(pair.resolved().is_none());
    }

    #[test]
    fn test_last_nonempty_row_wins() {
        let names = SchemaNames::default();
        let rows = vec![lat_row("10N"), lat_row("20N"), lat_row(""), lon_row("30E")];
        let pair = resolve_coordinates(Some(&rows), &names);
        assert_eq!(pair.latitude, Some(20.0));
    }

    #[test]
    fn test_malformed_values_reported() {
        let names = SchemaNames::default();
        let rows = vec![lat_row("fifty-five"), lon_row("37E")];
        let resolution = resolve(Some(&rows), &names);
        assert_eq!(resolution.pair.latitude, None);
        assert_eq!(resolution.pair.longitude, Some(37.0));
        assert_eq!(resolution.malformed.len(), 1);
        assert_eq!(resolution.malformed[0].axis, Axis::Latitude);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let names = SchemaNames::default();
        let rows = vec![lat_row("55,1N"), lon_row("37,1E")];
        let first = resolve(Some(&rows), &names);
        let second = resolve(Some(&rows), &names);
        assert_eq!(first, second);
    }
}
