//! Capture metadata extraction
//!
//! Reads the embedded EXIF block of a stored image and renders the fields the
//! upload response carries. Every field is decoded on its own: a missing or
//! malformed tag leaves that field empty and never aborts the rest. When the
//! image carries a GPS fix the coordinates are resolved to a place through the
//! configured `ReverseGeocoder`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime};
use exif::{Exif, In, Rational, Tag, Value};
use mediastore_core::models::ImageMetadata;
use mediastore_core::ReverseGeocoder;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Extracts capture metadata from images already written to storage.
#[derive(Clone)]
pub struct MetadataExtractor {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl MetadataExtractor {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Decode the image at `path`.
    ///
    /// Returns `None` when the file has no decodable EXIF block or nothing
    /// useful was found in it. Geocoding is attempted only for a complete fix.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn extract(&self, path: &Path) -> Option<ImageMetadata> {
        let owned = path.to_path_buf();
        let mut metadata = match tokio::task::spawn_blocking(move || read_metadata(&owned)).await
        {
            Ok(decoded) => decoded?,
            Err(e) => {
                tracing::warn!(error = %e, "Metadata decode task failed");
                return None;
            }
        };

        if let (Some(latitude), Some(longitude)) = (metadata.latitude, metadata.longitude) {
            metadata.location = self
                .geocoder
                .reverse(latitude, longitude)
                .await
                .filter(|location| !location.is_empty());
        }

        metadata.into_option()
    }
}

/// Blocking decode of the file's EXIF block.
pub fn read_metadata(path: &Path) -> Option<ImageMetadata> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open image for metadata");
            return None;
        }
    };

    match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => Some(decode_fields(&exif)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No EXIF block");
            None
        }
    }
}

/// Map decoded tags onto `ImageMetadata`. `location` is left for the caller.
pub fn decode_fields(exif: &Exif) -> ImageMetadata {
    let gps = gps_fix(exif);

    ImageMetadata {
        date_time: capture_time(exif),
        latitude: gps.map(|(latitude, _)| latitude),
        longitude: gps.map(|(_, longitude)| longitude),
        location: None,
        camera_make: ascii_field(exif, Tag::Make),
        camera_model: ascii_field(exif, Tag::Model),
        width: uint_field(exif, Tag::PixelXDimension),
        height: uint_field(exif, Tag::PixelYDimension),
        orientation: uint_field(exif, Tag::Orientation),
        flash: uint_field(exif, Tag::Flash).map(flash_label),
        focal_length: rational_field(exif, Tag::FocalLength).map(format_focal_length),
        f_number: rational_field(exif, Tag::FNumber).map(format_f_number),
        exposure_time: rational_field(exif, Tag::ExposureTime).and_then(format_exposure_time),
        iso: uint_field(exif, Tag::PhotographicSensitivity),
    }
}

/// First string of an ASCII tag, trimmed of padding. Empty strings count as absent.
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|raw| {
                String::from_utf8_lossy(raw)
                    .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn uint_field(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

/// `(numerator, denominator)` of the first rational, skipping zero denominators.
fn rational_field(exif: &Exif, tag: Tag) -> Option<(u32, u32)> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| (r.num, r.denom)),
        _ => None,
    }
}

fn capture_time(exif: &Exif) -> Option<i64> {
    let (raw, offset) = match ascii_field(exif, Tag::DateTimeOriginal) {
        Some(raw) => (raw, ascii_field(exif, Tag::OffsetTimeOriginal)),
        None => (
            ascii_field(exif, Tag::DateTime)?,
            ascii_field(exif, Tag::OffsetTime),
        ),
    };
    parse_capture_time(&raw, offset.as_deref())
}

/// EXIF `YYYY:MM:DD HH:MM:SS` to Unix seconds.
///
/// Times without a usable offset tag are read as UTC.
pub fn parse_capture_time(raw: &str, offset: Option<&str>) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATETIME_FORMAT).ok()?;
    match offset.and_then(parse_offset) {
        Some(tz) => naive
            .and_local_timezone(tz)
            .single()
            .map(|dt| dt.timestamp()),
        None => Some(naive.and_utc().timestamp()),
    }
}

/// `+HH:MM` / `-HH:MM`
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn gps_fix(exif: &Exif) -> Option<(f64, f64)> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, ('N', 'S'), 90.0)?;
    let longitude = coordinate(
        exif,
        Tag::GPSLongitude,
        Tag::GPSLongitudeRef,
        ('E', 'W'),
        180.0,
    )?;
    Some((latitude, longitude))
}

/// Signed decimal degrees from a DMS triple and its hemisphere reference.
fn coordinate(
    exif: &Exif,
    value_tag: Tag,
    ref_tag: Tag,
    (positive, negative): (char, char),
    limit: f64,
) -> Option<f64> {
    let degrees = match &exif.get_field(value_tag, In::PRIMARY)?.value {
        Value::Rational(dms) => dms_to_decimal(dms)?,
        _ => return None,
    };

    let hemisphere = ascii_field(exif, ref_tag)?.chars().next()?.to_ascii_uppercase();
    let signed = if hemisphere == positive {
        degrees
    } else if hemisphere == negative {
        -degrees
    } else {
        return None;
    };

    (signed.abs() <= limit).then_some(signed)
}

fn dms_to_decimal(dms: &[Rational]) -> Option<f64> {
    match dms {
        [d, m, s, ..] if d.denom != 0 && m.denom != 0 && s.denom != 0 => {
            Some(d.to_f64() + m.to_f64() / 60.0 + s.to_f64() / 3600.0)
        }
        _ => None,
    }
}

pub fn flash_label(value: u32) -> String {
    if value == 0 {
        "No Flash".to_string()
    } else {
        "Flash Fired".to_string()
    }
}

/// `50.0mm`
pub fn format_focal_length((num, denom): (u32, u32)) -> String {
    format!("{:.1}mm", num as f64 / denom as f64)
}

/// `f/2.8`
pub fn format_f_number((num, denom): (u32, u32)) -> String {
    format!("f/{:.1}", num as f64 / denom as f64)
}

/// `1/250` for sub-second exposures, whole seconds otherwise.
pub fn format_exposure_time((num, denom): (u32, u32)) -> Option<String> {
    if num == 0 || denom == 0 {
        return None;
    }
    if num < denom {
        Some(format!("1/{}", denom / num))
    } else {
        Some(format!("{}", num / denom))
    }
}
