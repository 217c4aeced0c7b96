//! Synthetic images for tests.
//!
//! `ExifFixture::to_jpeg` emits SOI, an APP1 `Exif` segment carrying a
//! little-endian TIFF block (IFD0, Exif IFD, GPS IFD), then EOI. That is
//! enough for EXIF decoders; there is no scan data.

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const TAG_MAKE: u16 = 0x010f;
const TAG_MODEL: u16 = 0x0110;
const TAG_ORIENTATION: u16 = 0x0112;
const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXPOSURE_TIME: u16 = 0x829a;
const TAG_F_NUMBER: u16 = 0x829d;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_ISO: u16 = 0x8827;
const TAG_GPS_IFD: u16 = 0x8825;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_OFFSET_TIME_ORIGINAL: u16 = 0x9011;
const TAG_FLASH: u16 = 0x9209;
const TAG_FOCAL_LENGTH: u16 = 0x920a;
const TAG_PIXEL_X: u16 = 0xa002;
const TAG_PIXEL_Y: u16 = 0xa003;
const TAG_GPS_LAT_REF: u16 = 0x0001;
const TAG_GPS_LAT: u16 = 0x0002;
const TAG_GPS_LON_REF: u16 = 0x0003;
const TAG_GPS_LON: u16 = 0x0004;

/// Tag values to embed. Unset fields are simply not written.
#[derive(Debug, Clone, Default)]
pub struct ExifFixture {
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<u16>,
    /// IFD0 `DateTime`, `YYYY:MM:DD HH:MM:SS`
    pub date_time: Option<String>,
    /// Exif `DateTimeOriginal`, `YYYY:MM:DD HH:MM:SS`
    pub date_time_original: Option<String>,
    /// Exif `OffsetTimeOriginal`, e.g. `+07:00`
    pub offset_time_original: Option<String>,
    pub exposure_time: Option<(u32, u32)>,
    pub f_number: Option<(u32, u32)>,
    pub focal_length: Option<(u32, u32)>,
    pub iso: Option<u16>,
    pub flash: Option<u16>,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    /// Signed decimal degrees (latitude, longitude)
    pub gps: Option<(f64, f64)>,
}

impl ExifFixture {
    /// A fully populated camera shot taken in Hanoi.
    pub fn camera_shot() -> Self {
        Self {
            make: Some("  Canon ".to_string()),
            model: Some("Canon EOS R5".to_string()),
            orientation: Some(6),
            date_time: None,
            date_time_original: Some("2023:06:15 14:30:00".to_string()),
            offset_time_original: None,
            exposure_time: Some((1, 250)),
            f_number: Some((28, 10)),
            focal_length: Some((50, 1)),
            iso: Some(400),
            flash: Some(1),
            pixel_width: Some(8192),
            pixel_height: Some(5464),
            gps: Some((21.0285, 105.8542)),
        }
    }

    pub fn to_jpeg(&self) -> Vec<u8> {
        jpeg_with_tiff(&self.to_tiff())
    }

    fn to_tiff(&self) -> Vec<u8> {
        let mut ifd0 = Vec::new();
        if let Some(v) = &self.make {
            ifd0.push(Entry::ascii(TAG_MAKE, v));
        }
        if let Some(v) = &self.model {
            ifd0.push(Entry::ascii(TAG_MODEL, v));
        }
        if let Some(v) = self.orientation {
            ifd0.push(Entry::short(TAG_ORIENTATION, v));
        }
        if let Some(v) = &self.date_time {
            ifd0.push(Entry::ascii(TAG_DATE_TIME, v));
        }

        let mut exif = Vec::new();
        if let Some(r) = self.exposure_time {
            exif.push(Entry::rational(TAG_EXPOSURE_TIME, &[r]));
        }
        if let Some(r) = self.f_number {
            exif.push(Entry::rational(TAG_F_NUMBER, &[r]));
        }
        if let Some(v) = self.iso {
            exif.push(Entry::short(TAG_ISO, v));
        }
        if let Some(v) = &self.date_time_original {
            exif.push(Entry::ascii(TAG_DATE_TIME_ORIGINAL, v));
        }
        if let Some(v) = &self.offset_time_original {
            exif.push(Entry::ascii(TAG_OFFSET_TIME_ORIGINAL, v));
        }
        if let Some(v) = self.flash {
            exif.push(Entry::short(TAG_FLASH, v));
        }
        if let Some(r) = self.focal_length {
            exif.push(Entry::rational(TAG_FOCAL_LENGTH, &[r]));
        }
        if let Some(v) = self.pixel_width {
            exif.push(Entry::long(TAG_PIXEL_X, v));
        }
        if let Some(v) = self.pixel_height {
            exif.push(Entry::long(TAG_PIXEL_Y, v));
        }

        let mut gps = Vec::new();
        if let Some((lat, lon)) = self.gps {
            gps.push(Entry::ascii(TAG_GPS_LAT_REF, if lat < 0.0 { "S" } else { "N" }));
            gps.push(Entry::rational(TAG_GPS_LAT, &to_dms(lat)));
            gps.push(Entry::ascii(TAG_GPS_LON_REF, if lon < 0.0 { "W" } else { "E" }));
            gps.push(Entry::rational(TAG_GPS_LON, &to_dms(lon)));
        }

        // Pointer entries are inline LONGs, so their presence (not value)
        // fixes IFD0's size and every later offset.
        if !exif.is_empty() {
            ifd0.push(Entry::long(TAG_EXIF_IFD, 0));
        }
        if !gps.is_empty() {
            ifd0.push(Entry::long(TAG_GPS_IFD, 0));
        }

        let ifd0_start = 8u32;
        let exif_start = ifd0_start + ifd_len(&ifd0);
        let gps_start = exif_start + if exif.is_empty() { 0 } else { ifd_len(&exif) };
        for entry in ifd0.iter_mut() {
            match entry.tag {
                TAG_EXIF_IFD => entry.data = exif_start.to_le_bytes().to_vec(),
                TAG_GPS_IFD => entry.data = gps_start.to_le_bytes().to_vec(),
                _ => {}
            }
        }
        ifd0.sort_by_key(|e| e.tag);

        let mut out = Vec::new();
        out.extend_from_slice(b"II");
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&ifd0_start.to_le_bytes());
        write_ifd(&mut out, &ifd0, ifd0_start);
        if !exif.is_empty() {
            write_ifd(&mut out, &exif, exif_start);
        }
        if !gps.is_empty() {
            write_ifd(&mut out, &gps, gps_start);
        }
        out
    }
}

struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }

    fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            kind: TYPE_SHORT,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: TYPE_LONG,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn rational(tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for (num, denom) in values {
            data.extend_from_slice(&num.to_le_bytes());
            data.extend_from_slice(&denom.to_le_bytes());
        }
        Self {
            tag,
            kind: TYPE_RATIONAL,
            count: values.len() as u32,
            data,
        }
    }

    /// Bytes stored outside the entry, padded to a word boundary.
    fn external_len(&self) -> u32 {
        if self.data.len() <= 4 {
            0
        } else {
            (self.data.len() as u32 + 1) & !1
        }
    }
}

fn ifd_len(entries: &[Entry]) -> u32 {
    2 + 12 * entries.len() as u32 + 4 + entries.iter().map(Entry::external_len).sum::<u32>()
}

fn write_ifd(out: &mut Vec<u8>, entries: &[Entry], start: u32) {
    let mut data_offset = start + 2 + 12 * entries.len() as u32 + 4;
    let mut external = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.kind.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&data_offset.to_le_bytes());
            external.extend_from_slice(&entry.data);
            if entry.data.len() % 2 == 1 {
                external.push(0);
            }
            data_offset += entry.external_len();
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&external);
}

/// Degrees, minutes and seconds (to 1/10000") as rationals.
fn to_dms(value: f64) -> [(u32, u32); 3] {
    let abs = value.abs();
    let degrees = abs.trunc();
    let minutes = ((abs - degrees) * 60.0).trunc();
    let seconds = (abs - degrees - minutes / 60.0) * 3600.0;
    [
        (degrees as u32, 1),
        (minutes as u32, 1),
        ((seconds * 10_000.0).round() as u32, 10_000),
    ]
}

fn jpeg_with_tiff(tiff: &[u8]) -> Vec<u8> {
    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// SOI/EOI only: a JPEG container with no metadata segment.
pub fn bare_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

/// Minimal valid 1x1 PNG bytes (no eXIf chunk).
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}
