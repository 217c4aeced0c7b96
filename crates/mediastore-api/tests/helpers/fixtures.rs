use axum_test::multipart::{MultipartForm, Part};

pub use mediastore_processing::fixtures::{minimal_png, ExifFixture};

/// Bytes of exactly `len` length that are not a real image. Content is never sniffed.
pub fn filler(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Single-file form with the file in `field`.
pub fn file_form(field: &str, filename: &str, mime: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(bytes).file_name(filename).mime_type(mime),
    )
}
