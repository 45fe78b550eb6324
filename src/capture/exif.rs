//! Capture date from EXIF metadata

use std::io::Cursor;

/// Capture date from EXIF, if the image carries one
pub fn extract_date(bytes: &[u8]) -> Option<String> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;

    // DateTimeOriginal first, then DateTime
    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .iter()
        .find_map(|tag| exif.get_field(*tag, exif::In::PRIMARY))
        .map(|field| field.display_value().to_string())
}
