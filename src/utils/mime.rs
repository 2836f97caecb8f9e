//! MIME utilities shared across modules

use std::path::Path;

/// Content type of a stored media file. Audio in an MP4 container is reported as
/// `audio/mp4`, which podcast clients expect in feed enclosures.
#[must_use]
pub fn media_type(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("m4a" | "mp4") => "audio/mp4".to_string(),
        _ => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_and_images_get_their_content_type() {
        assert_eq!(media_type(Path::new("a.m4a")), "audio/mp4");
        assert_eq!(media_type(Path::new("audio/1/a.mp4")), "audio/mp4");
        assert_eq!(media_type(Path::new("a_logo.jpg")), "image/jpeg");
        assert_eq!(media_type(Path::new("a_logo")), "application/octet-stream");
    }
}
