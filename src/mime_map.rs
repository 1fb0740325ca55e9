//! MIME type lookup used when an attachment does not declare its type.

use std::path::Path;

/// Filename → MIME type lookup.
pub trait MimeMapper: Send + Sync {
    /// MIME type for `filename`, derived from its extension.
    fn mime_type(&self, filename: &str) -> Option<String>;

    /// Whether `mime_type` is acceptable as an explicit attachment type.
    fn is_valid_mime_type(&self, mime_type: &str) -> bool;
}

/// Default mapper backed by `mime_guess`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuessMimeMapper;

impl MimeMapper for GuessMimeMapper {
    fn mime_type(&self, filename: &str) -> Option<String> {
        // Files without an extension are not guessed.
        Path::new(filename).extension()?;
        mime_guess::from_path(filename)
            .first_raw()
            .map(str::to_string)
    }

    fn is_valid_mime_type(&self, mime_type: &str) -> bool {
        mime_type
            .parse::<mime::Mime>()
            .map(|m| !m.type_().as_str().is_empty() && !m.subtype().as_str().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_known_extensions() {
        let mapper = GuessMimeMapper;
        assert_eq!(mapper.mime_type("report.pdf").as_deref(), Some("application/pdf"));
        assert_eq!(mapper.mime_type("logo.PNG").as_deref(), Some("image/png"));
        assert_eq!(mapper.mime_type("notes.txt").as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_guess_unknown_extension() {
        let mapper = GuessMimeMapper;
        assert_eq!(mapper.mime_type("archive.notarealext"), None);
        assert_eq!(mapper.mime_type("README"), None);
    }

    #[test]
    fn test_mime_validity() {
        let mapper = GuessMimeMapper;
        assert!(mapper.is_valid_mime_type("application/pdf"));
        assert!(mapper.is_valid_mime_type("text/plain; charset=utf-8"));
        assert!(!mapper.is_valid_mime_type("pdf"));
        assert!(!mapper.is_valid_mime_type(""));
    }
}
