//! Validation for slugs that arrive through request paths.
//!
//! Slugs are never generated here: they come from the store or the sample
//! collection. The checks only reject input that no stored post could ever
//! match, before a store round trip is spent on it.

use thiserror::Error;

pub const MAX_SLUG_BYTES: usize = 255;

/// Reasons a lookup slug is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug is {len} bytes long; the limit is {limit}")]
    TooLong { len: usize, limit: usize },
    #[error("slug contains control characters")]
    ControlCharacter,
}

/// Check a slug before it is used as a lookup key.
pub fn validate_lookup_slug(slug: &str) -> Result<(), SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }

    if slug.len() > MAX_SLUG_BYTES {
        return Err(SlugError::TooLong {
            len: slug.len(),
            limit: MAX_SLUG_BYTES,
        });
    }

    if slug.chars().any(char::is_control) {
        return Err(SlugError::ControlCharacter);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_slugs() {
        assert_eq!(
            validate_lookup_slug("getting-started-with-nextjs-supabase"),
            Ok(())
        );
        assert_eq!(validate_lookup_slug("Mixed_Case.and-ünicode"), Ok(()));
    }

    #[test]
    fn rejects_empty_slug() {
        assert_eq!(validate_lookup_slug(""), Err(SlugError::Empty));
    }

    #[test]
    fn rejects_oversized_slug() {
        let at_limit = "a".repeat(MAX_SLUG_BYTES);
        assert_eq!(validate_lookup_slug(&at_limit), Ok(()));

        let over_limit = "a".repeat(MAX_SLUG_BYTES + 1);
        assert_eq!(
            validate_lookup_slug(&over_limit),
            Err(SlugError::TooLong {
                len: MAX_SLUG_BYTES + 1,
                limit: MAX_SLUG_BYTES,
            })
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            validate_lookup_slug("bad\nslug"),
            Err(SlugError::ControlCharacter)
        );
        assert_eq!(
            validate_lookup_slug("nul\u{0}byte"),
            Err(SlugError::ControlCharacter)
        );
    }
}
