//! Slug derivation for new posts.
//!
//! Slugs are the public lookup key of a published post, so they must be
//! URL-safe: lowercase ASCII alphanumerics separated by single hyphens.
//! Non-ASCII letters are transliterated by the `slug` crate before
//! filtering, so "Crème Brûlée" becomes `creme-brulee`.

use slug::slugify;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_collapses_punctuation() {
        let slug = derive_slug("  Mum's  Chicken Rice!! ").expect("slug");
        assert_eq!(slug, "mum-s-chicken-rice");
    }

    #[test]
    fn derive_slug_transliterates_accents() {
        let slug = derive_slug("Crème Brûlée").expect("slug");
        assert_eq!(slug, "creme-brulee");
    }

    #[test]
    fn derive_slug_rejects_blank_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn derive_slug_rejects_symbol_only_input() {
        let err = derive_slug("!!!").expect_err("no slug");
        assert!(matches!(err, SlugError::Unrepresentable { .. }));
    }
}
