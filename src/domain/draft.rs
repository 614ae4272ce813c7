//! Post creation form state and the checks run before anything is sent.

use serde::{Deserialize, Serialize};
use wfhubby_api_types::{CreatePostRequest, PostStatus, PostType};

use super::error::DomainError;
use super::slug::derive_slug;

/// Largest cover image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub summary: String,
    pub content_md: String,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub tags: Vec<String>,
    pub cover_image_url: String,
    pub external_links: Vec<String>,
    pub slug: String,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            content_md: String::new(),
            kind: PostType::Recipe,
            tags: Vec::new(),
            cover_image_url: String::new(),
            external_links: Vec::new(),
            slug: String::new(),
        }
    }
}

impl PostDraft {
    /// Set the title; an empty slug is derived from it.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if self.slug.is_empty() {
            self.slug = derive_slug(&self.title).unwrap_or_default();
        }
    }

    /// Add a trimmed tag. Returns `false` for blanks and duplicates.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        push_unique(&mut self.tags, tag)
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|existing| existing != tag);
    }

    /// Add a trimmed external link. Returns `false` for blanks and duplicates.
    pub fn add_link(&mut self, link: &str) -> bool {
        push_unique(&mut self.external_links, link)
    }

    pub fn remove_link(&mut self, link: &str) {
        self.external_links.retain(|existing| existing != link);
    }

    /// Check required fields and build the request for `status`.
    pub fn to_request(&self, status: PostStatus) -> Result<CreatePostRequest, DomainError> {
        if self.title.trim().is_empty()
            || self.content_md.trim().is_empty()
            || self.slug.trim().is_empty()
        {
            return Err(DomainError::validation(
                "Please fill in all required fields",
            ));
        }

        let cover_image_url = Some(self.cover_image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(CreatePostRequest {
            title: self.title.clone(),
            summary: self.summary.clone(),
            content_md: self.content_md.clone(),
            kind: self.kind,
            tags: self.tags.clone(),
            cover_image_url,
            external_links: self.external_links.clone(),
            status,
            slug: self.slug.trim().to_string(),
        })
    }
}

fn push_unique(values: &mut Vec<String>, candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || values.iter().any(|value| value == candidate) {
        return false;
    }
    values.push(candidate.to_string());
    true
}

/// An image file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload, guessing the MIME type from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::upload("Please select an image under 15MB"));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(DomainError::upload(
                "Please select a JPEG, PNG, GIF, or WebP image",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> PostDraft {
        let mut draft = PostDraft::default();
        draft.set_title("Nasi Lemak");
        draft.content_md = "Cook the rice in coconut milk.".into();
        draft
    }

    #[test]
    fn title_derives_slug_only_when_empty() {
        let mut draft = PostDraft::default();
        draft.set_title("Nasi Lemak");
        assert_eq!(draft.slug, "nasi-lemak");

        draft.set_title("Something Else");
        assert_eq!(draft.slug, "nasi-lemak");
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let mut draft = complete_draft();
        draft.content_md = "   ".into();
        let err = draft
            .to_request(PostStatus::Published)
            .expect_err("content is required");
        assert!(matches!(err, DomainError::Validation { .. }));

        let mut draft = complete_draft();
        draft.slug.clear();
        assert!(draft.to_request(PostStatus::Draft).is_err());
    }

    #[test]
    fn request_carries_status_and_drops_blank_cover() {
        let mut draft = complete_draft();
        draft.cover_image_url = "  ".into();
        let request = draft.to_request(PostStatus::Published).expect("valid");
        assert_eq!(request.status, PostStatus::Published);
        assert_eq!(request.cover_image_url, None);
        assert_eq!(request.slug, "nasi-lemak");
    }

    #[test]
    fn hand_written_slug_is_sent_as_typed() {
        let mut draft = complete_draft();
        draft.slug = " my_slug ".into();
        let request = draft.to_request(PostStatus::Draft).expect("valid");
        assert_eq!(request.slug, "my_slug");
    }

    #[test]
    fn tags_and_links_are_trimmed_and_unique() {
        let mut draft = PostDraft::default();
        assert!(draft.add_tag(" malaysian "));
        assert!(!draft.add_tag("malaysian"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_link("https://example.com/video"));
        assert!(!draft.add_link("https://example.com/video "));
        assert!(draft.add_link("https://example.com/recipe"));
        draft.remove_tag("malaysian");
        draft.remove_link("https://example.com/video");
        assert!(draft.tags.is_empty());
        assert_eq!(draft.external_links, vec!["https://example.com/recipe".to_string()]);
    }

    #[test]
    fn image_upload_guesses_type_and_checks_limits() {
        let upload = ImageUpload::from_bytes("cover.webp", vec![0; 16]);
        assert_eq!(upload.content_type, "image/webp");
        assert!(upload.validate().is_ok());

        let svg = ImageUpload::from_bytes("logo.svg", vec![0; 16]);
        assert!(matches!(svg.validate(), Err(DomainError::Upload { .. })));

        let huge = ImageUpload::from_bytes("huge.png", vec![0; MAX_IMAGE_BYTES + 1]);
        assert!(matches!(huge.validate(), Err(DomainError::Upload { .. })));
    }
}
