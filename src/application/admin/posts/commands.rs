use tracing::info;
use wfhubby_api_types::{Post, PostId, PostStatus};

use crate::application::error::AdminError;
use crate::domain::draft::{ImageUpload, PostDraft};

use super::service::AdminPostService;

impl AdminPostService {
    /// Validate `draft` locally, then submit it with `status`.
    pub async fn create(&self, draft: &PostDraft, status: PostStatus) -> Result<Post, AdminError> {
        let request = draft.to_request(status)?;
        let post = self.posts.create_post(&request).await?;
        info!(slug = %post.slug, status = status.as_str(), "post created");
        Ok(post)
    }

    /// Check size and type before uploading; returns the hosted URL.
    pub async fn upload_cover(&self, upload: ImageUpload) -> Result<String, AdminError> {
        upload.validate()?;
        let url = self.posts.upload_image(upload).await?;
        Ok(url)
    }

    pub async fn delete(&self, id: &PostId) -> Result<(), AdminError> {
        self.posts.delete_post(id).await?;
        info!(%id, "post deleted");
        Ok(())
    }

    pub async fn pin(&self, id: &PostId) -> Result<(), AdminError> {
        self.posts.pin_post(id).await?;
        Ok(())
    }

    pub async fn unpin(&self, id: &PostId) -> Result<(), AdminError> {
        self.posts.unpin_post(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use wfhubby_api_types::{CreatePostRequest, PostType};

    use super::*;
    use crate::application::repos::AdminPostsSource;
    use crate::domain::draft::MAX_IMAGE_BYTES;
    use crate::infra::http::ApiError;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<String>>,
        reject_with_401: bool,
    }

    impl RecordingSource {
        fn record(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            if self.reject_with_401 {
                Err(ApiError::AuthRequired)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl AdminPostsSource for RecordingSource {
        async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
            self.record(format!("create {}", request.slug))?;
            Ok(Post {
                id: PostId::Int(1),
                title: request.title.clone(),
                summary: Some(request.summary.clone()),
                content_md: Some(request.content_md.clone()),
                kind: request.kind,
                tags: request.tags.clone(),
                cover_image_url: request.cover_image_url.clone(),
                external_links: request.external_links.clone(),
                status: request.status,
                slug: request.slug.clone(),
                pinned: false,
                created_at: None,
                published_at: None,
            })
        }

        async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
            self.record(format!("delete {id}"))
        }

        async fn pin_post(&self, id: &PostId) -> Result<(), ApiError> {
            self.record(format!("pin {id}"))
        }

        async fn unpin_post(&self, id: &PostId) -> Result<(), ApiError> {
            self.record(format!("unpin {id}"))
        }

        async fn upload_image(&self, upload: ImageUpload) -> Result<String, ApiError> {
            self.record(format!("upload {}", upload.file_name))?;
            Ok(format!("https://cdn.example.com/{}", upload.file_name))
        }
    }

    fn service(source: &Arc<RecordingSource>) -> AdminPostService {
        let posts: Arc<dyn AdminPostsSource> = source.clone();
        AdminPostService::new(posts)
    }

    fn draft() -> PostDraft {
        let mut draft = PostDraft {
            kind: PostType::Tech,
            content_md: "Borrowing explained.".into(),
            ..PostDraft::default()
        };
        draft.set_title("Ownership 101");
        draft
    }

    #[tokio::test]
    async fn create_submits_valid_draft() {
        let source = Arc::new(RecordingSource::default());
        let post = service(&source)
            .create(&draft(), PostStatus::Draft)
            .await
            .expect("created");

        assert_eq!(post.slug, "ownership-101");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(source.calls.lock().unwrap().as_slice(), ["create ownership-101"]);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_api() {
        let source = Arc::new(RecordingSource::default());
        let mut incomplete = draft();
        incomplete.title.clear();

        let err = service(&source)
            .create(&incomplete, PostStatus::Published)
            .await
            .expect_err("title required");

        assert_eq!(err.user_message(), "Please fill in all required fields");
        assert!(!err.requires_login());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_cover_is_rejected_locally() {
        let source = Arc::new(RecordingSource::default());
        let upload = ImageUpload::from_bytes("huge.jpg", vec![0; MAX_IMAGE_BYTES + 1]);

        let err = service(&source)
            .upload_cover(upload)
            .await
            .expect_err("too large");
        assert!(matches!(err, AdminError::Validation(_)));
        assert!(source.calls.lock().unwrap().is_empty());

        let ok = ImageUpload::from_bytes("cover.gif", vec![0; 8]);
        let url = service(&source).upload_cover(ok).await.expect("uploaded");
        assert_eq!(url, "https://cdn.example.com/cover.gif");
    }

    #[tokio::test]
    async fn auth_failures_ask_for_login() {
        let source = Arc::new(RecordingSource {
            reject_with_401: true,
            ..RecordingSource::default()
        });
        let admin = service(&source);
        let id = PostId::Int(4);

        for result in [
            admin.delete(&id).await,
            admin.pin(&id).await,
            admin.unpin(&id).await,
        ] {
            let err = result.expect_err("401");
            assert!(err.requires_login());
        }
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            ["delete 4", "pin 4", "unpin 4"]
        );
    }
}
