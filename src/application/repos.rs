//! Source traits describing the content API as seen by application services.

use async_trait::async_trait;
use wfhubby_api_types::{CreatePostRequest, Post, PostId, PostsPage};

use crate::domain::draft::ImageUpload;
use crate::domain::filter::FilterState;
use crate::infra::http::{ApiClient, ApiError};

#[async_trait]
pub trait PostsSource: Send + Sync {
    async fn list_posts(&self, filter: &FilterState) -> Result<PostsPage, ApiError>;
}

#[async_trait]
pub trait AdminPostsSource: Send + Sync {
    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError>;

    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError>;

    async fn pin_post(&self, id: &PostId) -> Result<(), ApiError>;

    async fn unpin_post(&self, id: &PostId) -> Result<(), ApiError>;

    async fn upload_image(&self, upload: ImageUpload) -> Result<String, ApiError>;
}

#[async_trait]
impl PostsSource for ApiClient {
    async fn list_posts(&self, filter: &FilterState) -> Result<PostsPage, ApiError> {
        ApiClient::list_posts(self, filter).await
    }
}

#[async_trait]
impl AdminPostsSource for ApiClient {
    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        ApiClient::create_post(self, request).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        ApiClient::delete_post(self, id).await
    }

    async fn pin_post(&self, id: &PostId) -> Result<(), ApiError> {
        ApiClient::pin_post(self, id).await
    }

    async fn unpin_post(&self, id: &PostId) -> Result<(), ApiError> {
        ApiClient::unpin_post(self, id).await
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<String, ApiError> {
        ApiClient::upload_image(self, upload).await
    }
}
