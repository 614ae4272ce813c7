use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Url, header, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::form_urlencoded;
use wfhubby_api_types::{
    CreatePostRequest, LoginResponse, Post, PostId, PostListEnvelope, PostsPage, UploadResponse,
};

use super::error::{ApiError, Operation, Outcome, classify};
use crate::domain::draft::ImageUpload;
use crate::domain::filter::FilterState;
use crate::infra::session::Session;

/// Typed client for the content API.
///
/// Every response passes through [`classify`]; a 401 on a privileged call
/// revokes the shared [`Session`] before the error is returned.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    root: Url,
    prefix: Vec<String>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, prefix: &str, session: Arc<Session>) -> Result<Self, ApiError> {
        let root = Url::parse(base_url)?;
        if root.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        let prefix = prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            http,
            root,
            prefix,
            session,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("wfhubby/", env!("CARGO_PKG_VERSION"))
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// `{base}{prefix}/{segments..}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&self.prefix).extend(segments);
        }
        url
    }

    pub async fn list_posts(&self, filter: &FilterState) -> Result<PostsPage, ApiError> {
        let mut url = self.endpoint(&["posts"]);
        let params = filter.to_query_params();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, value);
            }
        }
        let body = self
            .execute(
                Operation::ListPosts,
                self.request(Operation::ListPosts, Method::GET, url),
            )
            .await?;
        let envelope: PostListEnvelope = decode(&body)?;
        Ok(PostsPage::from(envelope))
    }

    pub async fn get_post(&self, id_or_slug: &str) -> Result<Post, ApiError> {
        let url = self.endpoint(&["posts", id_or_slug]);
        let body = self
            .execute(
                Operation::GetPost,
                self.request(Operation::GetPost, Method::GET, url),
            )
            .await?;
        decode(&body)
    }

    pub async fn create_post(&self, payload: &CreatePostRequest) -> Result<Post, ApiError> {
        let url = self.endpoint(&["admin", "posts"]);
        let request = self
            .request(Operation::CreatePost, Method::POST, url)
            .json(payload);
        let body = self.execute(Operation::CreatePost, request).await?;
        decode(&body)
    }

    pub async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", "posts", &id]);
        self.execute(
            Operation::DeletePost,
            self.request(Operation::DeletePost, Method::DELETE, url),
        )
        .await?;
        Ok(())
    }

    pub async fn pin_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.toggle_pin(Operation::PinPost, id, "pin").await
    }

    pub async fn unpin_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.toggle_pin(Operation::UnpinPost, id, "unpin").await
    }

    async fn toggle_pin(&self, op: Operation, id: &PostId, action: &str) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", "posts", &id, action]);
        self.execute(op, self.request(op, Method::POST, url))
            .await?;
        Ok(())
    }

    /// Upload `upload` as the multipart field `file` and return the hosted URL.
    pub async fn upload_image(&self, upload: ImageUpload) -> Result<String, ApiError> {
        let url = self.endpoint(&["admin", "upload-image"]);
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new().part("file", part);
        let request = self
            .request(Operation::UploadImage, Method::POST, url)
            .multipart(form);
        let body = self.execute(Operation::UploadImage, request).await?;
        let uploaded: UploadResponse = decode(&body)?;
        Ok(uploaded.url)
    }

    /// Exchange credentials for a bearer token and store it in the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .append_pair("password", password)
            .finish();
        let request = self
            .request(Operation::Login, Method::POST, url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form);
        let body = self.execute(Operation::Login, request).await?;
        let login: LoginResponse = decode(&body)?;
        if !login.access_token.is_empty() {
            self.session.issue(&login.access_token)?;
            info!(username, "logged in");
        }
        Ok(login)
    }

    /// Tell the backend about the logout, ignoring the outcome, then clear the
    /// local credential.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "logout"]);
        match self.request(Operation::Logout, Method::POST, url).send().await {
            Ok(response) => debug!(status = %response.status(), "logout acknowledged"),
            Err(err) => debug!(error = %err, "logout notification failed"),
        }
        self.session.revoke()?;
        Ok(())
    }

    fn request(&self, op: Operation, method: Method, url: Url) -> RequestBuilder {
        debug!(operation = ?op, method = %method, path = url.path(), "api request");
        let builder = self.http.request(method, url);
        let wants_bearer = op.is_privileged() || op == Operation::Logout;
        match self.session.bearer() {
            Some(token) if wants_bearer => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn execute(&self, op: Operation, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await;
        match classify(op, status, body.as_deref().unwrap_or_default()) {
            Outcome::Success => Ok(body?),
            Outcome::AuthRequired => {
                info!(operation = ?op, "credential rejected; revoking session");
                if let Err(err) = self.session.revoke() {
                    warn!(error = %err, "failed to clear stored credential");
                }
                Err(ApiError::AuthRequired)
            }
            Outcome::Fetch { status, message } => {
                debug!(operation = ?op, status = status.as_u16(), %message, "api request failed");
                Err(ApiError::fetch(status, message))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::Decode)
}
