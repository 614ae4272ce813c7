use std::sync::Arc;

use crate::application::repos::AdminPostsSource;

#[derive(Clone)]
pub struct AdminPostService {
    pub(crate) posts: Arc<dyn AdminPostsSource>,
}

impl AdminPostService {
    pub fn new(posts: Arc<dyn AdminPostsSource>) -> Self {
        Self { posts }
    }
}
