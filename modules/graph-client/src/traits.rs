use std::path::Path;

use async_trait::async_trait;

use crate::client::GraphClient;
use crate::error::Result;
use crate::types::{PagedList, PagingParameters, Post, PostData, User};

// =============================================================================
// GraphApi Trait
// =============================================================================

/// The operations a Graph-backed caller needs, one method per endpoint.
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn get_feed(&self, paging: &PagingParameters) -> Result<PagedList<Post>>;

    async fn get_friend_profiles(
        &self,
        user_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<User>>;

    async fn get_friend_ids(&self, user_id: &str) -> Result<PagedList<String>>;

    async fn post(&self, data: &PostData) -> Result<String>;

    async fn post_photo(&self, path: &Path, caption: Option<&str>) -> Result<String>;

    async fn post_photo_to_album(&self, album_id: &str, path: &Path) -> Result<String>;
}

// =============================================================================
// GraphClient
// =============================================================================

#[async_trait]
impl GraphApi for GraphClient {
    async fn get_feed(&self, paging: &PagingParameters) -> Result<PagedList<Post>> {
        self.feed_operations().get_feed(paging).await
    }

    async fn get_friend_profiles(
        &self,
        user_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<User>> {
        self.friend_operations()
            .get_friend_profiles(user_id, paging)
            .await
    }

    async fn get_friend_ids(&self, user_id: &str) -> Result<PagedList<String>> {
        self.friend_operations().get_friend_ids(user_id).await
    }

    async fn post(&self, data: &PostData) -> Result<String> {
        self.feed_operations().post(data).await
    }

    async fn post_photo(&self, path: &Path, caption: Option<&str>) -> Result<String> {
        self.media_operations().post_photo(path, caption).await
    }

    async fn post_photo_to_album(&self, album_id: &str, path: &Path) -> Result<String> {
        self.media_operations()
            .post_photo_to_album(album_id, path)
            .await
    }
}
