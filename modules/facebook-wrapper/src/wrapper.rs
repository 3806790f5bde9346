use std::path::Path;

use graph_client::{
    GraphApi, GraphClient, PagedList, PagingParameters, Post, PostData, Result, User,
};
use tracing::debug;

use crate::config::WrapperConfig;

/// Friend and feed calls without an explicit user act on the token's owner.
const CURRENT_USER: &str = "me";

/// Narrow convenience surface over a [`GraphApi`] client.
///
/// Every method fills the parameters it does not take with `None` (or `"me"`
/// for the target profile) and returns the client's result untouched.
pub struct FacebookWrapper<C: GraphApi = GraphClient> {
    graph: C,
}

impl FacebookWrapper<GraphClient> {
    pub fn new(access_token: &str) -> Self {
        Self::with_namespace(access_token, None)
    }

    pub fn with_namespace(access_token: &str, application_namespace: Option<&str>) -> Self {
        Self::with_app(access_token, application_namespace, None)
    }

    pub fn with_app(
        access_token: &str,
        application_namespace: Option<&str>,
        app_id: Option<&str>,
    ) -> Self {
        Self::from_client(GraphClient::new(
            access_token,
            application_namespace.map(String::from),
            app_id.map(String::from),
        ))
    }

    pub fn from_config(config: &WrapperConfig) -> Self {
        let mut graph = GraphClient::new(
            config.access_token.clone(),
            config.application_namespace.clone(),
            config.app_id.clone(),
        );
        if let Some(ref url) = config.graph_url {
            graph = graph.with_base_url(url);
        }
        Self::from_client(graph)
    }
}

impl<C: GraphApi> FacebookWrapper<C> {
    pub fn from_client(graph: C) -> Self {
        Self { graph }
    }

    pub fn client(&self) -> &C {
        &self.graph
    }

    // --- Timeline ---

    /// Most recent posts (the API default is 25).
    pub async fn get_timeline(&self) -> Result<PagedList<Post>> {
        self.get_timeline_paged(None, None, None, None, None, None)
            .await
    }

    pub async fn get_timeline_limit(&self, limit: u32) -> Result<PagedList<Post>> {
        self.get_timeline_paged(Some(limit), None, None, None, None, None)
            .await
    }

    pub async fn get_timeline_since(
        &self,
        limit: Option<u32>,
        since: Option<i64>,
    ) -> Result<PagedList<Post>> {
        self.get_timeline_paged(limit, None, since, None, None, None)
            .await
    }

    pub async fn get_timeline_between(
        &self,
        limit: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Result<PagedList<Post>> {
        self.get_timeline_paged(limit, None, since, until, None, None)
            .await
    }

    pub async fn get_timeline_window(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Result<PagedList<Post>> {
        self.get_timeline_paged(limit, offset, since, until, None, None)
            .await
    }

    /// `after` / `before` are the cursors returned with a previous page.
    pub async fn get_timeline_paged(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
        after: Option<&str>,
        before: Option<&str>,
    ) -> Result<PagedList<Post>> {
        let paging = PagingParameters::new(
            limit,
            offset,
            since,
            until,
            after.map(String::from),
            before.map(String::from),
        );
        self.get_timeline_page(&paging).await
    }

    /// Fetch the page described by a `next_page` / `previous_page` window.
    pub async fn get_timeline_page(&self, paging: &PagingParameters) -> Result<PagedList<Post>> {
        debug!(?paging, "Fetching timeline");
        self.graph.get_feed(paging).await
    }

    // --- Friend profiles ---

    pub async fn get_friend_list_profiles(&self) -> Result<PagedList<User>> {
        self.get_friend_list_profiles_of_window(CURRENT_USER, None, None, None, None)
            .await
    }

    pub async fn get_friend_list_profiles_limit(&self, limit: u32) -> Result<PagedList<User>> {
        self.get_friend_list_profiles_window(Some(limit), None, None, None)
            .await
    }

    pub async fn get_friend_list_profiles_of(&self, user_id: &str) -> Result<PagedList<User>> {
        self.get_friend_list_profiles_of_window(user_id, None, None, None, None)
            .await
    }

    pub async fn get_friend_list_profiles_of_limit(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<PagedList<User>> {
        self.get_friend_list_profiles_of_window(user_id, Some(limit), None, None, None)
            .await
    }

    pub async fn get_friend_list_profiles_window(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Result<PagedList<User>> {
        self.get_friend_list_profiles_of_window(CURRENT_USER, limit, offset, since, until)
            .await
    }

    pub async fn get_friend_list_profiles_of_window(
        &self,
        user_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Result<PagedList<User>> {
        let paging = PagingParameters::windowed(limit, offset, since, until);
        debug!(user_id, ?paging, "Fetching friend profiles");
        self.graph.get_friend_profiles(user_id, &paging).await
    }

    // --- Friend ids ---

    pub async fn get_friend_list_ids(&self) -> Result<PagedList<String>> {
        self.get_friend_list_ids_of(CURRENT_USER).await
    }

    pub async fn get_friend_list_ids_of(&self, user_id: &str) -> Result<PagedList<String>> {
        debug!(user_id, "Fetching friend ids");
        self.graph.get_friend_ids(user_id).await
    }

    // --- Status posts ---

    pub async fn post(&self, message: &str) -> Result<String> {
        self.post_to_own_feed(message, None, None, None).await
    }

    /// `tags` are profile ids to tag in the status.
    pub async fn post_with_tags(&self, message: &str, tags: &[String]) -> Result<String> {
        self.post_to_own_feed(message, None, Some(tags), None).await
    }

    pub async fn post_with_tags_at(
        &self,
        message: &str,
        tags: &[String],
        place_id: &str,
    ) -> Result<String> {
        self.post_to_own_feed(message, None, Some(tags), Some(place_id))
            .await
    }

    pub async fn post_link(&self, message: &str, link_url: &str) -> Result<String> {
        self.post_to_own_feed(message, Some(link_url), None, None)
            .await
    }

    pub async fn post_link_with_tags(
        &self,
        message: &str,
        link_url: &str,
        tags: &[String],
    ) -> Result<String> {
        self.post_to_own_feed(message, Some(link_url), Some(tags), None)
            .await
    }

    pub async fn post_link_with_tags_at(
        &self,
        message: &str,
        link_url: &str,
        tags: &[String],
        place_id: &str,
    ) -> Result<String> {
        self.post_to_own_feed(message, Some(link_url), Some(tags), Some(place_id))
            .await
    }

    /// Post to any feed the token may write to.
    ///
    /// `name`, `caption`, `description` and `picture` describe the link preview.
    /// `allow` / `deny` hold profile ids and make the post's privacy custom.
    #[allow(clippy::too_many_arguments)]
    pub async fn post_full(
        &self,
        target_feed_id: &str,
        message: Option<&str>,
        link_url: Option<&str>,
        name: Option<&str>,
        caption: Option<&str>,
        description: Option<&str>,
        tags: Option<&[String]>,
        place_id: Option<&str>,
        picture: Option<&str>,
        allow: Option<&[String]>,
        deny: Option<&[String]>,
    ) -> Result<String> {
        let data = PostData::new(target_feed_id)
            .message(message)
            .link(link_url, picture, name, caption, description)
            .tags(tags)
            .place(place_id)
            .allow(allow)
            .deny(deny);

        debug!(target_feed_id, "Posting status");
        self.graph.post(&data).await
    }

    async fn post_to_own_feed(
        &self,
        message: &str,
        link_url: Option<&str>,
        tags: Option<&[String]>,
        place_id: Option<&str>,
    ) -> Result<String> {
        self.post_full(
            CURRENT_USER,
            Some(message),
            link_url,
            None,
            None,
            None,
            tags,
            place_id,
            None,
            None,
            None,
        )
        .await
    }

    // --- Photos ---

    pub async fn upload_photo(&self, path: impl AsRef<Path>) -> Result<String> {
        self.upload_photo_caption(path.as_ref(), None).await
    }

    pub async fn upload_photo_with_caption(
        &self,
        path: impl AsRef<Path>,
        caption: &str,
    ) -> Result<String> {
        self.upload_photo_caption(path.as_ref(), Some(caption))
            .await
    }

    /// Apps can only upload into albums they created.
    pub async fn upload_photo_to_album(
        &self,
        album_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<String> {
        let path = path.as_ref();
        debug!(album_id, path = %path.display(), "Uploading photo to album");
        self.graph.post_photo_to_album(album_id, path).await
    }

    async fn upload_photo_caption(&self, path: &Path, caption: Option<&str>) -> Result<String> {
        debug!(path = %path.display(), "Uploading photo");
        self.graph.post_photo(path, caption).await
    }
}
