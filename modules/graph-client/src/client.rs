use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::types::{
    CreatedObject, IdOnly, ListEnvelope, PagedList, PagingParameters, Post, PostData, User,
};

const GRAPH_API_URL: &str = "https://graph.facebook.com/v19.0";

/// Fields requested for feed items.
const FEED_FIELDS: &str = "id,message,story,created_time,updated_time,from,link,name,caption,description,picture,place,type,status_type";

/// Fields requested for friend profiles.
const PROFILE_FIELDS: &str = "id,name,first_name,last_name,email,gender,locale,link";

/// HTTP client for the Facebook Graph API, authenticated with a user or page token.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    application_namespace: Option<String>,
    app_id: Option<String>,
}

impl GraphClient {
    pub fn new(
        access_token: impl Into<String>,
        application_namespace: Option<String>,
        app_id: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GRAPH_API_URL.to_string(),
            access_token: access_token.into(),
            application_namespace,
            app_id,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn application_namespace(&self) -> Option<&str> {
        self.application_namespace.as_deref()
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn feed_operations(&self) -> FeedOperations<'_> {
        FeedOperations { graph: self }
    }

    pub fn friend_operations(&self) -> FriendOperations<'_> {
        FriendOperations { graph: self }
    }

    pub fn media_operations(&self) -> MediaOperations<'_> {
        MediaOperations { graph: self }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GraphError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| GraphError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<PagedList<T>> {
        let url = self.endpoint(segments)?;
        debug!(path = url.path(), ?query, "Graph GET");

        let envelope: ListEnvelope<T> = self.send(self.http.get(url).query(query)).await?;
        Ok(envelope.into_paged())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.access_token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphError::from_response(status.as_u16(), &body));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Reads and writes against a profile's feed.
pub struct FeedOperations<'a> {
    graph: &'a GraphClient,
}

impl FeedOperations<'_> {
    /// Posts from the authenticated user's own feed.
    pub async fn get_feed(&self, paging: &PagingParameters) -> Result<PagedList<Post>> {
        self.get_feed_for("me", paging).await
    }

    pub async fn get_feed_for(
        &self,
        owner_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<Post>> {
        let mut query = vec![("fields", FEED_FIELDS.to_string())];
        query.extend(paging.to_query());
        self.graph.get_list(&[owner_id, "feed"], &query).await
    }

    /// Publish to `data.target_feed_id` and return the new post id.
    pub async fn post(&self, data: &PostData) -> Result<String> {
        let url = self.graph.endpoint(&[&data.target_feed_id, "feed"])?;
        let form = data.to_form();
        debug!(
            path = url.path(),
            fields = ?form.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            "Graph POST feed"
        );

        let created: CreatedObject = self
            .graph
            .send(self.graph.http.post(url).form(&form))
            .await?;
        Ok(created.id)
    }
}

/// Friend list lookups. Graph orders friends by id.
pub struct FriendOperations<'a> {
    graph: &'a GraphClient,
}

impl FriendOperations<'_> {
    pub async fn get_friend_profiles(
        &self,
        user_id: &str,
        paging: &PagingParameters,
    ) -> Result<PagedList<User>> {
        let mut query = vec![("fields", PROFILE_FIELDS.to_string())];
        query.extend(paging.to_query());
        self.graph.get_list(&[user_id, "friends"], &query).await
    }

    pub async fn get_friend_ids(&self, user_id: &str) -> Result<PagedList<String>> {
        let query = [("fields", "id".to_string())];
        let page: PagedList<IdOnly> = self.graph.get_list(&[user_id, "friends"], &query).await?;
        Ok(page.map(|friend| friend.id))
    }
}

/// Photo uploads.
pub struct MediaOperations<'a> {
    graph: &'a GraphClient,
}

impl MediaOperations<'_> {
    /// Upload to the app's default album for the authenticated user.
    pub async fn post_photo(&self, path: &Path, caption: Option<&str>) -> Result<String> {
        let mut form = Form::new().part("source", photo_part(path).await?);
        if let Some(caption) = caption {
            form = form.text("message", caption.to_string());
        }
        self.upload(&["me", "photos"], form).await
    }

    /// Upload into a specific album. Apps may only write to albums they created.
    pub async fn post_photo_to_album(&self, album_id: &str, path: &Path) -> Result<String> {
        let form = Form::new().part("source", photo_part(path).await?);
        self.upload(&[album_id, "photos"], form).await
    }

    async fn upload(&self, segments: &[&str], form: Form) -> Result<String> {
        let url = self.graph.endpoint(segments)?;
        debug!(path = url.path(), "Graph POST photo");

        let created: CreatedObject = self
            .graph
            .send(self.graph.http.post(url).multipart(form))
            .await?;
        Ok(created.id)
    }
}

async fn photo_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GraphError::Io(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("photo")
        .to_string();

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?;
    Ok(part)
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
