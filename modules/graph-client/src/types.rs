use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Graph timestamp layout, e.g. `2024-03-01T18:04:11+0000`.
const GRAPH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

// --- Paging ---

/// Paging window for list endpoints. Unset fields are left to the API defaults
/// (the feed endpoint returns 25 items when `limit` is absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParameters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Unix timestamp, lower bound for time-sensitive content.
    pub since: Option<i64>,
    /// Unix timestamp, upper bound for time-sensitive content.
    pub until: Option<i64>,
    /// Cursor pointing at the end of the page that was returned.
    pub after: Option<String>,
    /// Cursor pointing at the start of the page that was returned.
    pub before: Option<String>,
    /// Opaque `__paging_token` Graph attaches to time-based feed links.
    pub paging_token: Option<String>,
}

impl PagingParameters {
    pub fn new(
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
        after: Option<String>,
        before: Option<String>,
    ) -> Self {
        Self {
            limit,
            offset,
            since,
            until,
            after,
            before,
            paging_token: None,
        }
    }

    /// Offset/time window without cursors.
    pub fn windowed(
        limit: Option<u32>,
        offset: Option<u32>,
        since: Option<i64>,
        until: Option<i64>,
    ) -> Self {
        Self::new(limit, offset, since, until, None, None)
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(since) = self.since {
            query.push(("since", since.to_string()));
        }
        if let Some(until) = self.until {
            query.push(("until", until.to_string()));
        }
        if let Some(ref after) = self.after {
            query.push(("after", after.clone()));
        }
        if let Some(ref before) = self.before {
            query.push(("before", before.clone()));
        }
        if let Some(ref token) = self.paging_token {
            query.push(("__paging_token", token.clone()));
        }
        query
    }

    /// Recover the paging window from a `paging.next` / `paging.previous` URL.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = reqwest::Url::parse(url).ok()?;
        let mut paging = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "limit" => paging.limit = value.parse().ok(),
                "offset" => paging.offset = value.parse().ok(),
                "since" => paging.since = value.parse().ok(),
                "until" => paging.until = value.parse().ok(),
                "after" => paging.after = Some(value.into_owned()),
                "before" => paging.before = Some(value.into_owned()),
                "__paging_token" => paging.paging_token = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(paging)
    }
}

/// One page of results plus the windows for the neighbouring pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    pub data: Vec<T>,
    pub previous_page: Option<PagingParameters>,
    pub next_page: Option<PagingParameters>,
    pub total_count: Option<u64>,
}

impl<T> PagedList<T> {
    pub fn new(
        data: Vec<T>,
        previous_page: Option<PagingParameters>,
        next_page: Option<PagingParameters>,
    ) -> Self {
        Self {
            data,
            previous_page,
            next_page,
            total_count: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Convert the items while keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            data: self.data.into_iter().map(f).collect(),
            previous_page: self.previous_page,
            next_page: self.next_page,
            total_count: self.total_count,
        }
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Wire shape of every Graph list response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

/// Only the links are kept; a missing `next` marks the last page even when
/// `cursors` are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Paging {
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Summary {
    pub total_count: Option<u64>,
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_paged(self) -> PagedList<T> {
        let paging = self.paging.unwrap_or_default();

        PagedList {
            data: self.data,
            previous_page: paging.previous.as_deref().and_then(PagingParameters::from_url),
            next_page: paging.next.as_deref().and_then(PagingParameters::from_url),
            total_count: self.summary.and_then(|s| s.total_count),
        }
    }
}

// --- Graph objects ---

/// Id plus display name, as embedded in `from` and `place`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub message: Option<String>,
    pub story: Option<String>,
    pub created_time: Option<String>,
    pub updated_time: Option<String>,
    pub from: Option<Reference>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub place: Option<Reference>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status_type: Option<String>,
}

impl Post {
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_graph_time(self.created_time.as_deref()?)
    }

    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_graph_time(self.updated_time.as_deref()?)
    }
}

fn parse_graph_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, GRAPH_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub locale: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdOnly {
    pub id: String,
}

/// Response to any create call (`/feed`, `/photos`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub id: String,
    pub post_id: Option<String>,
}

// --- Feed writes ---

/// Content of a feed post. Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostData {
    pub target_feed_id: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub picture: Option<String>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub place: Option<String>,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl PostData {
    pub fn new(target_feed_id: impl Into<String>) -> Self {
        Self {
            target_feed_id: target_feed_id.into(),
            ..Self::default()
        }
    }

    pub fn message(mut self, message: Option<&str>) -> Self {
        self.message = message.map(String::from);
        self
    }

    pub fn link(
        mut self,
        url: Option<&str>,
        picture: Option<&str>,
        name: Option<&str>,
        caption: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        self.link = url.map(String::from);
        self.picture = picture.map(String::from);
        self.name = name.map(String::from);
        self.caption = caption.map(String::from);
        self.description = description.map(String::from);
        self
    }

    pub fn tags(mut self, tags: Option<&[String]>) -> Self {
        self.tags = tags.map(<[String]>::to_vec).unwrap_or_default();
        self
    }

    pub fn place(mut self, place_id: Option<&str>) -> Self {
        self.place = place_id.map(String::from);
        self
    }

    pub fn allow(mut self, allow: Option<&[String]>) -> Self {
        self.allow = allow.map(<[String]>::to_vec).unwrap_or_default();
        self
    }

    pub fn deny(mut self, deny: Option<&[String]>) -> Self {
        self.deny = deny.map(<[String]>::to_vec).unwrap_or_default();
        self
    }

    /// Form body for `POST /{target}/feed`.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();
        let text_fields = [
            ("message", &self.message),
            ("link", &self.link),
            ("picture", &self.picture),
            ("name", &self.name),
            ("caption", &self.caption),
            ("description", &self.description),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                form.push((key, value.to_string()));
            }
        }
        if !self.tags.is_empty() {
            form.push(("tags", self.tags.join(",")));
        }
        if let Some(place) = self.place.as_deref().filter(|p| !p.is_empty()) {
            form.push(("place", place.to_string()));
        }
        if let Some(privacy) = self.privacy() {
            form.push(("privacy", privacy.to_string()));
        }
        form
    }

    fn privacy(&self) -> Option<serde_json::Value> {
        if self.allow.is_empty() && self.deny.is_empty() {
            return None;
        }
        let mut privacy = serde_json::Map::new();
        privacy.insert("value".into(), "CUSTOM".into());
        if !self.allow.is_empty() {
            privacy.insert("allow".into(), self.allow.join(",").into());
        }
        if !self.deny.is_empty() {
            privacy.insert("deny".into(), self.deny.join(",").into());
        }
        Some(serde_json::Value::Object(privacy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn query_only_contains_set_fields() {
        assert!(PagingParameters::default().to_query().is_empty());

        let paging = PagingParameters::new(
            Some(10),
            None,
            Some(1_700_000_000),
            None,
            Some("QVFI".into()),
            None,
        );
        assert_eq!(
            paging.to_query(),
            vec![
                ("limit", "10".to_string()),
                ("since", "1700000000".to_string()),
                ("after", "QVFI".to_string()),
            ]
        );
    }

    #[test]
    fn paging_is_recovered_from_next_url() {
        let url = "https://graph.facebook.com/v19.0/me/feed?fields=id&limit=25&until=1709312651&__paging_token=enc&access_token=abc";
        let paging = PagingParameters::from_url(url).unwrap();
        assert_eq!(paging.limit, Some(25));
        assert_eq!(paging.until, Some(1_709_312_651));
        assert_eq!(paging.since, None);
        assert_eq!(paging.after, None);
        assert_eq!(paging.paging_token.as_deref(), Some("enc"));
        assert_eq!(
            paging.to_query(),
            vec![
                ("limit", "25".to_string()),
                ("until", "1709312651".to_string()),
                ("__paging_token", "enc".to_string()),
            ]
        );

        assert!(PagingParameters::from_url("not a url").is_none());
    }

    #[test]
    fn next_link_becomes_next_page() {
        let raw = r#"{
            "data": [{"id": "1"}, {"id": "2"}],
            "paging": {
                "cursors": {"before": "B", "after": "A"},
                "next": "https://graph.facebook.com/v19.0/me/friends?limit=2&after=A"
            },
            "summary": {"total_count": 140}
        }"#;
        let envelope: ListEnvelope<IdOnly> = serde_json::from_str(raw).unwrap();
        let page = envelope.into_paged().map(|item| item.id);

        assert_eq!(page.data, ids(&["1", "2"]));
        assert_eq!(page.total_count, Some(140));
        assert_eq!(page.previous_page, None);
        let next = page.next_page.unwrap();
        assert_eq!(next.limit, Some(2));
        assert_eq!(next.after.as_deref(), Some("A"));
    }

    #[test]
    fn cursors_without_links_mean_last_page() {
        let raw = r#"{
            "data": [{"id": "1"}],
            "paging": {"cursors": {"before": "B", "after": "A"}}
        }"#;
        let page = serde_json::from_str::<ListEnvelope<IdOnly>>(raw)
            .unwrap()
            .into_paged();
        assert_eq!(page.len(), 1);
        assert!(page.previous_page.is_none());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn missing_paging_means_single_page() {
        let page = serde_json::from_str::<ListEnvelope<IdOnly>>(r#"{"data": [{"id": "9"}]}"#)
            .unwrap()
            .into_paged();
        assert_eq!(page.len(), 1);
        assert!(page.previous_page.is_none());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn post_timestamps_parse_graph_format() {
        let post: Post = serde_json::from_str(
            r#"{"id": "1_2", "message": "hi", "created_time": "2024-03-01T18:04:11+0000", "type": "status"}"#,
        )
        .unwrap();
        let created = post.created_at().unwrap();
        assert_eq!(created.timestamp(), 1_709_316_251);
        assert_eq!(post.kind.as_deref(), Some("status"));
        assert!(post.updated_at().is_none());
    }

    #[test]
    fn minimal_form_is_just_the_message() {
        let data = PostData::new("me").message(Some("hello"));
        assert_eq!(data.to_form(), vec![("message", "hello".to_string())]);
    }

    #[test]
    fn full_form_carries_link_tags_place_and_privacy() {
        let tags = ids(&["11", "12"]);
        let allow = ids(&["21"]);
        let deny = ids(&["31", "32"]);
        let data = PostData::new("page-1")
            .message(Some("launch"))
            .link(
                Some("https://example.com"),
                Some("https://example.com/p.png"),
                Some("Example"),
                None,
                Some("desc"),
            )
            .tags(Some(&tags))
            .place(Some("1100"))
            .allow(Some(&allow))
            .deny(Some(&deny));

        let form = data.to_form();
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("message"), Some("launch"));
        assert_eq!(get("link"), Some("https://example.com"));
        assert_eq!(get("picture"), Some("https://example.com/p.png"));
        assert_eq!(get("name"), Some("Example"));
        assert_eq!(get("caption"), None);
        assert_eq!(get("description"), Some("desc"));
        assert_eq!(get("tags"), Some("11,12"));
        assert_eq!(get("place"), Some("1100"));

        let privacy: serde_json::Value = serde_json::from_str(get("privacy").unwrap()).unwrap();
        assert_eq!(
            privacy,
            serde_json::json!({"value": "CUSTOM", "allow": "21", "deny": "31,32"})
        );
    }

    #[test]
    fn empty_lists_and_strings_are_unset() {
        let empty: Vec<String> = Vec::new();
        let data = PostData::new("me")
            .message(Some(""))
            .tags(Some(&empty))
            .allow(Some(&empty))
            .deny(None)
            .place(Some(""));
        assert!(data.to_form().is_empty());
    }
}
