//! Instapaper Full API store
//!
//! SECURITY: credentials and tokens are only ever sent to the configured API base.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::oauth::{AccessToken, OAuthSigner};
use crate::config::{InstapaperCredentials, StoreConfig};
use crate::core::{
    ArticleBody, BookmarkId, BookmarkSummary, HighlightGateway, ReadingList, RemoteError,
};

const USER_AGENT: &str = concat!("ip-conductor/", env!("CARGO_PKG_VERSION"));

/// Width handed to the HTML converter; wide enough that it never wraps
const HTML_TEXT_WIDTH: usize = 10_000;

pub struct InstapaperStore {
    client: Client,
    base: Url,
    signer: OAuthSigner,
}

impl InstapaperStore {
    /// Exchange username/password for an access token (xAuth) and return a signed-in store
    pub fn login(
        credentials: &InstapaperCredentials,
        config: &StoreConfig,
    ) -> Result<Self, RemoteError> {
        let base = parse_base(&config.api_base)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(from_network_error)?;

        let mut store = Self {
            client,
            base,
            signer: OAuthSigner::new(&credentials.consumer_key, &credentials.consumer_secret),
        };

        let body = store.post(
            "1/oauth/access_token",
            &[
                ("x_auth_username", credentials.username.as_str()),
                ("x_auth_password", credentials.password.as_str()),
                ("x_auth_mode", "client_auth"),
            ],
        )?;
        let token = parse_access_token(&body)?;
        store.signer = store.signer.with_token(token);

        tracing::info!(user = %credentials.username, "Logged in to Instapaper");
        Ok(store)
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path)
            .map_err(|e| RemoteError::Other(anyhow::anyhow!("invalid endpoint {}: {}", path, e)))
    }

    /// Signed form POST returning the raw response body
    fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<String, RemoteError> {
        let url = self.endpoint(path)?;
        let authorization = self.signer.authorization("POST", url.as_str(), params);

        tracing::debug!(endpoint = path, "Instapaper request");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .form(params)
            .send()
            .map_err(from_network_error)?;

        let status = response.status();
        let text = response.text().map_err(from_network_error)?;
        if !status.is_success() {
            tracing::warn!(endpoint = path, status = status.as_u16(), "Instapaper request failed");
            return Err(api_error(&text)
                .unwrap_or_else(|| RemoteError::from_http_status(status.as_u16(), text)));
        }
        Ok(text)
    }

    fn post_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, RemoteError> {
        let text = self.post(path, params)?;
        if let Some(err) = api_error(&text) {
            return Err(err);
        }
        serde_json::from_str(&text)
            .map_err(|e| RemoteError::InvalidResponse(format!("{}: {}", path, e)))
    }
}

impl HighlightGateway for InstapaperStore {
    fn create_highlight(&self, bookmark: &BookmarkId, text: &str) -> Result<(), RemoteError> {
        let path = format!("1.1/bookmarks/{}/highlight", bookmark.as_str());
        self.post_json(&path, &[("text", text)]).map(|_| ())
    }
}

impl ReadingList for InstapaperStore {
    fn name(&self) -> &str {
        "instapaper"
    }

    fn fetch_bookmarks(&self, limit: usize) -> Result<Vec<BookmarkSummary>, RemoteError> {
        let limit = limit.to_string();
        let value = self.post_json("1/bookmarks/list", &[("limit", limit.as_str())])?;
        parse_bookmark_list(value)
    }

    fn fetch_body(&self, bookmark: &BookmarkId) -> Result<ArticleBody, RemoteError> {
        let html = self.post("1/bookmarks/get_text", &[("bookmark_id", bookmark.as_str())])?;
        if let Some(err) = api_error(&html) {
            return Err(err);
        }
        let text = html2text::from_read(html.as_bytes(), HTML_TEXT_WIDTH)
            .map_err(|e| RemoteError::InvalidResponse(format!("article HTML: {}", e)))?;
        Ok(ArticleBody::new(text))
    }

    fn delete_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.post_json("1/bookmarks/delete", &[("bookmark_id", bookmark.as_str())])
            .map(|_| ())
    }

    fn star_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.post_json("1/bookmarks/star", &[("bookmark_id", bookmark.as_str())])
            .map(|_| ())
    }

    fn archive_bookmark(&self, bookmark: &BookmarkId) -> Result<(), RemoteError> {
        self.post_json("1/bookmarks/archive", &[("bookmark_id", bookmark.as_str())])
            .map(|_| ())
    }

    fn add_bookmark(&self, url: &str) -> Result<(), RemoteError> {
        self.post_json("1/bookmarks/add", &[("url", url)]).map(|_| ())
    }
}

fn parse_base(api_base: &str) -> Result<Url, RemoteError> {
    // `Url::join` drops the last segment unless the base ends in a slash
    let normalized = format!("{}/", api_base.trim().trim_end_matches('/'));
    Url::parse(&normalized)
        .map_err(|e| RemoteError::Other(anyhow::anyhow!("invalid API base {}: {}", api_base, e)))
}

fn from_network_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Network(format!("Request timeout: {}", e))
    } else if e.is_connect() {
        RemoteError::Network(format!("Connection failed: {}", e))
    } else if let Some(status) = e.status() {
        RemoteError::from_http_status(status.as_u16(), e.to_string())
    } else {
        RemoteError::Network(e.to_string())
    }
}

/// `oauth_token=..&oauth_token_secret=..` from the access-token endpoint
fn parse_access_token(body: &str) -> Result<AccessToken, RemoteError> {
    let mut token = None;
    let mut secret = None;
    for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match &*key {
            "oauth_token" => token = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            _ => {}
        }
    }
    match (token, secret) {
        (Some(token), Some(secret)) => Ok(AccessToken { token, secret }),
        _ => Err(RemoteError::InvalidResponse(
            "access token response is missing oauth_token".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

/// Error object embedded in a response body, if there is one
fn api_error(body: &str) -> Option<RemoteError> {
    let items: Vec<ErrorItem> = match serde_json::from_str::<Vec<Value>>(body.trim()) {
        Ok(values) => values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        Err(_) => return None,
    };
    items
        .into_iter()
        .find(|item| item.kind == "error")
        .map(|item| RemoteError::Api {
            code: item.error_code,
            message: item.message,
        })
}

#[derive(Debug, Deserialize)]
struct RawBookmark {
    bookmark_id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    starred: Value,
}

impl RawBookmark {
    fn into_summary(self) -> Option<BookmarkSummary> {
        let id = match self.bookmark_id {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.is_empty() => s,
            _ => return None,
        };
        let starred = match self.starred {
            Value::Bool(b) => b,
            Value::String(s) => s == "1",
            Value::Number(n) => n.as_i64() == Some(1),
            _ => false,
        };
        Some(BookmarkSummary {
            id: BookmarkId::new(id),
            title: self.title,
            url: self.url,
            starred,
        })
    }
}

/// Bookmarks from a `bookmarks/list` response, in API order
///
/// API 1 returns a flat array mixing `meta`, `user` and `bookmark` items;
/// API 1.1 wraps them in an object under `bookmarks`.
fn parse_bookmark_list(value: Value) -> Result<Vec<BookmarkSummary>, RemoteError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("bookmarks") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RemoteError::InvalidResponse(
                    "bookmark list has no bookmarks".to_string(),
                ))
            }
        },
        _ => {
            return Err(RemoteError::InvalidResponse(
                "unexpected bookmark list payload".to_string(),
            ))
        }
    };

    Ok(items
        .into_iter()
        .filter(|item| {
            item.get("type")
                .and_then(Value::as_str)
                .map_or(true, |kind| kind == "bookmark")
        })
        .filter_map(|item| serde_json::from_value::<RawBookmark>(item).ok())
        .filter_map(RawBookmark::into_summary)
        .collect())
}
