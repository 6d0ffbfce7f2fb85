//! The one configured HTTP client.
//!
//! Every request goes through [`ApiClient::send`], which attaches the bearer
//! token from the shared [`SessionHandle`] and normalises failures. A 401 on
//! an authenticated request ends the session through a single handler so the
//! caller only has to send the user back to the login step.

use crate::error::{ClientError, ClientResult};
use ayura_core::{CoreConfig, SessionHandle};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: SessionHandle,
}

/// Whether a request carries the bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Auth {
    Bearer,
    Anonymous,
}

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Envelope { data: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

/// Single-item endpoints may wrap the item in `{ "data": ... }` as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemBody<T> {
    Envelope { data: T },
    Bare(T),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Build the client from startup configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the TLS backend cannot be initialised.
    pub fn new(cfg: &CoreConfig, session: SessionHandle) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.http_timeout())
            .user_agent(concat!("ayura-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base: cfg.api_url().clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
    ) -> ClientResult<RequestBuilder> {
        let builder = self.http.request(method, self.url(path)?);
        match auth {
            Auth::Anonymous => Ok(builder),
            Auth::Bearer => {
                let token = self
                    .session
                    .bearer_token()
                    .ok_or(ClientError::NotAuthenticated)?;
                Ok(builder.bearer_auth(token))
            }
        }
    }

    /// Send a request and turn non-success statuses into errors.
    pub(crate) async fn send(&self, builder: RequestBuilder, auth: Auth) -> ClientResult<Response> {
        let request = builder.build().map_err(ClientError::Request)?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::Network)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            self.handle_unauthorized(&url);
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        tracing::warn!(%method, %url, %status, "request failed: {message}");
        Err(ClientError::Status { status, message })
    }

    /// The single logout path for rejected tokens.
    fn handle_unauthorized(&self, url: &Url) {
        tracing::warn!(%url, "backend rejected the session token; signing out");
        if let Err(e) = self.session.end() {
            tracing::error!("failed to clear session after 401: {e}");
        }
    }

    /// GET a list endpoint, skipping rows that do not decode.
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let response = self
            .send(self.request(Method::GET, path, Auth::Bearer)?, Auth::Bearer)
            .await?;
        let body: ListBody = decode(response).await?;
        let rows = match body {
            ListBody::Envelope { data } => data,
            ListBody::Bare(rows) => rows,
        };

        let total = rows.len();
        let items: Vec<T> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(path, index, "skipping malformed row: {e}");
                    None
                }
            })
            .collect();
        tracing::debug!(path, total, kept = items.len(), "fetched list");
        Ok(items)
    }

    /// Send a JSON body (or none) and decode a single item.
    pub(crate) async fn send_for_item<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, path, auth)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.send(builder, auth).await?;
        match decode::<ItemBody<T>>(response).await? {
            ItemBody::Envelope { data } => Ok(data),
            ItemBody::Bare(item) => Ok(item),
        }
    }

    /// Send a write request whose response body is not needed.
    pub(crate) async fn send_for_ack<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path, Auth::Bearer)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, Auth::Bearer).await?;
        Ok(())
    }
}

/// Path of one record under `collection`, optionally followed by an action
/// segment.
///
/// The id always becomes exactly one path segment: it is percent-encoded so
/// `/`, `?` and `#` cannot reshape the URL, and dot segments are refused
/// because URL joining would resolve them.
///
/// # Errors
///
/// Returns [`ClientError::InvalidId`] for blank, `.` or `..` ids.
pub(crate) fn item_path(collection: &str, id: &str, action: Option<&str>) -> ClientResult<String> {
    let id = id.trim();
    if id.is_empty() || id == "." || id == ".." {
        return Err(ClientError::InvalidId(id.to_string()));
    }

    let segment = urlencoding::encode(id);
    Ok(match action {
        Some(action) => format!("{collection}/{segment}/{action}"),
        None => format!("{collection}/{segment}"),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await.map_err(ClientError::Network)?;
    serde_json::from_slice(&bytes).map_err(ClientError::Decode)
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed.message.or(parsed.error),
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}
