use std::sync::Mutex;

use reqwest::Method;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::core::auth::AuthState;
use crate::core::cache::{Tag, TagCache};
use crate::error::AcadifyError;
use crate::http::session::Session;

/// Client for the Acadify backend. One instance owns the HTTP session
/// (cookie jar included), the tag cache, and the auth state; endpoint
/// groups live in sibling modules as further `impl Acadify` blocks.
pub struct Acadify {
    session: Session,
    base: Url,
    pub(crate) cache: TagCache,
    pub(crate) auth: Mutex<AuthState>,
}

impl Acadify {
    /// `base_url` is the API root, e.g. `https://api.acadify.in/api/v1`.
    /// `username` keys the persisted cookie jar.
    pub fn new(base_url: &str, username: &str) -> Result<Self, AcadifyError> {
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)?;

        Ok(Acadify {
            session: Session::new(username)?,
            base,
            cache: TagCache::new(),
            auth: Mutex::new(AuthState::new()),
        })
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    pub(crate) fn http(&self) -> &ClientWithMiddleware {
        &self.session.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AcadifyError> {
        Ok(self.base.join(path)?)
    }

    /// Cached GET. `path` doubles as the cache key; `tags` are the
    /// tags this read provides.
    pub(crate) async fn get_cached<T: DeserializeOwned>(
        &self,
        path: &str,
        tags: Vec<Tag>,
    ) -> Result<T, AcadifyError> {
        let url = self.endpoint(path)?;
        let client = self.http().clone();
        let value = self
            .cache
            .query(path, tags, fetch_json(client, url))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Write operation. Invalidation only happens after the backend
    /// confirms the write; a failed mutation leaves the cache alone.
    pub(crate) async fn mutate<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        invalidates: &[Tag],
    ) -> Result<T, AcadifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let mut request = self.http().request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let value: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = error_message(&value, "request failed");
            log::warn!("{} failed: {} {}", url, status, message);
            return Err(AcadifyError::new(message));
        }

        self.cache.invalidate(invalidates);
        Ok(serde_json::from_value(value)?)
    }

    /// Multipart PUT used by the thumbnail upload.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        invalidates: &[Tag],
    ) -> Result<T, AcadifyError> {
        let url = self.endpoint(path)?;
        let response = self
            .http()
            .request(Method::PUT, url.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let value: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = error_message(&value, "upload failed");
            log::warn!("{} failed: {} {}", url, status, message);
            return Err(AcadifyError::new(message));
        }

        self.cache.invalidate(invalidates);
        Ok(serde_json::from_value(value)?)
    }
}

impl Drop for Acadify {
    fn drop(&mut self) {
        log::debug!("saving session cookies");
        self.session.save_cookies();
    }
}

async fn fetch_json(client: ClientWithMiddleware, url: Url) -> Result<Value, AcadifyError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    let value: Value = response.json().await?;

    if !status.is_success() {
        let message = error_message(&value, "request failed");
        log::warn!("GET {} failed: {} {}", url, status, message);
        return Err(AcadifyError::new(message));
    }
    Ok(value)
}

fn error_message<'a>(value: &'a Value, fallback: &'a str) -> &'a str {
    value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}
