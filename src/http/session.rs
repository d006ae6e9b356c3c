use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest_cookie_store::CookieStoreMutex;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::error::AcadifyError;
use crate::http::trace_middleware::TraceMiddleware;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Holds the HTTP client and the cookie jar that carries the Acadify
/// session cookie. The jar is persisted per-username so a login
/// survives process restarts; it is written back by [`Session::save_cookies`]
/// (the owning client calls it on drop).
pub struct Session {
    pub client: ClientWithMiddleware,
    cookie_store: Arc<CookieStoreMutex>,
    cookie_path: String,
}

impl Session {
    pub fn new(username: &str) -> Result<Self, AcadifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            DEFAULT_USER_AGENT
                .parse()
                .map_err(|_| AcadifyError::new("invalid default user agent"))?,
        );

        let cookie_path = format!("cookies/cookies-{}.jsonl", username);
        let cookie_store = load_cookie_store(&cookie_path);
        let cookie_store = Arc::new(CookieStoreMutex::new(cookie_store));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&cookie_store))
            .build()
            .map_err(|err| AcadifyError::with_source("failed to build HTTP client", err))?;

        let client = ClientBuilder::new(client).with(TraceMiddleware).build();

        Ok(Session {
            client,
            cookie_store,
            cookie_path,
        })
    }

    pub fn save_cookies(&self) {
        let store = match self.cookie_store.lock() {
            Ok(store) => store,
            Err(err) => {
                log::warn!("cookie store lock poisoned, not saving: {}", err);
                return;
            }
        };
        let file = match std::fs::File::create(&self.cookie_path) {
            Ok(file) => file,
            Err(err) => {
                log::warn!("failed to create cookie file {}: {}", self.cookie_path, err);
                return;
            }
        };
        let mut writer = BufWriter::new(file);
        let result = store.save_incl_expired_and_nonpersistent(&mut writer, |c| {
            serde_json::to_string(&c).map_err(cookie_store::Error::from)
        });
        if let Err(err) = result {
            log::warn!("failed to save cookies: {}", err);
        }
    }
}

fn load_cookie_store(cookie_path: &str) -> cookie_store::CookieStore {
    let path = Path::new(cookie_path);
    if path.exists() {
        match std::fs::File::open(cookie_path) {
            Ok(file) => {
                let reader = std::io::BufReader::new(file);
                cookie_store::CookieStore::load_all(reader, |string| {
                    let cookie: cookie_store::Cookie = serde_json::from_str(string)?;
                    Ok::<_, cookie_store::Error>(cookie)
                })
                .unwrap_or_else(|err| {
                    log::warn!("failed to load cookies, starting fresh: {}", err);
                    cookie_store::CookieStore::default()
                })
            }
            Err(err) => {
                log::warn!("failed to open cookie file, starting fresh: {}", err);
                cookie_store::CookieStore::default()
            }
        }
    } else {
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::warn!("failed to create cookie directory: {}", err);
            }
        }
        cookie_store::CookieStore::default()
    }
}
