//! Session cookie jar
//!
//! Same behavior as `reqwest::cookie::Jar`, but the whole store (domain,
//! path and expiry of every cookie) can be saved as JSON and loaded on the
//! next run.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cookie_store::{CookieStore, RawCookie};
use reqwest::Url;
use reqwest::header::HeaderValue;

use crate::error::{Result, StorageError};

/// Cookie jar shared with the HTTP client
#[derive(Debug, Default)]
pub struct SessionCookies {
    store: RwLock<CookieStore>,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize every unexpired cookie, session cookies included.
    ///
    /// Returns `None` when there is nothing worth saving.
    pub fn to_json(&self) -> Result<Option<String>> {
        let store = self.read();
        if store.iter_unexpired().next().is_none() {
            return Ok(None);
        }

        let mut buf = Vec::new();
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut buf)
            .map_err(|e| StorageError::Cookies(e.to_string()))?;
        let json = String::from_utf8(buf).map_err(|e| StorageError::Cookies(e.to_string()))?;
        Ok(Some(json))
    }

    /// Replace the jar contents with cookies saved by [`to_json`](Self::to_json).
    /// Cookies that expired in the meantime are dropped.
    pub fn load_json(&self, json: &str) -> Result<()> {
        let loaded = cookie_store::serde::json::load(json.as_bytes())
            .map_err(|e| StorageError::Cookies(e.to_string()))?;
        *self.write() = loaded;
        Ok(())
    }

    /// Cookie header that would be sent to `url`
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let header = self
            .read()
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() { None } else { Some(header) }
    }

    fn read(&self) -> RwLockReadGuard<'_, CookieStore> {
        match self.store.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, CookieStore> {
        match self.store.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl reqwest::cookie::CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies = cookie_headers.filter_map(|value| {
            std::str::from_utf8(value.as_bytes())
                .ok()
                .and_then(|raw| RawCookie::parse(raw).ok())
                .map(RawCookie::into_owned)
        });
        self.write().store_response_cookies(cookies, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header_for(url)
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}
