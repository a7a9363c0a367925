//! Browser adapters: `localStorage`, `document.cookie`, `window.location`.
//!
//! Each call looks the browser objects up again, so the adapters are plain
//! unit structs and any missing object surfaces as [`StoreError::Unavailable`].

use wasm_bindgen::JsCast;

use crate::navigation::Navigator;
use crate::session::{CookieStore, KeyValueStore, SetCookie, StoreError};

fn unavailable(what: &str, err: impl core::fmt::Debug) -> StoreError {
    StoreError::Unavailable(format!("{what}: {err:?}"))
}

fn window() -> Result<web_sys::Window, StoreError> {
    web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        window()?
            .local_storage()
            .map_err(|e| unavailable("localStorage", e))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(|e| unavailable("getItem", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected(format!("setItem: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Rejected(format!("removeItem: {e:?}")))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

impl DocumentCookies {
    fn document(&self) -> Result<web_sys::HtmlDocument, StoreError> {
        window()?
            .document()
            .ok_or_else(|| StoreError::Unavailable("no document".to_string()))?
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|e| unavailable("document is not an HTML document", e))
    }
}

impl CookieStore for DocumentCookies {
    fn cookie_header(&self) -> Result<String, StoreError> {
        self.document()?.cookie().map_err(|e| unavailable("document.cookie", e))
    }

    fn set_cookie(&self, cookie: &SetCookie) -> Result<(), StoreError> {
        self.document()?
            .set_cookie(&cookie.to_string())
            .map_err(|e| StoreError::Rejected(format!("document.cookie: {e:?}")))
    }
}

/// Full-page navigation through `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        let result = window().and_then(|w| {
            w.location()
                .set_href(path)
                .map_err(|e| StoreError::Rejected(format!("location.href: {e:?}")))
        });
        if let Err(e) = result {
            tracing::warn!(path, error = %e, "navigation failed");
        }
    }

    fn current_path(&self) -> String {
        window()
            .ok()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }
}
