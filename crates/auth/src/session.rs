//! Demo-mode session flag.
//!
//! The flag lives in two places at once: a key-value entry (client code) and a
//! cookie (server-rendered gates). Reads OR the two copies, writes update both.
//! Any persistence failure on read counts as "not in demo mode".

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::navigation::Navigator;

/// Value stored in both copies while demo mode is on.
pub const ACTIVE_SENTINEL: &str = "true";

const EXPIRED_AT: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// String key-value persistence (browser `localStorage` or equivalent).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Cookie persistence.
pub trait CookieStore: Send + Sync {
    /// All visible cookies as `a=1; b=2` (the `document.cookie` / `Cookie` header shape).
    fn cookie_header(&self) -> Result<String, StoreError>;
    fn set_cookie(&self, cookie: &SetCookie) -> Result<(), StoreError>;
}

impl<S> CookieStore for Arc<S>
where
    S: CookieStore + ?Sized,
{
    fn cookie_header(&self) -> Result<String, StoreError> {
        (**self).cookie_header()
    }

    fn set_cookie(&self, cookie: &SetCookie) -> Result<(), StoreError> {
        (**self).set_cookie(cookie)
    }
}

/// A `SameSite=Lax` cookie write. `Display` renders the `Set-Cookie` /
/// `document.cookie` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Seconds; zero or less expires the cookie immediately.
    pub max_age: i64,
}

impl SetCookie {
    pub fn is_expired(&self) -> bool {
        self.max_age <= 0
    }
}

impl core::fmt::Display for SetCookie {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}; Path={}; Max-Age={}", self.name, self.value, self.path, self.max_age)?;
        if self.is_expired() {
            write!(f, "; Expires={EXPIRED_AT}")?;
        }
        f.write_str("; SameSite=Lax")
    }
}

/// `true` if a `Cookie` header carries the active demo sentinel.
///
/// Usable by server-side gates that only see the request headers.
pub fn demo_cookie_present(cookie_header: &str, cookie_name: &str) -> bool {
    cookie_header.contains(&format!("{cookie_name}={ACTIVE_SENTINEL}"))
}

/// The abstract demo-mode flag.
pub trait SessionFlagPort: Send + Sync {
    fn is_active(&self) -> bool;
    fn enable(&self);
    fn disable(&self);
}

impl<P> SessionFlagPort for Arc<P>
where
    P: SessionFlagPort + ?Sized,
{
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn enable(&self) {
        (**self).enable()
    }

    fn disable(&self) {
        (**self).disable()
    }
}

/// Flag backed by a key-value entry and a cookie.
#[derive(Debug)]
pub struct DualStoreFlag<K, C> {
    store: K,
    cookies: C,
    key: String,
    cookie_name: String,
    max_age: i64,
}

impl<K, C> DualStoreFlag<K, C>
where
    K: KeyValueStore,
    C: CookieStore,
{
    pub fn new(store: K, cookies: C, config: &AuthConfig) -> Self {
        Self {
            store,
            cookies,
            key: config.demo_flag_key.clone(),
            cookie_name: config.demo_cookie_name.clone(),
            max_age: config.demo_cookie_max_age().num_seconds(),
        }
    }

    fn stored_copy_active(&self) -> bool {
        match self.store.get(&self.key) {
            Ok(value) => value.as_deref() == Some(ACTIVE_SENTINEL),
            Err(e) => {
                warn!(key = %self.key, error = %e, "demo flag store unreadable; assuming inactive");
                false
            }
        }
    }

    fn cookie_copy_active(&self) -> bool {
        match self.cookies.cookie_header() {
            Ok(header) => demo_cookie_present(&header, &self.cookie_name),
            Err(e) => {
                warn!(cookie = %self.cookie_name, error = %e, "cookies unreadable; assuming inactive");
                false
            }
        }
    }

    fn cookie(&self, value: &str, max_age: i64) -> SetCookie {
        SetCookie {
            name: self.cookie_name.clone(),
            value: value.to_string(),
            path: "/".to_string(),
            max_age,
        }
    }
}

impl<K, C> SessionFlagPort for DualStoreFlag<K, C>
where
    K: KeyValueStore,
    C: CookieStore,
{
    fn is_active(&self) -> bool {
        self.stored_copy_active() || self.cookie_copy_active()
    }

    fn enable(&self) {
        if let Err(e) = self.store.set(&self.key, ACTIVE_SENTINEL) {
            warn!(key = %self.key, error = %e, "failed to persist demo flag");
        }
        if let Err(e) = self.cookies.set_cookie(&self.cookie(ACTIVE_SENTINEL, self.max_age)) {
            warn!(cookie = %self.cookie_name, error = %e, "failed to write demo cookie");
        }
    }

    fn disable(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to clear demo flag");
        }
        if let Err(e) = self.cookies.set_cookie(&self.cookie("", 0)) {
            warn!(cookie = %self.cookie_name, error = %e, "failed to expire demo cookie");
        }
    }
}

/// Demo-mode session: the flag plus the navigations that follow a change.
#[derive(Clone)]
pub struct DemoSession {
    flag: Arc<dyn SessionFlagPort>,
    navigator: Arc<dyn Navigator>,
    home_path: String,
    landing_path: String,
}

impl DemoSession {
    pub fn new(flag: Arc<dyn SessionFlagPort>, navigator: Arc<dyn Navigator>, config: &AuthConfig) -> Self {
        Self {
            flag,
            navigator,
            home_path: config.home_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.flag.is_active()
    }

    /// Turn demo mode on and reload into the authenticated landing page.
    pub fn activate(&self) {
        self.flag.enable();
        info!(target_path = %self.home_path, "demo mode activated");
        self.navigator.navigate(&self.home_path);
    }

    /// Turn demo mode off and reload into the public landing page.
    pub fn deactivate(&self) {
        self.flag.disable();
        info!(target_path = %self.landing_path, "demo mode deactivated");
        self.navigator.navigate(&self.landing_path);
    }
}

impl core::fmt::Debug for DemoSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DemoSession")
            .field("home_path", &self.home_path)
            .field("landing_path", &self.landing_path)
            .finish_non_exhaustive()
    }
}

/// In-memory key-value store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Rejected("store lock poisoned".to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Rejected("store lock poisoned".to_string()))?;
        map.remove(key);
        Ok(())
    }
}

/// In-memory cookie jar with browser expiry semantics for `Max-Age`.
#[derive(Debug, Default)]
pub struct InMemoryCookieJar {
    inner: RwLock<BTreeMap<String, String>>,
}

impl InMemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for InMemoryCookieJar {
    fn cookie_header(&self) -> Result<String, StoreError> {
        let jar = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("cookie jar lock poisoned".to_string()))?;
        Ok(jar
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn set_cookie(&self, cookie: &SetCookie) -> Result<(), StoreError> {
        let mut jar = self
            .inner
            .write()
            .map_err(|_| StoreError::Rejected("cookie jar lock poisoned".to_string()))?;
        if cookie.is_expired() {
            jar.remove(&cookie.name);
        } else {
            jar.insert(cookie.name.clone(), cookie.value.clone());
        }
        Ok(())
    }
}
