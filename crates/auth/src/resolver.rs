//! Identity resolution.
//!
//! The exposed [`AuthView`] is a pure function of three inputs: the demo flag
//! (sampled once at mount), the "who am I" query state and the logout state.
//! [`IdentityResolver`] owns those inputs and the side effects around them:
//! the remote calls, the user cache mirror and the unauthenticated redirect.
//! Both side effects run each time a live identity query settles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::access::Access;
use crate::config::AuthConfig;
use crate::identity::{IdentityClient, IdentityError};
use crate::navigation::Navigator;
use crate::session::{DemoSession, KeyValueStore};
use crate::{CurrentUser, demo_user};

/// State of the "who am I" query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub data: Option<CurrentUser>,
    pub error: Option<IdentityError>,
    pub in_flight: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueryState {
    /// A query that has been scheduled but has not settled yet.
    pub fn pending() -> Self {
        Self {
            in_flight: true,
            ..Self::default()
        }
    }
}

/// State of the logout command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    pub pending: bool,
    pub error: Option<IdentityError>,
}

/// What the rest of the client sees.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthView {
    pub user: Option<CurrentUser>,
    pub loading: bool,
    pub error: Option<IdentityError>,
    pub is_authenticated: bool,
    /// When the identity query last settled. Always `None` in demo mode.
    pub updated_at: Option<DateTime<Utc>>,
}

impl AuthView {
    /// Role/permission predicates over this view's user.
    pub fn access(&self) -> Access<'_> {
        Access::new(self.user.as_ref())
    }

    /// Whether the identity was last confirmed more than `max_age` before `now`.
    /// A live view that never settled is stale; the demo identity never is.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        match self.updated_at {
            Some(at) => now - at > max_age,
            None => self.loading || !self.is_authenticated,
        }
    }
}

pub fn reduce(session_active: bool, query: &QueryState, logout: &MutationState) -> AuthView {
    if session_active {
        return AuthView {
            user: Some(demo_user()),
            loading: false,
            error: None,
            is_authenticated: true,
            updated_at: None,
        };
    }

    let user = query.data.clone();
    AuthView {
        is_authenticated: user.is_some(),
        user,
        loading: query.in_flight || logout.pending,
        error: query.error.clone().or_else(|| logout.error.clone()),
        updated_at: query.updated_at,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Navigate here when the live session turns out to be unauthenticated.
    pub redirect_to: Option<String>,
}

impl ResolverOptions {
    pub fn redirect_to(path: impl Into<String>) -> Self {
        Self {
            redirect_to: Some(path.into()),
        }
    }
}

#[derive(Debug, Default)]
struct ResolverState {
    query: QueryState,
    logout: MutationState,
}

pub struct IdentityResolver {
    client: Arc<dyn IdentityClient>,
    session: DemoSession,
    cache: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    cache_key: String,
    redirect_to: Option<String>,
    demo: bool,
    state: Mutex<ResolverState>,
}

impl IdentityResolver {
    /// Sample the demo flag and set up the initial state.
    ///
    /// The flag is not re-read for the lifetime of this resolver; a flag
    /// change takes effect on the next mount (e.g. after a full reload).
    pub fn mount(
        client: Arc<dyn IdentityClient>,
        session: DemoSession,
        cache: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        config: &AuthConfig,
        options: ResolverOptions,
    ) -> Self {
        let demo = session.is_active();
        let query = if demo {
            QueryState::default()
        } else {
            QueryState::pending()
        };
        debug!(demo, "identity resolver mounted");

        Self {
            client,
            session,
            cache,
            navigator,
            cache_key: config.user_cache_key.clone(),
            redirect_to: options.redirect_to,
            demo,
            state: Mutex::new(ResolverState {
                query,
                logout: MutationState::default(),
            }),
        }
    }

    /// Whether this resolver runs the demo branch.
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Run the initial identity query.
    pub async fn resolve(&self) {
        self.refetch().await;
    }

    /// Re-issue the identity query. Suppressed entirely in demo mode.
    ///
    /// Once the query settles the user is mirrored into the cache and the
    /// redirect check runs against the new state.
    pub async fn refetch(&self) {
        if self.demo {
            debug!("demo mode; identity query suppressed");
            return;
        }

        self.state().query.in_flight = true;
        let result = self.client.current_user().await;

        let user = {
            let mut state = self.state();
            let query = &mut state.query;
            query.in_flight = false;
            query.updated_at = Some(Utc::now());
            match result {
                Ok(user) => {
                    debug!(authenticated = user.is_some(), "identity resolved");
                    query.data = user;
                    query.error = None;
                }
                Err(e) if e.is_unauthorized() => {
                    debug!("identity query unauthorized; no current user");
                    query.data = None;
                    query.error = None;
                }
                Err(e) => {
                    warn!(error = %e, "identity query failed");
                    query.error = Some(e);
                }
            }
            query.data.clone()
        };

        self.mirror_user(user.as_ref());
        self.enforce_redirect();
    }

    pub fn view(&self) -> AuthView {
        let state = self.state();
        reduce(self.demo, &state.query, &state.logout)
    }

    /// Sign out.
    ///
    /// In demo mode this only clears the flag (and navigates away). Otherwise
    /// the remote logout runs first; whatever it returns, the cached user is
    /// dropped and identity is re-fetched before this returns. An
    /// "unauthorized" answer counts as success.
    pub async fn logout(&self) -> Result<(), IdentityError> {
        if self.session.is_active() {
            self.session.deactivate();
            return Ok(());
        }

        self.state().logout = MutationState {
            pending: true,
            error: None,
        };

        let outcome = match self.client.logout().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() => {
                debug!("logout unauthorized; session already ended");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout failed");
                Err(e)
            }
        };

        {
            let mut state = self.state();
            state.logout.pending = false;
            state.logout.error = outcome.as_ref().err().cloned();
            state.query.data = None;
        }
        self.refetch().await;

        if outcome.is_ok() {
            info!("logged out");
        }
        outcome
    }

    /// Navigate to the configured target when the live session is settled and
    /// has no user. Returns whether a navigation happened.
    pub fn enforce_redirect(&self) -> bool {
        let Some(target) = self.redirect_to.as_deref() else {
            return false;
        };
        if self.demo {
            return false;
        }

        let view = {
            let state = self.state();
            reduce(false, &state.query, &state.logout)
        };
        if view.loading || view.user.is_some() {
            return false;
        }
        if self.navigator.current_path() == target {
            return false;
        }

        info!(target_path = %target, "unauthenticated; redirecting");
        self.navigator.navigate(target);
        true
    }

    fn mirror_user(&self, user: Option<&CurrentUser>) {
        let json = match serde_json::to_string(&user) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize current user for cache");
                return;
            }
        };
        if let Err(e) = self.cache.set(&self.cache_key, &json) {
            warn!(key = %self.cache_key, error = %e, "failed to mirror current user");
        }
    }

    fn state(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("demo", &self.demo)
            .field("redirect_to", &self.redirect_to)
            .field("state", &self.state.lock().ok())
            .finish_non_exhaustive()
    }
}
