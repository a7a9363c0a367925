//! `edutalent-auth` — client-side authentication state and authorization guard.
//!
//! Flow: demo-mode session flag → identity resolver → role/permission table →
//! route guard. Storage, cookies, navigation and the identity service are
//! injected through small traits so the core stays free of browser and
//! transport specifics.

pub mod access;
pub mod config;
pub mod guard;
pub mod identity;
pub mod navigation;
pub mod permissions;
pub mod policy;
pub mod resolver;
pub mod roles;
pub mod session;
pub mod user;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use access::Access;
pub use config::AuthConfig;
pub use guard::{AccessDenied, DenialReason, GuardDecision, RouteGuard, RouteRequirements, decide};
pub use identity::{IdentityClient, IdentityError};
pub use navigation::{Navigator, RecordingNavigator};
pub use permissions::Permission;
pub use policy::{PermissionSet, RolePermissionTable};
pub use resolver::{AuthView, IdentityResolver, ResolverOptions};
pub use roles::Role;
pub use session::{
    CookieStore, DemoSession, DualStoreFlag, InMemoryCookieJar, InMemoryStore, KeyValueStore, SessionFlagPort,
    StoreError, demo_cookie_present,
};
pub use user::{CurrentUser, demo_user};

#[cfg(feature = "http")]
pub use identity::http::HttpIdentityClient;
