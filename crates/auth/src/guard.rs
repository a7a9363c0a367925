//! Route guard: render, redirect or deny a protected view.
//!
//! Checks run top to bottom and the first failing one decides:
//! loading, authentication, single role, role set, single permission,
//! permission set.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::AuthConfig;
use crate::navigation::Navigator;
use crate::policy::RolePermissionTable;
use crate::resolver::{AuthView, IdentityResolver};
use crate::{Permission, Role};

/// Access requirements declared by a protected view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirements {
    pub role: Option<Role>,
    pub any_role: Option<Vec<Role>>,
    pub permission: Option<Permission>,
    pub permissions: Option<Vec<Permission>>,
    /// With `permissions`: require every one instead of any one.
    pub require_all: bool,
}

impl RouteRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn any_role(mut self, roles: impl Into<Vec<Role>>) -> Self {
        self.any_role = Some(roles.into());
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn permissions(mut self, permissions: impl Into<Vec<Permission>>) -> Self {
        self.permissions = Some(permissions.into());
        self
    }

    pub fn require_all(mut self) -> Self {
        self.require_all = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    MissingRole { role: Role },
    NotInRoles { roles: Vec<Role> },
    MissingPermission { permission: Permission },
    MissingPermissions { permissions: Vec<Permission>, require_all: bool },
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenialReason::MissingRole { role } => {
                write!(f, "You need the '{role}' role to access this page.")
            }
            DenialReason::NotInRoles { roles } => {
                write!(f, "You need one of the following roles to access this page: {}.", join(roles))
            }
            DenialReason::MissingPermission { permission } => {
                write!(f, "You need the '{permission}' permission to access this page.")
            }
            DenialReason::MissingPermissions {
                permissions,
                require_all,
            } => {
                let conjunction = if *require_all { "all" } else { "at least one" };
                write!(
                    f,
                    "You need {conjunction} of the following permissions to access this page: {}.",
                    join(permissions)
                )
            }
        }
    }
}

fn join<T: core::fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Access-denied outcome, with enough context for an operator to diagnose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenied {
    pub reason: DenialReason,
    pub current_role: Option<Role>,
    /// Roles that would have passed the failing check.
    pub granting_roles: Vec<Role>,
}

impl AccessDenied {
    fn new(reason: DenialReason, current_role: Option<Role>, table: &RolePermissionTable) -> Self {
        let granting_roles = match &reason {
            DenialReason::MissingRole { role } => vec![*role],
            DenialReason::NotInRoles { roles } => roles.clone(),
            DenialReason::MissingPermission { permission } => table.roles_granting(*permission),
            DenialReason::MissingPermissions {
                permissions,
                require_all,
            } => Role::ALL
                .into_iter()
                .filter(|role| {
                    let grants = |p: &Permission| table.grants(*role, *p);
                    if *require_all {
                        permissions.iter().all(grants)
                    } else {
                        permissions.iter().any(grants)
                    }
                })
                .collect(),
        };

        Self {
            reason,
            current_role,
            granting_roles,
        }
    }
}

impl core::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Your current role: ", self.reason)?;
        match self.current_role {
            Some(role) => write!(f, "{role}."),
            None => f.write_str("none."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Identity still resolving; show a loading indicator.
    Loading,
    Redirect { to: String },
    Denied(AccessDenied),
    Render,
}

/// Decide against the standard role table.
pub fn decide(view: &AuthView, requirements: &RouteRequirements, login_path: &str) -> GuardDecision {
    decide_with_table(view, requirements, login_path, RolePermissionTable::standard())
}

pub fn decide_with_table(
    view: &AuthView,
    requirements: &RouteRequirements,
    login_path: &str,
    table: &RolePermissionTable,
) -> GuardDecision {
    if view.loading {
        return GuardDecision::Loading;
    }
    if !view.is_authenticated {
        return GuardDecision::Redirect {
            to: login_path.to_string(),
        };
    }

    let access = crate::Access::with_table(view.user.as_ref(), table);
    let reason = if let Some(role) = requirements.role.filter(|r| !access.has_role(*r)) {
        Some(DenialReason::MissingRole { role })
    } else if let Some(roles) = requirements.any_role.as_ref().filter(|rs| !access.has_any_role(rs)) {
        Some(DenialReason::NotInRoles { roles: roles.clone() })
    } else if let Some(permission) = requirements.permission.filter(|p| !access.has_permission(*p)) {
        Some(DenialReason::MissingPermission { permission })
    } else if let Some(permissions) = requirements.permissions.as_ref().filter(|ps| {
        if requirements.require_all {
            !access.has_all_permissions(ps)
        } else {
            !access.has_any_permission(ps)
        }
    }) {
        Some(DenialReason::MissingPermissions {
            permissions: permissions.clone(),
            require_all: requirements.require_all,
        })
    } else {
        None
    };

    match reason {
        Some(reason) => {
            let current_role = view.user.as_ref().map(|u| u.role);
            GuardDecision::Denied(AccessDenied::new(reason, current_role, table))
        }
        None => GuardDecision::Render,
    }
}

/// Guard bound to a resolver.
pub struct RouteGuard<'a> {
    resolver: &'a IdentityResolver,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl<'a> RouteGuard<'a> {
    pub fn new(resolver: &'a IdentityResolver, navigator: Arc<dyn Navigator>, config: &AuthConfig) -> Self {
        Self {
            resolver,
            navigator,
            login_path: config.login_path.clone(),
        }
    }

    pub fn evaluate(&self, requirements: &RouteRequirements) -> GuardDecision {
        decide(&self.resolver.view(), requirements, &self.login_path)
    }

    /// Evaluate and carry out a redirect decision.
    pub fn enforce(&self, requirements: &RouteRequirements) -> GuardDecision {
        let decision = self.evaluate(requirements);
        match &decision {
            GuardDecision::Redirect { to } if self.navigator.current_path() != *to => {
                info!(target_path = %to, "not authenticated; redirecting to login");
                self.navigator.navigate(to);
            }
            GuardDecision::Denied(denied) => {
                info!(
                    reason = %denied.reason,
                    current_role = ?denied.current_role,
                    "access denied"
                );
            }
            _ => {}
        }
        decision
    }
}
