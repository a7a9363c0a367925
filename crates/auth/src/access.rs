//! Role and permission predicates over the current user.
//!
//! - No IO
//! - No panics
//! - Every predicate is `false` when there is no user

use crate::policy::{PermissionSet, RolePermissionTable};
use crate::{CurrentUser, Permission, Role};

/// Permission queries for one (possibly absent) user against a table.
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    user: Option<&'a CurrentUser>,
    table: &'a RolePermissionTable,
}

impl<'a> Access<'a> {
    /// Queries against the standard table.
    pub fn new(user: Option<&'a CurrentUser>) -> Self {
        Self::with_table(user, RolePermissionTable::standard())
    }

    pub fn with_table(user: Option<&'a CurrentUser>, table: &'a RolePermissionTable) -> Self {
        Self { user, table }
    }

    pub fn user(&self) -> Option<&'a CurrentUser> {
        self.user
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        match self.user {
            Some(user) => self.table.grants(user.role, permission),
            None => false,
        }
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.user.is_some() && permissions.iter().any(|p| self.has_permission(*p))
    }

    /// Vacuously `true` for an empty list when a user is present.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.user.is_some() && permissions.iter().all(|p| self.has_permission(*p))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.is_some_and(|u| u.role == role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.user.is_some_and(|u| roles.contains(&u.role))
    }

    pub fn user_permissions(&self) -> PermissionSet {
        match self.user {
            Some(user) => self.table.permissions(user.role).clone(),
            None => PermissionSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_user;

    fn user_with(role: Role) -> CurrentUser {
        CurrentUser { role, ..demo_user() }
    }

    #[test]
    fn no_user_denies_everything() {
        let access = Access::new(None);
        assert!(!access.has_permission(Permission::PerformanceRead));
        assert!(!access.has_any_permission(&[Permission::PerformanceRead]));
        assert!(!access.has_all_permissions(&[]));
        assert!(!access.has_role(Role::Employee));
        assert!(!access.has_any_role(&Role::ALL));
        assert!(access.user_permissions().is_empty());
    }

    #[test]
    fn employee_permissions_follow_the_table() {
        let user = user_with(Role::Employee);
        let access = Access::new(Some(&user));

        assert!(access.has_permission(Permission::AssessmentsRead));
        assert!(!access.has_permission(Permission::UsersDelete));
        assert!(access.has_any_permission(&[Permission::UsersDelete, Permission::LicensingRead]));
        assert!(!access.has_all_permissions(&[Permission::UsersDelete, Permission::LicensingRead]));
        assert_eq!(
            access.user_permissions(),
            RolePermissionTable::standard().permissions(Role::Employee).clone()
        );
    }

    #[test]
    fn empty_permission_lists() {
        let user = user_with(Role::Recruiter);
        let access = Access::new(Some(&user));

        assert!(!access.has_any_permission(&[]));
        assert!(access.has_all_permissions(&[]));
    }

    #[test]
    fn role_checks_are_exact() {
        let user = user_with(Role::DepartmentManager);
        let access = Access::new(Some(&user));

        assert!(access.has_role(Role::DepartmentManager));
        assert!(!access.has_role(Role::HrManager));
        assert!(access.has_any_role(&[Role::HrManager, Role::DepartmentManager]));
        assert!(!access.has_any_role(&[]));
    }

    #[test]
    fn role_missing_from_custom_table_has_no_permissions() {
        let table = RolePermissionTable::from_entries([(Role::SuperAdmin, Permission::ALL.to_vec())]);
        let user = user_with(Role::Employee);
        let access = Access::with_table(Some(&user), &table);

        assert!(!access.has_permission(Permission::PerformanceRead));
        assert!(access.user_permissions().is_empty());
    }
}
