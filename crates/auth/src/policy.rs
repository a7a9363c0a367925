//! Role → permission table.
//!
//! Static, immutable mapping. Lookups for a role missing from a table yield the
//! empty set rather than an error.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::{Permission, Role};

/// Permissions granted by a role (membership only, ordered for display).
pub type PermissionSet = BTreeSet<Permission>;

static EMPTY: PermissionSet = BTreeSet::new();

static STANDARD: LazyLock<RolePermissionTable> = LazyLock::new(|| {
    RolePermissionTable::from_entries(Role::ALL.map(|role| (role, default_role_permissions(role))))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionTable {
    grants: HashMap<Role, PermissionSet>,
}

impl RolePermissionTable {
    /// The platform's built-in table.
    pub fn standard() -> &'static RolePermissionTable {
        &STANDARD
    }

    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = Permission>,
    {
        let grants = entries
            .into_iter()
            .map(|(role, perms)| (role, perms.into_iter().collect()))
            .collect();
        Self { grants }
    }

    pub fn permissions(&self, role: Role) -> &PermissionSet {
        self.grants.get(&role).unwrap_or(&EMPTY)
    }

    pub fn grants(&self, role: Role, permission: Permission) -> bool {
        self.permissions(role).contains(&permission)
    }

    /// Roles whose grant set contains `permission`, in declaration order.
    pub fn roles_granting(&self, permission: Permission) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.grants(*role, permission))
            .collect()
    }
}

fn default_role_permissions(role: Role) -> Vec<Permission> {
    use Permission::*;

    match role {
        Role::SuperAdmin => Permission::ALL.to_vec(),
        Role::HrManager => vec![
            // People
            UsersRead,
            UsersCreate,
            UsersUpdate,
            TenantsRead,
            // Talent lifecycle
            RecruitmentRead,
            RecruitmentCreate,
            RecruitmentUpdate,
            RecruitmentDelete,
            PerformanceRead,
            PerformanceCreate,
            PerformanceUpdate,
            PerformanceApprove,
            SuccessionRead,
            SuccessionManage,
            WorkforceRead,
            WorkforceManage,
            // Licensing (read-only for HR)
            LicensingRead,
            AssessmentsRead,
            AssessmentsCreate,
            AssessmentsAssign,
            AssessmentsResults,
            ReportsRead,
            ReportsExport,
            SettingsRead,
        ],
        Role::DepartmentManager => vec![
            UsersRead,
            RecruitmentRead,
            PerformanceRead,
            PerformanceCreate,
            PerformanceUpdate,
            PerformanceApprove,
            SuccessionRead,
            WorkforceRead,
            AssessmentsRead,
            AssessmentsResults,
            ReportsRead,
        ],
        Role::Employee => vec![PerformanceRead, AssessmentsRead, LicensingRead],
        Role::LicensingOfficer => vec![
            UsersRead,
            LicensingRead,
            LicensingCreate,
            LicensingVerify,
            LicensingRevoke,
            ReportsRead,
            ReportsExport,
        ],
        Role::Recruiter => vec![
            UsersRead,
            RecruitmentRead,
            RecruitmentCreate,
            RecruitmentUpdate,
            AssessmentsRead,
            AssessmentsAssign,
            AssessmentsResults,
            ReportsRead,
        ],
    }
}
