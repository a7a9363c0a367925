use core::str::FromStr;

use serde::{Deserialize, Serialize};

use edutalent_core::DomainError;

/// Role identifier used for RBAC.
///
/// Closed set: a user holds exactly one role. Permissions are only ever
/// reached through the role (see [`crate::policy::RolePermissionTable`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    HrManager,
    DepartmentManager,
    Employee,
    LicensingOfficer,
    Recruiter,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::HrManager,
        Role::DepartmentManager,
        Role::Employee,
        Role::LicensingOfficer,
        Role::Recruiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::HrManager => "hr_manager",
            Role::DepartmentManager => "department_manager",
            Role::Employee => "employee",
            Role::LicensingOfficer => "licensing_officer",
            Role::Recruiter => "recruiter",
        }
    }

    /// Label shown in navigation and admin screens.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Administrator",
            Role::HrManager => "HR Manager",
            Role::DepartmentManager => "Department Manager",
            Role::Employee => "Employee",
            Role::LicensingOfficer => "Licensing Officer",
            Role::Recruiter => "Recruiter",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Platform administrator with every permission across tenants",
            Role::HrManager => "Runs recruitment, performance, succession and workforce planning",
            Role::DepartmentManager => "Reviews and approves performance for their department",
            Role::Employee => "Self-service access to own reviews, assessments and licenses",
            Role::LicensingOfficer => "Issues, verifies and revokes professional teaching licenses",
            Role::Recruiter => "Manages job postings, candidates and assessment invitations",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_parses_from_its_token() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn catalog_has_a_distinct_label_and_description_per_role() {
        assert_eq!(Role::HrManager.display_name(), "HR Manager");
        assert!(Role::LicensingOfficer.description().contains("licenses"));

        let labels: std::collections::HashSet<_> = Role::ALL.iter().map(Role::display_name).collect();
        let descriptions: std::collections::HashSet<_> =
            Role::ALL.iter().map(Role::description).collect();
        assert_eq!(labels.len(), Role::ALL.len());
        assert_eq!(descriptions.len(), Role::ALL.len());
        assert!(descriptions.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let err = "janitor".parse::<Role>().unwrap_err();
        assert_eq!(err, DomainError::validation("unknown role 'janitor'"));
    }

    #[test]
    fn serde_uses_snake_case_tokens() {
        let json = serde_json::to_string(&Role::LicensingOfficer).unwrap();
        assert_eq!(json, "\"licensing_officer\"");

        let role: Role = serde_json::from_str("\"department_manager\"").unwrap();
        assert_eq!(role, Role::DepartmentManager);
    }
}
