use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use edutalent_core::DomainError;

macro_rules! permissions {
    ($($variant:ident => $token:literal),+ $(,)?) => {
        /// Fine-grained capability token, namespaced by module (`module:action`).
        ///
        /// Permissions are never granted to users directly; they are reached
        /// through the user's role only.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Permission {
            $($variant),+
        }

        impl Permission {
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $token),+
                }
            }
        }
    };
}

permissions! {
    UsersRead => "users:read",
    UsersCreate => "users:create",
    UsersUpdate => "users:update",
    UsersDelete => "users:delete",

    TenantsRead => "tenants:read",
    TenantsManage => "tenants:manage",

    RecruitmentRead => "recruitment:read",
    RecruitmentCreate => "recruitment:create",
    RecruitmentUpdate => "recruitment:update",
    RecruitmentDelete => "recruitment:delete",

    PerformanceRead => "performance:read",
    PerformanceCreate => "performance:create",
    PerformanceUpdate => "performance:update",
    PerformanceApprove => "performance:approve",

    SuccessionRead => "succession:read",
    SuccessionManage => "succession:manage",

    WorkforceRead => "workforce:read",
    WorkforceManage => "workforce:manage",

    LicensingRead => "licensing:read",
    LicensingCreate => "licensing:create",
    LicensingVerify => "licensing:verify",
    LicensingRevoke => "licensing:revoke",

    AssessmentsRead => "assessments:read",
    AssessmentsCreate => "assessments:create",
    AssessmentsAssign => "assessments:assign",
    AssessmentsResults => "assessments:results",

    ReportsRead => "reports:read",
    ReportsExport => "reports:export",

    SettingsRead => "settings:read",
    SettingsManage => "settings:manage",

    AuditRead => "audit:read",
}

impl Permission {
    /// Module namespace of the token (`"licensing"` for `licensing:verify`).
    pub fn module(&self) -> &'static str {
        let token = self.as_str();
        token.split_once(':').map(|(module, _)| module).unwrap_or(token)
    }

    pub fn action(&self) -> &'static str {
        let token = self.as_str();
        token.split_once(':').map(|(_, action)| action).unwrap_or(token)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown permission '{s}'")))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tokens_are_namespaced_and_unique() {
        let mut seen = HashSet::new();
        for p in Permission::ALL {
            let (module, action) = p.as_str().split_once(':').unwrap();
            assert!(!module.is_empty() && !action.is_empty(), "{p}");
            assert!(seen.insert(p.as_str()), "duplicate token {p}");
        }
    }

    #[test]
    fn splits_module_and_action() {
        assert_eq!(Permission::LicensingVerify.module(), "licensing");
        assert_eq!(Permission::LicensingVerify.action(), "verify");
    }

    #[test]
    fn parses_tokens_and_rejects_unknown_ones() {
        assert_eq!("users:delete".parse::<Permission>().unwrap(), Permission::UsersDelete);
        assert!("users:*".parse::<Permission>().is_err());
    }

    #[test]
    fn serializes_as_token_string() {
        let json = serde_json::to_string(&vec![Permission::UsersRead, Permission::AuditRead]).unwrap();
        assert_eq!(json, r#"["users:read","audit:read"]"#);

        let back: Vec<Permission> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Permission::UsersRead, Permission::AuditRead]);
    }
}
