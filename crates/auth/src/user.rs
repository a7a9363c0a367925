//! Current-user view as seen by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use edutalent_core::{TenantId, UserId};

use crate::Role;

/// Authenticated user, either served by the identity service or the fixed
/// demonstration account.
///
/// The identity service owns the shape; only `role` is relied upon here.
/// Fields this type does not know about are kept in `extra` so the cached
/// copy stays faithful to what the service returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub const DEMO_USER_ID: UserId = UserId::from_u128(0xd3_0000_0001);
pub const DEMO_TENANT_ID: TenantId = TenantId::from_u128(0xd3_0000_0001);

/// The demonstration account used while demo mode is active.
pub fn demo_user() -> CurrentUser {
    CurrentUser {
        id: DEMO_USER_ID,
        name: "Demo Administrator".to_string(),
        email: Some("demo@edutalent.example".to_string()),
        role: Role::SuperAdmin,
        tenant_id: Some(DEMO_TENANT_ID),
        organization: Some("Demo Education Authority".to_string()),
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_user_is_an_elevated_tenant_member() {
        let user = demo_user();
        assert_eq!(user.role, Role::SuperAdmin);
        assert_eq!(user.tenant_id, Some(DEMO_TENANT_ID));
        assert_eq!(demo_user(), user);
    }

    #[test]
    fn decodes_remote_payload_and_keeps_unknown_fields() {
        let json = r#"{
            "id": "0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d01",
            "name": "Layla Haddad",
            "email": "layla@school.example",
            "role": "hr_manager",
            "tenantId": "0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d02",
            "lastSignedIn": "2026-10-01T08:00:00Z"
        }"#;

        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::HrManager);
        assert_eq!(user.organization, None);
        assert_eq!(user.extra.get("lastSignedIn"), Some(&Value::from("2026-10-01T08:00:00Z")));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["lastSignedIn"], "2026-10-01T08:00:00Z");
        assert_eq!(back["tenantId"], "0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d02");
    }

    #[test]
    fn rejects_payload_with_unknown_role() {
        let json = r#"{"id":"0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d01","name":"X","role":"owner"}"#;
        assert!(serde_json::from_str::<CurrentUser>(json).is_err());
    }
}
