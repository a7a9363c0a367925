//! Client auth configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Keys, paths and endpoints used by the auth core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the identity service.
    pub api_url: String,
    /// Key-value entry holding the demo-mode sentinel.
    pub demo_flag_key: String,
    /// Cookie mirroring the demo-mode sentinel.
    pub demo_cookie_name: String,
    pub demo_cookie_max_age_secs: i64,
    /// Key-value entry mirroring the last fetched user.
    pub user_cache_key: String,
    /// Unauthenticated entry point.
    pub login_path: String,
    /// Public landing page.
    pub landing_path: String,
    /// Landing page for authenticated users.
    pub home_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            demo_flag_key: "demo_mode".to_string(),
            demo_cookie_name: "demo_mode".to_string(),
            demo_cookie_max_age_secs: 24 * 60 * 60,
            user_cache_key: "edutalent-current-user".to_string(),
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

impl AuthConfig {
    /// Defaults overridden by `EDUTALENT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("EDUTALENT_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("EDUTALENT_LOGIN_PATH") {
            config.login_path = path;
        }
        if let Some(path) = lookup("EDUTALENT_HOME_PATH") {
            config.home_path = path;
        }
        config
    }

    pub fn demo_cookie_max_age(&self) -> Duration {
        Duration::seconds(self.demo_cookie_max_age_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn demo_cookie_lives_for_a_day() {
        assert_eq!(AuthConfig::default().demo_cookie_max_age(), Duration::hours(24));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("EDUTALENT_API_URL", "https://hr.school.example/"),
            ("EDUTALENT_LOGIN_PATH", "/signin"),
        ]);
        let config = AuthConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://hr.school.example");
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.home_path, "/dashboard");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AuthConfig = serde_json::from_str(r#"{"login_path":"/enter"}"#).unwrap();
        assert_eq!(config.login_path, "/enter");
        assert_eq!(config.demo_flag_key, "demo_mode");
    }
}
