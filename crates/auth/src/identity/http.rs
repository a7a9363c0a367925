//! `reqwest`-backed identity client.
//!
//! Contract: `GET {api_url}/api/auth/me` answers with a user or `null`,
//! `POST {api_url}/api/auth/logout` answers with any 2xx.

use async_trait::async_trait;
use tracing::debug;

use super::{IdentityClient, IdentityError};
use crate::CurrentUser;

pub struct HttpIdentityClient {
    api_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpIdentityClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(api_url)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, IdentityError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), body))
    }
}

impl core::fmt::Debug for HttpIdentityClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpIdentityClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Map a non-success HTTP status onto the identity error taxonomy.
pub fn classify_status(status: u16, body: String) -> IdentityError {
    match status {
        401 => IdentityError::Unauthorized,
        _ => IdentityError::Server { status, message: body },
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn current_user(&self) -> Result<Option<CurrentUser>, IdentityError> {
        let url = self.url("/api/auth/me");
        debug!(%url, "fetching current user");

        let resp = self.send(self.client.get(&url)).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<CurrentUser>>(&bytes).map_err(|e| IdentityError::Decode(e.to_string()))
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        let url = self.url("/api/auth/logout");
        debug!(%url, "logging out");

        self.send(self.client.post(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_401_counts_as_unauthorized() {
        assert!(classify_status(401, String::new()).is_unauthorized());
        assert_eq!(
            classify_status(503, "maintenance".to_string()),
            IdentityError::Server {
                status: 503,
                message: "maintenance".to_string()
            }
        );
        assert!(!classify_status(403, String::new()).is_unauthorized());
    }

    #[test]
    fn trims_trailing_slash_and_redacts_token() {
        let client = HttpIdentityClient::with_token("http://localhost:3000/", "secret");
        assert_eq!(client.url("/api/auth/me"), "http://localhost:3000/api/auth/me");
        assert!(!format!("{client:?}").contains("secret"));
    }
}
