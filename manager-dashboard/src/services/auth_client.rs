use crate::config::AuthServiceSettings;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::observability::TracedClientExt;

/// Tokens issued by the auth service on sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginTokens {
    pub access_token: String,
}

pub struct AuthClient {
    client: Client,
    settings: AuthServiceSettings,
}

impl AuthClient {
    pub fn new(settings: AuthServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }

    /// Exchange manager credentials for an access token.
    pub async fn login(&self, email: &str, password: &Secret<String>) -> Result<LoginTokens> {
        let url = self.url("/auth/login");

        let response = self
            .client
            .traced_post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow!("HTTP request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Login rejected with status {}", status));
        }

        response
            .json::<LoginTokens>()
            .await
            .map_err(|e| anyhow!("Invalid login response: {}", e))
    }

    /// Revoke an access token. Callers treat failure as non-fatal.
    pub async fn logout(&self, access_token: &str) -> Result<()> {
        let url = self.url("/auth/logout");

        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "token": access_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Token revocation returned {}", response.status()));
        }
        Ok(())
    }
}
