use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// OAuth2 application credentials the admin registers with the token issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Password-grant exchange against `{base}/o/token/`.
#[derive(Debug, Clone)]
pub struct TokenEndpoint {
    client: reqwest::Client,
    url: Url,
    credentials: ClientCredentials,
}

impl TokenEndpoint {
    pub fn new(client: reqwest::Client, url: Url, credentials: ClientCredentials) -> Self {
        Self {
            client,
            url,
            credentials,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn exchange(&self, username: &str, password: &str) -> Result<Tokens, CatalogError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
            #[serde(default)]
            refresh_token: Option<String>,
        }

        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| CatalogError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth(format!("{status}: {body}")));
        }

        let res: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Auth(format!("malformed token response: {e}")))?;

        let access_token = res
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::Auth("no access token in response".into()))?;

        Ok(Tokens {
            access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
        })
    }
}
