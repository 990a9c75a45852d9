pub mod album;
pub mod artist;
pub mod auth;
mod error;
pub mod id;
pub mod image;
pub mod resource;
pub mod session;
pub mod song;

use reqwest::{Method, RequestBuilder, Url};

use crate::{
    album::Albums,
    artist::Artists,
    auth::{ClientCredentials, TokenEndpoint},
    resource::ResourceClient,
    session::Session,
    song::Songs,
};
pub use error::{CatalogError, ErrorKind};
pub use reqwest::StatusCode;

const API_ROOT: &str = "api/";
const TOKEN_PATH: &str = "o/token/";

/// Shared HTTP client for the catalog API.
///
/// Every request goes through [`Catalog::request`], which attaches the session's
/// bearer token when one is present.
#[derive(Debug, Clone)]
pub struct Catalog {
    client: reqwest::Client,
    base: Url,
    session: Session,
    token: TokenEndpoint,
}

impl Catalog {
    pub fn new(
        base_url: &str,
        credentials: ClientCredentials,
        session: Session,
    ) -> Result<Self, CatalogError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::new();
        let token = TokenEndpoint::new(client.clone(), base.join(TOKEN_PATH)?, credentials);

        Ok(Self {
            client,
            base,
            session,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn artists(&self) -> ResourceClient<Artists> {
        ResourceClient::new(self.clone())
    }

    pub fn albums(&self) -> ResourceClient<Albums> {
        ResourceClient::new(self.clone())
    }

    pub fn songs(&self) -> ResourceClient<Songs> {
        ResourceClient::new(self.clone())
    }

    /// Password-grant login; the tokens are persisted by the session's store.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), CatalogError> {
        self.session.establish(&self.token, username, password).await
    }

    pub fn logout(&self) -> Result<(), CatalogError> {
        self.session.clear()
    }

    pub(crate) fn collection_url(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.base.join(API_ROOT)?.join(path)?)
    }

    pub(crate) fn item_url(
        &self,
        path: &str,
        id: impl std::fmt::Display,
    ) -> Result<Url, CatalogError> {
        Ok(self.collection_url(path)?.join(&format!("{id}/"))?)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch<T>(&self, url: Url) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.request(Method::GET, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                body: response.text().await?,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
