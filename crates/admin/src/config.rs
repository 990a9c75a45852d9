use std::path::{Path, PathBuf};

use catalog::auth::ClientCredentials;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

const APP_DIR: &str = "catalog-admin";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where tokens are kept between runs; defaults to the user's data directory.
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    pub fn token_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("failed to get data directory"))?
            .join(APP_DIR)
            .join("session.json"))
    }
}

/// `config.toml` here, then the user config dir, then `CATALOG_*` variables
/// (`CATALOG_API__BASE_URL`), then an explicit `--config` file.
fn figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Toml::file("config.toml"));
    if let Some(dir) = dirs::config_dir() {
        figment = figment.merge(Toml::file(dir.join(APP_DIR).join("config.toml")));
    }
    figment = figment.merge(Env::prefixed("CATALOG_").split("__"));
    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }
    figment
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit
        && !path.exists()
    {
        anyhow::bail!("config file {} does not exist", path.display());
    }

    Ok(figment(explicit).extract()?)
}
