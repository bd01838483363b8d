use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use std::str::FromStr;
use url::Url;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Root of the REST API, with a trailing slash. Entity paths such as
    /// `employees/{id}` are joined onto it.
    pub api_service: Url,

    /// Document upload endpoint root. Falls back to `api_service` when unset.
    #[serde(default)]
    pub upload_service: Option<Url>,

    #[serde_as(as = "DisplayFromStr")]
    pub log: tracing::Level,

    #[serde(default = "default_page_size")]
    pub report_page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_service: Url::from_str("http://localhost:4000/api/").unwrap(),
            upload_service: None,
            log: tracing::Level::INFO,
            report_page_size: default_page_size(),
        }
    }
}

impl Config {
    pub fn upload_service(&self) -> &Url {
        self.upload_service.as_ref().unwrap_or(&self.api_service)
    }

    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CREW"))
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
    }
}
