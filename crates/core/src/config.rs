use crate::error::{AppError, Result};
use crate::model::{Language, ModelId};
use dotenvy::dotenv;
use std::env;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/analyze";

#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: Url,
    pub language: Language,
    pub model: ModelId,
}

impl Config {
    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// Every variable is optional:
    /// - `OUTFIT_LENS_ENDPOINT` - analysis endpoint URL
    /// - `OUTFIT_LENS_LANG` - `zh`, `en` or `id`
    /// - `OUTFIT_LENS_MODEL` - one of the available models
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let mut builder = Config::builder();
        if let Ok(endpoint) = env::var("OUTFIT_LENS_ENDPOINT") {
            builder = builder.with_endpoint(&endpoint);
        }
        if let Ok(lang) = env::var("OUTFIT_LENS_LANG") {
            builder = builder.with_language(lang.parse()?);
        }
        if let Ok(model) = env::var("OUTFIT_LENS_MODEL") {
            builder = builder.with_model(&model);
        }
        builder.build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            language: Language::default(),
            model: ModelId::default(),
        }
    }
}

/// Builder for [`Config`]; values are validated in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    endpoint: Option<String>,
    language: Option<Language>,
    model: Option<String>,
}

impl ConfigBuilder {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();

        let endpoint = match self.endpoint {
            Some(raw) => {
                let url = Url::parse(raw.trim())
                    .map_err(|e| AppError::config(format!("Invalid endpoint '{}': {}", raw, e)))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(AppError::config(format!(
                        "Endpoint must use http or https, got '{}'",
                        url.scheme()
                    )));
                }
                url
            }
            None => defaults.endpoint,
        };

        let model = match self.model {
            Some(raw) => ModelId::parse(&raw)?,
            None => defaults.model,
        };

        Ok(Config {
            endpoint,
            language: self.language.unwrap_or(defaults.language),
            model,
        })
    }
}
