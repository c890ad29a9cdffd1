//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the pipeline.
//! Nothing in a submission attempt reads environment variables, so an attempt behaves the
//! same regardless of what the process environment looks like by then.

use crate::constants::{CREATE_PATIENT_PATH, DEFAULT_API_BASE_URL, DUPLICATE_CHECK_PATH};
use crate::error::{ConfigError, ConfigResult};
use reqwest::Url;
use std::str::FromStr;

/// Body sent to the duplicate-lookup endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePayload {
    /// The complete Patient resource, identical to the creation body.
    #[default]
    FullRecord,
    /// Only identifier, name and birth date.
    LookupKey,
}

impl FromStr for DuplicatePayload {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(DuplicatePayload::FullRecord),
            "key" => Ok(DuplicatePayload::LookupKey),
            _ => Err(ConfigError::InvalidDuplicatePayload(s.to_string())),
        }
    }
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base_url: Url,
    duplicate_check_url: Url,
    create_patient_url: Url,
    duplicate_payload: DuplicatePayload,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL must be an absolute `http` or `https` URL. A path prefix is kept: a base
    /// of `https://host/api` posts to `https://host/api/patient`.
    pub fn new(api_base_url: Url, duplicate_payload: DuplicatePayload) -> ConfigResult<Self> {
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(
                api_base_url.scheme().to_string(),
            ));
        }

        let mut api_base_url = api_base_url;
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        let join = |path: &str| {
            api_base_url
                .join(path)
                .map_err(|e| ConfigError::InvalidUrl {
                    value: api_base_url.to_string(),
                    reason: e.to_string(),
                })
        };
        let duplicate_check_url = join(DUPLICATE_CHECK_PATH)?;
        let create_patient_url = join(CREATE_PATIENT_PATH)?;

        Ok(Self {
            api_base_url,
            duplicate_check_url,
            create_patient_url,
            duplicate_payload,
        })
    }

    /// Build a configuration from raw environment values.
    ///
    /// `None` or blank values fall back to the defaults.
    pub fn from_env_values(
        api_url: Option<String>,
        duplicate_payload: Option<String>,
    ) -> ConfigResult<Self> {
        let url = api_base_url_from_env_value(api_url)?;
        let payload = duplicate_payload
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.parse::<DuplicatePayload>())
            .transpose()?
            .unwrap_or_default();

        Self::new(url, payload)
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn duplicate_check_url(&self) -> &Url {
        &self.duplicate_check_url
    }

    pub fn create_patient_url(&self) -> &Url {
        &self.create_patient_url
    }

    pub fn duplicate_payload(&self) -> DuplicatePayload {
        self.duplicate_payload
    }
}

/// Parse the backend base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default backend URL.
pub fn api_base_url_from_env_value(value: Option<String>) -> ConfigResult<Url> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        value,
        reason: e.to_string(),
    })
}
