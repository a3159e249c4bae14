//! Codeup repository source configuration
//!
//! A source is described by a single URL:
//!
//! ```text
//! codeup://<key>:<secret>@<endpoint>/<base/path>?projectId=..&organizationId=..&accessToken=..#<ref>
//! ```
//!
//! Missing credentials in the user-info fall back to the standard Alibaba
//! Cloud environment variables.

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

/// Environment variable consulted when the URL carries no access key id
pub const ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";

/// Environment variable consulted when the URL carries no access key secret
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

/// Ref used when the URL has no fragment
pub const DEFAULT_REF: &str = "master";

/// Repository coordinate the migrations are read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeupConfig {
    pub project_id: String,
    pub organization_id: String,
    pub access_token: String,
    /// Repository directory holding the migration files
    pub path: String,
    /// Branch, tag or commit
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

impl CodeupConfig {
    /// Full repository path of a file living under the configured directory
    pub fn blob_path(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        let base = self.path.trim_end_matches('/');

        if base.is_empty() {
            if self.path.starts_with('/') {
                format!("/{}", name)
            } else {
                name.to_string()
            }
        } else {
            format!("{}/{}", base, name)
        }
    }
}

impl Validatable for CodeupConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.project_id, "projectId", self.domain_name())?;

        if self.git_ref.trim().is_empty() {
            return Err(self.validation_error("ref cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "codeup"
    }
}

/// API endpoint and access key pair used by the HTTP client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredentials {
    /// API host, optionally with a port
    pub endpoint: String,
    pub access_key_id: String,
    /// Not sent by the HTTP client; carried for a request-signing layer
    pub access_key_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

impl Validatable for ClientCredentials {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.endpoint, "endpoint", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "codeup.client"
    }
}

/// A parsed source URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub scheme: String,
    pub config: CodeupConfig,
    pub credentials: ClientCredentials,
}

impl SourceUrl {
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let url = Url::parse(raw)?;

        let config = config_from_url(&url)?;
        let credentials = credentials_from_url(&url, has_password_separator(raw))?;

        debug!(
            "Parsed {} source url: endpoint={} path={} ref={}",
            url.scheme(),
            credentials.endpoint,
            config.path,
            config.git_ref
        );

        Ok(Self {
            scheme: url.scheme().to_string(),
            config,
            credentials,
        })
    }
}

impl Validatable for SourceUrl {
    fn validate(&self) -> ConfigResult<()> {
        self.credentials.validate()?;
        self.config.validate()
    }

    fn domain_name(&self) -> &'static str {
        "codeup"
    }
}

fn config_from_url(url: &Url) -> ConfigResult<CodeupConfig> {
    let git_ref = match url.fragment() {
        Some(fragment) if !fragment.is_empty() => decode(fragment, "ref")?,
        _ => default_ref(),
    };

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    };

    Ok(CodeupConfig {
        project_id: query("projectId"),
        organization_id: query("organizationId"),
        access_token: query("accessToken"),
        path: decode(url.path(), "path")?,
        git_ref,
    })
}

fn credentials_from_url(url: &Url, password_given: bool) -> ConfigResult<ClientCredentials> {
    let access_key_id = match url.username() {
        "" => env_or_empty(ACCESS_KEY_ID_ENV),
        name => decode(name, "access key id")?,
    };

    let access_key_secret = match url.password() {
        Some(secret) => decode(secret, "access key secret")?,
        // `key:@host` sets an empty secret, which the url crate reports as no password
        None if password_given => String::new(),
        None => env_or_empty(ACCESS_KEY_SECRET_ENV),
    };

    let endpoint = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    Ok(ClientCredentials {
        endpoint,
        access_key_id,
        access_key_secret,
    })
}

/// Whether the raw user-info has a `:`, even with nothing after it
fn has_password_separator(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();

    match authority.rsplit_once('@') {
        Some((user_info, _)) => user_info.contains(':'),
        None => false,
    }
}

fn decode(value: &str, field_name: &str) -> ConfigResult<String> {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ConfigError::ValidationError(format!("{} is not valid UTF-8: {}", field_name, e)))
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}
