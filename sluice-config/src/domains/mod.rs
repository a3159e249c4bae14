//! Domain-specific configuration modules

pub mod codeup;
pub mod http;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Process-wide settings shared by every source driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SluiceConfig {
    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,
}

impl SluiceConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.http.validate()
    }
}
