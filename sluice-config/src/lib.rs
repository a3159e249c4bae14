//! Configuration for sluice migration sources
//!
//! Settings are split by domain: the Codeup source URL and the HTTP client
//! used to reach the hosting service. Each domain validates itself.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

pub use domains::codeup::{
    ClientCredentials, CodeupConfig, SourceUrl, ACCESS_KEY_ID_ENV, ACCESS_KEY_SECRET_ENV,
    DEFAULT_REF,
};
pub use domains::http::HttpConfig;
pub use domains::SluiceConfig;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;
