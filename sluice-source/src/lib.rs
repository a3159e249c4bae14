//! Migration sources backed by remote repositories
//!
//! A source enumerates migration files once when it is opened, orders them
//! by version and serves their bodies on demand. Hosts pick sources by URL
//! scheme through a [`DriverRegistry`].

pub mod codeup;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod registry;

// Re-export main types and traits
pub use codeup::{CodeupDriver, CodeupSource, DRIVER_NAME};
pub use driver::{DriverFactory, DriverRegistry, MigrationBody, SourceDriver};
pub use error::{Result, SourceError};
pub use fetcher::RemoteFetcher;
pub use parser::{parse, Direction, ParseError, ParsedName};
pub use registry::{MigrationRecord, MigrationRegistry};

use sluice_config::SluiceConfig;

/// Register every driver this crate provides
pub fn register_default_drivers(registry: &mut DriverRegistry, config: &SluiceConfig) -> Result<()> {
    registry.register(DRIVER_NAME, CodeupSource::new(config.http.clone()))
}

pub mod prelude {
    pub use crate::{
        driver::*, error::*, CodeupDriver, CodeupSource, MigrationRecord, MigrationRegistry,
    };
}
