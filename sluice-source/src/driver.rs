//! Migration source contract and driver registration

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::error::{Result, SourceError};

/// Body of one migration, readable once
pub struct MigrationBody {
    pub reader: Box<dyn Read + Send>,
    pub identifier: String,
}

impl MigrationBody {
    pub fn new(reader: Box<dyn Read + Send>, identifier: impl Into<String>) -> Self {
        Self {
            reader,
            identifier: identifier.into(),
        }
    }

    pub fn into_string(mut self) -> Result<String> {
        let mut content = String::new();
        self.reader.read_to_string(&mut content)?;
        Ok(content)
    }
}

impl fmt::Debug for MigrationBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationBody")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// An opened migration source
///
/// Absence of a version or neighbour is reported as
/// [`SourceError::NotFound`]; callers use it to detect the end of the
/// migration chain.
pub trait SourceDriver: Send + Sync {
    /// Release the source; it cannot be queried afterwards
    fn close(self: Box<Self>) -> Result<()>;

    fn first(&self) -> Result<u64>;

    fn prev(&self, version: u64) -> Result<u64>;

    fn next(&self, version: u64) -> Result<u64>;

    fn read_up(&self, version: u64) -> Result<MigrationBody>;

    fn read_down(&self, version: u64) -> Result<MigrationBody>;
}

/// Opens drivers from a source URL
pub trait DriverFactory: Send + Sync {
    fn open(&self, url: &str) -> Result<Box<dyn SourceDriver>>;
}

/// Source drivers by URL scheme
///
/// Hosts register the drivers they want at startup and open sources
/// through [`DriverRegistry::open`].
#[derive(Default, Clone)]
pub struct DriverRegistry {
    factories: HashMap<String, Arc<dyn DriverFactory>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl DriverFactory + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(SourceError::DuplicateDriver(name));
        }

        info!("Registered source driver {}", name);
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Open the driver registered for the URL's scheme
    pub fn open(&self, url: &str) -> Result<Box<dyn SourceDriver>> {
        let scheme = Url::parse(url)
            .map_err(sluice_config::ConfigError::from)?
            .scheme()
            .to_string();

        let factory = self
            .factories
            .get(&scheme)
            .ok_or_else(|| SourceError::UnknownDriver(scheme.clone()))?;

        factory.open(url)
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedDriver;

    impl SourceDriver for FixedDriver {
        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }

        fn first(&self) -> Result<u64> {
            Ok(1)
        }

        fn prev(&self, version: u64) -> Result<u64> {
            Err(SourceError::not_found(format!("prev for version {}", version), "/"))
        }

        fn next(&self, version: u64) -> Result<u64> {
            Err(SourceError::not_found(format!("next for version {}", version), "/"))
        }

        fn read_up(&self, _version: u64) -> Result<MigrationBody> {
            Ok(MigrationBody::new(Box::new(Cursor::new("up")), "fixed"))
        }

        fn read_down(&self, _version: u64) -> Result<MigrationBody> {
            Ok(MigrationBody::new(Box::new(Cursor::new("down")), "fixed"))
        }
    }

    struct FixedFactory;

    impl DriverFactory for FixedFactory {
        fn open(&self, _url: &str) -> Result<Box<dyn SourceDriver>> {
            Ok(Box::new(FixedDriver))
        }
    }

    #[test]
    fn test_open_dispatches_on_scheme() {
        let mut registry = DriverRegistry::new();
        registry.register("fixed", FixedFactory).unwrap();

        let driver = registry.open("fixed://anything/at/all").unwrap();
        assert_eq!(driver.first().unwrap(), 1);
        assert_eq!(driver.read_up(1).unwrap().into_string().unwrap(), "up");
        assert!(driver.next(1).unwrap_err().is_not_found());
        driver.close().unwrap();
    }

    #[test]
    fn test_unknown_scheme() {
        let registry = DriverRegistry::new();
        assert!(matches!(
            registry.open("s3://bucket/migrations"),
            Err(SourceError::UnknownDriver(ref s)) if s == "s3"
        ));
    }

    #[test]
    fn test_invalid_url() {
        let registry = DriverRegistry::new();
        assert!(matches!(
            registry.open("no scheme here"),
            Err(SourceError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = DriverRegistry::new();
        registry.register("fixed", FixedFactory).unwrap();

        let err = registry.register("fixed", FixedFactory).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateDriver(ref s) if s == "fixed"));
        assert_eq!(registry.names(), vec!["fixed"]);
    }

    #[test]
    fn test_not_found_display() {
        let err = SourceError::not_found("first", "/db/migrations");
        assert_eq!(err.to_string(), "first /db/migrations: file does not exist");
    }
}
