//! Ordered catalog of migrations keyed by version

use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::warn;

use crate::parser::{self, Direction, ParseError};

/// A migration file found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub version: u64,
    pub direction: Direction,
    /// Human readable title, for display only
    pub identifier: String,
    /// File name as listed by the source; used to fetch the body
    pub raw: String,
}

impl MigrationRecord {
    /// Build a record from a file name
    ///
    /// Combined migrations (no direction marker) are catalogued as up
    /// migrations.
    pub fn from_name(raw: &str) -> Result<Self, ParseError> {
        let parsed = parser::parse(raw)?;
        Ok(Self {
            version: parsed.version,
            direction: parsed.direction.unwrap_or(Direction::Up),
            identifier: parsed.identifier,
            raw: raw.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Directions {
    up: Option<MigrationRecord>,
    down: Option<MigrationRecord>,
}

impl Directions {
    fn slot(&mut self, direction: Direction) -> &mut Option<MigrationRecord> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}

/// Migrations ordered by version, each with an optional up and down record
///
/// A version is present only while at least one record is attached to it.
/// Neighbour queries (`prev`, `next`) are answered only for versions that
/// are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationRegistry {
    versions: BTreeMap<u64, Directions>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a record to its version, returning the record it replaced
    pub fn insert(&mut self, record: MigrationRecord) -> Option<MigrationRecord> {
        let version = record.version;
        let direction = record.direction;

        let replaced = self
            .versions
            .entry(version)
            .or_default()
            .slot(direction)
            .replace(record);

        if let Some(previous) = &replaced {
            warn!(
                "Migration {} {} from {} replaced by a later entry",
                version, direction, previous.raw
            );
        }
        replaced
    }

    pub fn first(&self) -> Option<u64> {
        self.versions.keys().next().copied()
    }

    pub fn prev(&self, version: u64) -> Option<u64> {
        if !self.versions.contains_key(&version) {
            return None;
        }
        self.versions.range(..version).next_back().map(|(v, _)| *v)
    }

    pub fn next(&self, version: u64) -> Option<u64> {
        if !self.versions.contains_key(&version) {
            return None;
        }
        self.versions
            .range((Bound::Excluded(version), Bound::Unbounded))
            .next()
            .map(|(v, _)| *v)
    }

    pub fn up(&self, version: u64) -> Option<&MigrationRecord> {
        self.versions.get(&version)?.up.as_ref()
    }

    pub fn down(&self, version: u64) -> Option<&MigrationRecord> {
        self.versions.get(&version)?.down.as_ref()
    }

    pub fn get(&self, version: u64, direction: Direction) -> Option<&MigrationRecord> {
        match direction {
            Direction::Up => self.up(version),
            Direction::Down => self.down(version),
        }
    }

    /// Versions in increasing order
    pub fn versions(&self) -> impl Iterator<Item = u64> + '_ {
        self.versions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
