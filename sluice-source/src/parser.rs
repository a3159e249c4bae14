//! Migration file name parsing
//!
//! Names follow the usual `{version}_{title}.{up|down}.{extension}` layout,
//! e.g. `1_create_users.up.sql`. A name without a direction marker such as
//! `4_backfill.sql` is a combined migration with no separate down step.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static DIRECTIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)_(.*)\.(down|up)\.(.*)$").expect("DIRECTIONAL: invalid regex pattern")
});

static COMBINED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)_(.*)\.([^.]*)$").expect("COMBINED: invalid regex pattern")
});

/// Direction a migration is applied in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file name that is not a migration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid migration file name: {name}")]
pub struct ParseError {
    pub name: String,
}

/// Components of a migration file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub version: u64,
    /// `None` for combined migrations
    pub direction: Option<Direction>,
    pub identifier: String,
}

/// Split a migration file name into version, direction and identifier
pub fn parse(name: &str) -> Result<ParsedName, ParseError> {
    let invalid = || ParseError {
        name: name.to_string(),
    };

    let (captures, direction) = match DIRECTIONAL.captures(name) {
        Some(captures) => {
            let direction = match &captures[3] {
                "up" => Direction::Up,
                _ => Direction::Down,
            };
            (captures, Some(direction))
        }
        None => (COMBINED.captures(name).ok_or_else(invalid)?, None),
    };

    let version = captures[1].parse::<u64>().map_err(|_| invalid())?;

    Ok(ParsedName {
        version,
        direction,
        identifier: captures[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directional_names() {
        assert_eq!(
            parse("1_init.up.sql").unwrap(),
            ParsedName {
                version: 1,
                direction: Some(Direction::Up),
                identifier: "init".to_string(),
            }
        );
        assert_eq!(
            parse("20240101120000_add_users_table.down.sql").unwrap(),
            ParsedName {
                version: 20240101120000,
                direction: Some(Direction::Down),
                identifier: "add_users_table".to_string(),
            }
        );
    }

    #[test]
    fn test_identifier_keeps_inner_dots_and_may_be_empty() {
        let parsed = parse("7_v1.2_rename.up.sql").unwrap();
        assert_eq!(parsed.identifier, "v1.2_rename");

        let parsed = parse("8_.down.sql").unwrap();
        assert_eq!(parsed.version, 8);
        assert_eq!(parsed.identifier, "");
    }

    #[test]
    fn test_parse_combined_name() {
        let parsed = parse("4_backfill.sql").unwrap();
        assert_eq!(parsed.version, 4);
        assert_eq!(parsed.direction, None);
        assert_eq!(parsed.identifier, "backfill");
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(parse("0003_seed.up.sql").unwrap().version, 3);
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in [
            "README.md",
            "init.up.sql",
            "1init.up.sql",
            "1_init",
            "v1_init.up.sql",
            "",
            // does not fit in u64
            "99999999999999999999999_big.up.sql",
        ] {
            let err = parse(name).unwrap_err();
            assert_eq!(err.name, name, "{} should be rejected", name);
        }
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
