use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::{UnknownCode, normalize_code};

/// Euro emissions class. Ordered from dirtiest to cleanest so the tariff
/// table can find the cleanest tier it defines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EmissionsClass {
    Euro0,
    Euro1,
    Euro2,
    Euro3,
    Euro4,
    Euro5,
    Euro6,
}

impl EmissionsClass {
    pub const ALL: [EmissionsClass; 7] = [
        Self::Euro0,
        Self::Euro1,
        Self::Euro2,
        Self::Euro3,
        Self::Euro4,
        Self::Euro5,
        Self::Euro6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Euro0 => "euro0",
            Self::Euro1 => "euro1",
            Self::Euro2 => "euro2",
            Self::Euro3 => "euro3",
            Self::Euro4 => "euro4",
            Self::Euro5 => "euro5",
            Self::Euro6 => "euro6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Euro0 => "Euro 0",
            Self::Euro1 => "Euro 1",
            Self::Euro2 => "Euro 2",
            Self::Euro3 => "Euro 3",
            Self::Euro4 => "Euro 4",
            Self::Euro5 => "Euro 5",
            Self::Euro6 => "Euro 6",
        }
    }

    /// Accepts `euro6`, `Euro 6`, `EURO-6` or a bare `6`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = normalize_code(s);
        let digit = normalized.strip_prefix("euro").unwrap_or(&normalized);
        match digit {
            "0" => Some(Self::Euro0),
            "1" => Some(Self::Euro1),
            "2" => Some(Self::Euro2),
            "3" => Some(Self::Euro3),
            "4" => Some(Self::Euro4),
            "5" => Some(Self::Euro5),
            "6" => Some(Self::Euro6),
            _ => None,
        }
    }
}

impl fmt::Display for EmissionsClass {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EmissionsClass {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownCode::new("emissions class", s))
    }
}
