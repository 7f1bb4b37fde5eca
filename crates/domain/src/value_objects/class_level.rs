//! Secondary school class level (Senior 1 to Senior 4)

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Lower secondary class level covered by the NCDC curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassLevel {
    S1,
    S2,
    S3,
    S4,
}

impl ClassLevel {
    /// All class levels in teaching order
    pub const ALL: [Self; 4] = [Self::S1, Self::S2, Self::S3, Self::S4];

    /// Canonical label, e.g. `"S2"`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::S4 => "S4",
        }
    }

    /// Zero-based position in [`ClassLevel::ALL`]
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::S1 => 0,
            Self::S2 => 1,
            Self::S3 => 2,
            Self::S4 => 3,
        }
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S1" => Ok(Self::S1),
            "S2" => Ok(Self::S2),
            "S3" => Ok(Self::S3),
            "S4" => Ok(Self::S4),
            _ => Err(DomainError::InvalidClassLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("s2".parse::<ClassLevel>().unwrap(), ClassLevel::S2);
        assert_eq!(" S4 ".parse::<ClassLevel>().unwrap(), ClassLevel::S4);
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!("S5".parse::<ClassLevel>().is_err());
        assert!("".parse::<ClassLevel>().is_err());
    }

    #[test]
    fn display_matches_label() {
        for level in ClassLevel::ALL {
            assert_eq!(level.to_string(), level.as_str());
        }
    }

    #[test]
    fn index_follows_order() {
        for (i, level) in ClassLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&ClassLevel::S3).unwrap();
        assert_eq!(json, "\"S3\"");
    }
}
