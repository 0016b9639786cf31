//! Cell locations on a staggered grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a field's values sit within a grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellLocation {
    /// Cell centre (the usual case)
    #[default]
    Centre,
    /// Lower x face
    XLow,
    /// Lower y face
    YLow,
    /// Lower z face
    ZLow,
}

impl CellLocation {
    /// Parse a location name (case-insensitive). Unknown names map to the centre.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "xlow" | "x_low" => Self::XLow,
            "ylow" | "y_low" => Self::YLow,
            "zlow" | "z_low" => Self::ZLow,
            _ => Self::Centre,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centre => "centre",
            Self::XLow => "xlow",
            Self::YLow => "ylow",
            Self::ZLow => "zlow",
        }
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(CellLocation::from_str("XLOW"), CellLocation::XLow);
        assert_eq!(CellLocation::from_str("y_low"), CellLocation::YLow);
        assert_eq!(CellLocation::from_str("centre"), CellLocation::Centre);
        assert_eq!(CellLocation::from_str("bogus"), CellLocation::Centre);
    }
}
