//! Vehicle categories and label resolution.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Vehicle class. Each category owns an independently numbered slot range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Car,
    Motorcycle,
}

/// Label did not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized vehicle category '{0}'")]
pub struct UnrecognizedCategory(pub String);

impl Category {
    /// Every category, in pool order.
    pub const ALL: [Category; 2] = [Category::Car, Category::Motorcycle];

    /// Number of categories (and therefore pools in a facility).
    pub const COUNT: usize = Self::ALL.len();

    /// Resolve a label case-insensitively. Only exact matches count.
    pub fn resolve(label: &str) -> Result<Self, UnrecognizedCategory> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnrecognizedCategory(label.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Motorcycle => "Motorcycle",
        }
    }

    /// Position of this category's pool inside a facility.
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Car => 0,
            Self::Motorcycle => 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnrecognizedCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
