/// Stock availability definitions for product records
use std::fmt;

/// Represents whether a product can currently be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    /// No out-of-stock marker was found on the page
    ///
    /// Absence of the marker is the only signal; a page that failed to
    /// render its buy box also lands here.
    InStock,

    /// The page carries the out-of-stock marker
    OutOfStock,

    /// Every attempt for this row failed
    Error,

    /// Nothing has been determined yet; the row is still a placeholder
    Unknown,
}

impl Availability {
    /// Returns true if the output row should be highlighted
    pub fn needs_highlight(&self) -> bool {
        matches!(self, Self::OutOfStock)
    }

    /// Converts the availability to the text written in the output sheet
    pub fn to_cell(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
            Self::Error => "Error",
            Self::Unknown => "Pending",
        }
    }

    /// Parses availability from its output sheet text
    ///
    /// Returns None if the string doesn't match any known value.
    pub fn from_cell(s: &str) -> Option<Self> {
        match s {
            "In Stock" => Some(Self::InStock),
            "Out of Stock" => Some(Self::OutOfStock),
            "Error" => Some(Self::Error),
            "Pending" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Returns all possible availability values
    pub fn all() -> [Self; 4] {
        [Self::InStock, Self::OutOfStock, Self::Error, Self::Unknown]
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell())
    }
}
