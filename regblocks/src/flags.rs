//! Regex flags
//!
//! Only the six classic flags are recognized; any other character in a flags
//! string is ignored.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The set of flags accompanying a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct FlagSet {
    /// `g`
    pub global: bool,
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `s`
    pub dot_all: bool,
    /// `u`
    pub unicode: bool,
    /// `y`
    pub sticky: bool,
}

impl FlagSet {
    /// Parse a flags string such as `"gi"`
    pub fn parse(flags: &str) -> Self {
        let mut set = FlagSet::default();
        for c in flags.chars() {
            match c {
                'g' => set.global = true,
                'i' => set.ignore_case = true,
                'm' => set.multiline = true,
                's' => set.dot_all = true,
                'u' => set.unicode = true,
                'y' => set.sticky = true,
                _ => {}
            }
        }
        set
    }

    /// Whether no flag is set
    pub fn is_empty(&self) -> bool {
        *self == FlagSet::default()
    }
}

impl FromStr for FlagSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FlagSet::parse(s))
    }
}

/// Canonical `gimsuy` order
impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (on, letter) in letters {
            if on {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
