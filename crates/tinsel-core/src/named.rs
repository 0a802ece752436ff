//! String names for small, closed configuration enums
//!
//! Shapes, easings and categories are written by name in scene files and on
//! the command line. Matching ignores case, `_` and `-`, so `spiralIn`,
//! `spiral_in` and `SPIRAL-IN` all resolve to the same variant.

use crate::{Result, TinselError};

/// A fieldless enum with a canonical name per variant.
pub trait Named: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const ALL: &'static [Self];

    /// Canonical name as written in scene files
    fn name(&self) -> &'static str;

    /// Resolve a name to a variant, listing the accepted names on failure
    fn parse_name(input: &str) -> Result<Self> {
        let wanted = fold(input);
        Self::ALL
            .iter()
            .copied()
            .find(|v| fold(v.name()) == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.name()).collect();
                TinselError::invalid_enum(input, &allowed)
            })
    }

    /// Position of this variant in `ALL`; stable for GPU uniform encoding
    fn ordinal(&self) -> u32 {
        let name = self.name();
        Self::ALL
            .iter()
            .position(|v| v.name() == name)
            .unwrap_or(0) as u32
    }
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
