//! Case-folding policies applied to query words.

use serde::{Deserialize, Serialize};

/// How query-time characters are folded before automaton lookup.
///
/// The folding must match the convention the pattern data was
/// compiled with; the shipped English sets are ASCII-lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseFolding {
    /// Fold `A..Z` to `a..z`, leaving everything else untouched.
    #[default]
    Ascii,
    /// Culture-invariant lowercasing through [`char::to_lowercase`]
    /// (first mapping character).
    Lowercase,
    /// No folding; the word is matched as written.
    Preserve,
}

impl CaseFolding {
    /// Folds one character under this policy.
    #[inline(always)]
    pub fn fold(self, c: char) -> char {
        match self {
            CaseFolding::Ascii => c.to_ascii_lowercase(),
            CaseFolding::Lowercase => c.to_lowercase().next().unwrap_or(c),
            CaseFolding::Preserve => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_leaves_non_ascii_untouched() {
        assert_eq!(CaseFolding::Ascii.fold('H'), 'h');
        assert_eq!(CaseFolding::Ascii.fold('Ä'), 'Ä');
    }

    #[test]
    fn lowercase_folds_beyond_ascii() {
        assert_eq!(CaseFolding::Lowercase.fold('Ä'), 'ä');
    }

    #[test]
    fn preserve_is_the_identity() {
        assert_eq!(CaseFolding::Preserve.fold('H'), 'H');
    }
}
