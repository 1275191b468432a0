//! CLI enum types.

use clap::ValueEnum;

use crate::preview::CharSet;

/// ASCII character set for the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
}

impl From<CharacterSet> for CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => CharSet::Standard,
            CharacterSet::Blocks => CharSet::Blocks,
            CharacterSet::Minimal => CharSet::Minimal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_to_preview_charset() {
        assert_eq!(CharSet::from(CharacterSet::Standard), CharSet::Standard);
        assert_eq!(CharSet::from(CharacterSet::Blocks), CharSet::Blocks);
        assert_eq!(CharSet::from(CharacterSet::Minimal), CharSet::Minimal);
    }

    #[test]
    fn test_value_names_match_config_names() {
        for c in CharacterSet::value_variants() {
            let name = c.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(CharSet::from_name(&name), Some(CharSet::from(*c)));
        }
    }
}
