//! Dots, dashes and whole character codes

use std::fmt;
use std::str::FromStr;

use crate::tree::Direction;

use super::CodecError;

/// Dot ("dit") literal.
pub const DOT: char = '.';

/// Dash ("dah") literal.
pub const DASH: char = '-';

/// One element of a character code.
///
/// A dot is a step into the left subtree of the Morse tree, a dash a step
/// into the right subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub enum MorseSymbol {
    /// Short mark
    Dot,

    /// Long mark
    Dash,
}

impl MorseSymbol {
    /// Parse a single `.` or `-`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            DOT => Some(MorseSymbol::Dot),
            DASH => Some(MorseSymbol::Dash),
            _ => None,
        }
    }

    /// Literal for this symbol.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            MorseSymbol::Dot => DOT,
            MorseSymbol::Dash => DASH,
        }
    }
}

impl From<Direction> for MorseSymbol {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => MorseSymbol::Dot,
            Direction::Right => MorseSymbol::Dash,
        }
    }
}

impl From<MorseSymbol> for Direction {
    fn from(symbol: MorseSymbol) -> Self {
        match symbol {
            MorseSymbol::Dot => Direction::Left,
            MorseSymbol::Dash => Direction::Right,
        }
    }
}

/// Code of a single character: its path from the root of the Morse tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct MorseCode {
    symbols: Vec<MorseSymbol>,
}

impl MorseCode {
    /// Code spelled by a root-to-node path.
    pub fn from_path(path: Vec<Direction>) -> Self {
        path.into_iter().map(MorseSymbol::from).collect()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` for the code of the root.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Elements in transmission order.
    pub fn symbols(&self) -> &[MorseSymbol] {
        &self.symbols
    }

    /// Iterate over the elements; can be restarted any number of times.
    pub fn iter(&self) -> impl Iterator<Item = MorseSymbol> + '_ {
        self.symbols.iter().copied()
    }

    /// Turns to take from the root of the Morse tree.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.iter().map(Direction::from)
    }

    /// Characters of the code (`.` and `-`).
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.iter().map(MorseSymbol::as_char)
    }
}

impl FromIterator<MorseSymbol> for MorseCode {
    fn from_iter<I: IntoIterator<Item = MorseSymbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl FromStr for MorseCode {
    type Err = CodecError;

    /// Parse a token made only of dots and dashes. Empty tokens and any
    /// other character are rejected.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() {
            return Err(CodecError::InvalidToken(String::new()));
        }
        token
            .chars()
            .map(MorseSymbol::from_char)
            .collect::<Option<MorseCode>>()
            .ok_or_else(|| CodecError::InvalidToken(token.to_string()))
    }
}

impl fmt::Display for MorseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
