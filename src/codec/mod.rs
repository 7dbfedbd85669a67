//! Text ↔ Morse transcoding over an AVL tree
//!
//! The tree is the code book: a character's code is the path from the root
//! to its node, a dot for every left turn and a dash for every right turn.
//! Encoding searches by rank and records the turns; decoding replays the
//! turns. Hidden nodes are invisible in both directions.

pub mod alphabet;
mod config;
mod message;
mod symbol;

pub use config::{CodecConfig, CodecOptions, DEFAULT_MAX_MESSAGE_LEN};
pub use message::{
    split_separated, split_spaced, Piece, CHAR_SEPARATOR, PLAIN_CHAR_GAP, PLAIN_WORD_GAP,
    WORD_SEPARATOR,
};
pub use symbol::{MorseCode, MorseSymbol, DASH, DOT};

use thiserror::Error;
use tracing::debug;

use crate::tree::{Insertion, Removal, SearchTree, TreeError};

/// Errors that can occur while building or using a [`Codec`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Character has no visible node in the Morse tree.
    #[error("symbol {0:?} is not in the morse tree")]
    UnknownSymbol(char),

    /// Token is empty, contains something other than dots and dashes, walks
    /// off the tree or lands on a hidden node.
    #[error("invalid morse token {0:?}")]
    InvalidToken(String),

    /// Encoded message exceeds the configured bound.
    #[error("encoded message is {length} characters long, limit is {limit}")]
    MessageTooLong {
        /// Length of the encoded message
        length: usize,
        /// Configured bound
        limit: usize,
    },

    /// Configuration rejected (e.g., zero length bound).
    #[error("invalid codec configuration: {0}")]
    InvalidConfiguration(String),

    /// Building the tree failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Morse encoder/decoder
///
/// Owns the Morse tree built once at construction. Encoding and decoding
/// only read it; [`Codec::hide`] and [`Codec::reveal`] toggle individual
/// symbols without changing the tree's shape.
#[derive(Debug)]
pub struct Codec {
    tree: SearchTree<char>,
    config: CodecConfig,
}

impl Codec {
    /// Build the Morse tree with the default configuration.
    pub fn new() -> Result<Self, CodecError> {
        Self::with_config(CodecConfig::default())
    }

    /// Build the Morse tree with `config`.
    pub fn with_config(config: CodecConfig) -> Result<Self, CodecError> {
        config.validate()?;
        let tree = alphabet::build_tree()?;
        debug!(
            nodes = tree.len(),
            height = tree.height(),
            "built morse tree"
        );
        Ok(Self { tree, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Backing tree.
    pub fn tree(&self) -> &SearchTree<char> {
        &self.tree
    }

    /// Code of a single character (case-insensitive).
    pub fn encode_char(&self, symbol: char) -> Result<MorseCode, CodecError> {
        if alphabet::rank(symbol).is_none() {
            return Err(CodecError::UnknownSymbol(symbol));
        }
        self.tree
            .trace(&symbol)
            .map(MorseCode::from_path)
            .ok_or(CodecError::UnknownSymbol(symbol))
    }

    /// Character at the end of the path spelled by `token`.
    pub fn decode_char(&self, token: &str) -> Result<char, CodecError> {
        let code: MorseCode = token.parse()?;
        let invalid = || CodecError::InvalidToken(token.to_string());

        let node = self.tree.follow(code.directions()).ok_or_else(invalid)?;
        match self.tree.record(node) {
            Some(record) if !record.is_hidden() => Ok(*record.payload()),
            _ => Err(invalid()),
        }
    }

    /// Hide `symbol`: it stops encoding and its code stops decoding.
    pub fn hide(&mut self, symbol: char) -> Removal {
        if alphabet::rank(symbol).is_none() {
            return Removal::NotFound;
        }
        self.tree.remove(&symbol)
    }

    /// Make a hidden `symbol` visible again.
    pub fn reveal(&mut self, symbol: char) -> Result<Insertion, CodecError> {
        if alphabet::rank(symbol).is_none() {
            return Err(CodecError::UnknownSymbol(symbol));
        }
        Ok(self.tree.insert(symbol.to_ascii_uppercase())?)
    }

    /// Release the tree.
    pub fn teardown(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_char_basics() {
        let codec = Codec::new().unwrap();
        assert_eq!(codec.encode_char('E').unwrap().to_string(), ".");
        assert_eq!(codec.encode_char('t').unwrap().to_string(), "-");
        assert_eq!(codec.encode_char('S').unwrap().to_string(), "...");
        assert_eq!(codec.encode_char('O').unwrap().to_string(), "---");
        assert_eq!(codec.encode_char('!'), Err(CodecError::UnknownSymbol('!')));
    }

    #[test]
    fn test_decode_char_basics() {
        let codec = Codec::new().unwrap();
        assert_eq!(codec.decode_char("."), Ok('E'));
        assert_eq!(codec.decode_char("-----"), Ok('0'));
        assert_eq!(
            codec.decode_char("......"),
            Err(CodecError::InvalidToken("......".to_string()))
        );
        assert_eq!(
            codec.decode_char(".-x"),
            Err(CodecError::InvalidToken(".-x".to_string()))
        );
        assert!(codec.decode_char("").is_err());
    }

    #[test]
    fn test_hide_and_reveal() {
        let mut codec = Codec::new().unwrap();
        assert_eq!(codec.hide('e'), Removal::Hidden);
        assert_eq!(codec.hide('E'), Removal::NotFound);
        assert_eq!(codec.encode_char('E'), Err(CodecError::UnknownSymbol('E')));
        assert!(codec.decode_char(".").is_err());
        // Nodes below a hidden one keep their codes.
        assert_eq!(codec.decode_char(".."), Ok('I'));

        assert_eq!(codec.reveal('e'), Ok(Insertion::Revealed));
        assert_eq!(codec.decode_char("."), Ok('E'));
        assert_eq!(codec.reveal('E'), Ok(Insertion::DuplicateVisible));
        assert_eq!(codec.reveal('!'), Err(CodecError::UnknownSymbol('!')));
        assert_eq!(codec.hide('!'), Removal::NotFound);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CodecConfig { max_message_len: 0 };
        assert!(matches!(
            Codec::with_config(config),
            Err(CodecError::InvalidConfiguration(_))
        ));
    }
}
