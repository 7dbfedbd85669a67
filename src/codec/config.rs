//! Codec configuration and per-call framing options

use super::CodecError;

/// Default bound on message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 500;

/// Framing options for [`Codec::encode`](super::Codec::encode) and
/// [`Codec::decode`](super::Codec::decode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecOptions {
    /// Use the two-space character separator and six-space word separator.
    /// When off, one space separates characters and two or more separate
    /// words.
    pub separators: bool,

    /// Wrap encoded messages in the start and end prosigns (ignored by
    /// decode).
    pub prosigns: bool,
}

impl CodecOptions {
    /// No separators, no prosigns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Separators on, prosigns off.
    pub fn separated() -> Self {
        Self::new().with_separators(true)
    }

    /// Toggle separators.
    pub fn with_separators(mut self, enabled: bool) -> Self {
        self.separators = enabled;
        self
    }

    /// Toggle prosigns.
    pub fn with_prosigns(mut self, enabled: bool) -> Self {
        self.prosigns = enabled;
        self
    }
}

/// Configuration fixed when a [`Codec`](super::Codec) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Longest encoded message accepted, and longest decoded text produced
    /// (in characters).
    pub max_message_len: usize,
}

impl CodecConfig {
    /// Configuration with an explicit message bound.
    pub fn with_max_message_len(max_message_len: usize) -> Result<Self, CodecError> {
        let config = Self { max_message_len };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before use.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.max_message_len == 0 {
            return Err(CodecError::InvalidConfiguration(
                "max message length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}
