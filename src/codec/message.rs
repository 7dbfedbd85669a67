//! Message framing
//!
//! Character codes are produced by the tree; this module only decides what
//! goes between them. Per-character failures never abort a message:
//! unknown characters are skipped when encoding and undecodable tokens are
//! dropped when decoding.

use tracing::debug;

use super::alphabet::{self, END_OF_WORK, START_OF_TRANSMISSION};
use super::symbol::{DASH, DOT};
use super::{Codec, CodecError, CodecOptions};

/// Gap between two characters of a word (with separators).
pub const CHAR_SEPARATOR: &str = "  ";

/// Gap between two words (with separators).
pub const WORD_SEPARATOR: &str = "      ";

/// Gap between two characters of a word (without separators).
pub const PLAIN_CHAR_GAP: &str = " ";

/// Gap between two words (without separators).
pub const PLAIN_WORD_GAP: &str = "  ";

fn gaps(options: CodecOptions) -> (&'static str, &'static str) {
    if options.separators {
        (CHAR_SEPARATOR, WORD_SEPARATOR)
    } else {
        (PLAIN_CHAR_GAP, PLAIN_WORD_GAP)
    }
}

/// Unit produced by splitting a Morse message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Dots and dashes of one character
    Token(String),

    /// Boundary between two words
    WordBreak,
}

fn flush(token: &mut String, pieces: &mut Vec<Piece>) {
    if !token.is_empty() {
        pieces.push(Piece::Token(std::mem::take(token)));
    }
}

/// Split a message that uses the fixed separator literals.
///
/// The word separator is matched before the character separator. Lone
/// spaces inside a character are ignored, as is anything that is not a dot
/// or a dash.
pub fn split_separated(morse: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut token = String::new();
    let mut rest = morse;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(WORD_SEPARATOR) {
            flush(&mut token, &mut pieces);
            pieces.push(Piece::WordBreak);
            rest = tail;
            continue;
        }
        if let Some(tail) = rest.strip_prefix(CHAR_SEPARATOR) {
            flush(&mut token, &mut pieces);
            rest = tail;
            continue;
        }
        if c == DOT || c == DASH {
            token.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    flush(&mut token, &mut pieces);
    pieces
}

/// Split a message by space runs: one space ends a character, two or more
/// end a word.
pub fn split_spaced(morse: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut token = String::new();
    let mut chars = morse.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' ' {
            flush(&mut token, &mut pieces);
            let mut run = 1;
            while chars.next_if_eq(&' ').is_some() {
                run += 1;
            }
            if run >= 2 {
                pieces.push(Piece::WordBreak);
            }
        } else if c == DOT || c == DASH {
            token.push(c);
        }
    }

    flush(&mut token, &mut pieces);
    pieces
}

impl Codec {
    /// Encode `text` into a Morse message.
    ///
    /// Fillers and characters outside the alphabet are skipped, as are
    /// characters that have been hidden. Every space in `text` becomes a
    /// word gap.
    pub fn encode(&self, text: &str, options: CodecOptions) -> Result<String, CodecError> {
        let (char_gap, word_gap) = gaps(options);
        let mut out = String::new();

        if options.prosigns {
            self.push_prosign(&mut out, START_OF_TRANSMISSION);
            out.push_str(word_gap);
        }

        let mut after_symbol = false;
        for c in text.chars() {
            if c == ' ' {
                out.push_str(word_gap);
                after_symbol = false;
                continue;
            }
            if !alphabet::is_encodable(c) {
                if !alphabet::is_filler(c) {
                    debug!(symbol = ?c, "skipping character outside the alphabet");
                }
                continue;
            }

            match self.encode_char(c) {
                Ok(code) => {
                    if after_symbol {
                        out.push_str(char_gap);
                    }
                    out.extend(code.chars());
                    after_symbol = true;
                }
                Err(err) => debug!(%err, "skipping character"),
            }
        }

        if options.prosigns {
            out.push_str(word_gap);
            self.push_prosign(&mut out, END_OF_WORK);
        }

        let limit = self.config().max_message_len;
        if out.len() > limit {
            return Err(CodecError::MessageTooLong {
                length: out.len(),
                limit,
            });
        }
        Ok(out)
    }

    /// Prosign characters run together with no inter-character gap.
    fn push_prosign(&self, out: &mut String, prosign: &str) {
        for c in prosign.chars() {
            match self.encode_char(c) {
                Ok(code) => out.extend(code.chars()),
                Err(err) => debug!(%err, prosign, "skipping prosign character"),
            }
        }
    }

    /// Decode a Morse message into text.
    ///
    /// Tokens that do not decode are dropped. Each word boundary yields one
    /// space, output stops at the configured maximum length, and the
    /// result is trimmed.
    pub fn decode(&self, morse: &str, options: CodecOptions) -> String {
        let pieces = if options.separators {
            split_separated(morse)
        } else {
            split_spaced(morse)
        };

        let limit = self.config().max_message_len;
        let mut out = String::new();
        let mut produced = 0;

        for piece in pieces {
            if produced >= limit {
                debug!(limit, "decoded text reached the length bound");
                break;
            }
            match piece {
                Piece::WordBreak => {
                    out.push(' ');
                    produced += 1;
                }
                Piece::Token(token) => match self.decode_char(&token) {
                    Ok(symbol) => {
                        out.push(symbol);
                        produced += 1;
                    }
                    Err(err) => debug!(%err, "dropping token"),
                },
            }
        }

        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> Piece {
        Piece::Token(s.to_string())
    }

    #[test]
    fn test_split_separated() {
        let pieces = split_separated("...  ---      .-");
        assert_eq!(
            pieces,
            vec![token("..."), token("---"), Piece::WordBreak, token(".-")]
        );
    }

    #[test]
    fn test_split_separated_tolerates_element_spacing() {
        // One space after every element: 3 spaces between characters and
        // 7 between words.
        let pieces = split_separated(". . .   - - -       . - ");
        assert_eq!(
            pieces,
            vec![token("..."), token("---"), Piece::WordBreak, token(".-")]
        );
    }

    #[test]
    fn test_split_spaced() {
        let pieces = split_spaced(" .. -   .x-  ");
        assert_eq!(
            pieces,
            vec![token(".."), token("-"), Piece::WordBreak, token(".-"), Piece::WordBreak]
        );
        assert!(split_spaced("").is_empty());
    }

    #[test]
    fn test_gaps_follow_options() {
        assert_eq!(gaps(CodecOptions::separated()), (CHAR_SEPARATOR, WORD_SEPARATOR));
        assert_eq!(gaps(CodecOptions::new()), (" ", "  "));
        assert_eq!(WORD_SEPARATOR.len(), 6);
        assert_eq!(CHAR_SEPARATOR.len(), 2);
    }

    #[test]
    fn test_encode_skips_unknown_and_fillers() {
        let codec = Codec::new().unwrap();
        let encoded = codec.encode("a~!(b)", CodecOptions::separated()).unwrap();
        assert_eq!(encoded, ".-  -...");
    }

    #[test]
    fn test_decode_drops_bad_tokens() {
        let codec = Codec::new().unwrap();
        // "......" is deeper than the tree; "-.-.-" has no node.
        let decoded = codec.decode("......  ...  -.-.-  ---", CodecOptions::separated());
        assert_eq!(decoded, "SO");
    }
}
