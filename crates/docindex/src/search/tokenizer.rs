//! Tokenization of titles and body text.

use serde::{Deserialize, Serialize};

/// Options controlling how text is split into terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerOptions {
    /// Keep the original case of terms.
    pub case_sensitive: bool,
    /// Drop terms shorter than this many characters.
    pub min_token_length: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            min_token_length: 1,
        }
    }
}

/// A term, its ordinal position, and where it sits in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The normalized term.
    pub term: String,
    /// Position among all terms of the text, before length filtering.
    pub position: usize,
    /// Char offset of the word in the source text.
    pub offset: usize,
    /// Length of the source word in chars.
    pub len: usize,
}

/// Split text into terms on any non-alphanumeric character.
#[must_use]
pub fn tokenize(text: &str, options: &TokenizerOptions) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut position = 0;
    let mut word: Option<(usize, usize)> = None;

    let mut emit = |start: usize, end: usize, offset: usize, tokens: &mut Vec<Token>| {
        let source = &text[start..end];
        let len = source.chars().count();
        if len >= options.min_token_length {
            tokens.push(Token {
                term: normalize(source, options),
                position,
                offset,
                len,
            });
        }
        position += 1;
    };

    for (char_index, (byte_index, c)) in text.char_indices().enumerate() {
        if c.is_alphanumeric() {
            if word.is_none() {
                word = Some((byte_index, char_index));
            }
        } else if let Some((start, offset)) = word.take() {
            emit(start, byte_index, offset, &mut tokens);
        }
    }
    if let Some((start, offset)) = word {
        emit(start, text.len(), offset, &mut tokens);
    }

    tokens
}

/// Tokenize and keep only the terms.
#[must_use]
pub fn terms(text: &str, options: &TokenizerOptions) -> Vec<String> {
    tokenize(text, options).into_iter().map(|t| t.term).collect()
}

/// Apply case folding according to the options.
#[must_use]
pub fn normalize(word: &str, options: &TokenizerOptions) -> String {
    if options.case_sensitive {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}
