//! Address module.
//!
//! This module contains the representation of a mailbox address and
//! the helpers used to render header values.

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use std::fmt;

use crate::email::{Error, Result};

// Longest chunk of UTF-8 that still fits in a 75 chars encoded word
// once base64 encoded.
const ENCODED_WORD_CHUNK_LEN: usize = 45;

/// Represents a mailbox: a display name and an email address.
///
/// The display name can be empty, in which case only the bare
/// address is rendered.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Address {
    pub name: String,
    pub email: String,
}

impl Address {
    pub fn new<N: ToString, E: ToString>(name: N, email: E) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    /// Ensures the address can be written in the given header field
    /// without breaking the header block.
    pub fn validate(&self, field: &str) -> Result<()> {
        validate_header_value(field, &self.name)?;
        validate_header_value(field, &self.email)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<{}>", self.email)
        } else {
            write!(f, "{} <{}>", encode_phrase(&self.name), self.email)
        }
    }
}

/// Renders a header phrase: quoted when ASCII, encoded word(s)
/// otherwise.
pub(crate) fn encode_phrase(text: &str) -> String {
    if text.is_ascii() {
        quote(text)
    } else {
        encode_words(text)
    }
}

/// Renders free header text (like the subject): as is when ASCII,
/// encoded word(s) otherwise.
pub(crate) fn encode_text(text: &str) -> String {
    if text.is_ascii() {
        text.to_owned()
    } else {
        encode_words(text)
    }
}

pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Encodes the text as RFC 2047 base64 encoded words, splitting on
/// char boundaries so that each word stays under the length limit.
pub(crate) fn encode_words(text: &str) -> String {
    let mut words = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if i + c.len_utf8() - start > ENCODED_WORD_CHUNK_LEN {
            words.push(&text[start..i]);
            start = i;
        }
    }
    words.push(&text[start..]);

    words
        .into_iter()
        .map(|word| format!("=?utf-8?B?{}?=", base64.encode(word)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rejects values containing control characters, which would allow
/// header injection. Tabs are allowed.
pub(crate) fn validate_header_value(field: &str, value: &str) -> Result<()> {
    if value.chars().any(|c| c != '\t' && c.is_control()) {
        return Err(Error::InvalidHeaderValueError(field.to_owned()));
    }
    Ok(())
}
