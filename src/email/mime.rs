//! MIME module.
//!
//! This module serializes a [`Message`] into a MIME document: a single
//! text/plain part when the message has no attachment, a
//! multipart/mixed document otherwise. Every part is base64 encoded.

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use log::{debug, trace};
use std::{
    fmt,
    io::{self, Write},
};
use uuid::Uuid;

use crate::{
    email::{
        addr::{encode_text, encode_words, quote, validate_header_value},
        Error, Result,
    },
    Address, Attachment, Message,
};

const CRLF: &[u8] = b"\r\n";

// RFC 2045 limits encoded lines to 76 chars.
const BASE64_LINE_LEN: usize = 76;

/// Represents the token delimiting the parts of a multipart
/// document.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Generates a new boundary, unique per message.
    pub fn random() -> Self {
        Self(format!("mailbox_{}", Uuid::new_v4().to_simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::random()
    }
}

impl From<&str> for Boundary {
    fn from(boundary: &str) -> Self {
        Self(boundary.to_owned())
    }
}

impl From<String> for Boundary {
    fn from(boundary: String) -> Self {
        Self(boundary)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes the message into a MIME document delimited by the
/// given boundary. The boundary is only used when the message has
/// attachments.
///
/// The whole document is built in memory: nothing is returned unless
/// every header and part could be written.
pub fn encode(msg: &Message, boundary: &Boundary) -> Result<Vec<u8>> {
    trace!(">> encode message");

    let from = msg.sender().ok_or(Error::MissingSenderError)?;
    let (first, others) = msg
        .recipients()
        .split_first()
        .ok_or(Error::MissingRecipientsError)?;

    from.validate("From")?;
    for addr in msg.recipients() {
        addr.validate("To")?;
    }
    validate_header_value("Subject", msg.subject_text())?;
    for attachment in msg.attachments() {
        validate_header_value("Content-Disposition", &attachment.filename)?;
    }

    let boundary = if msg.attachments().is_empty() {
        None
    } else {
        debug!("multipart boundary: {}", boundary);
        Some(boundary)
    };

    let mut buf = Vec::new();

    write_headers(&mut buf, msg, from, first, others, boundary)
        .map_err(Error::WritePartError)?;
    write_text_part(&mut buf, msg.body_text()).map_err(Error::WritePartError)?;

    if let Some(boundary) = boundary {
        for attachment in msg.attachments() {
            write_attachment_part(&mut buf, boundary, attachment)
                .map_err(|err| Error::WriteAttachmentError(err, attachment.filename.clone()))?;
        }
        write!(buf, "--{}--\r\n", boundary).map_err(Error::WritePartError)?;
    }

    debug!("encoded message: {} bytes", buf.len());
    trace!("<< encode message");
    Ok(buf)
}

fn write_headers<W: Write>(
    w: &mut W,
    msg: &Message,
    from: &Address,
    first: &Address,
    others: &[Address],
    boundary: Option<&Boundary>,
) -> io::Result<()> {
    write!(w, "From: {}\r\n", from)?;

    write!(w, "To: {}", first)?;
    for addr in others {
        write!(w, ",{}", addr)?;
    }
    w.write_all(CRLF)?;

    write!(w, "Subject: {}\r\n", encode_text(msg.subject_text()))?;
    write!(w, "MIME-Version: 1.0\r\n")?;

    if let Some(boundary) = boundary {
        write!(w, "Content-Type: multipart/mixed; boundary={}\r\n", boundary)?;
        w.write_all(CRLF)?;
        write!(w, "--{}\r\n", boundary)?;
    }

    Ok(())
}

fn write_text_part<W: Write>(w: &mut W, body: &str) -> io::Result<()> {
    write!(w, "Content-Type: text/plain; charset=\"utf-8\"\r\n")?;
    write!(w, "Content-Transfer-Encoding: base64\r\n")?;
    w.write_all(CRLF)?;
    write_base64(w, body.as_bytes())
}

fn write_attachment_part<W: Write>(
    w: &mut W,
    boundary: &Boundary,
    attachment: &Attachment,
) -> io::Result<()> {
    write!(w, "--{}\r\n", boundary)?;
    write!(w, "Content-Type: application/octet-stream\r\n")?;
    write!(w, "Content-Transfer-Encoding: base64\r\n")?;
    write!(
        w,
        "Content-Disposition: attachment; filename={}\r\n",
        encode_filename(&attachment.filename)
    )?;
    w.write_all(CRLF)?;
    write_base64(w, &attachment.body)
}

fn encode_filename(filename: &str) -> String {
    if filename.is_ascii() {
        quote(filename)
    } else {
        quote(&encode_words(filename))
    }
}

fn write_base64<W: Write>(w: &mut W, content: &[u8]) -> io::Result<()> {
    let encoded = base64.encode(content);
    for line in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        w.write_all(line)?;
        w.write_all(CRLF)?;
    }
    Ok(())
}
