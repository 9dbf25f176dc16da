//! Sender module.
//!
//! This module contains the sender interface and the send operation:
//! a message is encoded, its envelope is built from the bare sender
//! and recipient addresses, then both are handed to a [`Sender`].

use lettre::address::{Address as EnvelopeAddress, AddressError, Envelope};
use log::{debug, trace};
use std::result;
use thiserror::Error;

use crate::{
    email::{self, mime},
    sender::smtp,
    Boundary, Credentials, Message, Smtp,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot send message: credentials must not be nil")]
    MissingCredentialsError,
    #[error("cannot send message: message must not be nil")]
    MissingMessageError,
    #[error("cannot parse envelope address {1}")]
    ParseEnvelopeAddressError(#[source] AddressError, String),
    #[error("cannot build envelope")]
    BuildEnvelopeError(#[source] lettre::error::Error),

    #[error(transparent)]
    EmailError(#[from] email::Error),
    #[error(transparent)]
    SmtpError(#[from] smtp::Error),
}

impl Error {
    /// Returns true when the send was refused because of its inputs,
    /// before any network activity.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::MissingCredentialsError
            | Self::MissingMessageError
            | Self::ParseEnvelopeAddressError(..)
            | Self::BuildEnvelopeError(_) => true,
            Self::EmailError(err) => err.is_invalid_argument(),
            Self::SmtpError(err) => err.is_invalid_argument(),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Represents a way to submit an encoded message to a mail server.
pub trait Sender {
    fn send(&mut self, creds: &Credentials, envelope: &Envelope, payload: &[u8]) -> Result<()>;
}

/// Sends the message to the server described by the credentials,
/// over SMTP. Returns the raw message that was sent.
pub fn send_message(creds: Option<&Credentials>, msg: Option<&Message>) -> Result<Vec<u8>> {
    send_message_with(&mut Smtp::new(), creds, msg)
}

/// Sends the message using the given sender. Returns the raw message
/// that was sent.
///
/// The message is fully encoded and its envelope built before the
/// sender is called: when this function fails early, nothing has
/// been sent.
pub fn send_message_with<S: Sender + ?Sized>(
    sender: &mut S,
    creds: Option<&Credentials>,
    msg: Option<&Message>,
) -> Result<Vec<u8>> {
    trace!(">> send message");

    let creds = creds.ok_or(Error::MissingCredentialsError)?;
    let msg = msg.ok_or(Error::MissingMessageError)?;

    let payload = mime::encode(msg, &Boundary::random())?;
    let envelope = envelope(msg)?;
    debug!(
        "envelope: from {:?} to {:?}",
        envelope.from().map(ToString::to_string),
        envelope.to().iter().map(ToString::to_string).collect::<Vec<_>>(),
    );

    sender.send(creds, &envelope, &payload)?;

    trace!("<< send message");
    Ok(payload)
}

/// Builds the SMTP envelope of the message: the bare sender address
/// and the bare recipient addresses, in order.
pub fn envelope(msg: &Message) -> Result<Envelope> {
    let from = msg.sender().ok_or(email::Error::MissingSenderError)?;
    if msg.recipients().is_empty() {
        return Err(email::Error::MissingRecipientsError.into());
    }

    let from = parse_address(&from.email)?;
    let to = msg
        .recipients()
        .iter()
        .map(|addr| parse_address(&addr.email))
        .collect::<Result<Vec<_>>>()?;

    Envelope::new(Some(from), to).map_err(Error::BuildEnvelopeError)
}

fn parse_address(addr: &str) -> Result<EnvelopeAddress> {
    addr.parse()
        .map_err(|err| Error::ParseEnvelopeAddressError(err, addr.to_owned()))
}
