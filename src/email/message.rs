//! Message module.
//!
//! This module contains the representation of the message being
//! composed, together with its builder operations.

use log::{debug, trace, warn};
use std::{
    borrow::Cow,
    env, fs, io,
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

use crate::Address;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot expand attachment path {1}")]
    ExpandAttachmentPathError(#[source] shellexpand::LookupError<env::VarError>, String),
    #[error("cannot read attachment at {1}")]
    ReadAttachmentError(#[source] io::Error, PathBuf),
    #[error("cannot get file name of attachment {0}")]
    GetAttachmentFilenameError(PathBuf),

    #[error("cannot encode message: sender is missing")]
    MissingSenderError,
    #[error("cannot encode message: no recipients")]
    MissingRecipientsError,
    #[error("cannot encode message: header {0} contains control characters")]
    InvalidHeaderValueError(String),
    #[error("cannot write message part")]
    WritePartError(#[source] io::Error),
    #[error("cannot attach {1}")]
    WriteAttachmentError(#[source] io::Error, String),
}

impl Error {
    /// Returns true when the error comes from the message content
    /// rather than from the filesystem or the encoder.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingSenderError
                | Self::MissingRecipientsError
                | Self::InvalidHeaderValueError(_)
        )
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Represents a file attached to a message.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub body: Vec<u8>,
}

/// Represents a plain text message with optional attachments.
///
/// Every builder operation returns the same message so calls can be
/// chained:
///
/// ```
/// use mailbox_lib::Message;
///
/// let mut msg = Message::new();
/// msg.from("Alice", "alice@localhost")
///     .to("Bob", "bob@localhost")
///     .subject("Hi")
///     .body("hello");
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Message {
    from: Option<Address>,
    to: Vec<Address>,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sender.
    pub fn from<N: ToString, E: ToString>(&mut self, name: N, email: E) -> &mut Self {
        self.from = Some(Address::new(name, email));
        self
    }

    /// Appends a recipient. Recipients are neither deduplicated nor
    /// reordered.
    pub fn to<N: ToString, E: ToString>(&mut self, name: N, email: E) -> &mut Self {
        self.to.push(Address::new(name, email));
        self
    }

    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = subject.to_string();
        self
    }

    pub fn body<S: ToString>(&mut self, body: S) -> &mut Self {
        self.body = body.to_string();
        self
    }

    /// Reads the whole file at the given path and attaches it under
    /// its base name. The path is read as given.
    ///
    /// On error the attachments stay untouched.
    pub fn attach<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        trace!(">> attach file");

        let path = path.as_ref();
        debug!("attachment path: {:?}", path);

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::GetAttachmentFilenameError(path.to_owned()))?;
        let body =
            fs::read(path).map_err(|err| Error::ReadAttachmentError(err, path.to_owned()))?;

        self.attach_bytes(filename, body);

        trace!("<< attach file");
        Ok(self)
    }

    /// Same as [`Message::attach`], but shell expands the path first
    /// (`~` and environment variables), as done for paths coming from
    /// user configuration.
    pub fn attach_expanded<S: AsRef<str>>(&mut self, path: S) -> Result<&mut Self> {
        let path = expand_path(path.as_ref())?;
        self.attach(path)
    }

    /// Attaches in-memory content under the given file name. A file
    /// name already attached gets its content replaced, keeping its
    /// position.
    pub fn attach_bytes<N: ToString, B: Into<Vec<u8>>>(&mut self, filename: N, body: B) -> &mut Self {
        let filename = filename.to_string();
        let body = body.into();
        debug!("attaching {} ({} bytes)", filename, body.len());

        match self
            .attachments
            .iter_mut()
            .find(|attachment| attachment.filename == filename)
        {
            Some(attachment) => {
                warn!("attachment {} already exists, replacing it", filename);
                attachment.body = body;
            }
            None => self.attachments.push(Attachment { filename, body }),
        }

        self
    }

    pub fn sender(&self) -> Option<&Address> {
        self.from.as_ref()
    }

    pub fn recipients(&self) -> &[Address] {
        &self.to
    }

    pub fn subject_text(&self) -> &str {
        &self.subject
    }

    pub fn body_text(&self) -> &str {
        &self.body
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

fn expand_path(path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(Cow::into_owned)
        .map(PathBuf::from)
        .map_err(|err| Error::ExpandAttachmentPathError(err, path.to_owned()))
}
