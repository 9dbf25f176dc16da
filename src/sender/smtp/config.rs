//! SMTP config module.
//!
//! This module contains the representation of the SMTP server
//! configuration, as it can be deserialized from a user config file.

use serde::Deserialize;
use std::result;
use thiserror::Error;

use crate::{process, Credentials, Security};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot get smtp password")]
    GetPasswdError(#[source] process::Error),
    #[error("cannot get smtp password: password is empty")]
    GetPasswdEmptyError,
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the SMTP server config.
#[derive(Debug, Default, Clone, Eq, PartialEq, Deserialize)]
pub struct SmtpConfig {
    /// Represents the SMTP server host.
    pub host: String,
    /// Represents the SMTP server port.
    pub port: u16,
    /// Enables TLS. When unset, the session is upgraded with STARTTLS
    /// if the server supports it.
    pub ssl: Option<bool>,
    /// Uses STARTTLS instead of a TLS wrapped session when TLS is
    /// enabled.
    pub starttls: Option<bool>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
    /// Represents the SMTP server login.
    pub login: String,
    /// Represents the SMTP password command.
    pub passwd_cmd: String,
}

impl SmtpConfig {
    /// Joins host and port, bracketing IPv6 hosts (`[::1]:25`).
    pub fn server_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Builds the SMTP credentials, running the password command to
    /// get the PLAIN authentication secret.
    pub fn credentials(&self) -> Result<Credentials> {
        let passwd = process::run(&self.passwd_cmd).map_err(Error::GetPasswdError)?;
        let passwd = passwd
            .lines()
            .next()
            .filter(|passwd| !passwd.is_empty())
            .ok_or(Error::GetPasswdEmptyError)?;

        let mut creds = Credentials::new(self.server_address());
        creds
            .set_plain_auth(&self.login, passwd)
            .set_security(self.security())
            .set_insecure(self.insecure());

        Ok(creds)
    }

    pub fn security(&self) -> Security {
        match (self.ssl, self.starttls()) {
            (None, _) => Security::Opportunistic,
            (Some(false), _) => Security::Unencrypted,
            (Some(true), true) => Security::StartTls,
            (Some(true), false) => Security::Tls,
        }
    }

    pub fn starttls(&self) -> bool {
        self.starttls.unwrap_or_default()
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }
}
