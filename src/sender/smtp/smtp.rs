//! SMTP module.
//!
//! This module contains the representation of the SMTP email sender.

use lettre::{
    address::Envelope,
    transport::smtp::{
        client::{Tls, TlsParameters},
        SmtpTransport,
    },
    Transport,
};
use log::{debug, trace};
use std::{num::ParseIntError, result, time::Duration};
use thiserror::Error;

use crate::{sender, Credentials, Security, Sender};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse server address {0}: port is missing")]
    MissingServerPortError(String),
    #[error("cannot parse port of server address {1}")]
    ParseServerPortError(#[source] ParseIntError, String),
    #[error("cannot authenticate to {1}: wrong host name {0}")]
    AuthHostMismatchError(String, String),
    #[error("cannot authenticate to {0}: unencrypted connection")]
    UnencryptedAuthError(String),
    #[error("cannot build smtp tls parameters")]
    BuildTlsParamsError(#[source] lettre::transport::smtp::Error),
    #[error("cannot send email")]
    SendError(#[source] lettre::transport::smtp::Error),
}

impl Error {
    /// Returns true when the error is detected before any network
    /// activity, from the credentials alone.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingServerPortError(_) | Self::ParseServerPortError(..)
        )
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the SMTP sender. Every send opens its own connection.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Smtp {
    timeout: Option<Duration>,
}

impl Smtp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout applied to every network operation of the
    /// session. Without timeout the sender blocks as long as the
    /// server does.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn transport(&self, creds: &Credentials) -> Result<SmtpTransport> {
        let host = creds.host();
        let port = creds.port()?;
        let mut security = creds.security();

        if let Some(auth) = creds.auth() {
            if auth.host() != host {
                return Err(Error::AuthHostMismatchError(
                    auth.host().to_owned(),
                    host.to_owned(),
                ));
            }

            if auth.requires_tls() {
                match security {
                    Security::Unencrypted => {
                        return Err(Error::UnencryptedAuthError(host.to_owned()))
                    }
                    Security::Opportunistic => security = Security::StartTls,
                    Security::StartTls | Security::Tls => (),
                }
            }
        }

        debug!("smtp server: {}:{} ({:?})", host, port, security);

        let tls_params = || {
            TlsParameters::builder(host.to_owned())
                .dangerous_accept_invalid_hostnames(creds.insecure())
                .dangerous_accept_invalid_certs(creds.insecure())
                .build()
                .map_err(Error::BuildTlsParamsError)
        };

        let tls = match security {
            Security::Opportunistic => Tls::Opportunistic(tls_params()?),
            Security::StartTls => Tls::Required(tls_params()?),
            Security::Tls => Tls::Wrapper(tls_params()?),
            Security::Unencrypted => Tls::None,
        };

        let mut builder = SmtpTransport::builder_dangerous(host)
            .port(port)
            .tls(tls)
            .timeout(self.timeout);

        if let Some(auth) = creds.auth() {
            builder = builder
                .credentials(auth.credentials())
                .authentication(auth.mechanisms());
        }

        Ok(builder.build())
    }
}

impl Sender for Smtp {
    fn send(
        &mut self,
        creds: &Credentials,
        envelope: &Envelope,
        payload: &[u8],
    ) -> sender::Result<()> {
        trace!(">> send message over smtp");

        self.transport(creds)?
            .send_raw(envelope, payload)
            .map_err(Error::SendError)?;

        trace!("<< send message over smtp");
        Ok(())
    }
}
