//! SMTP credentials module.
//!
//! This module contains the representation of a SMTP server together
//! with the way to authenticate against it.

use std::sync::Arc;

use crate::{
    sender::smtp::{Error, Result},
    Auth, PlainAuth,
};

/// Represents the way the SMTP session gets encrypted.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Security {
    /// Upgrades the session with STARTTLS when the server advertises
    /// it.
    #[default]
    Opportunistic,
    /// Requires the server to support STARTTLS.
    StartTls,
    /// Wraps the whole session in TLS.
    Tls,
    Unencrypted,
}

/// Represents a SMTP server and how to authenticate against it.
///
/// Credentials are configured once per server and can then be reused
/// across sends.
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    server_address: String,
    auth: Option<Arc<dyn Auth>>,
    security: Security,
    insecure: bool,
}

impl Credentials {
    /// Creates credentials for the server at the given `host:port`
    /// address, without authentication.
    pub fn new<S: ToString>(server_address: S) -> Self {
        Self {
            server_address: server_address.to_string(),
            ..Self::default()
        }
    }

    /// Binds PLAIN authentication to the host of the server address.
    /// Replaces any strategy bound before.
    pub fn set_plain_auth<L: ToString, P: ToString>(&mut self, login: L, password: P) -> &mut Self {
        let auth = PlainAuth::new(login, password, self.host());
        self.set_auth(auth)
    }

    pub fn set_auth<A: Auth + 'static>(&mut self, auth: A) -> &mut Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn set_security(&mut self, security: Security) -> &mut Self {
        self.security = security;
        self
    }

    /// Accepts invalid certificates and host names.
    pub fn set_insecure(&mut self, insecure: bool) -> &mut Self {
        self.insecure = insecure;
        self
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Returns the host name: the first `:` separated segment of the
    /// server address, or the bracketed part of an IPv6 address like
    /// `[::1]:25`.
    pub fn host(&self) -> &str {
        let addr = self.server_address.as_str();

        if let Some(ipv6) = addr
            .strip_prefix('[')
            .and_then(|addr| addr.split_once(']'))
            .map(|(host, _)| host)
        {
            return ipv6;
        }

        addr.split(':').next().unwrap_or(addr)
    }

    pub fn port(&self) -> Result<u16> {
        let (_, port) = self
            .server_address
            .rsplit_once(':')
            .ok_or_else(|| Error::MissingServerPortError(self.server_address.clone()))?;
        port.parse()
            .map_err(|err| Error::ParseServerPortError(err, self.server_address.clone()))
    }

    pub fn auth(&self) -> Option<&dyn Auth> {
        self.auth.as_deref()
    }

    pub fn security(&self) -> Security {
        self.security
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }
}
