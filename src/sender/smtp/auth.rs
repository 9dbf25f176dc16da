//! SMTP authentication module.
//!
//! This module contains the authentication strategies a
//! [`Credentials`](crate::Credentials) can be bound to.

use lettre::transport::smtp::authentication::{Credentials as SmtpCredentials, Mechanism};
use std::fmt;

/// Hosts PLAIN authentication may talk to without TLS.
const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// Represents a way to authenticate against a SMTP server.
///
/// A strategy is scoped to the host it was created for: the sender
/// refuses to use it against any other host.
pub trait Auth: fmt::Debug + Send + Sync {
    /// Host the strategy is bound to.
    fn host(&self) -> &str;

    /// Mechanisms offered to the server, by order of preference.
    fn mechanisms(&self) -> Vec<Mechanism>;

    fn credentials(&self) -> SmtpCredentials;

    /// Whether the secret may only be sent over an encrypted session.
    fn requires_tls(&self) -> bool {
        true
    }
}

/// Represents the PLAIN authentication mechanism (RFC 4616).
#[derive(Clone, Eq, PartialEq)]
pub struct PlainAuth {
    login: String,
    password: String,
    host: String,
}

impl PlainAuth {
    pub fn new<L: ToString, P: ToString, H: ToString>(login: L, password: P, host: H) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            host: host.to_string(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }
}

impl fmt::Debug for PlainAuth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PlainAuth")
            .field("login", &self.login)
            .field("password", &"<hidden>")
            .field("host", &self.host)
            .finish()
    }
}

impl Auth for PlainAuth {
    fn host(&self) -> &str {
        &self.host
    }

    fn mechanisms(&self) -> Vec<Mechanism> {
        vec![Mechanism::Plain]
    }

    fn credentials(&self) -> SmtpCredentials {
        SmtpCredentials::new(self.login.to_owned(), self.password.to_owned())
    }

    fn requires_tls(&self) -> bool {
        !LOCAL_HOSTS.contains(&self.host.as_str())
    }
}
