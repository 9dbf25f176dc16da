pub mod auth;
pub use auth::{Auth, PlainAuth};

pub mod config;
pub use config::SmtpConfig;

pub mod credentials;
pub use credentials::{Credentials, Security};

pub mod smtp;
pub use smtp::{Error, Result, Smtp};
