pub mod sender;
pub use sender::{envelope, send_message, send_message_with, Error, Result, Sender};

pub mod smtp;
pub use smtp::{Auth, Credentials, PlainAuth, Security, Smtp, SmtpConfig};
