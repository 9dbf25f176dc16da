//! Rust library to compose plain text emails with attachments and
//! send them over SMTP.
//!
//! ```no_run
//! use mailbox_lib::{send_message, Credentials, Message};
//!
//! let mut creds = Credentials::new("smtp.example.com:587");
//! creds.set_plain_auth("alice@example.com", "password");
//!
//! let mut msg = Message::new();
//! msg.from("Alice", "alice@example.com")
//!     .to("Bob", "bob@example.com")
//!     .subject("Report")
//!     .body("See attached.")
//!     .attach_expanded("~/report.pdf")
//!     .unwrap();
//!
//! send_message(Some(&creds), Some(&msg)).unwrap();
//! ```

pub(crate) mod process;

pub mod email;
pub use email::{Address, Attachment, Boundary, Message};

pub mod sender;
pub use sender::{
    envelope, send_message, send_message_with, Auth, Credentials, PlainAuth, Security, Sender,
    Smtp, SmtpConfig,
};
