//! Email module.
//!
//! This module contains everything related to the composition of
//! messages: addresses, the message builder and the MIME encoder.

mod addr;
pub use addr::Address;

mod message;
pub use message::{Attachment, Error, Message, Result};

pub mod mime;
pub use mime::Boundary;
