//! Data exchanged between the page runtime and the host application.
//!
//! - [`config`]: the persisted [`Configuration`] and its codec.
//! - [`flags`]: the one-time startup payload handed to the host application.
//! - [`message`]: the port messages, in both directions.
//!
//! Everything here is plain serde data. Browser types live in `pageglue`.

pub mod config;
pub mod flags;
pub mod message;

pub use config::{CodecError, ConfigCodec, Configuration, Theme};
pub use flags::{FlagsProfile, ResolvedTheme};
pub use message::{InboundMessage, OutboundMessage};
