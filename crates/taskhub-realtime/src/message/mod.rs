//! Wire format for realtime frames.

pub mod envelope;
pub mod types;

pub use envelope::Envelope;
pub use types::{
    Connected, ErrorPayload, InboundError, InboundMessage, Pong, TypingUpdate, UserStatusUpdate,
};
