//! Wire vocabulary for the BITS upload protocol.
//!
//! Header names, packet types, session identifiers, and content-range
//! parsing shared by the store, transfer, and server crates.
//!
//! Reference: the BITS upload protocol
//! (<https://docs.microsoft.com/en-us/windows/win32/bits/bits-upload-protocol>).

mod constants;
mod range;
mod session;

pub use constants::{
    ACK, BITS_METHOD, HEADER_ACCEPT_ENCODING, HEADER_CONTENT_ENCODING, HEADER_CONTENT_NAME,
    HEADER_CONTENT_RANGE, HEADER_PACKET_TYPE, HEADER_PROTOCOL, HEADER_RECEIVED_CONTENT_RANGE,
    HEADER_SESSION_ID, IDENTITY_ENCODING, PROTOCOL_GUID, PacketType,
};
pub use range::FragmentRange;
pub use session::SessionId;

/// Errors produced when parsing protocol elements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid BITS-Session-Id: {0}")]
    InvalidSessionId(String),

    #[error("invalid Content-Range: {0}")]
    InvalidRange(String),

    #[error("unrecognized BITS-Packet-Type: {0}")]
    UnknownPacketType(String),
}
