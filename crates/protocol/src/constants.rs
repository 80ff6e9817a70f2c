//! Protocol constants: header names, packet types, and fixed identifiers.
//!
//! Header names are stored lowercase as the `http` crate requires; the
//! canonical wire casing (`BITS-Packet-Type`, ...) is equivalent since
//! HTTP header names are case-insensitive.

use std::fmt;
use std::str::FromStr;

use http::HeaderName;

use crate::ProtocolError;

/// The HTTP method every protocol request must use.
pub const BITS_METHOD: &str = "BITS_POST";

/// Fixed upload-protocol identifier, echoed on `Create-Session`.
pub const PROTOCOL_GUID: &str = "{7df0354d-249b-430f-820d-3d2a9bef4931}";

/// Acknowledgement marker carried in the `BITS-Packet-Type` response header.
pub const ACK: &str = "Ack";

/// The only content encoding the server accepts, advertised on `Create-Session`.
pub const IDENTITY_ENCODING: &str = "Identity";

/// `BITS-Packet-Type`: selects the transition on requests, carries `Ack` on responses.
pub const HEADER_PACKET_TYPE: HeaderName = HeaderName::from_static("bits-packet-type");

/// `BITS-Session-Id`: the session identifier, required on session-scoped packets.
pub const HEADER_SESSION_ID: HeaderName = HeaderName::from_static("bits-session-id");

/// `BITS-Protocol`: fixed protocol GUID, emitted only on `Create-Session` acks.
pub const HEADER_PROTOCOL: HeaderName = HeaderName::from_static("bits-protocol");

/// `BITS-Received-Content-Range`: next expected start offset, on fragment acks.
pub const HEADER_RECEIVED_CONTENT_RANGE: HeaderName =
    HeaderName::from_static("bits-received-content-range");

/// `Content-Range`: `bytes start-end/total`, required on fragments.
pub const HEADER_CONTENT_RANGE: HeaderName = HeaderName::from_static("content-range");

/// `Content-Name`: optional per-session name hint carried on fragments.
pub const HEADER_CONTENT_NAME: HeaderName = HeaderName::from_static("content-name");

/// `Content-Encoding`: optional per-session encoding hint carried on fragments.
pub const HEADER_CONTENT_ENCODING: HeaderName = HeaderName::from_static("content-encoding");

/// `Accept-Encoding`: fixed `Identity`, emitted only on `Create-Session` acks.
pub const HEADER_ACCEPT_ENCODING: HeaderName = HeaderName::from_static("accept-encoding");

/// The five recognized packet types.
///
/// Anything else is an explicit protocol error; there is no silent
/// fallthrough for unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Ping,
    CreateSession,
    Fragment,
    CloseSession,
    CancelSession,
}

impl PacketType {
    /// Canonical wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketType::Ping => "Ping",
            PacketType::CreateSession => "Create-Session",
            PacketType::Fragment => "Fragment",
            PacketType::CloseSession => "Close-Session",
            PacketType::CancelSession => "Cancel-Session",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PacketType {
    type Err = ProtocolError;

    /// Matches case-insensitively, as clients send mixed casings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ping" => Ok(PacketType::Ping),
            "create-session" => Ok(PacketType::CreateSession),
            "fragment" => Ok(PacketType::Fragment),
            "close-session" => Ok(PacketType::CloseSession),
            "cancel-session" => Ok(PacketType::CancelSession),
            _ => Err(ProtocolError::UnknownPacketType(s.to_string())),
        }
    }
}
