//! Lock-token codec.
//!
//! The settlement lock token is a 16-byte identifier the host renders and
//! parses as a canonical, mixed-endian UUID string, exactly the layout the
//! `uuid` crate's `from_bytes_le`/`to_bytes_le` already implement, so the
//! codec is a thin wrapper rather than hand-rolled hex formatting.

use uuid::Uuid;

/// The literal byte sequence `x-opt-lock-token`, used by the binding
/// decoder to locate the start of the AMQP-encoded tail of the payload.
/// This is a content marker only, never itself a token value.
pub const LOCK_TOKEN_MARKER: &[u8] = b"x-opt-lock-token";

/// Renders a 16-byte lock token as the canonical
/// `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` string: the first three groups
/// little-endian, the last two big-endian.
pub fn render(bytes: [u8; 16]) -> String {
    Uuid::from_bytes_le(bytes).to_string()
}

/// Parses a canonical lock-token string back into its 16 raw bytes.
pub fn parse(token: &str) -> Result<[u8; 16], uuid::Error> {
    Ok(Uuid::parse_str(token)?.to_bytes_le())
}

/// Takes up to 16 leading bytes of `buffer` (bounded by both `length_hint`
/// and the buffer's actual length) and renders them as a lock token.
///
/// Short input yields a malformed string; callers must guarantee at least
/// 16 bytes are available before treating the output as authoritative.
pub fn extract(buffer: &[u8], length_hint: usize) -> String {
    let take = length_hint.min(16).min(buffer.len());
    let mut bytes = [0u8; 16];
    bytes[..take].copy_from_slice(&buffer[..take]);
    render(bytes)
}
