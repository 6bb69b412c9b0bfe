//! Conversion between the facade's base64 payloads and raw bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fsgate_domain::Error;

pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(payload: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidArgument(format!("Invalid base64 payload: {e}")))
}
