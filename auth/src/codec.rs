use base64::engine::general_purpose::URL_SAFE;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

/// Error type for base64url decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid base64url input: {0}")]
    DecodeError(String),
}

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url input, with or without trailing padding.
///
/// The input is re-padded to a multiple of four characters before decoding.
/// Non-canonical trailing bits are rejected, so each byte string has exactly
/// one accepted encoding.
///
/// # Errors
/// * `DecodeError` - Input contains characters outside the base64url alphabet
///   or has an impossible length
pub fn decode(input: &str) -> Result<Vec<u8>, CodecError> {
    let padding = (4 - input.len() % 4) % 4;
    let mut padded = String::with_capacity(input.len() + padding);
    padded.push_str(input);
    padded.extend(std::iter::repeat('=').take(padding));

    URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| CodecError::DecodeError(e.to_string()))
}
