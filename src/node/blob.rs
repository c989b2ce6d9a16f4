//! Base64 lexical forms for binary literals

use crate::error::{TrellisError, TrellisResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Line length used when wrapping encoded output
pub const LINE_LEN: usize = 76;

/// Encode bytes with the standard alphabet, optionally wrapping lines
pub(crate) fn encode(bytes: &[u8], wrap_lines: bool) -> String {
    let encoded = STANDARD.encode(bytes);
    if !wrap_lines || encoded.len() <= LINE_LEN {
        return encoded;
    }

    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / LINE_LEN);
    for (i, chunk) in encoded.as_bytes().chunks(LINE_LEN).enumerate() {
        if i > 0 {
            wrapped.push('\n');
        }
        // Base64 output is pure ASCII, so chunk boundaries are char boundaries
        wrapped.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }
    wrapped
}

/// Decode a Base64 lexical form, ignoring embedded whitespace
pub(crate) fn decode(lexical: &str) -> TrellisResult<Vec<u8>> {
    let compact: String = lexical.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| TrellisError::Invalid(format!("bad base64: {}", e)))
}
