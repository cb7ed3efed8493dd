//! Wire payload: the carried rate as a fixed-width big-endian integer.
//!
//! The payload is exactly [`PAYLOAD_LEN`] bytes holding `rate` (scaled by
//! `PRECISION`) as an unsigned 256-bit big-endian word. There is no version
//! or sequence field. Rates are `u128` internally, so the upper 16 bytes of
//! a well-formed payload are always zero.

use crate::error::BridgeError;

pub const PAYLOAD_LEN: usize = 32;

const HIGH_LEN: usize = PAYLOAD_LEN - 16;

pub fn encode_rate(rate: u128) -> [u8; PAYLOAD_LEN] {
    let mut out = [0u8; PAYLOAD_LEN];
    out[HIGH_LEN..].copy_from_slice(&rate.to_be_bytes());
    out
}

pub fn decode_rate(bytes: &[u8]) -> Result<u128, BridgeError> {
    if bytes.len() != PAYLOAD_LEN {
        return Err(BridgeError::MalformedPayload(format!(
            "expected {PAYLOAD_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[..HIGH_LEN].iter().any(|b| *b != 0) {
        return Err(BridgeError::MalformedPayload(
            "rate exceeds 128 bits".to_string(),
        ));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[HIGH_LEN..]);
    Ok(u128::from_be_bytes(low))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rate_layout() {
        let encoded = encode_rate(50_000_000_000);
        assert!(encoded[..HIGH_LEN].iter().all(|b| *b == 0));
        assert_eq!(&encoded[27..], &[0x0b, 0xa4, 0x3b, 0x74, 0x00]);
        assert_eq!(decode_rate(&encoded).unwrap(), 50_000_000_000);
    }

    #[test]
    fn zero_rate_is_all_zero_bytes() {
        assert_eq!(encode_rate(0), [0u8; PAYLOAD_LEN]);
    }

    #[test]
    fn short_payload_is_malformed() {
        assert!(matches!(
            decode_rate(&[0u8; 31]),
            Err(BridgeError::MalformedPayload(_))
        ));
    }

    #[test]
    fn long_payload_is_malformed() {
        assert!(matches!(
            decode_rate(&[0u8; 33]),
            Err(BridgeError::MalformedPayload(_))
        ));
    }

    #[test]
    fn oversized_rate_is_malformed() {
        let mut bytes = [0u8; PAYLOAD_LEN];
        bytes[0] = 1;
        let err = decode_rate(&bytes).unwrap_err();
        assert_eq!(err.class(), tidal_types::ErrorClass::Validation);
    }
}
