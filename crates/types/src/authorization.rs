use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

use crate::verification::VerificationError;

sol! {
    /// Typed-data message an owner signs to let a spender move `value` of a token.
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}

/// Compact secp256k1 signature in `(v, r, s)` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitSignature {
    /// Recovery byte, 27 or 28
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl PermitSignature {
    pub const LEN: usize = 65;

    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// Parse the 65-byte `r || s || v` encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerificationError> {
        if bytes.len() != Self::LEN {
            return Err(VerificationError::EncodingError(format!(
                "signature must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }

        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// Encode as `r || s || v`
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    pub fn from_hex(value: &str) -> Result<Self, VerificationError> {
        let raw = value.strip_prefix("0x").unwrap_or(value);
        let bytes = hex::decode(raw).map_err(|e| VerificationError::EncodingError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

/// A single-use, time-bounded grant from `owner` to `spender`.
///
/// The nonce is owned by the token; the engine reads it, it never advances it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
    pub deadline: u64,
    pub nonce: U256,
    pub signature: PermitSignature,
}

impl Authorization {
    /// The typed-data message this authorization was signed over
    pub fn permit(&self) -> Permit {
        Permit {
            owner: self.owner,
            spender: self.spender,
            value: self.amount,
            nonce: self.nonce,
            deadline: U256::from(self.deadline),
        }
    }

    /// Deadlines are inclusive: `now == deadline` is still valid
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.deadline
    }

    /// Check the signature against a token's domain separator
    pub fn verify(&self, domain_separator: B256) -> bool {
        crate::verification::verify_authorization(
            self.owner,
            self.spender,
            self.amount,
            self.deadline,
            self.nonce,
            domain_separator,
            &self.signature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_bytes_layout() {
        let sig = PermitSignature::new(28, B256::repeat_byte(0x11), B256::repeat_byte(0x22));
        let bytes = sig.to_bytes();

        assert_eq!(bytes[0], 0x11);
        assert_eq!(bytes[32], 0x22);
        assert_eq!(bytes[64], 28);
        assert_eq!(PermitSignature::from_bytes(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_signature_hex_accepts_prefix() {
        let sig = PermitSignature::new(27, B256::repeat_byte(0xab), B256::repeat_byte(0xcd));
        let encoded = sig.to_hex();

        assert!(encoded.starts_with("0x"));
        assert_eq!(PermitSignature::from_hex(&encoded).unwrap(), sig);
        assert_eq!(PermitSignature::from_hex(&encoded[2..]).unwrap(), sig);
    }

    #[test]
    fn test_signature_wrong_length_rejected() {
        let result = PermitSignature::from_bytes(&[0u8; 64]);
        assert!(matches!(result, Err(VerificationError::EncodingError(_))));
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let auth = Authorization {
            owner: Address::repeat_byte(1),
            spender: Address::repeat_byte(2),
            amount: U256::from(10u64),
            deadline: 1_000,
            nonce: U256::ZERO,
            signature: PermitSignature::new(27, B256::ZERO, B256::ZERO),
        };

        assert!(!auth.is_expired(999));
        assert!(!auth.is_expired(1_000));
        assert!(auth.is_expired(1_001));
    }
}
