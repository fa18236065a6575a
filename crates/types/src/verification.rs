use std::borrow::Cow;

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use thiserror::Error;

use crate::{Permit, PermitSignature};

/// Errors that can occur during signature handling
#[derive(Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("signature verification failed")]
    VerificationFailed,
}

/// EIP-712 domain separator for a token contract
pub fn domain_separator(
    name: &str,
    version: &str,
    chain_id: u64,
    verifying_contract: Address,
) -> B256 {
    Eip712Domain::new(
        Some(Cow::Owned(name.to_string())),
        Some(Cow::Owned(version.to_string())),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
    .separator()
}

/// Two-step typed-data digest: `keccak256(0x1901 || domainSeparator || hashStruct(permit))`
pub fn permit_digest(permit: &Permit, domain_separator: B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_slice());
    buf[34..].copy_from_slice(permit.eip712_hash_struct().as_slice());
    keccak256(buf)
}

/// Recover the address that produced `signature` over `digest`.
///
/// Rejects recovery bytes other than 27/28, zero or out-of-range scalars, and
/// high-s signatures.
pub fn recover_signer(digest: B256, signature: &PermitSignature) -> Result<Address, VerificationError> {
    let recovery_id = match signature.v {
        27 | 28 => RecoveryId::from_byte(signature.v - 27).ok_or_else(|| {
            VerificationError::InvalidSignature(format!("bad recovery byte {}", signature.v))
        })?,
        other => {
            return Err(VerificationError::InvalidSignature(format!(
                "recovery byte must be 27 or 28, got {other}"
            )))
        }
    };

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(signature.r.as_slice());
    compact[32..].copy_from_slice(signature.s.as_slice());

    let sig = Signature::from_slice(&compact)
        .map_err(|e| VerificationError::InvalidSignature(e.to_string()))?;

    if sig.normalize_s().is_some() {
        return Err(VerificationError::InvalidSignature(
            "s is in the upper half order".to_string(),
        ));
    }

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|_| VerificationError::VerificationFailed)?;

    Ok(address_from_key(&key))
}

/// Verify that `owner` signed a permit for `(spender, amount, nonce, deadline)`.
///
/// Pure: the caller supplies the nonce and domain separator. Any recovery
/// failure is reported as `false`.
pub fn verify_authorization(
    owner: Address,
    spender: Address,
    amount: U256,
    deadline: u64,
    nonce: U256,
    domain_separator: B256,
    signature: &PermitSignature,
) -> bool {
    let permit = Permit {
        owner,
        spender,
        value: amount,
        nonce,
        deadline: U256::from(deadline),
    };

    match recover_signer(permit_digest(&permit, domain_separator), signature) {
        Ok(signer) => signer == owner,
        Err(_) => false,
    }
}

/// Sign a permit with a raw 32-byte private key
///
/// This is a helper for off-chain clients and tests.
pub fn sign_permit(
    permit: &Permit,
    domain_separator: B256,
    private_key: &[u8],
) -> Result<PermitSignature, VerificationError> {
    let signing_key = signing_key(private_key)?;
    let digest = permit_digest(permit, domain_separator);

    let (sig, recovery_id) = signing_key
        .sign_prehash_recoverable(digest.as_slice())
        .map_err(|e| VerificationError::InvalidSignature(e.to_string()))?;

    let bytes = sig.to_bytes();
    Ok(PermitSignature {
        v: recovery_id.to_byte() + 27,
        r: B256::from_slice(&bytes[..32]),
        s: B256::from_slice(&bytes[32..]),
    })
}

/// Derive the ledger address controlled by a private key
pub fn address_of(private_key: &[u8]) -> Result<Address, VerificationError> {
    let signing_key = signing_key(private_key)?;
    Ok(address_from_key(signing_key.verifying_key()))
}

fn signing_key(private_key: &[u8]) -> Result<SigningKey, VerificationError> {
    if private_key.len() != 32 {
        return Err(VerificationError::EncodingError(format!(
            "private key must be 32 bytes, got {}",
            private_key.len()
        )));
    }

    SigningKey::from_slice(private_key).map_err(|e| VerificationError::EncodingError(e.to_string()))
}

fn address_from_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
