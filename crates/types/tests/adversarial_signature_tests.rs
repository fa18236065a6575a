/// Adversarial tests for authorization signatures
///
/// These tests simulate attacks where things could go horribly wrong:
/// - Field tampering after signing
/// - Signature malleability exploits
/// - Cross-token and cross-spender replay
/// - Malformed recovery data
use gasless_swap_types::{
    address_of, domain_separator, permit_digest, recover_signer, sign_permit,
    verify_authorization, Address, Authorization, Permit, PermitSignature, B256, U256,
};

const OWNER_KEY: [u8; 32] = [0x42; 32];
const DEADLINE: u64 = 1_700_000_000;

/// secp256k1 group order
const SECP256K1_N: &str = "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

fn token() -> Address {
    Address::repeat_byte(0x70)
}

fn engine() -> Address {
    Address::repeat_byte(0xe9)
}

fn separator() -> B256 {
    domain_separator("Wrapped Test", "1", 1, token())
}

fn signed_authorization() -> Authorization {
    let owner = address_of(&OWNER_KEY).unwrap();
    let permit = Permit {
        owner,
        spender: engine(),
        value: U256::from(5_000_000u64),
        nonce: U256::from(7u64),
        deadline: U256::from(DEADLINE),
    };
    let signature = sign_permit(&permit, separator(), &OWNER_KEY).unwrap();

    Authorization {
        owner,
        spender: engine(),
        amount: permit.value,
        deadline: DEADLINE,
        nonce: permit.nonce,
        signature,
    }
}

fn flip_bit(address: Address) -> Address {
    let mut bytes = address.0 .0;
    bytes[19] ^= 0x01;
    Address::from(bytes)
}

fn verify(auth: &Authorization, separator: B256) -> bool {
    verify_authorization(
        auth.owner,
        auth.spender,
        auth.amount,
        auth.deadline,
        auth.nonce,
        separator,
        &auth.signature,
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// FIELD TAMPERING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_untampered_authorization_verifies() {
    let auth = signed_authorization();
    assert!(verify(&auth, separator()));
    assert!(auth.verify(separator()));
}

#[test]
fn test_owner_bit_flip_fails() {
    let mut auth = signed_authorization();
    auth.owner = flip_bit(auth.owner);
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_amount_bit_flip_fails() {
    let mut auth = signed_authorization();
    auth.amount ^= U256::from(1u64);
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_nonce_bit_flip_fails() {
    let mut auth = signed_authorization();
    auth.nonce ^= U256::from(1u64);
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_deadline_bit_flip_fails() {
    let mut auth = signed_authorization();
    auth.deadline ^= 1;
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_domain_separator_bit_flip_fails() {
    let auth = signed_authorization();
    let mut tampered = separator();
    tampered.0[31] ^= 0x01;
    assert!(!verify(&auth, tampered));
}

#[test]
fn test_every_amount_bit_matters() {
    let auth = signed_authorization();
    for bit in [0usize, 1, 7, 63, 128, 255] {
        let mut tampered = auth.clone();
        tampered.amount ^= U256::from(1u64) << bit;
        assert!(!verify(&tampered, separator()), "bit {bit} was not covered");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REPLAY TESTS
// ═══════════════════════════════════════════════════════════════════════════

/// A signature for one token must not authorize the same amount on another
#[test]
fn test_cross_token_replay_fails() {
    let auth = signed_authorization();
    let other_token = domain_separator("Wrapped Test", "1", 1, Address::repeat_byte(0x71));
    assert!(!verify(&auth, other_token));
}

#[test]
fn test_cross_chain_replay_fails() {
    let auth = signed_authorization();
    let other_chain = domain_separator("Wrapped Test", "1", 10, token());
    assert!(!verify(&auth, other_chain));
}

#[test]
fn test_other_spender_cannot_reuse_signature() {
    let mut auth = signed_authorization();
    auth.spender = Address::repeat_byte(0x66);
    assert!(!verify(&auth, separator()));
}

// ═══════════════════════════════════════════════════════════════════════════
// SIGNATURE MALLEABILITY TESTS
// ═══════════════════════════════════════════════════════════════════════════

/// The mirrored (high-s) form of a valid signature recovers the same key on
/// curve math alone; it must still be refused.
#[test]
fn test_high_s_mirror_rejected() {
    let auth = signed_authorization();
    let n: U256 = SECP256K1_N.parse().unwrap();
    let s = U256::from_be_bytes(auth.signature.s.0);

    let mirrored = PermitSignature {
        v: if auth.signature.v == 27 { 28 } else { 27 },
        r: auth.signature.r,
        s: B256::from((n - s).to_be_bytes::<32>()),
    };

    let mut tampered = auth.clone();
    tampered.signature = mirrored;
    assert!(!verify(&tampered, separator()));
}

#[test]
fn test_recovery_byte_variants_rejected() {
    let auth = signed_authorization();
    for v in [0u8, 1, 2, 26, 29, 35, 255] {
        let mut tampered = auth.clone();
        tampered.signature.v = v;
        assert!(!verify(&tampered, separator()), "v = {v} accepted");
    }
}

#[test]
fn test_flipped_recovery_byte_recovers_someone_else() {
    let auth = signed_authorization();
    let mut flipped = auth.signature;
    flipped.v = if flipped.v == 27 { 28 } else { 27 };

    let digest = permit_digest(&auth.permit(), separator());
    if let Ok(signer) = recover_signer(digest, &flipped) {
        assert_ne!(signer, auth.owner);
    }
}

#[test]
fn test_r_out_of_range_rejected() {
    let mut auth = signed_authorization();
    auth.signature.r = B256::repeat_byte(0xff);
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_zero_s_rejected() {
    let mut auth = signed_authorization();
    auth.signature.s = B256::ZERO;
    assert!(!verify(&auth, separator()));
}

#[test]
fn test_signature_bit_flip_invalidates() {
    let auth = signed_authorization();
    let mut bytes = auth.signature.to_bytes();
    bytes[5] ^= 0x01;

    let mut tampered = auth.clone();
    tampered.signature = PermitSignature::from_bytes(&bytes).unwrap();
    assert!(!verify(&tampered, separator()));
}
