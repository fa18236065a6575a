/// Security tests for the typed-data digest
///
/// Every signed field must feed the digest, and the digest must follow the
/// two-step `0x1901 || domainSeparator || structHash` layout.
use gasless_swap_types::{domain_separator, permit_digest, Address, Permit, B256, U256};

fn baseline() -> Permit {
    Permit {
        owner: Address::repeat_byte(0x01),
        spender: Address::repeat_byte(0x02),
        value: U256::from(1_000u64),
        nonce: U256::ZERO,
        deadline: U256::from(1_700_000_000u64),
    }
}

fn separator() -> B256 {
    domain_separator("Token", "1", 1, Address::repeat_byte(0x70))
}

#[test]
fn test_digest_is_deterministic() {
    assert_eq!(
        permit_digest(&baseline(), separator()),
        permit_digest(&baseline(), separator())
    );
}

#[test]
fn test_changing_owner_changes_digest() {
    let mut changed = baseline();
    changed.owner = Address::repeat_byte(0x03);
    assert_ne!(permit_digest(&baseline(), separator()), permit_digest(&changed, separator()));
}

#[test]
fn test_changing_spender_changes_digest() {
    let mut changed = baseline();
    changed.spender = Address::repeat_byte(0x03);
    assert_ne!(permit_digest(&baseline(), separator()), permit_digest(&changed, separator()));
}

#[test]
fn test_changing_value_changes_digest() {
    let mut changed = baseline();
    changed.value = U256::from(1_001u64);
    assert_ne!(permit_digest(&baseline(), separator()), permit_digest(&changed, separator()));
}

#[test]
fn test_changing_nonce_changes_digest() {
    let mut changed = baseline();
    changed.nonce = U256::from(1u64);
    assert_ne!(permit_digest(&baseline(), separator()), permit_digest(&changed, separator()));
}

#[test]
fn test_changing_deadline_changes_digest() {
    let mut changed = baseline();
    changed.deadline = U256::from(1_700_000_001u64);
    assert_ne!(permit_digest(&baseline(), separator()), permit_digest(&changed, separator()));
}

#[test]
fn test_domain_fields_change_separator() {
    let base = separator();
    assert_ne!(base, domain_separator("Token2", "1", 1, Address::repeat_byte(0x70)));
    assert_ne!(base, domain_separator("Token", "2", 1, Address::repeat_byte(0x70)));
    assert_ne!(base, domain_separator("Token", "1", 5, Address::repeat_byte(0x70)));
    assert_ne!(base, domain_separator("Token", "1", 1, Address::repeat_byte(0x71)));
}

/// Swapping the order of nonce and deadline must not collide
#[test]
fn test_field_order_is_bound() {
    let mut a = baseline();
    a.nonce = U256::from(5u64);
    a.deadline = U256::from(9u64);

    let mut b = baseline();
    b.nonce = U256::from(9u64);
    b.deadline = U256::from(5u64);

    assert_ne!(permit_digest(&a, separator()), permit_digest(&b, separator()));
}
