//! Property-based tests for sealed secrets and key encoding.
//!
//! Argon2id with 64 MiB of memory is slow, so the cipher properties run with
//! a small case count.

use nostr_vault_core::nostr::encryption::{decrypt_secret, encrypt_secret, encrypt_with_salt};
use nostr_vault_core::nostr::keys::{decode_bech32, encode_bech32, Bech32Prefix};
use nostr_vault_core::nostr::derive_public_key;
use proptest::prelude::*;

/// Strategy to generate secret key hex (nonzero, well under the curve order)
fn secret_hex_strategy() -> impl Strategy<Value = String> {
    prop::array::uniform32(any::<u8>())
        .prop_map(|mut bytes| {
            bytes[0] &= 0x7f;
            bytes[31] |= 1;
            hex::encode(bytes)
        })
}

/// Strategy to generate non-empty passwords
fn password_strategy() -> impl Strategy<Value = String> {
    "[ -~]{1,32}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    /// Property: Sealing then unsealing with the same password yields the plaintext
    #[test]
    fn seal_unseal_roundtrip(
        plaintext in prop::collection::vec(any::<u8>(), 0..128),
        password in password_strategy(),
    ) {
        let sealed = encrypt_secret(&plaintext, &password).expect("encryption should succeed");
        let opened = decrypt_secret(&sealed.ciphertext_b64, &password, &sealed.salt)
            .expect("decryption should succeed");
        prop_assert_eq!(&plaintext[..], &opened[..]);
    }

    /// Property: Any other password fails closed
    #[test]
    fn wrong_password_fails(
        plaintext in prop::collection::vec(any::<u8>(), 1..64),
        password in password_strategy(),
        other in password_strategy(),
    ) {
        prop_assume!(password != other);
        let sealed = encrypt_secret(&plaintext, &password).expect("encryption should succeed");
        prop_assert!(decrypt_secret(&sealed.ciphertext_b64, &other, &sealed.salt).is_err());
    }

    /// Property: Flipping any ciphertext bit is detected
    #[test]
    fn tampering_is_detected(
        plaintext in prop::collection::vec(any::<u8>(), 1..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        use base64::Engine;

        let salt = [7u8; 16];
        let blob = encrypt_with_salt(&plaintext, "pw", &salt).expect("encryption should succeed");
        let mut raw = base64::engine::general_purpose::STANDARD
            .decode(&blob)
            .expect("ciphertext should be base64");
        let index = position.index(raw.len());
        raw[index] ^= 1 << bit;
        let tampered = base64::engine::general_purpose::STANDARD.encode(raw);

        prop_assert!(decrypt_secret(&tampered, "pw", &salt).is_err());
    }
}

proptest! {
    /// Property: nsec encoding round trips for any valid secret, in either case
    #[test]
    fn nsec_roundtrip_case_insensitive(secret in secret_hex_strategy(), upper in any::<bool>()) {
        let nsec = encode_bech32(Bech32Prefix::Nsec, &secret).expect("should encode");
        prop_assert!(nsec.starts_with("nsec1"));
        let input = if upper { nsec.to_uppercase() } else { nsec };
        prop_assert_eq!(decode_bech32(Bech32Prefix::Nsec, &input).expect("should decode"), secret);
    }

    /// Property: npub of a derived public key round trips and never decodes as nsec
    #[test]
    fn npub_roundtrip_and_prefix_enforced(secret in secret_hex_strategy()) {
        let public = derive_public_key(&secret).expect("secret should be valid");
        let npub = encode_bech32(Bech32Prefix::Npub, &public).expect("should encode");
        prop_assert_eq!(decode_bech32(Bech32Prefix::Npub, &npub).expect("should decode"), public);
        prop_assert!(decode_bech32(Bech32Prefix::Nsec, &npub).is_err());
    }
}
