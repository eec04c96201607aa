//! Property tests for the symmetric cipher helpers.

use pkgutil_security::{aes_cbc, aes_cfb, aes_ecb, des, padding};
use proptest::prelude::*;

fn aes_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![Just(16usize), Just(24), Just(32)]
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

proptest! {
    // ========================================================================
    // Round trips
    // ========================================================================

    #[test]
    fn cbc_round_trip(key in aes_key(), data in prop::collection::vec(any::<u8>(), 0..256)) {
        let ct = aes_cbc::encrypt(&data, &key).unwrap();
        prop_assert_eq!(aes_cbc::decrypt(&ct, &key).unwrap(), data);
    }

    #[test]
    fn cfb_round_trip(key in aes_key(), data in prop::collection::vec(any::<u8>(), 0..256)) {
        let ct = aes_cfb::encrypt(&data, &key).unwrap();
        prop_assert_eq!(hex::decode(&ct).unwrap().len(), 16 + data.len());
        prop_assert_eq!(aes_cfb::decrypt(&ct, &key).unwrap(), data);
    }

    #[test]
    fn ecb_round_trip(
        key in prop::collection::vec(any::<u8>(), 1..48),
        data in prop::collection::vec(any::<u8>(), 1..256),
    ) {
        let ct = aes_ecb::encrypt_ecb(&data, &key).unwrap();
        prop_assert_eq!(aes_ecb::decrypt_ecb(&ct, &key).unwrap(), data);
    }

    #[test]
    fn des_round_trip(key in any::<[u8; 8]>(), data in prop::collection::vec(any::<u8>(), 0..128)) {
        let ct = des::encrypt(&data, &key).unwrap();
        prop_assert_eq!(ct.len() % 8, 0);
        prop_assert_eq!(des::decrypt(&ct, &key).unwrap(), data);
    }

    // ========================================================================
    // Framing and determinism
    // ========================================================================

    #[test]
    fn cbc_uses_fresh_iv(key in aes_key(), data in prop::collection::vec(any::<u8>(), 0..64)) {
        let a = aes_cbc::encrypt(&data, &key).unwrap();
        let b = aes_cbc::encrypt(&data, &key).unwrap();
        prop_assert_ne!(a, b);
    }

    #[test]
    fn ecb_is_deterministic_uppercase_hex(
        key in prop::collection::vec(any::<u8>(), 1..48),
        data in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let a = aes_ecb::encrypt_ecb(&data, &key).unwrap();
        prop_assert_eq!(&a, &aes_ecb::encrypt_ecb(&data, &key).unwrap());
        prop_assert!(a.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        prop_assert_eq!(a.len() / 2, (data.len() + 16) / 16 * 16);
    }

    #[test]
    fn ecb_keys_with_same_fold_are_equivalent(
        key in prop::collection::vec(any::<u8>(), 16..17),
        data in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        // XOR-ing a zero block onto the key leaves the fold unchanged
        let mut longer = key.clone();
        longer.extend_from_slice(&[0u8; 16]);
        prop_assert_eq!(
            aes_ecb::encrypt_ecb(&data, &key).unwrap(),
            aes_ecb::encrypt_ecb(&data, &longer).unwrap()
        );
    }

    #[test]
    fn pkcs7_pad_unpad(data in prop::collection::vec(any::<u8>(), 0..100), block in 1usize..=32) {
        let padded = padding::pkcs7_pad(&data, block).unwrap();
        prop_assert_eq!(padded.len() % block, 0);
        prop_assert!(padded.len() > data.len());
        prop_assert_eq!(padding::pkcs7_unpad(&padded).unwrap(), &data[..]);
    }

    #[test]
    fn short_ciphertext_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        let key = [7u8; 16];
        let b64 = pkgutil_security::base64_encode(&bytes);
        prop_assert!(aes_cbc::decrypt(&b64, &key).is_err());
        prop_assert!(aes_cfb::decrypt(&hex::encode(&bytes), &key).is_err());
    }
}
