// service/wallet_verification.rs
use crate::{
    crypto::{
        eip191_hash, recovery::recover_public_key, EthereumAddress, RecoverableSignature,
    },
    error::VerifyError,
};

/// Checks that an Ethereum wallet produced a `personal_sign` signature.
///
/// Stateless; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletSignatureVerifier;

impl WalletSignatureVerifier {
    /// `0x` followed by 40 hex digits, either case.
    pub fn is_valid_ethereum_address(address: &str) -> bool {
        address.parse::<EthereumAddress>().is_ok()
    }

    /// Returns true only when `signature` over `message` recovers to
    /// `address`. Never panics and never says why it failed.
    pub fn verify(address: &str, message: &str, signature: &str) -> bool {
        match Self::verify_detailed(address, message, signature) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Wallet signature rejected: {}", e);
                false
            }
        }
    }

    /// Like [`verify`](Self::verify) but keeps the failure reason. Meant for
    /// logging; do not forward the error to end users.
    pub fn verify_detailed(
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<EthereumAddress, VerifyError> {
        let claimed: EthereumAddress = address.parse()?;
        let recovered = Self::recover_address(message, signature)?;

        if recovered != claimed {
            return Err(VerifyError::AddressMismatch {
                recovered: recovered.to_hex(),
                claimed: claimed.to_hex(),
            });
        }
        Ok(recovered)
    }

    /// Address of whoever signed `message`, without comparing it to anything.
    pub fn recover_address(message: &str, signature: &str) -> Result<EthereumAddress, VerifyError> {
        let signature: RecoverableSignature = signature.parse()?;
        let message_hash = eip191_hash(message.as_bytes());
        let public_key = recover_public_key(&signature, &message_hash)?;
        Ok(EthereumAddress::from_public_key(&public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::{decompress, CurvePoint, CURVE_N};
    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    use k256::ecdsa::{Signature as K256Signature, SigningKey, VerifyingKey};
    use num_bigint::BigUint;

    const WEB3_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";
    const WEB3_SIGNATURE: &str = "0xb91467e570a6466aa9e9876cbcd013baba02900b8979d43fe208a4a4f339f5fd6007e74cd82e037b800186422fc2da167c747ef045e5d18a5f5d4300f8e1a0291c";

    struct TestWallet {
        key: SigningKey,
        address: String,
    }

    impl TestWallet {
        fn from_seed(seed: &str) -> Self {
            let secret = crate::crypto::keccak::keccak256(seed.as_bytes());
            let key = SigningKey::from_slice(&secret).unwrap();
            let point = key.verifying_key().to_encoded_point(false);
            let hash = crate::crypto::keccak::keccak256(&point.as_bytes()[1..]);
            let address = format!("0x{}", hex::encode(&hash[12..]));
            TestWallet { key, address }
        }

        /// personal_sign: r ‖ s ‖ (27 + recovery id)
        fn personal_sign(&self, message: &str) -> String {
            let hash = eip191_hash(message.as_bytes());
            let (sig, recid) = self.key.sign_prehash_recoverable(&hash).unwrap();
            let mut bytes = sig.to_bytes().to_vec();
            bytes.push(27 + recid.to_byte());
            format!("0x{}", hex::encode(bytes))
        }
    }

    fn flip_hex_char(s: &str, index: usize) -> String {
        let mut chars: Vec<char> = s.chars().collect();
        chars[index] = if chars[index] == '0' { '1' } else { '0' };
        chars.into_iter().collect()
    }

    fn with_v(signature: &str, v: u8) -> String {
        format!("{}{:02x}", &signature[..signature.len() - 2], v)
    }

    #[test]
    fn test_known_vector() {
        assert!(WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", WEB3_SIGNATURE));
        assert_eq!(
            WalletSignatureVerifier::recover_address("Some data", WEB3_SIGNATURE)
                .unwrap()
                .to_hex(),
            WEB3_ADDRESS.to_lowercase()
        );
    }

    #[test]
    fn test_round_trip_login_nonce() {
        let wallet = TestWallet::from_seed("admin wallet");
        let other = TestWallet::from_seed("someone else");
        let sig = wallet.personal_sign("login-nonce-12345");

        assert!(WalletSignatureVerifier::verify(&wallet.address, "login-nonce-12345", &sig));
        assert!(!WalletSignatureVerifier::verify(&wallet.address, "login-nonce-12346", &sig));
        assert!(!WalletSignatureVerifier::verify(&other.address, "login-nonce-12345", &sig));
    }

    #[test]
    fn test_many_wallets_verify() {
        for i in 0..8 {
            let wallet = TestWallet::from_seed(&format!("wallet-{}", i));
            let message = format!("nonce {}", i);
            let sig = wallet.personal_sign(&message);
            assert!(WalletSignatureVerifier::verify(&wallet.address, &message, &sig), "wallet {}", i);
        }
    }

    #[test]
    fn test_address_comparison_is_case_insensitive() {
        let wallet = TestWallet::from_seed("case");
        let sig = wallet.personal_sign("hello");
        let upper = format!("0x{}", wallet.address[2..].to_uppercase());
        assert!(WalletSignatureVerifier::verify(&upper, "hello", &sig));
    }

    #[test]
    fn test_tampering_with_r_s_or_address_fails() {
        let wallet = TestWallet::from_seed("tamper");
        let sig = wallet.personal_sign("login-nonce-12345");

        // r starts after "0x", s 64 characters later
        for index in [2, 40, 65, 66, 100, 129] {
            let tampered = flip_hex_char(&sig, index);
            assert!(
                !WalletSignatureVerifier::verify(&wallet.address, "login-nonce-12345", &tampered),
                "flipped signature index {}",
                index
            );
        }
        for index in [2, 20, 41] {
            let tampered = flip_hex_char(&wallet.address, index);
            assert!(
                !WalletSignatureVerifier::verify(&tampered, "login-nonce-12345", &sig),
                "flipped address index {}",
                index
            );
        }
    }

    #[test]
    fn test_v_normalisation_is_equivalent() {
        let raw_v = u8::from_str_radix(&WEB3_SIGNATURE[130..], 16).unwrap();
        assert_eq!(raw_v, 28);
        let as_one = with_v(WEB3_SIGNATURE, 1);
        assert_eq!(
            WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", WEB3_SIGNATURE),
            WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", &as_one)
        );
        assert!(WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", &as_one));

        let wallet = TestWallet::from_seed("v-normalisation");
        for i in 0..4 {
            let message = format!("message {}", i);
            let sig = wallet.personal_sign(&message);
            let v = u8::from_str_radix(&sig[130..], 16).unwrap();
            let raw = with_v(&sig, v - 27);
            assert!(WalletSignatureVerifier::verify(&wallet.address, &message, &sig));
            assert!(WalletSignatureVerifier::verify(&wallet.address, &message, &raw));
        }
    }

    #[test]
    fn test_unknown_v_rejected() {
        for v in [4u8, 26, 31, 37, 38] {
            assert!(!WalletSignatureVerifier::verify(
                WEB3_ADDRESS,
                "Some data",
                &with_v(WEB3_SIGNATURE, v)
            ));
        }
    }

    #[test]
    fn test_malformed_inputs_return_false() {
        let body = &WEB3_SIGNATURE[2..];
        let zeros = "0".repeat(130);
        let fs = "f".repeat(130);
        let odd = "a".repeat(129);
        let short = &body[..129];
        let long = format!("{}0", body);
        let non_hex = format!("{}zz", &body[..128]);
        let signatures = [
            "",
            "0x",
            zeros.as_str(),
            fs.as_str(),
            odd.as_str(),
            short,
            long.as_str(),
            non_hex.as_str(),
            "ü".repeat(65).as_str(),
        ]
        .map(str::to_string);

        for sig in signatures.iter() {
            assert!(!WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", sig), "{:?}", sig);
        }

        let addresses = [
            "",
            "0x",
            "2c7536e3605d9c16a7a3d7b1898e529396a65c23",
            "0x2c7536e3605d9c16a7a3d7b1898e529396a65c2",
            "0x2c7536e3605d9c16a7a3d7b1898e529396a65c230",
            "0x0000000000000000000000000000000000000000",
            "0xffffffffffffffffffffffffffffffffffffffff",
        ];
        for address in addresses {
            assert!(!WalletSignatureVerifier::verify(address, "Some data", WEB3_SIGNATURE), "{:?}", address);
        }
    }

    #[test]
    fn test_uppercase_and_unprefixed_signature_still_verify() {
        let upper = WEB3_SIGNATURE[2..].to_uppercase();
        assert!(WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", &upper));
        assert!(WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", &WEB3_SIGNATURE[2..]));
    }

    #[test]
    fn test_signature_scalars_at_curve_order_rejected() {
        let n = hex::encode(CURVE_N.modulus().to_bytes_be());
        let one = format!("{:0>64}", "1");
        for sig in [
            format!("{}{}1b", n, one),
            format!("{}{}1b", one, n),
            format!("{}{}1b", "0".repeat(64), one),
        ] {
            assert_eq!(
                WalletSignatureVerifier::verify_detailed(WEB3_ADDRESS, "Some data", &sig),
                Err(VerifyError::ScalarOutOfRange)
            );
        }
    }

    #[test]
    fn test_non_ascii_message_uses_byte_length() {
        let wallet = TestWallet::from_seed("unicode");
        let message = "nonce-ñ-✓-🔑";
        let sig = wallet.personal_sign(message);
        assert!(WalletSignatureVerifier::verify(&wallet.address, message, &sig));

        // a signer that framed with the character count produces a hash we reject
        let chars = message.chars().count();
        let by_chars = crate::crypto::keccak::keccak256(
            &[crate::crypto::EIP191_PREFIX, chars.to_string().as_bytes(), message.as_bytes()].concat(),
        );
        let (bad, recid) = wallet.key.sign_prehash_recoverable(&by_chars).unwrap();
        let mut bytes = bad.to_bytes().to_vec();
        bytes.push(27 + recid.to_byte());
        assert!(!WalletSignatureVerifier::verify(&wallet.address, message, &hex::encode(bytes)));
    }

    #[test]
    fn test_mismatch_reports_both_addresses() {
        let other = TestWallet::from_seed("other");
        let err = WalletSignatureVerifier::verify_detailed(&other.address, "Some data", WEB3_SIGNATURE)
            .unwrap_err();
        assert_eq!(
            err,
            VerifyError::AddressMismatch {
                recovered: WEB3_ADDRESS.to_lowercase(),
                claimed: other.address.clone(),
            }
        );
    }

    #[test]
    fn test_recovery_id_two_and_three_use_reduced_x() {
        // find R with x = n + i still below p and on the curve
        let n = CURVE_N.modulus().clone();
        let (r, big_r) = (1u32..64)
            .find_map(|i| {
                let x = &n + i;
                decompress(&x, false).map(|point| (BigUint::from(i), point))
            })
            .unwrap();
        assert!(big_r.x >= n);

        let message = "login-nonce-boundary";
        let hash = eip191_hash(message.as_bytes());
        let s = BigUint::from(0x1234_5678u32);

        for y_is_odd in [false, true] {
            let recovery_id = 2 + y_is_odd as u8;
            let mut sig_bytes = [0u8; 65];
            let r_bytes = r.to_bytes_be();
            sig_bytes[32 - r_bytes.len()..32].copy_from_slice(&r_bytes);
            let s_bytes = s.to_bytes_be();
            sig_bytes[64 - s_bytes.len()..64].copy_from_slice(&s_bytes);
            sig_bytes[64] = 27 + recovery_id;
            let sig_hex = hex::encode(sig_bytes);

            let recovered = WalletSignatureVerifier::recover_address(message, &sig_hex).unwrap();
            assert!(WalletSignatureVerifier::verify(&recovered.to_hex(), message, &sig_hex));

            // the reference implementation accepts (r, s) under the recovered key
            let key = {
                let parsed: RecoverableSignature = sig_hex.parse().unwrap();
                let point = recover_public_key(&parsed, &hash).unwrap();
                let mut sec1 = vec![0x04];
                sec1.extend_from_slice(&point.to_uncompressed_xy());
                VerifyingKey::from_sec1_bytes(&sec1).unwrap()
            };
            let k256_sig = K256Signature::from_slice(&sig_bytes[..64]).unwrap();
            assert!(key.verify_prehash(&hash, &k256_sig).is_ok());

            // same (r, s) read with the unreduced id points elsewhere
            let unreduced = with_v(&sig_hex, 27 + y_is_odd as u8);
            assert!(!WalletSignatureVerifier::verify(&recovered.to_hex(), message, &unreduced));
        }
    }

    #[test]
    fn test_generator_round_trip() {
        // private key 1: the public key is G itself
        let address = EthereumAddress::from_public_key(match &CurvePoint::generator() {
            CurvePoint::Affine(g) => g,
            CurvePoint::Infinity => unreachable!(),
        });
        assert_eq!(address.to_hex(), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_verify_is_thread_safe() {
        let wallet = TestWallet::from_seed("threads");
        let sig = wallet.personal_sign("concurrent");
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| WalletSignatureVerifier::verify(&wallet.address, "concurrent", &sig)))
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }

    // One Strauss-Shamir pass in Jacobian coordinates; around a millisecond
    // per call in release builds.
    #[cfg(not(debug_assertions))]
    #[test]
    fn test_verify_cost_in_release_build() {
        let rounds = 20u32;
        let start = std::time::Instant::now();
        for _ in 0..rounds {
            assert!(WalletSignatureVerifier::verify(WEB3_ADDRESS, "Some data", WEB3_SIGNATURE));
        }
        let average = start.elapsed() / rounds;
        assert!(
            average < std::time::Duration::from_millis(20),
            "average verify took {:?}",
            average
        );
    }
}
