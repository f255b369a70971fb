use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand_core::TryRngCore;
use std::sync::Arc;

use crate::Error;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Vault for the per-workspace provider credential. Encrypted values are
/// stored as `base64(nonce):base64(tag):base64(ciphertext)`.
#[derive(Clone)]
pub struct Encryptor {
    cipher: Arc<Aes256Gcm>,
}

impl Encryptor {
    /// Creates a new `Encryptor` using a 32‐byte key for AES‐256.
    pub fn new(key_bytes: &[u8]) -> Result<Self, Error> {
        // AES-256-GCM requires a 256-bit (32 bytes) key.
        if key_bytes.len() != 32 {
            return Err(Error::KeyDerivation(format!(
                "AES-256 key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }
        let key = Key::<Aes256Gcm>::clone_from_slice(key_bytes);
        let cipher = Aes256Gcm::new(&key);

        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    /// Creates an `Encryptor` from the deployment's 64-character hex secret.
    /// Intended for the startup path, so a malformed secret fails the
    /// process before it accepts any traffic.
    pub fn from_hex(hex_key: &str) -> Result<Self, Error> {
        if hex_key.len() != 64 {
            return Err(Error::KeyDerivation(format!(
                "encryption key must be a 64-character hex string, got {} characters",
                hex_key.len()
            )));
        }
        let key_bytes = hex::decode(hex_key)
            .map_err(|e| Error::KeyDerivation(format!("encryption key is not valid hex: {}", e)))?;
        Self::new(&key_bytes)
    }

    /// Encrypts `data` into `base64(nonce):base64(tag):base64(ciphertext)`.
    ///
    /// A random 12‐byte nonce is generated each call (AES-GCM requirement).
    pub fn encrypt(&self, data: &str) -> Result<String, Error> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        let mut rng = OsRng;
        rng.try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let nonce = Nonce::from_slice(&nonce_bytes);

        // aes-gcm appends the 16-byte auth tag to the ciphertext.
        let mut ciphertext = self
            .cipher
            .encrypt(nonce, data.as_bytes())
            .map_err(|e| Error::Encryption(e.to_string()))?;

        if ciphertext.len() < TAG_LEN {
            return Err(Error::Encryption("ciphertext shorter than tag".to_owned()));
        }
        let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

        Ok(format!(
            "{}:{}:{}",
            BASE64.encode(nonce_bytes),
            BASE64.encode(tag),
            BASE64.encode(ciphertext)
        ))
    }

    /// Decrypts a value produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails on any malformed segment or when the authentication tag does
    /// not verify; never returns garbage plaintext.
    pub fn decrypt(&self, encrypted_data: &str) -> Result<String, Error> {
        let mut parts = encrypted_data.splitn(3, ':');
        let (nonce_b64, tag_b64, ct_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(n), Some(t), Some(c)) => (n, t, c),
            _ => {
                return Err(Error::Decryption(
                    "Expected nonce:tag:ciphertext".to_owned(),
                ))
            }
        };

        let nonce_bytes = BASE64
            .decode(nonce_b64)
            .map_err(|e| Error::Decryption(e.to_string()))?;
        let tag = BASE64
            .decode(tag_b64)
            .map_err(|e| Error::Decryption(e.to_string()))?;
        let mut ciphertext = BASE64
            .decode(ct_b64)
            .map_err(|e| Error::Decryption(e.to_string()))?;

        if nonce_bytes.len() != NONCE_LEN {
            return Err(Error::Decryption("Bad nonce length".to_owned()));
        }
        if tag.len() != TAG_LEN {
            return Err(Error::Decryption("Bad tag length".to_owned()));
        }

        let nonce = Nonce::from_slice(&nonce_bytes);
        ciphertext.extend_from_slice(&tag);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|e| Error::Decryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| Error::Decryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encryptor() -> Encryptor {
        Encryptor::new(&[7u8; 32]).unwrap()
    }

    #[test]
    fn round_trip() {
        let enc = encryptor();
        for plaintext in ["", "sk-ant-api03-secret", "日本語も大丈夫"] {
            let encrypted = enc.encrypt(plaintext).unwrap();
            assert_eq!(enc.decrypt(&encrypted).unwrap(), plaintext);
        }
    }

    #[test]
    fn output_has_three_segments_and_fresh_nonces() {
        let enc = encryptor();
        let a = enc.encrypt("same input").unwrap();
        let b = enc.encrypt("same input").unwrap();
        assert_eq!(a.split(':').count(), 3);
        // Fresh nonce per call means ciphertexts differ.
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let enc = encryptor();
        let encrypted = enc.encrypt("payload").unwrap();
        let mut parts: Vec<String> = encrypted.split(':').map(String::from).collect();
        parts[2] = BASE64.encode(b"garbage-ciphertext");
        let tampered = parts.join(":");
        assert!(matches!(
            enc.decrypt(&tampered),
            Err(Error::Decryption(_))
        ));
    }

    #[test]
    fn tampered_tag_fails() {
        let enc = encryptor();
        let encrypted = enc.encrypt("payload").unwrap();
        let mut parts: Vec<String> = encrypted.split(':').map(String::from).collect();
        parts[1] = BASE64.encode([0u8; 16]);
        let tampered = parts.join(":");
        assert!(enc.decrypt(&tampered).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let enc = encryptor();
        let other = Encryptor::new(&[8u8; 32]).unwrap();
        let encrypted = enc.encrypt("payload").unwrap();
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn malformed_input_fails() {
        let enc = encryptor();
        assert!(enc.decrypt("not-delimited").is_err());
        assert!(enc.decrypt("a:b").is_err());
        assert!(enc.decrypt("!!!:???:###").is_err());
    }

    #[test]
    fn key_length_is_validated() {
        assert!(Encryptor::new(&[0u8; 16]).is_err());
        assert!(Encryptor::from_hex("deadbeef").is_err());
        assert!(Encryptor::from_hex(&"zz".repeat(32)).is_err());
        assert!(Encryptor::from_hex(&"ab".repeat(32)).is_ok());
    }
}
