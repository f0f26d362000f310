//! In-memory field encryption using AES-256-GCM.
//!
//! Every record owns a [`FieldCipher`] whose key is derived with
//! HKDF-SHA256 from a per-process session secret and a random per-record
//! salt. Field values stay encrypted while the record is live and are only
//! decrypted transiently on read.
//!
//! ## Security Model
//!
//! - Unique random nonce per encryption
//! - Field type byte bound as associated data
//! - Keys and session secret are zeroized on drop

use crate::error::{CoreError, CoreResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use std::sync::OnceLock;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;
/// Size of the per-record key derivation salt.
pub const SALT_SIZE: usize = 16;
/// Cipher block size; fixed-width values are padded to this.
pub const BLOCK_SIZE: usize = 16;

const KEY_INFO: &[u8] = b"safedb-field-key-v1";

static SESSION_SECRET: OnceLock<Zeroizing<[u8; KEY_SIZE]>> = OnceLock::new();

fn session_secret() -> &'static [u8; KEY_SIZE] {
    let secret = SESSION_SECRET.get_or_init(|| {
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        bytes
    });
    secret
}

/// Per-record field key.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    bytes: [u8; KEY_SIZE],
}

impl FieldKey {
    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CoreError::invalid_key_size(bytes.len(), KEY_SIZE));
        }
        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Derives a key from input key material and a salt using HKDF-SHA256.
    pub fn derive(ikm: &[u8], salt: &[u8]) -> CoreResult<Self> {
        let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(KEY_INFO, &mut bytes)
            .map_err(|_| CoreError::key_derivation_failed("HKDF expand failed"))?;
        Ok(Self { bytes })
    }

    /// Derives a fresh record key from the session secret and a random salt.
    pub fn for_new_record() -> CoreResult<Self> {
        let mut salt = [0u8; SALT_SIZE];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive(session_secret(), &salt)
    }

    /// Returns the key as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Encrypts and decrypts individual field values.
pub struct FieldCipher {
    key: FieldKey,
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Creates a cipher with the given key.
    #[must_use]
    pub fn new(key: FieldKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_bytes()));
        Self { key, cipher }
    }

    /// Creates a cipher with a freshly derived record key.
    pub fn for_new_record() -> CoreResult<Self> {
        Ok(Self::new(FieldKey::for_new_record()?))
    }

    /// Encrypts `plaintext`, binding `aad` as associated data.
    ///
    /// The output format is: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> CoreResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, Payload { msg: plaintext, aad })
            .map_err(|_| CoreError::encryption_failed("encryption error"))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend(ciphertext);
        Ok(result)
    }

    /// Decrypts data produced by [`encrypt`](Self::encrypt) with the same `aad`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is truncated or fails authentication.
    pub fn decrypt(&self, ciphertext: &[u8], aad: &[u8]) -> CoreResult<Zeroizing<Vec<u8>>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CoreError::decryption_failed("ciphertext too short"));
        }
        let nonce = Nonce::from_slice(&ciphertext[..NONCE_SIZE]);
        self.cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &ciphertext[NONCE_SIZE..],
                    aad,
                },
            )
            .map(Zeroizing::new)
            .map_err(|_| CoreError::decryption_failed("decryption error"))
    }
}

impl Clone for FieldCipher {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let cipher = FieldCipher::for_new_record().unwrap();
        let ct = cipher.encrypt(b"hunter2", &[0x06]).unwrap();
        assert_eq!(ct.len(), NONCE_SIZE + 7 + TAG_SIZE);
        assert_eq!(cipher.decrypt(&ct, &[0x06]).unwrap().as_slice(), b"hunter2");
    }

    #[test]
    fn aad_mismatch_fails() {
        let cipher = FieldCipher::for_new_record().unwrap();
        let ct = cipher.encrypt(b"x", &[0x03]).unwrap();
        assert!(cipher.decrypt(&ct, &[0x04]).is_err());
    }

    #[test]
    fn record_keys_differ() {
        let a = FieldKey::for_new_record().unwrap();
        let b = FieldKey::for_new_record().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = FieldKey::derive(b"secret", b"salt").unwrap();
        let b = FieldKey::derive(b"secret", b"salt").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn clone_shares_key() {
        let cipher = FieldCipher::for_new_record().unwrap();
        let ct = cipher.encrypt(b"v", &[]).unwrap();
        let copy = cipher.clone();
        assert_eq!(copy.decrypt(&ct, &[]).unwrap().as_slice(), b"v");
    }

    #[test]
    fn truncated_ciphertext_rejected() {
        let cipher = FieldCipher::new(FieldKey::generate());
        assert!(cipher.decrypt(&[0u8; 10], &[]).is_err());
        assert!(FieldKey::from_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn debug_redacts() {
        let key = FieldKey::generate();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
