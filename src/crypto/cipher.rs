//! At-rest encryption for personally-identifying string fields.
//!
//! XChaCha20-Poly1305 with a random 24-byte nonce per field; the stored text
//! is hex(nonce ‖ ciphertext). Each encrypted column has a sibling
//! `*_encrypted` marker so mixed plaintext/ciphertext data survives the
//! enable/disable migration boundary.

use chacha20poly1305::aead::Aead;
use chacha20poly1305::{Key, KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::crypto::passphrase;
use crate::errors::{AppError, AppResult};

const NONCE_LEN: usize = 24;

/// Key material for the field cipher. Passed explicitly to every operation —
/// there is no ambient global passphrase — and zeroized on drop.
pub struct CipherContext {
    key: [u8; 32],
}

impl CipherContext {
    pub fn from_passphrase(pass: &str) -> Self {
        Self {
            key: passphrase::derive_key(pass),
        }
    }

    fn aead(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.key))
    }

    pub fn encrypt_field(&self, plaintext: &str) -> AppResult<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .aead()
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| AppError::Crypto(format!("encrypt failed: {:?}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(hex::encode(blob))
    }

    pub fn decrypt_field(&self, stored: &str) -> AppResult<String> {
        let blob = hex::decode(stored)
            .map_err(|e| AppError::Crypto(format!("bad ciphertext encoding: {}", e)))?;
        if blob.len() < NONCE_LEN {
            return Err(AppError::Crypto("ciphertext too short".into()));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .aead()
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|e| AppError::Crypto(format!("decrypt failed: {:?}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::Crypto(format!("decrypted field is not UTF-8: {}", e)))
    }
}

impl Drop for CipherContext {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// The cipher as the rest of the core sees it: either active with a key, or
/// disabled, in which case every transform is the identity function. A
/// process restarted without the passphrase runs Disabled and simply cannot
/// read existing ciphertext until encryption is re-enabled.
pub enum FieldCipher {
    Disabled,
    Active(CipherContext),
}

impl FieldCipher {
    /// Transform a field for storage. Returns the stored text plus the value
    /// for its `*_encrypted` marker column.
    pub fn seal(&self, plaintext: &str) -> AppResult<(String, bool)> {
        match self {
            FieldCipher::Disabled => Ok((plaintext.to_string(), false)),
            FieldCipher::Active(ctx) => Ok((ctx.encrypt_field(plaintext)?, true)),
        }
    }

    /// Reverse of seal. The marker decides whether the stored text is
    /// ciphertext; plaintext rows pass through untouched even while the
    /// cipher is active.
    pub fn open(&self, stored: &str, encrypted: bool) -> AppResult<String> {
        if !encrypted {
            return Ok(stored.to_string());
        }
        match self {
            FieldCipher::Disabled => Ok(stored.to_string()),
            FieldCipher::Active(ctx) => ctx.decrypt_field(stored),
        }
    }
}
