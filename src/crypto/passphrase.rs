//! Passphrase handling: key derivation and verification digest.
//!
//! The passphrase is never persisted. The config stores only a SHA-256
//! digest for verification; the cipher key is derived in memory with
//! HKDF-SHA256 and lives only inside a CipherContext.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};

const KDF_INFO: &[u8] = b"lablogger-field-cipher-v1";

/// Derive the 32-byte field-cipher key from a passphrase.
pub fn derive_key(passphrase: &str) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(None, passphrase.as_bytes());
    let mut okm = [0u8; 32];
    // expand only fails for absurd output lengths; 32 bytes is fine
    hk.expand(KDF_INFO, &mut okm)
        .unwrap_or_else(|_| unreachable!("32-byte HKDF output"));
    okm
}

/// Hex SHA-256 digest stored in the config for later verification.
pub fn digest(passphrase: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify(passphrase: &str, stored_digest: &str) -> bool {
    digest(passphrase) == stored_digest
}
