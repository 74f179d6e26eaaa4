//! Credential cipher.
//!
//! A third-party API key is stored by the backend as a
//! [`SealedCredential`]. Callers depend on the two-method [`SecretCipher`]
//! contract; two passphrase-keyed schemes implement it.
//!
//! [`PassphraseCipher`] is the default and reads what the backend stores:
//! the OpenSSL `enc` / CryptoJS `AES.encrypt(text, passphrase)` format.
//!
//! ```text
//! key || iv = EVP_BytesToKey-MD5(passphrase, salt[8])                  (32 + 16 bytes)
//! sealed    = base64( "Salted__" || salt || AES-256-CBC-PKCS7(key, iv, json_string(plaintext)) )
//! ```
//!
//! [`ChaChaCipher`] is an authenticated alternative for stores that do not
//! need to interoperate with that format:
//!
//! ```text
//! key    = HKDF-SHA256(passphrase, salt = KDF_SALT, info = KDF_INFO)   (32 bytes)
//! sealed = base64( nonce[12] || ChaCha20-Poly1305(key, nonce, json_string(plaintext)) )
//! ```
//!
//! Both wrap the plaintext as a JSON string before sealing, matching the
//! producer side, which stringifies the value it encrypts.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use helpdesk_models::SealedCredential;
use hkdf::Hkdf;
use rand::RngCore;
use secrecy::SecretString;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

/// Passphrase compiled into both ends when no managed secret is configured.
pub const DEFAULT_PASSPHRASE: &str = "secret key 123";

/// Header of the OpenSSL salted format.
pub const SALT_MAGIC: &[u8] = b"Salted__";

/// Salt size of the OpenSSL salted format.
pub const SALT_SIZE: usize = 8;

const AES_KEY_SIZE: usize = 32;
const AES_IV_SIZE: usize = 16;
const AES_BLOCK_SIZE: usize = 16;

/// Nonce size for ChaCha20-Poly1305 (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag size.
pub const TAG_SIZE: usize = 16;

const KDF_SALT: &[u8] = b"helpdesk-context/credential-cipher";
const KDF_INFO: &[u8] = b"sealed-credential v1";

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Cipher errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    /// The sealed value is malformed, truncated, was sealed under another
    /// key, or does not decode to a UTF-8 JSON string.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The key could not be derived from the configured passphrase.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Reversible protection of a single credential string.
pub trait SecretCipher: Send + Sync {
    /// Seal a plaintext credential. Never fails for string input.
    fn protect(&self, plaintext: &str) -> SealedCredential;

    /// Open a sealed credential.
    fn reveal(&self, sealed: &SealedCredential) -> Result<SecretString, CipherError>;
}

fn envelope(plaintext: &str) -> Zeroizing<String> {
    Zeroizing::new(serde_json::Value::String(plaintext.to_owned()).to_string())
}

fn decode(sealed: &SealedCredential) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(sealed.as_str().trim())
        .map_err(|e| CipherError::Decryption(format!("not base64: {e}")))
}

/// Decrypted bytes back to the credential: UTF-8, then the JSON string.
fn open_envelope(plaintext: Vec<u8>) -> Result<SecretString, CipherError> {
    let text = Zeroizing::new(String::from_utf8(plaintext).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        CipherError::Decryption("plaintext is not UTF-8".into())
    })?);

    let value: String = serde_json::from_str(&text)
        .map_err(|_| CipherError::Decryption("plaintext is not a sealed string".into()))?;
    Ok(SecretString::from(value))
}

// ---------------------------------------------------------------------------
// OpenSSL salted AES-256-CBC
// ---------------------------------------------------------------------------

/// AES-256-CBC in the OpenSSL `Salted__` format, keyed from a passphrase.
///
/// Unauthenticated: a wrong key is usually caught by the padding check, and
/// otherwise by the UTF-8 or JSON-string check on the result.
pub struct PassphraseCipher {
    passphrase: Zeroizing<Vec<u8>>,
}

impl PassphraseCipher {
    pub fn new(passphrase: &str) -> Result<Self, CipherError> {
        if passphrase.is_empty() {
            return Err(CipherError::KeyDerivation(
                "passphrase must not be empty".into(),
            ));
        }
        Ok(Self {
            passphrase: Zeroizing::new(passphrase.as_bytes().to_vec()),
        })
    }

    /// Cipher keyed from [`DEFAULT_PASSPHRASE`].
    pub fn with_default_passphrase() -> Self {
        Self::new(DEFAULT_PASSPHRASE).expect("default passphrase is non-empty")
    }

    /// OpenSSL `EVP_BytesToKey` with MD5 and one iteration:
    /// `D_i = MD5(D_{i-1} || passphrase || salt)` until key and IV are filled.
    fn derive(&self, salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; AES_KEY_SIZE + AES_IV_SIZE]> {
        let mut derived = Zeroizing::new([0u8; AES_KEY_SIZE + AES_IV_SIZE]);
        let mut previous = Zeroizing::new(Vec::new());
        let mut filled = 0;

        while filled < derived.len() {
            let mut input = Zeroizing::new(Vec::with_capacity(
                previous.len() + self.passphrase.len() + SALT_SIZE,
            ));
            input.extend_from_slice(&previous);
            input.extend_from_slice(&self.passphrase);
            input.extend_from_slice(salt);

            let digest = md5::compute(input.as_slice()).0;
            let take = (derived.len() - filled).min(digest.len());
            derived[filled..filled + take].copy_from_slice(&digest[..take]);
            filled += take;
            *previous = digest.to_vec();
        }
        derived
    }
}

impl SecretCipher for PassphraseCipher {
    fn protect(&self, plaintext: &str) -> SealedCredential {
        let envelope = envelope(plaintext);

        let mut salt = [0u8; SALT_SIZE];
        rand::thread_rng().fill_bytes(&mut salt);
        let derived = self.derive(&salt);
        let (key, iv) = derived.split_at(AES_KEY_SIZE);

        let ciphertext = Aes256CbcEnc::new_from_slices(key, iv)
            .expect("EVP_BytesToKey yields AES-256 key and IV sizes")
            .encrypt_padded_vec_mut::<Pkcs7>(envelope.as_bytes());

        let mut sealed = Vec::with_capacity(SALT_MAGIC.len() + SALT_SIZE + ciphertext.len());
        sealed.extend_from_slice(SALT_MAGIC);
        sealed.extend_from_slice(&salt);
        sealed.extend(ciphertext);
        SealedCredential::new(STANDARD.encode(sealed))
    }

    fn reveal(&self, sealed: &SealedCredential) -> Result<SecretString, CipherError> {
        let data = decode(sealed)?;
        let body = data
            .strip_prefix(SALT_MAGIC)
            .ok_or_else(|| CipherError::Decryption("missing Salted__ header".into()))?;

        if body.len() < SALT_SIZE + AES_BLOCK_SIZE {
            return Err(CipherError::Decryption("ciphertext too short".into()));
        }

        let (salt_bytes, ciphertext) = body.split_at(SALT_SIZE);
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(salt_bytes);
        let derived = self.derive(&salt);
        let (key, iv) = derived.split_at(AES_KEY_SIZE);

        let plaintext = Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|e| CipherError::Decryption(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::Decryption("bad padding (wrong key or tampered data)".into()))?;

        open_envelope(plaintext)
    }
}

// ---------------------------------------------------------------------------
// ChaCha20-Poly1305
// ---------------------------------------------------------------------------

/// ChaCha20-Poly1305 keyed from a passphrase through HKDF-SHA256.
pub struct ChaChaCipher {
    key: [u8; 32],
}

impl ChaChaCipher {
    /// Derive the cipher key from `passphrase`.
    pub fn new(passphrase: &str) -> Result<Self, CipherError> {
        if passphrase.is_empty() {
            return Err(CipherError::KeyDerivation(
                "passphrase must not be empty".into(),
            ));
        }
        let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), passphrase.as_bytes());
        let mut key = [0u8; 32];
        hk.expand(KDF_INFO, &mut key)
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        Ok(Self { key })
    }

    fn aead(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.key))
    }
}

impl Drop for ChaChaCipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl SecretCipher for ChaChaCipher {
    fn protect(&self, plaintext: &str) -> SealedCredential {
        let envelope = envelope(plaintext);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .aead()
            .encrypt(Nonce::from_slice(&nonce_bytes), envelope.as_bytes())
            .expect("ChaCha20-Poly1305 only rejects plaintexts over 256 GiB");

        let mut sealed = nonce_bytes.to_vec();
        sealed.extend(ciphertext);
        SealedCredential::new(STANDARD.encode(sealed))
    }

    fn reveal(&self, sealed: &SealedCredential) -> Result<SecretString, CipherError> {
        let data = decode(sealed)?;

        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Decryption("ciphertext too short".into()));
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let plaintext = self
            .aead()
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| {
                CipherError::Decryption("authentication failed (wrong key or tampered data)".into())
            })?;

        open_envelope(plaintext)
    }
}

/// Open a sealed credential for an edit form, degrading to an empty secret.
///
/// A missing value or any [`CipherError`] yields an empty secret; failures
/// are logged, never surfaced, so the user can simply re-enter the key.
pub fn reveal_or_empty(cipher: &dyn SecretCipher, sealed: Option<&SealedCredential>) -> SecretString {
    let Some(sealed) = sealed.filter(|s| !s.is_empty()) else {
        return SecretString::from(String::new());
    };
    match cipher.reveal(sealed) {
        Ok(secret) => secret,
        Err(e) => {
            tracing::warn!(error = %e, "stored credential could not be opened; showing empty field");
            SecretString::from(String::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
