use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Turns a stored, encrypted API credential into the plaintext key
pub trait CredentialDecryptor: Send + Sync {
    fn decrypt(&self, encrypted: &str) -> AppResult<String>;
}

/// AES-256-GCM decryptor for `base64(nonce || ciphertext)` credentials
pub struct AesGcmCredentialDecryptor {
    key: [u8; KEY_LEN],
}

impl AesGcmCredentialDecryptor {
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Builds a decryptor from a base64-encoded 32-byte key
    pub fn from_base64_key(encoded: &str) -> AppResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::Credential(format!("Invalid credential key encoding: {}", e)))?;

        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            AppError::Credential(format!(
                "Credential key must be {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?;

        Ok(Self::new(key))
    }

    /// Returns a decryptor when `CREDENTIAL_KEY` is configured
    pub fn from_config(config: &Config) -> AppResult<Option<Self>> {
        config
            .credential_key
            .as_deref()
            .map(Self::from_base64_key)
            .transpose()
    }

    /// Encrypts a credential into the format accepted by [`CredentialDecryptor::decrypt`]
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Credential(format!("Encryption failed: {}", e)))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }
}

impl CredentialDecryptor for AesGcmCredentialDecryptor {
    fn decrypt(&self, encrypted: &str) -> AppResult<String> {
        let sealed = STANDARD
            .decode(encrypted.trim())
            .map_err(|e| AppError::Credential(format!("Invalid credential encoding: {}", e)))?;

        if sealed.len() <= NONCE_LEN {
            return Err(AppError::Credential("Encrypted credential too short".to_string()));
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let nonce = GenericArray::from_slice(&sealed[..NONCE_LEN]);

        let plaintext = cipher
            .decrypt(nonce, &sealed[NONCE_LEN..])
            .map_err(|e| AppError::Credential(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|_| AppError::Credential("Decrypted credential is not UTF-8".to_string()))
    }
}
