//! AES-256-GCM encryption and decryption of individual string fields.
//!
//! Every encryption draws a fresh random 16-byte IV from the
//! [`RandomSource`]; GCM security collapses on nonce reuse, so the IV is
//! never caller-supplied and never derived from the plaintext. The 16-byte
//! authentication tag is carried detached so that IV, tag, and ciphertext
//! remain separate fields of the stored string.
//!
//! Decryption verifies the tag before releasing any plaintext; a payload
//! that fails to parse is rejected before any cryptographic work happens.

use aes_gcm::{
    aead::consts::U16, aes::Aes256, AeadInPlace, AesGcm, Key, KeyInit, Nonce, Tag,
};
use thiserror::Error;

use crate::entropy::{EntropyError, RandomSource};
use crate::kdf::DerivedKey;

/// AES-256-GCM parameterised with the wire format's 16-byte IV width.
type FieldCipher = AesGcm<Aes256, U16>;

/// Byte length of the per-call initialization vector.
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Ways a serialized payload can fail structural validation.
///
/// Every check here runs before any cryptographic operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The string does not split into exactly three `:`-delimited fields.
    #[error("expected 3 colon-delimited fields, found {0}")]
    FieldCount(usize),

    /// A field is not well-formed hexadecimal (non-hex digit or odd length).
    #[error("{0} field is not valid hex")]
    InvalidHex(&'static str),

    /// The IV field does not decode to exactly [`IV_LEN`] bytes.
    #[error("IV must be {IV_LEN} bytes, found {0}")]
    IvLength(usize),

    /// The tag field does not decode to exactly [`TAG_LEN`] bytes.
    #[error("authentication tag must be {TAG_LEN} bytes, found {0}")]
    TagLength(usize),

    /// Authenticated decryption succeeded but the bytes are not UTF-8, so
    /// the payload was not produced by this subsystem's encrypt path.
    #[error("plaintext is not valid UTF-8")]
    NotUtf8,
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The serialized payload is malformed; nothing was decrypted.
    #[error("malformed encrypted payload: {0}")]
    Format(#[from] FormatError),

    /// The authentication tag did not verify: tampering or a wrong key.
    /// No plaintext — partial or otherwise — is released.
    #[error("authentication tag mismatch")]
    Integrity,

    /// The IV could not be generated.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Internal AEAD failure (unreachable with a valid key and IV).
    #[error("aead operation failed")]
    Aead,
}

/// A parsed, encrypted field value.
///
/// The string representation is `<ivHex>:<tagHex>:<cipherHex>`; the storage
/// collaborator persists that string verbatim and hands it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// Per-call random initialization vector.
    pub iv: [u8; IV_LEN],
    /// Detached GCM authentication tag.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes (same length as the plaintext).
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

impl std::str::FromStr for EncryptedPayload {
    type Err = FormatError;

    /// Parse the `iv:tag:cipher` wire format.
    ///
    /// Field count, hex well-formedness, and component lengths are all
    /// validated here; a string that fails any check never reaches the AEAD.
    fn from_str(s: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(FormatError::FieldCount(parts.len()));
        }

        let iv_bytes = hex::decode(parts[0]).map_err(|_| FormatError::InvalidHex("IV"))?;
        if iv_bytes.len() != IV_LEN {
            return Err(FormatError::IvLength(iv_bytes.len()));
        }
        let tag_bytes = hex::decode(parts[1]).map_err(|_| FormatError::InvalidHex("tag"))?;
        if tag_bytes.len() != TAG_LEN {
            return Err(FormatError::TagLength(tag_bytes.len()));
        }
        let ciphertext =
            hex::decode(parts[2]).map_err(|_| FormatError::InvalidHex("ciphertext"))?;

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&iv_bytes);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&tag_bytes);

        Ok(Self {
            iv,
            tag,
            ciphertext,
        })
    }
}

/// Encrypt a plaintext string field under `key`.
///
/// A fresh random IV is drawn from `entropy` on every call. No associated
/// data is bound beyond the ciphertext itself.
///
/// # Errors
///
/// Returns [`CipherError::Entropy`] if the random source cannot produce an
/// IV; the operation is aborted rather than falling back to a weaker source.
pub fn encrypt_field(
    plaintext: &str,
    key: &DerivedKey,
    entropy: &dyn RandomSource,
) -> Result<EncryptedPayload, CipherError> {
    let mut iv = [0u8; IV_LEN];
    entropy.fill(&mut iv)?;

    let cipher = FieldCipher::new(Key::<FieldCipher>::from_slice(key.as_bytes()));
    let mut buf = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buf)
        .map_err(|_| CipherError::Aead)?;

    Ok(EncryptedPayload {
        iv,
        tag: tag.into(),
        ciphertext: buf,
    })
}

/// Decrypt an [`EncryptedPayload`] back to the original string.
///
/// The authentication tag is verified before any plaintext is released.
/// A failed decrypt is deterministic — callers must not retry with the same
/// inputs.
///
/// # Errors
///
/// Returns [`CipherError::Integrity`] on tag mismatch (tampering or wrong
/// key), or [`CipherError::Format`] if the recovered bytes are not UTF-8.
pub fn decrypt_field(payload: &EncryptedPayload, key: &DerivedKey) -> Result<String, CipherError> {
    let cipher = FieldCipher::new(Key::<FieldCipher>::from_slice(key.as_bytes()));
    let mut buf = payload.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&payload.iv),
            b"",
            &mut buf,
            Tag::from_slice(&payload.tag),
        )
        .map_err(|_| CipherError::Integrity)?;

    String::from_utf8(buf).map_err(|_| CipherError::Format(FormatError::NotUtf8))
}
