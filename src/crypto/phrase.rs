//! Recovery phrase encoding.
//!
//! A phrase is the master key's 32 raw bytes as 64 upper-case hex digits
//! in 8 dash-separated groups of 8:
//!
//! ```text
//! 0A1B2C3D-4E5F6071-...-F0E1D2C3
//! ```
//!
//! Decoding is forgiving about formatting (case, dashes, spaces, line
//! breaks) but strict about content: exactly 64 hex digits must remain.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::keys::{MasterKey, KEY_LEN};
use crate::errors::{PdfVaultError, Result};

/// Hex digits per dash-separated group.
const GROUP_LEN: usize = 8;

/// Total hex digits in a phrase (two per key byte).
const PHRASE_HEX_LEN: usize = KEY_LEN * 2;

/// Human-transcribable encoding of a master key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryPhrase(String);

impl RecoveryPhrase {
    /// The phrase text, to be shown to the user.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecoveryPhrase(<redacted>)")
    }
}

/// Encode a master key as a recovery phrase.
pub fn master_key_to_phrase(key: &MasterKey) -> RecoveryPhrase {
    let hex = Zeroizing::new(hex::encode_upper(key.as_bytes()));

    let mut phrase = String::with_capacity(PHRASE_HEX_LEN + PHRASE_HEX_LEN / GROUP_LEN);
    for (i, ch) in hex.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            phrase.push('-');
        }
        phrase.push(ch);
    }

    RecoveryPhrase(phrase)
}

/// Decode a recovery phrase back into a master key.
///
/// All non-hex characters are stripped first. Fails with
/// `InvalidPhraseFormat` unless exactly 64 hex digits remain.
pub fn phrase_to_master_key(phrase: &str) -> Result<MasterKey> {
    let normalized: Zeroizing<String> = Zeroizing::new(
        phrase
            .chars()
            .filter(char::is_ascii_hexdigit)
            .map(|c| c.to_ascii_lowercase())
            .collect(),
    );

    if normalized.len() != PHRASE_HEX_LEN {
        return Err(PdfVaultError::InvalidPhraseFormat);
    }

    let mut bytes = [0u8; KEY_LEN];
    hex::decode_to_slice(normalized.as_bytes(), &mut bytes)
        .map_err(|_| PdfVaultError::InvalidPhraseFormat)?;

    let key = MasterKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}
