//! Compiled grammar artifacts.
//!
//! An artifact is the binary form of a [`GrammarDefinition`]:
//!
//! ```text
//! offset 0   magic    b"COOLGRMR"
//! offset 8   abi      u16, little-endian
//! offset 10  length   u32, little-endian, payload byte count
//! offset 14  payload  MessagePack-encoded grammar definition
//! ```

use std::sync::OnceLock;

use cool_foundation::{Error, ErrorKind, Result};

use crate::definition::GrammarDefinition;
use crate::language::LanguageError;

/// Leading bytes of every artifact.
pub const MAGIC: &[u8; 8] = b"COOLGRMR";

/// ABI version written by [`compile`].
pub const ABI_VERSION: u16 = 1;

/// Oldest ABI version [`crate::Language::new`] accepts.
pub const MIN_COMPATIBLE_ABI_VERSION: u16 = 1;

/// Size of the fixed header preceding the payload.
pub const HEADER_LEN: usize = 14;

static COOL_ARTIFACT: OnceLock<Vec<u8>> = OnceLock::new();

/// Returns the packaged Cool grammar artifact.
///
/// The artifact is compiled once per process. Pass it to
/// [`crate::Language::new`] to obtain a language handle.
pub fn language() -> &'static [u8] {
    COOL_ARTIFACT.get_or_init(|| match compile(&GrammarDefinition::cool()) {
        Ok(bytes) => {
            tracing::debug!(bytes = bytes.len(), "compiled Cool grammar artifact");
            bytes
        }
        Err(err) => {
            tracing::error!(%err, "failed to compile Cool grammar artifact");
            Vec::new()
        }
    })
}

/// Compiles a grammar definition into an artifact.
///
/// # Errors
///
/// Returns an error if the definition cannot be encoded or the payload
/// does not fit the header's length field.
pub fn compile(definition: &GrammarDefinition) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec_named(definition)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
    let length = u32::try_from(payload.len()).map_err(|_| {
        Error::new(ErrorKind::SerializationError(format!(
            "grammar payload too large: {} bytes",
            payload.len()
        )))
    })?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&ABI_VERSION.to_le_bytes());
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// A validated artifact header and the payload it describes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Unpacked<'a> {
    pub abi_version: u16,
    pub payload: &'a [u8],
}

/// Checks the header of an artifact and returns its payload.
pub(crate) fn unpack(artifact: &[u8]) -> std::result::Result<Unpacked<'_>, LanguageError> {
    if artifact.is_empty() {
        return Err(LanguageError::Empty);
    }
    if artifact.len() < HEADER_LEN {
        return Err(LanguageError::Truncated {
            expected: HEADER_LEN,
            actual: artifact.len(),
        });
    }
    let (header, payload) = artifact.split_at(HEADER_LEN);
    if &header[..MAGIC.len()] != MAGIC {
        return Err(LanguageError::BadMagic);
    }

    let abi_version = u16::from_le_bytes([header[8], header[9]]);
    if !(MIN_COMPATIBLE_ABI_VERSION..=ABI_VERSION).contains(&abi_version) {
        return Err(LanguageError::VersionMismatch {
            found: abi_version,
            min: MIN_COMPATIBLE_ABI_VERSION,
            max: ABI_VERSION,
        });
    }

    let length = u32::from_le_bytes([header[10], header[11], header[12], header[13]]) as usize;
    match payload.len().cmp(&length) {
        std::cmp::Ordering::Less => Err(LanguageError::Truncated {
            expected: HEADER_LEN + length,
            actual: artifact.len(),
        }),
        std::cmp::Ordering::Greater => Err(LanguageError::TrailingBytes(payload.len() - length)),
        std::cmp::Ordering::Equal => Ok(Unpacked {
            abi_version,
            payload,
        }),
    }
}
