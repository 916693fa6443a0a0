//! Rejection of malformed grammar artifacts

use cool_grammar::{
    ABI_VERSION, GrammarDefinition, HEADER_LEN, Language, LanguageError, MAGIC, compile, language,
};
use proptest::prelude::*;

fn with_abi(version: u16) -> Vec<u8> {
    let mut artifact = language().to_vec();
    artifact[8..10].copy_from_slice(&version.to_le_bytes());
    artifact
}

#[test]
fn empty_artifact_is_rejected() {
    assert_eq!(Language::new(&[]), Err(LanguageError::Empty));
}

#[test]
fn header_only_prefix_is_truncated() {
    let artifact = &language()[..HEADER_LEN - 1];
    assert!(matches!(
        Language::new(artifact),
        Err(LanguageError::Truncated { expected, actual })
            if expected == HEADER_LEN && actual == HEADER_LEN - 1
    ));
}

#[test]
fn truncated_payload_is_rejected() {
    let full = language();
    let artifact = &full[..full.len() - 1];
    assert!(matches!(
        Language::new(artifact),
        Err(LanguageError::Truncated { expected, .. }) if expected == full.len()
    ));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut artifact = language().to_vec();
    artifact.extend_from_slice(&[0, 0, 0]);
    assert_eq!(Language::new(&artifact), Err(LanguageError::TrailingBytes(3)));
}

#[test]
fn bad_magic_is_rejected() {
    let mut artifact = language().to_vec();
    artifact[0] = b'X';
    assert_eq!(Language::new(&artifact), Err(LanguageError::BadMagic));
}

#[test]
fn newer_abi_is_rejected() {
    let artifact = with_abi(ABI_VERSION + 1);
    let err = Language::new(&artifact).unwrap_err();
    assert!(matches!(
        err,
        LanguageError::VersionMismatch { found, .. } if found == ABI_VERSION + 1
    ));
    assert!(err.to_string().contains(&(ABI_VERSION + 1).to_string()));
}

#[test]
fn abi_zero_is_rejected() {
    assert!(matches!(
        Language::new(&with_abi(0)),
        Err(LanguageError::VersionMismatch { found: 0, .. })
    ));
}

#[test]
fn load_errors_convert_to_foundation_errors() {
    let err: cool_foundation::Error = LanguageError::BadMagic.into();
    assert!(err.is_language_load());
}

#[test]
fn compiled_definitions_load() {
    let artifact = compile(&GrammarDefinition::cool()).unwrap();
    assert!(artifact.starts_with(MAGIC));
    assert_eq!(artifact, language());
    assert!(Language::new(&artifact).is_ok());
}

#[test]
fn edited_definitions_load() {
    let mut definition = GrammarDefinition::cool();
    definition.name = "cool-variant".to_string();
    let cool = Language::new(&compile(&definition).unwrap()).unwrap();
    assert_eq!(cool.name(), "cool-variant");
}

proptest! {
    #[test]
    fn every_strict_prefix_is_rejected(cut in 0usize..512) {
        let full = language();
        let cut = cut.min(full.len() - 1);
        prop_assert!(Language::new(&full[..cut]).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = Language::new(&bytes);
    }

    #[test]
    fn corrupted_headers_are_rejected(index in 0usize..HEADER_LEN, flip in 1u8..=255) {
        let mut artifact = language().to_vec();
        artifact[index] ^= flip;
        prop_assert!(Language::new(&artifact).is_err());
    }
}
