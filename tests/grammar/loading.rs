//! Loading the packaged Cool grammar

use cool_grammar::{ABI_VERSION, Language, language};

#[test]
fn can_load_grammar() {
    let result = Language::new(language());
    assert!(result.is_ok(), "Error loading Cool grammar");
}

#[test]
fn loaded_grammar_describes_cool() {
    let cool = Language::new(language()).expect("Error loading Cool grammar");
    assert_eq!(cool.name(), "cool");
    assert_eq!(cool.abi_version(), ABI_VERSION);
    for kind in ["source_file", "class_item", "dispatch_expression", "case_arm", "ERROR"] {
        assert!(
            cool.id_for_node_kind(kind, true).is_some(),
            "missing node kind {kind}"
        );
    }
    for field in ["name", "features", "body", "condition", "arguments"] {
        assert!(cool.field_id_for_name(field).is_some(), "missing field {field}");
    }
}

#[test]
fn artifact_is_stable_across_calls() {
    assert_eq!(language(), language());
    assert!(std::ptr::eq(language(), language()));
}

#[test]
fn loading_twice_gives_equal_languages() {
    let a = Language::new(language()).expect("Error loading Cool grammar");
    let b = Language::new(language()).expect("Error loading Cool grammar");
    assert_eq!(a, b);
}

#[test]
fn loads_from_other_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| Language::new(language()).map(|l| l.node_kind_count())))
        .collect();
    let counts: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn language_can_be_shared_between_threads() {
    let cool = Language::new(language()).expect("Error loading Cool grammar");
    let shared = cool.clone();
    let name = std::thread::spawn(move || shared.name().to_string())
        .join()
        .unwrap();
    assert_eq!(name, cool.name());
}
