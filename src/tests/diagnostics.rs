//! Rendered failures and how configuration shapes them.

use std::fs;

use super::fixtures::*;
use crate::{check, AssertConfig, DiagnosticsConfig};

#[test]
fn test_parameterized_failure_rendering() {
    let expect = base();
    let err = check!(expect, 2, "to be greater than", 5).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r###"
    expected 2 to be greater than 5
      actual: 2
      expected: 5
    "###);
}

#[test]
fn test_multiline_strings_render_a_diff() {
    let expect = base();
    let err = check!(expect, "one\ntwo\n", "to equal", "one\nthree\n").unwrap_err();
    let rendered = err.to_string();
    let head: Vec<&str> = rendered.lines().take(3).collect();
    insta::assert_snapshot!(head.join("\n"), @r###"
    expected "one\ntwo\n" to equal "one\nthree\n"
      actual: "one\ntwo\n"
      expected: "one\nthree\n"
    "###);
    assert!(rendered.contains("  --- expected\n  +++ actual"));
    assert!(rendered.contains("  -three\n  +two"));
}

#[test]
fn test_compact_config_drops_diffs_and_truncates() {
    let expect = base().with_config(AssertConfig::compact());
    let err = check!(expect, "one\ntwo\n", "to equal", "one\nthree\n").unwrap_err();
    assert!(!err.to_string().contains("+++ actual"));

    let long = "abcdefghij".repeat(10);
    let err = check!(expect, long.as_str(), "to be even").unwrap_err();
    let failure = err.failure().expect("a recognized failure");
    assert!(failure.message.contains('…'));
    assert!(failure.message.ends_with("… to be even"));
}

#[test]
fn test_compact_config_reaches_delegated_validators() {
    let expect = base().with_config(AssertConfig::compact());
    let long = "abcdefghij".repeat(10);
    let err = check!(expect, long.as_str(), "to be a number").unwrap_err();
    let failure = err.failure().expect("a recognized failure");
    assert_eq!(failure.message.matches('…').count(), 1);
    assert!(failure.message.ends_with("… to be a number"));
    assert!(!failure.message.contains(&long));
}

#[test]
fn test_config_loaded_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assert.toml");
    fs::write(&path, "[diagnostics]\nmax_width = 12\n").unwrap();

    let config = AssertConfig::load(&path).unwrap();
    assert_eq!(
        config.diagnostics,
        DiagnosticsConfig {
            max_width: 12,
            ..DiagnosticsConfig::default()
        }
    );

    let expect = base().with_config(config);
    let err = check!(expect, "a long string value", "to be even").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r###"
    expected "a long str… to be even
      actual: "a long str…
    "###);
}

#[test]
fn test_unknown_assertion_respects_width() {
    let narrow = AssertConfig {
        diagnostics: DiagnosticsConfig {
            max_width: 6,
            ..DiagnosticsConfig::default()
        },
    };
    let expect = base().with_config(narrow);
    let err = check!(expect, "abcdefgh", "to fly").unwrap_err();
    assert_eq!(err.to_string(), r#"no assertion matches check("abcd…, "to f…)"#);
}
