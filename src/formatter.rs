//! Rendering of values, calls and diffs for diagnostics.

use std::fmt::Write;

use unicode_width::UnicodeWidthChar;

use crate::config::DiagnosticsConfig;
use crate::slot::Slot;
use crate::value::Value;

/// Render a value on a single line.
///
/// Strings are quoted, lists and maps are bracketed, and anything without a
/// data representation renders as `<kind ..>`. Nesting beyond
/// `max_depth` becomes `[..]`/`{..}`, and the result is truncated to
/// `max_width` display columns.
pub fn inspect(value: &Value, config: &DiagnosticsConfig) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, config);
    truncate(out, config.max_width)
}

fn write_value(out: &mut String, value: &Value, depth: usize, config: &DiagnosticsConfig) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => write!(out, "{}", b).unwrap(),
        Value::Int(i) => write!(out, "{}", i).unwrap(),
        Value::Float(f) => write!(out, "{:?}", f).unwrap(),
        Value::Str(s) => write!(out, "{:?}", s).unwrap(),
        Value::List(items) => {
            if depth >= config.max_depth && !items.is_empty() {
                out.push_str("[..]");
                return;
            }
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, depth + 1, config);
            }
            out.push(']');
        }
        Value::Map(map) => {
            if depth >= config.max_depth && !map.is_empty() {
                out.push_str("{..}");
                return;
            }
            out.push('{');
            for (idx, (key, item)) in map.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write!(out, "{:?}: ", key).unwrap();
                write_value(out, item, depth + 1, config);
            }
            out.push('}');
        }
        Value::Validator(v) => write!(out, "<validator {}>", v.name()).unwrap(),
        Value::Deferred(_) => out.push_str("<deferred>"),
        Value::Opaque(_) => out.push_str("<opaque>"),
    }
}

fn truncate(rendered: String, max_width: usize) -> String {
    if max_width == 0 {
        return rendered;
    }
    let mut width = 0;
    for (idx, ch) in rendered.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            // Leave one column for the ellipsis.
            let mut cut = String::new();
            let mut kept = 0;
            for ch in rendered[..idx].chars() {
                let w = ch.width().unwrap_or(0);
                if kept + w + 1 > max_width {
                    break;
                }
                kept += w;
                cut.push(ch);
            }
            cut.push('…');
            return cut;
        }
    }
    rendered
}

/// Render a call the way it was written: `check(42, "to fly")`.
pub fn render_call(subject: &Value, args: &[Value], config: &DiagnosticsConfig) -> String {
    let mut out = format!("check({}", inspect(subject, config));
    for arg in args {
        write!(out, ", {}", inspect(arg, config)).unwrap();
    }
    out.push(')');
    out
}

/// Describe a matched call as a sentence: `expected 3 to be even`.
///
/// Phrase tokens are written bare (including any `not ` the caller used),
/// parameters are inspected. `args` excludes the subject and lines up with
/// `slots[1..]`.
pub fn describe_relation(
    subject: &Value,
    slots: &[Slot],
    args: &[Value],
    config: &DiagnosticsConfig,
) -> String {
    let mut out = format!("expected {}", inspect(subject, config));
    for (slot, arg) in slots.iter().skip(1).zip(args) {
        out.push(' ');
        match (slot, arg) {
            (Slot::Phrase(_), Value::Str(token)) | (Slot::Chain, Value::Str(token)) => {
                out.push_str(token)
            }
            _ => out.push_str(&inspect(arg, config)),
        }
    }
    out
}

/// Unified line diff from `expected` to `actual`.
pub fn line_diff(expected: &str, actual: &str, context: usize) -> String {
    similar::TextDiff::from_lines(expected, actual)
        .unified_diff()
        .context_radius(context)
        .header("expected", "actual")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config() -> DiagnosticsConfig {
        DiagnosticsConfig::default()
    }

    #[test]
    fn test_inspect_scalars() {
        assert_eq!(inspect(&Value::Null, &config()), "null");
        assert_eq!(inspect(&Value::Int(-4), &config()), "-4");
        assert_eq!(inspect(&Value::Float(2.5), &config()), "2.5");
        assert_eq!(inspect(&Value::Float(3.0), &config()), "3.0");
        assert_eq!(inspect(&Value::from("a \"q\""), &config()), r#""a \"q\"""#);
    }

    #[test]
    fn test_inspect_nested() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), Value::from(vec![1, 2]));
        map.insert("a".to_string(), Value::Bool(true));
        insta::assert_snapshot!(inspect(&Value::Map(map), &config()), @r###"{"a": true, "b": [1, 2]}"###);
    }

    #[test]
    fn test_inspect_depth_limit() {
        let nested = Value::List(vec![Value::List(vec![Value::List(vec![Value::Int(1)])])]);
        let shallow = DiagnosticsConfig {
            max_depth: 1,
            ..config()
        };
        assert_eq!(inspect(&nested, &shallow), "[[..]]");
        assert_eq!(inspect(&Value::List(vec![]), &shallow), "[]");
    }

    #[test]
    fn test_inspect_truncates_to_width() {
        let narrow = DiagnosticsConfig {
            max_width: 8,
            ..config()
        };
        assert_eq!(inspect(&Value::from("abcdefghij"), &narrow), "\"abcdef…");
        assert_eq!(inspect(&Value::from("abc"), &narrow), "\"abc\"");
    }

    #[test]
    fn test_inspect_wide_chars() {
        let narrow = DiagnosticsConfig {
            max_width: 5,
            ..config()
        };
        // Each CJK character takes two columns.
        assert_eq!(inspect(&Value::from("日本語"), &narrow), "\"日…");
    }

    #[test]
    fn test_render_call() {
        let rendered = render_call(
            &Value::Int(42),
            &[Value::from("to do something impossible")],
            &config(),
        );
        assert_eq!(rendered, r#"check(42, "to do something impossible")"#);
    }

    #[test]
    fn test_line_diff() {
        let diff = line_diff("a\nb\nc\n", "a\nx\nc\n", 1);
        insta::assert_snapshot!(diff, @r###"
        --- expected
        +++ actual
        @@ -1,3 +1,3 @@
         a
        -b
        +x
         c
        "###);
    }
}
