use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;
use rill_lexer::LexErrorKind;

use crate::read;

use super::*;

fn read_one(source: &str) -> Node {
    match read(source) {
        Ok(mut nodes) if nodes.len() == 1 => nodes.remove(0),
        other => panic!("expected one node, got {other:?}"),
    }
}

fn read_err(source: &str) -> ReadError {
    match read(source) {
        Err(err) => err,
        Ok(nodes) => panic!("expected an error, got {nodes:?}"),
    }
}

fn atom(node: &Node) -> &Value {
    match &node.kind {
        NodeKind::Atom(value) => value,
        other => panic!("expected an atom, got {other:?}"),
    }
}

#[test]
fn atoms_are_classified() {
    assert_eq!(atom(&read_one("null")), &Value::Null);
    assert_eq!(atom(&read_one("true")), &Value::Bool(true));
    assert_eq!(atom(&read_one("false")), &Value::Bool(false));
    assert_eq!(atom(&read_one("42")), &Value::Number(42.0));
    assert_eq!(atom(&read_one("-1.5")), &Value::Number(-1.5));
    assert_eq!(atom(&read_one("+3")), &Value::Number(3.0));
    assert_eq!(atom(&read_one(".5")), &Value::Number(0.5));
    assert_eq!(atom(&read_one("\"hi\"")), &Value::string("hi"));
    assert_eq!(atom(&read_one("x")), &Value::variable("x"));
    assert_eq!(atom(&read_one("-")), &Value::variable("-"));
    assert_eq!(atom(&read_one("...args")), &Value::variable("...args"));
}

#[test]
fn quoted_keywords_stay_strings() {
    assert_eq!(atom(&read_one("\"true\"")), &Value::string("true"));
    assert_eq!(atom(&read_one("'42'")), &Value::string("42"));
}

#[test]
fn label_in_value_position_is_a_string() {
    assert_eq!(atom(&read_one(":top")), &Value::string("top"));
    assert_eq!(atom(&read_one(":")), &Value::variable(":"));
}

#[test]
fn label_marker_as_first_element() {
    let node = read_one("(:top)");
    let children = node.as_expression().unwrap_or_default();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].kind, NodeKind::Label(Name::from("top")));
    assert_eq!(children[0].span, Span::new(1, 5));

    // Only the first element is a marker.
    let node = read_one("(jump :top)");
    let children = node.as_expression().unwrap_or_default();
    assert_eq!(atom(&children[1]), &Value::string("top"));
}

#[test]
fn nested_structure_and_spans() {
    let node = read_one("(print [1 x] {a 2})");
    assert_eq!(node.span, Span::new(0, 19));
    let children = node.as_expression().unwrap_or_default();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].as_symbol().map(Name::as_str), Some("print"));

    match &children[1].kind {
        NodeKind::List(items) => {
            assert_eq!(items.len(), 2);
            assert_eq!(children[1].span, Span::new(7, 12));
        }
        other => panic!("expected list, got {other:?}"),
    }

    match &children[2].kind {
        NodeKind::Map(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].key.as_str(), "a");
            assert_eq!(entries[0].key_span, Span::new(14, 15));
            assert_eq!(atom(&entries[0].value), &Value::Number(2.0));
        }
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn map_keys_from_strings_symbols_and_numbers() {
    let node = read_one("{\"s\" 1 sym 2 3 4 :lbl 5}");
    let NodeKind::Map(entries) = node.kind else {
        panic!("expected map");
    };
    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["s", "sym", "3", "lbl"]);
}

#[test]
fn multiple_top_level_forms() {
    let nodes = read("(define x 5) (x) ; trailing comment").unwrap_or_default();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].span, Span::new(13, 16));
}

#[test]
fn empty_source() {
    assert_eq!(read("  ; only a comment\n"), Ok(vec![]));
}

#[test]
fn unexpected_close() {
    let err = read_err("(a))");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.span, Span::new(3, 4));
}

#[test]
fn unclosed_points_at_opening() {
    let err = read_err("(define x\n  [1 2");
    assert_eq!(err.code(), ErrorCode::E1002);
    assert_eq!(err.span, Span::new(12, 13));
    assert_eq!(err.to_string(), "unclosed `[`");
}

#[test]
fn mismatched_close() {
    let err = read_err("(a]");
    assert_eq!(err.code(), ErrorCode::E1003);
    assert_eq!(err.span, Span::new(2, 3));
    let diag = err.to_diagnostic();
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.labels[1].span, Span::new(0, 1));
}

#[test]
fn odd_map() {
    let err = read_err("{a 1 b}");
    assert_eq!(err.code(), ErrorCode::E1004);
    assert_eq!(err.span, Span::new(0, 7));
}

#[test]
fn invalid_map_key() {
    let err = read_err("{(a) 1}");
    assert_eq!(err.kind, ReadErrorKind::InvalidMapKey { found: "expression" });
    assert_eq!(err.span, Span::new(1, 4));

    let err = read_err("{true 1}");
    assert_eq!(err.kind, ReadErrorKind::InvalidMapKey { found: "bool" });
}

#[test]
fn invalid_number() {
    let err = read_err("(+ 1 2x)");
    assert_eq!(err.code(), ErrorCode::E1005);
    assert_eq!(err.span, Span::new(5, 7));
}

#[test]
fn lex_errors_pass_through() {
    let err = read_err("(print \"oops)");
    assert!(matches!(
        &err.kind,
        ReadErrorKind::Lex(lex) if lex.kind == LexErrorKind::UnterminatedString
    ));
    assert_eq!(err.code(), ErrorCode::E0001);
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 20_000;
    let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let result = read(&source);
    assert!(result.is_ok());
    // Dropping a tree this deep recurses too.
    std::mem::forget(result);
}

mod proptest_reader {
    use proptest::prelude::*;

    use crate::read;

    proptest! {
        #[test]
        fn never_panics(source in "[()\\[\\]{} a1:;\"\\\\.-]{0,48}") {
            let _ = read(&source);
        }

        #[test]
        fn balanced_forms_read(depth in 0usize..40, word in "[a-z]{1,6}") {
            let source = format!("{}{}{}", "(".repeat(depth), word, ")".repeat(depth));
            let nodes = read(&source);
            prop_assert!(nodes.is_ok());
            prop_assert_eq!(nodes.map(|n| n.len()).unwrap_or(0), 1);
        }
    }
}
