use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_messages() {
    assert_eq!(
        EvalErrorKind::UnboundName {
            name: Name::from("y")
        }
        .to_string(),
        "unbound name `y`"
    );
    assert_eq!(
        EvalErrorKind::ArityMismatch {
            name: Name::from("f"),
            expected: 1,
            got: 3,
        }
        .to_string(),
        "`f` expects 1 argument, got 3"
    );
    assert_eq!(
        EvalErrorKind::InvalidOperands {
            op: "+",
            left: "number",
            right: "string",
        }
        .to_string(),
        "invalid operands for `+`: number and string"
    );
    assert_eq!(EvalErrorKind::native("boom").to_string(), "boom");
}

#[test]
fn test_codes_are_runtime_codes() {
    let kinds = [
        EvalErrorKind::UnboundName {
            name: Name::from("x"),
        },
        EvalErrorKind::StackOverflow { capacity: 4 },
        EvalErrorKind::StackUnderflow,
        EvalErrorKind::MissingKey {
            key: "k".to_string(),
        },
        EvalErrorKind::NotCallable { type_name: "number" },
        EvalErrorKind::native("x"),
    ];
    for kind in kinds {
        assert_eq!(kind.code().phase(), rill_diagnostic::Phase::Runtime, "{kind:?}");
    }
    assert_eq!(EvalErrorKind::StackUnderflow.code(), ErrorCode::E3004);
    assert_eq!(
        EvalErrorKind::UnknownLabel {
            label: ":nowhere".to_string()
        }
        .code(),
        ErrorCode::E3007
    );
}
