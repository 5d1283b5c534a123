use super::*;

#[test]
fn symbols_round_trip_through_lookup() {
    for op in [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::Lt,
        BinaryOp::LtEq,
        BinaryOp::Gt,
        BinaryOp::GtEq,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Concat,
    ] {
        assert_eq!(BinaryOp::from_symbol(op.as_symbol()), Some(op));
    }
}

#[test]
fn unknown_symbols_are_not_operators() {
    assert_eq!(BinaryOp::from_symbol("%"), None);
    assert_eq!(BinaryOp::from_symbol("+="), None);
    assert_eq!(BinaryOp::from_symbol("!"), None);
}

#[test]
fn comparison_classification() {
    assert!(BinaryOp::Lt.is_comparison());
    assert!(BinaryOp::NotEq.is_comparison());
    assert!(!BinaryOp::Add.is_comparison());
    assert!(!BinaryOp::Concat.is_comparison());
    assert_eq!(UnaryOp::Inc.as_symbol(), "++");
}
