use super::*;

#[test]
fn simple_addition() {
    let expr = parse_arithmetic("1 + 2").unwrap();
    assert_eq!(
        expr,
        ArithmeticExpression::Binary {
            op: ArithBinOp::Add,
            left: Box::new(ArithmeticExpression::Number(1)),
            right: Box::new(ArithmeticExpression::Number(2)),
        }
    );
}

#[test]
fn precedence_mul_before_add() {
    let expr = parse_arithmetic("1 + 2 * 3").unwrap();
    match expr {
        ArithmeticExpression::Binary { op: ArithBinOp::Add, right, .. } => {
            assert!(matches!(*right, ArithmeticExpression::Binary { op: ArithBinOp::Mul, .. }));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn power_is_right_associative() {
    let expr = parse_arithmetic("2 ** 3 ** 2").unwrap();
    match expr {
        ArithmeticExpression::Binary { op: ArithBinOp::Pow, left, right } => {
            assert_eq!(*left, ArithmeticExpression::Number(2));
            assert!(matches!(*right, ArithmeticExpression::Binary { op: ArithBinOp::Pow, .. }));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn ternary_is_right_associative_and_low_precedence() {
    let expr = parse_arithmetic("a ? 1 : b ? 2 : 3").unwrap();
    assert!(matches!(expr, ArithmeticExpression::Conditional { .. }));
}

#[test]
fn compound_assignment() {
    let expr = parse_arithmetic("x += 1").unwrap();
    assert_eq!(
        expr,
        ArithmeticExpression::Assignment {
            op: ArithAssignOp::AddAssign,
            target: "x".into(),
            value: Box::new(ArithmeticExpression::Number(1)),
        }
    );
}

#[test]
fn hex_and_octal_literals() {
    assert_eq!(parse_arithmetic("0x1F").unwrap(), ArithmeticExpression::Number(31));
    assert_eq!(parse_arithmetic("010").unwrap(), ArithmeticExpression::Number(8));
}

#[test]
fn postfix_and_prefix_increment() {
    assert!(matches!(
        parse_arithmetic("i++").unwrap(),
        ArithmeticExpression::Unary { op: ArithUnaryOp::PostIncrement, .. }
    ));
    assert!(matches!(
        parse_arithmetic("++i").unwrap(),
        ArithmeticExpression::Unary { op: ArithUnaryOp::PreIncrement, .. }
    ));
}

#[test]
fn grouped_expression() {
    let expr = parse_arithmetic("(1 + 2) * 3").unwrap();
    match expr {
        ArithmeticExpression::Binary { op: ArithBinOp::Mul, left, .. } => {
            assert!(matches!(*left, ArithmeticExpression::Grouped(_)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn empty_field_is_none() {
    assert_eq!(parse_arithmetic_opt("").unwrap(), None);
    assert_eq!(parse_arithmetic_opt("   ").unwrap(), None);
}

#[test]
fn comma_operator_chains_right() {
    let expr = parse_arithmetic("i=0, j=1").unwrap();
    assert!(matches!(expr, ArithmeticExpression::Binary { op: ArithBinOp::Comma, .. }));
}
