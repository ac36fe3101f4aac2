//! Arithmetic-expression emission.
//!
//! Operator-for-operator translation to TypeScript. Identifiers resolve
//! against the current scope; unknown names default to zero, so an
//! undeclared name is read through a helper that coerces a missing or
//! non-numeric shell variable to `0` rather than `NaN`.

use crate::ast::{ArithAssignOp, ArithBinOp, ArithUnaryOp, ArithmeticExpression};
use crate::emitter::escape::sanitize_identifier;
use crate::emitter::{Context, DeclKind};

pub(super) fn arith_expr(expr: &ArithmeticExpression, ctx: &mut Context) -> String {
    match expr {
        ArithmeticExpression::Number(n) => n.to_string(),
        ArithmeticExpression::Variable(name) => variable_read(name, ctx),
        ArithmeticExpression::Binary { op, left, right } => {
            let l = arith_expr(left, ctx);
            let r = arith_expr(right, ctx);
            binary_expr(*op, &l, &r)
        }
        ArithmeticExpression::Unary { op, operand } => unary_expr(*op, operand, ctx),
        ArithmeticExpression::Conditional { condition, then_branch, else_branch } => {
            let c = arith_expr(condition, ctx);
            let t = arith_expr(then_branch, ctx);
            let e = arith_expr(else_branch, ctx);
            format!("({c} ? {t} : {e})")
        }
        ArithmeticExpression::Assignment { op, target, value } => assignment_expr(*op, target, value, ctx),
        ArithmeticExpression::Grouped(inner) => format!("({})", arith_expr(inner, ctx)),
    }
}

/// Reads `name` as a number, defaulting undeclared/non-numeric values to
/// zero.
fn variable_read(name: &str, ctx: &Context) -> String {
    let sanitized = sanitize_identifier(name);
    if ctx.is_declared(name) {
        format!("$.num({sanitized})")
    } else {
        "0".to_string()
    }
}

fn binary_expr(op: ArithBinOp, l: &str, r: &str) -> String {
    match op {
        ArithBinOp::Add => format!("({l} + {r})"),
        ArithBinOp::Sub => format!("({l} - {r})"),
        ArithBinOp::Mul => format!("({l} * {r})"),
        ArithBinOp::Div => format!("Math.trunc({l} / {r})"),
        ArithBinOp::Mod => format!("({l} % {r})"),
        ArithBinOp::Pow => format!("({l} ** {r})"),
        ArithBinOp::Shl => format!("({l} << {r})"),
        ArithBinOp::Shr => format!("({l} >> {r})"),
        ArithBinOp::Lt => format!("({l} < {r} ? 1 : 0)"),
        ArithBinOp::Le => format!("({l} <= {r} ? 1 : 0)"),
        ArithBinOp::Gt => format!("({l} > {r} ? 1 : 0)"),
        ArithBinOp::Ge => format!("({l} >= {r} ? 1 : 0)"),
        ArithBinOp::Eq => format!("({l} === {r} ? 1 : 0)"),
        ArithBinOp::Ne => format!("({l} !== {r} ? 1 : 0)"),
        ArithBinOp::BitAnd => format!("({l} & {r})"),
        ArithBinOp::BitOr => format!("({l} | {r})"),
        ArithBinOp::BitXor => format!("({l} ^ {r})"),
        ArithBinOp::LogAnd => format!("({l} && {r} ? 1 : 0)"),
        ArithBinOp::LogOr => format!("({l} || {r} ? 1 : 0)"),
        ArithBinOp::Comma => format!("({l}, {r})"),
    }
}

fn unary_expr(op: ArithUnaryOp, operand: &ArithmeticExpression, ctx: &mut Context) -> String {
    match (op, operand) {
        (ArithUnaryOp::PreIncrement, ArithmeticExpression::Variable(name)) => {
            format!("(++{})", sanitize_identifier(name))
        }
        (ArithUnaryOp::PreDecrement, ArithmeticExpression::Variable(name)) => {
            format!("(--{})", sanitize_identifier(name))
        }
        (ArithUnaryOp::PostIncrement, ArithmeticExpression::Variable(name)) => {
            format!("({}++)", sanitize_identifier(name))
        }
        (ArithUnaryOp::PostDecrement, ArithmeticExpression::Variable(name)) => {
            format!("({}--)", sanitize_identifier(name))
        }
        (op, operand) => {
            let v = arith_expr(operand, ctx);
            match op {
                ArithUnaryOp::Negate => format!("(-{v})"),
                ArithUnaryOp::Plus => format!("(+{v})"),
                ArithUnaryOp::LogNot => format!("({v} ? 0 : 1)"),
                ArithUnaryOp::BitNot => format!("(~{v})"),
                // Increment/decrement on a non-variable operand (e.g. a
                // grouped expression) has no lvalue in the target; fall
                // back to the plain value, matching Bash's own rejection
                // of `((++1))` as a runtime error we simply don't model.
                ArithUnaryOp::PreIncrement | ArithUnaryOp::PostIncrement => v,
                ArithUnaryOp::PreDecrement | ArithUnaryOp::PostDecrement => v,
            }
        }
    }
}

fn assignment_expr(op: ArithAssignOp, target: &str, value: &ArithmeticExpression, ctx: &mut Context) -> String {
    let name = sanitize_identifier(target);
    if !ctx.is_declared(target) {
        ctx.declare_variable(target, DeclKind::Let);
    }
    let v = arith_expr(value, ctx);
    let op_str = match op {
        ArithAssignOp::Assign => "=",
        ArithAssignOp::AddAssign => "+=",
        ArithAssignOp::SubAssign => "-=",
        ArithAssignOp::MulAssign => "*=",
        ArithAssignOp::DivAssign => "/=",
        ArithAssignOp::ModAssign => "%=",
        ArithAssignOp::AndAssign => "&=",
        ArithAssignOp::OrAssign => "|=",
        ArithAssignOp::XorAssign => "^=",
        ArithAssignOp::ShlAssign => "<<=",
        ArithAssignOp::ShrAssign => ">>=",
    };
    format!("({name} {op_str} {v})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::Config;
    use std::collections::BTreeSet;

    fn ctx() -> Context {
        Context::new(Config::default(), BTreeSet::new())
    }

    #[test]
    fn undeclared_variable_reads_as_zero() {
        let mut c = ctx();
        let expr = ArithmeticExpression::Variable("x".into());
        assert_eq!(arith_expr(&expr, &mut c), "0");
    }

    #[test]
    fn declared_variable_reads_through_num_helper() {
        let mut c = ctx();
        c.declare_variable("x", DeclKind::Let);
        let expr = ArithmeticExpression::Variable("x".into());
        assert_eq!(arith_expr(&expr, &mut c), "$.num(x)");
    }

    #[test]
    fn comparison_operators_yield_zero_or_one() {
        let mut c = ctx();
        let expr = ArithmeticExpression::Binary {
            op: ArithBinOp::Lt,
            left: Box::new(ArithmeticExpression::Number(1)),
            right: Box::new(ArithmeticExpression::Number(2)),
        };
        assert_eq!(arith_expr(&expr, &mut c), "(1 < 2 ? 1 : 0)");
    }

    #[test]
    fn assignment_declares_target_if_new() {
        let mut c = ctx();
        let expr = ArithmeticExpression::Assignment {
            op: ArithAssignOp::Assign,
            target: "n".into(),
            value: Box::new(ArithmeticExpression::Number(5)),
        };
        let rendered = arith_expr(&expr, &mut c);
        assert_eq!(rendered, "(n = 5)");
        assert!(c.is_declared("n"));
    }
}
