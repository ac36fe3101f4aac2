//! Test-condition emission for `[[ ... ]]`/`[ ... ]` and `if`/`while`
//! exit-code reduction.

use crate::ast::{BinaryTestOp, LogicalOp, TestCondition, UnaryTestOp};
use crate::emitter::Context;

use super::word::word_to_expr;

/// Renders a [`TestCondition`] as a boolean TypeScript expression.
pub(super) fn test_condition_expr(cond: &TestCondition, ctx: &mut Context) -> String {
    match cond {
        TestCondition::Unary { op, arg } => unary_test_expr(*op, &word_to_expr(arg, ctx)),
        TestCondition::Binary { op, left, right } => {
            let l = word_to_expr(left, ctx);
            let r = word_to_expr(right, ctx);
            if *op == BinaryTestOp::Regex && !right.quoted {
                // `=~`'s right-hand side is an already-ERE pattern, not a
                // glob, so it passes through untranslated; only check that
                // the host regex engine would also accept it, since a
                // pattern `regex` rejects is one Deno's RegExp is likely to
                // reject too.
                if regex::Regex::new(&right.raw).is_err() {
                    ctx.add_diagnostic(
                        crate::diagnostics::Diagnostic::warning(format!(
                            "`=~` pattern `{}` is not a valid regular expression",
                            right.raw
                        ))
                        .with_code("invalid-regex-operand"),
                    );
                }
            }
            binary_test_expr(*op, &l, &r)
        }
        TestCondition::Logical { op, left, right } => {
            let l = test_condition_expr(left, ctx);
            match (op, right) {
                (LogicalOp::Not, None) => format!("!({l})"),
                (LogicalOp::And, Some(right)) => format!("({l} && {})", test_condition_expr(right, ctx)),
                (LogicalOp::Or, Some(right)) => format!("({l} || {})", test_condition_expr(right, ctx)),
                _ => l,
            }
        }
        TestCondition::StringTest(word) => format!("({} !== \"\")", word_to_expr(word, ctx)),
    }
}

fn unary_test_expr(op: UnaryTestOp, arg: &str) -> String {
    match op {
        UnaryTestOp::FileExists => format!("await $.fs.exists({arg})"),
        UnaryTestOp::FileRegular => format!("(await $.fs.stat({arg}))?.isFile ?? false"),
        UnaryTestOp::FileDirectory => format!("(await $.fs.stat({arg}))?.isDirectory ?? false"),
        UnaryTestOp::FileSymlink => format!("(await $.fs.stat({arg}))?.isSymlink ?? false"),
        UnaryTestOp::FileBlock => format!("(await $.fs.stat({arg}))?.isBlockDevice ?? false"),
        UnaryTestOp::FileChar => format!("(await $.fs.stat({arg}))?.isCharDevice ?? false"),
        UnaryTestOp::FilePipe => format!("(await $.fs.stat({arg}))?.isFifo ?? false"),
        UnaryTestOp::FileSocket => format!("(await $.fs.stat({arg}))?.isSocket ?? false"),
        UnaryTestOp::FileReadable => format!("await $.fs.readable({arg})"),
        UnaryTestOp::FileWritable => format!("await $.fs.writable({arg})"),
        UnaryTestOp::FileExecutable => format!("await $.fs.executable({arg})"),
        UnaryTestOp::FileNonEmpty => format!("((await $.fs.stat({arg}))?.size ?? 0) > 0"),
        UnaryTestOp::FileSetGid => format!("(await $.fs.stat({arg}))?.setGid ?? false"),
        UnaryTestOp::FileSetUid => format!("(await $.fs.stat({arg}))?.setUid ?? false"),
        UnaryTestOp::FileSticky => format!("(await $.fs.stat({arg}))?.sticky ?? false"),
        UnaryTestOp::FileTerminal => format!("Deno.isatty({arg})"),
        UnaryTestOp::FileOwnedByUser => format!("(await $.fs.stat({arg}))?.ownedByUser ?? false"),
        UnaryTestOp::FileOwnedByGroup => format!("(await $.fs.stat({arg}))?.ownedByGroup ?? false"),
        UnaryTestOp::FileModifiedSinceRead => format!("(await $.fs.stat({arg}))?.modifiedSinceRead ?? false"),
        UnaryTestOp::StringEmpty => format!("({arg} === \"\")"),
        UnaryTestOp::StringNonEmpty => format!("({arg} !== \"\")"),
    }
}

fn binary_test_expr(op: BinaryTestOp, l: &str, r: &str) -> String {
    match op {
        BinaryTestOp::StringEq => format!("({l} === {r})"),
        BinaryTestOp::StringNe => format!("({l} !== {r})"),
        BinaryTestOp::StringLt => format!("({l} < {r})"),
        BinaryTestOp::StringGt => format!("({l} > {r})"),
        BinaryTestOp::Regex => format!("new RegExp({r}).test({l})"),
        BinaryTestOp::IntEq => format!("($.num({l}) === $.num({r}))"),
        BinaryTestOp::IntNe => format!("($.num({l}) !== $.num({r}))"),
        BinaryTestOp::IntLt => format!("($.num({l}) < $.num({r}))"),
        BinaryTestOp::IntLe => format!("($.num({l}) <= $.num({r}))"),
        BinaryTestOp::IntGt => format!("($.num({l}) > $.num({r}))"),
        BinaryTestOp::IntGe => format!("($.num({l}) >= $.num({r}))"),
        BinaryTestOp::FileNewer => format!("await $.fs.newerThan({l}, {r})"),
        BinaryTestOp::FileOlder => format!("await $.fs.newerThan({r}, {l})"),
        BinaryTestOp::FileSameInode => format!("await $.fs.sameFile({l}, {r})"),
    }
}

/// Translates a glob pattern `Word` (case clause pattern, or a test-
/// operand pattern) into an equality test when it is a pure literal, or
/// a regex match when it contains glob metacharacters: each clause
/// pattern becomes either an equality test or a regex match.
pub(super) fn pattern_match_expr(pattern: &crate::ast::Word, scrutinee_expr: &str, ctx: &mut Context) -> String {
    if pattern.raw == "*" {
        return "true".to_string();
    }
    if !pattern.single_quoted && is_plain_glob(&pattern.raw) {
        let regex = crate::wordparse::glob_to_validated_regex(&pattern.raw, ctx);
        return format!("new RegExp({}).test({scrutinee_expr})", crate::emitter::escape::double_quote(&regex));
    }
    format!("({scrutinee_expr} === {})", crate::emitter::escape::double_quote(&pattern.raw))
}

fn is_plain_glob(s: &str) -> bool {
    s.chars().any(|c| matches!(c, '*' | '?' | '['))
}
