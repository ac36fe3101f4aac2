//! `[[ ... ]]` Pratt-style sub-parser.
//!
//! Precedence low to high: `||`, `&&`, unary `!`, parenthesized
//! subexpressions, then a primary of `UnaryOp word`, `word BinaryOp
//! word`, or a bare word (`StringTest`). Operator recognition is driven
//! by fixed tables, not scattered `match` arms.

use super::{ParseError, Parser};
use crate::ast::{BinaryTestOp, LogicalOp, TestCondition, UnaryTestOp, Word};
use crate::lexer::TokenKind;

static UNARY_TEST_OPS: phf::Map<&'static str, UnaryTestOp> = phf::phf_map! {
    "-e" => UnaryTestOp::FileExists,
    "-f" => UnaryTestOp::FileRegular,
    "-d" => UnaryTestOp::FileDirectory,
    "-L" => UnaryTestOp::FileSymlink,
    "-h" => UnaryTestOp::FileSymlink,
    "-b" => UnaryTestOp::FileBlock,
    "-c" => UnaryTestOp::FileChar,
    "-p" => UnaryTestOp::FilePipe,
    "-S" => UnaryTestOp::FileSocket,
    "-r" => UnaryTestOp::FileReadable,
    "-w" => UnaryTestOp::FileWritable,
    "-x" => UnaryTestOp::FileExecutable,
    "-s" => UnaryTestOp::FileNonEmpty,
    "-g" => UnaryTestOp::FileSetGid,
    "-u" => UnaryTestOp::FileSetUid,
    "-k" => UnaryTestOp::FileSticky,
    "-t" => UnaryTestOp::FileTerminal,
    "-O" => UnaryTestOp::FileOwnedByUser,
    "-G" => UnaryTestOp::FileOwnedByGroup,
    "-N" => UnaryTestOp::FileModifiedSinceRead,
    "-z" => UnaryTestOp::StringEmpty,
    "-n" => UnaryTestOp::StringNonEmpty,
};

static BINARY_TEST_OPS: phf::Map<&'static str, BinaryTestOp> = phf::phf_map! {
    "==" => BinaryTestOp::StringEq,
    "=" => BinaryTestOp::StringEq,
    "!=" => BinaryTestOp::StringNe,
    "<" => BinaryTestOp::StringLt,
    ">" => BinaryTestOp::StringGt,
    "=~" => BinaryTestOp::Regex,
    "-eq" => BinaryTestOp::IntEq,
    "-ne" => BinaryTestOp::IntNe,
    "-lt" => BinaryTestOp::IntLt,
    "-le" => BinaryTestOp::IntLe,
    "-gt" => BinaryTestOp::IntGt,
    "-ge" => BinaryTestOp::IntGe,
    "-nt" => BinaryTestOp::FileNewer,
    "-ot" => BinaryTestOp::FileOlder,
    "-ef" => BinaryTestOp::FileSameInode,
};

pub(super) fn parse_test_condition(p: &mut Parser) -> Result<TestCondition, ParseError> {
    parse_or(p)
}

fn parse_or(p: &mut Parser) -> Result<TestCondition, ParseError> {
    let mut left = parse_and(p)?;
    while p.at(TokenKind::OrOr) {
        p.bump();
        let right = parse_and(p)?;
        left = TestCondition::Logical { op: LogicalOp::Or, left: Box::new(left), right: Some(Box::new(right)) };
    }
    Ok(left)
}

fn parse_and(p: &mut Parser) -> Result<TestCondition, ParseError> {
    let mut left = parse_unary(p)?;
    while p.at(TokenKind::AndAnd) {
        p.bump();
        let right = parse_unary(p)?;
        left = TestCondition::Logical { op: LogicalOp::And, left: Box::new(left), right: Some(Box::new(right)) };
    }
    Ok(left)
}

fn parse_unary(p: &mut Parser) -> Result<TestCondition, ParseError> {
    if p.at(TokenKind::Bang) {
        p.bump();
        let operand = parse_unary(p)?;
        return Ok(TestCondition::Logical { op: LogicalOp::Not, left: Box::new(operand), right: None });
    }
    if p.at(TokenKind::LParen) {
        p.bump();
        let inner = parse_or(p)?;
        p.expect(TokenKind::RParen, "')'")?;
        return Ok(inner);
    }
    parse_primary(p)
}

fn parse_primary(p: &mut Parser) -> Result<TestCondition, ParseError> {
    if p.at(TokenKind::Word) && UNARY_TEST_OPS.contains_key(p.current().lexeme.as_str()) {
        let op_word = p.parse_word()?;
        let op = UNARY_TEST_OPS
            .get(op_word.raw.as_str())
            .copied()
            .ok_or_else(|| ParseError::UnexpectedToken {
                expected: "unary test operator".to_string(),
                found: op_word.raw.clone(),
                line: op_word.span.line,
                column: op_word.span.column,
            })?;
        let arg = parse_operand(p)?;
        return Ok(TestCondition::Unary { op, arg });
    }

    let left = parse_operand(p)?;

    if let Some(op) = try_consume_binary_op(p) {
        let right = parse_operand(p)?;
        return Ok(TestCondition::Binary { op, left, right });
    }

    Ok(TestCondition::StringTest(left))
}

/// Parses a single operand word. `!` may appear here as a bare argument,
/// so it is accepted alongside Word/Name/Number.
fn parse_operand(p: &mut Parser) -> Result<Word, ParseError> {
    if p.at(TokenKind::Bang) {
        let tok = p.bump();
        return Ok(Word::literal(tok.lexeme));
    }
    p.parse_word()
}

/// Recognizes and consumes a binary test operator at the current
/// position, handling the `!=` case that the lexer splits into a BANG
/// token directly followed by a WORD `"="` (the lexer never special-cases
/// `!` beyond a single character — see `lexer::read_operator`).
fn try_consume_binary_op(p: &mut Parser) -> Option<BinaryTestOp> {
    if p.at(TokenKind::Bang) {
        let bang = p.current().clone();
        let next = p.peek().clone();
        if next.kind == TokenKind::Word && next.lexeme == "=" && bang.byte_end == next.byte_start {
            p.bump();
            p.bump();
            return Some(BinaryTestOp::StringNe);
        }
        return None;
    }
    let lexeme = p.current().lexeme.clone();
    let kind = p.current().kind.clone();
    let candidate = match kind {
        TokenKind::Less => Some("<"),
        TokenKind::Great => Some(">"),
        TokenKind::Word => BINARY_TEST_OPS.contains_key(lexeme.as_str()).then_some(lexeme.as_str()),
        _ => None,
    };
    if let Some(op) = candidate.and_then(|lex| BINARY_TEST_OPS.get(lex)) {
        p.bump();
        Some(*op)
    } else {
        None
    }
}
