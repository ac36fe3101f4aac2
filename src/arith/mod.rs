//! Arithmetic expression parser.
//!
//! A small Pratt parser over the token set used inside `$((...))`,
//! `((...))`, and C-style `for` headers. Precedence matches C/Bash,
//! lowest to highest: `,`; assignment (right-assoc); ternary `?:`
//! (right-assoc); `||`; `&&`; `|`; `^`; `&`; `== !=`; `< <= > >=`;
//! `<< >>`; `+ -`; `* / %`; unary prefix; `**` (right-assoc); postfix
//! `++ --`; primary.

#[cfg(test)]
mod tests;

use crate::ast::{ArithAssignOp, ArithBinOp, ArithUnaryOp, ArithmeticExpression};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    #[error("unexpected end of arithmetic expression")]
    UnexpectedEof,
    #[error("unexpected token '{0}' in arithmetic expression")]
    UnexpectedToken(String),
    #[error("expected ')' in arithmetic expression, found '{0}'")]
    ExpectedCloseParen(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Number(i64),
    Ident(String),
    Op(&'static str),
    Eof,
}

struct ArithLexer {
    chars: Vec<char>,
    pos: usize,
}

impl ArithLexer {
    fn new(src: &str) -> Self {
        Self { chars: src.chars().collect(), pos: 0 }
    }

    fn tokenize(mut self) -> Result<Vec<Tok>, ArithError> {
        const OPS: &[&str] = &[
            "<<=", ">>=", "**", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++", "--",
            "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "?", ":", ",", "+", "-", "*", "/",
            "%", "<", ">", "!", "~", "&", "|", "^", "=", "(", ")",
        ];
        let mut out = Vec::new();
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            if c.is_ascii_digit() {
                let start = self.pos;
                while self.pos < self.chars.len()
                    && (self.chars[self.pos].is_ascii_alphanumeric())
                {
                    self.pos += 1;
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                let n = parse_integer_literal(&text)
                    .ok_or_else(|| ArithError::UnexpectedToken(text.clone()))?;
                out.push(Tok::Number(n));
                continue;
            }
            if c.is_alphabetic() || c == '_' {
                let start = self.pos;
                while self.pos < self.chars.len()
                    && (self.chars[self.pos].is_alphanumeric() || self.chars[self.pos] == '_')
                {
                    self.pos += 1;
                }
                out.push(Tok::Ident(self.chars[start..self.pos].iter().collect()));
                continue;
            }
            let rest: String = self.chars[self.pos..].iter().collect();
            let matched = OPS.iter().find(|op| rest.starts_with(*op));
            match matched {
                Some(op) => {
                    self.pos += op.chars().count();
                    out.push(Tok::Op(op));
                }
                None => return Err(ArithError::UnexpectedToken(c.to_string())),
            }
        }
        out.push(Tok::Eof);
        Ok(out)
    }
}

fn parse_integer_literal(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    if text.len() > 1 && text.starts_with('0') && text.chars().all(|c| c.is_ascii_digit()) {
        return i64::from_str_radix(&text[1..], 8).ok();
    }
    text.parse().ok()
}

struct ArithParser {
    toks: Vec<Tok>,
    pos: usize,
}

impl ArithParser {
    fn peek(&self) -> &Tok {
        &self.toks[self.pos]
    }

    fn bump(&mut self) -> Tok {
        let t = self.toks[self.pos].clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        t
    }

    fn expect_op(&mut self, op: &'static str) -> Result<(), ArithError> {
        match self.bump() {
            Tok::Op(o) if o == op => Ok(()),
            Tok::Eof => Err(ArithError::UnexpectedEof),
            other => Err(ArithError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    fn parse_expression(&mut self) -> Result<ArithmeticExpression, ArithError> {
        let first = self.parse_assignment()?;
        if matches!(self.peek(), Tok::Op(",")) {
            self.bump();
            let rest = self.parse_expression()?;
            return Ok(ArithmeticExpression::Binary {
                op: ArithBinOp::Comma,
                left: Box::new(first),
                right: Box::new(rest),
            });
        }
        Ok(first)
    }

    fn parse_assignment(&mut self) -> Result<ArithmeticExpression, ArithError> {
        // identifier op=? lookahead
        if let Tok::Ident(name) = self.peek().clone() {
            let save = self.pos;
            self.bump();
            let assign_op = match self.peek() {
                Tok::Op("=") => Some(ArithAssignOp::Assign),
                Tok::Op("+=") => Some(ArithAssignOp::AddAssign),
                Tok::Op("-=") => Some(ArithAssignOp::SubAssign),
                Tok::Op("*=") => Some(ArithAssignOp::MulAssign),
                Tok::Op("/=") => Some(ArithAssignOp::DivAssign),
                Tok::Op("%=") => Some(ArithAssignOp::ModAssign),
                Tok::Op("&=") => Some(ArithAssignOp::AndAssign),
                Tok::Op("|=") => Some(ArithAssignOp::OrAssign),
                Tok::Op("^=") => Some(ArithAssignOp::XorAssign),
                Tok::Op("<<=") => Some(ArithAssignOp::ShlAssign),
                Tok::Op(">>=") => Some(ArithAssignOp::ShrAssign),
                _ => None,
            };
            if let Some(op) = assign_op {
                self.bump();
                let value = self.parse_assignment()?;
                return Ok(ArithmeticExpression::Assignment { op, target: name, value: Box::new(value) });
            }
            self.pos = save;
        }
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<ArithmeticExpression, ArithError> {
        let cond = self.parse_binary(0)?;
        if matches!(self.peek(), Tok::Op("?")) {
            self.bump();
            let then_branch = self.parse_assignment()?;
            self.expect_op(":")?;
            let else_branch = self.parse_assignment()?;
            return Ok(ArithmeticExpression::Conditional {
                condition: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(cond)
    }

    /// Binary-operator precedence climbing. Levels, low to high.
    fn level_ops(level: usize) -> &'static [(&'static str, ArithBinOp)] {
        match level {
            0 => &[("||", ArithBinOp::LogOr)],
            1 => &[("&&", ArithBinOp::LogAnd)],
            2 => &[("|", ArithBinOp::BitOr)],
            3 => &[("^", ArithBinOp::BitXor)],
            4 => &[("&", ArithBinOp::BitAnd)],
            5 => &[("==", ArithBinOp::Eq), ("!=", ArithBinOp::Ne)],
            6 => &[
                ("<=", ArithBinOp::Le),
                (">=", ArithBinOp::Ge),
                ("<", ArithBinOp::Lt),
                (">", ArithBinOp::Gt),
            ],
            7 => &[("<<", ArithBinOp::Shl), (">>", ArithBinOp::Shr)],
            8 => &[("+", ArithBinOp::Add), ("-", ArithBinOp::Sub)],
            9 => &[("*", ArithBinOp::Mul), ("/", ArithBinOp::Div), ("%", ArithBinOp::Mod)],
            _ => &[],
        }
    }

    const MAX_LEVEL: usize = 9;

    fn parse_binary(&mut self, level: usize) -> Result<ArithmeticExpression, ArithError> {
        if level > Self::MAX_LEVEL {
            return self.parse_unary();
        }
        let mut left = self.parse_binary(level + 1)?;
        loop {
            let ops = Self::level_ops(level);
            let matched = match self.peek() {
                Tok::Op(o) => ops.iter().find(|(lex, _)| lex == o).cloned(),
                _ => None,
            };
            match matched {
                Some((_, op)) => {
                    self.bump();
                    let right = self.parse_binary(level + 1)?;
                    left = ArithmeticExpression::Binary { op, left: Box::new(left), right: Box::new(right) };
                }
                None => break,
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ArithmeticExpression, ArithError> {
        match self.peek().clone() {
            Tok::Op("-") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::Negate, operand: Box::new(operand) })
            }
            Tok::Op("+") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::Plus, operand: Box::new(operand) })
            }
            Tok::Op("!") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::LogNot, operand: Box::new(operand) })
            }
            Tok::Op("~") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::BitNot, operand: Box::new(operand) })
            }
            Tok::Op("++") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::PreIncrement, operand: Box::new(operand) })
            }
            Tok::Op("--") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::PreDecrement, operand: Box::new(operand) })
            }
            _ => self.parse_power(),
        }
    }

    /// `**` is right-associative and binds tighter than unary prefix
    /// operators applied to its left operand, but its own operands are
    /// postfix-level primaries.
    fn parse_power(&mut self) -> Result<ArithmeticExpression, ArithError> {
        let base = self.parse_postfix()?;
        if matches!(self.peek(), Tok::Op("**")) {
            self.bump();
            let exp = self.parse_unary()?;
            return Ok(ArithmeticExpression::Binary {
                op: ArithBinOp::Pow,
                left: Box::new(base),
                right: Box::new(exp),
            });
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<ArithmeticExpression, ArithError> {
        let primary = self.parse_primary()?;
        match self.peek() {
            Tok::Op("++") => {
                self.bump();
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::PostIncrement, operand: Box::new(primary) })
            }
            Tok::Op("--") => {
                self.bump();
                Ok(ArithmeticExpression::Unary { op: ArithUnaryOp::PostDecrement, operand: Box::new(primary) })
            }
            _ => Ok(primary),
        }
    }

    fn parse_primary(&mut self) -> Result<ArithmeticExpression, ArithError> {
        match self.bump() {
            Tok::Number(n) => Ok(ArithmeticExpression::Number(n)),
            Tok::Ident(name) => Ok(ArithmeticExpression::Variable(name)),
            Tok::Op("(") => {
                let inner = self.parse_expression()?;
                match self.bump() {
                    Tok::Op(")") => Ok(ArithmeticExpression::Grouped(Box::new(inner))),
                    other => Err(ArithError::ExpectedCloseParen(format!("{other:?}"))),
                }
            }
            Tok::Eof => Err(ArithError::UnexpectedEof),
            other => Err(ArithError::UnexpectedToken(format!("{other:?}"))),
        }
    }
}

/// Parses a raw arithmetic-expression string (the inner text of
/// `$((...))`, `((...))`, or one field of a C-style `for` header) into
/// an [`ArithmeticExpression`].
pub fn parse_arithmetic(src: &str) -> Result<ArithmeticExpression, ArithError> {
    let tokens = ArithLexer::new(src).tokenize()?;
    let mut parser = ArithParser { toks: tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    match parser.peek() {
        Tok::Eof => Ok(expr),
        other => Err(ArithError::UnexpectedToken(format!("{other:?}"))),
    }
}

/// Parses an optional arithmetic field (C-style `for` header parts may be
/// empty, e.g. `for ((;;))`).
pub fn parse_arithmetic_opt(src: &str) -> Result<Option<ArithmeticExpression>, ArithError> {
    if src.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(parse_arithmetic(src)?))
    }
}
