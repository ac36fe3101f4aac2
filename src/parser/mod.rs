//! Recursive-descent parser.
//!
//! One-token lookahead (`current`/`peek`), a context stack for
//! construct-scoped diagnostics, and two entry points: [`parse`] (strict,
//! stops at the first error) and [`parse_with_recovery`] (collects
//! [`Diagnostic`]s and resynchronizes).

#[cfg(test)]
mod tests;
mod test_command;

use crate::arith::{self, ArithError};
use crate::ast::*;
use crate::diagnostics::{Diagnostic, Span};
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected token {found} (expected {expected}) at line {line}, column {column}")]
    UnexpectedToken { expected: String, found: String, line: usize, column: usize },
    #[error("unexpected end of input (expected {expected})")]
    UnexpectedEof { expected: String },
    #[error("{0}")]
    Arith(String),
    #[error("'{construct}' started at line {line} was never closed")]
    UnclosedConstruct { construct: String, line: usize },
}

impl From<ArithError> for ParseError {
    fn from(e: ArithError) -> Self {
        ParseError::Arith(e.to_string())
    }
}

/// A frame on the parser's construct context stack, used to build
/// "in 'X' started at line L" diagnostic suffixes.
#[derive(Debug, Clone)]
struct ContextFrame {
    kind: &'static str,
    identifier: Option<String>,
    line: usize,
}

impl ContextFrame {
    fn describe(&self) -> String {
        match &self.identifier {
            Some(id) => format!("'{} {}' started at line {}", self.kind, id, self.line),
            None => format!("'{}' started at line {}", self.kind, self.line),
        }
    }
}

/// Tokens that end a statement list for a given enclosing construct —
/// the resynchronization set used by recovery-mode parsing.
const RECOVERY_STOP: &[TokenKind] = &[
    TokenKind::Newline,
    TokenKind::Semicolon,
    TokenKind::Eof,
    TokenKind::Fi,
    TokenKind::Done,
    TokenKind::Esac,
    TokenKind::RBrace,
    TokenKind::RParen,
];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    recovery: bool,
    diagnostics: Vec<Diagnostic>,
    context: Vec<ContextFrame>,
    /// Names declared via `function`/shorthand definitions seen so far,
    /// used by the generator's user-function-call strategy — tracked
    /// here too since it is cheap and the parser already walks every
    /// statement once.
    known_functions: Vec<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>, recovery: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            recovery,
            diagnostics: Vec::new(),
            context: Vec::new(),
            known_functions: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn span(&self) -> Span {
        self.current().span()
    }

    fn expect(&mut self, kind: TokenKind, expected_desc: &str) -> Result<Token, ParseError> {
        if self.current().kind == kind {
            Ok(self.bump())
        } else if self.at(TokenKind::Eof) {
            Err(ParseError::UnexpectedEof { expected: expected_desc.to_string() })
        } else {
            let tok = self.current().clone();
            Err(ParseError::UnexpectedToken {
                expected: expected_desc.to_string(),
                found: format!("{:?}", tok.kind),
                line: tok.line,
                column: tok.column,
            })
        }
    }

    fn context_description(&self) -> Option<String> {
        self.context.last().map(|f| f.describe())
    }

    fn skip_separators(&mut self) {
        while matches!(self.current().kind, TokenKind::Newline | TokenKind::Semicolon | TokenKind::Comment) {
            self.bump();
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.current().kind, TokenKind::Newline | TokenKind::Comment) {
            self.bump();
        }
    }

    // -------------------------------------------------------------
    // Top level
    // -------------------------------------------------------------

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.at(TokenKind::Eof) {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    if self.recovery {
                        self.record_error(e);
                        self.resynchronize();
                    } else {
                        return Err(e);
                    }
                }
            }
        }
        Ok(Program { statements })
    }

    fn record_error(&mut self, e: ParseError) {
        let ctx = self.context_description();
        let mut diag = Diagnostic::error(e.to_string()).with_code("parse-error");
        if let Some(ctx) = ctx {
            diag = diag.with_context(ctx);
        }
        self.diagnostics.push(diag.with_span(self.span()));
    }

    fn resynchronize(&mut self) {
        self.context.clear();
        while !RECOVERY_STOP.contains(&self.current().kind) {
            self.bump();
        }
        if matches!(self.current().kind, TokenKind::Newline | TokenKind::Semicolon) {
            self.bump();
        }
    }

    // -------------------------------------------------------------
    // Statement dispatch
    // -------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current().kind {
            TokenKind::If => self.parse_if().map(Statement::If),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while().map(Statement::While),
            TokenKind::Until => self.parse_until().map(Statement::Until),
            TokenKind::Case => self.parse_case().map(Statement::Case),
            TokenKind::Function => self.parse_function_keyword().map(Statement::Function),
            TokenKind::DBrackStart => self.parse_test_command().map(Statement::TestCommand),
            TokenKind::DParenStart => self.parse_arithmetic_command().map(Statement::ArithmeticCommand),
            TokenKind::LParen => self.parse_subshell().map(Statement::Subshell),
            TokenKind::LBrace => self.parse_brace_group().map(Statement::BraceGroup),
            TokenKind::Name if self.peek().kind == TokenKind::LParen => {
                self.parse_function_shorthand().map(Statement::Function)
            }
            _ => self.parse_pipeline_statement(),
        }
    }

    fn parse_statement_list(&mut self, terminators: &[TokenKind]) -> Result<Vec<Statement>, ParseError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if terminators.contains(&self.current().kind) || self.at(TokenKind::Eof) {
                break;
            }
            match self.parse_statement() {
                Ok(s) => stmts.push(s),
                Err(e) => {
                    if self.recovery {
                        self.record_error(e);
                        self.resynchronize_within(terminators);
                        if terminators.contains(&self.current().kind) || self.at(TokenKind::Eof) {
                            break;
                        }
                    } else {
                        return Err(e);
                    }
                }
            }
        }
        Ok(stmts)
    }

    fn resynchronize_within(&mut self, terminators: &[TokenKind]) {
        loop {
            let k = self.current().kind.clone();
            if RECOVERY_STOP.contains(&k) || terminators.contains(&k) {
                break;
            }
            self.bump();
        }
        if matches!(self.current().kind, TokenKind::Newline | TokenKind::Semicolon) && !terminators.contains(&self.current().kind) {
            self.bump();
        }
    }

    // -------------------------------------------------------------
    // Pipelines and commands
    // -------------------------------------------------------------

    fn parse_pipeline_statement(&mut self) -> Result<Statement, ParseError> {
        Ok(Statement::Pipeline(self.parse_pipeline()?))
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline, ParseError> {
        let start = self.span();
        let first = self.parse_compound_or_command()?;
        let mut stages = vec![first];
        let mut operator: Option<PipeOperator> = None;
        loop {
            let op = match self.current().kind {
                TokenKind::Pipe => PipeOperator::Pipe,
                TokenKind::PipeAmp => PipeOperator::PipeMerge,
                TokenKind::AndAnd => PipeOperator::And,
                TokenKind::OrOr => PipeOperator::Or,
                _ => break,
            };
            if let Some(existing) = operator {
                if existing != op {
                    // Differing operator: wrap what we have so far as the
                    // left side of a new, outer pipeline (left-associative
                    // tree case).
                    let left = Pipeline { stages: std::mem::take(&mut stages), operator: Some(existing), background: false, span: start };
                    self.bump();
                    self.skip_newlines();
                    let right = self.parse_compound_or_command()?;
                    stages = vec![Statement::Pipeline(left), right];
                    operator = Some(op);
                    continue;
                }
            } else {
                operator = Some(op);
            }
            self.bump();
            self.skip_newlines();
            stages.push(self.parse_compound_or_command()?);
        }
        let background = if self.at(TokenKind::Amp) {
            self.bump();
            true
        } else {
            false
        };
        Ok(Pipeline { stages, operator, background, span: start })
    }

    /// A pipeline stage may itself be a compound statement (`if ... | cat`
    /// is valid Bash) as well as a plain simple command.
    fn parse_compound_or_command(&mut self) -> Result<Statement, ParseError> {
        match self.current().kind {
            TokenKind::If => self.parse_if().map(Statement::If),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while().map(Statement::While),
            TokenKind::Until => self.parse_until().map(Statement::Until),
            TokenKind::Case => self.parse_case().map(Statement::Case),
            TokenKind::Function => self.parse_function_keyword().map(Statement::Function),
            TokenKind::DBrackStart => self.parse_test_command().map(Statement::TestCommand),
            TokenKind::DParenStart => self.parse_arithmetic_command().map(Statement::ArithmeticCommand),
            TokenKind::LParen => self.parse_subshell().map(Statement::Subshell),
            TokenKind::LBrace => self.parse_brace_group().map(Statement::BraceGroup),
            TokenKind::Name if self.peek().kind == TokenKind::LParen => {
                self.parse_function_shorthand().map(Statement::Function)
            }
            _ => self.parse_command().map(Statement::Command),
        }
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let start = self.span();
        let mut assignments = Vec::new();
        while self.at(TokenKind::AssignmentWord) {
            let tok = self.bump();
            let (name, value_text) = split_assignment(&tok.lexeme);
            let (parts, mut ds) = crate::wordparse::parse_word_parts(&value_text, false);
            self.diagnostics.append(&mut ds);
            assignments.push(VariableAssignment {
                name,
                value: Word { raw: value_text, quoted: false, single_quoted: false, parts, span: tok.span() },
                span: tok.span(),
            });
        }

        let name = if matches!(self.current().kind, TokenKind::Name | TokenKind::Word) {
            self.parse_word()?
        } else {
            Word::literal("")
        };

        let mut args = Vec::new();
        let mut redirects = Vec::new();
        loop {
            let kind = self.current().kind.clone();
            match kind {
                TokenKind::Number if is_redirect_op(&self.peek().kind) => {
                    let fd_tok = self.bump();
                    redirects.push(self.parse_redirect(fd_tok.lexeme.parse::<i32>().ok())?);
                }
                k if is_redirect_op(&k) => {
                    redirects.push(self.parse_redirect(None)?);
                }
                TokenKind::LessLParen | TokenKind::GreatLParen => {
                    args.push(self.parse_process_substitution_word()?);
                }
                TokenKind::Word | TokenKind::Name | TokenKind::Number | TokenKind::Bang => {
                    args.push(self.parse_word()?);
                }
                _ => break,
            }
        }

        Ok(Command { name, args, assignments, redirects, span: start })
    }

    fn parse_word(&mut self) -> Result<Word, ParseError> {
        let tok = self.bump();
        let (parts, mut ds) = if tok.single_quoted {
            crate::wordparse::parse_word_parts(&tok.lexeme, true)
        } else {
            crate::wordparse::parse_word_parts(&tok.lexeme, false)
        };
        self.diagnostics.append(&mut ds);
        Ok(Word { raw: tok.lexeme, quoted: tok.quoted, single_quoted: tok.single_quoted, parts, span: tok.span() })
    }

    /// Builds a synthetic `<(...)`/`>(...)` Word by collapsing the token
    /// stream back into source text and handing it to the word-part
    /// parser, which already knows how to recognize process substitution
    /// syntax character-by-character.
    fn parse_process_substitution_word(&mut self) -> Result<Word, ParseError> {
        let start_tok = self.bump();
        let prefix = if start_tok.kind == TokenKind::LessLParen { "<(" } else { ">(" };
        let mut depth = 1i32;
        let mut pieces = Vec::new();
        loop {
            if self.at(TokenKind::Eof) {
                return Err(ParseError::UnclosedConstruct { construct: "process substitution".into(), line: start_tok.line });
            }
            match self.current().kind {
                TokenKind::LParen | TokenKind::LessLParen | TokenKind::GreatLParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        break;
                    }
                }
                _ => {}
            }
            pieces.push(token_source_text(self.current()));
            self.bump();
        }
        let raw = format!("{prefix}{}) ", pieces.join(" "));
        let raw = raw.trim_end().to_string();
        let (parts, mut ds) = crate::wordparse::parse_word_parts(&raw, false);
        self.diagnostics.append(&mut ds);
        Ok(Word { raw, quoted: false, single_quoted: false, parts, span: start_tok.span() })
    }

    fn parse_redirect(&mut self, fd: Option<i32>) -> Result<Redirect, ParseError> {
        let op_tok = self.bump();
        let op_span = op_tok.span();
        let op = match op_tok.kind {
            TokenKind::Less => RedirectOp::Input,
            TokenKind::Great => RedirectOp::Output,
            TokenKind::DGreat => RedirectOp::Append,
            TokenKind::LessGreat => RedirectOp::InputOutput,
            TokenKind::Clobber => RedirectOp::Clobber,
            TokenKind::LessAnd => RedirectOp::DupInput,
            TokenKind::GreatAnd => RedirectOp::DupOutput,
            TokenKind::DLess => RedirectOp::HereDoc,
            TokenKind::DLessDash => RedirectOp::HereDocStrip,
            TokenKind::TLess => RedirectOp::HereString,
            TokenKind::AndGreat => RedirectOp::Combined,
            TokenKind::AndDGreat => RedirectOp::CombinedAppend,
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "redirection operator".into(),
                    found: format!("{other:?}"),
                    line: op_tok.line,
                    column: op_tok.column,
                })
            }
        };

        // `N>&M` / `N<&M` dup-target is a bare NUMBER, not a Word.
        let target = if matches!(op, RedirectOp::DupInput | RedirectOp::DupOutput) && self.at(TokenKind::Number) {
            let tok = self.bump();
            Word::literal(tok.lexeme)
        } else {
            self.parse_word()?
        };

        if matches!(op, RedirectOp::HereDoc | RedirectOp::HereDocStrip) {
            // The lexer already queued the body and spliced in a synthetic
            // WORD token right after the delimiter token; `target` above
            // *is* that delimiter token, which the lexer leaves untouched.
            // We re-read the following token as the actual heredoc body.
            if self.at(TokenKind::Word) {
                let body_tok = self.bump();
                let (parts, mut ds) = if body_tok.single_quoted {
                    crate::wordparse::parse_word_parts(&body_tok.lexeme, true)
                } else {
                    crate::wordparse::parse_word_parts(&body_tok.lexeme, false)
                };
                self.diagnostics.append(&mut ds);
                let body = Word {
                    raw: body_tok.lexeme,
                    quoted: body_tok.quoted,
                    single_quoted: body_tok.single_quoted,
                    parts,
                    span: body_tok.span(),
                };
                return Ok(Redirect { op, target: body, fd, fd_var: None, span: op_tok.span() });
            }
        }

        Ok(Redirect { op, target, fd, fd_var: None, span: op_tok.span() })
    }

    // -------------------------------------------------------------
    // Control flow
    // -------------------------------------------------------------

    fn parse_if(&mut self) -> Result<IfStatement, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "if", identifier: None, line: start.line });
        self.bump(); // IF
        let test = Box::new(self.parse_pipeline()?);
        self.skip_separators();
        self.expect(TokenKind::Then, "'then'")?;
        let consequent = self.parse_statement_list(&[TokenKind::Elif, TokenKind::Else, TokenKind::Fi])?;
        let alternate = match self.current().kind {
            TokenKind::Elif => {
                let elif_start = self.span();
                self.bump();
                Some(IfAlternate::ElseIf(Box::new(self.parse_if_tail(elif_start)?)))
            }
            TokenKind::Else => {
                self.bump();
                let body = self.parse_statement_list(&[TokenKind::Fi])?;
                self.expect(TokenKind::Fi, "'fi'")?;
                Some(IfAlternate::Else(body))
            }
            _ => {
                self.expect(TokenKind::Fi, "'fi'")?;
                None
            }
        };
        self.context.pop();
        Ok(IfStatement { test, consequent, alternate, span: start })
    }

    /// Parses the body of an `elif` (which was already consumed by the
    /// caller) as if it were a fresh `if`, reusing the same tail grammar.
    fn parse_if_tail(&mut self, start: Span) -> Result<IfStatement, ParseError> {
        let test = Box::new(self.parse_pipeline()?);
        self.skip_separators();
        self.expect(TokenKind::Then, "'then'")?;
        let consequent = self.parse_statement_list(&[TokenKind::Elif, TokenKind::Else, TokenKind::Fi])?;
        let alternate = match self.current().kind {
            TokenKind::Elif => {
                let elif_start = self.span();
                self.bump();
                Some(IfAlternate::ElseIf(Box::new(self.parse_if_tail(elif_start)?)))
            }
            TokenKind::Else => {
                self.bump();
                let body = self.parse_statement_list(&[TokenKind::Fi])?;
                self.expect(TokenKind::Fi, "'fi'")?;
                Some(IfAlternate::Else(body))
            }
            _ => {
                self.expect(TokenKind::Fi, "'fi'")?;
                None
            }
        };
        Ok(IfStatement { test, consequent, alternate, span: start })
    }

    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();
        self.bump(); // FOR
        if self.at(TokenKind::DParenStart) {
            return self.parse_c_style_for(start).map(Statement::CStyleFor);
        }
        let name_tok = self.expect(TokenKind::Name, "loop variable name")?;
        self.context.push(ContextFrame { kind: "for", identifier: Some(name_tok.lexeme.clone()), line: start.line });
        self.skip_newlines();
        let mut items = Vec::new();
        if self.at(TokenKind::In) {
            self.bump();
            while matches!(self.current().kind, TokenKind::Word | TokenKind::Name | TokenKind::Number) {
                items.push(self.parse_word()?);
            }
        }
        self.skip_separators();
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_statement_list(&[TokenKind::Done])?;
        self.expect(TokenKind::Done, "'done'")?;
        self.context.pop();
        Ok(Statement::For(ForStatement { variable: name_tok.lexeme, items, body, span: start }))
    }

    fn parse_c_style_for(&mut self, start: Span) -> Result<CStyleForStatement, ParseError> {
        self.context.push(ContextFrame { kind: "for", identifier: None, line: start.line });
        self.bump(); // DPAREN_START
        let header = self.collect_until_dparen_end()?;
        let fields: Vec<&str> = split_top_level_semicolons(&header);
        let (init_s, test_s, update_s) = match fields.as_slice() {
            [a, b, c] => (*a, *b, *c),
            _ => ("", "", ""),
        };
        let init = arith::parse_arithmetic_opt(init_s)?;
        let test = arith::parse_arithmetic_opt(test_s)?;
        let update = arith::parse_arithmetic_opt(update_s)?;
        self.skip_newlines();
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_statement_list(&[TokenKind::Done])?;
        self.expect(TokenKind::Done, "'done'")?;
        self.context.pop();
        Ok(CStyleForStatement { init, test, update, body, span: start })
    }

    /// Consumes tokens up to (and including) the matching `))`, returning
    /// the concatenated lexemes.
    fn collect_until_dparen_end(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            if self.at(TokenKind::DParenEnd) {
                self.bump();
                break;
            }
            if self.at(TokenKind::Eof) {
                return Err(ParseError::UnclosedConstruct { construct: "((".into(), line: self.current().line });
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&self.bump().lexeme);
        }
        Ok(out)
    }

    fn parse_while(&mut self) -> Result<WhileStatement, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "while", identifier: None, line: start.line });
        self.bump();
        let test = Box::new(self.parse_pipeline()?);
        self.skip_separators();
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_statement_list(&[TokenKind::Done])?;
        self.expect(TokenKind::Done, "'done'")?;
        self.context.pop();
        Ok(WhileStatement { test, body, span: start })
    }

    fn parse_until(&mut self) -> Result<UntilStatement, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "until", identifier: None, line: start.line });
        self.bump();
        let test = Box::new(self.parse_pipeline()?);
        self.skip_separators();
        self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_statement_list(&[TokenKind::Done])?;
        self.expect(TokenKind::Done, "'done'")?;
        self.context.pop();
        Ok(UntilStatement { test, body, span: start })
    }

    fn parse_case(&mut self) -> Result<CaseStatement, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "case", identifier: None, line: start.line });
        self.bump(); // CASE
        let scrutinee = self.parse_word()?;
        self.skip_newlines();
        self.expect(TokenKind::In, "'in'")?;
        self.skip_separators();
        let mut clauses = Vec::new();
        while !matches!(self.current().kind, TokenKind::Esac | TokenKind::Eof) {
            if self.at(TokenKind::LParen) {
                self.bump();
            }
            let mut patterns = vec![self.parse_word()?];
            while self.at(TokenKind::Pipe) {
                self.bump();
                patterns.push(self.parse_word()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            self.skip_separators();
            let body = self.parse_statement_list(&[TokenKind::DSemi, TokenKind::Esac])?;
            if self.at(TokenKind::DSemi) {
                self.bump();
            }
            self.skip_separators();
            clauses.push(CaseClause { patterns, body });
        }
        self.expect(TokenKind::Esac, "'esac'")?;
        self.context.pop();
        Ok(CaseStatement { scrutinee, clauses, span: start })
    }

    fn parse_function_keyword(&mut self) -> Result<FunctionDeclaration, ParseError> {
        let start = self.span();
        self.bump(); // FUNCTION
        let name_tok = self.expect_name_like("function name")?;
        if self.at(TokenKind::LParen) {
            self.bump();
            self.expect(TokenKind::RParen, "')'")?;
        }
        self.finish_function(name_tok.lexeme, start)
    }

    fn parse_function_shorthand(&mut self) -> Result<FunctionDeclaration, ParseError> {
        let start = self.span();
        let name_tok = self.bump(); // NAME
        self.bump(); // LPAREN
        self.expect(TokenKind::RParen, "')'")?;
        self.finish_function(name_tok.lexeme, start)
    }

    fn finish_function(&mut self, name: String, start: Span) -> Result<FunctionDeclaration, ParseError> {
        self.context.push(ContextFrame { kind: "function", identifier: Some(name.clone()), line: start.line });
        self.skip_newlines();
        let body = match self.current().kind {
            TokenKind::LBrace => Statement::BraceGroup(self.parse_brace_group()?),
            TokenKind::LParen => Statement::Subshell(self.parse_subshell()?),
            _ => {
                let tok = self.current().clone();
                return Err(ParseError::UnexpectedToken {
                    expected: "'{' or '(' function body".into(),
                    found: format!("{:?}", tok.kind),
                    line: tok.line,
                    column: tok.column,
                });
            }
        };
        self.context.pop();
        self.known_functions.push(name.clone());
        Ok(FunctionDeclaration { name, body: Box::new(body), span: start })
    }

    fn expect_name_like(&mut self, desc: &str) -> Result<Token, ParseError> {
        if matches!(self.current().kind, TokenKind::Name | TokenKind::Word) {
            Ok(self.bump())
        } else {
            let tok = self.current().clone();
            Err(ParseError::UnexpectedToken {
                expected: desc.to_string(),
                found: format!("{:?}", tok.kind),
                line: tok.line,
                column: tok.column,
            })
        }
    }

    fn parse_subshell(&mut self) -> Result<Subshell, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "subshell", identifier: None, line: start.line });
        self.bump(); // LPAREN
        let body = self.parse_statement_list(&[TokenKind::RParen])?;
        self.expect(TokenKind::RParen, "')'")?;
        self.context.pop();
        Ok(Subshell { body, span: start })
    }

    fn parse_brace_group(&mut self) -> Result<BraceGroup, ParseError> {
        let start = self.span();
        self.context.push(ContextFrame { kind: "group", identifier: None, line: start.line });
        self.bump(); // LBRACE
        let body = self.parse_statement_list(&[TokenKind::RBrace])?;
        self.expect(TokenKind::RBrace, "'}'")?;
        self.context.pop();
        Ok(BraceGroup { body, span: start })
    }

    fn parse_arithmetic_command(&mut self) -> Result<ArithmeticCommand, ParseError> {
        let start = self.span();
        self.bump(); // DPAREN_START
        let text = self.collect_until_dparen_end()?;
        let expr = arith::parse_arithmetic(&text)?;
        Ok(ArithmeticCommand { expr, span: start })
    }

    fn parse_test_command(&mut self) -> Result<TestCommand, ParseError> {
        let start = self.span();
        self.bump(); // DBRACK_START
        let condition = test_command::parse_test_condition(self)?;
        self.expect(TokenKind::DBrackEnd, "']]'")?;
        Ok(TestCommand { condition, span: start })
    }
}

fn split_assignment(lexeme: &str) -> (String, String) {
    match lexeme.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (lexeme.to_string(), String::new()),
    }
}

fn is_redirect_op(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Less
            | TokenKind::Great
            | TokenKind::DGreat
            | TokenKind::DLess
            | TokenKind::DLessDash
            | TokenKind::TLess
            | TokenKind::LessAnd
            | TokenKind::GreatAnd
            | TokenKind::LessGreat
            | TokenKind::Clobber
            | TokenKind::AndGreat
            | TokenKind::AndDGreat
    )
}

fn split_top_level_semicolons(s: &str) -> Vec<&str> {
    // The C-style for header never contains nested quoting in practice;
    // a plain split is sufficient since the arithmetic lexer doesn't
    // understand quotes anyway.
    s.splitn(3, ';').map(|p| p.trim()).collect()
}

/// Re-renders a token's lexeme as it would have appeared in source,
/// restoring quote characters the lexer stripped (used when collapsing a
/// sub-range of tokens back into raw text, e.g. process substitution
/// bodies — see [`Parser::parse_process_substitution_word`]).
fn token_source_text(tok: &Token) -> String {
    if tok.single_quoted {
        format!("'{}'", tok.lexeme.replace('\'', "'\\''"))
    } else if tok.quoted {
        format!("\"{}\"", tok.lexeme.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        tok.lexeme.clone()
    }
}

/// Strict entry point: fails on the first lexical or parse error.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    tracing::debug!(tokens = tokens.len(), "lexed");
    let mut parser = Parser::new(tokens, false);
    let program = parser.parse_program()?;
    tracing::debug!(statements = program.statements.len(), "parsed (strict)");
    Ok(program)
}

/// Recovery entry point: always returns an AST, collecting diagnostics
/// for recoverable problems instead of failing. Lexical errors are fatal
/// even here since the token stream itself cannot be produced; they are
/// folded into the returned diagnostics with an empty partial program.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn parse_with_recovery(source: &str) -> (Program, Vec<Diagnostic>) {
    let tokens = match Lexer::new(source).tokenize() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "lex error, aborting with empty program");
            return (Program::empty(), vec![Diagnostic::error(e.to_string()).with_code("lex-error")]);
        }
    };
    tracing::debug!(tokens = tokens.len(), "lexed");
    let mut parser = Parser::new(tokens, true);
    let program = match parser.parse_program() {
        Ok(p) => p,
        Err(e) => {
            parser.record_error(e);
            Program::empty()
        }
    };
    tracing::debug!(
        statements = program.statements.len(),
        diagnostics = parser.diagnostics.len(),
        "parsed (recovery)"
    );
    (program, parser.diagnostics)
}
