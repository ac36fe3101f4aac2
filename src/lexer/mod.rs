//! Bash lexer.
//!
//! Tokenizes Bash source text into a flat token stream with location and
//! quote metadata. The lexer does not resolve expansions — `$(...)`,
//! `${...}`, and friends are left inside WORD lexemes for the word-part
//! parser (`crate::wordparse`) to pick apart later. This keeps the lexer
//! a single linear char-cursor pass with no recursive descent into
//! nested constructs.

mod operators;
#[cfg(test)]
mod tests;

pub use operators::lookup_operator;

use crate::diagnostics::Span;
use std::fmt;
use thiserror::Error;

/// The kind of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Name,
    Number,
    AssignmentWord,

    // Reserved words (contextual — see `Lexer::maybe_reserved`).
    If,
    Then,
    Elif,
    Else,
    Fi,
    For,
    In,
    Do,
    Done,
    While,
    Until,
    Case,
    Esac,
    Function,
    Bang,
    Local,
    Export,
    Readonly,

    // Operators.
    Pipe,       // |
    PipeAmp,    // |&
    AndAnd,     // &&
    OrOr,       // ||
    Amp,        // &
    Semicolon,  // ;
    DSemi,      // ;;
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    Less,       // <
    Great,      // >
    DGreat,     // >>
    DLess,      // <<
    DLessDash,  // <<-
    TLess,      // <<<
    LessAnd,    // <&
    GreatAnd,   // >&
    LessGreat,  // <>
    Clobber,    // >|
    AndGreat,   // &>
    AndDGreat,  // &>>
    LessLParen, // <(
    GreatLParen, // >(

    DBrackStart, // [[
    DBrackEnd,   // ]]
    DParenStart, // ((
    DParenEnd,   // ))

    Newline,
    Comment,
    Eof,
}

/// A single lexical token.
///
/// `quoted`/`single_quoted` travel with the token so the parser can
/// stash them on the `Word` it builds — quote flags must survive into
/// the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub byte_start: usize,
    pub byte_end: usize,
    pub line: usize,
    pub column: usize,
    pub quoted: bool,
    pub single_quoted: bool,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        &self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.lexeme)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated quote starting at line {0}, column {1}")]
    UnterminatedQuote(usize, usize),
    #[error("unterminated here-document '{0}' starting at line {1}, column {2}")]
    UnterminatedHereDoc(String, usize, usize),
    #[error("invalid ANSI-C escape in $'...' at line {0}, column {1}")]
    BadAnsiCEscape(usize, usize),
}

/// Pending here-document request collected while scanning a line; resolved
/// against the following raw lines once the triggering NEWLINE is reached.
struct PendingHereDoc {
    delimiter: String,
    strip_tabs: bool,
    quoted: bool,
    token_index: usize,
}

/// Tracks the `for`/`case` grammar position needed to recognize `in` as
/// a reserved word outside of command-start position: `in` follows the
/// `for` loop variable or the `case` scrutinee word, neither of which is
/// itself a command-starting token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReservedCtx {
    None,
    SeenFor,
    AfterForVar,
    SeenCase,
    AfterCaseWord,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// True when the next WORD-shaped token could become a reserved word
    /// or an ASSIGNMENT_WORD — i.e. we are at the start of a simple
    /// command or immediately after another command-starting token.
    expect_command_start: bool,
    reserved_ctx: ReservedCtx,
    pending_heredocs: Vec<PendingHereDoc>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            expect_command_start: true,
            reserved_ctx: ReservedCtx::None,
            pending_heredocs: Vec::new(),
        }
    }

    /// Tokenize the entire input, stopping only at an unrecoverable
    /// lexical error (unterminated quote/here-doc). Unknown punctuation
    /// is folded into the surrounding WORD rather than treated as an
    /// error — unknown punctuation never aborts the whole lex.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_inline_whitespace();
            if self.is_at_end() {
                tokens.push(self.make_eof());
                break;
            }
            let tok = self.next_token()?;
            let is_newline = tok.kind == TokenKind::Newline;
            self.update_reserved_ctx(&tok);
            tokens.push(tok);
            self.maybe_queue_heredoc(&tokens);
            if is_newline {
                self.resolve_pending_heredocs(&mut tokens)?;
            }
        }
        Ok(tokens)
    }

    fn make_eof(&self) -> Token {
        Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            byte_start: self.position,
            byte_end: self.position,
            line: self.line,
            column: self.column,
            quoted: false,
            single_quoted: false,
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current(&self) -> char {
        self.input[self.position]
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> char {
        let c = self.input[self.position];
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn skip_inline_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.current() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    // line continuation: swallow both characters
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_byte = self.position;
        let ch = self.current();

        if ch == '#' {
            let text = self.read_comment();
            return Ok(self.finish(TokenKind::Comment, text, start_byte, start_line, start_col, false, false));
        }
        if ch == '\n' {
            self.advance();
            self.expect_command_start = true;
            return Ok(self.finish(TokenKind::Newline, "\n".into(), start_byte, start_line, start_col, false, false));
        }
        if ch == '\'' {
            let text = self.read_single_quoted()?;
            self.expect_command_start = false;
            return Ok(self.finish(TokenKind::Word, text, start_byte, start_line, start_col, true, true));
        }
        if ch == '"' {
            let text = self.read_double_quoted()?;
            self.expect_command_start = false;
            return Ok(self.finish(TokenKind::Word, text, start_byte, start_line, start_col, true, false));
        }
        if ch == '$' && self.peek_at(1) == Some('\'') {
            self.advance();
            let text = self.read_ansi_c_quoted()?;
            self.expect_command_start = false;
            return Ok(self.finish(TokenKind::Word, text, start_byte, start_line, start_col, true, true));
        }
        if ch.is_ascii_digit() {
            return self.read_number_or_word(start_byte, start_line, start_col);
        }
        if self.is_word_start(ch) {
            return self.read_identifier_or_word(start_byte, start_line, start_col);
        }
        self.read_operator(start_byte, start_line, start_col)
    }

    fn finish(
        &self,
        kind: TokenKind,
        lexeme: String,
        byte_start: usize,
        line: usize,
        column: usize,
        quoted: bool,
        single_quoted: bool,
    ) -> Token {
        Token {
            kind,
            lexeme,
            byte_start,
            byte_end: self.position,
            line,
            column,
            quoted,
            single_quoted,
        }
    }

    fn read_comment(&mut self) -> String {
        let mut s = String::new();
        while !self.is_at_end() && self.current() != '\n' {
            s.push(self.advance());
        }
        s
    }

    fn read_single_quoted(&mut self) -> Result<String, LexError> {
        let (line, col) = (self.line, self.column);
        self.advance(); // opening '
        let mut s = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedQuote(line, col));
            }
            let c = self.advance();
            if c == '\'' {
                break;
            }
            s.push(c);
        }
        Ok(s)
    }

    fn read_double_quoted(&mut self) -> Result<String, LexError> {
        let (line, col) = (self.line, self.column);
        self.advance(); // opening "
        let mut s = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedQuote(line, col));
            }
            let c = self.advance();
            if c == '"' {
                break;
            }
            if c == '\\' {
                if let Some(next) = self.peek_at(0) {
                    if matches!(next, '\\' | '$' | '`' | '"' | '\n') {
                        s.push(c);
                        s.push(self.advance());
                        continue;
                    }
                }
                s.push(c);
                continue;
            }
            s.push(c);
        }
        Ok(s)
    }

    fn read_ansi_c_quoted(&mut self) -> Result<String, LexError> {
        let (line, col) = (self.line, self.column);
        self.advance(); // opening '
        let mut s = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError::UnterminatedQuote(line, col));
            }
            let c = self.advance();
            if c == '\'' {
                break;
            }
            if c == '\\' {
                if self.is_at_end() {
                    return Err(LexError::BadAnsiCEscape(line, col));
                }
                let esc = self.advance();
                s.push(match esc {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'v' => '\u{b}',
                    '0' => '\0',
                    other => other,
                });
                continue;
            }
            s.push(c);
        }
        Ok(s)
    }

    fn is_word_start(&self, c: char) -> bool {
        if c == '{' || c == '}' {
            // `{`/`}` are reserved-word brace-group delimiters only when
            // they stand alone as their own token (`{ cmd; }`); stuck to
            // following text (`{1..3}`, `{a,b,c}`) they are ordinary word
            // characters so brace expansion sees them as one word.
            return !self.brace_stands_alone();
        }
        c.is_alphanumeric()
            || matches!(
                c,
                '_' | '/' | '.' | '-' | '*' | '~' | ':' | '+' | '%' | '@' | '^' | ','
                    | '$' | '`' | '='
            )
    }

    /// Whether the `{`/`}` at the current position is followed by a word
    /// boundary (blank, `;`, newline, or end of input) — the Bash rule
    /// for when a brace is its own reserved-word token rather than part
    /// of a word.
    fn brace_stands_alone(&self) -> bool {
        match self.peek_at(1) {
            None => true,
            Some(c) => c.is_whitespace() || matches!(c, ';' | '\n'),
        }
    }

    fn is_operator_lead(c: char) -> bool {
        matches!(c, '|' | '&' | ';' | '(' | ')' | '<' | '>' | '[')
    }

    /// Reads a run of digits; if it is immediately followed by a
    /// redirection lead (`<` or `>`) with nothing else attached, it is a
    /// NUMBER token (the fd prefix of a redirection). Otherwise the
    /// digits are just the start of an ordinary WORD/NAME and scanning
    /// continues into `read_identifier_or_word` semantics: `2>file` vs
    /// `two>file` disambiguation, but also `2file>x` must stay one WORD,
    /// not NUMBER+WORD.
    fn read_number_or_word(
        &mut self,
        start_byte: usize,
        start_line: usize,
        start_col: usize,
    ) -> Result<Token, LexError> {
        let mut digits = String::new();
        while !self.is_at_end() && self.current().is_ascii_digit() {
            digits.push(self.advance());
        }
        let next_is_redirect = matches!(self.peek_at(0), Some('<') | Some('>'));
        let next_continues_word = !self.is_at_end() && self.is_word_start(self.current());

        if next_is_redirect && !next_continues_word {
            self.expect_command_start = false;
            return Ok(self.finish(
                TokenKind::Number,
                digits,
                start_byte,
                start_line,
                start_col,
                false,
                false,
            ));
        }
        // Not a bare fd number — keep scanning as an ordinary word, with
        // the digits as its prefix.
        let rest = self.read_word_body()?;
        let lexeme = digits + &rest;
        self.expect_command_start = false;
        Ok(self.finish(
            TokenKind::Word,
            lexeme,
            start_byte,
            start_line,
            start_col,
            false,
            false,
        ))
    }

    fn read_identifier_or_word(
        &mut self,
        start_byte: usize,
        start_line: usize,
        start_col: usize,
    ) -> Result<Token, LexError> {
        // Assignment words: NAME= at a command-start position.
        if self.expect_command_start {
            if let Some(name_len) = self.match_assignment_prefix() {
                let mut lexeme: String = self.input[self.position..self.position + name_len + 1]
                    .iter()
                    .collect();
                for _ in 0..=name_len {
                    self.advance();
                }
                let rest = self.read_word_body()?;
                lexeme.push_str(&rest);
                // expect_command_start stays true: more assignments or
                // the command name may still follow.
                return Ok(self.finish(
                    TokenKind::AssignmentWord,
                    lexeme,
                    start_byte,
                    start_line,
                    start_col,
                    false,
                    false,
                ));
            }
        }

        let body = self.read_word_body()?;
        let is_identifier_shaped = body.chars().next().map(|c| c.is_alphabetic() || c == '_').unwrap_or(false)
            && body.chars().all(|c| c.is_alphanumeric() || c == '_');

        if self.expect_command_start {
            if let Some(kw) = Self::reserved_word(&body) {
                self.expect_command_start = reserved_word_opens_command(&kw);
                return Ok(self.finish(kw, body, start_byte, start_line, start_col, false, false));
            }
        }
        // `in` is reserved after the `for` loop variable or the `case`
        // scrutinee even though neither is itself a command-starting
        // token, so `expect_command_start` alone can't gate it.
        if body == "in" && matches!(self.reserved_ctx, ReservedCtx::AfterForVar | ReservedCtx::AfterCaseWord) {
            self.expect_command_start = reserved_word_opens_command(&TokenKind::In);
            return Ok(self.finish(TokenKind::In, body, start_byte, start_line, start_col, false, false));
        }
        self.expect_command_start = false;
        let kind = if is_identifier_shaped { TokenKind::Name } else { TokenKind::Word };
        Ok(self.finish(kind, body, start_byte, start_line, start_col, false, false))
    }

    /// Advances [`ReservedCtx`] after each emitted token so a later `in`
    /// can be recognized once it follows the `for` loop variable or the
    /// `case` scrutinee. `Newline`/`Comment` are transparent — they don't
    /// end the grammar position the way any other token would.
    fn update_reserved_ctx(&mut self, tok: &Token) {
        use TokenKind::*;
        self.reserved_ctx = match (self.reserved_ctx, &tok.kind) {
            (_, For) => ReservedCtx::SeenFor,
            (_, Case) => ReservedCtx::SeenCase,
            (ReservedCtx::SeenFor, Name) => ReservedCtx::AfterForVar,
            (ReservedCtx::SeenCase, Word | Name | Number) => ReservedCtx::AfterCaseWord,
            (ctx, Newline | Comment) => ctx,
            (ReservedCtx::AfterForVar | ReservedCtx::AfterCaseWord, _) => ReservedCtx::None,
            (ReservedCtx::SeenFor | ReservedCtx::SeenCase, _) => ReservedCtx::None,
            (ctx, _) => ctx,
        };
    }

    /// Returns the byte length (in chars) of an `IDENT=` prefix starting
    /// at the current position, not consuming anything.
    fn match_assignment_prefix(&self) -> Option<usize> {
        let mut i = 0;
        let first = *self.input.get(self.position)?;
        if !(first.is_alphabetic() || first == '_') {
            return None;
        }
        i += 1;
        loop {
            match self.input.get(self.position + i) {
                Some(c) if c.is_alphanumeric() || *c == '_' => i += 1,
                Some('=') => return Some(i),
                _ => return None,
            }
        }
    }

    /// Scans a bareword body: literal runs, `$`-led expansions (left
    /// unresolved — just balanced enough to not split them), and nested
    /// quoted segments, stopping at whitespace or an unescaped operator
    /// lead. This is the shared tail used by WORD/NAME/ASSIGNMENT_WORD
    /// scanning.
    fn read_word_body(&mut self) -> Result<String, LexError> {
        let mut s = String::new();
        while !self.is_at_end() {
            let c = self.current();
            if c.is_whitespace() {
                break;
            }
            if Self::is_operator_lead(c) {
                break;
            }
            match c {
                '\\' => {
                    self.advance();
                    if !self.is_at_end() {
                        s.push('\\');
                        s.push(self.advance());
                    }
                }
                '\'' => {
                    s.push(self.advance());
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedQuote(self.line, self.column));
                        }
                        let c = self.advance();
                        s.push(c);
                        if c == '\'' {
                            break;
                        }
                    }
                }
                '"' => {
                    s.push(self.advance());
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedQuote(self.line, self.column));
                        }
                        let c = self.advance();
                        s.push(c);
                        if c == '"' {
                            break;
                        }
                        if c == '\\' && !self.is_at_end() {
                            s.push(self.advance());
                        }
                    }
                }
                '$' if self.peek_at(1) == Some('(') => {
                    s.push(self.advance());
                    s.push(self.advance());
                    s.push_str(&self.read_balanced('(', ')')?);
                }
                '$' if self.peek_at(1) == Some('{') => {
                    s.push(self.advance());
                    s.push(self.advance());
                    s.push_str(&self.read_balanced('{', '}')?);
                }
                '`' => {
                    s.push(self.advance());
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedQuote(self.line, self.column));
                        }
                        let c = self.advance();
                        s.push(c);
                        if c == '`' {
                            break;
                        }
                        if c == '\\' && !self.is_at_end() {
                            s.push(self.advance());
                        }
                    }
                }
                _ => {
                    s.push(self.advance());
                }
            }
        }
        Ok(s)
    }

    /// Reads up to (and including) the matching close delimiter, given
    /// the open delimiter was already consumed. Tracks nesting depth and
    /// quoting so an embedded `)`/`}` inside a string doesn't close early.
    fn read_balanced(&mut self, open: char, close: char) -> Result<String, LexError> {
        let mut depth = 1usize;
        let mut s = String::new();
        while depth > 0 {
            if self.is_at_end() {
                return Err(LexError::UnterminatedQuote(self.line, self.column));
            }
            let c = self.advance();
            match c {
                '\'' => {
                    s.push(c);
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedQuote(self.line, self.column));
                        }
                        let c2 = self.advance();
                        s.push(c2);
                        if c2 == '\'' {
                            break;
                        }
                    }
                }
                '"' => {
                    s.push(c);
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::UnterminatedQuote(self.line, self.column));
                        }
                        let c2 = self.advance();
                        s.push(c2);
                        if c2 == '"' {
                            break;
                        }
                        if c2 == '\\' && !self.is_at_end() {
                            s.push(self.advance());
                        }
                    }
                }
                c if c == open => {
                    depth += 1;
                    s.push(c);
                }
                c if c == close => {
                    depth -= 1;
                    if depth > 0 {
                        s.push(c);
                    }
                }
                _ => s.push(c),
            }
        }
        Ok(s)
    }

    fn reserved_word(word: &str) -> Option<TokenKind> {
        Some(match word {
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "fi" => TokenKind::Fi,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "do" => TokenKind::Do,
            "done" => TokenKind::Done,
            "while" => TokenKind::While,
            "until" => TokenKind::Until,
            "case" => TokenKind::Case,
            "esac" => TokenKind::Esac,
            "function" => TokenKind::Function,
            "!" => TokenKind::Bang,
            "local" => TokenKind::Local,
            "export" => TokenKind::Export,
            "readonly" => TokenKind::Readonly,
            _ => return None,
        })
    }

    fn read_operator(
        &mut self,
        start_byte: usize,
        start_line: usize,
        start_col: usize,
    ) -> Result<Token, LexError> {
        // `!` as a bareword is handled through the word path so it can
        // also serve as an ordinary argument; here we only see it when
        // it isn't absorbed into a word already.
        if self.current() == '!' {
            self.advance();
            let kind = if self.expect_command_start {
                self.expect_command_start = true;
                TokenKind::Bang
            } else {
                self.expect_command_start = false;
                TokenKind::Bang
            };
            return Ok(self.finish(kind, "!".into(), start_byte, start_line, start_col, false, false));
        }

        let remaining: String = self.input[self.position..]
            .iter()
            .take(3)
            .collect();
        let (kind, len) = lookup_operator(&remaining)
            .unwrap_or((TokenKind::Word, 1));
        let lexeme: String = self.input[self.position..self.position + len].iter().collect();
        for _ in 0..len {
            self.advance();
        }
        self.expect_command_start = operator_opens_command(&kind);
        Ok(self.finish(kind, lexeme, start_byte, start_line, start_col, false, false))
    }

    /// If the token just pushed is a delimiter WORD immediately preceded
    /// by `<<`/`<<-`, registers it as a pending here-doc: the delimiter's
    /// quote flag is what later suppresses expansion of the body in
    /// `crate::wordparse`.
    fn maybe_queue_heredoc(&mut self, tokens: &[Token]) {
        if tokens.len() < 2 {
            return;
        }
        let delim_idx = tokens.len() - 1;
        let delim_tok = &tokens[delim_idx];
        if !matches!(delim_tok.kind, TokenKind::Word | TokenKind::Name) {
            return;
        }
        let prev_kind = &tokens[delim_idx - 1].kind;
        let strip_tabs = match prev_kind {
            TokenKind::DLess => false,
            TokenKind::DLessDash => true,
            _ => return,
        };
        self.queue_heredoc(delim_tok.lexeme.clone(), strip_tabs, delim_tok.quoted, delim_idx);
    }

    /// Registers a here-doc redirection target seen mid-line; its body is
    /// pulled out of the raw input once the line's NEWLINE is reached.
    pub(crate) fn queue_heredoc(&mut self, delimiter: String, strip_tabs: bool, quoted: bool, token_index: usize) {
        self.pending_heredocs.push(PendingHereDoc {
            delimiter,
            strip_tabs,
            quoted,
            token_index,
        });
    }

    fn resolve_pending_heredocs(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        if self.pending_heredocs.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending_heredocs);
        for req in pending {
            let (start_line, start_col) = (self.line, self.column);
            let mut body = String::new();
            loop {
                if self.is_at_end() {
                    return Err(LexError::UnterminatedHereDoc(req.delimiter.clone(), start_line, start_col));
                }
                let mut line = String::new();
                while !self.is_at_end() && self.current() != '\n' {
                    line.push(self.advance());
                }
                if !self.is_at_end() {
                    self.advance(); // consume newline
                }
                let check = if req.strip_tabs { line.trim_start_matches('\t') } else { line.as_str() };
                if check == req.delimiter {
                    break;
                }
                let kept = if req.strip_tabs { check } else { line.as_str() };
                body.push_str(kept);
                body.push('\n');
            }
            let tok = Token {
                kind: TokenKind::Word,
                lexeme: body,
                byte_start: self.position,
                byte_end: self.position,
                line: start_line,
                column: start_col,
                quoted: true,
                single_quoted: req.quoted,
            };
            if req.token_index < tokens.len() {
                tokens.insert(req.token_index + 1, tok);
            } else {
                tokens.push(tok);
            }
        }
        Ok(())
    }
}

/// Whether, after consuming a reserved word, the lexer should continue
/// expecting a command-starting word next (e.g. `do`, `then`, `else`
/// always precede a fresh command list).
fn reserved_word_opens_command(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::If
            | TokenKind::Then
            | TokenKind::Elif
            | TokenKind::Else
            | TokenKind::Do
            | TokenKind::While
            | TokenKind::Until
            | TokenKind::Case
            | TokenKind::In
            | TokenKind::Function
    )
}

fn operator_opens_command(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::DSemi
            | TokenKind::Pipe
            | TokenKind::PipeAmp
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Amp
            | TokenKind::LParen
            | TokenKind::LBrace
            | TokenKind::DBrackStart
            | TokenKind::DParenStart
    )
}
