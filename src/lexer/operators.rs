//! Operator token table.
//!
//! Centralizing the operator lexemes as data (rather than a chain of
//! `if`/`match` arms duplicated at each call site) keeps the longest-match
//! rule testable in one place instead of scattered across callers. The
//! lexemes are grouped into `phf::Map`s by length so [`lookup_operator`]
//! can try the longest slice of the input first without a linear scan.

use super::TokenKind;

static OPERATORS_3: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "<<-" => TokenKind::DLessDash,
    "<<<" => TokenKind::TLess,
    "&>>" => TokenKind::AndDGreat,
};

static OPERATORS_2: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "&&" => TokenKind::AndAnd,
    "||" => TokenKind::OrOr,
    "|&" => TokenKind::PipeAmp,
    ">>" => TokenKind::DGreat,
    "<<" => TokenKind::DLess,
    "<&" => TokenKind::LessAnd,
    ">&" => TokenKind::GreatAnd,
    "<>" => TokenKind::LessGreat,
    ">|" => TokenKind::Clobber,
    "&>" => TokenKind::AndGreat,
    ";;" => TokenKind::DSemi,
    "<(" => TokenKind::LessLParen,
    ">(" => TokenKind::GreatLParen,
    "((" => TokenKind::DParenStart,
    "))" => TokenKind::DParenEnd,
    "[[" => TokenKind::DBrackStart,
    "]]" => TokenKind::DBrackEnd,
};

static OPERATORS_1: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "|" => TokenKind::Pipe,
    "&" => TokenKind::Amp,
    ";" => TokenKind::Semicolon,
    "(" => TokenKind::LParen,
    ")" => TokenKind::RParen,
    "{" => TokenKind::LBrace,
    "}" => TokenKind::RBrace,
    "<" => TokenKind::Less,
    ">" => TokenKind::Great,
};

/// Looks up the longest operator lexeme that prefixes `text` (which
/// should be at most the next three characters of input). Returns the
/// token kind and the number of characters consumed.
pub fn lookup_operator(text: &str) -> Option<(TokenKind, usize)> {
    let prefix = |n: usize| text.char_indices().nth(n).map_or(text, |(i, _)| &text[..i]);
    if let Some(kind) = OPERATORS_3.get(prefix(3)) {
        return Some((kind.clone(), 3));
    }
    if let Some(kind) = OPERATORS_2.get(prefix(2)) {
        return Some((kind.clone(), 2));
    }
    if let Some(kind) = OPERATORS_1.get(prefix(1)) {
        return Some((kind.clone(), 1));
    }
    None
}
