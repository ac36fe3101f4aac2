//! # bashc - Bash-to-Deno/TypeScript transpiler
//!
//! `bashc` translates Bash shell scripts into Deno-flavored TypeScript
//! source that calls a `$` shell-API runtime library. It is a
//! source-to-source compiler: the core never executes the input script,
//! it only lexes, parses, and re-emits it.
//!
//! ## Pipeline
//!
//! ```text
//! source text -> lexer -> parser (+ arithmetic parser) -> Program AST
//!             -> codegen visitor -> emitter -> output text + diagnostics
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use bashc::{transpile, Config};
//!
//! let output = transpile("echo hello", Config::default());
//! assert!(output.code.contains(r#"$.echo("hello")"#));
//! assert!(output.diagnostics.is_empty());
//! ```
//!
//! Unsupported constructs never fail the whole run — in the default
//! (recovery) mode the generator lowers them to a generic exec call and
//! records a warning-level [`diagnostics::Diagnostic`] instead:
//!
//! ```rust
//! use bashc::{transpile, Config};
//!
//! let output = transpile("coproc worker { cat; }", Config::default());
//! assert!(!output.code.is_empty());
//! ```

/// Arithmetic expression parser for `$((...))`, `((...))`, and C-style `for` headers.
pub mod arith;
/// Abstract syntax tree produced by the parser and consumed by codegen.
pub mod ast;
/// Command-line driver, kept separate from the core transpilation library.
pub mod cli;
/// Code generator: AST visitor, strategy selection, target-language emission.
pub mod codegen;
/// Shared diagnostic types (`Diagnostic`, `Severity`, `Span`).
pub mod diagnostics;
/// Transpilation context and output buffer (scopes, temp vars, imports).
pub mod emitter;
/// Bash source lexer.
pub mod lexer;
/// Recursive-descent parser with optional diagnostic-collecting recovery mode.
pub mod parser;
/// In-word expansion parser (parameter expansion, command/process substitution).
pub mod wordparse;

pub use codegen::TranspileOutput;
pub use diagnostics::{Diagnostic, Severity};
pub use emitter::Config;

use thiserror::Error;

/// Top-level error type for callers that want a `Result` instead of the
/// diagnostic-collecting [`TranspileOutput`] (e.g. the `--strict` CLI path).
#[derive(Error, Debug)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] lexer::LexError),
    #[error("parse error: {0}")]
    Parse(#[from] parser::ParseError),
    #[error("{0}")]
    Diagnostics(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used by the strict-mode entry points.
pub type Result<T> = std::result::Result<T, Error>;

/// Transpile Bash source to a Deno-flavored TypeScript module.
///
/// Runs in recovery mode iff `config.strict` is false (the default):
/// the returned [`TranspileOutput::diagnostics`] carries every lexical,
/// parse, and code-generation diagnostic encountered, in source order,
/// and `code` is always populated with best-effort output.
///
/// When `config.strict` is true this still returns a [`TranspileOutput`]
/// for a uniform call shape, but `code` is empty and the first lexical
/// or parse error is the sole diagnostic — see [`check`] for a `Result`-based
/// strict entry point.
pub fn transpile(source: &str, config: Config) -> TranspileOutput {
    codegen::transpile(source, config)
}

/// Strict-mode entry point: parses `source` and returns `Err` on the first
/// lexical or parse error instead of collecting diagnostics.
///
/// Mirrors the parser's own `parse` vs. `parse_with_recovery` split at
/// the crate's public boundary.
pub fn check(source: &str) -> Result<()> {
    parser::parse(source)
        .map(|_| ())
        .map_err(Error::Parse)
}
