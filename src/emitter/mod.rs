//! Transpilation context and output buffer.
//!
//! [`Context`] tracks the things code generation needs to know *about*
//! the program being emitted (declared variables, temp-variable counters,
//! diagnostics); [`Emitter`] is the actual output buffer (indentation,
//! import tracking). Kept as two separate types since one concerns
//! program-wide state and the other concerns the line-by-line buffer.

pub mod escape;

use crate::diagnostics::Diagnostic;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How a variable was declared in its enclosing scope: constant,
/// mutable, or locally-scoped mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
    LocalLet,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    declared: HashMap<String, DeclKind>,
}

/// Configuration passed into [`crate::codegen::transpile`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Import specifier for the runtime shell-API library.
    pub module_path: String,
    pub indent_str: String,
    pub emit_imports: bool,
    /// Strict (`parse`) vs. recovery (`parseWithRecovery`) front end.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_path: "./runtime.ts".to_string(),
            indent_str: "  ".to_string(),
            emit_imports: true,
            strict: false,
        }
    }
}

/// A snapshot of scope + temp-var state, used when codegen must try a
/// strategy and roll it back.
#[derive(Debug, Clone)]
pub struct ContextSnapshot {
    scopes: Vec<Scope>,
    temp_counters: HashMap<String, u32>,
}

/// Transpilation-time bookkeeping: scope stack, temp-variable allocation,
/// diagnostics, and the set of names known to be user-declared functions
/// (consulted by the "user-function-call" strategy).
pub struct Context {
    scopes: Vec<Scope>,
    temp_counters: HashMap<String, u32>,
    diagnostics: Vec<Diagnostic>,
    pub config: Config,
    known_functions: BTreeSet<String>,
}

impl Context {
    pub fn new(config: Config, known_functions: BTreeSet<String>) -> Self {
        Self {
            scopes: vec![Scope::default()],
            temp_counters: HashMap::new(),
            diagnostics: Vec::new(),
            config,
            known_functions,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn declare_variable(&mut self, name: &str, kind: DeclKind) {
        self.scopes
            .last_mut()
            .expect("Context always has at least one scope")
            .declared
            .insert(name.to_string(), kind);
    }

    /// Whether `name` is declared in the current scope or any enclosing
    /// one (innermost match wins, matching lexical shadowing).
    pub fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|s| s.declared.contains_key(name))
    }

    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|s| s.declared.contains_key(name))
    }

    pub fn is_known_function(&self, name: &str) -> bool {
        self.known_functions.contains(name)
    }

    /// Returns a unique name for a caller-provided prefix. Prefixes are
    /// hints, not uniqueness guarantees — uniqueness is enforced by the
    /// counter suffix.
    pub fn get_temp_var(&mut self, prefix: &str) -> String {
        let counter = self.temp_counters.entry(prefix.to_string()).or_insert(0);
        let name = format!("__{prefix}{counter}");
        *counter += 1;
        name
    }

    pub fn add_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot { scopes: self.scopes.clone(), temp_counters: self.temp_counters.clone() }
    }

    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        self.scopes = snapshot.scopes;
        self.temp_counters = snapshot.temp_counters;
    }
}

#[derive(Debug, Clone, Default)]
struct ImportSet {
    default_import: Option<String>,
    named: BTreeSet<String>,
}

/// Indented line buffer with import-preamble tracking.
pub struct Emitter {
    lines: Vec<String>,
    indent: usize,
    indent_str: String,
    imports: BTreeMap<String, ImportSet>,
}

impl Emitter {
    pub fn new(indent_str: impl Into<String>) -> Self {
        Self { lines: Vec::new(), indent: 0, indent_str: indent_str.into(), imports: BTreeMap::new() }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes one indented line.
    pub fn emit(&mut self, text: impl AsRef<str>) {
        let prefix = self.indent_str.repeat(self.indent);
        self.lines.push(format!("{prefix}{}", text.as_ref()));
    }

    /// Writes text with no indentation applied (used for multi-line
    /// fragments a caller has already formatted).
    pub fn emit_raw(&mut self, text: impl AsRef<str>) {
        self.lines.push(text.as_ref().to_string());
    }

    /// `header { <body> }` with the body run at one extra indent level
    pub fn emit_block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Emitter)) {
        self.emit(format!("{} {{", header.as_ref()));
        self.indent();
        body(self);
        self.dedent();
        self.emit("}");
    }

    pub fn add_default_import(&mut self, module: &str, name: &str) {
        self.imports.entry(module.to_string()).or_default().default_import = Some(name.to_string());
    }

    pub fn add_named_import(&mut self, module: &str, name: &str) {
        self.imports.entry(module.to_string()).or_default().named.insert(name.to_string());
    }

    /// Renders the buffered lines, prefixed with a merged import
    /// preamble unless `emit_imports` is false.
    pub fn finish(self, emit_imports: bool) -> String {
        let mut out = String::new();
        if emit_imports {
            for (module, set) in &self.imports {
                out.push_str(&render_import(module, set));
                out.push('\n');
            }
            if !self.imports.is_empty() {
                out.push('\n');
            }
        }
        out.push_str(&self.lines.join("\n"));
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }
}

fn render_import(module: &str, set: &ImportSet) -> String {
    let mut clauses = Vec::new();
    if let Some(default) = &set.default_import {
        clauses.push(default.clone());
    }
    if !set.named.is_empty() {
        clauses.push(format!("{{ {} }}", set.named.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    format!("import {} from \"{module}\";", clauses.join(", "))
}

#[cfg(test)]
mod tests;
