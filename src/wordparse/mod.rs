//! Word-part parser.
//!
//! Walks the raw value of a [`Word`](crate::ast::Word) and splits it into
//! [`WordPart`](crate::ast::WordPart)s: literal runs, parameter
//! expansions, command/process substitutions, and arithmetic expansions.
//! Nested `$(...)` bodies are handed off to a fresh
//! [`crate::parser::Parser`] instance — no state is shared with the
//! enclosing parse.

#[cfg(test)]
mod tests;

use crate::ast::{
    CommandSubstitution, ParamModifier, ParameterExpansion, ProcessSubDirection,
    ProcessSubstitution, Program, Word, WordPart,
};
use crate::diagnostics::Diagnostic;
use crate::emitter::Context;

/// Parses the parts of a word given the lexer's quote context.
///
/// Single-quoted words short-circuit to one literal part — nothing in
/// them is ever expanded.
pub fn parse_word_parts(raw: &str, single_quoted: bool) -> (Vec<WordPart>, Vec<Diagnostic>) {
    if single_quoted {
        return (vec![WordPart::Literal(raw.to_string())], Vec::new());
    }
    let chars: Vec<char> = raw.chars().collect();
    let mut parts = Vec::new();
    let mut diags = Vec::new();
    let mut literal = String::new();
    let mut i = 0usize;

    macro_rules! flush_literal {
        () => {
            if !literal.is_empty() {
                parts.push(WordPart::Literal(std::mem::take(&mut literal)));
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            literal.push(chars[i + 1]);
            i += 2;
            continue;
        }
        if c == '`' {
            flush_literal!();
            let (inner, next) = extract_backtick(&chars, i + 1);
            let unescaped = inner.replace("\\`", "`").replace("\\\\", "\\");
            let (program, mut d) = parse_nested_program(&unescaped);
            diags.append(&mut d);
            parts.push(WordPart::CommandSubst(CommandSubstitution { program: Box::new(program), backtick: true }));
            i = next;
            continue;
        }
        if c == '$' && i + 1 < chars.len() {
            let next = chars[i + 1];
            if next == '(' && chars.get(i + 2) == Some(&'(') {
                flush_literal!();
                let (inner, next_i) = extract_balanced(&chars, i + 3, '(', ')', true);
                // consume the matching second ')'
                let (consumed, after) = consume_one_char(&chars, next_i, ')');
                let _ = consumed;
                match crate::arith::parse_arithmetic(&inner) {
                    Ok(expr) => parts.push(WordPart::Arithmetic(Box::new(expr))),
                    Err(e) => {
                        diags.push(
                            Diagnostic::warning(format!("unsupported arithmetic expansion: {e}"))
                                .with_code("unsupported-arithmetic"),
                        );
                        parts.push(WordPart::Literal(format!("$(({inner}))")));
                    }
                }
                i = after;
                continue;
            }
            if next == '(' {
                flush_literal!();
                let (inner, after) = extract_balanced(&chars, i + 2, '(', ')', true);
                let (program, mut d) = parse_nested_program(&inner);
                diags.append(&mut d);
                parts.push(WordPart::CommandSubst(CommandSubstitution { program: Box::new(program), backtick: false }));
                i = after;
                continue;
            }
            if next == '{' {
                flush_literal!();
                let (inner, after) = extract_balanced(&chars, i + 2, '{', '}', true);
                let (expansion, mut d) = parse_parameter_expansion(&inner);
                diags.append(&mut d);
                parts.push(WordPart::Parameter(expansion));
                i = after;
                continue;
            }
            if is_special_parameter_char(next) {
                flush_literal!();
                parts.push(WordPart::Parameter(ParameterExpansion {
                    parameter: next.to_string(),
                    subscript: None,
                    modifier: None,
                    modifier_arg: None,
                    indirect: false,
                }));
                i += 2;
                continue;
            }
            if next.is_ascii_digit() {
                flush_literal!();
                parts.push(WordPart::Parameter(ParameterExpansion {
                    parameter: next.to_string(),
                    subscript: None,
                    modifier: None,
                    modifier_arg: None,
                    indirect: false,
                }));
                i += 2;
                continue;
            }
            if next.is_alphabetic() || next == '_' {
                flush_literal!();
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                let name: String = chars[start..j].iter().collect();
                parts.push(WordPart::Parameter(ParameterExpansion {
                    parameter: name,
                    subscript: None,
                    modifier: None,
                    modifier_arg: None,
                    indirect: false,
                }));
                i = j;
                continue;
            }
            // Bare `$` not leading a recognized expansion: literal.
            literal.push('$');
            i += 1;
            continue;
        }
        if c == '<' && chars.get(i + 1) == Some(&'(') {
            flush_literal!();
            let (inner, after) = extract_balanced(&chars, i + 2, '(', ')', true);
            let (program, mut d) = parse_nested_program(&inner);
            diags.append(&mut d);
            parts.push(WordPart::ProcessSubst(ProcessSubstitution {
                direction: ProcessSubDirection::In,
                program: Box::new(program),
            }));
            i = after;
            continue;
        }
        if c == '>' && chars.get(i + 1) == Some(&'(') {
            flush_literal!();
            let (inner, after) = extract_balanced(&chars, i + 2, '(', ')', true);
            let (program, mut d) = parse_nested_program(&inner);
            diags.append(&mut d);
            parts.push(WordPart::ProcessSubst(ProcessSubstitution {
                direction: ProcessSubDirection::Out,
                program: Box::new(program),
            }));
            i = after;
            continue;
        }
        literal.push(c);
        i += 1;
    }
    flush_literal!();
    if parts.is_empty() {
        parts.push(WordPart::Literal(String::new()));
    }
    (parts, diags)
}

fn consume_one_char(chars: &[char], i: usize, expect: char) -> (bool, usize) {
    if chars.get(i) == Some(&expect) {
        (true, i + 1)
    } else {
        (false, i)
    }
}

fn is_special_parameter_char(c: char) -> bool {
    matches!(c, '#' | '?' | '$' | '!' | '@' | '*' | '-')
}

fn parse_nested_program(source: &str) -> (Program, Vec<Diagnostic>) {
    crate::parser::parse_with_recovery(source)
}

/// Extracts text up to the matching `close`, honoring quoting: single
/// quotes suppress all `open`/`close` counting until closed, double
/// quotes honor backslash-escaped characters, and a backslash outside
/// single quotes escapes the next byte. Returns the inner text (not including
/// the final `close`) and the index just past that `close`.
fn extract_balanced(chars: &[char], start: usize, open: char, close: char, strip_enclosing: bool) -> (String, usize) {
    let _ = strip_enclosing;
    let mut depth = 1usize;
    let mut i = start;
    let mut out = String::new();
    while i < chars.len() && depth > 0 {
        let c = chars[i];
        match c {
            '\'' => {
                out.push(c);
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    out.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '"' => {
                out.push(c);
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        out.push(chars[i]);
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '\\' if i + 1 < chars.len() => {
                out.push(c);
                out.push(chars[i + 1]);
                i += 2;
            }
            c if c == open => {
                depth += 1;
                out.push(c);
                i += 1;
            }
            c if c == close => {
                depth -= 1;
                i += 1;
                if depth > 0 {
                    out.push(c);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    (out, i)
}

fn extract_backtick(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    let mut out = String::new();
    while i < chars.len() && chars[i] != '`' {
        if chars[i] == '\\' && i + 1 < chars.len() {
            out.push(chars[i]);
            out.push(chars[i + 1]);
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    if i < chars.len() {
        i += 1; // consume closing backtick
    }
    (out, i)
}

const TWO_CHAR_MODIFIERS: &[&str] = &[":-", ":=", ":?", ":+", "##", "%%", "^^", ",,", "//", "/#", "/%"];
const ONE_CHAR_MODIFIERS: &[char] = &['-', '=', '?', '+', '#', '%', '^', ',', '/'];

/// Resolves `${...}` inner text into a [`ParameterExpansion`].
fn parse_parameter_expansion(inner: &str) -> (ParameterExpansion, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let chars: Vec<char> = inner.chars().collect();
    let mut i = 0usize;
    let mut indirect = false;
    if chars.first() == Some(&'!') && chars.len() > 1 {
        indirect = true;
        i = 1;
    }

    // `${#name}` — length, only when nothing follows the name.
    if !indirect && chars.first() == Some(&'#') {
        let name_start = 1;
        let mut j = name_start;
        while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
            j += 1;
        }
        if j == chars.len() && j > name_start {
            let name: String = chars[name_start..j].iter().collect();
            return (
                ParameterExpansion {
                    parameter: name,
                    subscript: None,
                    modifier: Some(ParamModifier::Length),
                    modifier_arg: None,
                    indirect: false,
                },
                diags,
            );
        }
    }

    // Parameter name: alnum/_ run, or a single special/positional char.
    let name_start = i;
    if i < chars.len() && (chars[i].is_alphabetic() || chars[i] == '_') {
        while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
            i += 1;
        }
    } else if i < chars.len() && (chars[i].is_ascii_digit() || is_special_parameter_char(chars[i])) {
        i += 1;
    }
    let name: String = chars[name_start..i].iter().collect();

    let mut subscript = None;
    if chars.get(i) == Some(&'[') {
        let (sub_text, after) = extract_balanced(&chars, i + 1, '[', ']', true);
        let (sub_parts, mut d) = parse_word_parts(&sub_text, false);
        diags.append(&mut d);
        subscript = Some(Box::new(Word {
            raw: sub_text,
            quoted: false,
            single_quoted: false,
            parts: sub_parts,
            span: crate::diagnostics::Span::dummy(),
        }));
        i = after;
    }

    let remainder: String = chars[i..].iter().collect();
    if remainder.is_empty() {
        return (
            ParameterExpansion { parameter: name, subscript, modifier: None, modifier_arg: None, indirect },
            diags,
        );
    }

    let (modifier, op_len) = match TWO_CHAR_MODIFIERS.iter().find(|m| remainder.starts_with(*m)) {
        Some(op) => (modifier_for(op, true), op.chars().count()),
        None => match remainder.chars().next().filter(|c| ONE_CHAR_MODIFIERS.contains(c)) {
            Some(c) => (modifier_for_char(c), 1),
            None => {
                diags.push(
                    Diagnostic::warning(format!("unrecognized parameter modifier in '${{{inner}}}'"))
                        .with_code("unsupported-parameter-modifier"),
                );
                (None, 0)
            }
        },
    };

    let arg_text: String = remainder.chars().skip(op_len).collect();
    let (arg_parts, mut d) = parse_word_parts(&arg_text, false);
    diags.append(&mut d);
    let modifier_arg = if modifier.is_some() {
        Some(Box::new(Word {
            raw: arg_text,
            quoted: false,
            single_quoted: false,
            parts: arg_parts,
            span: crate::diagnostics::Span::dummy(),
        }))
    } else {
        None
    };

    (ParameterExpansion { parameter: name, subscript, modifier, modifier_arg, indirect }, diags)
}

fn modifier_for(op: &str, _two_char: bool) -> Option<ParamModifier> {
    Some(match op {
        ":-" => ParamModifier::DefaultValue { null_safe: true },
        ":=" => ParamModifier::AssignDefault { null_safe: true },
        ":?" => ParamModifier::ErrorIfUnset { null_safe: true },
        ":+" => ParamModifier::Alternate { null_safe: true },
        "##" => ParamModifier::RemoveLongestPrefix,
        "%%" => ParamModifier::RemoveLongestSuffix,
        "^^" => ParamModifier::UppercaseAll,
        ",," => ParamModifier::LowercaseAll,
        "//" => ParamModifier::ReplaceAll,
        "/#" => ParamModifier::ReplacePrefix,
        "/%" => ParamModifier::ReplaceSuffix,
        _ => return None,
    })
}

fn modifier_for_char(c: char) -> Option<ParamModifier> {
    Some(match c {
        '-' => ParamModifier::DefaultValue { null_safe: false },
        '=' => ParamModifier::AssignDefault { null_safe: false },
        '?' => ParamModifier::ErrorIfUnset { null_safe: false },
        '+' => ParamModifier::Alternate { null_safe: false },
        '#' => ParamModifier::RemoveShortestPrefix,
        '%' => ParamModifier::RemoveShortestSuffix,
        '^' => ParamModifier::UppercaseFirst,
        ',' => ParamModifier::LowercaseFirst,
        '/' => ParamModifier::ReplaceFirst,
        _ => return None,
    })
}

/// Translates a Bash glob pattern to an equivalent regular expression:
/// `*` → `.*`, `?` → `.`, `[...]`/`[!...]` → `[...]`/`[^...]`.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut j = i + 1;
                let negate = chars.get(j) == Some(&'!') || chars.get(j) == Some(&'^');
                if negate {
                    j += 1;
                }
                let class_start = j;
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                let class: String = chars[class_start..j].iter().collect();
                out.push('[');
                if negate {
                    out.push('^');
                }
                out.push_str(&class);
                out.push(']');
                i = j;
            }
            c if regex_syntax_char(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }
    out.push('$');
    out
}

fn regex_syntax_char(c: char) -> bool {
    matches!(c, '.' | '+' | '(' | ')' | '|' | '^' | '$' | '{' | '}' | '\\')
}

/// [`glob_to_regex`], checked against the host regex engine before it is
/// handed to the emitter as a TypeScript `RegExp` literal. The generator
/// must never hand the runtime a pattern it cannot itself compile; on the
/// rare malformed translation this falls back to a fully-escaped literal
/// match and records a diagnostic instead of emitting broken output.
pub fn glob_to_validated_regex(pattern: &str, ctx: &mut Context) -> String {
    let translated = glob_to_regex(pattern);
    match regex::Regex::new(&translated) {
        Ok(_) => translated,
        Err(err) => {
            ctx.add_diagnostic(
                Diagnostic::warning(format!(
                    "glob pattern `{pattern}` translated to an invalid regular expression ({err}); matching it literally"
                ))
                .with_code("invalid-glob-translation"),
            );
            format!("^{}$", regex::escape(pattern))
        }
    }
}
