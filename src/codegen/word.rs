//! Word and expansion emission.
//!
//! A [`Word`] becomes a single target-language expression: plain words
//! with no interpolation collapse to a string literal, anything with
//! more than one [`WordPart`] (or a lone non-literal part) becomes a
//! template-string literal with `${...}` interpolation slots.

use crate::ast::{ParamModifier, ParameterExpansion, Redirect, Word, WordPart};
use crate::diagnostics::Diagnostic;
use crate::emitter::escape::{double_quote, sanitize_identifier, template_literal};
use crate::emitter::Context;

/// Renders `word` as a single TypeScript expression.
///
/// Single-quoted words bypass all expansion: the raw value is emitted
/// as a plain string literal regardless of what it looks like.
pub(super) fn word_to_expr(word: &Word, ctx: &mut Context) -> String {
    if word.single_quoted {
        return double_quote(&word.raw);
    }
    let expanded = pre_expand_literal_parts(word, ctx);
    match expanded.as_slice() {
        [] => double_quote(""),
        [WordPart::Literal(s)] => double_quote(s),
        [single] => part_to_expr(single, ctx),
        parts => {
            let mut body = String::new();
            for part in parts {
                match part {
                    WordPart::Literal(s) => body.push_str(&template_literal(s)),
                    other => {
                        body.push_str("${");
                        body.push_str(&part_to_expr(other, ctx));
                        body.push('}');
                    }
                }
            }
            format!("`{body}`")
        }
    }
}

/// Applies tilde expansion and brace expansion to the literal runs of
/// `word` before the parts are rendered. Returns a fresh part list; the
/// original AST node is left untouched.
fn pre_expand_literal_parts(word: &Word, ctx: &mut Context) -> Vec<WordPart> {
    word.parts
        .iter()
        .map(|p| match p {
            WordPart::Literal(s) => WordPart::Literal(brace_expand(&tilde_expand(s, ctx))),
            other => other.clone(),
        })
        .collect()
}

/// Leading `~` with nothing before the next `/` or end expands to
/// `Deno.env.get("HOME")`. `~user` forms are left literal and unsupported.
///
/// The result is spliced back in as a `${...}` interpolation slot rather
/// than a literal, relying on the fact that literal runs containing one
/// are always rendered through the template-string path in
/// [`word_to_expr`].
fn tilde_expand(s: &str, _ctx: &mut Context) -> String {
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            return format!("${{Deno.env.get(\"HOME\") ?? \"\"}}{rest}");
        }
    }
    s.to_string()
}

/// Expands a single level of `{a,b,c}` and `{start..end[..step]}` inside
/// `s`, leaving zero-step or ill-formed braces untouched. Nested braces
/// are not expanded.
fn brace_expand(s: &str) -> String {
    let Some(open) = s.find('{') else { return s.to_string() };
    let Some(rel_close) = s[open..].find('}') else { return s.to_string() };
    let close = open + rel_close;
    let inner = &s[open + 1..close];
    if inner.contains('{') {
        return s.to_string();
    }
    let prefix = &s[..open];
    let suffix = &s[close + 1..];
    let items = match expand_brace_inner(inner) {
        Some(items) => items,
        None => return s.to_string(),
    };
    items.into_iter().map(|item| format!("{prefix}{item}{suffix}")).collect::<Vec<_>>().join(" ")
}

fn expand_brace_inner(inner: &str) -> Option<Vec<String>> {
    if let Some(items) = expand_range(inner) {
        return Some(items);
    }
    if inner.contains(',') {
        return Some(inner.split(',').map(|s| s.to_string()).collect());
    }
    None
}

fn expand_range(inner: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = inner.split("..").collect();
    let (start_s, end_s, step_s) = match parts.as_slice() {
        [a, b] => (*a, *b, None),
        [a, b, c] => (*a, *b, Some(*c)),
        _ => return None,
    };
    if let (Ok(start), Ok(end)) = (start_s.parse::<i64>(), end_s.parse::<i64>()) {
        let step = match step_s {
            Some(s) => s.parse::<i64>().ok()?,
            None => 1,
        };
        if step == 0 {
            return None;
        }
        let step = step.abs();
        let mut out = Vec::new();
        if start <= end {
            let mut n = start;
            while n <= end {
                out.push(n.to_string());
                n += step;
            }
        } else {
            let mut n = start;
            while n >= end {
                out.push(n.to_string());
                n -= step;
            }
        }
        return Some(out);
    }
    if start_s.chars().count() == 1 && end_s.chars().count() == 1 && step_s.is_none() {
        let start = start_s.chars().next()?;
        let end = end_s.chars().next()?;
        let mut out = Vec::new();
        if start <= end {
            let mut c = start as u32;
            while c <= end as u32 {
                out.push(char::from_u32(c)?.to_string());
                c += 1;
            }
        } else {
            let mut c = start as u32;
            while c >= end as u32 {
                out.push(char::from_u32(c)?.to_string());
                if c == 0 {
                    break;
                }
                c -= 1;
            }
        }
        return Some(out);
    }
    None
}

fn part_to_expr(part: &WordPart, ctx: &mut Context) -> String {
    match part {
        WordPart::Literal(s) => template_literal(s),
        WordPart::Parameter(pe) => parameter_expansion_expr(pe, ctx),
        WordPart::CommandSubst(cs) => command_subst_expr(&cs.program, ctx),
        WordPart::Arithmetic(expr) => super::arithmetic::arith_expr(expr, ctx),
        WordPart::ProcessSubst(ps) => process_subst_expr(ps, ctx),
    }
}

fn command_subst_expr(program: &crate::ast::Program, ctx: &mut Context) -> String {
    let inner = super::emit_program_expr_body(program, ctx);
    format!("(await (async () => {{\n{inner}}})()).stdout.replace(/\\n+$/, \"\")")
}

fn process_subst_expr(ps: &crate::ast::ProcessSubstitution, ctx: &mut Context) -> String {
    let inner = super::emit_program_expr_body(&ps.program, ctx);
    match ps.direction {
        crate::ast::ProcessSubDirection::In => {
            format!("(await $.procSubstIn(async () => {{\n{inner}}}))")
        }
        crate::ast::ProcessSubDirection::Out => {
            format!("(await $.procSubstOut(async () => {{\n{inner}}}))")
        }
    }
}

/// Reference to a named variable's current value, used as the
/// interpolation payload for a simple `$VAR`/`${VAR}` parameter.
fn variable_ref(name: &str, ctx: &Context) -> String {
    if ctx.is_declared(name) {
        sanitize_identifier(name)
    } else {
        format!("(Deno.env.get({}) ?? \"\")", double_quote(name))
    }
}

fn parameter_expansion_expr(pe: &ParameterExpansion, ctx: &mut Context) -> String {
    if pe.indirect {
        ctx.add_diagnostic(
            Diagnostic::warning(format!("indirect reference '${{!{}}}' lowered to a best-effort helper", pe.parameter))
                .with_code("unsupported-indirect-reference"),
        );
        return format!("$.indirectRef({})", double_quote(&pe.parameter));
    }
    if pe.subscript.is_some() {
        ctx.add_diagnostic(
            Diagnostic::warning(format!("array subscript on '${}' lowered to a generic exec fallback", pe.parameter))
                .with_code("unsupported-array-subscript"),
        );
        return format!("/* unsupported array subscript */ {}", variable_ref(&pe.parameter, ctx));
    }

    let var_ref = if is_special_parameter(&pe.parameter) {
        special_parameter_expr(&pe.parameter, ctx)
    } else {
        variable_ref(&pe.parameter, ctx)
    };

    match &pe.modifier {
        None => var_ref,
        Some(ParamModifier::Length) => format!("String({var_ref}).length"),
        Some(ParamModifier::DefaultValue { null_safe }) => {
            let default = arg_expr(pe, ctx);
            if *null_safe {
                format!("({var_ref} || {default})")
            } else {
                format!("({var_ref} !== undefined ? {var_ref} : {default})")
            }
        }
        Some(ParamModifier::AssignDefault { null_safe }) => {
            let default = arg_expr(pe, ctx);
            let name = sanitize_identifier(&pe.parameter);
            let test = if *null_safe { format!("!{name}") } else { format!("{name} === undefined") };
            format!("({test} ? ({name} = {default}) : {name})")
        }
        Some(ParamModifier::ErrorIfUnset { null_safe }) => {
            let message = arg_expr(pe, ctx);
            let test = if *null_safe { format!("!{var_ref}") } else { format!("{var_ref} === undefined") };
            format!("({test} ? (() => {{ throw new Error({message}); }})() : {var_ref})")
        }
        Some(ParamModifier::Alternate { null_safe }) => {
            let alt = arg_expr(pe, ctx);
            let test = if *null_safe { var_ref.clone() } else { format!("{var_ref} !== undefined") };
            format!("({test} ? {alt} : \"\")")
        }
        Some(ParamModifier::RemoveShortestPrefix) => glob_strip_call(&var_ref, pe, ctx, "removePrefix", false),
        Some(ParamModifier::RemoveLongestPrefix) => glob_strip_call(&var_ref, pe, ctx, "removePrefix", true),
        Some(ParamModifier::RemoveShortestSuffix) => glob_strip_call(&var_ref, pe, ctx, "removeSuffix", false),
        Some(ParamModifier::RemoveLongestSuffix) => glob_strip_call(&var_ref, pe, ctx, "removeSuffix", true),
        Some(ParamModifier::UppercaseFirst) => format!("$.ucfirst({var_ref})"),
        Some(ParamModifier::UppercaseAll) => format!("{var_ref}.toUpperCase()"),
        Some(ParamModifier::LowercaseFirst) => format!("$.lcfirst({var_ref})"),
        Some(ParamModifier::LowercaseAll) => format!("{var_ref}.toLowerCase()"),
        Some(ParamModifier::ReplaceFirst) => replace_call(&var_ref, pe, ctx, false, None),
        Some(ParamModifier::ReplaceAll) => replace_call(&var_ref, pe, ctx, true, None),
        Some(ParamModifier::ReplacePrefix) => replace_call(&var_ref, pe, ctx, false, Some("prefix")),
        Some(ParamModifier::ReplaceSuffix) => replace_call(&var_ref, pe, ctx, false, Some("suffix")),
    }
}

fn is_special_parameter(name: &str) -> bool {
    matches!(name, "@" | "*" | "#" | "?" | "$" | "!" | "-") || name.chars().all(|c| c.is_ascii_digit())
}

fn special_parameter_expr(name: &str, ctx: &mut Context) -> String {
    match name {
        "@" | "*" => "Deno.args.join(\" \")".to_string(),
        "#" => "Deno.args.length".to_string(),
        "?" => "$.lastExitCode".to_string(),
        "$" => "Deno.pid".to_string(),
        "!" => {
            ctx.add_diagnostic(
                Diagnostic::warning("'$!' (last background PID) is not modeled; lowered to undefined")
                    .with_code("unsupported-job-id"),
            );
            "undefined".to_string()
        }
        "0" => "Deno.mainModule".to_string(),
        n if n.chars().all(|c| c.is_ascii_digit()) => format!("(Deno.args[{}] ?? \"\")", n.parse::<i64>().unwrap_or(1) - 1),
        _ => "undefined".to_string(),
    }
}

fn arg_expr(pe: &ParameterExpansion, ctx: &mut Context) -> String {
    match &pe.modifier_arg {
        Some(w) => word_to_expr(w, ctx),
        None => double_quote(""),
    }
}

fn glob_strip_call(var_ref: &str, pe: &ParameterExpansion, ctx: &mut Context, helper: &str, greedy: bool) -> String {
    let pattern = pe.modifier_arg.as_ref().map(|w| w.raw.as_str()).unwrap_or("");
    let regex = crate::wordparse::glob_to_validated_regex(pattern, ctx);
    format!("$.{helper}({var_ref}, {}, {})", regex_literal(&regex), greedy)
}

fn replace_call(var_ref: &str, pe: &ParameterExpansion, ctx: &mut Context, all: bool, anchor: Option<&str>) -> String {
    let raw = pe.modifier_arg.as_ref().map(|w| w.raw.as_str()).unwrap_or("");
    let (pat, rep) = raw.split_once('/').unwrap_or((raw, ""));
    let mut regex = crate::wordparse::glob_to_validated_regex(pat, ctx);
    // glob_to_regex anchors with ^...$; replacement anchoring only wants
    // one side anchored, so strip the unwanted anchor.
    match anchor {
        Some("prefix") => {
            if let Some(stripped) = regex.strip_suffix('$') {
                regex = stripped.to_string();
            }
        }
        Some("suffix") => {
            if let Some(stripped) = regex.strip_prefix('^') {
                regex = stripped.to_string();
            }
        }
        _ => {
            regex = regex.trim_start_matches('^').trim_end_matches('$').to_string();
        }
    }
    let (parts, diags) = crate::wordparse::parse_word_parts(rep, false);
    for d in diags {
        ctx.add_diagnostic(d);
    }
    let rep_word =
        Word { raw: rep.to_string(), quoted: false, single_quoted: false, parts, span: crate::diagnostics::Span::dummy() };
    let rep_expr = word_to_expr(&rep_word, ctx);
    let flags = if all { "g" } else { "" };
    format!("{var_ref}.replace({}, {rep_expr})", regex_literal_flags(&regex, flags))
}

fn regex_literal(pattern: &str) -> String {
    regex_literal_flags(pattern, "")
}

fn regex_literal_flags(pattern: &str, flags: &str) -> String {
    format!("/{}/{flags}", pattern.replace('/', "\\/"))
}

/// Renders each item of a `for x in ...; do` list, expanding any pure
/// literal word that contains a brace pattern into multiple array
/// entries instead of one space-joined entry: brace-expandable items
/// become separate array elements.
pub(super) fn expand_for_items(items: &[Word], ctx: &mut Context) -> Vec<String> {
    items
        .iter()
        .flat_map(|w| {
            if !w.single_quoted && matches!(w.parts.as_slice(), [WordPart::Literal(_)]) {
                if let Some(expanded) = brace_expand_list(&w.raw) {
                    return expanded.into_iter().map(|s| double_quote(&s)).collect::<Vec<_>>();
                }
            }
            vec![word_to_expr(w, ctx)]
        })
        .collect()
}

/// Like [`brace_expand`] but returns the individual expansions instead of
/// joining them with spaces, for contexts (`for` item lists) where each
/// expansion must become its own array element.
fn brace_expand_list(raw: &str) -> Option<Vec<String>> {
    let open = raw.find('{')?;
    let rel_close = raw[open..].find('}')?;
    let close = open + rel_close;
    let inner = &raw[open + 1..close];
    if inner.contains('{') {
        return None;
    }
    let prefix = &raw[..open];
    let suffix = &raw[close + 1..];
    let items = expand_brace_inner(inner)?;
    Some(items.into_iter().map(|item| format!("{prefix}{item}{suffix}")).collect())
}

/// Renders a here-doc redirect's body as a `.stdin(...)` argument: a
/// quoted delimiter suppresses interpolation (plain string), an unquoted
/// delimiter runs the body through [`crate::wordparse`] and emits a
/// template string.
pub(super) fn heredoc_body_expr(redirect: &Redirect, ctx: &mut Context) -> String {
    if redirect.target.single_quoted {
        return double_quote(&redirect.target.raw);
    }
    word_to_expr(&redirect.target, ctx)
}
