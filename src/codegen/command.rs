//! Command emission: the five-phase strategy-selection pipeline plus
//! environment-assignment lowering.

use super::word::word_to_expr;
use crate::ast::{Command, RedirectOp, Word, WordPart};
use crate::diagnostics::Diagnostic;
use crate::emitter::{Context, DeclKind, Emitter};

/// Builtins with no external-process surface ("shell-builtin" strategy).
const BUILTIN_SET: &[&str] =
    &["cd", "pwd", "echo", "pushd", "popd", "dirs", "test", "which", "chmod", "ln", "rm", "cp", "mv", "mkdir", "touch", "ls"];

/// Builtins whose result must be printed explicitly rather than being a
/// side-effecting call with a silent return.
const PRINTS_VALUE_SET: &[&str] = &["pwd", "ls", "dirs", "which"];

/// Commands lowered to the fluent stream API ("fluent-stream" strategy).
const FLUENT_SET: &[&str] = &["cat", "grep", "sort", "uniq", "head", "tail", "cut", "tr", "wc", "tee"];

/// Commands lowered to a dedicated runtime wrapper ("specialized" strategy).
const SPECIALIZED_SET: &[&str] = &["git", "docker", "tmux"];

const EXPORT_LIKE: &[&str] = &["export", "readonly"];

struct Analysis {
    pure_assignment: bool,
    has_redirects: bool,
    has_env_assignments: bool,
    all_args_static: bool,
    merges_stderr_to_stdout: bool,
    /// Any argument is a literal `/dev/...` special file: `tee /dev/stderr`
    /// must bypass the fluent-stream helper, which buffers to a regular
    /// file, and fall back to a generic exec that talks to the device
    /// directly.
    targets_dev_file: bool,
    command_name: String,
}

fn analyze(cmd: &Command) -> Analysis {
    let merges_stderr_to_stdout = cmd.redirects.len() == 1
        && matches!(cmd.redirects[0].op, RedirectOp::DupOutput)
        && cmd.redirects[0].fd == Some(2)
        && cmd.redirects[0].target.raw == "1";
    Analysis {
        pure_assignment: cmd.is_pure_assignment(),
        has_redirects: !cmd.redirects.is_empty(),
        has_env_assignments: !cmd.assignments.is_empty(),
        all_args_static: cmd.args.iter().all(|w| w.parts.iter().all(|p| matches!(p, WordPart::Literal(_)))),
        merges_stderr_to_stdout,
        targets_dev_file: cmd.args.iter().any(|w| w.raw.starts_with("/dev/")),
        command_name: cmd.name.raw.clone(),
    }
}

enum Strategy {
    UserFunctionCall,
    ShellBuiltin,
    TimeoutWrapper,
    FluentStream,
    Specialized,
    StandardExec,
}

fn select_strategy(a: &Analysis, cmd: &Command, ctx: &Context, in_pipeline: bool) -> Strategy {
    if ctx.is_known_function(&a.command_name) {
        return Strategy::UserFunctionCall;
    }
    if a.command_name == "timeout" && cmd.args.first().is_some_and(|w| parse_duration_ms(&w.raw).is_some()) {
        return Strategy::TimeoutWrapper;
    }
    if BUILTIN_SET.contains(&a.command_name.as_str()) && !in_pipeline && !a.has_env_assignments && !a.has_redirects {
        return Strategy::ShellBuiltin;
    }
    if FLUENT_SET.contains(&a.command_name.as_str()) && a.all_args_static && !a.has_env_assignments && !a.targets_dev_file {
        return Strategy::FluentStream;
    }
    if SPECIALIZED_SET.contains(&a.command_name.as_str()) {
        return Strategy::Specialized;
    }
    Strategy::StandardExec
}

/// Parses a Bash-style duration literal (`10s`, `5m`, `1h`) into milliseconds.
fn parse_duration_ms(s: &str) -> Option<u64> {
    let (digits, unit) = s.split_at(s.len().checked_sub(1)?);
    let n: u64 = digits.parse().ok()?;
    match unit {
        "s" => Some(n * 1000),
        "m" => Some(n * 60_000),
        "h" => Some(n * 3_600_000),
        _ => None,
    }
}

fn render_args(words: &[Word], ctx: &mut Context) -> Vec<String> {
    words.iter().map(|w| word_to_expr(w, ctx)).collect()
}

/// Builds the `{ env: { ... } }` options object for leading
/// ASSIGNMENT_WORDs on a non-pure-assignment command.
fn env_option(cmd: &Command, ctx: &mut Context) -> Option<String> {
    if cmd.assignments.is_empty() {
        return None;
    }
    let entries: Vec<String> = cmd
        .assignments
        .iter()
        .map(|a| format!("{}: {}", crate::emitter::escape::double_quote(&a.name), word_to_expr(&a.value, ctx)))
        .collect();
    Some(format!("{{ {} }}", entries.join(", ")))
}

fn options_object(env: Option<String>, merge_streams: bool, timeout_ms: Option<u64>) -> Option<String> {
    let mut fields = Vec::new();
    if let Some(env) = env {
        fields.push(format!("env: {env}"));
    }
    if merge_streams {
        fields.push("mergeStreams: true".to_string());
    }
    if let Some(ms) = timeout_ms {
        fields.push(format!("timeout: {ms}"));
    }
    if fields.is_empty() {
        None
    } else {
        Some(format!("{{ {} }}", fields.join(", ")))
    }
}

/// Produces the bare call expression for `cmd` (phases 2-3), without
/// redirections or finalization (those are layered on by the caller —
/// [`command_statement_expr`] for a top-level statement, or the pipeline
/// emitter for a chain stage).
pub(super) fn command_call_expr(cmd: &Command, ctx: &mut Context, in_pipeline: bool) -> String {
    let a = analyze(cmd);
    match select_strategy(&a, cmd, ctx, in_pipeline) {
        Strategy::UserFunctionCall => {
            let args = render_args(&cmd.args, ctx);
            format!("{}({})", crate::emitter::escape::sanitize_identifier(&a.command_name), args.join(", "))
        }
        Strategy::TimeoutWrapper => {
            let timeout_ms = parse_duration_ms(&cmd.args[0].raw).unwrap_or(0);
            let inner_name = cmd.args.get(1).map(|w| w.raw.clone()).unwrap_or_default();
            let inner_args: Vec<String> = cmd.args.iter().skip(2).map(|w| word_to_expr(w, ctx)).collect();
            let mut argv = vec![crate::emitter::escape::double_quote(&inner_name)];
            argv.extend(inner_args);
            let opts = options_object(env_option(cmd, ctx), a.merges_stderr_to_stdout, Some(timeout_ms));
            let mut call = format!("$.cmd({}", argv.join(", "));
            if let Some(opts) = opts {
                call.push_str(&format!(", {opts}"));
            }
            call.push(')');
            call
        }
        Strategy::ShellBuiltin => {
            let args = render_args(&cmd.args, ctx);
            format!("$.{}({})", a.command_name, args.join(", "))
        }
        Strategy::FluentStream => {
            let args = render_args(&cmd.args, ctx);
            format!("$.{}({})", a.command_name, args.join(", "))
        }
        Strategy::Specialized => {
            let args = render_args(&cmd.args, ctx);
            format!("$.{}({})", a.command_name, args.join(", "))
        }
        Strategy::StandardExec => {
            let mut argv = vec![crate::emitter::escape::double_quote(&a.command_name)];
            argv.extend(render_args(&cmd.args, ctx));
            let opts = options_object(env_option(cmd, ctx), a.merges_stderr_to_stdout, None);
            let mut call = format!("$.cmd({}", argv.join(", "));
            if let Some(opts) = opts {
                call.push_str(&format!(", {opts}"));
            }
            call.push(')');
            call
        }
    }
}

/// Applies redirections to an already-built call expression. `2>&1` was
/// folded into the call's own options by [`analyze`] and is skipped here.
pub(super) fn apply_redirections(mut expr: String, cmd: &Command, ctx: &mut Context) -> String {
    for r in &cmd.redirects {
        match r.op {
            RedirectOp::Output => expr.push_str(&format!(".stdout({})", word_to_expr(&r.target, ctx))),
            RedirectOp::Append => expr.push_str(&format!(".stdout({}, {{ append: true }})", word_to_expr(&r.target, ctx))),
            RedirectOp::Input => expr.push_str(&format!(".stdin({})", word_to_expr(&r.target, ctx))),
            RedirectOp::HereString => expr.push_str(&format!(".stdin({})", word_to_expr(&r.target, ctx))),
            RedirectOp::HereDoc | RedirectOp::HereDocStrip => {
                expr.push_str(&format!(".stdin({})", super::word::heredoc_body_expr(r, ctx)))
            }
            RedirectOp::Combined => expr.push_str(&format!(".stdout({}).stderr({})", word_to_expr(&r.target, ctx), word_to_expr(&r.target, ctx))),
            RedirectOp::CombinedAppend => {
                expr.push_str(&format!(".stdout({0}, {{ append: true }}).stderr({0}, {{ append: true }})", word_to_expr(&r.target, ctx)))
            }
            RedirectOp::DupOutput if r.fd == Some(2) && r.target.raw == "1" => {
                // folded into mergeStreams option by `analyze`/`options_object`.
            }
            RedirectOp::DupOutput | RedirectOp::DupInput | RedirectOp::InputOutput | RedirectOp::Clobber => {
                ctx.add_diagnostic(
                    Diagnostic::warning("unsupported redirection form, passed through as a generic stdout redirect")
                        .with_code("unsupported-redirect")
                        .with_span(r.span),
                );
                expr.push_str(&format!(".stdout({})", word_to_expr(&r.target, ctx)));
            }
            RedirectOp::ProcessSubIn | RedirectOp::ProcessSubOut => {}
        }
    }
    expr
}

/// Finalizes a command used as a standalone top-level statement: awaits
/// the call and wraps it in `console.log` for builtins whose return type
/// is "prints value".
pub(super) fn emit_command_statement(cmd: &Command, ctx: &mut Context, em: &mut Emitter) {
    if cmd.is_pure_assignment() && cmd.redirects.is_empty() {
        emit_environment_assignment(cmd, ctx, em);
        return;
    }
    if EXPORT_LIKE.contains(&cmd.name.raw.as_str()) {
        emit_export_readonly(cmd, ctx, em);
        return;
    }
    let expr = command_call_expr(cmd, ctx, false);
    let expr = apply_redirections(expr, cmd, ctx);
    let prints = PRINTS_VALUE_SET.contains(&cmd.name.raw.as_str()) || (!BUILTIN_SET.contains(&cmd.name.raw.as_str()) && FLUENT_SET.contains(&cmd.name.raw.as_str()));
    if prints {
        let tmp = ctx.get_temp_var("r");
        em.emit(format!("const {tmp} = await {expr};"));
        em.emit(format!("console.log({tmp}.stdout ?? {tmp});"));
    } else {
        em.emit(format!("await {expr};"));
    }
}

/// Declaration/reassignment lowering for a pure `VAR=value` statement.
/// The first occurrence in a scope emits `let VAR = …;`; later
/// occurrences emit a plain reassignment. A self-referencing initializer
/// (`PATH=$PATH:x`) is split into declaration + assignment to avoid a
/// temporal-dead-zone read.
fn emit_environment_assignment(cmd: &Command, ctx: &mut Context, em: &mut Emitter) {
    for assignment in &cmd.assignments {
        let name = crate::emitter::escape::sanitize_identifier(&assignment.name);
        let self_referencing = assignment.value.parts.iter().any(|p| matches!(p, WordPart::Parameter(pe) if pe.parameter == assignment.name));
        let already_declared = ctx.declared_in_current_scope(&assignment.name);
        let value_expr = word_to_expr(&assignment.value, ctx);
        if already_declared {
            em.emit(format!("{name} = {value_expr};"));
        } else if self_referencing {
            em.emit(format!("let {name};"));
            em.emit(format!("{name} = {value_expr};"));
            ctx.declare_variable(&assignment.name, DeclKind::Let);
        } else {
            em.emit(format!("let {name} = {value_expr};"));
            ctx.declare_variable(&assignment.name, DeclKind::Let);
        }
    }
}

/// `export VAR=value` / `readonly VAR=value`: always split into a
/// declaration and an explicit `Deno.env.set` call, since
/// the point of `export` is to publish the value into the process
/// environment rather than just a local binding.
fn emit_export_readonly(cmd: &Command, ctx: &mut Context, em: &mut Emitter) {
    for arg in &cmd.args {
        let Some((name, value_raw)) = arg.raw.split_once('=') else {
            ctx.add_diagnostic(
                Diagnostic::warning(format!("'{}' without an inline assignment is not tracked", cmd.name.raw))
                    .with_code("unsupported-export-form")
                    .with_span(arg.span),
            );
            continue;
        };
        let (parts, diags) = crate::wordparse::parse_word_parts(value_raw, arg.single_quoted);
        for d in diags {
            ctx.add_diagnostic(d);
        }
        let value_word = Word { raw: value_raw.to_string(), quoted: arg.quoted, single_quoted: arg.single_quoted, parts, span: arg.span };
        let sanitized = crate::emitter::escape::sanitize_identifier(name);
        em.emit(format!("let {sanitized};"));
        let value_expr = word_to_expr(&value_word, ctx);
        em.emit(format!("{sanitized} = {value_expr};"));
        em.emit(format!("Deno.env.set({}, {sanitized});", crate::emitter::escape::double_quote(name)));
        ctx.declare_variable(name, DeclKind::Let);
    }
}
