//! Code generator: visitor dispatch over the AST plus the per-construct
//! emission functions.
//!
//! [`transpile`] is the single public entry point: it owns the
//! parse → collect-known-functions → emit pipeline and returns the
//! rendered module text alongside every [`Diagnostic`] raised by either
//! phase.

mod arithmetic;
mod command;
mod test;
mod word;

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::emitter::{Config, Context, DeclKind, Emitter};
use std::collections::BTreeSet;

/// Result of a full `source → target` run. Diagnostics from both phases
/// are merged and returned alongside the output.
#[derive(Debug, Clone)]
pub struct TranspileOutput {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the whole pipeline: lex+parse (strict or recovery per
/// `config.strict`), then visits the resulting [`Program`] to emit a
/// Deno-flavored TypeScript module.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len(), strict = config.strict))]
pub fn transpile(source: &str, config: Config) -> TranspileOutput {
    let (program, mut diagnostics) = if config.strict {
        match crate::parser::parse(source) {
            Ok(program) => (program, Vec::new()),
            Err(e) => {
                return TranspileOutput {
                    code: String::new(),
                    diagnostics: vec![Diagnostic::error(e.to_string()).with_code("parse-error")],
                };
            }
        }
    } else {
        crate::parser::parse_with_recovery(source)
    };

    let known_functions = collect_function_names(&program);
    let mut ctx = Context::new(config.clone(), known_functions);
    let mut em = Emitter::new(config.indent_str.clone());

    em.add_default_import(&config.module_path, "$");
    em.emit("(async () => {");
    em.indent();
    emit_statements(&program.statements, &mut ctx, &mut em);
    em.dedent();
    em.emit("})();");

    diagnostics.append(&mut ctx.into_diagnostics());
    let output = TranspileOutput { code: em.finish(config.emit_imports), diagnostics };
    tracing::debug!(
        diagnostics = output.diagnostics.len(),
        output_bytes = output.code.len(),
        "emitted"
    );
    output
}

/// Walks every reachable [`FunctionDeclaration`] so the command-emission
/// "user-function-call" strategy can recognize a call to a
/// script-defined function regardless of where in the program it is
/// declared relative to its call sites.
fn collect_function_names(program: &Program) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    collect_in_statements(&program.statements, &mut set);
    set
}

fn collect_in_statements(stmts: &[Statement], set: &mut BTreeSet<String>) {
    for s in stmts {
        collect_in_statement(s, set);
    }
}

fn collect_in_statement(stmt: &Statement, set: &mut BTreeSet<String>) {
    match stmt {
        Statement::Function(f) => {
            set.insert(f.name.clone());
            collect_in_statement(&f.body, set);
        }
        Statement::If(i) => collect_in_if(i, set),
        Statement::For(f) => collect_in_statements(&f.body, set),
        Statement::CStyleFor(f) => collect_in_statements(&f.body, set),
        Statement::While(w) => collect_in_statements(&w.body, set),
        Statement::Until(u) => collect_in_statements(&u.body, set),
        Statement::Case(c) => {
            for clause in &c.clauses {
                collect_in_statements(&clause.body, set);
            }
        }
        Statement::Subshell(s) => collect_in_statements(&s.body, set),
        Statement::BraceGroup(b) => collect_in_statements(&b.body, set),
        Statement::Pipeline(p) => {
            for stage in &p.stages {
                collect_in_statement(stage, set);
            }
        }
        Statement::Command(_) | Statement::TestCommand(_) | Statement::ArithmeticCommand(_) => {}
    }
}

fn collect_in_if(i: &IfStatement, set: &mut BTreeSet<String>) {
    collect_in_statements(&i.consequent, set);
    match &i.alternate {
        Some(IfAlternate::Else(body)) => collect_in_statements(body, set),
        Some(IfAlternate::ElseIf(next)) => collect_in_if(next, set),
        None => {}
    }
}

// ---------------------------------------------------------------------
// Statement dispatch (the "visitor")
// ---------------------------------------------------------------------

fn emit_statements(stmts: &[Statement], ctx: &mut Context, em: &mut Emitter) {
    for stmt in stmts {
        emit_statement(stmt, ctx, em);
    }
}

fn emit_statement(stmt: &Statement, ctx: &mut Context, em: &mut Emitter) {
    match stmt {
        Statement::Pipeline(p) => emit_pipeline_statement(p, ctx, em),
        Statement::Command(c) => command::emit_command_statement(c, ctx, em),
        Statement::If(i) => emit_if(i, ctx, em),
        Statement::For(f) => emit_for(f, ctx, em),
        Statement::CStyleFor(f) => emit_c_style_for(f, ctx, em),
        Statement::While(w) => emit_while(w, ctx, em),
        Statement::Until(u) => emit_until(u, ctx, em),
        Statement::Case(c) => emit_case(c, ctx, em),
        Statement::Function(f) => emit_function(f, ctx, em),
        Statement::Subshell(s) => emit_subshell(s, ctx, em),
        Statement::BraceGroup(b) => emit_brace_group(b, ctx, em),
        Statement::TestCommand(t) => emit_test_command_statement(t, ctx, em),
        Statement::ArithmeticCommand(a) => emit_arithmetic_command_statement(a, ctx, em),
    }
}

/// Runs `body` either inline or, when `background` is set, inside a
/// fire-and-forget async IIFE that is not awaited — `&` (background)
/// wraps the `Pipeline` in a fire-and-forget task.
fn emit_possibly_background(background: bool, ctx: &mut Context, em: &mut Emitter, body: impl FnOnce(&mut Context, &mut Emitter)) {
    if background {
        em.emit("(async () => {");
        em.indent();
        body(ctx, em);
        em.dedent();
        em.emit("})();");
    } else {
        body(ctx, em);
    }
}

// ---------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------

fn emit_pipeline_statement(p: &Pipeline, ctx: &mut Context, em: &mut Emitter) {
    match p.operator {
        None => emit_possibly_background(p.background, ctx, em, |ctx, em| emit_statement(&p.stages[0], ctx, em)),
        Some(PipeOperator::Pipe) | Some(PipeOperator::PipeMerge) => {
            emit_possibly_background(p.background, ctx, em, |ctx, em| {
                let expr = build_pipe_chain(&p.stages, ctx);
                em.emit(format!("await {expr};"));
            });
        }
        Some(PipeOperator::And) => emit_possibly_background(p.background, ctx, em, |ctx, em| and_chain(&p.stages, ctx, em)),
        Some(PipeOperator::Or) => emit_possibly_background(p.background, ctx, em, |ctx, em| or_chain(&p.stages, ctx, em)),
    }
}

/// Produces the expression for `stages` as a `.pipe(...)` chain, with
/// exactly one `.stdout().lines()` call on the producer.
fn build_pipe_chain(stages: &[Statement], ctx: &mut Context) -> String {
    let mut iter = stages.iter();
    let first = iter.next().expect("a Pipeline always has at least one stage");
    let (mut expr, is_producer) = pipeline_stage_expr(first, ctx);
    if !is_producer {
        expr.push_str(".stdout().lines()");
    }
    for stage in iter {
        let (transform_expr, _) = pipeline_stage_expr(stage, ctx);
        expr = format!("{expr}.pipe({transform_expr})");
    }
    expr
}

/// Renders one pipeline stage's bare call expression and whether it is
/// already a stream producer that must not receive `.stdout().lines()`
/// — a fluent-stream producer (`cat`) already is one.
fn pipeline_stage_expr(stmt: &Statement, ctx: &mut Context) -> (String, bool) {
    match stmt {
        Statement::Command(cmd) => {
            let is_producer = cmd.name.raw == "cat";
            let expr = command::apply_redirections(command::command_call_expr(cmd, ctx, true), cmd, ctx);
            (expr, is_producer)
        }
        other => {
            ctx.add_diagnostic(
                Diagnostic::warning(format!(
                    "compound statement as a pipeline stage (found {}) lowered to a generic passthrough",
                    other.node_type()
                ))
                .with_code("unsupported-pipeline-stage"),
            );
            ("$.cmd(\"true\")".to_string(), false)
        }
    }
}

/// Emits a single stage and returns a boolean expression for "exit code
/// was 0", used by `&&`/`||` chains and by `if`/`while`/`until` test
/// reduction.
fn stage_success_expr(stmt: &Statement, ctx: &mut Context, em: &mut Emitter) -> String {
    match stmt {
        Statement::Command(cmd) if cmd.is_pure_assignment() && cmd.redirects.is_empty() => {
            command::emit_command_statement(cmd, ctx, em);
            "true".to_string()
        }
        Statement::Command(cmd) => {
            let expr = command::apply_redirections(command::command_call_expr(cmd, ctx, false), cmd, ctx);
            let tmp = ctx.get_temp_var("r");
            em.emit(format!("const {tmp} = await {expr};"));
            format!("(({tmp}.code ?? 0) === 0)")
        }
        Statement::Pipeline(p) if matches!(p.operator, Some(PipeOperator::Pipe) | Some(PipeOperator::PipeMerge)) => {
            let expr = build_pipe_chain(&p.stages, ctx);
            let tmp = ctx.get_temp_var("r");
            em.emit(format!("const {tmp} = await {expr};"));
            format!("(({tmp}.code ?? 0) === 0)")
        }
        Statement::Pipeline(p) if p.operator.is_none() => stage_success_expr(&p.stages[0], ctx, em),
        Statement::TestCommand(t) => test::test_condition_expr(&t.condition, ctx),
        other => {
            emit_statement(other, ctx, em);
            "($.lastExitCode === 0)".to_string()
        }
    }
}

fn and_chain(stages: &[Statement], ctx: &mut Context, em: &mut Emitter) {
    and_chain_rec(stages, 0, ctx, em);
}

fn and_chain_rec(stages: &[Statement], idx: usize, ctx: &mut Context, em: &mut Emitter) {
    if idx >= stages.len() {
        return;
    }
    let cond = stage_success_expr(&stages[idx], ctx, em);
    if idx + 1 == stages.len() {
        return;
    }
    em.emit_block(format!("if ({cond})"), |em| and_chain_rec(stages, idx + 1, ctx, em));
}

fn or_chain(stages: &[Statement], ctx: &mut Context, em: &mut Emitter) {
    or_chain_rec(stages, 0, ctx, em);
}

fn or_chain_rec(stages: &[Statement], idx: usize, ctx: &mut Context, em: &mut Emitter) {
    if idx >= stages.len() {
        return;
    }
    let cond = stage_success_expr(&stages[idx], ctx, em);
    if idx + 1 == stages.len() {
        return;
    }
    em.emit_block(format!("if (!({cond}))"), |em| or_chain_rec(stages, idx + 1, ctx, em));
}

/// Reduces a test [`Pipeline`] to a boolean "exit code was 0" expression
/// for `if`/`while`/`until`.
fn pipeline_exit_code_test(p: &Pipeline, ctx: &mut Context, em: &mut Emitter) -> String {
    match p.operator {
        None => stage_success_expr(&p.stages[0], ctx, em),
        Some(PipeOperator::Pipe) | Some(PipeOperator::PipeMerge) => {
            let expr = build_pipe_chain(&p.stages, ctx);
            let tmp = ctx.get_temp_var("r");
            em.emit(format!("const {tmp} = await {expr};"));
            format!("(({tmp}.code ?? 0) === 0)")
        }
        Some(PipeOperator::And) => {
            let result = ctx.get_temp_var("ok");
            em.emit(format!("let {result} = false;"));
            and_test_rec(&p.stages, 0, ctx, em, &result);
            result
        }
        Some(PipeOperator::Or) => {
            let result = ctx.get_temp_var("ok");
            em.emit(format!("let {result} = false;"));
            or_test_rec(&p.stages, 0, ctx, em, &result);
            result
        }
    }
}

fn and_test_rec(stages: &[Statement], idx: usize, ctx: &mut Context, em: &mut Emitter, result: &str) {
    let cond = stage_success_expr(&stages[idx], ctx, em);
    if idx + 1 == stages.len() {
        em.emit(format!("{result} = {cond};"));
        return;
    }
    em.emit_block(format!("if ({cond})"), |em| and_test_rec(stages, idx + 1, ctx, em, result));
}

fn or_test_rec(stages: &[Statement], idx: usize, ctx: &mut Context, em: &mut Emitter, result: &str) {
    let cond = stage_success_expr(&stages[idx], ctx, em);
    if idx + 1 == stages.len() {
        em.emit(format!("{result} = {cond};"));
        return;
    }
    em.emit_block(format!("if ({cond})"), |em| em.emit(format!("{result} = true;")));
    em.emit_block("else", |em| or_test_rec(stages, idx + 1, ctx, em, result));
}

// ---------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------

fn emit_if(stmt: &IfStatement, ctx: &mut Context, em: &mut Emitter) {
    let mut branches: Vec<(&Pipeline, &Vec<Statement>)> = Vec::new();
    let else_body = collect_if_chain(stmt, &mut branches);
    for (i, (test, consequent)) in branches.into_iter().enumerate() {
        let cond = pipeline_exit_code_test(test, ctx, em);
        let keyword = if i == 0 { "if" } else { "} else if" };
        em.emit(format!("{keyword} ({cond}) {{"));
        em.indent();
        ctx.push_scope();
        emit_statements(consequent, ctx, em);
        ctx.pop_scope();
        em.dedent();
    }
    if let Some(body) = else_body {
        em.emit("} else {");
        em.indent();
        ctx.push_scope();
        emit_statements(body, ctx, em);
        ctx.pop_scope();
        em.dedent();
    }
    em.emit("}");
}

fn collect_if_chain<'a>(stmt: &'a IfStatement, branches: &mut Vec<(&'a Pipeline, &'a Vec<Statement>)>) -> Option<&'a Vec<Statement>> {
    branches.push((&*stmt.test, &stmt.consequent));
    match &stmt.alternate {
        None => None,
        Some(IfAlternate::Else(body)) => Some(body),
        Some(IfAlternate::ElseIf(next)) => collect_if_chain(next, branches),
    }
}

fn emit_for(stmt: &ForStatement, ctx: &mut Context, em: &mut Emitter) {
    let items = word::expand_for_items(&stmt.items, ctx);
    let var = crate::emitter::escape::sanitize_identifier(&stmt.variable);
    em.emit(format!("for (const {var} of [{}]) {{", items.join(", ")));
    em.indent();
    ctx.push_scope();
    ctx.declare_variable(&stmt.variable, DeclKind::LocalLet);
    emit_statements(&stmt.body, ctx, em);
    ctx.pop_scope();
    em.dedent();
    em.emit("}");
}

fn emit_c_style_for(stmt: &CStyleForStatement, ctx: &mut Context, em: &mut Emitter) {
    ctx.push_scope();
    if let Some(ArithmeticExpression::Assignment { target, .. }) = &stmt.init {
        em.emit(format!("let {};", crate::emitter::escape::sanitize_identifier(target)));
        ctx.declare_variable(target, DeclKind::Let);
    }
    let init_expr = stmt.init.as_ref().map(|e| arithmetic::arith_expr(e, ctx)).unwrap_or_default();
    let test_expr = stmt.test.as_ref().map(|e| arithmetic::arith_expr(e, ctx)).unwrap_or_else(|| "true".to_string());
    let update_expr = stmt.update.as_ref().map(|e| arithmetic::arith_expr(e, ctx)).unwrap_or_default();
    em.emit(format!("for ({init_expr}; {test_expr}; {update_expr}) {{"));
    em.indent();
    emit_statements(&stmt.body, ctx, em);
    em.dedent();
    em.emit("}");
    ctx.pop_scope();
}

fn emit_while(stmt: &WhileStatement, ctx: &mut Context, em: &mut Emitter) {
    em.emit("while (true) {");
    em.indent();
    ctx.push_scope();
    let cond = pipeline_exit_code_test(&stmt.test, ctx, em);
    em.emit_block(format!("if (!({cond}))"), |em| em.emit("break;"));
    emit_statements(&stmt.body, ctx, em);
    ctx.pop_scope();
    em.dedent();
    em.emit("}");
}

fn emit_until(stmt: &UntilStatement, ctx: &mut Context, em: &mut Emitter) {
    em.emit("while (true) {");
    em.indent();
    ctx.push_scope();
    let cond = pipeline_exit_code_test(&stmt.test, ctx, em);
    em.emit_block(format!("if ({cond})"), |em| em.emit("break;"));
    emit_statements(&stmt.body, ctx, em);
    ctx.pop_scope();
    em.dedent();
    em.emit("}");
}

fn emit_case(stmt: &CaseStatement, ctx: &mut Context, em: &mut Emitter) {
    let scrutinee_expr = word::word_to_expr(&stmt.scrutinee, ctx);
    let tmp = ctx.get_temp_var("case");
    em.emit(format!("const {tmp} = {scrutinee_expr};"));
    if stmt.clauses.is_empty() {
        return;
    }
    for (i, clause) in stmt.clauses.iter().enumerate() {
        let cond = clause
            .patterns
            .iter()
            .map(|p| test::pattern_match_expr(p, &tmp, ctx))
            .collect::<Vec<_>>()
            .join(" || ");
        let keyword = if i == 0 { "if" } else { "} else if" };
        em.emit(format!("{keyword} ({cond}) {{"));
        em.indent();
        ctx.push_scope();
        emit_statements(&clause.body, ctx, em);
        ctx.pop_scope();
        em.dedent();
    }
    em.emit("}");
}

fn emit_function(stmt: &FunctionDeclaration, ctx: &mut Context, em: &mut Emitter) {
    let name = crate::emitter::escape::sanitize_identifier(&stmt.name);
    em.emit(format!("async function {name}() {{"));
    em.indent();
    ctx.push_scope();
    emit_statement(&stmt.body, ctx, em);
    ctx.pop_scope();
    em.dedent();
    em.emit("}");
}

/// An immediately-invoked, awaited async function literal — subshells
/// must not leak variable changes to the enclosing scope.
fn emit_subshell(stmt: &Subshell, ctx: &mut Context, em: &mut Emitter) {
    em.emit("await (async () => {");
    em.indent();
    ctx.push_scope();
    emit_statements(&stmt.body, ctx, em);
    ctx.pop_scope();
    em.dedent();
    em.emit("})();");
}

/// Brace groups share the enclosing scope; they introduce no new scope
/// boundary of their own.
fn emit_brace_group(stmt: &BraceGroup, ctx: &mut Context, em: &mut Emitter) {
    emit_statements(&stmt.body, ctx, em);
}

fn emit_test_command_statement(stmt: &TestCommand, ctx: &mut Context, em: &mut Emitter) {
    let expr = test::test_condition_expr(&stmt.condition, ctx);
    em.emit(format!("$.lastExitCode = ({expr}) ? 0 : 1;"));
}

fn emit_arithmetic_command_statement(stmt: &ArithmeticCommand, ctx: &mut Context, em: &mut Emitter) {
    let expr = arithmetic::arith_expr(&stmt.expr, ctx);
    em.emit(format!("$.lastExitCode = ({expr}) ? 0 : 1;"));
}

// ---------------------------------------------------------------------
// Command substitution / process substitution nested bodies
// ---------------------------------------------------------------------

/// Renders a nested [`Program`] (the body of `$(...)`, `` `...` ``, or
/// `<(...)`/`>(...)`) as the body of an async arrow function whose
/// result is the last command's `{stdout, stderr, code}`.
fn emit_program_expr_body(program: &Program, ctx: &mut Context) -> String {
    let mut em = Emitter::new(ctx.config.indent_str.clone());
    ctx.push_scope();
    let mut produced_return = false;
    let n = program.statements.len();
    for (i, stmt) in program.statements.iter().enumerate() {
        if i + 1 == n {
            if let Some(expr) = last_statement_result_expr(stmt, ctx) {
                em.emit(format!("return await {expr};"));
                produced_return = true;
                continue;
            }
        }
        emit_statement(stmt, ctx, &mut em);
    }
    if !produced_return {
        em.emit("return { stdout: \"\", stderr: \"\", code: 0 };");
    }
    ctx.pop_scope();
    em.finish(false)
}

fn last_statement_result_expr(stmt: &Statement, ctx: &mut Context) -> Option<String> {
    match stmt {
        Statement::Command(cmd) if !cmd.is_pure_assignment() => {
            Some(command::apply_redirections(command::command_call_expr(cmd, ctx, false), cmd, ctx))
        }
        Statement::Pipeline(p) => match p.operator {
            Some(PipeOperator::Pipe) | Some(PipeOperator::PipeMerge) => Some(build_pipe_chain(&p.stages, ctx)),
            None => last_statement_result_expr(&p.stages[0], ctx),
            _ => None,
        },
        _ => None,
    }
}
