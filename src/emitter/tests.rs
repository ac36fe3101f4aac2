use super::*;

#[test]
fn emit_applies_current_indent() {
    let mut e = Emitter::new("  ");
    e.emit("a");
    e.indent();
    e.emit("b");
    e.dedent();
    e.emit("c");
    let out = e.finish(false);
    assert_eq!(out, "a\n  b\nc\n");
}

#[test]
fn emit_block_wraps_and_restores_indent() {
    let mut e = Emitter::new("  ");
    e.emit_block("if (x)", |e| {
        e.emit("doThing();");
    });
    let out = e.finish(false);
    assert_eq!(out, "if (x) {\n  doThing();\n}\n");
}

#[test]
fn imports_from_same_module_merge() {
    let mut e = Emitter::new("  ");
    e.add_named_import("./runtime.ts", "cmd");
    e.add_named_import("./runtime.ts", "echo");
    e.emit("echo();");
    let out = e.finish(true);
    assert!(out.starts_with("import { cmd, echo } from \"./runtime.ts\";\n"));
}

#[test]
fn imports_suppressed_when_disabled() {
    let mut e = Emitter::new("  ");
    e.add_named_import("./runtime.ts", "cmd");
    e.emit("x();");
    let out = e.finish(false);
    assert!(!out.contains("import"));
}

#[test]
fn context_declares_and_shadows_across_scopes() {
    let mut ctx = Context::new(Config::default(), Default::default());
    ctx.declare_variable("FOO", DeclKind::Let);
    assert!(ctx.is_declared("FOO"));
    ctx.push_scope();
    assert!(ctx.is_declared("FOO"));
    assert!(!ctx.declared_in_current_scope("FOO"));
    ctx.declare_variable("FOO", DeclKind::LocalLet);
    assert!(ctx.declared_in_current_scope("FOO"));
    ctx.pop_scope();
    assert!(!ctx.declared_in_current_scope("FOO"));
}

#[test]
fn temp_var_counter_is_unique_per_prefix() {
    let mut ctx = Context::new(Config::default(), Default::default());
    assert_eq!(ctx.get_temp_var("tmp"), "__tmp0");
    assert_eq!(ctx.get_temp_var("tmp"), "__tmp1");
    assert_eq!(ctx.get_temp_var("other"), "__other0");
}

#[test]
fn snapshot_restore_rolls_back_state() {
    let mut ctx = Context::new(Config::default(), Default::default());
    ctx.declare_variable("X", DeclKind::Let);
    let snap = ctx.snapshot();
    ctx.declare_variable("Y", DeclKind::Let);
    ctx.get_temp_var("t");
    assert!(ctx.is_declared("Y"));
    ctx.restore(snap);
    assert!(!ctx.is_declared("Y"));
    assert_eq!(ctx.get_temp_var("t"), "__t0");
}
