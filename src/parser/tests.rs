use super::*;

fn parse_ok(src: &str) -> Program {
    parse(src).unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"))
}

#[test]
fn simple_command() {
    let prog = parse_ok("echo hello world");
    assert_eq!(prog.statements.len(), 1);
    match &prog.statements[0] {
        Statement::Pipeline(p) => {
            assert!(p.operator.is_none());
            assert_eq!(p.stages.len(), 1);
            match &p.stages[0] {
                Statement::Command(c) => {
                    assert_eq!(c.name.raw, "echo");
                    assert_eq!(c.args.len(), 2);
                }
                other => panic!("unexpected: {other:?}"),
            }
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn pipeline_flattens_same_operator() {
    let prog = parse_ok("a | b | c");
    match &prog.statements[0] {
        Statement::Pipeline(p) => {
            assert_eq!(p.operator, Some(PipeOperator::Pipe));
            assert_eq!(p.stages.len(), 3);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn background_pipeline_is_marked() {
    let prog = parse_ok("sleep 1 &");
    match &prog.statements[0] {
        Statement::Pipeline(p) => assert!(p.background),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn pure_assignment_has_no_name() {
    let prog = parse_ok("FOO=bar");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => {
                assert!(c.is_pure_assignment());
                assert_eq!(c.assignments[0].name, "FOO");
            }
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn env_assignment_prefix_on_command() {
    let prog = parse_ok("FOO=bar echo $FOO");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => {
                assert!(!c.is_pure_assignment());
                assert_eq!(c.assignments.len(), 1);
                assert_eq!(c.name.raw, "echo");
            }
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    let prog = parse_ok("if a; then b; elif c; then d; else e; fi");
    match &prog.statements[0] {
        Statement::If(i) => {
            assert_eq!(i.consequent.len(), 1);
            match i.alternate.as_ref().unwrap() {
                IfAlternate::ElseIf(inner) => {
                    assert_eq!(inner.consequent.len(), 1);
                    assert!(matches!(inner.alternate, Some(IfAlternate::Else(_))));
                }
                other => panic!("unexpected: {other:?}"),
            }
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn for_in_loop() {
    let prog = parse_ok("for x in a b c; do echo $x; done");
    match &prog.statements[0] {
        Statement::For(f) => {
            assert_eq!(f.variable, "x");
            assert_eq!(f.items.len(), 3);
            assert_eq!(f.body.len(), 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn c_style_for_loop() {
    let prog = parse_ok("for ((i=0; i<10; i++)); do echo $i; done");
    match &prog.statements[0] {
        Statement::CStyleFor(f) => {
            assert!(f.init.is_some());
            assert!(f.test.is_some());
            assert!(f.update.is_some());
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn while_loop() {
    let prog = parse_ok("while true; do echo hi; done");
    assert!(matches!(prog.statements[0], Statement::While(_)));
}

#[test]
fn until_loop() {
    let prog = parse_ok("until false; do echo hi; done");
    assert!(matches!(prog.statements[0], Statement::Until(_)));
}

#[test]
fn case_statement_with_wildcard() {
    let prog = parse_ok("case $x in a) echo a ;; b|c) echo bc ;; *) echo other ;; esac");
    match &prog.statements[0] {
        Statement::Case(c) => {
            assert_eq!(c.clauses.len(), 3);
            assert_eq!(c.clauses[1].patterns.len(), 2);
            assert_eq!(c.clauses[2].patterns[0].raw, "*");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn function_keyword_and_shorthand_forms() {
    let prog = parse_ok("function f { echo hi; }\ng() { echo bye; }");
    assert_eq!(prog.statements.len(), 2);
    match &prog.statements[0] {
        Statement::Function(f) => assert_eq!(f.name, "f"),
        other => panic!("unexpected: {other:?}"),
    }
    match &prog.statements[1] {
        Statement::Function(f) => assert_eq!(f.name, "g"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn subshell_and_brace_group() {
    let prog = parse_ok("(echo hi)\n{ echo bye; }");
    assert!(matches!(prog.statements[0], Statement::Subshell(_)));
    assert!(matches!(prog.statements[1], Statement::BraceGroup(_)));
}

#[test]
fn double_bracket_test_command() {
    let prog = parse_ok("[[ -f foo.txt ]]");
    match &prog.statements[0] {
        Statement::TestCommand(t) => {
            assert!(matches!(t.condition, TestCondition::Unary { op: UnaryTestOp::FileRegular, .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn double_bracket_binary_comparison_and_logical() {
    let prog = parse_ok("[[ $a == $b && -n $c ]]");
    match &prog.statements[0] {
        Statement::TestCommand(t) => {
            assert!(matches!(t.condition, TestCondition::Logical { op: LogicalOp::And, .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn not_equal_inside_double_bracket() {
    let prog = parse_ok("[[ $a != $b ]]");
    match &prog.statements[0] {
        Statement::TestCommand(t) => {
            assert!(matches!(t.condition, TestCondition::Binary { op: BinaryTestOp::StringNe, .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn arithmetic_command() {
    let prog = parse_ok("((x = 1 + 2))");
    assert!(matches!(prog.statements[0], Statement::ArithmeticCommand(_)));
}

#[test]
fn redirections_are_parsed() {
    let prog = parse_ok("cmd > out.txt 2>&1 < in.txt");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => assert_eq!(c.redirects.len(), 3),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn heredoc_body_is_attached() {
    let prog = parse_ok("cat <<EOF\nhello\nworld\nEOF\n");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => {
                assert_eq!(c.redirects.len(), 1);
                assert_eq!(c.redirects[0].target.raw, "hello\nworld\n");
            }
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn process_substitution_argument() {
    let prog = parse_ok("diff <(sort a.txt) <(sort b.txt)");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => {
                assert_eq!(c.args.len(), 2);
                assert!(matches!(c.args[0].parts[0], WordPart::ProcessSubst(_)));
            }
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn differing_pipe_operators_build_left_associative_tree() {
    let prog = parse_ok("a && b | c");
    match &prog.statements[0] {
        Statement::Pipeline(outer) => {
            assert_eq!(outer.operator, Some(PipeOperator::Pipe));
            assert_eq!(outer.stages.len(), 2);
            assert!(matches!(outer.stages[0], Statement::Pipeline(_)));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn recovery_mode_keeps_statements_before_the_error() {
    // The unclosed subshell swallows everything to EOF looking for `)`
    // and is discarded, but `echo a` parsed before it must survive.
    let (prog, diags) = parse_with_recovery("echo a\n(echo b\necho c");
    assert!(!diags.is_empty());
    assert_eq!(prog.statements.len(), 1);
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => assert_eq!(c.name.raw, "echo"),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn if_as_argument_is_still_a_word() {
    let prog = parse_ok("echo if then fi");
    match &prog.statements[0] {
        Statement::Pipeline(p) => match &p.stages[0] {
            Statement::Command(c) => assert_eq!(c.args.len(), 3),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}
