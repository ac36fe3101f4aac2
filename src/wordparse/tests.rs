use super::*;
use crate::ast::WordPart;

fn literal_parts(raw: &str) -> Vec<WordPart> {
    parse_word_parts(raw, false).0
}

#[test]
fn plain_literal_has_one_part() {
    let parts = literal_parts("hello");
    assert_eq!(parts, vec![WordPart::Literal("hello".to_string())]);
}

#[test]
fn single_quoted_word_never_expands() {
    let (parts, diags) = parse_word_parts("$HOME `cmd`", true);
    assert_eq!(parts, vec![WordPart::Literal("$HOME `cmd`".to_string())]);
    assert!(diags.is_empty());
}

#[test]
fn simple_parameter_expansion() {
    let parts = literal_parts("$HOME");
    match &parts[0] {
        WordPart::Parameter(p) => assert_eq!(p.parameter, "HOME"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn special_parameter_is_single_char() {
    let parts = literal_parts("$?");
    match &parts[0] {
        WordPart::Parameter(p) => assert_eq!(p.parameter, "?"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn braced_parameter_with_default_value() {
    let parts = literal_parts("${FOO:-bar}");
    match &parts[0] {
        WordPart::Parameter(p) => {
            assert_eq!(p.parameter, "FOO");
            assert_eq!(p.modifier, Some(crate::ast::ParamModifier::DefaultValue { null_safe: true }));
            assert_eq!(p.modifier_arg.as_ref().unwrap().raw, "bar");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn braced_parameter_length() {
    let parts = literal_parts("${#FOO}");
    match &parts[0] {
        WordPart::Parameter(p) => {
            assert_eq!(p.parameter, "FOO");
            assert_eq!(p.modifier, Some(crate::ast::ParamModifier::Length));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn remove_prefix_suffix_modifiers() {
    let parts = literal_parts("${FOO#pre}${FOO%%suf}");
    assert_eq!(parts.len(), 2);
    match &parts[0] {
        WordPart::Parameter(p) => assert_eq!(p.modifier, Some(crate::ast::ParamModifier::RemoveShortestPrefix)),
        other => panic!("unexpected: {other:?}"),
    }
    match &parts[1] {
        WordPart::Parameter(p) => assert_eq!(p.modifier, Some(crate::ast::ParamModifier::RemoveLongestSuffix)),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn indirect_reference() {
    let parts = literal_parts("${!NAME}");
    match &parts[0] {
        WordPart::Parameter(p) => {
            assert!(p.indirect);
            assert_eq!(p.parameter, "NAME");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn command_substitution_dollar_paren() {
    let parts = literal_parts("$(echo hi)");
    match &parts[0] {
        WordPart::CommandSubst(cs) => {
            assert!(!cs.backtick);
            assert_eq!(cs.program.statements.len(), 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn command_substitution_backtick() {
    let parts = literal_parts("`echo hi`");
    match &parts[0] {
        WordPart::CommandSubst(cs) => assert!(cs.backtick),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn arithmetic_expansion() {
    let parts = literal_parts("$((1 + 2))");
    assert!(matches!(parts[0], WordPart::Arithmetic(_)));
}

#[test]
fn process_substitution_in_and_out() {
    let parts = literal_parts("<(cmd1)");
    match &parts[0] {
        WordPart::ProcessSubst(ps) => assert_eq!(ps.direction, crate::ast::ProcessSubDirection::In),
        other => panic!("unexpected: {other:?}"),
    }
    let parts = literal_parts(">(cmd2)");
    match &parts[0] {
        WordPart::ProcessSubst(ps) => assert_eq!(ps.direction, crate::ast::ProcessSubDirection::Out),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn literal_and_expansion_interleave() {
    let parts = literal_parts("pre$FOOpost");
    // Greedy name scan consumes "FOOpost" as the parameter name, matching bash.
    match &parts[1] {
        WordPart::Parameter(p) => assert_eq!(p.parameter, "FOOpost"),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(parts[0], WordPart::Literal("pre".to_string()));
}

#[test]
fn glob_translation_basics() {
    assert_eq!(glob_to_regex("*.txt"), "^.*\\.txt$");
    assert_eq!(glob_to_regex("file?.log"), "^file.\\.log$");
    assert_eq!(glob_to_regex("[abc]"), "^[abc]$");
    assert_eq!(glob_to_regex("[!abc]"), "^[^abc]$");
}

#[test]
fn validated_glob_regex_passes_through_well_formed_patterns_without_diagnostics() {
    let mut ctx = crate::emitter::Context::new(crate::emitter::Config::default(), Default::default());
    let regex = glob_to_validated_regex("*.txt", &mut ctx);
    assert_eq!(regex, "^.*\\.txt$");
    assert!(ctx.into_diagnostics().is_empty());
}
