use super::*;
use rstest::rstest;

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::new(src)
        .tokenize()
        .expect("lexing should succeed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn empty_input_yields_only_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn simple_command_is_name_then_words() {
    let kinds = kinds("echo hello world");
    assert_eq!(
        kinds,
        vec![TokenKind::Name, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
    );
}

#[rstest]
#[case("2>file", vec![TokenKind::Number, TokenKind::Great, TokenKind::Word, TokenKind::Eof])]
#[case("two>file", vec![TokenKind::Name, TokenKind::Great, TokenKind::Word, TokenKind::Eof])]
fn number_vs_word_disambiguation(#[case] src: &str, #[case] expected: Vec<TokenKind>) {
    assert_eq!(kinds(src), expected);
}

#[test]
fn assignment_word_detected_at_command_start() {
    let toks = Lexer::new("FOO=bar echo $FOO").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::AssignmentWord);
    assert_eq!(toks[0].lexeme, "FOO=bar");
}

#[test]
fn if_as_argument_is_not_a_reserved_word() {
    let toks = Lexer::new("echo if").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Name);
    assert_eq!(toks[1].kind, TokenKind::Word);
}

#[test]
fn if_at_command_start_is_reserved() {
    let toks = Lexer::new("if true; then echo hi; fi").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::If);
    assert!(toks.iter().any(|t| t.kind == TokenKind::Then));
    assert!(toks.iter().any(|t| t.kind == TokenKind::Fi));
}

#[test]
fn single_quoted_word_is_flagged() {
    let toks = Lexer::new("'hello world'").tokenize().unwrap();
    assert_eq!(toks[0].kind, TokenKind::Word);
    assert!(toks[0].quoted);
    assert!(toks[0].single_quoted);
    assert_eq!(toks[0].lexeme, "hello world");
}

#[test]
fn double_quoted_word_is_quoted_not_single() {
    let toks = Lexer::new("\"hi $USER\"").tokenize().unwrap();
    assert!(toks[0].quoted);
    assert!(!toks[0].single_quoted);
    assert_eq!(toks[0].lexeme, "hi $USER");
}

#[test]
fn ansi_c_quote_processes_escapes() {
    let toks = Lexer::new("$'a\\tb'").tokenize().unwrap();
    assert_eq!(toks[0].lexeme, "a\tb");
    assert!(toks[0].single_quoted);
}

#[rstest]
#[case("&&", TokenKind::AndAnd)]
#[case("||", TokenKind::OrOr)]
#[case("|&", TokenKind::PipeAmp)]
#[case(">>", TokenKind::DGreat)]
#[case("<<", TokenKind::DLess)]
#[case("<<-", TokenKind::DLessDash)]
#[case("<<<", TokenKind::TLess)]
#[case(">&", TokenKind::GreatAnd)]
#[case("<&", TokenKind::LessAnd)]
#[case("<>", TokenKind::LessGreat)]
#[case(">|", TokenKind::Clobber)]
#[case("&>", TokenKind::AndGreat)]
#[case("&>>", TokenKind::AndDGreat)]
#[case(";;", TokenKind::DSemi)]
#[case("<(", TokenKind::LessLParen)]
#[case(">(", TokenKind::GreatLParen)]
fn multi_char_operators_longest_match(#[case] src: &str, #[case] expected: TokenKind) {
    let toks = Lexer::new(src).tokenize().unwrap();
    assert_eq!(toks[0].kind, expected);
    assert_eq!(toks[1].kind, TokenKind::Eof);
}

#[test]
fn double_bracket_and_double_paren() {
    assert_eq!(kinds("[[ -f x ]]")[0], TokenKind::DBrackStart);
    assert_eq!(kinds("((1+2))")[0], TokenKind::DParenStart);
}

#[test]
fn comment_runs_to_end_of_line() {
    let toks = Lexer::new("echo hi # a comment\necho bye").tokenize().unwrap();
    let comment = toks.iter().find(|t| t.kind == TokenKind::Comment).unwrap();
    assert_eq!(comment.lexeme, " a comment");
}

#[test]
fn unterminated_single_quote_is_an_error() {
    let err = Lexer::new("echo 'unterminated").tokenize().unwrap_err();
    assert!(matches!(err, LexError::UnterminatedQuote(..)));
}

#[test]
fn line_and_column_track_newlines() {
    let toks = Lexer::new("echo a\necho b").tokenize().unwrap();
    let second_echo = toks.iter().find(|t| t.lexeme == "b").unwrap();
    assert_eq!(second_echo.line, 2);
}
