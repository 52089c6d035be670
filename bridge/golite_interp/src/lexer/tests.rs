#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|t| t.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

#[test]
fn short_var_declaration() {
    assert_eq!(
        kinds("x := 42"),
        vec![
            ident("x"),
            TokenKind::Define,
            TokenKind::Int(42),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn newline_after_operand_inserts_semicolon() {
    assert_eq!(
        kinds("a\nb"),
        vec![
            ident("a"),
            TokenKind::Semi,
            ident("b"),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn newline_after_operator_does_not_insert_semicolon() {
    assert_eq!(
        kinds("a +\nb"),
        vec![
            ident("a"),
            TokenKind::Plus,
            ident("b"),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn closing_brace_ends_statement() {
    assert_eq!(
        kinds("if x {\n}\n"),
        vec![
            TokenKind::If,
            ident("x"),
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("x // trailing\n/* inline */ y"),
        vec![
            ident("x"),
            TokenKind::Semi,
            ident("y"),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn multiline_block_comment_acts_as_newline() {
    assert_eq!(
        kinds("x /* one\ntwo */ y"),
        vec![
            ident("x"),
            TokenKind::Semi,
            ident("y"),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn string_escapes_are_decoded() {
    assert_eq!(
        kinds(r#""a\tb\n\"c\"""#)[0],
        TokenKind::Str("a\tb\n\"c\"".to_string())
    );
}

#[test]
fn hex_escapes_are_decoded() {
    assert_eq!(kinds(r#""\x41\x1b""#)[0], TokenKind::Str("A\u{1b}".to_string()));
    assert_eq!(
        lex(r#""\x4""#).unwrap_err().message,
        "invalid \\x escape sequence"
    );
}

#[test]
fn raw_strings_keep_backslashes() {
    assert_eq!(
        kinds(r"`a\nb`")[0],
        TokenKind::Str("a\\nb".to_string())
    );
}

#[test]
fn hex_integers() {
    assert_eq!(kinds("0xff")[0], TokenKind::Int(255));
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        kinds("func range return"),
        vec![
            TokenKind::Func,
            TokenKind::Range,
            TokenKind::Return,
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn compound_operators() {
    assert_eq!(
        kinds("a += 1; b++; c <= d && e != f"),
        vec![
            ident("a"),
            TokenKind::PlusAssign,
            TokenKind::Int(1),
            TokenKind::Semi,
            ident("b"),
            TokenKind::Inc,
            TokenKind::Semi,
            ident("c"),
            TokenKind::LtEq,
            ident("d"),
            TokenKind::AndAnd,
            ident("e"),
            TokenKind::NotEq,
            ident("f"),
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
}

#[test]
fn positions_are_one_based() {
    let tokens = lex("a\n  bb").unwrap();
    assert_eq!(tokens[0].pos, Pos::new(1, 1));
    assert_eq!(tokens[2].pos, Pos::new(2, 3));
}

#[test]
fn invalid_character_is_reported() {
    let err = lex("x := @").unwrap_err();
    assert_eq!(err.pos, Pos::new(1, 6));
    assert_eq!(err.message, "invalid character \"@\"");
}

#[test]
fn unknown_escape_is_reported() {
    let err = lex(r#""\q""#).unwrap_err();
    assert_eq!(err.message, "unknown escape sequence");
}

#[test]
fn describe_matches_go_wording() {
    assert_eq!(ident("x").describe(), "name x");
    assert_eq!(TokenKind::Int(3).describe(), "literal 3");
    assert_eq!(TokenKind::Semi.describe(), "newline");
    assert_eq!(TokenKind::LBrace.describe(), "{");
}
