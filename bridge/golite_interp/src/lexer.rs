//! Lexer for Golite using logos.
//!
//! Follows Go's automatic semicolon insertion: a newline (or end of input)
//! after an identifier, literal, `return`/`break`/`continue`, `++`/`--` or a
//! closing bracket becomes a `;`. All other newlines are dropped.

use logos::Logos;

use crate::ast::Pos;
use crate::error::SyntaxError;

/// Raw token from logos (before unescaping and semicolon insertion).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
    #[token("\n")]
    Newline,

    // Keywords
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("nil")]
    Nil,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,

    // Assignment
    #[token(":=")]
    Define,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Not,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    HexInt(i64),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,
    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Token kinds seen by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Str(String),

    Break,
    Continue,
    Else,
    False,
    For,
    Func,
    If,
    Import,
    Nil,
    Package,
    Range,
    Return,
    True,
    Type,
    Var,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Dot,
    Ellipsis,

    Define,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    Inc,
    Dec,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Not,

    Eof,
}

impl TokenKind {
    /// Whether a newline directly after this token ends the statement.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    /// Source-like rendering used in syntax errors.
    pub fn describe(&self) -> String {
        let text = match self {
            TokenKind::Ident(name) => return format!("name {name}"),
            TokenKind::Int(n) => return format!("literal {n}"),
            TokenKind::Str(s) => return format!("literal {s:?}"),
            TokenKind::Semi => return "newline".to_string(),
            TokenKind::Eof => return "EOF".to_string(),
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Nil => "nil",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => "comma",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Define => ":=",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PercentAssign => "%=",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Not => "!",
        };
        text.to_string()
    }
}

/// A token with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { starts }
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line.saturating_sub(1)];
        Pos::new(line as u32, (offset - line_start + 1) as u32)
    }
}

/// Lex `source` into tokens, ending with [`TokenKind::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let index = LineIndex::new(source);
    let mut tokens: Vec<Token> = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let pos = index.pos(logos.span().start);
        let slice = logos.slice();

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => return Err(SyntaxError::new(pos, invalid_token_message(slice))),
        };

        let kind = match raw {
            RawToken::LineComment => continue,
            RawToken::BlockComment if !slice.contains('\n') => continue,
            RawToken::Newline | RawToken::BlockComment => {
                insert_semicolon(&mut tokens, pos);
                continue;
            }
            RawToken::String => TokenKind::Str(unescape(&slice[1..slice.len() - 1], pos)?),
            RawToken::RawString => TokenKind::Str(slice[1..slice.len() - 1].replace('\r', "")),
            other => convert_token(other, slice),
        };
        tokens.push(Token { kind, pos });
    }

    let eof = index.pos(source.len());
    insert_semicolon(&mut tokens, eof);
    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: eof,
    });
    Ok(tokens)
}

fn insert_semicolon(tokens: &mut Vec<Token>, pos: Pos) {
    if tokens.last().is_some_and(|t| t.kind.ends_statement()) {
        tokens.push(Token {
            kind: TokenKind::Semi,
            pos,
        });
    }
}

fn invalid_token_message(slice: &str) -> String {
    if slice.starts_with('"') {
        "string literal not terminated".to_string()
    } else if slice.starts_with('`') {
        "raw string literal not terminated".to_string()
    } else if slice.starts_with("/*") {
        "comment not terminated".to_string()
    } else if slice.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        format!("integer literal {slice} out of range")
    } else {
        format!("invalid character {slice:?}")
    }
}

fn unescape(content: &str, pos: Pos) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('a') => '\u{7}',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('x') => {
                let digits: String = chars.by_ref().take(2).collect();
                match u8::from_str_radix(&digits, 16) {
                    Ok(byte) if digits.len() == 2 && byte.is_ascii() => char::from(byte),
                    _ => return Err(SyntaxError::new(pos, "invalid \\x escape sequence")),
                }
            }
            _ => return Err(SyntaxError::new(pos, "unknown escape sequence")),
        };
        out.push(escaped);
    }
    Ok(out)
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Int(n) | RawToken::HexInt(n) => TokenKind::Int(n),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::For => TokenKind::For,
        RawToken::Func => TokenKind::Func,
        RawToken::If => TokenKind::If,
        RawToken::Import => TokenKind::Import,
        RawToken::Nil => TokenKind::Nil,
        RawToken::Package => TokenKind::Package,
        RawToken::Range => TokenKind::Range,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::Type => TokenKind::Type,
        RawToken::Var => TokenKind::Var,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,

        RawToken::Define => TokenKind::Define,
        RawToken::Assign => TokenKind::Assign,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::StarAssign => TokenKind::StarAssign,
        RawToken::SlashAssign => TokenKind::SlashAssign,
        RawToken::PercentAssign => TokenKind::PercentAssign,
        RawToken::Inc => TokenKind::Inc,
        RawToken::Dec => TokenKind::Dec,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::Not => TokenKind::Not,

        // Handled in `lex` before conversion.
        RawToken::LineComment
        | RawToken::BlockComment
        | RawToken::Newline
        | RawToken::String
        | RawToken::RawString => TokenKind::Semi,
    }
}

#[cfg(test)]
mod tests;
