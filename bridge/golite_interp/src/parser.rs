//! Recursive descent parser.
//!
//! Binary expressions use precedence climbing over [`BinaryOp::precedence`].
//! Types are parsed only far enough to skip them (and to pick zero values for
//! `var` declarations).

use std::sync::Arc;

use crate::ast::{
    AssignOp, BinaryOp, Block, Expr, ExprKind, FuncDecl, ImportSpec, Pos, Program, Stmt,
    TypeExpr, UnaryOp,
};
use crate::error::SyntaxError;
use crate::lexer::{lex, Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

/// Parse a complete source unit.
pub fn parse(source: &str) -> ParseResult<Program> {
    let tokens = lex(source)?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, cursor: 0 }
    }

    // Cursor helpers

    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.cursor + offset).min(self.tokens.len().saturating_sub(1));
        self.tokens
            .get(index)
            .map_or(&TokenKind::Eof, |token| &token.kind)
    }

    fn pos(&self) -> Pos {
        self.tokens
            .get(self.cursor)
            .or_else(|| self.tokens.last())
            .map_or(Pos::default(), |token| token.pos)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        kind
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Pos> {
        let pos = self.pos();
        if self.eat(kind) {
            Ok(pos)
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(String, Pos)> {
        let pos = self.pos();
        match self.peek() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok((name, pos))
            }
            _ => Err(self.unexpected("name")),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.pos(),
            format!("unexpected {}, expected {expected}", self.peek().describe()),
        )
    }

    fn skip_semis(&mut self) {
        while self.eat(&TokenKind::Semi) {}
    }

    /// A statement must be followed by `;`, a closing brace, or end of input.
    fn end_stmt(&mut self) -> ParseResult<()> {
        match self.peek() {
            TokenKind::Semi => {
                self.skip_semis();
                Ok(())
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            found => Err(SyntaxError::new(
                self.pos(),
                format!("unexpected {} at end of statement", found.describe()),
            )),
        }
    }

    // Declarations

    fn parse_program(mut self) -> ParseResult<Program> {
        let mut program = Program::default();
        self.skip_semis();

        if self.eat(&TokenKind::Package) {
            let (name, _) = self.expect_ident()?;
            program.package = Some(name);
            self.end_stmt()?;
        }

        while !self.check(&TokenKind::Eof) {
            let stmt = match self.peek() {
                TokenKind::Import => self.parse_import()?,
                TokenKind::Func => Stmt::Func(Arc::new(self.parse_func()?)),
                TokenKind::Package => {
                    return Err(SyntaxError::new(
                        self.pos(),
                        "package clause must be the first statement",
                    ))
                }
                _ => self.parse_stmt()?,
            };
            program.stmts.push(stmt);
            if self.check(&TokenKind::RBrace) {
                return Err(self.unexpected("statement"));
            }
            self.end_stmt()?;
        }

        Ok(program)
    }

    fn parse_import(&mut self) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Import)?;
        let mut specs = Vec::new();
        if self.eat(&TokenKind::LParen) {
            self.skip_semis();
            while !self.check(&TokenKind::RParen) {
                specs.push(self.parse_import_spec()?);
                self.end_stmt_in_group()?;
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            specs.push(self.parse_import_spec()?);
        }
        Ok(Stmt::Import(specs))
    }

    fn parse_import_spec(&mut self) -> ParseResult<ImportSpec> {
        let pos = self.pos();
        match self.advance() {
            TokenKind::Str(path) => Ok(ImportSpec { path, pos }),
            found => Err(SyntaxError::new(
                pos,
                format!("unexpected {}, expected import path", found.describe()),
            )),
        }
    }

    fn end_stmt_in_group(&mut self) -> ParseResult<()> {
        if self.check(&TokenKind::RParen) {
            return Ok(());
        }
        self.expect(&TokenKind::Semi)?;
        self.skip_semis();
        Ok(())
    }

    fn parse_func(&mut self) -> ParseResult<FuncDecl> {
        let pos = self.expect(&TokenKind::Func)?;
        if self.check(&TokenKind::LParen) {
            return Err(SyntaxError::new(
                self.pos(),
                "method declarations are not supported",
            ));
        }
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        let mut variadic = false;
        while !self.check(&TokenKind::RParen) {
            if variadic {
                return Err(SyntaxError::new(
                    self.pos(),
                    "can only use ... with final parameter in list",
                ));
            }
            let (param, _) = self.expect_ident()?;
            params.push(param);
            if self.eat(&TokenKind::Ellipsis) {
                variadic = true;
                self.parse_type()?;
            } else if !matches!(self.peek(), TokenKind::Comma | TokenKind::RParen) {
                self.parse_type()?;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        if !self.check(&TokenKind::LBrace) {
            self.parse_result_type()?;
        }
        let body = self.parse_block()?;

        Ok(FuncDecl {
            name,
            params,
            variadic,
            body,
            pos,
        })
    }

    fn parse_result_type(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) {
                self.parse_type()?;
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            self.parse_type()?;
        }
        Ok(())
    }

    fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        match self.peek().clone() {
            TokenKind::LBracket => {
                self.advance();
                let sized = matches!(self.peek(), TokenKind::Int(_));
                if sized {
                    self.advance();
                }
                self.expect(&TokenKind::RBracket)?;
                let elem = self.parse_type()?;
                Ok(TypeExpr::Slice(Box::new(elem)))
            }
            TokenKind::Star => {
                self.advance();
                self.parse_type()?;
                Ok(TypeExpr::Opaque)
            }
            TokenKind::Func => {
                self.advance();
                self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
                if matches!(
                    self.peek(),
                    TokenKind::Ident(_) | TokenKind::LBracket | TokenKind::Star | TokenKind::LParen
                ) {
                    self.parse_result_type()?;
                }
                Ok(TypeExpr::Opaque)
            }
            TokenKind::Ident(name) if name == "map" => {
                self.advance();
                self.expect(&TokenKind::LBracket)?;
                self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                self.parse_type()?;
                Ok(TypeExpr::Opaque)
            }
            TokenKind::Ident(name) if name == "interface" || name == "struct" => {
                self.advance();
                self.skip_balanced(&TokenKind::LBrace, &TokenKind::RBrace)?;
                Ok(TypeExpr::Opaque)
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(&TokenKind::Dot) {
                    let (member, _) = self.expect_ident()?;
                    return Ok(TypeExpr::Named(format!("{name}.{member}")));
                }
                Ok(TypeExpr::Named(name))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn skip_balanced(&mut self, open: &TokenKind, close: &TokenKind) -> ParseResult<()> {
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                TokenKind::Eof => return Err(self.unexpected(&close.describe())),
                kind if &kind == open => depth += 1,
                kind if &kind == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    // Statements

    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(&TokenKind::LBrace)?;
        self.skip_semis();
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("}"));
            }
            stmts.push(self.parse_stmt()?);
            self.end_stmt()?;
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let pos = self.pos();
        match self.peek() {
            TokenKind::Var => self.parse_var(),
            TokenKind::Return => {
                self.advance();
                if matches!(
                    self.peek(),
                    TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
                ) {
                    Ok(Stmt::Return(None, pos))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expr()?), pos))
                }
            }
            TokenKind::Break => {
                self.advance();
                Ok(Stmt::Break(pos))
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Stmt::Continue(pos))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Func => Err(SyntaxError::new(
                pos,
                "function declarations are only allowed at top level",
            )),
            TokenKind::Import => Err(SyntaxError::new(
                pos,
                "imports must appear at top level",
            )),
            TokenKind::Type => Err(SyntaxError::new(
                pos,
                "type declarations are not supported",
            )),
            _ => self.parse_simple_stmt(),
        }
    }

    fn parse_var(&mut self) -> ParseResult<Stmt> {
        let pos = self.expect(&TokenKind::Var)?;
        let (name, _) = self.expect_ident()?;
        let ty = if self.check(&TokenKind::Assign) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let init = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::Var {
            name,
            ty,
            init,
            pos,
        })
    }

    fn parse_simple_stmt(&mut self) -> ParseResult<Stmt> {
        let pos = self.pos();
        let expr = self.parse_expr()?;

        let op = match self.peek() {
            TokenKind::Define => {
                self.advance();
                let ExprKind::Ident(name) = expr.kind else {
                    return Err(SyntaxError::new(
                        expr.pos,
                        "non-name on left side of :=",
                    ));
                };
                let value = self.parse_expr()?;
                return Ok(Stmt::Define { name, value, pos });
            }
            TokenKind::Inc | TokenKind::Dec => {
                let delta = if self.advance() == TokenKind::Inc { 1 } else { -1 };
                Self::check_assignable(&expr)?;
                return Ok(Stmt::IncDec {
                    target: expr,
                    delta,
                    pos,
                });
            }
            TokenKind::Assign => AssignOp::Set,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            TokenKind::PercentAssign => AssignOp::Rem,
            _ => return Ok(Stmt::Expr(expr)),
        };

        self.advance();
        Self::check_assignable(&expr)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign {
            target: expr,
            op,
            value,
            pos,
        })
    }

    fn check_assignable(expr: &Expr) -> ParseResult<()> {
        match &expr.kind {
            ExprKind::Ident(_) => Ok(()),
            ExprKind::Index(base, _) => Self::check_assignable(base),
            _ => Err(SyntaxError::new(
                expr.pos,
                "cannot assign to expression (neither addressable nor a map index expression)",
            )),
        }
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let pos = self.expect(&TokenKind::If)?;
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.eat(&TokenKind::Semi) {
            (Some(Box::new(first)), self.parse_expr()?)
        } else {
            match first {
                Stmt::Expr(cond) => (None, cond),
                _ => {
                    return Err(SyntaxError::new(
                        pos,
                        "missing condition in if statement",
                    ))
                }
            }
        };
        let then = self.parse_block()?;
        let otherwise = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };
        Ok(Stmt::If {
            init,
            cond,
            then,
            otherwise,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let pos = self.expect(&TokenKind::For)?;

        if self.check(&TokenKind::LBrace) {
            return Ok(Stmt::For {
                init: None,
                cond: None,
                post: None,
                body: self.parse_block()?,
            });
        }

        if self.at_range_clause() {
            return self.parse_range(pos);
        }

        let init = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };

        if !self.eat(&TokenKind::Semi) {
            return match init {
                Some(Stmt::Expr(cond)) => Ok(Stmt::For {
                    init: None,
                    cond: Some(cond),
                    post: None,
                    body: self.parse_block()?,
                }),
                _ => Err(SyntaxError::new(
                    pos,
                    "expected for loop condition",
                )),
            };
        }

        let cond = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semi)?;
        let post = if self.check(&TokenKind::LBrace) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        let body = self.parse_block()?;

        Ok(Stmt::For {
            init: init.map(Box::new),
            cond,
            post,
            body,
        })
    }

    /// `range x`, `k := range x`, `k, v := range x` (or with `=`).
    fn at_range_clause(&self) -> bool {
        let assigns = |kind: &TokenKind| matches!(kind, TokenKind::Define | TokenKind::Assign);
        match (self.peek_at(0), self.peek_at(1), self.peek_at(2)) {
            (TokenKind::Range, _, _) => true,
            (TokenKind::Ident(_), op, TokenKind::Range) => assigns(op),
            (TokenKind::Ident(_), TokenKind::Comma, TokenKind::Ident(_)) => {
                assigns(self.peek_at(3)) && self.peek_at(4) == &TokenKind::Range
            }
            _ => false,
        }
    }

    fn parse_range(&mut self, pos: Pos) -> ParseResult<Stmt> {
        let mut key = None;
        let mut value = None;
        if !self.eat(&TokenKind::Range) {
            key = Some(self.expect_ident()?.0);
            if self.eat(&TokenKind::Comma) {
                value = Some(self.expect_ident()?.0);
            }
            self.advance();
            self.expect(&TokenKind::Range)?;
        }
        let blank = |name: Option<String>| name.filter(|n| n != "_");
        let iterable = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::Range {
            key: blank(key),
            value: blank(value),
            iterable,
            body,
            pos,
        })
    }

    // Expressions

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = binary_op(self.peek()) {
            if op.precedence() < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary(op.precedence() + 1)?;
            let pos = left.pos;
            left = Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), pos);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let pos = self.pos();
        let op = match self.peek() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Plus => {
                self.advance();
                return self.parse_unary();
            }
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::new(ExprKind::Unary(op, Box::new(operand)), pos))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let pos = expr.pos;
            match self.peek() {
                TokenKind::LParen => {
                    self.advance();
                    let (args, spread) = self.parse_call_args()?;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            spread,
                        },
                        pos,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Expr::new(ExprKind::Index(Box::new(expr), Box::new(index)), pos);
                }
                TokenKind::Dot => {
                    self.advance();
                    let (member, _) = self.expect_ident()?;
                    expr = Expr::new(ExprKind::Selector(Box::new(expr), member), pos);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_call_args(&mut self) -> ParseResult<(Vec<Expr>, bool)> {
        let mut args = Vec::new();
        let mut spread = false;
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Ellipsis) {
                spread = true;
                self.eat(&TokenKind::Comma);
                break;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok((args, spread))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let pos = self.pos();
        let kind = match self.peek().clone() {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Nil => ExprKind::Nil,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_list_literal(),
            TokenKind::Func => {
                return Err(SyntaxError::new(
                    pos,
                    "function literals are not supported",
                ))
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(Expr::new(kind, pos))
    }

    fn parse_list_literal(&mut self) -> ParseResult<Expr> {
        let pos = self.pos();
        self.parse_type()?;
        self.expect(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        self.skip_semis();
        while !self.check(&TokenKind::RBrace) {
            items.push(self.parse_expr()?);
            self.skip_semis();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_semis();
        }
        self.skip_semis();
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::List(items), pos))
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::OrOr => BinaryOp::Or,
        _ => return None,
    })
}
