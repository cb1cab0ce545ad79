//! Recursive-descent parser. As a side effect of parsing, declarations are
//! registered into their owning module's `decls` list (spec §3/§6) — the
//! actual name-visibility bookkeeping (local/public/global/qualified
//! tables) is left to the `REGISTER_GLOBALS` pass, not done here.
//!
//! The grammar is a small subset sufficient to drive and test the core:
//! `module`/`import` declarations, `fn`/`const` top-level items, `$if`/
//! `$else` conditional-compilation blocks, and `$assert` compile-time
//! assertions.

use crate::ast::{BinOp, Expr, ExprId, Stmt, StmtId};
use crate::context::GlobalContext;
use crate::intern::Symbol;
use crate::lexer::TokenStream;
use crate::module::{CtAssert, DeclKind, DeclPayload, Declaration, ModuleId, Visibility};
use crate::token::{TokenData, TokenKind};

pub struct Parser<'t> {
    ctx_tokens: &'t TokenStream,
    pos: usize,
}

#[derive(Debug)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t TokenStream) -> Self {
        Parser { ctx_tokens: tokens, pos: 0 }
    }

    fn kind(&self, ctx: &GlobalContext) -> TokenKind {
        self.ctx_tokens.kind(ctx, self.pos)
    }

    fn data(&self, ctx: &GlobalContext) -> TokenData {
        self.ctx_tokens.data(ctx, self.pos)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.ctx_tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, ctx: &GlobalContext, kind: TokenKind) -> Result<(), ParseError> {
        if self.kind(ctx) == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError(format!(
                "expected {kind}, found {}",
                self.kind(ctx)
            )))
        }
    }

    fn ident_text(&mut self, ctx: &GlobalContext) -> Result<Symbol, ParseError> {
        match self.data(ctx) {
            TokenData::Ident(sym) => {
                self.advance();
                Ok(sym)
            }
            _ => Err(ParseError(format!(
                "expected identifier, found {}",
                self.kind(ctx)
            ))),
        }
    }

    /// Parse a dotted path (`a.b.c`) of identifiers into a single interned
    /// symbol, the way module names are always compared as whole paths.
    fn dotted_path(&mut self, ctx: &mut GlobalContext) -> Result<Symbol, ParseError> {
        let mut segments = vec![ctx.interner.resolve(self.ident_text(ctx)?).to_string()];
        while self.kind(ctx) == TokenKind::Dot {
            self.advance();
            segments.push(ctx.interner.resolve(self.ident_text(ctx)?).to_string());
        }
        Ok(ctx.interner.intern(&segments.join(".")))
    }

    /// Parse one source file's worth of tokens, registering the module (if
    /// declared) and its top-level declarations into `ctx`. Returns the
    /// owning module (falling back to `default_module` if the file has no
    /// `module` declaration).
    pub fn parse(
        &mut self,
        ctx: &mut GlobalContext,
        default_module: ModuleId,
    ) -> Result<ModuleId, ParseError> {
        let mut module = default_module;

        if self.kind(ctx) == TokenKind::Module {
            self.advance();
            let name = self.dotted_path(ctx)?;
            self.expect(ctx, TokenKind::Semi)?;
            module = ctx.find_or_create_module(name, None);
        }

        while self.kind(ctx) != TokenKind::Eof {
            if self.kind(ctx) == TokenKind::Import {
                self.advance();
                let name = self.dotted_path(ctx)?;
                self.expect(ctx, TokenKind::Semi)?;
                ctx.module_mut(module).imports.push(name);
                continue;
            }
            self.parse_item(ctx, module, None)?;
        }
        Ok(module)
    }

    fn parse_item(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
        ct_guard: Option<Symbol>,
    ) -> Result<(), ParseError> {
        match self.kind(ctx) {
            TokenKind::DollarIf => self.parse_conditional_block(ctx, module),
            TokenKind::DollarAssert => self.parse_ct_assert(ctx, module, ct_guard),
            TokenKind::Pub => {
                self.advance();
                self.parse_visible_item(ctx, module, Visibility::Public, ct_guard)
            }
            TokenKind::Fn | TokenKind::Const => {
                self.parse_visible_item(ctx, module, Visibility::Private, ct_guard)
            }
            other => Err(ParseError(format!("unexpected top-level token {other}"))),
        }
    }

    fn parse_conditional_block(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
    ) -> Result<(), ParseError> {
        self.advance(); // $if
        self.expect(ctx, TokenKind::LParen)?;
        let negate = if self.kind(ctx) == TokenKind::Bang {
            self.advance();
            true
        } else {
            false
        };
        let flag = self.ident_text(ctx)?;
        self.expect(ctx, TokenKind::RParen)?;
        self.expect(ctx, TokenKind::LBrace)?;
        while self.kind(ctx) != TokenKind::RBrace {
            self.parse_item(ctx, module, Some(guard_symbol(ctx, flag, !negate)))?;
        }
        self.expect(ctx, TokenKind::RBrace)?;

        if self.kind(ctx) == TokenKind::DollarElse {
            self.advance();
            self.expect(ctx, TokenKind::LBrace)?;
            while self.kind(ctx) != TokenKind::RBrace {
                self.parse_item(ctx, module, Some(guard_symbol(ctx, flag, negate)))?;
            }
            self.expect(ctx, TokenKind::RBrace)?;
        }
        Ok(())
    }

    fn parse_ct_assert(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
        _ct_guard: Option<Symbol>,
    ) -> Result<(), ParseError> {
        self.advance(); // $assert
        self.expect(ctx, TokenKind::LParen)?;
        let condition = self.parse_expr(ctx)?;
        self.expect(ctx, TokenKind::Comma)?;
        let message = match self.data(ctx) {
            TokenData::Str(sym) => {
                self.advance();
                sym
            }
            _ => return Err(ParseError("expected string message in $assert".into())),
        };
        self.expect(ctx, TokenKind::RParen)?;
        self.expect(ctx, TokenKind::Semi)?;
        ctx.module_mut(module)
            .ct_asserts
            .push(CtAssert { condition, message });
        Ok(())
    }

    fn parse_visible_item(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
        visibility: Visibility,
        ct_guard: Option<Symbol>,
    ) -> Result<(), ParseError> {
        match self.kind(ctx) {
            TokenKind::Fn => self.parse_function(ctx, module, visibility, ct_guard),
            TokenKind::Const => self.parse_const(ctx, module, visibility, ct_guard),
            other => Err(ParseError(format!("expected item, found {other}"))),
        }
    }

    fn parse_type_name(&mut self, ctx: &mut GlobalContext) -> Result<Symbol, ParseError> {
        match self.kind(ctx) {
            TokenKind::Int => {
                self.advance();
                Ok(ctx.interner.intern("int"))
            }
            TokenKind::Bool => {
                self.advance();
                Ok(ctx.interner.intern("bool"))
            }
            TokenKind::Void => {
                self.advance();
                Ok(ctx.interner.intern("void"))
            }
            TokenKind::Ident => self.ident_text(ctx),
            other => Err(ParseError(format!("expected type name, found {other}"))),
        }
    }

    fn parse_function(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
        visibility: Visibility,
        ct_guard: Option<Symbol>,
    ) -> Result<(), ParseError> {
        self.advance(); // fn
        // c3-style `fn <return-type> <name>(...)`.
        let return_type = self.parse_type_name(ctx)?;
        let name = self.ident_text(ctx)?;
        self.expect(ctx, TokenKind::LParen)?;
        let mut params = Vec::new();
        while self.kind(ctx) != TokenKind::RParen {
            let param_type = self.parse_type_name(ctx)?;
            let param_name = self.ident_text(ctx)?;
            params.push((param_name, param_type));
            if self.kind(ctx) == TokenKind::Comma {
                self.advance();
            }
        }
        self.expect(ctx, TokenKind::RParen)?;
        self.expect(ctx, TokenKind::LBrace)?;
        let mut body = Vec::new();
        while self.kind(ctx) != TokenKind::RBrace {
            body.push(self.parse_stmt(ctx)?);
        }
        self.expect(ctx, TokenKind::RBrace)?;

        let decl_id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(decl_id) = Declaration {
            name,
            kind: DeclKind::Function,
            visibility,
            owner: module,
            ct_guard,
            payload: DeclPayload::Function {
                params,
                return_type,
                body,
            },
            ..Declaration::default()
        };
        ctx.module_mut(module).decls.push(decl_id);
        Ok(())
    }

    fn parse_const(
        &mut self,
        ctx: &mut GlobalContext,
        module: ModuleId,
        visibility: Visibility,
        ct_guard: Option<Symbol>,
    ) -> Result<(), ParseError> {
        self.advance(); // const
        let type_name = self.parse_type_name(ctx)?;
        let name = self.ident_text(ctx)?;
        self.expect(ctx, TokenKind::Assign)?;
        let value = self.parse_expr(ctx)?;
        self.expect(ctx, TokenKind::Semi)?;

        let decl_id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(decl_id) = Declaration {
            name,
            kind: DeclKind::Constant,
            visibility,
            owner: module,
            ct_guard,
            payload: DeclPayload::Constant { type_name, value },
            ..Declaration::default()
        };
        ctx.module_mut(module).decls.push(decl_id);
        Ok(())
    }

    fn parse_stmt(&mut self, ctx: &mut GlobalContext) -> Result<StmtId, ParseError> {
        match self.kind(ctx) {
            TokenKind::Return => {
                self.advance();
                let value = if self.kind(ctx) == TokenKind::Semi {
                    None
                } else {
                    Some(self.parse_expr(ctx)?)
                };
                self.expect(ctx, TokenKind::Semi)?;
                let id = ctx.ast_arena.alloc_zeroed();
                *ctx.ast_arena.deref_mut(id) = Stmt::Return(value);
                Ok(id)
            }
            _ => {
                let expr = self.parse_expr(ctx)?;
                self.expect(ctx, TokenKind::Semi)?;
                let id = ctx.ast_arena.alloc_zeroed();
                *ctx.ast_arena.deref_mut(id) = Stmt::ExprStmt(expr);
                Ok(id)
            }
        }
    }

    fn parse_expr(&mut self, ctx: &mut GlobalContext) -> Result<ExprId, ParseError> {
        self.parse_binary(ctx, 0)
    }

    fn parse_binary(&mut self, ctx: &mut GlobalContext, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_primary(ctx)?;
        loop {
            let Some((op, prec)) = binop_for(self.kind(ctx)) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(ctx, prec + 1)?;
            let id = ctx.expr_arena.alloc_zeroed();
            *ctx.expr_arena.deref_mut(id) = Expr::Binary { op, lhs, rhs };
            lhs = id;
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self, ctx: &mut GlobalContext) -> Result<ExprId, ParseError> {
        match self.kind(ctx) {
            TokenKind::Integer => {
                let TokenData::Int(n) = self.data(ctx) else {
                    unreachable!()
                };
                self.advance();
                let id = ctx.expr_arena.alloc_zeroed();
                *ctx.expr_arena.deref_mut(id) = Expr::IntLit(n);
                Ok(id)
            }
            TokenKind::True | TokenKind::False => {
                let value = self.kind(ctx) == TokenKind::True;
                self.advance();
                let id = ctx.expr_arena.alloc_zeroed();
                *ctx.expr_arena.deref_mut(id) = Expr::BoolLit(value);
                Ok(id)
            }
            TokenKind::Str => {
                let TokenData::Str(sym) = self.data(ctx) else {
                    unreachable!()
                };
                self.advance();
                let id = ctx.expr_arena.alloc_zeroed();
                *ctx.expr_arena.deref_mut(id) = Expr::StrLit(sym);
                Ok(id)
            }
            TokenKind::Ident => {
                let name = self.ident_text(ctx)?;
                if self.kind(ctx) == TokenKind::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    while self.kind(ctx) != TokenKind::RParen {
                        args.push(self.parse_expr(ctx)?);
                        if self.kind(ctx) == TokenKind::Comma {
                            self.advance();
                        }
                    }
                    self.expect(ctx, TokenKind::RParen)?;
                    let id = ctx.expr_arena.alloc_zeroed();
                    *ctx.expr_arena.deref_mut(id) = Expr::Call { callee: name, args };
                    Ok(id)
                } else {
                    let id = ctx.expr_arena.alloc_zeroed();
                    *ctx.expr_arena.deref_mut(id) = Expr::Ident(name);
                    Ok(id)
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(ctx)?;
                self.expect(ctx, TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(ParseError(format!("unexpected token in expression: {other}"))),
        }
    }
}

fn binop_for(kind: TokenKind) -> Option<(BinOp, u8)> {
    Some(match kind {
        TokenKind::OrOr => (BinOp::Or, 1),
        TokenKind::AndAnd => (BinOp::And, 2),
        TokenKind::EqEq => (BinOp::Eq, 3),
        TokenKind::NotEq => (BinOp::Ne, 3),
        TokenKind::Lt => (BinOp::Lt, 4),
        TokenKind::Le => (BinOp::Le, 4),
        TokenKind::Gt => (BinOp::Gt, 4),
        TokenKind::Ge => (BinOp::Ge, 4),
        TokenKind::Plus => (BinOp::Add, 5),
        TokenKind::Minus => (BinOp::Sub, 5),
        TokenKind::Star => (BinOp::Mul, 6),
        TokenKind::Slash => (BinOp::Div, 6),
        _ => return None,
    })
}

/// `$if(flag)` stores a guard meaning "this declaration is only kept when
/// `flag` evaluates to `expect_true`"; represented as two interned names
/// (`flag` and `flag$false`) so a plain `SymbolTable<DeclId>`-style lookup
/// isn't needed to tell a true-guard from a false-guard.
fn guard_symbol(ctx: &mut GlobalContext, flag: Symbol, expect_true: bool) -> Symbol {
    let flag_text = ctx.interner.resolve(flag).to_string();
    if expect_true {
        flag
    } else {
        ctx.interner.intern(&format!("{flag_text}$false"))
    }
}
