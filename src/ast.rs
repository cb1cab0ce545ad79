//! Arena-resident AST, expression, and type-info records.
//!
//! These three arenas (plus source-location, declaration, token-type, and
//! token-data in [`crate::context`]) are the seven domain-appropriate
//! arenas spec §4.C calls for. Everything here is a `Handle<_>` into one of
//! them rather than an owned tree, so freeing the arenas between analysis
//! and codegen (spec §4.E step 5) invalidates all of it in one move instead
//! of requiring a recursive `Drop`.

use crate::arena::Handle;
use crate::intern::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Default)]
pub enum Expr {
    #[default]
    Unit,
    IntLit(i64),
    BoolLit(bool),
    StrLit(Symbol),
    Ident(Symbol),
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Call {
        callee: Symbol,
        args: Vec<ExprId>,
    },
}

pub type ExprId = Handle<Expr>;

#[derive(Debug, Clone, Default)]
pub enum Stmt {
    #[default]
    Empty,
    Return(Option<ExprId>),
    ExprStmt(ExprId),
    Block(Vec<StmtId>),
}

pub type StmtId = Handle<Stmt>;

/// A resolved type, as produced by the `DECLS` pass (spec §4.D pass 4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeInfo {
    #[default]
    Unknown,
    Void,
    Int,
    Bool,
    Named(Symbol),
}

pub type TypeId = Handle<TypeInfo>;

#[derive(Debug, Clone, Default)]
pub struct SourceLoc {
    pub file: Symbol,
    pub line: u32,
    pub column: u32,
}

pub type SourceLocId = Handle<SourceLoc>;
