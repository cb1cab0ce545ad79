//! Module and declaration records: the units the analysis scheduler (§4.D)
//! drives through the fixed pass pipeline, and the things passes register
//! into the symbol tables.

use crate::arena::Handle;
use crate::intern::Symbol;
use crate::symtab::SymbolTable;

/// One point in the fixed, totally ordered analysis pipeline (spec §4.D).
/// Variant order *is* the pass order — do not reorder without reordering
/// the actual passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    NotBegun = 0,
    Imports = 1,
    RegisterGlobals = 2,
    ConditionalCompilation = 3,
    Decls = 4,
    CtAssert = 5,
    Functions = 6,
}

impl Stage {
    pub const FIRST: Stage = Stage::Imports;
    pub const LAST: Stage = Stage::Functions;

    /// All stages a module passes through, in order, starting at `Imports`.
    pub const PIPELINE: [Stage; 6] = [
        Stage::Imports,
        Stage::RegisterGlobals,
        Stage::ConditionalCompilation,
        Stage::Decls,
        Stage::CtAssert,
        Stage::Functions,
    ];

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::NotBegun => Some(Stage::Imports),
            Stage::Imports => Some(Stage::RegisterGlobals),
            Stage::RegisterGlobals => Some(Stage::ConditionalCompilation),
            Stage::ConditionalCompilation => Some(Stage::Decls),
            Stage::Decls => Some(Stage::CtAssert),
            Stage::CtAssert => Some(Stage::Functions),
            Stage::Functions => None,
        }
    }
}

/// Identifies a module in [`crate::context::GlobalContext::modules`]. Stable
/// for the process lifetime; modules are never destroyed before exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    Unresolved,
    InProgress,
    Done,
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Function,
    Type,
    Constant,
}

impl Default for DeclKind {
    fn default() -> Self {
        DeclKind::Variable
    }
}

/// A named binding: a variable, function, type, or constant. Lives in the
/// decl arena; ownership is by `owner` (the module it was declared in).
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Symbol,
    pub kind: DeclKind,
    pub visibility: Visibility,
    pub owner: ModuleId,
    pub resolve_status: ResolveStatus,
    pub payload: DeclPayload,
    /// `$if(...)` guard captured during parsing, evaluated and consumed by
    /// the `CONDITIONAL_COMPILATION` stage (spec §4.D pass 3).
    pub ct_guard: Option<Symbol>,
    /// Filled in by the `DECLS` stage (spec §4.D pass 4).
    pub resolved_type: Option<crate::ast::TypeId>,
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            name: Symbol::PLACEHOLDER,
            kind: DeclKind::default(),
            visibility: Visibility::Private,
            owner: ModuleId(0),
            resolve_status: ResolveStatus::Unresolved,
            payload: DeclPayload::None,
            ct_guard: None,
            resolved_type: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum DeclPayload {
    #[default]
    None,
    Function {
        params: Vec<(Symbol, Symbol)>,
        return_type: Symbol,
        body: Vec<crate::ast::StmtId>,
    },
    Constant {
        type_name: Symbol,
        value: crate::ast::ExprId,
    },
}

pub type DeclId = Handle<Declaration>;

/// A `$assert(cond, "message")` captured at parse time; evaluated by the
/// `CT_ASSERT` stage (spec §4.D pass 5).
#[derive(Debug, Clone)]
pub struct CtAssert {
    pub condition: crate::ast::ExprId,
    pub message: Symbol,
}

/// A translation unit grouped under a dotted-path name sharing one symbol
/// namespace (spec §3).
#[derive(Debug, Clone)]
pub struct Module {
    pub name: Symbol,
    pub stage: Stage,
    /// Unqualified name -> declaration in *this* module only.
    pub symbols: SymbolTable<DeclId>,
    /// Subset of `symbols` that is `pub`/`external`, mirrored into the
    /// global and qualified tables by `compiler_register_public_symbol`.
    pub public_symbols: SymbolTable<DeclId>,
    pub generic_params: Option<Vec<Symbol>>,
    pub decls: Vec<DeclId>,
    pub imports: Vec<Symbol>,
    pub ct_asserts: Vec<CtAssert>,
}

impl Module {
    pub fn new(name: Symbol, generic_params: Option<Vec<Symbol>>) -> Self {
        Module {
            name,
            stage: Stage::NotBegun,
            symbols: SymbolTable::init(1 << 16),
            public_symbols: SymbolTable::init(64),
            generic_params,
            decls: Vec::new(),
            imports: Vec::new(),
            ct_asserts: Vec::new(),
        }
    }

    pub fn is_generic(&self) -> bool {
        self.generic_params.is_some()
    }
}
