//! The global compilation context: the single owned aggregate holding every
//! arena, symbol table, and counter the front end touches (spec §3/§4.C).
//!
//! Kept as one struct passed explicitly to every component, rather than a
//! set of `static`/`OnceLock` globals, so individual passes stay unit
//! testable (spec §9 design note).

use colored::Colorize;
use std::collections::{HashMap, HashSet};

use crate::arena::Arena;
use crate::ast::{Expr, SourceLoc, Stmt, TypeInfo};
use crate::intern::{Interner, Symbol};
use crate::module::{DeclId, Declaration, Module, ModuleId, Stage};
use crate::scratch::ScratchBuffer;
use crate::symtab::SymbolTable;
use crate::token::{TokenData, TokenKind};

/// Reserved declaration value meaning "ambiguous definition; any use is an
/// error" (spec §3). Represented as a tagged variant rather than conflated
/// with "absent", per spec §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolEntry {
    Decl(DeclId),
    Poison,
}

pub struct GlobalContext {
    // Seven domain arenas (spec §2/§4.A).
    pub ast_arena: Arena<Stmt>,
    pub expr_arena: Arena<Expr>,
    pub decl_arena: Arena<Declaration>,
    pub type_info_arena: Arena<TypeInfo>,
    pub source_loc_arena: Arena<SourceLoc>,
    pub token_type_arena: Arena<TokenKind>,
    pub token_data_arena: Arena<TokenData>,

    pub interner: Interner,

    pub modules: Vec<Module>,
    /// Dotted module path -> ModuleId, for both generic and non-generic
    /// modules (spec §3 "two registries" refers to the module *lists*
    /// below, not this lookup table).
    pub module_registry: SymbolTable<ModuleId>,
    /// Parse order; scheduled by the analysis driver.
    pub module_list: Vec<ModuleId>,
    /// Generic (parameterized) modules; *not* scheduled (spec §3/§9).
    pub generic_module_list: Vec<ModuleId>,

    pub global_symbols: SymbolTable<SymbolEntry>,
    pub qualified_symbols: HashMap<Symbol, SymbolTable<SymbolEntry>>,

    pub scratch: ScratchBuffer,

    pub error_count: u32,
    pub warning_count: u32,
    pub panic_mode: bool,

    /// Resolved standard-library directory, if any (spec §4.C step 4).
    pub lib_dir: Option<std::path::PathBuf>,
    /// The synthetic standard-library module, pre-set to the terminal
    /// stage so no pass ever touches it (spec §3/§4.D).
    pub stdlib_module: Option<ModuleId>,

    /// Compile-time flags active for this compilation (e.g. `--define TEST`),
    /// consulted by the `CONDITIONAL_COMPILATION` stage.
    pub ct_flags: HashSet<Symbol>,

    /// `(module_index, stage)` entries recorded as each module completes a
    /// stage; used to verify the scheduler's cross-module ordering
    /// guarantee in tests, otherwise inert.
    pub stage_log: Vec<(usize, Stage)>,
}

impl GlobalContext {
    /// `compiler_init`: must be called exactly once before any parsing
    /// (spec §4.C).
    pub fn init(lib_dir: Option<std::path::PathBuf>) -> Self {
        let ast_arena = Arena::init(4096);
        let expr_arena = Arena::init(4096);
        let decl_arena = Arena::init(1024);
        let type_info_arena = Arena::init(1024);
        let mut source_loc_arena = Arena::init(4096);
        let mut token_type_arena = Arena::init(4096);
        let mut token_data_arena = Arena::init(4096);

        // Discard handle 0 in the arenas that use 0 as a sentinel (spec
        // §3/§4.A). AST/expr arenas have no sentinel convention of their
        // own in this design (nothing ever stores a "null expr" handle),
        // so only the three spec names explicitly.
        source_loc_arena.discard_sentinel();
        token_type_arena.discard_sentinel();
        token_data_arena.discard_sentinel();

        let lib_dir = lib_dir.or_else(crate::source_loader::search_platform_stdlib_dir);

        let mut ctx = GlobalContext {
            ast_arena,
            expr_arena,
            decl_arena,
            type_info_arena,
            source_loc_arena,
            token_type_arena,
            token_data_arena,
            interner: Interner::new(),
            modules: Vec::new(),
            module_registry: SymbolTable::init(64),
            module_list: Vec::new(),
            generic_module_list: Vec::new(),
            global_symbols: SymbolTable::init(4096),
            qualified_symbols: HashMap::new(),
            scratch: ScratchBuffer::new(),
            error_count: 0,
            warning_count: 0,
            panic_mode: false,
            lib_dir,
            stdlib_module: None,
            ct_flags: HashSet::new(),
            stage_log: Vec::new(),
        };

        // Registered directly into `modules`/`module_registry` rather than
        // through `find_or_create_module`, which would append it to the
        // scheduled `module_list` — the stdlib module must be segregated
        // from the modules the analysis driver and codegen iterate over
        // (spec §3 "synthetic standard-library module... pre-set to the
        // terminal state and therefore skipped by every pass").
        let stdlib_name = ctx.interner.intern("$stdlib");
        let stdlib_id = ModuleId(ctx.modules.len() as u32);
        let mut stdlib_module = Module::new(stdlib_name, None);
        stdlib_module.stage = Stage::Functions;
        ctx.modules.push(stdlib_module);
        ctx.module_registry.set(stdlib_name, stdlib_id);
        ctx.stdlib_module = Some(stdlib_id);

        ctx
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0 as usize]
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        self.decl_arena.deref(id)
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        self.decl_arena.deref_mut(id)
    }

    /// Returns the module with this dotted path, creating it (lazily, per
    /// spec §3 "created lazily the first time a module path is
    /// encountered") if it doesn't already exist.
    pub fn find_or_create_module(
        &mut self,
        name: Symbol,
        generic_params: Option<Vec<Symbol>>,
    ) -> ModuleId {
        if let Some(&id) = self.module_registry.get(name) {
            return id;
        }
        let id = ModuleId(self.modules.len() as u32);
        let is_generic = generic_params.is_some();
        self.modules.push(Module::new(name, generic_params));
        self.module_registry.set(name, id);
        if is_generic {
            self.generic_module_list.push(id);
        } else {
            self.module_list.push(id);
        }
        id
    }

    /// `compiler_register_public_symbol`: registers a public declaration
    /// into the global unqualified table and the qualified per-module
    /// table, poisoning either on collision (spec §4.C).
    pub fn register_public_symbol(&mut self, decl_id: DeclId) {
        let name = self.decl(decl_id).name;
        let owner = self.decl(decl_id).owner;
        let owner_name = self.module(owner).name;

        match self.global_symbols.get(name) {
            Some(SymbolEntry::Poison) => {
                // Already poisoned; stays poisoned.
            }
            Some(SymbolEntry::Decl(_)) => {
                self.global_symbols.set(name, SymbolEntry::Poison);
            }
            None => {
                self.global_symbols.set(name, SymbolEntry::Decl(decl_id));
            }
        }

        let namespace = self
            .qualified_symbols
            .entry(owner_name)
            .or_insert_with(|| SymbolTable::init(64));
        match namespace.get(name) {
            Some(SymbolEntry::Poison) => {}
            Some(SymbolEntry::Decl(_)) => {
                namespace.set(name, SymbolEntry::Poison);
            }
            None => {
                namespace.set(name, SymbolEntry::Decl(decl_id));
            }
        }
    }

    pub fn lookup_global(&self, name: Symbol) -> Option<SymbolEntry> {
        self.global_symbols.get(name).copied()
    }

    pub fn lookup_qualified(&self, module_name: Symbol, name: Symbol) -> Option<SymbolEntry> {
        self.qualified_symbols
            .get(&module_name)
            .and_then(|table| table.get(name))
            .copied()
    }

    /// Increment the error counter and print a diagnostic. Passes call
    /// this instead of returning an error out of band (spec §4.D/§7).
    pub fn report_error(&mut self, module: ModuleId, message: &str) {
        let module_name = self.interner.resolve(self.module(module).name).to_string();
        eprintln!(
            "{} [{}] {}",
            "error:".red().bold(),
            module_name,
            message
        );
        self.error_count += 1;
    }

    pub fn report_warning(&mut self, module: ModuleId, message: &str) {
        let module_name = self.interner.resolve(self.module(module).name).to_string();
        eprintln!(
            "{} [{}] {}",
            "warning:".yellow().bold(),
            module_name,
            message
        );
        self.warning_count += 1;
    }

    /// Front-end arenas released between analysis and codegen (spec §4.E
    /// step 5). Token-type is retained because IR may still reference
    /// token kinds; it is freed later, before linking (spec §9 open
    /// question on this boundary).
    pub fn free_front_end_arenas(&mut self) {
        self.ast_arena.free_all();
        self.expr_arena.free_all();
        self.decl_arena.free_all();
        self.type_info_arena.free_all();
        self.source_loc_arena.free_all();
        self.token_data_arena.free_all();
    }

    pub fn free_token_type_arena(&mut self) {
        self.token_type_arena.free_all();
    }

    pub fn front_end_memory_report(&self) -> String {
        format!(
            "ast={}B expr={}B decl={}B type_info={}B src_loc={}B tok_type={}B tok_data={}B",
            self.ast_arena.bytes_allocated(),
            self.expr_arena.bytes_allocated(),
            self.decl_arena.bytes_allocated(),
            self.type_info_arena.bytes_allocated(),
            self.source_loc_arena.bytes_allocated(),
            self.token_type_arena.bytes_allocated(),
            self.token_data_arena.bytes_allocated(),
        )
    }
}
