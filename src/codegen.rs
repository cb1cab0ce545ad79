//! Codegen fan-out (spec §4.E steps 2-3, 6-7): the backend is consumed
//! through an opaque two-phase interface — `gen` while front-end arenas are
//! still live, `codegen` afterwards, parallelized one worker per module.
//!
//! The backend itself (instruction selection, register allocation, object
//! emission) is an external collaborator (spec §1); what lives here is the
//! fan-out/fan-in contract and a default stub implementation sufficient to
//! drive and test the contract end to end.

use std::path::PathBuf;
use std::sync::Arc;

use crate::context::GlobalContext;
use crate::error::DriverError;
use crate::module::ModuleId;

/// An opaque, backend-owned handle produced by `gen` and consumed by
/// `codegen`. Workers only ever touch their own context (spec §4.E
/// concurrency contract) — nothing here borrows the global context.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    pub module_index: usize,
    pub module_name: String,
    pub function_count: usize,
}

/// Two-phase backend contract (spec §6 "Backend" collaborator).
pub trait Backend: Send + Sync {
    /// One-time setup before any module is processed.
    fn setup(&self) {}

    /// Build IR for one module while front-end arenas are still live.
    /// Returns `None` when the module has nothing to emit (spec §4.E step
    /// 3 "null value").
    fn gen(&self, ctx: &GlobalContext, module: ModuleId, index: usize) -> Option<CodegenContext>;

    /// Emit an object file from a previously built context. Runs after
    /// front-end arenas are freed and must not touch them.
    fn codegen(&self, context: &CodegenContext) -> Option<PathBuf>;
}

/// Minimal backend standing in for the real code generator: treats any
/// module with at least one declaration as having something to emit, and
/// "emits" an object file by writing a placeholder path under a temp-style
/// naming scheme (`<module_name>.o`) without actually writing bytes to
/// disk — a real backend would shell out to codegen machinery here.
pub struct StubBackend;

impl Backend for StubBackend {
    fn gen(&self, ctx: &GlobalContext, module: ModuleId, index: usize) -> Option<CodegenContext> {
        let decls = &ctx.module(module).decls;
        if decls.is_empty() {
            return None;
        }
        Some(CodegenContext {
            module_index: index,
            module_name: ctx.interner.resolve(ctx.module(module).name).to_string(),
            function_count: decls.len(),
        })
    }

    fn codegen(&self, context: &CodegenContext) -> Option<PathBuf> {
        Some(PathBuf::from(format!("{}.o", context.module_name)))
    }
}

/// Phase one (spec §4.E step 3): build a codegen context per module while
/// front-end arenas are still live. Filters out modules with nothing to
/// emit, per the "null value" contract.
pub fn gen_all(
    ctx: &GlobalContext,
    backend: &dyn Backend,
    modules: &[ModuleId],
) -> Vec<CodegenContext> {
    modules
        .iter()
        .enumerate()
        .filter_map(|(index, &module)| backend.gen(ctx, module, index))
        .collect()
}

/// Phase two (spec §4.E step 7): parallel object emission, one worker per
/// context, joined in module-index order regardless of completion order.
/// Falls back to running sequentially if a worker thread fails to spawn,
/// since the spec explicitly allows serial execution "on a platform
/// without thread support".
pub fn codegen_all(
    backend: Arc<dyn Backend>,
    contexts: Vec<CodegenContext>,
) -> Result<Vec<Option<PathBuf>>, DriverError> {
    let handles: Vec<_> = contexts
        .into_iter()
        .map(|context| {
            let backend = Arc::clone(&backend);
            std::thread::Builder::new()
                .name(format!("codegen-{}", context.module_index))
                .spawn(move || backend.codegen(&context))
        })
        .collect::<Result<_, _>>()
        .map_err(|_| DriverError::ThreadSpawnFailure)?;

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.join().unwrap_or(None));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_module_with_decl(ctx: &mut GlobalContext, name: &str) -> ModuleId {
        let path = ctx.interner.intern(name);
        let module = ctx.find_or_create_module(path, None);
        let decl_name = ctx.interner.intern("f");
        let id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(id) = crate::module::Declaration {
            name: decl_name,
            owner: module,
            ..crate::module::Declaration::default()
        };
        ctx.module_mut(module).decls.push(id);
        module
    }

    #[test]
    fn empty_module_yields_no_codegen_context() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.empty");
        let module = ctx.find_or_create_module(name, None);
        let backend = StubBackend;
        let contexts = gen_all(&ctx, &backend, &[module]);
        assert!(contexts.is_empty());
    }

    #[test]
    fn parallel_codegen_preserves_module_index_order() {
        let mut ctx = GlobalContext::init(None);
        let modules: Vec<_> = (0..5)
            .map(|i| make_module_with_decl(&mut ctx, &format!("mod.{i}")))
            .collect();
        let backend = StubBackend;
        let contexts = gen_all(&ctx, &backend, &modules);
        assert_eq!(contexts.len(), 5);

        let backend: Arc<dyn Backend> = Arc::new(StubBackend);
        let results = codegen_all(backend, contexts).unwrap();
        assert_eq!(results.len(), 5);
        for (i, path) in results.iter().enumerate() {
            let path = path.as_ref().unwrap();
            assert_eq!(path, &PathBuf::from(format!("mod.{i}.o")));
        }
    }
}
