//! Seed test 6: for N modules producing N object paths, the result at index
//! `i` corresponds to module `i` regardless of which worker thread finishes
//! first, and this holds across repeated runs.

use c3cd::codegen::{codegen_all, gen_all, Backend, StubBackend};
use c3cd::context::GlobalContext;
use std::sync::Arc;

fn make_module_with_decl(ctx: &mut GlobalContext, name: &str) -> c3cd::module::ModuleId {
    let path = ctx.interner.intern(name);
    let module = ctx.find_or_create_module(path, None);
    let decl_name = ctx.interner.intern("f");
    let id = ctx.decl_arena.alloc_zeroed();
    *ctx.decl_mut(id) = c3cd::module::Declaration {
        name: decl_name,
        owner: module,
        ..c3cd::module::Declaration::default()
    };
    ctx.module_mut(module).decls.push(id);
    module
}

#[test]
fn object_paths_stay_indexed_by_module_regardless_of_finish_order() {
    const N: usize = 12;

    for _run in 0..2 {
        let mut ctx = GlobalContext::init(None);
        let modules: Vec<_> = (0..N)
            .map(|i| make_module_with_decl(&mut ctx, &format!("mod.{i}")))
            .collect();

        let backend: Arc<dyn Backend> = Arc::new(StubBackend);
        backend.setup();
        let contexts = gen_all(&ctx, backend.as_ref(), &modules);
        assert_eq!(contexts.len(), N);

        let results = codegen_all(Arc::clone(&backend), contexts).unwrap();
        assert_eq!(results.len(), N);
        for (i, path) in results.iter().enumerate() {
            let path = path.as_ref().expect("stub backend always produces a path");
            assert_eq!(path, &std::path::PathBuf::from(format!("mod.{i}.o")));
        }
    }
}
