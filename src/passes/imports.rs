//! `IMPORTS` (spec §4.D pass 1): resolve each `import` reference to a
//! concrete, already-registered module. Importing a module that no source
//! file ever declared is a front-end error, not a fatal one — it's counted
//! and the scheduler halts after the current stage sweep.

use crate::context::GlobalContext;
use crate::module::ModuleId;

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let imports = ctx.module(module).imports.clone();
    for name in imports {
        if ctx.module_registry.get(name).is_none() {
            let path = ctx.interner.resolve(name).to_string();
            ctx.report_error(module, &format!("unresolved import '{path}'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importing_unknown_module_is_an_error() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let missing = ctx.interner.intern("mod.missing");
        ctx.module_mut(module).imports.push(missing);

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 1);
    }

    #[test]
    fn importing_known_module_is_not_an_error() {
        let mut ctx = GlobalContext::init(None);
        let a_name = ctx.interner.intern("mod.a");
        let b_name = ctx.interner.intern("mod.b");
        let a = ctx.find_or_create_module(a_name, None);
        ctx.find_or_create_module(b_name, None);
        ctx.module_mut(a).imports.push(b_name);

        run(&mut ctx, a);
        assert_eq!(ctx.error_count, 0);
    }
}
