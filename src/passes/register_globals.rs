//! `REGISTER_GLOBALS` (spec §4.D pass 2): populate the module-local symbol
//! table with top-level declaration names, and mirror public/external ones
//! into the module's public table plus the global/qualified tables (spec
//! §4.C `compiler_register_public_symbol`).

use crate::context::GlobalContext;
use crate::module::{ModuleId, Visibility};

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let decls = ctx.module(module).decls.clone();
    for decl_id in decls {
        let decl = ctx.decl(decl_id);
        let name = decl.name;
        let is_public = matches!(decl.visibility, Visibility::Public | Visibility::External);

        ctx.module_mut(module).symbols.set(name, decl_id);
        if is_public {
            ctx.module_mut(module).public_symbols.set(name, decl_id);
            ctx.register_public_symbol(decl_id);
        }
    }
}
