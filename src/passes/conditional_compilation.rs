//! `CONDITIONAL_COMPILATION` (spec §4.D pass 3): evaluate `$if`/`$else`
//! gates captured at parse time and prune declarations whose guard isn't
//! satisfied by the active compile-time flags.
//!
//! Gates are resolved against `ct_guard`, a name the parser already turned
//! into either the flag itself (`$if(flag)`) or `flag$false` (the `$else`
//! arm, or a negated `$if(!flag)`) — see [`crate::parser::guard_symbol`].
//! A declaration survives iff it has no guard, or its guard name names a
//! flag that is currently set.

use crate::context::GlobalContext;
use crate::module::ModuleId;

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let flags = ctx.ct_flags.clone();
    let decls = ctx.module(module).decls.clone();
    let mut kept = Vec::with_capacity(decls.len());

    for decl_id in decls {
        let guard = ctx.decl(decl_id).ct_guard;
        let survives = match guard {
            None => true,
            Some(guard_name) => {
                let guard_text = ctx.interner.resolve(guard_name).to_string();
                if let Some(flag_name) = guard_text.strip_suffix("$false") {
                    let flag = ctx.interner.intern(flag_name);
                    !flags.contains(&flag)
                } else {
                    flags.contains(&guard_name)
                }
            }
        };
        if survives {
            kept.push(decl_id);
        }
    }

    ctx.module_mut(module).decls = kept;
}
