//! Staged semantic analysis scheduler (spec §4.D): drives every non-generic
//! module through the fixed pass pipeline, one stage at a time across the
//! whole module list, so that stage *k+1* of any module never starts
//! before stage *k* has finished for every module.

use crate::context::GlobalContext;
use crate::module::{ModuleId, Stage};
use crate::passes;

/// Advance one module up to (but not past) `target_stage`, running one pass
/// per stage. Stops early — leaving the module at the failing stage — the
/// moment the global error counter goes nonzero (spec §4.D).
pub fn sema_analyze_stage(ctx: &mut GlobalContext, module: ModuleId, target_stage: Stage) {
    debug_assert!(ctx.module(module).stage <= target_stage);
    while ctx.module(module).stage < target_stage {
        let next = ctx
            .module(module)
            .stage
            .next()
            .expect("stage < target_stage implies a next stage exists");
        passes::run_stage(ctx, module, next);
        ctx.module_mut(module).stage = next;
        let index = ctx.module_list.iter().position(|&m| m == module).unwrap_or(usize::MAX);
        ctx.stage_log.push((index, next));

        if ctx.error_count > 0 {
            return;
        }
    }
}

/// Run every non-generic module (in parse order) up to `target_stage`, then
/// report whether the compilation should continue (spec §4.D
/// `analyze_to_stage`). The generic module list is never scheduled (spec §3).
pub fn analyze_to_stage(ctx: &mut GlobalContext, target_stage: Stage) -> bool {
    let modules = ctx.module_list.clone();
    for module in modules {
        sema_analyze_stage(ctx, module, target_stage);
    }
    ctx.error_count == 0
}

/// Drive the whole pipeline from `Imports` through `Functions`. Returns
/// `true` iff every stage sweep completed with zero accumulated errors.
pub fn analyze_all(ctx: &mut GlobalContext) -> bool {
    for stage in Stage::PIPELINE {
        if !analyze_to_stage(ctx, stage) {
            return false;
        }
    }
    true
}
