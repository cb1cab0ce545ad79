//! One module per stage of the fixed analysis pipeline (spec §4.D). Each
//! pass is a plain function over a single module; the scheduler is what
//! enforces ordering and stop-on-error, not the passes themselves.

pub mod conditional_compilation;
pub mod ct_assert;
pub mod decls;
pub mod functions;
pub mod imports;
pub mod register_globals;

use crate::context::GlobalContext;
use crate::module::{ModuleId, Stage};

/// Run the pass corresponding to `stage` over `module`. `stage` must be one
/// of [`Stage::PIPELINE`] — `NotBegun` has no associated pass.
pub fn run_stage(ctx: &mut GlobalContext, module: ModuleId, stage: Stage) {
    match stage {
        Stage::NotBegun => unreachable!("NotBegun has no pass"),
        Stage::Imports => imports::run(ctx, module),
        Stage::RegisterGlobals => register_globals::run(ctx, module),
        Stage::ConditionalCompilation => conditional_compilation::run(ctx, module),
        Stage::Decls => decls::run(ctx, module),
        Stage::CtAssert => ct_assert::run(ctx, module),
        Stage::Functions => functions::run(ctx, module),
    }
}
