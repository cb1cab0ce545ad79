//! Seed test 4: for any two modules `i` and `j`, every record of module `i`
//! completing stage `k` precedes every record of module `j` completing
//! stage `k+1`, regardless of parse order or per-module error outcomes.

use c3cd::context::GlobalContext;
use c3cd::module::Stage;
use c3cd::scheduler::analyze_all;

#[test]
fn every_module_finishes_stage_k_before_any_reaches_k_plus_1() {
    let mut ctx = GlobalContext::init(None);
    for i in 0..6 {
        let name = ctx.interner.intern(&format!("mod.{i}"));
        ctx.find_or_create_module(name, None);
    }

    analyze_all(&mut ctx);

    let pipeline = Stage::PIPELINE;
    for window in pipeline.windows(2) {
        let (stage, next_stage) = (window[0], window[1]);
        let last_at_stage = ctx
            .stage_log
            .iter()
            .enumerate()
            .filter(|(_, (_, s))| *s == stage)
            .map(|(i, _)| i)
            .max();
        let first_at_next = ctx
            .stage_log
            .iter()
            .enumerate()
            .filter(|(_, (_, s))| *s == next_stage)
            .map(|(i, _)| i)
            .min();

        if let (Some(last), Some(first)) = (last_at_stage, first_at_next) {
            assert!(
                last < first,
                "a module reached {next_stage:?} before every module finished {stage:?}"
            );
        }
    }
}
