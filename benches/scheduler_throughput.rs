//! Benchmarks for the analysis scheduler's per-stage sweep across the
//! module list (spec §4.D): the cost that matters is driving many modules
//! through the fixed pipeline, not any one pass in isolation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use c3cd::context::GlobalContext;
use c3cd::module::{DeclKind, Declaration, Visibility};
use c3cd::scheduler::analyze_all;

fn build_context_with_modules(module_count: usize, decls_per_module: usize) -> GlobalContext {
    let mut ctx = GlobalContext::init(None);
    for m in 0..module_count {
        let module_name = ctx.interner.intern(&format!("mod.{m}"));
        let module = ctx.find_or_create_module(module_name, None);
        for d in 0..decls_per_module {
            let name = ctx.interner.intern(&format!("decl_{m}_{d}"));
            let id = ctx.decl_arena.alloc_zeroed();
            *ctx.decl_mut(id) = Declaration {
                name,
                kind: DeclKind::Constant,
                visibility: if d % 4 == 0 {
                    Visibility::Public
                } else {
                    Visibility::Private
                },
                owner: module,
                ..Declaration::default()
            };
            ctx.module_mut(module).decls.push(id);
        }
    }
    ctx
}

fn benchmark_analyze_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_all");

    for module_count in [8usize, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("modules", module_count),
            &module_count,
            |b, &module_count| {
                b.iter_batched(
                    || build_context_with_modules(module_count, 4),
                    |mut ctx| black_box(analyze_all(&mut ctx)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_analyze_all);
criterion_main!(benches);
