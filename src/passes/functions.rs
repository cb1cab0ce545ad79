//! `FUNCTIONS` (spec §4.D pass 6, final stage): type-check function bodies.
//! Kept intentionally small — enough to catch a `return` whose presence or
//! absence of a value disagrees with the function's declared return type —
//! since full expression type-checking belongs to the per-pass semantic
//! analyzer this core only drives (spec §1 scope).

use crate::ast::{Stmt, TypeInfo};
use crate::context::GlobalContext;
use crate::module::{DeclPayload, ModuleId, ResolveStatus};

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let decls = ctx.module(module).decls.clone();
    for decl_id in decls {
        if ctx.decl(decl_id).resolve_status == ResolveStatus::Poisoned {
            continue;
        }
        let (body, returns_void) = match &ctx.decl(decl_id).payload {
            DeclPayload::Function { body, .. } => {
                let returns_void = ctx
                    .decl(decl_id)
                    .resolved_type
                    .map(|t| *ctx.type_info_arena.deref(t) == TypeInfo::Void)
                    .unwrap_or(false);
                (body.clone(), returns_void)
            }
            DeclPayload::Constant { .. } | DeclPayload::None => continue,
        };

        for stmt in &body {
            let Stmt::Return(value) = ctx.ast_arena.deref(*stmt) else {
                continue;
            };
            match (returns_void, value) {
                (true, Some(_)) => {
                    let name = ctx.interner.resolve(ctx.decl(decl_id).name).to_string();
                    ctx.report_error(module, &format!("'{name}' returns a value from a void function"));
                }
                (false, None) => {
                    let name = ctx.interner.resolve(ctx.decl(decl_id).name).to_string();
                    ctx.report_error(module, &format!("'{name}' is missing a return value"));
                }
                _ => {}
            }
        }

        ctx.decl_mut(decl_id).resolve_status = ResolveStatus::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::module::{DeclKind, Declaration, Visibility};

    fn make_function(
        ctx: &mut GlobalContext,
        module: ModuleId,
        return_type_name: &str,
        body: Vec<crate::ast::StmtId>,
    ) -> crate::module::DeclId {
        let name = ctx.interner.intern("f");
        let return_type = ctx.interner.intern(return_type_name);
        let type_info = match return_type_name {
            "void" => TypeInfo::Void,
            "int" => TypeInfo::Int,
            _ => TypeInfo::Unknown,
        };
        let type_id = ctx.type_info_arena.alloc_zeroed();
        *ctx.type_info_arena.deref_mut(type_id) = type_info;

        let id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(id) = Declaration {
            name,
            kind: DeclKind::Function,
            visibility: Visibility::Private,
            owner: module,
            resolved_type: Some(type_id),
            payload: DeclPayload::Function {
                params: Vec::new(),
                return_type,
                body,
            },
            ..Declaration::default()
        };
        ctx.module_mut(module).decls.push(id);
        id
    }

    #[test]
    fn void_function_with_bare_return_is_fine() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let ret = ctx.ast_arena.alloc_zeroed();
        *ctx.ast_arena.deref_mut(ret) = Stmt::Return(None);
        make_function(&mut ctx, module, "void", vec![ret]);

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 0);
    }

    #[test]
    fn void_function_returning_a_value_is_an_error() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let value = ctx.expr_arena.alloc_zeroed();
        *ctx.expr_arena.deref_mut(value) = Expr::IntLit(0);
        let ret = ctx.ast_arena.alloc_zeroed();
        *ctx.ast_arena.deref_mut(ret) = Stmt::Return(Some(value));
        make_function(&mut ctx, module, "void", vec![ret]);

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 1);
    }

    #[test]
    fn int_function_missing_value_is_an_error() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let ret = ctx.ast_arena.alloc_zeroed();
        *ctx.ast_arena.deref_mut(ret) = Stmt::Return(None);
        make_function(&mut ctx, module, "int", vec![ret]);

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 1);
    }
}
