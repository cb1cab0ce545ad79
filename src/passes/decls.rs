//! `DECLS` (spec §4.D pass 4): resolve declaration types, constants, and
//! function signatures. This is a deliberately small type resolver — enough
//! to tell a known builtin type name from an unknown one and record the
//! result — rather than a full type checker, which belongs to a separate
//! collaborator the core only drives.

use crate::ast::TypeInfo;
use crate::context::GlobalContext;
use crate::module::{DeclPayload, ModuleId, ResolveStatus};

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let decls = ctx.module(module).decls.clone();
    for decl_id in decls {
        let type_name = match &ctx.decl(decl_id).payload {
            DeclPayload::Constant { type_name, .. } => Some(*type_name),
            DeclPayload::Function { return_type, .. } => Some(*return_type),
            DeclPayload::None => None,
        };

        let Some(type_name) = type_name else {
            continue;
        };
        let type_text = ctx.interner.resolve(type_name).to_string();
        let Some(info) = resolve_builtin(&type_text) else {
            let decl_name = ctx.interner.resolve(ctx.decl(decl_id).name).to_string();
            ctx.report_error(
                module,
                &format!("'{decl_name}' has unresolvable type '{type_text}'"),
            );
            ctx.decl_mut(decl_id).resolve_status = ResolveStatus::Poisoned;
            continue;
        };

        let type_id = ctx.type_info_arena.alloc_zeroed();
        *ctx.type_info_arena.deref_mut(type_id) = info;
        ctx.decl_mut(decl_id).resolved_type = Some(type_id);
        ctx.decl_mut(decl_id).resolve_status = ResolveStatus::Done;
    }
}

fn resolve_builtin(name: &str) -> Option<TypeInfo> {
    match name {
        "int" => Some(TypeInfo::Int),
        "bool" => Some(TypeInfo::Bool),
        "void" => Some(TypeInfo::Void),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{DeclKind, Declaration, Visibility};

    #[test]
    fn builtin_return_type_resolves() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let fn_name = ctx.interner.intern("main");
        let int_ty = ctx.interner.intern("int");
        let id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(id) = Declaration {
            name: fn_name,
            kind: DeclKind::Function,
            visibility: Visibility::Private,
            owner: module,
            payload: DeclPayload::Function {
                params: Vec::new(),
                return_type: int_ty,
                body: Vec::new(),
            },
            ..Declaration::default()
        };
        ctx.module_mut(module).decls.push(id);

        run(&mut ctx, module);
        assert_eq!(ctx.decl(id).resolve_status, ResolveStatus::Done);
        assert!(ctx.decl(id).resolved_type.is_some());
        assert_eq!(ctx.error_count, 0);
    }

    #[test]
    fn unknown_named_type_is_an_error() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let const_name = ctx.interner.intern("limit");
        let bogus_ty = ctx.interner.intern("NoSuchType");
        let value = ctx.expr_arena.alloc_zeroed();
        let id = ctx.decl_arena.alloc_zeroed();
        *ctx.decl_mut(id) = Declaration {
            name: const_name,
            kind: DeclKind::Constant,
            visibility: Visibility::Private,
            owner: module,
            payload: DeclPayload::Constant {
                type_name: bogus_ty,
                value,
            },
            ..Declaration::default()
        };
        ctx.module_mut(module).decls.push(id);

        run(&mut ctx, module);
        assert_eq!(ctx.decl(id).resolve_status, ResolveStatus::Poisoned);
        assert_eq!(ctx.error_count, 1);
    }
}
