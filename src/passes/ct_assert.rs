//! `CT_ASSERT` (spec §4.D pass 5): evaluate `$assert(condition, "message")`
//! directives captured at parse time. A condition that evaluates to false
//! is a front-end error carrying the author-supplied message; one that
//! can't be evaluated at all (calls, unresolved identifiers) is also an
//! error, since compile-time assertions must be constant expressions.

use crate::ast::{BinOp, Expr, ExprId};
use crate::context::GlobalContext;
use crate::module::ModuleId;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CtValue {
    Int(i64),
    Bool(bool),
}

pub fn run(ctx: &mut GlobalContext, module: ModuleId) {
    let asserts = ctx.module(module).ct_asserts.clone();
    for assertion in asserts {
        match eval(ctx, assertion.condition) {
            Some(CtValue::Bool(true)) => {}
            Some(CtValue::Int(n)) if n != 0 => {}
            Some(_) => {
                let message = ctx.interner.resolve(assertion.message).to_string();
                ctx.report_error(module, &message);
            }
            None => {
                ctx.report_error(module, "$assert condition is not a compile-time constant");
            }
        }
    }
}

fn eval(ctx: &GlobalContext, expr: ExprId) -> Option<CtValue> {
    match ctx.expr_arena.deref(expr) {
        Expr::IntLit(n) => Some(CtValue::Int(*n)),
        Expr::BoolLit(b) => Some(CtValue::Bool(*b)),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(ctx, *lhs)?;
            let rhs = eval(ctx, *rhs)?;
            eval_binary(*op, lhs, rhs)
        }
        Expr::Unit | Expr::StrLit(_) | Expr::Ident(_) | Expr::Call { .. } => None,
    }
}

fn eval_binary(op: BinOp, lhs: CtValue, rhs: CtValue) -> Option<CtValue> {
    use CtValue::*;
    Some(match (op, lhs, rhs) {
        (BinOp::Add, Int(a), Int(b)) => Int(a + b),
        (BinOp::Sub, Int(a), Int(b)) => Int(a - b),
        (BinOp::Mul, Int(a), Int(b)) => Int(a * b),
        (BinOp::Div, Int(a), Int(b)) if b != 0 => Int(a / b),
        (BinOp::Eq, a, b) => Bool(a == b),
        (BinOp::Ne, a, b) => Bool(a != b),
        (BinOp::Lt, Int(a), Int(b)) => Bool(a < b),
        (BinOp::Le, Int(a), Int(b)) => Bool(a <= b),
        (BinOp::Gt, Int(a), Int(b)) => Bool(a > b),
        (BinOp::Ge, Int(a), Int(b)) => Bool(a >= b),
        (BinOp::And, Bool(a), Bool(b)) => Bool(a && b),
        (BinOp::Or, Bool(a), Bool(b)) => Bool(a || b),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::CtAssert;

    fn int_lit(ctx: &mut GlobalContext, n: i64) -> ExprId {
        let id = ctx.expr_arena.alloc_zeroed();
        *ctx.expr_arena.deref_mut(id) = Expr::IntLit(n);
        id
    }

    #[test]
    fn true_assertion_reports_nothing() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let one = int_lit(&mut ctx, 1);
        let message = ctx.interner.intern("should hold");
        ctx.module_mut(module).ct_asserts.push(CtAssert {
            condition: one,
            message,
        });

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 0);
    }

    #[test]
    fn false_assertion_reports_its_message() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let zero = int_lit(&mut ctx, 0);
        let message = ctx.interner.intern("must not be zero");
        ctx.module_mut(module).ct_asserts.push(CtAssert {
            condition: zero,
            message,
        });

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 1);
    }

    #[test]
    fn non_constant_condition_is_an_error() {
        let mut ctx = GlobalContext::init(None);
        let name = ctx.interner.intern("mod.a");
        let module = ctx.find_or_create_module(name, None);
        let callee = ctx.interner.intern("unknown_fn");
        let call = ctx.expr_arena.alloc_zeroed();
        *ctx.expr_arena.deref_mut(call) = Expr::Call {
            callee,
            args: Vec::new(),
        };
        let message = ctx.interner.intern("unused");
        ctx.module_mut(module).ct_asserts.push(CtAssert {
            condition: call,
            message,
        });

        run(&mut ctx, module);
        assert_eq!(ctx.error_count, 1);
    }
}
