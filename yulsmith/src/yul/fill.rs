//! Argument filling.
//!
//! Both fill modes enumerate a statement's expression positions through the
//! single per-kind table in [`statement_slots`], so they can never disagree
//! about which fields a kind has.

use crate::random::MinStdRand;

use super::ast::{CallReturns, Expression, Literal, Statement, TerminatingStmt, VarRef};
use super::factory::var_ref;

/// A fillable position of a statement.
pub enum Slot<'a> {
    Expr(&'a mut Expression),
    /// A reference whose index zero counts as unset.
    Ref(&'a mut VarRef),
}

impl Slot<'_> {
    pub fn is_set(&self) -> bool {
        match self {
            Slot::Expr(expr) => expr.is_set(),
            Slot::Ref(var) => var.index != 0,
        }
    }
}

/// Returns the direct expression and reference positions of `stmt`.
///
/// Declarations without initializers, blocks, loops over blocks only,
/// break, continue, leave and function definitions have none. A call's
/// output references are positions only for multi-assign calls.
pub fn statement_slots(stmt: &mut Statement) -> Vec<Slot<'_>> {
    match stmt {
        Statement::Decl(decl) => vec![Slot::Expr(&mut decl.expr)],
        Statement::Assignment(assign) => {
            vec![Slot::Expr(&mut assign.expr), Slot::Ref(&mut assign.target)]
        }
        Statement::If(stmt) => vec![Slot::Expr(&mut stmt.cond)],
        Statement::Store(store) => vec![Slot::Expr(&mut store.loc), Slot::Expr(&mut store.val)],
        Statement::For(stmt) => vec![Slot::Expr(&mut stmt.cond)],
        Statement::Switch(stmt) => vec![Slot::Expr(&mut stmt.scrutinee)],
        Statement::Log(log) => vec![
            Slot::Expr(&mut log.pos),
            Slot::Expr(&mut log.size),
            Slot::Expr(&mut log.t1),
            Slot::Expr(&mut log.t2),
            Slot::Expr(&mut log.t3),
            Slot::Expr(&mut log.t4),
        ],
        Statement::Copy(copy) => vec![
            Slot::Expr(&mut copy.target),
            Slot::Expr(&mut copy.source),
            Slot::Expr(&mut copy.size),
        ],
        Statement::ExtCodeCopy(copy) => vec![
            Slot::Expr(&mut copy.addr),
            Slot::Expr(&mut copy.target),
            Slot::Expr(&mut copy.source),
            Slot::Expr(&mut copy.size),
        ],
        Statement::Terminate(TerminatingStmt::RetRev(stmt)) => {
            vec![Slot::Expr(&mut stmt.pos), Slot::Expr(&mut stmt.size)]
        }
        Statement::Terminate(TerminatingStmt::SelfDestruct(stmt)) => {
            vec![Slot::Expr(&mut stmt.addr)]
        }
        Statement::Terminate(TerminatingStmt::Halt(_)) => Vec::new(),
        Statement::FunctionCall(call) => {
            let multi_assign = call.ret == CallReturns::MultiAssign;
            let mut slots: Vec<Slot<'_>> = call.args.iter_mut().map(Slot::Expr).collect();
            if multi_assign {
                slots.extend(call.outs.iter_mut().map(Slot::Ref));
            }
            slots
        }
        Statement::Pop(pop) => vec![Slot::Expr(&mut pop.expr)],
        Statement::MultiDecl(_)
        | Statement::Block(_)
        | Statement::BoundedFor(_)
        | Statement::Break
        | Statement::Continue
        | Statement::FunctionDef(_)
        | Statement::Leave => Vec::new(),
    }
}

/// Shallow fill: assigns every unset direct expression of `stmt` from
/// `generate`, and every zero reference a fresh index.
pub fn fill_args(
    stmt: &mut Statement,
    mut generate: impl FnMut(&mut MinStdRand) -> Expression,
    rng: &mut MinStdRand,
) {
    for slot in statement_slots(stmt) {
        match slot {
            Slot::Expr(expr) if !expr.is_set() => *expr = generate(rng),
            Slot::Ref(var) if var.index == 0 => *var = var_ref(rng.draw()),
            _ => {}
        }
    }
}

/// Recursive fill: descends into every position of `stmt`, handing each
/// unset expression at any depth to `mutate`.
///
/// Reference positions are redrawn unconditionally.
pub fn fill_args_rec(
    stmt: &mut Statement,
    mut mutate: impl FnMut(&mut Expression, &mut MinStdRand),
    rng: &mut MinStdRand,
) {
    for slot in statement_slots(stmt) {
        match slot {
            Slot::Expr(expr) => fill_unset_expr(expr, &mut mutate, rng),
            Slot::Ref(var) => *var = var_ref(rng.draw()),
        }
    }
}

/// Fills the unset parts of one expression tree.
///
/// An unset expression goes to `mutate`; a zero reference and an unset
/// literal get values from the stream; composite expressions recurse into
/// their required children. A user call in expression position must yield
/// exactly one value, so its arity is forced to single.
pub fn fill_unset_expr(
    expr: &mut Expression,
    mutate: &mut impl FnMut(&mut Expression, &mut MinStdRand),
    rng: &mut MinStdRand,
) {
    if !expr.is_set() {
        mutate(expr, rng);
        return;
    }
    match expr {
        Expression::Unset => {}
        Expression::VarRef(var) => {
            if var.index == 0 {
                var.index = rng.draw();
            }
        }
        Expression::Literal(lit) => {
            if *lit == Literal::Unset {
                *lit = Literal::Int(u64::from(rng.draw()));
            }
        }
        Expression::Call(call) => {
            call.ret = CallReturns::Single;
            for arg in call.args.iter_mut() {
                fill_unset_expr(arg, mutate, rng);
            }
        }
        Expression::Binary(_)
        | Expression::Unary(_)
        | Expression::Ternary(_)
        | Expression::LowLevelCall(_)
        | Expression::Create(_) => {
            for child in expr.required_children_mut() {
                fill_unset_expr(child, mutate, rng);
            }
        }
        Expression::Nullary(_) | Expression::Data(_) => {}
    }
}

/// Returns true if no direct position of `stmt` is unset.
pub fn is_filled(stmt: &Statement) -> bool {
    let mut probe = stmt.clone();
    statement_slots(&mut probe).iter().all(Slot::is_set)
}

/// Returns true if no expression reachable from a position of `stmt` is
/// unset.
pub fn is_filled_deep(stmt: &Statement) -> bool {
    let mut probe = stmt.clone();
    statement_slots(&mut probe).into_iter().all(|slot| match slot {
        Slot::Expr(expr) => expr_is_complete(expr),
        Slot::Ref(var) => var.index != 0,
    })
}

fn expr_is_complete(expr: &mut Expression) -> bool {
    match expr {
        Expression::Unset | Expression::Literal(Literal::Unset) => false,
        _ => expr.required_children_mut().into_iter().all(expr_is_complete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yul::ast::{Assignment, BinaryOp, BinaryOpKind, IfStmt, LogStmt};
    use crate::yul::factory::ref_expression;

    #[test]
    fn test_shallow_fill_assignment() {
        let mut stmt = Statement::Assignment(Assignment::default());
        let mut rng = MinStdRand::new(7);
        fill_args(&mut stmt, |_| Expression::VarRef(VarRef { index: 7 }), &mut rng);

        let Statement::Assignment(assign) = &stmt else {
            panic!("kind changed");
        };
        assert_eq!(assign.expr, Expression::VarRef(VarRef { index: 7 }));
        assert_eq!(assign.target.index, MinStdRand::new(7).draw());
        assert_ne!(assign.target.index, 0);
    }

    #[test]
    fn test_shallow_fill_keeps_set_fields() {
        let cond = Expression::Literal(Literal::Int(1));
        let mut stmt = Statement::If(IfStmt {
            cond: cond.clone(),
            ..IfStmt::default()
        });
        let mut rng = MinStdRand::new(1);
        fill_args(&mut stmt, ref_expression, &mut rng);
        assert_eq!(stmt, Statement::If(IfStmt { cond, ..IfStmt::default() }));
    }

    #[test]
    fn test_shallow_fill_does_not_descend() {
        let mut stmt = Statement::Log(LogStmt {
            pos: Expression::Binary(Box::new(BinaryOp {
                op: BinaryOpKind::Add,
                left: Expression::Unset,
                right: Expression::Unset,
            })),
            ..LogStmt::default()
        });
        let mut rng = MinStdRand::new(3);
        fill_args(&mut stmt, ref_expression, &mut rng);
        assert!(is_filled(&stmt));
        assert!(!is_filled_deep(&stmt));
    }

    #[test]
    fn test_recursive_fill_reaches_nested_slots() {
        let mut stmt = Statement::Log(LogStmt {
            pos: Expression::Binary(Box::new(BinaryOp {
                op: BinaryOpKind::Add,
                left: Expression::Unset,
                right: Expression::Literal(Literal::Unset),
            })),
            ..LogStmt::default()
        });
        let mut rng = MinStdRand::new(3);
        fill_args_rec(&mut stmt, |expr, rng| *expr = ref_expression(rng), &mut rng);
        assert!(is_filled_deep(&stmt));
    }

    #[test]
    fn test_recursive_fill_forces_single_call_in_expression() {
        let mut call = crate::yul::ast::FunctionCall {
            ret: CallReturns::MultiDecl,
            ..Default::default()
        };
        call.args[0] = Expression::Unset;
        let mut stmt = Statement::Pop(crate::yul::ast::PopStmt {
            expr: Expression::Call(Box::new(call)),
        });
        let mut rng = MinStdRand::new(11);
        fill_args_rec(&mut stmt, |expr, rng| *expr = ref_expression(rng), &mut rng);

        let Statement::Pop(pop) = &stmt else {
            panic!("kind changed");
        };
        let Expression::Call(call) = &pop.expr else {
            panic!("expression kind changed");
        };
        assert_eq!(call.ret, CallReturns::Single);
        assert!(is_filled_deep(&stmt));
    }

    #[test]
    fn test_statement_call_keeps_arity() {
        let mut stmt = Statement::FunctionCall(crate::yul::ast::FunctionCall {
            ret: CallReturns::Zero,
            ..Default::default()
        });
        let mut rng = MinStdRand::new(5);
        fill_args_rec(&mut stmt, |expr, rng| *expr = ref_expression(rng), &mut rng);
        let Statement::FunctionCall(call) = &stmt else {
            panic!("kind changed");
        };
        assert_eq!(call.ret, CallReturns::Zero);
        assert!(call.outs.iter().all(|out| out.index == 0));
    }

    #[test]
    fn test_slotless_kinds() {
        for stmt in [Statement::Break, Statement::Continue, Statement::Leave] {
            let mut stmt = stmt;
            assert!(statement_slots(&mut stmt).is_empty());
        }
    }
}
