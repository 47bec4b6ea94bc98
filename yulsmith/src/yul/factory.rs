//! Node factories.
//!
//! Constructors for minimal, fully populated subtrees. Everything that takes
//! a generator draws from it in a fixed order, so a factory call is a pure
//! function of the generator state.

use crate::enum_range::enum_from_seed;
use crate::random::MinStdRand;

use super::ast::{
    BinaryOp, CallReturns, Create, CreateKind, Expression, FunctionCall, Literal, LowLevelCall,
    UnaryOp, UnaryOpKind, VarRef,
};

pub fn int_literal(value: u32) -> Literal {
    Literal::Int(u64::from(value))
}

pub fn lit_expression(value: u32) -> Expression {
    Expression::Literal(int_literal(value))
}

pub fn var_ref(index: u32) -> VarRef {
    VarRef { index }
}

pub fn ref_expression(rng: &mut MinStdRand) -> Expression {
    Expression::VarRef(var_ref(rng.draw()))
}

fn load_op(rng: &mut MinStdRand) -> UnaryOpKind {
    match rng.draw() % 3 {
        0 => UnaryOpKind::MLoad,
        1 => UnaryOpKind::SLoad,
        _ => UnaryOpKind::CallDataLoad,
    }
}

/// `mload`, `sload` or `calldataload` of a variable reference.
pub fn load_expression(rng: &mut MinStdRand) -> Expression {
    let operand = ref_expression(rng);
    let op = load_op(rng);
    Expression::Unary(Box::new(UnaryOp { op, operand }))
}

/// `mload`, `sload` or `calldataload` of location zero.
pub fn load_from_zero(rng: &mut MinStdRand) -> Expression {
    let operand = lit_expression(0);
    let op = load_op(rng);
    Expression::Unary(Box::new(UnaryOp { op, operand }))
}

/// Binary operation over two variable references.
pub fn binop_expression(rng: &mut MinStdRand) -> Expression {
    let left = ref_expression(rng);
    let right = ref_expression(rng);
    let op = enum_from_seed(rng.draw());
    Expression::Binary(Box::new(BinaryOp { op, left, right }))
}

/// Wraps `expr` in a logical not.
pub fn not_expression(expr: Expression) -> Expression {
    Expression::Unary(Box::new(UnaryOp {
        op: UnaryOpKind::Not,
        operand: expr,
    }))
}

/// Picks a return arity and callee index, then populates the arguments.
pub fn configure_call(call: &mut FunctionCall, rng: &mut MinStdRand) {
    let ret = enum_from_seed(rng.draw());
    call.ret = ret;
    call.func_index = rng.draw();
    configure_call_args(ret, call, rng);
}

/// Populates the call's argument slots for the given arity.
///
/// All four input slots are set regardless of arity, since the callee is
/// only resolved at emission time and may take up to four arguments. Output
/// references are only set for multi-assign calls.
pub fn configure_call_args(ret: CallReturns, call: &mut FunctionCall, rng: &mut MinStdRand) {
    if ret == CallReturns::MultiAssign {
        for out in call.outs.iter_mut().rev() {
            *out = var_ref(rng.draw());
        }
    }
    for arg in call.args.iter_mut().rev() {
        *arg = ref_expression(rng);
    }
}

/// A fully configured call statement.
pub fn new_call(rng: &mut MinStdRand) -> FunctionCall {
    let mut call = FunctionCall::default();
    configure_call(&mut call, rng);
    call
}

/// A call returning a single value, usable in expression position.
pub fn single_call(rng: &mut MinStdRand) -> FunctionCall {
    let mut call = FunctionCall {
        ret: CallReturns::Single,
        func_index: rng.draw(),
        ..FunctionCall::default()
    };
    configure_call_args(CallReturns::Single, &mut call, rng);
    call
}

/// A low-level call of random kind with every operand a variable reference.
pub fn low_level_call(rng: &mut MinStdRand) -> LowLevelCall {
    LowLevelCall {
        kind: enum_from_seed(rng.draw()),
        gas: ref_expression(rng),
        addr: ref_expression(rng),
        wei: ref_expression(rng),
        input: ref_expression(rng),
        input_size: ref_expression(rng),
        output: ref_expression(rng),
        output_size: ref_expression(rng),
    }
}

/// A `create` or `create2` with every operand a variable reference.
pub fn create(rng: &mut MinStdRand) -> Create {
    let kind: CreateKind = enum_from_seed(rng.draw());
    Create {
        kind,
        wei: ref_expression(rng),
        position: ref_expression(rng),
        size: ref_expression(rng),
        salt: ref_expression(rng),
    }
}

/// Detaches the active variant, leaving the expression unset, and returns it.
pub fn clear_expr(expr: &mut Expression) -> Expression {
    std::mem::take(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_expression_uses_stream() {
        let mut rng = MinStdRand::new(1);
        assert_eq!(
            ref_expression(&mut rng),
            Expression::VarRef(VarRef { index: 48_271 })
        );
    }

    #[test]
    fn test_load_expression_is_a_load() {
        for seed in 0..20 {
            let mut rng = MinStdRand::new(seed);
            let expr = load_expression(&mut rng);
            assert!(expr.is_load());
            let zero = load_from_zero(&mut rng);
            match zero {
                Expression::Unary(op) => assert_eq!(op.operand, lit_expression(0)),
                other => panic!("expected unary, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_every_call_has_four_arguments() {
        for seed in 0..50 {
            let mut rng = MinStdRand::new(seed);
            let call = new_call(&mut rng);
            assert!(call.args.iter().all(Expression::is_set));
            if call.ret == CallReturns::MultiAssign {
                assert!(call.outs.iter().all(|out| out.index != 0));
            } else {
                assert!(call.outs.iter().all(|out| out.index == 0));
            }
        }
    }

    #[test]
    fn test_clear_expr_detaches() {
        let mut expr = lit_expression(9);
        let old = clear_expr(&mut expr);
        assert_eq!(expr, Expression::Unset);
        assert_eq!(old, lit_expression(9));
    }

    #[test]
    fn test_create_children_are_set() {
        let mut rng = MinStdRand::new(3);
        let mut expr = Expression::Create(Box::new(create(&mut rng)));
        assert!(expr.required_children_mut().iter().all(|c| c.is_set()));
    }
}
