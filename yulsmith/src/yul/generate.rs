//! Grammar-based generation of Yul trees.
//!
//! Implements `Arbitrary` for [`YulProgram`] so fuzz targets and tests can
//! build whole trees from raw bytes. Generated trees never contain an unset
//! node in a required position and are depth-limited.

use arbitrary::{Arbitrary, Unstructured};

use crate::enum_range::{enum_from_seed, SeedEnum};

use super::ast::{
    Assignment, BinaryOp, Block, BoundedForStmt, CallReturns, CaseStmt, CopyStmt, Create,
    DataOp, ExtCodeCopyStmt, Expression, ForStmt, FunctionCall, FunctionDef, IfStmt, Literal,
    LogStmt, LowLevelCall, MultiVarDecl, NullaryOp, PopStmt, RetRevStmt, SelfDestructStmt,
    Statement, StoreStmt, SwitchStmt, TerminatingStmt, TernaryOp, UnaryOp, VarDecl, VarRef,
    YulProgram,
};

// ============================================================
// Constants for controlling generation complexity
// ============================================================

/// Maximum nesting of blocks.
const MAX_BLOCK_DEPTH: u8 = 3;

/// Maximum nesting of expressions.
const MAX_EXPR_DEPTH: u8 = 3;

/// Maximum number of statements in one block.
const MAX_BLOCK_LEN: u8 = 6;

/// Maximum number of data segments.
const MAX_DATA_SEGMENTS: u8 = 3;

/// Maximum length of one data segment.
const MAX_DATA_LEN: u8 = 16;

fn seeded<T: SeedEnum>(u: &mut Unstructured<'_>) -> arbitrary::Result<T> {
    Ok(enum_from_seed(u.arbitrary::<u32>()?))
}

// ============================================================
// Program Structure
// ============================================================

impl<'a> Arbitrary<'a> for YulProgram {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let code = block_with_depth(u, 0)?;

        let count: u8 = u.arbitrary()?;
        let count = count % (MAX_DATA_SEGMENTS + 1);
        let mut data = Vec::with_capacity(count as usize);
        for _ in 0..count {
            data.push(bytes(u, MAX_DATA_LEN)?.to_vec());
        }

        Ok(YulProgram { code, data })
    }
}

fn block_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Block> {
    if depth >= MAX_BLOCK_DEPTH {
        return Ok(Block::default());
    }
    let count: u8 = u.arbitrary()?;
    let count = count % (MAX_BLOCK_LEN + 1);

    let mut statements = Vec::with_capacity(count as usize);
    for _ in 0..count {
        statements.push(statement_with_depth(u, depth)?);
    }
    Ok(Block::new(statements))
}

// ============================================================
// Statements
// ============================================================

fn statement_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Statement> {
    let choice: u8 = u.arbitrary()?;
    let inner = depth + 1;
    Ok(match u32::from(choice) % Statement::KIND_COUNT {
        0 => Statement::Decl(VarDecl {
            expr: expression_with_depth(u, 0)?,
        }),
        1 => Statement::Assignment(Assignment {
            target: var_ref(u)?,
            expr: expression_with_depth(u, 0)?,
        }),
        2 => Statement::If(IfStmt {
            cond: expression_with_depth(u, 0)?,
            body: block_with_depth(u, inner)?,
        }),
        3 => Statement::Store(StoreStmt {
            kind: seeded(u)?,
            loc: expression_with_depth(u, 0)?,
            val: expression_with_depth(u, 0)?,
        }),
        4 => Statement::Block(block_with_depth(u, inner)?),
        5 => Statement::For(ForStmt {
            init: block_with_depth(u, inner)?,
            cond: expression_with_depth(u, 0)?,
            post: block_with_depth(u, inner)?,
            body: block_with_depth(u, inner)?,
        }),
        6 => Statement::Switch(switch_with_depth(u, inner)?),
        7 => Statement::Break,
        8 => Statement::Continue,
        9 => Statement::Log(LogStmt {
            topics: seeded(u)?,
            pos: expression_with_depth(u, 0)?,
            size: expression_with_depth(u, 0)?,
            t1: expression_with_depth(u, 0)?,
            t2: expression_with_depth(u, 0)?,
            t3: expression_with_depth(u, 0)?,
            t4: expression_with_depth(u, 0)?,
        }),
        10 => Statement::Copy(CopyStmt {
            kind: seeded(u)?,
            target: expression_with_depth(u, 0)?,
            source: expression_with_depth(u, 0)?,
            size: expression_with_depth(u, 0)?,
        }),
        11 => Statement::ExtCodeCopy(ExtCodeCopyStmt {
            addr: expression_with_depth(u, 0)?,
            target: expression_with_depth(u, 0)?,
            source: expression_with_depth(u, 0)?,
            size: expression_with_depth(u, 0)?,
        }),
        12 => Statement::Terminate(terminating(u)?),
        13 => {
            let ret = seeded(u)?;
            Statement::FunctionCall(call_with_depth(u, ret, 0)?)
        }
        14 => Statement::BoundedFor(BoundedForStmt {
            body: block_with_depth(u, inner)?,
        }),
        15 => Statement::FunctionDef(FunctionDef {
            num_inputs: u.arbitrary()?,
            num_outputs: u.arbitrary()?,
            body: block_with_depth(u, inner)?,
        }),
        16 => Statement::Pop(PopStmt {
            expr: expression_with_depth(u, 0)?,
        }),
        17 => Statement::Leave,
        _ => Statement::MultiDecl(MultiVarDecl {
            num_vars: u.arbitrary()?,
        }),
    })
}

fn switch_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<SwitchStmt> {
    let scrutinee = expression_with_depth(u, 0)?;
    let count: u8 = u.arbitrary()?;
    let mut cases = Vec::new();
    for _ in 0..count % 4 {
        cases.push(CaseStmt {
            literal: literal(u)?,
            body: block_with_depth(u, depth)?,
        });
    }
    let default = if u.arbitrary()? {
        Some(block_with_depth(u, depth)?)
    } else {
        None
    };
    Ok(SwitchStmt {
        scrutinee,
        cases,
        default,
    })
}

fn terminating(u: &mut Unstructured<'_>) -> arbitrary::Result<TerminatingStmt> {
    let choice: u8 = u.arbitrary()?;
    Ok(match choice % 3 {
        0 => TerminatingStmt::Halt(seeded(u)?),
        1 => TerminatingStmt::RetRev(RetRevStmt {
            kind: seeded(u)?,
            pos: expression_with_depth(u, 0)?,
            size: expression_with_depth(u, 0)?,
        }),
        _ => TerminatingStmt::SelfDestruct(SelfDestructStmt {
            addr: expression_with_depth(u, 0)?,
        }),
    })
}

fn call_with_depth(
    u: &mut Unstructured<'_>,
    ret: CallReturns,
    depth: u8,
) -> arbitrary::Result<FunctionCall> {
    let func_index = u.arbitrary()?;
    let mut call = FunctionCall {
        ret,
        func_index,
        ..FunctionCall::default()
    };
    for arg in call.args.iter_mut() {
        *arg = expression_with_depth(u, depth)?;
    }
    if ret == CallReturns::MultiAssign {
        for out in call.outs.iter_mut() {
            *out = var_ref(u)?;
        }
    }
    Ok(call)
}

// ============================================================
// Expressions
// ============================================================

/// Index zero marks an unfilled reference, so generated indices start at one.
fn var_ref(u: &mut Unstructured<'_>) -> arbitrary::Result<VarRef> {
    let index: u32 = u.arbitrary()?;
    Ok(VarRef {
        index: index.max(1),
    })
}

fn bytes<'a>(u: &mut Unstructured<'a>, max: u8) -> arbitrary::Result<&'a [u8]> {
    let len: u8 = u.arbitrary()?;
    let len = (len % max) as usize;
    u.bytes(len.min(u.len()))
}

fn literal(u: &mut Unstructured<'_>) -> arbitrary::Result<Literal> {
    let choice: u8 = u.arbitrary()?;
    Ok(match choice % 3 {
        0 => Literal::Int(u.arbitrary()?),
        1 => Literal::Hex(
            bytes(u, 32)?
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect(),
        ),
        _ => Literal::Str(
            bytes(u, 32)?
                .iter()
                .map(|b| char::from(b'a' + b % 26))
                .collect(),
        ),
    })
}

fn expression_with_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Expression> {
    let choice: u8 = u.arbitrary()?;
    // Past the depth limit only leaves are produced.
    let choice = if depth >= MAX_EXPR_DEPTH {
        choice % 3
    } else {
        choice % 10
    };
    let inner = depth + 1;
    Ok(match choice {
        0 => Expression::VarRef(var_ref(u)?),
        1 => Expression::Literal(literal(u)?),
        2 => Expression::Nullary(NullaryOp { op: seeded(u)? }),
        3 => Expression::Binary(Box::new(BinaryOp {
            op: seeded(u)?,
            left: expression_with_depth(u, inner)?,
            right: expression_with_depth(u, inner)?,
        })),
        4 => Expression::Unary(Box::new(UnaryOp {
            op: seeded(u)?,
            operand: expression_with_depth(u, inner)?,
        })),
        5 => Expression::Ternary(Box::new(TernaryOp {
            op: seeded(u)?,
            arg1: expression_with_depth(u, inner)?,
            arg2: expression_with_depth(u, inner)?,
            arg3: expression_with_depth(u, inner)?,
        })),
        6 => Expression::Call(Box::new(call_with_depth(u, CallReturns::Single, inner)?)),
        7 => Expression::LowLevelCall(Box::new(LowLevelCall {
            kind: seeded(u)?,
            gas: expression_with_depth(u, inner)?,
            addr: expression_with_depth(u, inner)?,
            wei: expression_with_depth(u, inner)?,
            input: expression_with_depth(u, inner)?,
            input_size: expression_with_depth(u, inner)?,
            output: expression_with_depth(u, inner)?,
            output_size: expression_with_depth(u, inner)?,
        })),
        8 => Expression::Create(Box::new(Create {
            kind: seeded(u)?,
            wei: expression_with_depth(u, inner)?,
            position: expression_with_depth(u, inner)?,
            size: expression_with_depth(u, inner)?,
            salt: expression_with_depth(u, inner)?,
        })),
        _ => Expression::Data(DataOp {
            op: seeded(u)?,
            identifier: u.arbitrary()?,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::MinStdRand;
    use crate::yul::emit::emit;
    use crate::yul::fill::is_filled_deep;

    fn generate(seed: u32) -> YulProgram {
        let bytes = MinStdRand::new(seed).bytes(512);
        let mut u = Unstructured::new(&bytes);
        YulProgram::arbitrary(&mut u).unwrap()
    }

    fn all_filled(block: &Block) -> bool {
        block.statements.iter().all(|stmt| {
            is_filled_deep(stmt)
                && match stmt {
                    Statement::If(s) => all_filled(&s.body),
                    Statement::Block(b) => all_filled(b),
                    Statement::For(s) => {
                        all_filled(&s.init) && all_filled(&s.post) && all_filled(&s.body)
                    }
                    Statement::BoundedFor(s) => all_filled(&s.body),
                    Statement::FunctionDef(d) => all_filled(&d.body),
                    Statement::Switch(s) => {
                        s.cases.iter().all(|c| c.literal != Literal::Unset && all_filled(&c.body))
                            && s.default.as_ref().map_or(true, all_filled)
                    }
                    _ => true,
                }
        })
    }

    #[test]
    fn test_generated_trees_are_complete() {
        for seed in 0..50 {
            let program = generate(seed);
            assert!(all_filled(&program.code), "seed {} produced an unset node", seed);
        }
    }

    #[test]
    fn test_generated_trees_emit() {
        for seed in 0..50 {
            let program = generate(seed);
            assert!(emit(&program).is_ok(), "seed {} failed to emit", seed);
        }
    }

    #[test]
    fn test_empty_input_gives_empty_program() {
        let mut u = Unstructured::new(&[]);
        let program = YulProgram::arbitrary(&mut u).unwrap();
        assert_eq!(program, YulProgram::default());
    }
}
