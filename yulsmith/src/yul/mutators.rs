//! Yul mutation operator catalog.
//!
//! One rewrite rule per targeted node kind, registered in [`YulCatalog`].
//! Every rule that adds a node builds it fully populated, so a tree that
//! was complete before a rewrite is complete after it. Removals drop the
//! first matching statement and do nothing when there is none.

use std::mem;

use crate::config::MutationConfig;
use crate::enum_range::enum_from_seed;
use crate::mutation::{Mutable, Mutator, Operator, PeriodTable, Tier};
use crate::random::MinStdRand;

use super::ast::{
    Assignment, BinaryOp, Block, BoundedForStmt, CaseStmt, DataOp, Expression, ForStmt,
    FunctionDef, IfStmt, MultiVarDecl, NullaryOp, PopStmt, RetRevKind, RetRevStmt, Statement,
    StoreStmt, SwitchStmt, TerminatingStmt, UnaryOp, UnaryOpKind, VarDecl, VarRef, YulProgram,
};
use super::factory::{
    binop_expression, create, int_literal, lit_expression, load_expression, load_from_zero,
    low_level_call, new_call, not_expression, ref_expression, single_call, var_ref,
};
use super::fill::{fill_args, fill_args_rec, statement_slots, Slot};

/// Sampling periods of the Yul surface.
pub const YUL_PERIODS: PeriodTable = PeriodTable {
    frequent: 5,
    occasional: 7,
    rare: 11,
};

/// Operators of the Yul surface, grouped by target kind.
#[derive(Debug)]
pub struct YulCatalog {
    pub block: Vec<Operator<Block>>,
    pub statement: Vec<Operator<Statement>>,
    pub expression: Vec<Operator<Expression>>,
    pub assignment: Vec<Operator<Assignment>>,
    pub if_stmt: Vec<Operator<IfStmt>>,
    pub for_stmt: Vec<Operator<ForStmt>>,
    pub bounded_for: Vec<Operator<BoundedForStmt>>,
    pub function_def: Vec<Operator<FunctionDef>>,
    pub unary: Vec<Operator<UnaryOp>>,
    pub binary: Vec<Operator<BinaryOp>>,
    pub nullary: Vec<Operator<NullaryOp>>,
    pub var_ref: Vec<Operator<VarRef>>,
}

macro_rules! mutable_kind {
    ($($kind:ty => $field:ident),+ $(,)?) => {
        $(
            impl Mutable<YulCatalog> for $kind {
                fn operators(catalog: &YulCatalog) -> &[Operator<Self>] {
                    &catalog.$field
                }
            }
        )+
    };
}

mutable_kind! {
    Block => block,
    Statement => statement,
    Expression => expression,
    Assignment => assignment,
    IfStmt => if_stmt,
    ForStmt => for_stmt,
    BoundedForStmt => bounded_for,
    FunctionDef => function_def,
    UnaryOp => unary,
    BinaryOp => binary,
    NullaryOp => nullary,
    VarRef => var_ref,
}

impl YulCatalog {
    pub fn new() -> Self {
        use Tier::{Frequent, Occasional, Rare};

        Self {
            block: vec![
                Operator::new("add_break", "Break statement added", Frequent, add_break),
                Operator::new("add_continue", "Continue statement added", Frequent, add_continue),
                Operator::new("add_store_to_zero", "Store to zero added", Frequent, add_store_to_zero),
                Operator::new("remove_store", "Remove store", Frequent, remove_store),
                Operator::new("add_identity_function", "Identity function added", Frequent, add_identity_function),
                Operator::new("add_leave", "Add leave to statement block", Frequent, add_leave),
                Operator::new("add_assignment", "Add assignment to statement block", Frequent, add_assignment),
                Operator::new("remove_assignment", "Remove assignment from statement block", Frequent, remove_assignment),
                Operator::new("add_constant_assignment", "Add constant assignment to statement block", Frequent, add_constant_assignment),
                Operator::new("add_if", "Add if statement to statement block", Frequent, add_if),
                Operator::new("remove_if", "Remove if statement from statement block", Rare, remove_if),
                Operator::new("add_switch", "Add switch statement to statement block", Frequent, add_switch),
                Operator::new("remove_switch", "Remove switch statement from statement block", Rare, remove_switch),
                Operator::new("add_function_call", "Add function call to statement block", Frequent, add_function_call),
                Operator::new("remove_function_call", "Remove function call from statement block", Frequent, remove_function_call),
                Operator::new("add_var_decl", "Add variable declaration to statement block", Frequent, add_var_decl),
                Operator::new("add_multi_var_decl", "Add multi variable declaration to statement block", Frequent, add_multi_var_decl),
                Operator::new("remove_var_decl", "Remove variable declaration from statement block", Frequent, remove_var_decl),
                Operator::new("remove_multi_var_decl", "Remove multi variable declaration from statement block", Frequent, remove_multi_var_decl),
                Operator::new("add_function_def", "Add function definition to statement block", Frequent, add_function_def),
                Operator::new("remove_function_def", "Remove function definition from statement block", Frequent, remove_function_def),
                Operator::new("add_bounded_for", "Add bounded for statement to statement block", Frequent, add_bounded_for),
                Operator::new("remove_bounded_for", "Remove bounded for statement from statement block", Frequent, remove_bounded_for),
                Operator::new("add_generic_for", "Add for statement to statement block", Frequent, add_generic_for),
                Operator::new("remove_generic_for", "Remove for statement from statement block", Frequent, remove_generic_for),
                Operator::new("add_revert", "Add revert(0,0) statement to statement block", Frequent, add_revert),
                Operator::new("remove_revert", "Remove revert statement from statement block", Rare, remove_revert),
                Operator::new("add_pop_call", "Add pop(call) statement to statement block", Frequent, add_pop_call),
                Operator::new("add_pop_create", "Add pop(create) statement to statement block", Frequent, add_pop_create),
                Operator::new("add_pop_user_function", "Add pop(f()) statement to statement block", Frequent, add_pop_user_function),
                Operator::new("remove_pop", "Remove pop statement from statement block", Frequent, remove_pop),
                Operator::new("add_random_statement", "Add pseudo randomly chosen statement type to statement block", Frequent, add_random_statement),
            ],
            statement: vec![
                Operator::new("fill_refs", "Make statement arguments variable references", Frequent, fill_refs),
                Operator::new("fill_binops", "Make statement arguments binary operations", Frequent, fill_binops),
                Operator::new("fill_loads", "Mutate statement arguments to a load expression", Frequent, fill_loads),
                Operator::new("fill_refs_rec", "Make statement arguments variable references recursively", Frequent, fill_refs_rec),
                Operator::new("fill_binops_rec", "Make statement arguments binary ops recursively", Frequent, fill_binops_rec),
                Operator::new("fill_loads_rec", "Make statement arguments load expression recursively", Frequent, fill_loads_rec),
                Operator::new("fill_loads_from_zero_rec", "Make statement arguments loads from location zero recursively", Frequent, fill_loads_from_zero_rec),
            ],
            expression: vec![
                Operator::new("expression_to_load", "Expression mutated to a load operation", Frequent, expression_to_load),
                Operator::new("remove_load", "Remove load operation", Occasional, remove_load),
                Operator::new("expression_to_data", "Mutate expression to dataoffset/size", Occasional, expression_to_data),
                Operator::new("expression_to_call", "Mutate expression to function call", Frequent, expression_to_call),
                Operator::new("expression_to_var_ref", "Mutate expression to a variable reference", Frequent, expression_to_var_ref),
            ],
            assignment: vec![
                Operator::new("assign_load_zero", "Assign load from zero", Frequent, assign_load_zero),
            ],
            if_stmt: vec![
                Operator::new("invert_if_condition", "If condition inverted", Occasional, invert_if_condition),
                Operator::new("uninvert_if_condition", "If condition reverted", Occasional, uninvert_if_condition),
            ],
            for_stmt: vec![
                Operator::new("remove_break", "Break statement removed", Occasional, remove_break),
                Operator::new("remove_continue", "Continue statement removed", Occasional, remove_continue),
                Operator::new("invert_for_condition", "For condition inverted", Occasional, invert_for_condition),
                Operator::new("uninvert_for_condition", "Uninvert for condition", Occasional, uninvert_for_condition),
                Operator::new("call_as_for_condition", "Function call in for condition added", Occasional, call_as_for_condition),
            ],
            bounded_for: vec![
                Operator::new("add_var_ref_in_body", "Add variable reference in for loop body", Occasional, add_var_ref_in_body),
            ],
            function_def: vec![
                Operator::new("remove_leave", "Remove leave from function statement block", Rare, remove_leave),
                Operator::new("add_call_in_function_body", "Add function call in function body", Frequent, add_call_in_function_body),
                Operator::new("remove_call_from_function_body", "Remove function call from function body", Occasional, remove_call_from_function_body),
            ],
            unary: vec![
                Operator::new("mutate_unary_op", "Mutate unary operation in expression", Occasional, mutate_unary_op),
            ],
            binary: vec![
                Operator::new("mutate_binary_op", "Mutate binary operation in expression", Occasional, mutate_binary_op),
            ],
            nullary: vec![
                Operator::new("mutate_nullary_op", "Mutate nullary operation in expression", Occasional, mutate_nullary_op),
            ],
            var_ref: vec![
                Operator::new("mutate_var_ref", "Mutate variable reference", Frequent, mutate_var_ref),
            ],
        }
    }

    /// Total number of registered operators.
    pub fn len(&self) -> usize {
        self.block.len()
            + self.statement.len()
            + self.expression.len()
            + self.assignment.len()
            + self.if_stmt.len()
            + self.for_stmt.len()
            + self.bounded_for.len()
            + self.function_def.len()
            + self.unary.len()
            + self.binary.len()
            + self.nullary.len()
            + self.var_ref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for YulCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatcher for the Yul surface.
pub type YulMutator = Mutator<YulCatalog>;

impl Mutator<YulCatalog> {
    /// Creates a dispatcher over the full Yul catalog.
    pub fn yul(config: &MutationConfig) -> Self {
        Mutator::new(YulCatalog::new(), YUL_PERIODS, config)
    }

    /// Offers every node of `program` to the operators of its kind.
    ///
    /// Children are visited before their parent, so nodes added by a rewrite
    /// are not revisited in the same pass. Per-node seeds are drawn in visit
    /// order from a generator seeded with `seed`. Returns the number of
    /// operators that fired.
    pub fn mutate_program(&self, program: &mut YulProgram, seed: u32) -> usize {
        let mut seeds = MinStdRand::new(seed);
        self.walk_block(&mut program.code, &mut seeds)
    }

    fn walk_block(&self, block: &mut Block, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for stmt in block.statements.iter_mut() {
            fired += self.walk_statement(stmt, seeds);
        }
        fired + self.mutate(block, seeds.draw())
    }

    fn walk_statement(&self, stmt: &mut Statement, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for slot in statement_slots(stmt) {
            fired += match slot {
                Slot::Expr(expr) => self.walk_expr(expr, seeds),
                Slot::Ref(var) => self.mutate(var, seeds.draw()),
            };
        }

        fired += match stmt {
            Statement::Assignment(assign) => self.mutate(assign, seeds.draw()),
            Statement::If(stmt) => {
                self.walk_block(&mut stmt.body, seeds) + self.mutate(stmt, seeds.draw())
            }
            Statement::Block(block) => self.walk_block(block, seeds),
            Statement::For(stmt) => {
                self.walk_block(&mut stmt.init, seeds)
                    + self.walk_block(&mut stmt.post, seeds)
                    + self.walk_block(&mut stmt.body, seeds)
                    + self.mutate(stmt, seeds.draw())
            }
            Statement::BoundedFor(stmt) => {
                self.walk_block(&mut stmt.body, seeds) + self.mutate(stmt, seeds.draw())
            }
            Statement::Switch(stmt) => {
                let mut fired = 0;
                for case in stmt.cases.iter_mut() {
                    fired += self.walk_block(&mut case.body, seeds);
                }
                if let Some(default) = stmt.default.as_mut() {
                    fired += self.walk_block(default, seeds);
                }
                fired
            }
            Statement::FunctionDef(def) => {
                self.walk_block(&mut def.body, seeds) + self.mutate(def, seeds.draw())
            }
            Statement::Decl(_)
            | Statement::MultiDecl(_)
            | Statement::Store(_)
            | Statement::Break
            | Statement::Continue
            | Statement::Log(_)
            | Statement::Copy(_)
            | Statement::ExtCodeCopy(_)
            | Statement::Terminate(_)
            | Statement::FunctionCall(_)
            | Statement::Pop(_)
            | Statement::Leave => 0,
        };

        fired + self.mutate(stmt, seeds.draw())
    }

    fn walk_expr(&self, expr: &mut Expression, seeds: &mut MinStdRand) -> usize {
        let mut fired = 0;
        for child in expr.required_children_mut() {
            fired += self.walk_expr(child, seeds);
        }

        fired += match expr {
            Expression::VarRef(var) => self.mutate(var, seeds.draw()),
            Expression::Unary(op) => self.mutate(op.as_mut(), seeds.draw()),
            Expression::Binary(op) => self.mutate(op.as_mut(), seeds.draw()),
            Expression::Nullary(op) => self.mutate(op, seeds.draw()),
            _ => 0,
        };

        fired + self.mutate(expr, seeds.draw())
    }
}

fn toggle_not(cond: &mut Expression) {
    if !cond.is_set() {
        return;
    }
    if cond.as_not_operand().is_some() {
        strip_not(cond);
    } else {
        let inner = mem::take(cond);
        *cond = not_expression(inner);
    }
}

fn strip_not(cond: &mut Expression) {
    let operand = match cond {
        Expression::Unary(op) if op.op == UnaryOpKind::Not => mem::take(&mut op.operand),
        _ => return,
    };
    *cond = operand;
}

fn is_break(stmt: &Statement) -> bool {
    matches!(stmt, Statement::Break)
}

fn is_continue(stmt: &Statement) -> bool {
    matches!(stmt, Statement::Continue)
}

fn is_call(stmt: &Statement) -> bool {
    matches!(stmt, Statement::FunctionCall(_))
}

fn hoist(block: &mut Block, stmt: Statement) {
    block.statements.insert(0, stmt);
}

// Assignment

fn assign_load_zero(assign: &mut Assignment, rng: &mut MinStdRand) {
    assign.expr = load_from_zero(rng);
}

// If

/// Wraps the condition in `not`, or unwraps it if it already is one, so
/// applying the operator twice restores the original condition.
fn invert_if_condition(stmt: &mut IfStmt, _rng: &mut MinStdRand) {
    toggle_not(&mut stmt.cond);
}

fn uninvert_if_condition(stmt: &mut IfStmt, _rng: &mut MinStdRand) {
    strip_not(&mut stmt.cond);
}

// Block

fn add_break(block: &mut Block, _rng: &mut MinStdRand) {
    block.push(Statement::Break);
}

fn add_continue(block: &mut Block, _rng: &mut MinStdRand) {
    block.push(Statement::Continue);
}

fn add_store_to_zero(block: &mut Block, rng: &mut MinStdRand) {
    let kind = enum_from_seed(rng.draw());
    block.push(Statement::Store(StoreStmt {
        kind,
        loc: lit_expression(0),
        val: ref_expression(rng),
    }));
}

fn remove_store(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::Store(_)));
}

/// `function f(a) -> b { b := a }`, with both references left to the
/// emitter's resolution.
fn add_identity_function(block: &mut Block, rng: &mut MinStdRand) {
    let target = var_ref(rng.draw());
    let source = Expression::VarRef(var_ref(rng.draw()));
    block.push(Statement::FunctionDef(FunctionDef {
        num_inputs: 1,
        num_outputs: 1,
        body: Block::new(vec![Statement::Assignment(Assignment {
            target,
            expr: source,
        })]),
    }));
}

fn add_leave(block: &mut Block, _rng: &mut MinStdRand) {
    block.push(Statement::Leave);
}

fn add_assignment(block: &mut Block, rng: &mut MinStdRand) {
    let target = var_ref(rng.draw());
    let expr = Expression::VarRef(var_ref(rng.draw()));
    block.push(Statement::Assignment(Assignment { target, expr }));
}

fn remove_assignment(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::Assignment(_)));
}

fn add_constant_assignment(block: &mut Block, rng: &mut MinStdRand) {
    let target = var_ref(rng.draw());
    let expr = lit_expression(rng.draw());
    block.push(Statement::Assignment(Assignment { target, expr }));
}

fn add_if(block: &mut Block, rng: &mut MinStdRand) {
    let cond = ref_expression(rng);
    let target = var_ref(rng.draw());
    let expr = ref_expression(rng);
    block.push(Statement::If(IfStmt {
        cond,
        body: Block::new(vec![Statement::Assignment(Assignment { target, expr })]),
    }));
}

fn remove_if(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::If(_)));
}

fn add_switch(block: &mut Block, rng: &mut MinStdRand) {
    let scrutinee = ref_expression(rng);
    let literal = int_literal(rng.draw());
    block.push(Statement::Switch(SwitchStmt {
        scrutinee,
        cases: vec![CaseStmt {
            literal,
            body: Block::default(),
        }],
        default: None,
    }));
}

fn remove_switch(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::Switch(_)));
}

fn add_function_call(block: &mut Block, rng: &mut MinStdRand) {
    block.push(Statement::FunctionCall(new_call(rng)));
}

fn remove_function_call(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(is_call);
}

fn add_var_decl(block: &mut Block, rng: &mut MinStdRand) {
    let expr = ref_expression(rng);
    hoist(block, Statement::Decl(VarDecl { expr }));
}

fn add_multi_var_decl(block: &mut Block, rng: &mut MinStdRand) {
    let num_vars = rng.draw();
    hoist(block, Statement::MultiDecl(MultiVarDecl { num_vars }));
}

fn remove_var_decl(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::Decl(_)));
}

fn remove_multi_var_decl(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::MultiDecl(_)));
}

fn add_function_def(block: &mut Block, rng: &mut MinStdRand) {
    let num_inputs = rng.draw();
    let num_outputs = rng.draw();
    block.push(Statement::FunctionDef(FunctionDef {
        num_inputs,
        num_outputs,
        body: Block::default(),
    }));
}

fn remove_function_def(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::FunctionDef(_)));
}

fn add_bounded_for(block: &mut Block, _rng: &mut MinStdRand) {
    block.push(Statement::BoundedFor(BoundedForStmt::default()));
}

fn remove_bounded_for(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::BoundedFor(_)));
}

fn add_generic_for(block: &mut Block, rng: &mut MinStdRand) {
    block.push(Statement::For(ForStmt {
        cond: ref_expression(rng),
        ..ForStmt::default()
    }));
}

fn remove_generic_for(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::For(_)));
}

fn add_revert(block: &mut Block, _rng: &mut MinStdRand) {
    block.push(Statement::Terminate(TerminatingStmt::RetRev(RetRevStmt {
        kind: RetRevKind::Revert,
        pos: lit_expression(0),
        size: lit_expression(0),
    })));
}

fn remove_revert(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| {
        matches!(
            stmt,
            Statement::Terminate(TerminatingStmt::RetRev(ret_rev)) if ret_rev.kind == RetRevKind::Revert
        )
    });
}

fn add_pop_call(block: &mut Block, rng: &mut MinStdRand) {
    let expr = Expression::LowLevelCall(Box::new(low_level_call(rng)));
    block.push(Statement::Pop(PopStmt { expr }));
}

fn add_pop_create(block: &mut Block, rng: &mut MinStdRand) {
    let expr = Expression::Create(Box::new(create(rng)));
    block.push(Statement::Pop(PopStmt { expr }));
}

/// `pop(f())` for a single-return user function; the emitter falls back to
/// a constant when none is visible.
fn add_pop_user_function(block: &mut Block, rng: &mut MinStdRand) {
    let expr = Expression::Call(Box::new(single_call(rng)));
    block.push(Statement::Pop(PopStmt { expr }));
}

fn remove_pop(block: &mut Block, _rng: &mut MinStdRand) {
    block.remove_first(|stmt| matches!(stmt, Statement::Pop(_)));
}

/// Appends a statement of kind `(draw / 17) mod 19`, populated with
/// variable references.
fn add_random_statement(block: &mut Block, rng: &mut MinStdRand) {
    let mut stmt = Statement::of_kind(rng.draw() / 17);
    fill_args_rec(&mut stmt, |expr, rng| *expr = ref_expression(rng), rng);
    block.push(stmt);
}

// For

fn remove_break(stmt: &mut ForStmt, _rng: &mut MinStdRand) {
    stmt.body.remove_first(is_break);
}

fn remove_continue(stmt: &mut ForStmt, _rng: &mut MinStdRand) {
    stmt.body.remove_first(is_continue);
}

fn invert_for_condition(stmt: &mut ForStmt, _rng: &mut MinStdRand) {
    toggle_not(&mut stmt.cond);
}

fn uninvert_for_condition(stmt: &mut ForStmt, _rng: &mut MinStdRand) {
    strip_not(&mut stmt.cond);
}

fn call_as_for_condition(stmt: &mut ForStmt, rng: &mut MinStdRand) {
    if stmt.cond.is_set() {
        stmt.cond = Expression::Call(Box::new(single_call(rng)));
    }
}

// Bounded for

fn add_var_ref_in_body(stmt: &mut BoundedForStmt, rng: &mut MinStdRand) {
    let expr = ref_expression(rng);
    stmt.body.push(Statement::Pop(PopStmt { expr }));
}

// Function definition

fn remove_leave(def: &mut FunctionDef, _rng: &mut MinStdRand) {
    def.body.remove_first(|stmt| matches!(stmt, Statement::Leave));
}

fn add_call_in_function_body(def: &mut FunctionDef, rng: &mut MinStdRand) {
    def.body.push(Statement::FunctionCall(new_call(rng)));
}

fn remove_call_from_function_body(def: &mut FunctionDef, _rng: &mut MinStdRand) {
    def.body.remove_first(is_call);
}

// Expression

fn expression_to_load(expr: &mut Expression, rng: &mut MinStdRand) {
    *expr = load_expression(rng);
}

/// Replaces `mload(x)`, `sload(x)` or `calldataload(x)` with `x`.
fn remove_load(expr: &mut Expression, _rng: &mut MinStdRand) {
    if !expr.is_load() {
        return;
    }
    let operand = match expr {
        Expression::Unary(op) => mem::take(&mut op.operand),
        _ => return,
    };
    *expr = operand;
}

fn expression_to_data(expr: &mut Expression, rng: &mut MinStdRand) {
    let identifier = rng.draw();
    let op = enum_from_seed(rng.draw());
    *expr = Expression::Data(DataOp { op, identifier });
}

fn expression_to_call(expr: &mut Expression, rng: &mut MinStdRand) {
    *expr = Expression::Call(Box::new(single_call(rng)));
}

fn expression_to_var_ref(expr: &mut Expression, rng: &mut MinStdRand) {
    *expr = ref_expression(rng);
}

// Operator tags

fn mutate_unary_op(op: &mut UnaryOp, rng: &mut MinStdRand) {
    op.op = enum_from_seed(rng.draw());
}

fn mutate_binary_op(op: &mut BinaryOp, rng: &mut MinStdRand) {
    op.op = enum_from_seed(rng.draw());
}

fn mutate_nullary_op(op: &mut NullaryOp, rng: &mut MinStdRand) {
    op.op = enum_from_seed(rng.draw());
}

fn mutate_var_ref(var: &mut VarRef, rng: &mut MinStdRand) {
    var.index = rng.draw();
}

// Statement arguments

fn fill_refs(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args(stmt, ref_expression, rng);
}

fn fill_binops(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args(stmt, binop_expression, rng);
}

fn fill_loads(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args(stmt, load_expression, rng);
}

fn fill_refs_rec(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args_rec(stmt, |expr, rng| *expr = ref_expression(rng), rng);
}

fn fill_binops_rec(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args_rec(stmt, |expr, rng| *expr = binop_expression(rng), rng);
}

fn fill_loads_rec(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args_rec(stmt, |expr, rng| *expr = load_expression(rng), rng);
}

fn fill_loads_from_zero_rec(stmt: &mut Statement, rng: &mut MinStdRand) {
    fill_args_rec(stmt, |expr, rng| *expr = load_from_zero(rng), rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yul::ast::Literal;
    use crate::yul::fill::is_filled_deep;

    fn op<'a, T>(ops: &'a [Operator<T>], name: &str) -> &'a Operator<T> {
        ops.iter()
            .find(|op| op.name == name)
            .unwrap_or_else(|| panic!("operator {} not registered", name))
    }

    fn run<T>(operator: &Operator<T>, node: &mut T, seed: u32) {
        (operator.rewrite)(node, &mut MinStdRand::new(seed));
    }

    #[test]
    fn test_periods_are_yul_tiers() {
        assert_eq!(YUL_PERIODS.period(Tier::Frequent), 5);
        assert_eq!(YUL_PERIODS.period(Tier::Occasional), 7);
        assert_eq!(YUL_PERIODS.period(Tier::Rare), 11);
    }

    #[test]
    fn test_operator_names_are_unique() {
        let catalog = YulCatalog::new();
        let mut names: Vec<&str> = catalog.block.iter().map(|op| op.name).collect();
        names.extend(catalog.statement.iter().map(|op| op.name));
        names.extend(catalog.expression.iter().map(|op| op.name));
        names.extend(catalog.for_stmt.iter().map(|op| op.name));
        names.extend(catalog.function_def.iter().map(|op| op.name));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_invert_twice_restores_condition() {
        let catalog = YulCatalog::new();
        let invert = op(&catalog.if_stmt, "invert_if_condition");
        let original = Expression::VarRef(VarRef { index: 3 });
        let mut stmt = IfStmt {
            cond: original.clone(),
            body: Block::default(),
        };

        run(invert, &mut stmt, 0);
        assert_eq!(stmt.cond.as_not_operand(), Some(&original));
        run(invert, &mut stmt, 0);
        assert_eq!(stmt.cond, original);
    }

    #[test]
    fn test_uninvert_ignores_plain_condition() {
        let catalog = YulCatalog::new();
        let uninvert = op(&catalog.for_stmt, "uninvert_for_condition");
        let mut stmt = ForStmt {
            cond: Expression::Literal(Literal::Int(1)),
            ..ForStmt::default()
        };
        let before = stmt.clone();
        run(uninvert, &mut stmt, 1);
        assert_eq!(stmt, before);
    }

    #[test]
    fn test_removal_without_target_is_noop() {
        let catalog = YulCatalog::new();
        let remove = op(&catalog.for_stmt, "remove_break");
        let mut stmt = ForStmt {
            body: Block::new(vec![Statement::Continue]),
            ..ForStmt::default()
        };
        run(remove, &mut stmt, 0);
        assert_eq!(stmt.body.statements, vec![Statement::Continue]);
    }

    #[test]
    fn test_declarations_are_hoisted() {
        let catalog = YulCatalog::new();
        let add = op(&catalog.block, "add_var_decl");
        let mut block = Block::new(vec![Statement::Break, Statement::Leave]);
        run(add, &mut block, 9);
        assert!(matches!(block.statements[0], Statement::Decl(_)));
        assert_eq!(&block.statements[1..], &[Statement::Break, Statement::Leave]);
    }

    #[test]
    fn test_remove_load_keeps_operand() {
        let catalog = YulCatalog::new();
        let remove = op(&catalog.expression, "remove_load");
        let mut rng = MinStdRand::new(4);
        let mut expr = load_expression(&mut rng);
        run(remove, &mut expr, 0);
        assert!(matches!(expr, Expression::VarRef(_)));
    }

    #[test]
    fn test_added_statements_are_complete() {
        let catalog = YulCatalog::new();
        for operator in &catalog.block {
            for seed in 0..40 {
                let mut block = Block::default();
                run(operator, &mut block, seed);
                for stmt in &block.statements {
                    assert!(is_filled_deep(stmt), "{} left {:?} incomplete", operator.name, stmt);
                }
            }
        }
    }

    #[test]
    fn test_random_statement_covers_every_kind() {
        let catalog = YulCatalog::new();
        let add = op(&catalog.block, "add_random_statement");
        let mut seen = std::collections::HashSet::new();
        for seed in 0..2000 {
            let mut block = Block::default();
            run(add, &mut block, seed);
            seen.insert(std::mem::discriminant(&block.statements[0]));
        }
        assert_eq!(seen.len(), Statement::KIND_COUNT as usize);
    }

    #[test]
    fn test_mutate_program_is_deterministic() {
        let mutator = YulMutator::yul(&MutationConfig::default());
        let mut a = YulProgram::default();
        let mut b = YulProgram::default();
        for seed in 0..5 {
            mutator.mutate_program(&mut a, seed);
            mutator.mutate_program(&mut b, seed);
        }
        assert_eq!(a, b);
        assert!(!a.code.statements.is_empty());
    }
}
